//! Parameterized grammar symbols

use super::LSystemConfig;
use crate::random::SeededRandom;

/// Move forward, emitting a segment
pub const FORWARD: char = 'F';
/// Yaw left / right around the local up axis
pub const YAW_LEFT: char = '+';
pub const YAW_RIGHT: char = '-';
/// Pitch up / down around the local right axis
pub const PITCH_UP: char = '^';
pub const PITCH_DOWN: char = '&';
/// Roll left / right around the local forward axis
pub const ROLL_LEFT: char = '/';
pub const ROLL_RIGHT: char = '\\';
/// Save / restore turtle state
pub const PUSH: char = '[';
pub const POP: char = ']';
/// Place a leaf
pub const LEAF: char = 'L';
/// Growth placeholder, rewritten by rules and ignored by the turtle
pub const PLACEHOLDER: char = 'X';

/// Whether `c` is one of the six rotation commands
pub fn is_rotation(c: char) -> bool {
    matches!(
        c,
        YAW_LEFT | YAW_RIGHT | PITCH_UP | PITCH_DOWN | ROLL_LEFT | ROLL_RIGHT
    )
}

/// Optional numeric parameters carried by a symbol
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SymbolParams {
    /// Forward distance (`F`)
    pub length: Option<f64>,
    /// Rotation in degrees (rotation commands)
    pub angle: Option<f64>,
    /// Leaf size (`L`)
    pub size: Option<f64>,
}

/// One symbol of a sentence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Symbol {
    pub tag: char,
    pub params: SymbolParams,
}

impl Symbol {
    /// A symbol without parameters
    pub fn bare(c: char) -> Self {
        Self {
            tag: c,
            params: SymbolParams::default(),
        }
    }

    /// Forward symbol with an explicit length
    pub fn forward(length: f64) -> Self {
        Self {
            tag: FORWARD,
            params: SymbolParams {
                length: Some(length),
                ..SymbolParams::default()
            },
        }
    }

    /// Rotation symbol with an explicit angle in degrees
    pub fn rotation(c: char, angle: f64) -> Self {
        Self {
            tag: c,
            params: SymbolParams {
                angle: Some(angle),
                ..SymbolParams::default()
            },
        }
    }

    /// Leaf symbol with an explicit size
    pub fn leaf(size: f64) -> Self {
        Self {
            tag: LEAF,
            params: SymbolParams {
                size: Some(size),
                ..SymbolParams::default()
            },
        }
    }

    /// Create a symbol with parameters derived from the nesting depth
    ///
    /// `F` and rotation symbols consume exactly one draw each when the
    /// config has non-zero variability; nothing else touches `rng`.
    pub fn create(c: char, depth: usize, config: &LSystemConfig, rng: &mut SeededRandom) -> Self {
        match c {
            FORWARD => {
                let length = config.base_length * config.length_falloff.powi(depth as i32);
                Self::forward(length * variability_factor(config.variability, rng))
            }
            c if is_rotation(c) => {
                Self::rotation(c, config.branch_angle * variability_factor(config.variability, rng))
            }
            LEAF => Self::leaf(1.0),
            c => Self::bare(c),
        }
    }
}

/// Multiplier uniformly distributed in `[1 - variability, 1 + variability]`
///
/// Returns exactly `1.0` without drawing when `variability` is zero.
pub fn variability_factor(variability: f64, rng: &mut SeededRandom) -> f64 {
    if variability == 0.0 {
        1.0
    } else {
        1.0 + variability * (rng.random() - 0.5) * 2.0
    }
}

/// Parse text into symbols starting at `start_depth`
///
/// Brackets inside `text` move the depth for the symbols that follow them.
pub fn parse_sentence(
    text: &str,
    start_depth: usize,
    config: &LSystemConfig,
    rng: &mut SeededRandom,
) -> Vec<Symbol> {
    let mut depth = start_depth;
    let mut symbols = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            PUSH => {
                symbols.push(Symbol::bare(c));
                depth += 1;
            }
            POP => {
                symbols.push(Symbol::bare(c));
                depth = depth.saturating_sub(1);
            }
            c => symbols.push(Symbol::create(c, depth, config, rng)),
        }
    }
    symbols
}

/// Render a sentence back to its characters
pub fn sentence_to_string(symbols: &[Symbol]) -> String {
    symbols.iter().map(|s| s.tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config() -> LSystemConfig {
        LSystemConfig {
            base_length: 2.0,
            length_falloff: 0.5,
            branch_angle: 25.0,
            variability: 0.0,
            ..LSystemConfig::default()
        }
    }

    #[test]
    fn forward_length_falls_off_with_depth() {
        let mut rng = SeededRandom::new("f");
        let s = Symbol::create('F', 2, &config(), &mut rng);
        assert_relative_eq!(s.params.length.unwrap_or_default(), 0.5);
    }

    #[test]
    fn rotations_carry_branch_angle() {
        let mut rng = SeededRandom::new("r");
        for c in ['+', '-', '^', '&', '/', '\\'] {
            let s = Symbol::create(c, 3, &config(), &mut rng);
            assert_eq!(s.params.angle, Some(25.0));
        }
    }

    #[test]
    fn leaf_has_unit_size_and_others_are_bare() {
        let mut rng = SeededRandom::new("l");
        assert_eq!(Symbol::create('L', 0, &config(), &mut rng).params.size, Some(1.0));
        assert_eq!(Symbol::create('X', 0, &config(), &mut rng), Symbol::bare('X'));
        assert_eq!(Symbol::create('[', 0, &config(), &mut rng), Symbol::bare('['));
    }

    #[test]
    fn zero_variability_consumes_no_draws() {
        let mut rng = SeededRandom::new("quiet");
        let before = rng.clone();
        parse_sentence("F+F-F", 0, &config(), &mut rng);
        assert_eq!(rng, before);
    }

    #[test]
    fn variability_consumes_one_draw_per_parameterized_symbol() {
        let cfg = LSystemConfig {
            variability: 0.3,
            ..config()
        };
        let mut rng = SeededRandom::new("noisy");
        let mut expected = rng.clone();
        parse_sentence("F[+X]L", 0, &cfg, &mut rng);
        expected.random();
        expected.random();
        assert_eq!(rng, expected);
    }

    #[test]
    fn variability_factor_stays_in_range() {
        let mut rng = SeededRandom::new("jitter");
        for _ in 0..1000 {
            let f = variability_factor(0.25, &mut rng);
            assert!((0.75..=1.25).contains(&f));
        }
    }

    #[test]
    fn parse_tracks_brackets() {
        let mut rng = SeededRandom::new("depth");
        let symbols = parse_sentence("F[F[F]]F", 0, &config(), &mut rng);
        let lengths: Vec<f64> = symbols.iter().filter_map(|s| s.params.length).collect();
        assert_eq!(lengths, vec![2.0, 1.0, 0.5, 2.0]);
    }

    #[test]
    fn unbalanced_pop_saturates_at_zero() {
        let mut rng = SeededRandom::new("pop");
        let symbols = parse_sentence("]]F", 0, &config(), &mut rng);
        assert_eq!(symbols[2].params.length, Some(2.0));
    }

    #[test]
    fn round_trips_to_text() {
        let mut rng = SeededRandom::new("text");
        let symbols = parse_sentence("F[+F]L", 0, &config(), &mut rng);
        assert_eq!(sentence_to_string(&symbols), "F[+F]L");
    }
}
