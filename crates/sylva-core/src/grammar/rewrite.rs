//! Rewriting passes
//!
//! Draws are consumed strictly in scan order: left to right through the
//! sentence, and within one replacement, rule selection first and then the
//! symbols of the production in order. Changing that order changes every
//! tree generated from a seed.

use super::symbol::{self, Symbol, parse_sentence};
use super::{LSystem, Production, Rule};
use crate::random::SeededRandom;
use crate::{Error, Result};

/// Pick one rule from a group of candidates sharing the same `matches`
///
/// A single candidate is returned without drawing. Otherwise one draw is
/// scaled by the group's total odds and the first candidate whose cumulative
/// odds exceeds it wins. If rounding leaves no winner, the last candidate is
/// returned.
pub fn select_rule<'a>(candidates: &[&'a Rule], rng: &mut SeededRandom) -> Option<&'a Rule> {
    match candidates {
        [] => None,
        [only] => Some(*only),
        _ => {
            let total: f64 = candidates.iter().map(|r| r.odds).sum();
            let threshold = rng.random() * total;
            let mut cumulative = 0.0;
            for rule in candidates {
                cumulative += rule.odds;
                if cumulative > threshold {
                    return Some(*rule);
                }
            }
            candidates.last().copied()
        }
    }
}

/// Apply one generation of rewriting to `sentence`
pub fn apply_rules(sentence: &[Symbol], lsystem: &LSystem, rng: &mut SeededRandom) -> Vec<Symbol> {
    rewrite_pass(sentence, lsystem, rng, usize::MAX).unwrap_or_default()
}

/// One rewriting pass that gives up once the output exceeds `max_symbols`
fn rewrite_pass(
    sentence: &[Symbol],
    lsystem: &LSystem,
    rng: &mut SeededRandom,
    max_symbols: usize,
) -> Option<Vec<Symbol>> {
    let groups = lsystem.rule_groups();
    let config = lsystem.config();
    let mut output = Vec::with_capacity(sentence.len().saturating_mul(2).min(max_symbols));
    let mut depth = 0usize;

    for current in sentence {
        match current.tag {
            symbol::PUSH => {
                depth += 1;
                output.push(*current);
            }
            symbol::POP => {
                depth = depth.saturating_sub(1);
                output.push(*current);
            }
            _ => {
                let selected = match groups.get(&current.tag) {
                    Some(candidates) => select_rule(candidates, rng),
                    None => None,
                };
                match selected.map(|rule| &rule.produce) {
                    None => output.push(*current),
                    Some(Production::Literal(text)) => {
                        output.extend(parse_sentence(text, depth, config, rng));
                    }
                    Some(Production::Generator(generate)) => {
                        output.extend(generate(current, depth, config, rng));
                    }
                }
            }
        }
        if output.len() > max_symbols {
            return None;
        }
    }

    Some(output)
}

/// Expand the axiom through `iterations` generations
///
/// One random source is created from `seed` and threaded through every pass.
pub fn generate_sentence(lsystem: &LSystem, iterations: u32, seed: &str) -> Vec<Symbol> {
    let mut rng = SeededRandom::new(seed);
    let mut sentence = parse_sentence(lsystem.axiom(), 0, lsystem.config(), &mut rng);
    for generation in 0..iterations {
        sentence = apply_rules(&sentence, lsystem, &mut rng);
        tracing::trace!(generation, symbols = sentence.len(), "rewriting pass");
    }
    sentence
}

/// Like [`generate_sentence`], but fails once the sentence grows past `max_symbols`
///
/// The check runs while a pass is being written, so memory never holds much
/// more than `max_symbols` symbols. Within the limit the result is identical
/// to [`generate_sentence`].
pub fn generate_sentence_bounded(
    lsystem: &LSystem,
    iterations: u32,
    seed: &str,
    max_symbols: usize,
) -> Result<Vec<Symbol>> {
    let too_long = |generation| Error::SentenceTooLong {
        limit: max_symbols,
        generation,
    };

    let mut rng = SeededRandom::new(seed);
    let mut sentence = parse_sentence(lsystem.axiom(), 0, lsystem.config(), &mut rng);
    if sentence.len() > max_symbols {
        return Err(too_long(0));
    }
    for generation in 0..iterations {
        sentence = rewrite_pass(&sentence, lsystem, &mut rng, max_symbols)
            .ok_or_else(|| too_long(generation + 1))?;
        tracing::trace!(generation, symbols = sentence.len(), "rewriting pass");
    }
    Ok(sentence)
}
