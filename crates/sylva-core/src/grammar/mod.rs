//! Stochastic L-system grammar
//!
//! A grammar is an axiom plus a list of weighted rewriting rules. Rules that
//! share a `matches` character form a group; one member of the group is picked
//! per occurrence, with probability proportional to its odds.

mod rewrite;
pub mod symbol;

use crate::random::SeededRandom;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

pub use rewrite::{apply_rules, generate_sentence, generate_sentence_bounded, select_rule};
pub use symbol::{Symbol, SymbolParams, parse_sentence, sentence_to_string, variability_factor};

/// Numeric parameters that shape symbols as they are produced
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LSystemConfig {
    /// Length of a forward step at depth 0
    pub base_length: f64,
    /// Branch radius at depth 0
    pub base_radius: f64,
    /// Length multiplier per nesting level
    pub length_falloff: f64,
    /// Radius multiplier per nesting level
    pub radius_falloff: f64,
    /// Rotation per turn symbol, in degrees
    pub branch_angle: f64,
    /// Jitter range in `[0, 1]`; 0 is fully regular
    pub variability: f64,
}

impl Default for LSystemConfig {
    fn default() -> Self {
        Self {
            base_length: 1.0,
            base_radius: 0.1,
            length_falloff: 0.8,
            radius_falloff: 0.7,
            branch_angle: 25.0,
            variability: 0.0,
        }
    }
}

impl LSystemConfig {
    pub fn with_branch_angle(mut self, degrees: f64) -> Self {
        self.branch_angle = degrees;
        self
    }

    pub fn with_variability(mut self, variability: f64) -> Self {
        self.variability = variability;
        self
    }

    pub fn with_falloff(mut self, length_falloff: f64, radius_falloff: f64) -> Self {
        self.length_falloff = length_falloff;
        self.radius_falloff = radius_falloff;
        self
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("base_length", self.base_length),
            ("base_radius", self.base_radius),
            ("length_falloff", self.length_falloff),
            ("radius_falloff", self.radius_falloff),
            ("variability", self.variability),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidGrammar(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.variability > 1.0 {
            return Err(Error::InvalidGrammar(format!(
                "variability must be at most 1, got {}",
                self.variability
            )));
        }
        if !self.branch_angle.is_finite() {
            return Err(Error::InvalidGrammar(format!(
                "branch_angle must be finite, got {}",
                self.branch_angle
            )));
        }
        Ok(())
    }
}

/// Signature of a generator production
///
/// Called with the symbol being rewritten, the current nesting depth, the
/// grammar config and the shared random source.
pub type GeneratorFn =
    Arc<dyn Fn(&Symbol, usize, &LSystemConfig, &mut SeededRandom) -> Vec<Symbol> + Send + Sync>;

/// What a rule rewrites its symbol into
#[derive(Clone)]
pub enum Production {
    /// Text parsed into fresh symbols
    Literal(String),
    /// Code that builds the replacement directly
    Generator(GeneratorFn),
}

impl Production {
    /// Wrap a closure as a generator production
    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&Symbol, usize, &LSystemConfig, &mut SeededRandom) -> Vec<Symbol>
            + Send
            + Sync
            + 'static,
    {
        Self::Generator(Arc::new(f))
    }
}

impl fmt::Debug for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// A weighted rewriting rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Symbol this rule rewrites
    pub matches: char,
    /// Relative weight within its group
    pub odds: f64,
    pub produce: Production,
}

impl Rule {
    /// Rule with a literal production
    pub fn literal(matches: char, odds: f64, text: impl Into<String>) -> Self {
        Self {
            matches,
            odds,
            produce: Production::Literal(text.into()),
        }
    }

    /// Rule with a generator production
    pub fn generator<F>(matches: char, odds: f64, f: F) -> Self
    where
        F: Fn(&Symbol, usize, &LSystemConfig, &mut SeededRandom) -> Vec<Symbol>
            + Send
            + Sync
            + 'static,
    {
        Self {
            matches,
            odds,
            produce: Production::generator(f),
        }
    }
}

/// A validated grammar: axiom, rules and symbol parameters
#[derive(Debug, Clone)]
pub struct LSystem {
    axiom: String,
    rules: Vec<Rule>,
    config: LSystemConfig,
}

impl LSystem {
    /// Build a grammar, rejecting rule groups that cannot be sampled
    pub fn new(axiom: impl Into<String>, rules: Vec<Rule>, config: LSystemConfig) -> Result<Self> {
        let axiom = axiom.into();
        if axiom.is_empty() {
            return Err(Error::InvalidGrammar("axiom is empty".into()));
        }
        config.validate()?;

        let mut totals: BTreeMap<char, f64> = BTreeMap::new();
        for rule in &rules {
            if !rule.odds.is_finite() || rule.odds <= 0.0 {
                return Err(Error::InvalidGrammar(format!(
                    "rule for '{}' has odds {}, expected a positive number",
                    rule.matches, rule.odds
                )));
            }
            if matches!(rule.matches, symbol::PUSH | symbol::POP) {
                return Err(Error::InvalidGrammar(format!(
                    "brackets cannot be rewritten (rule for '{}')",
                    rule.matches
                )));
            }
            *totals.entry(rule.matches).or_default() += rule.odds;
        }
        if let Some((c, total)) = totals.iter().find(|(_, total)| !total.is_finite() || **total <= 0.0) {
            return Err(Error::InvalidGrammar(format!(
                "rules for '{c}' have total odds {total}"
            )));
        }

        Ok(Self {
            axiom,
            rules,
            config,
        })
    }

    pub fn axiom(&self) -> &str {
        &self.axiom
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn config(&self) -> &LSystemConfig {
        &self.config
    }

    /// Replace the symbol parameters, keeping axiom and rules
    pub fn with_config(mut self, config: LSystemConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Rules grouped by the symbol they rewrite, each group in declaration order
    pub fn rule_groups(&self) -> HashMap<char, Vec<&Rule>> {
        let mut groups: HashMap<char, Vec<&Rule>> = HashMap::new();
        for rule in &self.rules {
            groups.entry(rule.matches).or_default().push(rule);
        }
        groups
    }
}
