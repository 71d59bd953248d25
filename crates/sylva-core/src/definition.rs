//! JSON tree definitions
//!
//! A definition file describes a grammar with literal productions plus any
//! geometry overrides:
//!
//! ```json
//! {
//!   "axiom": "FX",
//!   "rules": [
//!     { "match": "X", "odds": 0.7, "produce": "F[+XL][-XL]" },
//!     { "match": "X", "odds": 0.3, "produce": "F[^XL]" }
//!   ],
//!   "lsystem": { "branch_angle": 30.0, "variability": 0.2 },
//!   "iterations": 4,
//!   "seed": "maple"
//! }
//! ```
//!
//! Omitted sections use their defaults; the turtle takes its radius settings
//! from `lsystem` unless a `turtle` section is given.

use crate::geometry::{BranchConfig, LeafInstanceConfig, LeafShapeConfig};
use crate::grammar::{LSystem, LSystemConfig, Rule};
use crate::pipeline::TreeConfig;
use crate::turtle::TurtleConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One rule of a definition file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleDefinition {
    #[serde(rename = "match")]
    pub matches: char,
    #[serde(default = "default_odds")]
    pub odds: f64,
    pub produce: String,
}

fn default_odds() -> f64 {
    1.0
}

fn default_iterations() -> u32 {
    4
}

fn default_seed() -> String {
    "sylva".into()
}

/// Serializable description of a tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDefinition {
    pub axiom: String,
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
    #[serde(default)]
    pub lsystem: LSystemConfig,
    #[serde(default = "default_iterations")]
    pub iterations: u32,
    #[serde(default = "default_seed")]
    pub seed: String,
    #[serde(default)]
    pub turtle: Option<TurtleConfig>,
    #[serde(default)]
    pub branch: Option<BranchConfig>,
    #[serde(default)]
    pub leaf_shape: Option<LeafShapeConfig>,
    #[serde(default)]
    pub leaf_instances: Option<LeafInstanceConfig>,
}

impl TreeDefinition {
    /// Parse a definition from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a definition from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Validate the grammar and build a generation config
    pub fn into_config(self) -> Result<TreeConfig> {
        let rules = self
            .rules
            .into_iter()
            .map(|r| Rule::literal(r.matches, r.odds, r.produce))
            .collect();
        let lsystem = LSystem::new(self.axiom, rules, self.lsystem)?;
        let turtle = self
            .turtle
            .unwrap_or_else(|| TurtleConfig::from_lsystem(lsystem.config()));

        let config = TreeConfig::new(lsystem, self.iterations)
            .with_seed(self.seed)
            .with_turtle(turtle)
            .with_branch(self.branch.unwrap_or_default())
            .with_leaf_shape(self.leaf_shape.unwrap_or_default())
            .with_leaf_instances(self.leaf_instances.unwrap_or_default());
        config.validate()?;
        Ok(config)
    }
}

impl TryFrom<TreeDefinition> for TreeConfig {
    type Error = Error;

    fn try_from(definition: TreeDefinition) -> Result<Self> {
        definition.into_config()
    }
}
