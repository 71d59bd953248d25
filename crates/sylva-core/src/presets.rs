//! Ready-made tree grammars
//!
//! Each preset is a complete [`TreeConfig`]; callers typically only change
//! the seed.

use crate::geometry::{BranchConfig, LeafInstanceConfig, LeafShapeConfig};
use crate::grammar::symbol::{self, Symbol};
use crate::grammar::{LSystem, LSystemConfig, Rule};
use crate::pipeline::TreeConfig;
use crate::{Error, Result};

/// Names accepted by [`preset`]
pub const PRESET_NAMES: [&str; 5] = ["oak", "pine", "willow", "bush", "fern"];

/// Look up a preset by name
pub fn preset(name: &str) -> Result<TreeConfig> {
    match name {
        "oak" => oak(),
        "pine" => pine(),
        "willow" => willow(),
        "bush" => bush(),
        "fern" => fern(),
        other => Err(Error::UnknownPreset(other.to_string())),
    }
}

/// Broad crown with forked limbs
pub fn oak() -> Result<TreeConfig> {
    let config = LSystemConfig {
        base_length: 1.2,
        base_radius: 0.25,
        length_falloff: 0.78,
        radius_falloff: 0.62,
        branch_angle: 28.0,
        variability: 0.2,
    };
    let rules = vec![
        Rule::literal('X', 0.6, "F[&+XL]//[&-XL]//[^XL]"),
        Rule::literal('X', 0.4, "F[&+XL]///[&-XL]"),
    ];
    let lsystem = LSystem::new("FFFX", rules, config)?;
    Ok(TreeConfig::new(lsystem, 4).with_seed("oak"))
}

/// Tall trunk with whorls of drooping branches
pub fn pine() -> Result<TreeConfig> {
    let config = LSystemConfig {
        base_length: 0.9,
        base_radius: 0.2,
        length_falloff: 0.7,
        radius_falloff: 0.55,
        branch_angle: 32.0,
        variability: 0.1,
    };
    let rules = vec![Rule::literal('X', 1.0, "F[&&&L]///[&&&XL]///[&&&XL]///[&&&XL]X")];
    let lsystem = LSystem::new("FFFFX", rules, config)?;
    let leaf_shape = LeafShapeConfig {
        width: 0.08,
        length: 0.6,
        curvature: 0.05,
        segments: 2,
    };
    Ok(TreeConfig::new(lsystem, 4)
        .with_seed("pine")
        .with_leaf_shape(leaf_shape)
        .with_leaf_instances(LeafInstanceConfig::default().with_base_color(0.12, 0.33, 0.18)))
}

/// Arching limbs that hang back toward the ground
pub fn willow() -> Result<TreeConfig> {
    let config = LSystemConfig {
        base_length: 1.0,
        base_radius: 0.22,
        length_falloff: 0.85,
        radius_falloff: 0.6,
        branch_angle: 22.0,
        variability: 0.25,
    };
    let rules = vec![
        Rule::literal('X', 0.5, "F[&&XL]/[&&&XL]/F[&XL]"),
        Rule::literal('X', 0.5, "F[&&&XL]//[&&XL]"),
        Rule::literal('F', 0.8, "F"),
        Rule::literal('F', 0.2, "F&F"),
    ];
    let lsystem = LSystem::new("FFX", rules, config)?;
    let leaf_shape = LeafShapeConfig {
        width: 0.12,
        length: 0.7,
        curvature: 0.4,
        segments: 4,
    };
    Ok(TreeConfig::new(lsystem, 4)
        .with_seed("willow")
        .with_leaf_shape(leaf_shape)
        .with_leaf_instances(LeafInstanceConfig::default().with_base_color(0.45, 0.62, 0.25)))
}

/// Low, dense shrub with no trunk
pub fn bush() -> Result<TreeConfig> {
    let config = LSystemConfig {
        base_length: 0.5,
        base_radius: 0.06,
        length_falloff: 0.85,
        radius_falloff: 0.7,
        branch_angle: 35.0,
        variability: 0.3,
    };
    let rules = vec![
        Rule::literal('X', 0.5, "F[+XL][-XL][^XL][&XL]"),
        Rule::literal('X', 0.5, "F[/+XL][\\-XL]"),
    ];
    let lsystem = LSystem::new("X", rules, config)?;
    Ok(TreeConfig::new(lsystem, 4)
        .with_seed("bush")
        .with_branch(BranchConfig::default().with_radial_segments(5))
        .with_leaf_instances(LeafInstanceConfig::default().with_scale(0.6)))
}

/// Single frond with a random number of leaflets per node
pub fn fern() -> Result<TreeConfig> {
    let config = LSystemConfig {
        base_length: 0.4,
        base_radius: 0.03,
        length_falloff: 0.9,
        radius_falloff: 0.8,
        branch_angle: 50.0,
        variability: 0.15,
    };
    let frond = Rule::generator('X', 1.0, |_, depth, config, rng| {
        let mut out = vec![
            Symbol::create(symbol::FORWARD, depth, config, rng),
            Symbol::create(symbol::PITCH_DOWN, depth, config, rng),
        ];
        let leaflets = rng.random_int(2, 4);
        for i in 0..leaflets {
            let turn = if i % 2 == 0 {
                symbol::YAW_LEFT
            } else {
                symbol::YAW_RIGHT
            };
            out.push(Symbol::bare(symbol::PUSH));
            out.push(Symbol::create(turn, depth + 1, config, rng));
            out.push(Symbol::create(symbol::FORWARD, depth + 1, config, rng));
            if rng.random_chance(0.4) {
                out.push(Symbol::bare(symbol::PLACEHOLDER));
            }
            out.push(Symbol::leaf(0.8));
            out.push(Symbol::bare(symbol::POP));
            out.push(Symbol::create(symbol::ROLL_LEFT, depth, config, rng));
        }
        out.push(Symbol::bare(symbol::PLACEHOLDER));
        out
    });
    let lsystem = LSystem::new("X", vec![frond], config)?;
    let leaf_shape = LeafShapeConfig {
        width: 0.15,
        length: 0.35,
        curvature: 0.3,
        segments: 3,
    };
    Ok(TreeConfig::new(lsystem, 5)
        .with_seed("fern")
        .with_branch(BranchConfig::default().with_radial_segments(4))
        .with_leaf_shape(leaf_shape)
        .with_leaf_instances(LeafInstanceConfig::default().with_base_color(0.2, 0.55, 0.2)))
}
