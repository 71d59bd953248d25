//! One-call tree generation
//!
//! `generate` runs grammar expansion, turtle interpretation and geometry
//! building in sequence. Nothing is shared between calls; the same config
//! always produces the same buffers.

use crate::geometry::{
    BranchConfig, GeometryData, LeafInstanceConfig, LeafInstances, LeafShapeConfig,
    build_branch_geometry, build_leaf_instances, build_leaf_shape,
};
use crate::grammar::{LSystem, generate_sentence_bounded};
use crate::turtle::{Skeleton, TurtleConfig, interpret};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Largest accepted iteration count
pub const MAX_ITERATIONS: u32 = 12;

/// Largest expanded sentence `generate` will build
///
/// Branching grammars can reach this well before [`MAX_ITERATIONS`]; the
/// expansion is abandoned with [`Error::SentenceTooLong`] as soon as it
/// crosses the limit.
pub const MAX_SYMBOLS: usize = 2_000_000;

/// Everything needed to grow one tree
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Grammar; replace it through [`TreeConfig::with_lsystem`] so the turtle
    /// radius settings follow
    pub lsystem: LSystem,
    pub iterations: u32,
    pub seed: String,
    pub turtle: TurtleConfig,
    pub branch: BranchConfig,
    pub leaf_shape: LeafShapeConfig,
    pub leaf_instances: LeafInstanceConfig,
}

impl TreeConfig {
    /// Config with default geometry settings and a turtle derived from the grammar
    pub fn new(lsystem: LSystem, iterations: u32) -> Self {
        let turtle = TurtleConfig::from_lsystem(lsystem.config());
        Self {
            lsystem,
            iterations,
            seed: "sylva".into(),
            turtle,
            branch: BranchConfig::default(),
            leaf_shape: LeafShapeConfig::default(),
            leaf_instances: LeafInstanceConfig::default(),
        }
    }

    /// Swap the grammar and take its radius settings into the turtle
    ///
    /// Step length and default angle of the current turtle are kept.
    pub fn with_lsystem(mut self, lsystem: LSystem) -> Self {
        self.turtle = TurtleConfig {
            base_radius: lsystem.config().base_radius,
            radius_falloff: lsystem.config().radius_falloff,
            ..self.turtle
        };
        self.lsystem = lsystem;
        self
    }

    pub fn with_seed(mut self, seed: impl Into<String>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_turtle(mut self, turtle: TurtleConfig) -> Self {
        self.turtle = turtle;
        self
    }

    pub fn with_branch(mut self, branch: BranchConfig) -> Self {
        self.branch = branch;
        self
    }

    pub fn with_leaf_shape(mut self, leaf_shape: LeafShapeConfig) -> Self {
        self.leaf_shape = leaf_shape;
        self
    }

    pub fn with_leaf_instances(mut self, leaf_instances: LeafInstanceConfig) -> Self {
        self.leaf_instances = leaf_instances;
        self
    }

    /// Reject settings that would produce malformed geometry
    pub fn validate(&self) -> Result<()> {
        if self.iterations > MAX_ITERATIONS {
            return Err(Error::InvalidParameter(format!(
                "iterations must be at most {MAX_ITERATIONS}, got {}",
                self.iterations
            )));
        }
        if self.branch.radial_segments < 3 {
            return Err(Error::InvalidParameter(format!(
                "radial_segments must be at least 3, got {}",
                self.branch.radial_segments
            )));
        }
        if self.leaf_shape.segments < 1 {
            return Err(Error::InvalidParameter(
                "leaf segments must be at least 1".into(),
            ));
        }

        let non_negative = [
            ("turtle.base_radius", self.turtle.base_radius),
            ("turtle.radius_falloff", self.turtle.radius_falloff),
            ("turtle.default_length", self.turtle.default_length),
            ("branch.texture_scale", self.branch.texture_scale),
            ("leaf_shape.width", self.leaf_shape.width),
            ("leaf_shape.length", self.leaf_shape.length),
            ("leaf_instances.scale", self.leaf_instances.scale),
            ("leaf_instances.size_variation", self.leaf_instances.size_variation),
            ("leaf_instances.rotation_variation", self.leaf_instances.rotation_variation),
            ("leaf_instances.color_variation", self.leaf_instances.color_variation),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }

        let finite = [
            ("turtle.default_angle", self.turtle.default_angle),
            ("leaf_shape.curvature", self.leaf_shape.curvature),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.leaf_instances.size_variation > 1.0 {
            return Err(Error::InvalidParameter(format!(
                "leaf_instances.size_variation must be at most 1, got {}",
                self.leaf_instances.size_variation
            )));
        }

        if let Some(c) = self
            .leaf_instances
            .base_color
            .iter()
            .find(|c| !(0.0..=1.0).contains(*c))
        {
            return Err(Error::InvalidParameter(format!(
                "leaf_instances.base_color channels must be in [0, 1], got {c}"
            )));
        }

        Ok(())
    }
}

/// Informational counts for a generated tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    /// Branch triangles plus leaf-shape triangles for every instance
    pub triangle_count: usize,
    pub segment_count: usize,
    pub leaf_count: usize,
    /// Length of the expanded sentence
    pub symbol_count: usize,
    pub node_count: usize,
}

/// Render-ready output of one generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeOutput {
    pub branch_geometry: GeometryData,
    /// Shared leaf mesh; `None` when the tree has no leaves
    pub leaf_geometry: Option<GeometryData>,
    pub leaf_instances: LeafInstances,
    pub stats: TreeStats,
}

/// Expand and interpret the grammar without building geometry
///
/// Returns the skeleton and the expanded sentence length.
pub fn generate_skeleton(config: &TreeConfig) -> Result<(Skeleton, usize)> {
    config.validate()?;

    let started = Instant::now();
    let sentence =
        generate_sentence_bounded(&config.lsystem, config.iterations, &config.seed, MAX_SYMBOLS)?;
    tracing::debug!(
        symbols = sentence.len(),
        iterations = config.iterations,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "expanded grammar"
    );

    let skeleton = interpret(&sentence, &config.turtle);
    Ok((skeleton, sentence.len()))
}

/// Grow a tree from `config`
pub fn generate(config: &TreeConfig) -> Result<TreeOutput> {
    let (skeleton, symbol_count) = generate_skeleton(config)?;

    let started = Instant::now();
    let branch_geometry = build_branch_geometry(&skeleton, &config.branch);
    let leaf_instances =
        build_leaf_instances(&skeleton.leaves, &config.seed, &config.leaf_instances);
    let leaf_geometry =
        (!skeleton.leaves.is_empty()).then(|| build_leaf_shape(&config.leaf_shape));

    let leaf_triangles = leaf_geometry
        .as_ref()
        .map_or(0, |shape| shape.triangle_count() * leaf_instances.count);
    let stats = TreeStats {
        triangle_count: branch_geometry.triangle_count() + leaf_triangles,
        segment_count: skeleton.segments.len(),
        leaf_count: skeleton.leaves.len(),
        symbol_count,
        node_count: skeleton.nodes.len(),
    };
    tracing::debug!(
        triangles = stats.triangle_count,
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "built geometry"
    );

    Ok(TreeOutput {
        branch_geometry,
        leaf_geometry,
        leaf_instances,
        stats,
    })
}
