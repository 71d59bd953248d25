//! # Sylva Core
//!
//! Seeded procedural tree generation.
//!
//! A tree is grown in four strictly sequential stages:
//!
//! ```text
//! seed ─► grammar expansion ─► turtle walk ─► skeleton ─► mesh buffers
//! ```
//!
//! Every stage is deterministic for a given seed string, so the same
//! [`TreeConfig`](pipeline::TreeConfig) always yields byte-identical buffers.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sylva_core::prelude::*;
//!
//! let config = presets::preset("oak")?.with_seed("acorn");
//! let tree = generate(&config)?;
//!
//! println!("{} triangles", tree.stats.triangle_count);
//! ```
//!
//! ## Units and Conventions
//!
//! - **Distances**: Arbitrary units (typically interpreted as meters)
//! - **Angles**: Grammar and config angles are in **degrees**
//! - **Precision**: Skeleton math runs in `f64`, output buffers are `f32`
//! - **Coordinate system**: Right-handed, Y-up; the turtle grows along +Y

pub mod definition;
pub mod export;
pub mod geometry;
pub mod grammar;
pub mod math;
pub mod pipeline;
pub mod presets;
pub mod random;
pub mod turtle;

mod error;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    // Randomness
    pub use crate::random::SeededRandom;

    // Grammar
    pub use crate::grammar::{LSystem, LSystemConfig, Production, Rule, Symbol, generate_sentence};

    // Turtle
    pub use crate::turtle::{
        LeafPoint, Skeleton, SkeletonNode, SkeletonSegment, TurtleConfig, interpret,
    };

    // Geometry
    pub use crate::geometry::{
        BranchConfig, GeometryData, LeafInstanceConfig, LeafInstances, LeafShapeConfig,
    };

    // Pipeline
    pub use crate::pipeline::{TreeConfig, TreeOutput, TreeStats, generate};
    pub use crate::presets;

    // Export
    pub use crate::export::{ExportFormat, export_tree};

    // Math (re-export glam)
    pub use glam::{DQuat, DVec3, Mat4, Quat, Vec3};

    // Error handling
    pub use crate::{Error, Result};
}
