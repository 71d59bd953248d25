//! Mesh buffers built from a skeleton
//!
//! Branches become one tube per segment; leaves become one shared quad-strip
//! shape plus per-instance transforms and colors.

mod branch;
mod leaf;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use branch::{BranchConfig, Ring, build_branch_geometry, connect_rings, generate_ring};
pub use leaf::{
    LeafInstanceConfig, LeafInstances, LeafShapeConfig, bake_leaf_instances, build_leaf_instances,
    build_leaf_shape,
};

/// Flat, render-ready triangle buffers
///
/// `positions` and `normals` hold 3 floats per vertex, `uvs` 2 floats per
/// vertex, `indices` 3 vertex slots per triangle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeometryData {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether the buffer lengths agree with each other and every index is in range
    pub fn has_valid_shape(&self) -> bool {
        let vertices = self.vertex_count();
        self.positions.len() % 3 == 0
            && self.normals.len() == self.positions.len()
            && self.uvs.len() == vertices * 2
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < vertices)
    }

    /// Append another mesh, re-basing its indices
    pub fn append(&mut self, other: &GeometryData) {
        let base = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|&i| i + base));
    }

    /// Axis-aligned bounds of all vertices, `None` when empty
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.is_empty() {
            return None;
        }
        let mut min = Vec3::splat(f32::MAX);
        let mut max = Vec3::splat(f32::MIN);
        for p in self.positions.chunks_exact(3) {
            let p = Vec3::new(p[0], p[1], p[2]);
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> GeometryData {
        GeometryData {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            uvs: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
        }
    }

    #[test]
    fn empty_geometry_is_valid() {
        let g = GeometryData::new();
        assert!(g.has_valid_shape());
        assert!(g.is_empty());
        assert_eq!(g.triangle_count(), 0);
        assert!(g.bounds().is_none());
    }

    #[test]
    fn append_rebases_indices() {
        let mut g = triangle();
        g.append(&triangle());
        assert_eq!(g.vertex_count(), 6);
        assert_eq!(g.indices, vec![0, 1, 2, 3, 4, 5]);
        assert!(g.has_valid_shape());
    }

    #[test]
    fn out_of_range_index_is_invalid() {
        let mut g = triangle();
        g.indices[2] = 3;
        assert!(!g.has_valid_shape());
    }

    #[test]
    fn bounds_cover_vertices() {
        let (min, max) = triangle().bounds().unwrap_or_default();
        assert_eq!(min, Vec3::ZERO);
        assert_eq!(max, Vec3::new(1.0, 1.0, 0.0));
    }
}
