//! Branch tubes
//!
//! Every segment becomes an open tube: one vertex ring at each end, joined by
//! `2 * radial_segments` triangles. Rings are not shared between segments, so
//! each segment carries its own UVs.

use super::GeometryData;
use crate::math::{normalize_or_zero, push_vec2, push_vec3};
use crate::turtle::Skeleton;
use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Branch tube parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Vertices per ring (at least 3)
    pub radial_segments: u32,
    /// Texture `v` units per unit of branch length
    pub texture_scale: f64,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            radial_segments: 8,
            texture_scale: 1.0,
        }
    }
}

impl BranchConfig {
    pub fn with_radial_segments(mut self, radial_segments: u32) -> Self {
        self.radial_segments = radial_segments;
        self
    }

    pub fn with_texture_scale(mut self, texture_scale: f64) -> Self {
        self.texture_scale = texture_scale;
        self
    }
}

/// One circular cross-section
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ring {
    pub positions: Vec<DVec3>,
    pub normals: Vec<DVec3>,
}

/// Ring of `segments` vertices around `center`
///
/// The circle lies in the local XZ plane of `orientation`, perpendicular to
/// the turtle's forward axis. Normals point away from the center and have
/// unit length, or zero length if the orientation is degenerate.
pub fn generate_ring(center: DVec3, orientation: DQuat, radius: f64, segments: u32) -> Ring {
    let mut ring = Ring {
        positions: Vec::with_capacity(segments as usize),
        normals: Vec::with_capacity(segments as usize),
    };
    for i in 0..segments {
        let angle = f64::from(i) * TAU / f64::from(segments);
        let direction = orientation * DVec3::new(angle.cos(), 0.0, angle.sin());
        ring.positions.push(center + direction * radius);
        ring.normals.push(normalize_or_zero(direction));
    }
    ring
}

/// Triangle indices joining two rings of `segments` vertices into a tube
///
/// Emits `6 * segments` indices. The winding is fixed:
/// `(a[i], b[i], a[i+1])` then `(a[i+1], b[i], b[i+1])`, wrapping at the seam.
pub fn connect_rings(ring1_offset: u32, ring2_offset: u32, segments: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity(segments as usize * 6);
    for i in 0..segments {
        let next = (i + 1) % segments;
        let a = ring1_offset + i;
        let a_next = ring1_offset + next;
        let b = ring2_offset + i;
        let b_next = ring2_offset + next;
        indices.extend_from_slice(&[a, b, a_next, a_next, b, b_next]);
    }
    indices
}

/// Tubes for every segment of the skeleton
///
/// `v` accumulates along the segment list: segment `k` starts where the
/// running total of `length * texture_scale` over segments `0..k` ends.
pub fn build_branch_geometry(skeleton: &Skeleton, config: &BranchConfig) -> GeometryData {
    let n = config.radial_segments;
    let ring_len = n as usize;
    let mut geometry = GeometryData::new();
    let vertex_total = skeleton.segments.len() * ring_len * 2;
    geometry.positions.reserve(vertex_total * 3);
    geometry.normals.reserve(vertex_total * 3);
    geometry.uvs.reserve(vertex_total * 2);
    geometry.indices.reserve(skeleton.segments.len() * ring_len * 6);

    let mut v_offset = 0.0;
    for segment in &skeleton.segments {
        let (Some(start), Some(end)) = (skeleton.node(segment.start), skeleton.node(segment.end))
        else {
            tracing::warn!(
                start = segment.start,
                end = segment.end,
                "segment references a missing node"
            );
            continue;
        };

        let v_end = v_offset + segment.length * config.texture_scale;
        let rings = [
            (
                generate_ring(start.position, start.orientation, segment.start_radius, n),
                v_offset,
            ),
            (
                generate_ring(end.position, end.orientation, segment.end_radius, n),
                v_end,
            ),
        ];

        let ring1_offset = geometry.vertex_count() as u32;
        for (ring, v) in &rings {
            for (i, (position, normal)) in ring.positions.iter().zip(&ring.normals).enumerate() {
                push_vec3(&mut geometry.positions, *position);
                push_vec3(&mut geometry.normals, *normal);
                push_vec2(&mut geometry.uvs, DVec2::new(i as f64 / f64::from(n), *v));
            }
        }
        geometry
            .indices
            .extend(connect_rings(ring1_offset, ring1_offset + n, n));

        v_offset = v_end;
    }

    geometry
}
