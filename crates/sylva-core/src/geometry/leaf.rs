//! Instanced leaves
//!
//! One curved quad strip is shared by every leaf. Each `LeafPoint` becomes a
//! 4x4 transform and an RGB color drawn from a random stream of its own, so
//! changing leaf settings never disturbs the branch structure of a seed.

use super::GeometryData;
use crate::math::{normalize_or_zero, normalize_quat_or_identity, push_mat4, push_vec2, push_vec3};
use crate::random::SeededRandom;
use crate::turtle::LeafPoint;
use glam::{DMat4, DQuat, DVec2, DVec3, EulerRot, Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Shape of the shared leaf mesh
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafShapeConfig {
    pub width: f64,
    pub length: f64,
    /// Backward bow of the tip, as a fraction of `length`
    pub curvature: f64,
    /// Rows of quads along the length (at least 1)
    pub segments: u32,
}

impl Default for LeafShapeConfig {
    fn default() -> Self {
        Self {
            width: 0.3,
            length: 0.5,
            curvature: 0.2,
            segments: 3,
        }
    }
}

/// Per-instance variation of leaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafInstanceConfig {
    /// Uniform scale applied to every leaf
    pub scale: f64,
    /// Size multiplier range, `1 ± size_variation`
    pub size_variation: f64,
    /// Scatter around each axis, in degrees
    pub rotation_variation: f64,
    pub base_color: [f64; 3],
    /// Independent perturbation per color channel
    pub color_variation: f64,
    /// Appended to the tree seed to seed the leaf stream
    pub seed_suffix: String,
}

impl Default for LeafInstanceConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            size_variation: 0.2,
            rotation_variation: 15.0,
            base_color: [0.24, 0.52, 0.16],
            color_variation: 0.06,
            seed_suffix: "-leaves".into(),
        }
    }
}

impl LeafInstanceConfig {
    pub fn with_base_color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.base_color = [r, g, b];
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

/// Packed per-instance data: column-major 4x4 matrices and RGB triples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeafInstances {
    pub matrices: Vec<f32>,
    pub colors: Vec<f32>,
    pub count: usize,
}

impl LeafInstances {
    /// Transform of instance `index`
    pub fn matrix(&self, index: usize) -> Option<Mat4> {
        let cols = self.matrices.get(index * 16..index * 16 + 16)?;
        Some(Mat4::from_cols_slice(cols))
    }

    /// Color of instance `index`
    pub fn color(&self, index: usize) -> Option<[f32; 3]> {
        let rgb = self.colors.get(index * 3..index * 3 + 3)?;
        Some([rgb[0], rgb[1], rgb[2]])
    }
}

/// Build the shared leaf quad strip
///
/// Rows run from the stem (`y = 0`) to the tip (`y = length`) and bow back
/// along +Z as `curvature * t² * length`.
pub fn build_leaf_shape(config: &LeafShapeConfig) -> GeometryData {
    let segments = config.segments.max(1);
    let half_width = config.width * 0.5;
    let mut geometry = GeometryData::new();

    for row in 0..=segments {
        let t = f64::from(row) / f64::from(segments);
        let y = t * config.length;
        let z = config.curvature * t * t * config.length;

        let along = DVec3::new(0.0, 1.0, 2.0 * config.curvature * t);
        let normal = normalize_or_zero(DVec3::X.cross(along));

        for (x, u) in [(-half_width, 0.0), (half_width, 1.0)] {
            push_vec3(&mut geometry.positions, DVec3::new(x, y, z));
            push_vec3(&mut geometry.normals, normal);
            push_vec2(&mut geometry.uvs, DVec2::new(u, t));
        }
    }

    for row in 0..segments {
        let a = row * 2;
        let (b, c, d) = (a + 1, a + 2, a + 3);
        geometry.indices.extend_from_slice(&[a, b, c, b, d, c]);
    }

    geometry
}

/// Per-leaf transforms and colors
///
/// Draw order per leaf is fixed: size multiplier, scatter around X, Y, Z,
/// then the red, green and blue perturbations.
pub fn build_leaf_instances(
    leaves: &[LeafPoint],
    seed: &str,
    config: &LeafInstanceConfig,
) -> LeafInstances {
    let mut instances = LeafInstances {
        matrices: Vec::with_capacity(leaves.len() * 16),
        colors: Vec::with_capacity(leaves.len() * 3),
        count: leaves.len(),
    };
    if leaves.is_empty() {
        return instances;
    }

    let mut rng = SeededRandom::new(&format!("{seed}{}", config.seed_suffix));
    let spread = config.rotation_variation;

    for leaf in leaves {
        let size_factor = rng.random_range(1.0 - config.size_variation, 1.0 + config.size_variation);
        let rx = rng.random_range(-spread, spread).to_radians();
        let ry = rng.random_range(-spread, spread).to_radians();
        let rz = rng.random_range(-spread, spread).to_radians();

        let scatter = DQuat::from_euler(EulerRot::XYZ, rx, ry, rz);
        let rotation = normalize_quat_or_identity(leaf.orientation * scatter);
        let scale = leaf.size * size_factor * config.scale;
        let transform =
            DMat4::from_scale_rotation_translation(DVec3::splat(scale), rotation, leaf.position);
        push_mat4(&mut instances.matrices, &transform);

        for channel in config.base_color {
            let jitter = rng.random_range(-config.color_variation, config.color_variation);
            instances.colors.push((channel + jitter).clamp(0.0, 1.0) as f32);
        }
    }

    instances
}

/// Expand instanced leaves into one concrete mesh
pub fn bake_leaf_instances(shape: &GeometryData, instances: &LeafInstances) -> GeometryData {
    let mut baked = GeometryData::new();
    for index in 0..instances.count {
        let Some(transform) = instances.matrix(index) else {
            break;
        };
        let base = baked.vertex_count() as u32;
        for p in shape.positions.chunks_exact(3) {
            let p = transform.transform_point3(Vec3::new(p[0], p[1], p[2]));
            baked.positions.extend_from_slice(&p.to_array());
        }
        for n in shape.normals.chunks_exact(3) {
            let n = transform
                .transform_vector3(Vec3::new(n[0], n[1], n[2]))
                .normalize_or_zero();
            baked.normals.extend_from_slice(&n.to_array());
        }
        baked.uvs.extend_from_slice(&shape.uvs);
        baked.indices.extend(shape.indices.iter().map(|&i| i + base));
    }
    baked
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn leaf_at(y: f64) -> LeafPoint {
        LeafPoint {
            position: DVec3::new(0.0, y, 0.0),
            orientation: DQuat::IDENTITY,
            size: 1.0,
        }
    }

    #[test]
    fn shape_has_two_vertices_per_row() {
        let config = LeafShapeConfig {
            segments: 4,
            ..LeafShapeConfig::default()
        };
        let shape = build_leaf_shape(&config);
        assert_eq!(shape.vertex_count(), 10);
        assert_eq!(shape.triangle_count(), 8);
        assert!(shape.has_valid_shape());
    }

    #[test]
    fn shape_bows_backward_at_tip() {
        let config = LeafShapeConfig {
            width: 1.0,
            length: 2.0,
            curvature: 0.5,
            segments: 2,
        };
        let shape = build_leaf_shape(&config);
        let tip = crate::math::read_vec3(&shape.positions, 5);
        assert_relative_eq!(tip.x, 0.5, epsilon = 1e-6);
        assert_relative_eq!(tip.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(tip.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn flat_leaf_faces_forward_z() {
        let config = LeafShapeConfig {
            curvature: 0.0,
            ..LeafShapeConfig::default()
        };
        let shape = build_leaf_shape(&config);
        for n in shape.normals.chunks_exact(3) {
            assert_eq!(n, &[0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn curved_leaf_normals_are_unit_length() {
        let shape = build_leaf_shape(&LeafShapeConfig::default());
        for i in 0..shape.vertex_count() {
            let n = crate::math::read_vec3(&shape.normals, i);
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn no_leaves_no_instances() {
        let instances = build_leaf_instances(&[], "seed", &LeafInstanceConfig::default());
        assert_eq!(instances.count, 0);
        assert!(instances.matrices.is_empty());
        assert!(instances.colors.is_empty());
    }

    #[test]
    fn instances_are_packed() {
        let leaves = [leaf_at(1.0), leaf_at(2.0), leaf_at(3.0)];
        let instances = build_leaf_instances(&leaves, "seed", &LeafInstanceConfig::default());
        assert_eq!(instances.count, 3);
        assert_eq!(instances.matrices.len(), 48);
        assert_eq!(instances.colors.len(), 9);
        assert!(instances.colors.iter().all(|c| (0.0..=1.0).contains(c)));

        let m = instances.matrix(1).unwrap_or_default();
        assert_relative_eq!(m.w_axis.y, 2.0, epsilon = 1e-6);
        assert!(instances.matrix(3).is_none());
    }

    #[test]
    fn without_variation_leaves_keep_base_transform() {
        let config = LeafInstanceConfig {
            size_variation: 0.0,
            rotation_variation: 0.0,
            color_variation: 0.0,
            ..LeafInstanceConfig::default()
        };
        let mut leaf = leaf_at(4.0);
        leaf.size = 2.0;
        let instances = build_leaf_instances(&[leaf], "calm", &config);

        let m = instances.matrix(0).unwrap_or_default();
        assert_relative_eq!(m.x_axis.x, 2.0, epsilon = 1e-6);
        assert_relative_eq!(m.y_axis.y, 2.0, epsilon = 1e-6);
        let color = instances.color(0).unwrap_or_default();
        assert_relative_eq!(color[1], 0.52, epsilon = 1e-6);
    }

    #[test]
    fn colors_clamp_to_unit_range() {
        let config = LeafInstanceConfig {
            base_color: [0.0, 1.0, 0.5],
            color_variation: 2.0,
            ..LeafInstanceConfig::default()
        };
        let leaves: Vec<LeafPoint> = (0..50).map(|i| leaf_at(f64::from(i))).collect();
        let instances = build_leaf_instances(&leaves, "loud", &config);
        assert!(instances.colors.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn leaf_stream_depends_on_suffix() {
        let leaves = [leaf_at(1.0)];
        let a = build_leaf_instances(&leaves, "seed", &LeafInstanceConfig::default());
        let b = build_leaf_instances(&leaves, "seed", &LeafInstanceConfig::default());
        assert_eq!(a, b);

        let other = LeafInstanceConfig {
            seed_suffix: "-other".into(),
            ..LeafInstanceConfig::default()
        };
        let c = build_leaf_instances(&leaves, "seed", &other);
        assert_ne!(a.matrices, c.matrices);
    }

    #[test]
    fn baking_places_copies_of_shape() {
        let shape = build_leaf_shape(&LeafShapeConfig::default());
        let leaves = [leaf_at(0.0), leaf_at(5.0)];
        let instances = build_leaf_instances(&leaves, "bake", &LeafInstanceConfig::default());
        let baked = bake_leaf_instances(&shape, &instances);

        assert_eq!(baked.vertex_count(), shape.vertex_count() * 2);
        assert_eq!(baked.triangle_count(), shape.triangle_count() * 2);
        assert!(baked.has_valid_shape());
    }
}
