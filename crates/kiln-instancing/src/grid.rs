use glam::{UVec3, Vec3};

/// Grid of sphere instances.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridConfig {
    /// Instances per axis.
    pub counts: UVec3,
    /// Size of the volume the grid fills, centered on the origin.
    pub extents: Vec3,
    pub sphere_radius: f32,
    pub sphere_subdivisions: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            counts: UVec3::splat(50),
            extents: Vec3::splat(10.0),
            sphere_radius: 0.01,
            sphere_subdivisions: 8,
        }
    }
}

impl GridConfig {
    pub fn instance_count(&self) -> u32 {
        self.counts.x * self.counts.y * self.counts.z
    }
}

/// Per-instance attribute arrays; index `i` of both refers to the same sphere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceData {
    pub positions: Vec<Vec3>,
    pub colors: Vec<Vec3>,
}

impl InstanceData {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Lays out one instance per grid cell, at the cell center.
///
/// Iteration is `y` outer, `z` middle, `x` inner. Colors encode the cell index
/// normalized per axis: red from `y`, green from `z`, blue from `x`.
pub fn build_instances(config: &GridConfig) -> InstanceData {
    let n = config.counts;
    let half = config.extents * 0.5;
    let total = config.instance_count() as usize;

    let mut positions = Vec::with_capacity(total);
    let mut colors = Vec::with_capacity(total);

    for y in 0..n.y {
        for z in 0..n.z {
            for x in 0..n.x {
                let index = Vec3::new(x as f32, y as f32, z as f32);
                let t = (index + 0.5) / n.as_vec3();
                positions.push(-half + t * config.extents);
                colors.push(Vec3::new(y as f32 / n.y as f32, z as f32 / n.z as f32, x as f32 / n.x as f32));
            }
        }
    }

    InstanceData { positions, colors }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> GridConfig {
        GridConfig { counts: UVec3::splat(2), ..GridConfig::default() }
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn default_grid_has_one_instance_per_cell() {
        let config = GridConfig::default();
        let data = build_instances(&config);
        assert_eq!(config.instance_count(), 125_000);
        assert_eq!(data.positions.len(), 125_000);
        assert_eq!(data.colors.len(), data.positions.len());
    }

    #[test]
    fn positions_follow_nesting_order() {
        let config = GridConfig { counts: UVec3::new(4, 3, 5), extents: Vec3::new(8.0, 6.0, 10.0), ..GridConfig::default() };
        let data = build_instances(&config);
        let half = config.extents * 0.5;
        let n = config.counts;

        let mut i = 0;
        for y in 0..n.y {
            for z in 0..n.z {
                for x in 0..n.x {
                    let p = data.positions[i];
                    let expected = Vec3::new(
                        -half.x + (x as f32 + 0.5) / n.x as f32 * config.extents.x,
                        -half.y + (y as f32 + 0.5) / n.y as f32 * config.extents.y,
                        -half.z + (z as f32 + 0.5) / n.z as f32 * config.extents.z,
                    );
                    assert!(p.abs_diff_eq(expected, 1e-5), "instance {i}: {p} != {expected}");
                    assert!(p.abs().cmple(half).all());
                    i += 1;
                }
            }
        }
    }

    #[test]
    fn colors_are_in_unit_range() {
        let data = build_instances(&GridConfig::default());
        for c in &data.colors {
            assert!(c.cmpge(Vec3::ZERO).all() && c.cmplt(Vec3::ONE).all(), "{c}");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let config = GridConfig::default();
        assert_eq!(build_instances(&config), build_instances(&config));
    }

    // ── 2×2×2 ─────────────────────────────────────────────────────────────

    #[test]
    fn two_by_two_corners() {
        let config = small();
        let data = build_instances(&config);
        let half = config.extents * 0.5;

        assert_eq!(data.len(), 8);
        assert!(data.positions[0].abs_diff_eq(-half * 0.5, 1e-6));
        assert_eq!(data.colors[0], Vec3::ZERO);

        assert!(data.positions[7].abs_diff_eq(half * 0.5, 1e-6));
        assert_eq!(data.colors[7], Vec3::splat(0.5));
    }

    #[test]
    fn color_channels_map_y_z_x() {
        let data = build_instances(&small());
        // index 1: x = 1; index 2: z = 1; index 4: y = 1
        assert_eq!(data.colors[1], Vec3::new(0.0, 0.0, 0.5));
        assert_eq!(data.colors[2], Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(data.colors[4], Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn empty_axis_yields_no_instances() {
        let config = GridConfig { counts: UVec3::new(3, 0, 3), ..GridConfig::default() };
        assert!(build_instances(&config).is_empty());
    }
}
