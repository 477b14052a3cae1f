use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::TriMesh;

/// Largest segment count whose vertex count still fits `u16` indices.
const MAX_SEGMENTS: u32 = 256;

/// UV sphere description.
///
/// `subdivisions` is the number of segments around the equator; the number of
/// latitude rings follows from it (`segments / 2 + 1`).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Sphere {
    pub radius: f32,
    pub subdivisions: u32,
}

impl Default for Sphere {
    fn default() -> Self {
        Self { radius: 1.0, subdivisions: 18 }
    }
}

impl Sphere {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn subdivisions(mut self, subdivisions: u32) -> Self {
        self.subdivisions = subdivisions;
        self
    }

    pub fn segments(&self) -> u32 {
        self.subdivisions.clamp(3, MAX_SEGMENTS)
    }

    pub fn rings(&self) -> u32 {
        self.segments() / 2 + 1
    }

    pub fn to_mesh(&self) -> TriMesh {
        let segments = self.segments();
        let rings = self.rings();
        let stride = segments + 1;

        let vertex_count = (stride * rings) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);

        for r in 0..rings {
            let theta = PI * r as f32 / (rings - 1) as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            for s in 0..=segments {
                let phi = TAU * s as f32 / segments as f32;
                let (sin_p, cos_p) = phi.sin_cos();
                let n = Vec3::new(sin_t * cos_p, cos_t, sin_t * sin_p);
                normals.push(n);
                positions.push(n * self.radius);
            }
        }

        // First ring is the north pole, last ring the south pole; the triangle
        // touching a pole from each quad is degenerate and dropped.
        let mut indices = Vec::with_capacity((6 * segments * (rings - 2)) as usize);
        for r in 0..rings - 1 {
            for s in 0..segments {
                let i0 = (r * stride + s) as u16;
                let i1 = i0 + 1;
                let i2 = i0 + stride as u16;
                let i3 = i2 + 1;

                if r != 0 {
                    indices.extend_from_slice(&[i0, i1, i2]);
                }
                if r + 1 != rings - 1 {
                    indices.extend_from_slice(&[i1, i3, i2]);
                }
            }
        }

        TriMesh { positions, normals, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(subdivisions: u32) -> TriMesh {
        Sphere::new().radius(0.5).subdivisions(subdivisions).to_mesh()
    }

    // ── counts ────────────────────────────────────────────────────────────

    #[test]
    fn subdivision_8_counts() {
        let m = mesh(8);
        assert_eq!(m.num_vertices(), 9 * 5);
        assert_eq!(m.num_triangles(), 2 * 8 * 3);
        assert_eq!(m.num_indices(), 144);
        assert_eq!(m.normals.len(), m.positions.len());
    }

    #[test]
    fn low_subdivisions_are_raised_to_three_segments() {
        let s = Sphere::new().subdivisions(0);
        assert_eq!(s.segments(), 3);
        assert_eq!(s.rings(), 2);
        let m = s.to_mesh();
        assert_eq!(m.num_vertices(), 8);
        // Two pole rings only: every band triangle touches a pole.
        assert_eq!(m.num_triangles(), 0);
    }

    #[test]
    fn high_subdivisions_fit_u16() {
        let m = Sphere::new().subdivisions(10_000).to_mesh();
        assert!(m.num_vertices() <= u16::MAX as usize + 1);
        let max = m.indices.iter().copied().max().unwrap_or(0) as usize;
        assert!(max < m.num_vertices());
    }

    // ── shape ─────────────────────────────────────────────────────────────

    #[test]
    fn normals_are_unit_and_positions_on_radius() {
        let m = mesh(12);
        for (p, n) in m.positions.iter().zip(&m.normals) {
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!((p.length() - 0.5).abs() < 1e-5);
        }
    }

    #[test]
    fn triangles_wind_ccw_outward() {
        let m = mesh(8);
        for [a, b, c] in m.triangles() {
            let (a, b, c) = (m.positions[a as usize], m.positions[b as usize], m.positions[c as usize]);
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0, "inward triangle {a} {b} {c}");
        }
    }

    #[test]
    fn interleaved_matches_attributes() {
        let m = mesh(4);
        let v = m.interleaved();
        assert_eq!(v.len(), m.num_vertices());
        assert_eq!(v[3][..3], m.positions[3].to_array());
        assert_eq!(v[3][3..], m.normals[3].to_array());
    }
}
