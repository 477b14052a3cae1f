use glam::Vec3;

/// CPU-side indexed triangle list with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u16>,
}

impl TriMesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_indices(&self) -> usize {
        self.indices.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as vertex-index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u16; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Interleaves `position, normal` into the per-vertex layout uploaded to the GPU.
    pub fn interleaved(&self) -> Vec<[f32; 6]> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| [p.x, p.y, p.z, n.x, n.y, n.z])
            .collect()
    }
}
