//! CPU-side geometry sources.

mod mesh;
mod sphere;

pub use mesh::TriMesh;
pub use sphere::Sphere;
