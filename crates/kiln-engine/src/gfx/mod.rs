//! GPU resource handles: vertex buffers, meshes, shader programs and batches.

mod batch;
mod layout;
mod mesh;
mod program;
mod vbo;

pub use batch::{AttribMapping, Batch, BatchError, DrawCall};
pub use layout::{Attrib, AttribFormat, BufferLayout, StepMode};
pub use mesh::VboMesh;
pub use program::{Program, ProgramFormat, ProgramInput};
pub use vbo::{Vbo, VboRef};
