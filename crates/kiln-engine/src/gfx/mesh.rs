use wgpu::util::DeviceExt;

use crate::geom::TriMesh;

use super::{Attrib, AttribFormat, BufferLayout, Vbo, VboRef};

/// Indexed GPU mesh: one interleaved `position, normal` buffer, a `u16` index
/// buffer, and any number of appended attribute streams.
#[derive(Debug)]
pub struct VboMesh {
    vertex_layout: BufferLayout,
    vertices: VboRef,
    indices: wgpu::Buffer,
    num_indices: u32,
    appended: Vec<(BufferLayout, VboRef)>,
}

impl VboMesh {
    pub fn create(device: &wgpu::Device, mesh: &TriMesh) -> Self {
        let vertex_layout = BufferLayout::per_vertex()
            .append(Attrib::Position, AttribFormat::Float32x3)
            .append(Attrib::Normal, AttribFormat::Float32x3);

        let vertices = Vbo::create(device, "kiln mesh vertices", &mesh.interleaved());
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("kiln mesh indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::info!(
            "mesh: {} vertices, {} indices",
            mesh.num_vertices(),
            mesh.num_indices()
        );

        Self {
            vertex_layout,
            vertices,
            indices,
            num_indices: mesh.num_indices() as u32,
            appended: Vec::new(),
        }
    }

    /// Adds another vertex stream, bound after the base geometry buffer.
    pub fn append_vbo(&mut self, layout: BufferLayout, vbo: VboRef) {
        if vbo.size() % layout.stride().max(1) != 0 {
            log::warn!(
                "appended vbo size {} is not a multiple of layout stride {}",
                vbo.size(),
                layout.stride()
            );
        }
        self.appended.push((layout, vbo));
    }

    pub fn num_vertices(&self) -> u32 {
        self.vertices.len()
    }

    pub fn num_indices(&self) -> u32 {
        self.num_indices
    }

    /// Layouts in binding order (base geometry first).
    pub fn layouts(&self) -> impl Iterator<Item = &BufferLayout> + '_ {
        std::iter::once(&self.vertex_layout).chain(self.appended.iter().map(|(l, _)| l))
    }

    pub(crate) fn vertex_buffers(&self) -> impl Iterator<Item = &wgpu::Buffer> + '_ {
        std::iter::once(self.vertices.buffer()).chain(self.appended.iter().map(|(_, v)| v.buffer()))
    }

    pub(crate) fn index_buffer(&self) -> &wgpu::Buffer {
        &self.indices
    }
}
