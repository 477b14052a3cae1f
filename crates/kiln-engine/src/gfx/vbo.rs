use std::rc::Rc;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Shared handle to a [`Vbo`]. The GPU buffer is released with the last clone.
pub type VboRef = Rc<Vbo>;

/// Immutable GPU vertex buffer.
#[derive(Debug)]
pub struct Vbo {
    buffer: wgpu::Buffer,
    len: u32,
    size: u64,
}

impl Vbo {
    /// Uploads `data` once; the buffer is never written again.
    pub fn create<T: Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> VboRef {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });
        log::debug!("vbo '{label}': {} elements, {} bytes", data.len(), bytes.len());

        Rc::new(Self {
            buffer,
            len: data.len() as u32,
            size: bytes.len() as u64,
        })
    }

    /// Number of elements uploaded.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub(crate) fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}
