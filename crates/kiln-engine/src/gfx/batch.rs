use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::camera::{CameraPersp, CameraUniforms};
use crate::render::{RenderTarget, TargetFormats};

use super::{Attrib, BufferLayout, Program, ProgramInput, StepMode, VboMesh};

/// Maps mesh attributes to shader input names.
///
/// `Position` and `Normal` default to `"position"` and `"normal"`; a custom
/// attribute defaults to its own name.
#[derive(Debug, Clone)]
pub struct AttribMapping {
    names: HashMap<Attrib, String>,
}

impl Default for AttribMapping {
    fn default() -> Self {
        let mut names = HashMap::new();
        names.insert(Attrib::Position, "position".to_owned());
        names.insert(Attrib::Normal, "normal".to_owned());
        Self { names }
    }
}

impl AttribMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, attrib: Attrib, input: impl Into<String>) -> Self {
        self.names.insert(attrib, input.into());
        self
    }

    pub fn input_name<'a>(&'a self, attrib: &'a Attrib) -> &'a str {
        match (self.names.get(attrib), attrib) {
            (Some(name), _) => name.as_str(),
            (None, Attrib::Custom(name)) => name.as_str(),
            (None, Attrib::Position) => "position",
            (None, Attrib::Normal) => "normal",
        }
    }
}

/// Why a mesh and a program could not be bound together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// A mesh attribute maps to a name the program does not declare.
    UnknownInput { attrib: Attrib, input: String },
    /// The program declares an input no mesh stream provides.
    MissingInput { input: String },
    /// Two mesh attributes map to the same program input.
    DuplicateInput { input: String },
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchError::UnknownInput { attrib, input } => {
                write!(f, "mesh attribute {attrib} maps to undeclared shader input '{input}'")
            }
            BatchError::MissingInput { input } => {
                write!(f, "shader input '{input}' is not provided by any mesh buffer")
            }
            BatchError::DuplicateInput { input } => {
                write!(f, "shader input '{input}' is fed by more than one mesh attribute")
            }
        }
    }
}

impl std::error::Error for BatchError {}

/// One vertex buffer layout resolved against a program's input locations.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedLayout {
    pub array_stride: u64,
    pub step_mode: StepMode,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl ResolvedLayout {
    fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode.to_wgpu(),
            attributes: &self.attributes,
        }
    }
}

/// Resolves every attribute of `layouts` to a shader location through `mapping`.
pub(crate) fn resolve_layouts<'a>(
    layouts: impl IntoIterator<Item = &'a BufferLayout>,
    inputs: &[ProgramInput],
    mapping: &AttribMapping,
) -> Result<Vec<ResolvedLayout>, BatchError> {
    let mut fed: Vec<&str> = Vec::new();
    let mut resolved = Vec::new();

    for layout in layouts {
        let mut attributes = Vec::new();
        for (attrib, format, offset) in layout.attribs() {
            let name = mapping.input_name(attrib);
            let Some(input) = inputs.iter().find(|i| i.name == name) else {
                return Err(BatchError::UnknownInput {
                    attrib: attrib.clone(),
                    input: name.to_owned(),
                });
            };
            if fed.contains(&name) {
                return Err(BatchError::DuplicateInput { input: name.to_owned() });
            }
            fed.push(name);

            attributes.push(wgpu::VertexAttribute {
                format: format.to_wgpu(),
                offset,
                shader_location: input.location,
            });
        }
        resolved.push(ResolvedLayout {
            array_stride: layout.stride(),
            step_mode: layout.step_mode(),
            attributes,
        });
    }

    if let Some(missing) = inputs.iter().find(|i| !fed.contains(&i.name.as_str())) {
        return Err(BatchError::MissingInput { input: missing.name.clone() });
    }

    Ok(resolved)
}

/// Parameters of one indexed draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawCall {
    pub indices: Range<u32>,
    pub base_vertex: i32,
    pub instances: Range<u32>,
}

impl DrawCall {
    /// All `index_count` indices, `instance_count` instances starting at 0.
    pub fn indexed(index_count: u32, instance_count: u32) -> Self {
        Self {
            indices: 0..index_count,
            base_vertex: 0,
            instances: 0..instance_count,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }
}

/// A mesh bound to a program through a render pipeline, plus its camera uniforms.
#[derive(Debug)]
pub struct Batch {
    mesh: VboMesh,
    program: Program,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Batch {
    pub fn create(
        device: &wgpu::Device,
        targets: TargetFormats,
        mesh: VboMesh,
        program: Program,
        mapping: &AttribMapping,
    ) -> Result<Self, BatchError> {
        let resolved = resolve_layouts(mesh.layouts(), program.inputs(), mapping)?;
        let buffers: Vec<wgpu::VertexBufferLayout<'_>> =
            resolved.iter().map(ResolvedLayout::as_wgpu).collect();

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("kiln batch pipeline layout"),
            bind_group_layouts: &[program.uniform_layout()],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(program.label()),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: program.module(),
                entry_point: Some(program.vertex_entry()),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: Some(wgpu::FragmentState {
                module: program.module(),
                entry_point: Some(program.fragment_entry()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: targets.color,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: targets.depth,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("kiln camera ubo"),
            contents: bytemuck::bytes_of(&CameraUniforms::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("kiln camera bind group"),
            layout: program.uniform_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            mesh,
            program,
            pipeline,
            uniform_buffer,
            bind_group,
        })
    }

    pub fn mesh(&self) -> &VboMesh {
        &self.mesh
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Uploads the camera's view-projection and normal matrices.
    pub fn set_matrices(&self, queue: &wgpu::Queue, camera: &CameraPersp) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&camera.uniforms()));
    }

    /// Draw covering the whole mesh, `instance_count` times.
    pub fn draw_call(&self, instance_count: u32) -> DrawCall {
        DrawCall::indexed(self.mesh.num_indices(), instance_count)
    }

    pub fn draw(&self, target: &mut RenderTarget<'_>, call: DrawCall) {
        let mut rpass = target.begin_load_pass("kiln batch pass");
        rpass.set_pipeline(&self.pipeline);
        rpass.set_bind_group(0, &self.bind_group, &[]);
        for (slot, buffer) in self.mesh.vertex_buffers().enumerate() {
            rpass.set_vertex_buffer(slot as u32, buffer.slice(..));
        }
        rpass.set_index_buffer(self.mesh.index_buffer().slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(call.indices, call.base_vertex, call.instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::AttribFormat;

    fn base() -> BufferLayout {
        BufferLayout::per_vertex()
            .append(Attrib::Position, AttribFormat::Float32x3)
            .append(Attrib::Normal, AttribFormat::Float32x3)
    }

    fn instance(name: &str) -> BufferLayout {
        BufferLayout::per_instance().append(Attrib::custom(name), AttribFormat::Float32x3)
    }

    fn inputs(names: &[&str]) -> Vec<ProgramInput> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ProgramInput { name: (*n).to_owned(), location: i as u32 })
            .collect()
    }

    // ── mapping ───────────────────────────────────────────────────────────

    #[test]
    fn default_mapping_names() {
        let m = AttribMapping::new();
        assert_eq!(m.input_name(&Attrib::Position), "position");
        assert_eq!(m.input_name(&Attrib::Normal), "normal");
        assert_eq!(m.input_name(&Attrib::custom("offset")), "offset");

        let m = m.map(Attrib::custom("offset"), "iOffset");
        assert_eq!(m.input_name(&Attrib::custom("offset")), "iOffset");
    }

    // ── resolution ────────────────────────────────────────────────────────

    #[test]
    fn resolves_base_and_instance_streams() {
        let layouts = [base(), instance("vInstancePosition"), instance("vInstanceColor")];
        let ins = inputs(&["position", "normal", "vInstancePosition", "vInstanceColor"]);
        let resolved = resolve_layouts(&layouts, &ins, &AttribMapping::new()).unwrap();

        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0].array_stride, 24);
        assert_eq!(resolved[0].step_mode, StepMode::PerVertex);
        assert_eq!(resolved[0].attributes[1].offset, 12);
        assert_eq!(resolved[0].attributes[1].shader_location, 1);
        assert_eq!(resolved[2].step_mode, StepMode::PerInstance);
        assert_eq!(resolved[2].attributes[0].shader_location, 3);
    }

    #[test]
    fn explicit_mapping_redirects_location() {
        let layouts = [base(), instance("offset")];
        let ins = inputs(&["position", "normal", "iOffset"]);
        let mapping = AttribMapping::new().map(Attrib::custom("offset"), "iOffset");
        let resolved = resolve_layouts(&layouts, &ins, &mapping).unwrap();
        assert_eq!(resolved[1].attributes[0].shader_location, 2);
    }

    #[test]
    fn unknown_input_is_rejected() {
        let layouts = [base(), instance("vInstancePositon")];
        let ins = inputs(&["position", "normal", "vInstancePosition"]);
        let err = resolve_layouts(&layouts, &ins, &AttribMapping::new()).unwrap_err();
        assert_eq!(
            err,
            BatchError::UnknownInput {
                attrib: Attrib::custom("vInstancePositon"),
                input: "vInstancePositon".into(),
            }
        );
    }

    #[test]
    fn missing_input_is_rejected() {
        let layouts = [base()];
        let ins = inputs(&["position", "normal", "vInstanceColor"]);
        let err = resolve_layouts(&layouts, &ins, &AttribMapping::new()).unwrap_err();
        assert_eq!(err, BatchError::MissingInput { input: "vInstanceColor".into() });
        assert!(err.to_string().contains("vInstanceColor"));
    }

    #[test]
    fn duplicate_input_is_rejected() {
        let layouts = [base(), instance("a"), instance("b")];
        let ins = inputs(&["position", "normal", "shared"]);
        let mapping = AttribMapping::new()
            .map(Attrib::custom("a"), "shared")
            .map(Attrib::custom("b"), "shared");
        let err = resolve_layouts(&layouts, &ins, &mapping).unwrap_err();
        assert_eq!(err, BatchError::DuplicateInput { input: "shared".into() });
    }

    // ── draw call ─────────────────────────────────────────────────────────

    #[test]
    fn indexed_draw_call_ranges() {
        let call = DrawCall::indexed(144, 125_000);
        assert_eq!(call.indices, 0..144);
        assert_eq!(call.base_vertex, 0);
        assert_eq!(call.instance_count(), 125_000);
    }
}
