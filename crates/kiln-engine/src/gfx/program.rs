use std::borrow::Cow;

use crate::camera::CameraUniforms;

/// A vertex input declared by a shader: `@location(location) name`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ProgramInput {
    pub name: String,
    pub location: u32,
}

/// Shader source plus the metadata needed to bind it.
///
/// WGSL has no reflection API in wgpu, so vertex inputs are declared
/// alongside the source and must match its `@location` attributes.
#[derive(Debug, Clone)]
pub struct ProgramFormat {
    label: String,
    source: String,
    vertex_entry: String,
    fragment_entry: String,
    inputs: Vec<ProgramInput>,
}

impl ProgramFormat {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            label: "kiln program".to_owned(),
            source: source.into(),
            vertex_entry: "vs_main".to_owned(),
            fragment_entry: "fs_main".to_owned(),
            inputs: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn vertex_entry(mut self, entry: impl Into<String>) -> Self {
        self.vertex_entry = entry.into();
        self
    }

    pub fn fragment_entry(mut self, entry: impl Into<String>) -> Self {
        self.fragment_entry = entry.into();
        self
    }

    pub fn vertex_input(mut self, name: impl Into<String>, location: u32) -> Self {
        self.inputs.push(ProgramInput { name: name.into(), location });
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn inputs(&self) -> &[ProgramInput] {
        &self.inputs
    }
}

/// Compiled shader module with its declared inputs and the camera uniform layout
/// (group 0, binding 0, [`CameraUniforms`]).
///
/// Compile errors are raised by wgpu's device error handler.
#[derive(Debug)]
pub struct Program {
    label: String,
    module: wgpu::ShaderModule,
    vertex_entry: String,
    fragment_entry: String,
    inputs: Vec<ProgramInput>,
    uniform_layout: wgpu::BindGroupLayout,
}

impl Program {
    pub fn create(device: &wgpu::Device, format: ProgramFormat) -> Self {
        let ProgramFormat { label, source, vertex_entry, fragment_entry, inputs } = format;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&label),
            source: wgpu::ShaderSource::Wgsl(Cow::Owned(source)),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("kiln camera bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<CameraUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        log::debug!("program '{label}': {} vertex inputs", inputs.len());

        Self {
            label,
            module,
            vertex_entry,
            fragment_entry,
            inputs,
            uniform_layout,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn inputs(&self) -> &[ProgramInput] {
        &self.inputs
    }

    pub fn input_location(&self, name: &str) -> Option<u32> {
        self.inputs.iter().find(|i| i.name == name).map(|i| i.location)
    }

    pub(crate) fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    pub(crate) fn vertex_entry(&self) -> &str {
        &self.vertex_entry
    }

    pub(crate) fn fragment_entry(&self) -> &str {
        &self.fragment_entry
    }

    pub(crate) fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_builder_collects_inputs_in_order() {
        let fmt = ProgramFormat::new("// wgsl")
            .label("test")
            .vertex_input("position", 0)
            .vertex_input("normal", 1);

        assert_eq!(fmt.source(), "// wgsl");
        assert_eq!(
            fmt.inputs(),
            &[
                ProgramInput { name: "position".into(), location: 0 },
                ProgramInput { name: "normal".into(), location: 1 },
            ]
        );
    }
}
