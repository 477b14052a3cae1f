use std::fmt;

/// Semantic vertex attribute identifier.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Attrib {
    Position,
    Normal,
    /// App-defined attribute, usually fed by an appended per-instance buffer.
    Custom(String),
}

impl Attrib {
    pub fn custom(name: impl Into<String>) -> Self {
        Attrib::Custom(name.into())
    }
}

impl fmt::Display for Attrib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attrib::Position => f.write_str("POSITION"),
            Attrib::Normal => f.write_str("NORMAL"),
            Attrib::Custom(name) => write!(f, "CUSTOM({name})"),
        }
    }
}

/// Component layout of one attribute inside a vertex buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AttribFormat {
    Float32,
    Float32x2,
    Float32x3,
    Float32x4,
}

impl AttribFormat {
    /// Size in bytes.
    pub const fn size(self) -> u64 {
        match self {
            AttribFormat::Float32 => 4,
            AttribFormat::Float32x2 => 8,
            AttribFormat::Float32x3 => 12,
            AttribFormat::Float32x4 => 16,
        }
    }

    pub(crate) fn to_wgpu(self) -> wgpu::VertexFormat {
        match self {
            AttribFormat::Float32 => wgpu::VertexFormat::Float32,
            AttribFormat::Float32x2 => wgpu::VertexFormat::Float32x2,
            AttribFormat::Float32x3 => wgpu::VertexFormat::Float32x3,
            AttribFormat::Float32x4 => wgpu::VertexFormat::Float32x4,
        }
    }
}

/// How often the buffer advances.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum StepMode {
    #[default]
    PerVertex,
    /// Advances once per instance (divisor 1).
    PerInstance,
}

impl StepMode {
    pub(crate) fn to_wgpu(self) -> wgpu::VertexStepMode {
        match self {
            StepMode::PerVertex => wgpu::VertexStepMode::Vertex,
            StepMode::PerInstance => wgpu::VertexStepMode::Instance,
        }
    }
}

/// Ordered, tightly packed attributes of one vertex buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferLayout {
    step_mode: StepMode,
    attribs: Vec<(Attrib, AttribFormat)>,
}

impl BufferLayout {
    pub fn per_vertex() -> Self {
        Self { step_mode: StepMode::PerVertex, attribs: Vec::new() }
    }

    pub fn per_instance() -> Self {
        Self { step_mode: StepMode::PerInstance, attribs: Vec::new() }
    }

    /// Appends an attribute after the existing ones.
    pub fn append(mut self, attrib: Attrib, format: AttribFormat) -> Self {
        self.attribs.push((attrib, format));
        self
    }

    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// Bytes per element.
    pub fn stride(&self) -> u64 {
        self.attribs.iter().map(|(_, f)| f.size()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.attribs.is_empty()
    }

    /// Attributes with their byte offsets.
    pub fn attribs(&self) -> impl Iterator<Item = (&Attrib, AttribFormat, u64)> + '_ {
        self.attribs.iter().scan(0u64, |offset, (attrib, format)| {
            let at = *offset;
            *offset += format.size();
            Some((attrib, *format, at))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stride_and_offsets_are_packed() {
        let layout = BufferLayout::per_vertex()
            .append(Attrib::Position, AttribFormat::Float32x3)
            .append(Attrib::Normal, AttribFormat::Float32x3)
            .append(Attrib::custom("uv"), AttribFormat::Float32x2);

        assert_eq!(layout.stride(), 32);
        let offsets: Vec<u64> = layout.attribs().map(|(_, _, o)| o).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }

    #[test]
    fn instance_layout_step_mode() {
        let layout = BufferLayout::per_instance().append(Attrib::custom("offset"), AttribFormat::Float32x3);
        assert_eq!(layout.step_mode(), StepMode::PerInstance);
        assert_eq!(layout.step_mode().to_wgpu(), wgpu::VertexStepMode::Instance);
        assert!(!layout.is_empty());
    }

    #[test]
    fn attrib_display() {
        assert_eq!(Attrib::Position.to_string(), "POSITION");
        assert_eq!(Attrib::custom("vInstanceColor").to_string(), "CUSTOM(vInstanceColor)");
    }
}
