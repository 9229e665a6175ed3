/// Vertex attribute model
///
/// A vertex attribute describes one channel of a vertex buffer. Its byte size
/// is always derived from its vector type and never stored on its own.

use crate::format::Format;

/// Data type of one vertex channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorType {
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    Int2,
    Int3,
    Int4,
    UInt,
    UInt2,
    UInt3,
    UInt4,
    /// Four 8-bit unsigned normalized channels (packed colors)
    UByte4Norm,
}

/// Scalar kind of a vector type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Float,
    Int,
    UInt,
    /// Integer storage read as normalized float
    Normalized,
}

impl VectorType {
    /// Number of components (1-4)
    pub fn components(&self) -> u32 {
        match self {
            VectorType::Float | VectorType::Int | VectorType::UInt => 1,
            VectorType::Float2 | VectorType::Int2 | VectorType::UInt2 => 2,
            VectorType::Float3 | VectorType::Int3 | VectorType::UInt3 => 3,
            VectorType::Float4 | VectorType::Int4 | VectorType::UInt4 | VectorType::UByte4Norm => 4,
        }
    }

    /// Size in bytes of one element
    pub fn size_bytes(&self) -> u32 {
        match self {
            VectorType::UByte4Norm => 4,
            _ => self.components() * 4,
        }
    }

    /// Scalar kind of each component
    pub fn scalar_kind(&self) -> ScalarKind {
        match self {
            VectorType::Float | VectorType::Float2 | VectorType::Float3 | VectorType::Float4 => ScalarKind::Float,
            VectorType::Int | VectorType::Int2 | VectorType::Int3 | VectorType::Int4 => ScalarKind::Int,
            VectorType::UInt | VectorType::UInt2 | VectorType::UInt3 | VectorType::UInt4 => ScalarKind::UInt,
            VectorType::UByte4Norm => ScalarKind::Normalized,
        }
    }

    /// True for integer channels (signed or unsigned, not normalized)
    pub fn is_integer(&self) -> bool {
        matches!(self.scalar_kind(), ScalarKind::Int | ScalarKind::UInt)
    }

    /// Abstract format of the channel
    pub fn format(&self) -> Format {
        match self {
            VectorType::Float => Format::R32_SFLOAT,
            VectorType::Float2 => Format::R32G32_SFLOAT,
            VectorType::Float3 => Format::R32G32B32_SFLOAT,
            VectorType::Float4 => Format::R32G32B32A32_SFLOAT,
            VectorType::Int => Format::R32_SINT,
            VectorType::Int2 => Format::R32G32_SINT,
            VectorType::Int3 => Format::R32G32B32_SINT,
            VectorType::Int4 => Format::R32G32B32A32_SINT,
            VectorType::UInt => Format::R32_UINT,
            VectorType::UInt2 => Format::R32G32_UINT,
            VectorType::UInt3 => Format::R32G32B32_UINT,
            VectorType::UInt4 => Format::R32G32B32A32_UINT,
            VectorType::UByte4Norm => Format::R8G8B8A8_UNORM,
        }
    }
}

/// One vertex channel and its binary layout
///
/// Equality is structural over every field: two attributes differing only by
/// offset are different attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader-side name (e.g. "position", "texCoord")
    pub name: String,
    /// Semantic index for repeated names (e.g. texCoord0, texCoord1)
    pub semantic_index: u32,
    /// Channel data type
    pub vector_type: VectorType,
    /// 0 = per vertex, N = advance once every N instances
    pub instance_divisor: u32,
    /// Byte offset inside one vertex
    pub offset: u32,
    /// Integer data converted to float in the shader
    pub conversion: bool,
}

impl VertexAttribute {
    /// Per-vertex attribute with semantic index 0
    pub fn new(name: &str, vector_type: VectorType) -> Self {
        Self {
            name: name.to_string(),
            semantic_index: 0,
            vector_type,
            instance_divisor: 0,
            offset: 0,
            conversion: false,
        }
    }

    /// Attribute with an explicit semantic index and instance divisor
    pub fn with_semantic(name: &str, semantic_index: u32, vector_type: VectorType, instance_divisor: u32) -> Self {
        Self {
            semantic_index,
            instance_divisor,
            ..Self::new(name, vector_type)
        }
    }

    /// Size in bytes, always derived from the vector type
    pub fn size(&self) -> u32 {
        self.vector_type.size_bytes()
    }

    /// True if the attribute advances per instance
    pub fn is_per_instance(&self) -> bool {
        self.instance_divisor > 0
    }
}

/// Ordered list of attributes sharing one vertex buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexFormat {
    /// Attributes in declaration order
    pub attributes: Vec<VertexAttribute>,
    /// Size in bytes of one vertex
    pub stride: u32,
}

impl VertexFormat {
    /// Empty format
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an attribute at the end of the vertex
    ///
    /// The attribute offset is set to the current stride, and the stride grows
    /// by the attribute size.
    pub fn append_attribute(&mut self, mut attribute: VertexAttribute) -> &mut Self {
        attribute.offset = self.stride;
        self.stride += attribute.size();
        self.attributes.push(attribute);
        self
    }

    /// Attribute by name and semantic index
    pub fn find(&self, name: &str, semantic_index: u32) -> Option<&VertexAttribute> {
        self.attributes.iter().find(|a| a.name == name && a.semantic_index == semantic_index)
    }
}

#[cfg(test)]
#[path = "vertex_tests.rs"]
mod tests;
