/// OpenGL format table (sized internal formats) and vertex type conversions

use gl::types::{GLenum, GLint};
use galaxy_3d_hal::galaxy3d::render::{Format, FormatTable, ScalarKind, ShaderStage, VectorType};

/// [`FormatTable`] of the OpenGL backend (sized internal formats, sentinel `GL_NONE`)
///
/// BGRA channel orders have no sized internal format and are unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlFormats;

impl FormatTable for GlFormats {
    type Native = GLenum;

    const UNSUPPORTED: GLenum = gl::NONE;

    fn to_native(format: Format) -> GLenum {
        match format {
            Format::Undefined => gl::NONE,
            Format::R8_UNORM => gl::R8,
            Format::R8G8_UNORM => gl::RG8,
            Format::R8G8B8A8_UNORM => gl::RGBA8,
            Format::R8G8B8A8_SRGB => gl::SRGB8_ALPHA8,
            Format::B8G8R8A8_UNORM | Format::B8G8R8A8_SRGB => gl::NONE,
            Format::R10G10B10A2_UNORM => gl::RGB10_A2,
            Format::R16G16B16A16_SFLOAT => gl::RGBA16F,
            Format::R32_SFLOAT => gl::R32F,
            Format::R32G32_SFLOAT => gl::RG32F,
            Format::R32G32B32_SFLOAT => gl::RGB32F,
            Format::R32G32B32A32_SFLOAT => gl::RGBA32F,
            Format::R32_SINT => gl::R32I,
            Format::R32G32_SINT => gl::RG32I,
            Format::R32G32B32_SINT => gl::RGB32I,
            Format::R32G32B32A32_SINT => gl::RGBA32I,
            Format::R32_UINT => gl::R32UI,
            Format::R32G32_UINT => gl::RG32UI,
            Format::R32G32B32_UINT => gl::RGB32UI,
            Format::R32G32B32A32_UINT => gl::RGBA32UI,
            Format::D16_UNORM => gl::DEPTH_COMPONENT16,
            Format::D24_UNORM_S8_UINT => gl::DEPTH24_STENCIL8,
            Format::D32_SFLOAT => gl::DEPTH_COMPONENT32F,
            Format::D32_SFLOAT_S8_UINT => gl::DEPTH32F_STENCIL8,
        }
    }

    fn from_native(native: GLenum) -> Format {
        match native {
            gl::R8 => Format::R8_UNORM,
            gl::RG8 => Format::R8G8_UNORM,
            gl::RGBA8 => Format::R8G8B8A8_UNORM,
            gl::SRGB8_ALPHA8 => Format::R8G8B8A8_SRGB,
            gl::RGB10_A2 => Format::R10G10B10A2_UNORM,
            gl::RGBA16F => Format::R16G16B16A16_SFLOAT,
            gl::R32F => Format::R32_SFLOAT,
            gl::RG32F => Format::R32G32_SFLOAT,
            gl::RGB32F => Format::R32G32B32_SFLOAT,
            gl::RGBA32F => Format::R32G32B32A32_SFLOAT,
            gl::R32I => Format::R32_SINT,
            gl::RG32I => Format::R32G32_SINT,
            gl::RGB32I => Format::R32G32B32_SINT,
            gl::RGBA32I => Format::R32G32B32A32_SINT,
            gl::R32UI => Format::R32_UINT,
            gl::RG32UI => Format::R32G32_UINT,
            gl::RGB32UI => Format::R32G32B32_UINT,
            gl::RGBA32UI => Format::R32G32B32A32_UINT,
            gl::DEPTH_COMPONENT16 => Format::D16_UNORM,
            gl::DEPTH24_STENCIL8 => Format::D24_UNORM_S8_UINT,
            gl::DEPTH_COMPONENT32F => Format::D32_SFLOAT,
            gl::DEPTH32F_STENCIL8 => Format::D32_SFLOAT_S8_UINT,
            _ => Format::Undefined,
        }
    }

    fn depth_stencil_view(native: GLenum) -> GLenum {
        match native {
            gl::DEPTH_COMPONENT16 | gl::DEPTH_COMPONENT24 => gl::DEPTH24_STENCIL8,
            gl::DEPTH_COMPONENT32F => gl::DEPTH32F_STENCIL8,
            other => other,
        }
    }
}

/// Component type of a vertex channel (`GL_FLOAT`, `GL_INT`, ...)
pub fn vertex_component_type(vector_type: VectorType) -> GLenum {
    match vector_type.scalar_kind() {
        ScalarKind::Float => gl::FLOAT,
        ScalarKind::Int => gl::INT,
        ScalarKind::UInt => gl::UNSIGNED_INT,
        ScalarKind::Normalized => gl::UNSIGNED_BYTE,
    }
}

/// Number of components as expected by `glVertexAttribPointer`
pub fn vertex_component_count(vector_type: VectorType) -> GLint {
    vector_type.components() as GLint
}

/// Shader object type of a stage
pub fn shader_stage_to_gl(stage: ShaderStage) -> GLenum {
    match stage {
        ShaderStage::Vertex => gl::VERTEX_SHADER,
        ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        ShaderStage::Compute => gl::COMPUTE_SHADER,
    }
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
