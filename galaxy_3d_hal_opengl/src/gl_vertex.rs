/// Vertex attribute pointer layout for OpenGL

use std::ffi::c_void;
use gl::types::{GLboolean, GLenum, GLint, GLsizei, GLuint};
use galaxy_3d_hal::galaxy3d::{Error, Result};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::render::{ScalarKind, VertexAttribute, VertexFormat};
use crate::gl_extensions::features;
use crate::gl_format::{vertex_component_count, vertex_component_type};

/// Arguments of one `glVertexAttrib(I)Pointer` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVertexAttribPointer {
    pub location: GLuint,
    pub components: GLint,
    pub component_type: GLenum,
    pub normalized: GLboolean,
    /// Read as integers through `glVertexAttribIPointer`
    pub integer: bool,
    pub stride: GLsizei,
    pub offset: usize,
    pub divisor: GLuint,
}

/// Attribute pointers of one vertex buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlVertexLayout {
    pub pointers: Vec<GlVertexAttribPointer>,
    /// `glVertexAttribDivisor` is available and must be set for every location
    pub set_divisors: bool,
}

fn missing(name: &str, attribute: &VertexAttribute, reason: &str) -> Error {
    Error::CapabilityMissing {
        name: name.to_string(),
        cause: format!("vertex attribute '{}' {}", attribute.name, reason),
    }
}

fn lower_attribute(
    attribute: &VertexAttribute,
    location: GLuint,
    stride: u32,
    capabilities: &CapabilityTable,
) -> Result<GlVertexAttribPointer> {
    let vector_type = attribute.vector_type;
    let integer = vector_type.is_integer() && !attribute.conversion;

    if integer && !capabilities.is_available(features::INTEGER_ATTRIBUTES) {
        return Err(missing(features::INTEGER_ATTRIBUTES, attribute, "is read as integer"));
    }
    if attribute.instance_divisor > 0 && !capabilities.is_available(features::INSTANCED_ARRAYS) {
        return Err(missing(features::INSTANCED_ARRAYS, attribute, "advances per instance"));
    }

    let normalized = if vector_type.scalar_kind() == ScalarKind::Normalized {
        gl::TRUE
    } else {
        gl::FALSE
    };

    Ok(GlVertexAttribPointer {
        location,
        components: vertex_component_count(vector_type),
        component_type: vertex_component_type(vector_type),
        normalized,
        integer,
        stride: stride as GLsizei,
        offset: attribute.offset as usize,
        divisor: attribute.instance_divisor,
    })
}

/// Lower the attributes of one vertex buffer
///
/// Locations are assigned from `first_location` in declaration order.
/// Integer channels without float conversion need `glVertexAttribIPointer`
/// and instance divisors need `glVertexAttribDivisor`.
///
/// # Errors
///
/// `CapabilityMissing` naming the entry point an attribute needs.
pub fn lower_vertex_format(
    format: &VertexFormat,
    first_location: u32,
    capabilities: &CapabilityTable,
) -> Result<GlVertexLayout> {
    let pointers = format.attributes.iter()
        .zip(first_location..)
        .map(|(attribute, location)| lower_attribute(attribute, location, format.stride, capabilities))
        .collect::<Result<Vec<_>>>()?;

    Ok(GlVertexLayout {
        pointers,
        set_divisors: capabilities.is_available(features::INSTANCED_ARRAYS),
    })
}

/// Issue the attribute pointer calls for the vertex buffer bound to `GL_ARRAY_BUFFER`
///
/// # Safety
///
/// The GL function pointers must be loaded, a context must be current with
/// a vertex array object and an array buffer bound.
pub unsafe fn bind_vertex_attributes(layout: &GlVertexLayout) {
    for pointer in &layout.pointers {
        let offset = std::ptr::null::<c_void>().wrapping_add(pointer.offset);
        if pointer.integer {
            gl::VertexAttribIPointer(
                pointer.location,
                pointer.components,
                pointer.component_type,
                pointer.stride,
                offset,
            );
        } else {
            gl::VertexAttribPointer(
                pointer.location,
                pointer.components,
                pointer.component_type,
                pointer.normalized,
                pointer.stride,
                offset,
            );
        }

        if layout.set_divisors {
            gl::VertexAttribDivisor(pointer.location, pointer.divisor);
        }

        gl::EnableVertexAttribArray(pointer.location);
    }
}

#[cfg(test)]
#[path = "gl_vertex_tests.rs"]
mod tests;
