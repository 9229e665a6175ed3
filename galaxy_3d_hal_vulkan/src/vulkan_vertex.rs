/// Vertex input lowering for Vulkan

use ash::vk;
use galaxy_3d_hal::galaxy3d::{Error, Result};
use galaxy_3d_hal::galaxy3d::render::{FormatTable, VertexAttribute, VertexFormat};
use crate::vulkan_format::VulkanFormats;

/// Binding and attribute descriptions of a vertex input state
#[derive(Debug, Clone, Default)]
pub struct VulkanVertexInput {
    pub bindings: Vec<vk::VertexInputBindingDescription>,
    pub attributes: Vec<vk::VertexInputAttributeDescription>,
}

/// Native format of one attribute
///
/// Integer channels are read as integers. Vulkan has no scaled 32-bit
/// formats, so an integer attribute requesting float conversion is rejected.
pub fn attribute_format(attribute: &VertexAttribute) -> Result<vk::Format> {
    if attribute.conversion && attribute.vector_type.is_integer() {
        return Err(Error::ConfigurationError(format!(
            "vertex attribute '{}': 32-bit integer to float conversion is not supported by Vulkan",
            attribute.name
        )));
    }
    Ok(VulkanFormats::to_native(attribute.vector_type.format()))
}

/// Input rate shared by every attribute of one vertex buffer
fn input_rate(format: &VertexFormat, binding: u32) -> Result<vk::VertexInputRate> {
    let mut rate = None;
    for attribute in &format.attributes {
        let attribute_rate = match attribute.instance_divisor {
            0 => vk::VertexInputRate::VERTEX,
            1 => vk::VertexInputRate::INSTANCE,
            divisor => {
                return Err(Error::ConfigurationError(format!(
                    "vertex attribute '{}': instance divisor {} is not supported (0 or 1 only)",
                    attribute.name, divisor
                )));
            }
        };
        match rate {
            None => rate = Some(attribute_rate),
            Some(existing) if existing != attribute_rate => {
                return Err(Error::ConfigurationError(format!(
                    "vertex buffer {} mixes per-vertex and per-instance attributes",
                    binding
                )));
            }
            Some(_) => {}
        }
    }
    Ok(rate.unwrap_or(vk::VertexInputRate::VERTEX))
}

/// Lower vertex formats, one per vertex buffer binding
///
/// Shader locations are assigned in declaration order across all buffers.
pub fn lower_vertex_formats(formats: &[VertexFormat]) -> Result<VulkanVertexInput> {
    let mut input = VulkanVertexInput::default();
    let mut location = 0u32;

    for (binding, format) in (0u32..).zip(formats) {
        input.bindings.push(vk::VertexInputBindingDescription {
            binding,
            stride: format.stride,
            input_rate: input_rate(format, binding)?,
        });

        for attribute in &format.attributes {
            input.attributes.push(vk::VertexInputAttributeDescription {
                location,
                binding,
                format: attribute_format(attribute)?,
                offset: attribute.offset,
            });
            location += 1;
        }
    }

    Ok(input)
}

#[cfg(test)]
#[path = "vulkan_vertex_tests.rs"]
mod tests;
