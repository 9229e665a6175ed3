/*!
# Galaxy 3D HAL - Vulkan Backend

Vulkan implementation of the galaxy_3d_hal device traits, built on Ash.

Descriptors are translated into Vulkan structures (`vk::AttachmentDescription`,
`vk::DescriptorSetLayoutBinding`, `vk::VertexInputAttributeDescription`) and,
when a logical device is attached, into native objects. SPIR-V is validated
and reflected with spirq.

The backend is registered by name so applications can select it at runtime.
*/

mod vulkan_context;
mod vulkan_device;
mod vulkan_extensions;
mod vulkan_format;
mod vulkan_render_pass;
mod vulkan_binding;
mod vulkan_vertex;
mod vulkan_shader;

#[cfg(feature = "vulkan-validation")]
pub mod debug;

use std::sync::Arc;
use galaxy_3d_hal::galaxy3d::{Device, DeviceConfig, Hal, Result};

pub use vulkan_context::VulkanContext;
pub use vulkan_device::VulkanDevice;
pub use vulkan_extensions::{
    platform_capabilities, resolve_capabilities, resolve_device_capabilities, DebugNamer,
    VulkanPlatform, DEVICE_CAPABILITIES,
};
pub use vulkan_format::{
    is_depth_stencil_format, load_op_to_vk, max_sample_count, sample_count_to_vk,
    shader_stage_to_vk, stage_flags_to_vk, store_op_to_vk, VulkanFormats,
};
pub use vulkan_render_pass::{AttachmentOps, VulkanAttachmentImage, VulkanRenderPass};
pub use vulkan_binding::{lower_descriptors, DescriptorSlot, VulkanPipelineLayout, VulkanSlotMapper};
pub use vulkan_vertex::{attribute_format, lower_vertex_formats, VulkanVertexInput};
pub use vulkan_shader::{spirv_words, ReflectedResource, VulkanShader, SPIRV_MAGIC};

/// Name the backend is registered under
pub const BACKEND_NAME: &str = "vulkan";

/// Register the Vulkan backend with the HAL
///
/// Devices created through `Hal::create_device("vulkan", ..)` are built over
/// the handles of `context`.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use galaxy_3d_hal::galaxy3d::{DeviceConfig, Hal};
/// use galaxy_3d_hal_vulkan::VulkanContext;
///
/// # fn run(context: VulkanContext) -> galaxy_3d_hal::galaxy3d::Result<()> {
/// galaxy_3d_hal_vulkan::register(Arc::new(context))?;
/// let _device = Hal::create_device("vulkan", &DeviceConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn register(context: Arc<VulkanContext>) -> Result<()> {
    Hal::register_backend(BACKEND_NAME, move |config: &DeviceConfig| {
        let device: Arc<dyn Device> = Arc::new(context.create_device(config)?);
        Ok(device)
    })
}
