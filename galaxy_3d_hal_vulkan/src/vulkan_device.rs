/// Vulkan device: limits, sample negotiation and object factories

use std::sync::Arc;
use ash::vk;
use rustc_hash::FxHashMap;
use galaxy_3d_hal::galaxy3d::{Device, DeviceConfig, DeviceLimits, Result};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::render::{
    Format, FormatTable, PassTranslator, PipelineLayout, PipelineLayoutDesc, RenderPass,
    RenderPassDesc, Shader, ShaderDesc,
};
use crate::vulkan_binding::VulkanPipelineLayout;
use crate::vulkan_extensions::{resolve_device_capabilities, DebugNamer, VulkanPlatform};
use crate::vulkan_format::{max_sample_count, sample_count_to_vk, VulkanFormats};
use crate::vulkan_render_pass::VulkanRenderPass;
use crate::vulkan_shader::VulkanShader;

/// Vulkan backend device
///
/// Built either from a live logical device ([`VulkanDevice::new`]) or from
/// explicit limits ([`VulkanDevice::offline`]). An offline device translates
/// descriptors into Vulkan structures but creates no native objects.
pub struct VulkanDevice {
    device: Option<ash::Device>,
    limits: DeviceLimits,
    color_sample_counts: vk::SampleCountFlags,
    depth_sample_counts: vk::SampleCountFlags,
    /// Sample counts usable per attachment format (missing = no restriction)
    format_sample_counts: FxHashMap<vk::Format, vk::SampleCountFlags>,
    capabilities: CapabilityTable,
    namer: Option<DebugNamer>,
    config: DeviceConfig,
}

impl VulkanDevice {
    /// Create the device from a live instance and logical device
    ///
    /// # Arguments
    ///
    /// * `entry` - Loaded Vulkan entry
    /// * `instance` - Instance the device was created from
    /// * `physical_device` - Physical device of `device`
    /// * `device` - Logical device (a clone of the handle table is kept)
    /// * `platform` - Windowing system the instance targets
    /// * `config` - Device configuration
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` if a required entry point cannot be resolved.
    pub fn new(
        entry: &ash::Entry,
        instance: &ash::Instance,
        physical_device: vk::PhysicalDevice,
        device: &ash::Device,
        platform: VulkanPlatform,
        config: DeviceConfig,
    ) -> Result<Self> {
        let capabilities = resolve_device_capabilities(entry, instance, device, platform)?;

        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        let limits = properties.limits;

        let mut format_sample_counts = FxHashMap::default();
        for format in Format::ALL {
            let usage = if format.is_depth() {
                vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT
            } else {
                vk::ImageUsageFlags::COLOR_ATTACHMENT
            };

            let native = VulkanFormats::to_native(format);
            let mut natives = vec![native];
            let widened = VulkanFormats::depth_stencil_view(native);
            if widened != native {
                natives.push(widened);
            }

            for native in natives {
                let counts = unsafe {
                    instance.get_physical_device_image_format_properties(
                        physical_device,
                        native,
                        vk::ImageType::TYPE_2D,
                        vk::ImageTiling::OPTIMAL,
                        usage,
                        vk::ImageCreateFlags::empty(),
                    )
                }
                .map(|props| props.sample_counts)
                // Not renderable: single-sampled at best
                .unwrap_or(vk::SampleCountFlags::TYPE_1);
                format_sample_counts.insert(native, counts);
            }
        }

        let namer = DebugNamer::new(device.handle(), &capabilities);

        galaxy_3d_hal::hal_info!(
            "galaxy3d::vulkan",
            "Vulkan device created: {} color attachments, {}x MSAA, {} entry points",
            limits.max_color_attachments,
            max_sample_count(limits.framebuffer_color_sample_counts & limits.framebuffer_depth_sample_counts),
            capabilities.len()
        );

        Ok(Self {
            device: Some(device.clone()),
            limits: DeviceLimits {
                max_color_attachments: limits.max_color_attachments,
                max_samples: max_sample_count(
                    limits.framebuffer_color_sample_counts & limits.framebuffer_depth_sample_counts,
                ),
            },
            color_sample_counts: limits.framebuffer_color_sample_counts,
            depth_sample_counts: limits.framebuffer_depth_sample_counts,
            format_sample_counts,
            capabilities,
            namer,
            config,
        })
    }

    /// Device without native objects, built from explicit limits
    pub fn offline(
        max_color_attachments: u32,
        color_sample_counts: vk::SampleCountFlags,
        depth_sample_counts: vk::SampleCountFlags,
        capabilities: CapabilityTable,
        config: DeviceConfig,
    ) -> Self {
        Self {
            device: None,
            limits: DeviceLimits {
                max_color_attachments,
                max_samples: max_sample_count(color_sample_counts & depth_sample_counts),
            },
            color_sample_counts,
            depth_sample_counts,
            format_sample_counts: FxHashMap::default(),
            capabilities,
            namer: None,
            config,
        }
    }

    /// Restrict the sample counts of one attachment format
    pub fn with_format_sample_counts(mut self, format: vk::Format, counts: vk::SampleCountFlags) -> Self {
        self.format_sample_counts.insert(format, counts);
        self
    }

    /// Logical device, `None` for offline devices
    pub fn device(&self) -> Option<&ash::Device> {
        self.device.as_ref()
    }

    /// Debug-utils naming, when available
    pub fn namer(&self) -> Option<DebugNamer> {
        self.namer
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Native format used for depth-stencil attachments without a resource
    pub fn default_depth_stencil_format(&self) -> vk::Format {
        VulkanFormats::to_native_depth_stencil(self.config.default_depth_stencil_format)
    }

    fn sample_counts_of(&self, format: vk::Format) -> vk::SampleCountFlags {
        self.format_sample_counts
            .get(&format)
            .copied()
            .unwrap_or(vk::SampleCountFlags::from_raw(0x7F))
    }
}

impl PassTranslator for VulkanDevice {
    type Formats = VulkanFormats;

    fn max_color_attachments(&self) -> u32 {
        self.limits.max_color_attachments
    }

    fn max_samples(&self) -> u32 {
        self.limits.max_samples
    }

    fn find_suitable_samples(
        &self,
        color_formats: &[vk::Format],
        depth_stencil_format: vk::Format,
        samples: u32,
    ) -> u32 {
        let mut counts = vk::SampleCountFlags::from_raw(0x7F);

        let colors: Vec<vk::Format> = color_formats.iter()
            .copied()
            .filter(|f| *f != vk::Format::UNDEFINED)
            .collect();
        if !colors.is_empty() {
            counts &= self.color_sample_counts;
        }
        for format in colors {
            counts &= self.sample_counts_of(format);
        }

        if depth_stencil_format != vk::Format::UNDEFINED {
            counts &= self.depth_sample_counts & self.sample_counts_of(depth_stencil_format);
        }

        let mut candidate = max_sample_count(sample_count_to_vk(samples));
        while candidate > 1 {
            if counts.contains(sample_count_to_vk(candidate)) {
                return candidate;
            }
            candidate >>= 1;
        }
        1
    }
}

impl Device for VulkanDevice {
    fn backend_name(&self) -> &'static str {
        "vulkan"
    }

    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    fn is_format_supported(&self, format: Format) -> bool {
        VulkanFormats::is_supported(format)
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        Ok(Arc::new(VulkanRenderPass::new(self, desc)?))
    }

    fn create_pipeline_layout(&self, desc: &PipelineLayoutDesc) -> Result<Arc<dyn PipelineLayout>> {
        Ok(Arc::new(VulkanPipelineLayout::new(self, desc)?))
    }

    fn create_shader(&self, desc: &ShaderDesc) -> Result<Arc<dyn Shader>> {
        Ok(Arc::new(VulkanShader::new(self, desc)?))
    }
}

#[cfg(test)]
#[path = "vulkan_device_tests.rs"]
mod tests;
