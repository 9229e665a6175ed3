/// VulkanContext - native handles a Vulkan device is created from
///
/// Instance and device creation belong to the application (window system
/// integration, queue selection). The HAL only borrows the handles: it never
/// destroys the instance or the logical device.

use ash::vk;
use galaxy_3d_hal::galaxy3d::{DeviceConfig, Result};
use crate::vulkan_device::VulkanDevice;
use crate::vulkan_extensions::VulkanPlatform;

/// Handles shared by every device created through the backend registry
pub struct VulkanContext {
    /// Loaded Vulkan entry
    pub entry: ash::Entry,

    /// Instance the logical device belongs to
    pub instance: ash::Instance,

    /// Physical device of `device`
    pub physical_device: vk::PhysicalDevice,

    /// Logical device
    pub device: ash::Device,

    /// Windowing system the instance was created for
    pub platform: VulkanPlatform,
}

impl VulkanContext {
    /// Create a HAL device over these handles
    pub fn create_device(&self, config: &DeviceConfig) -> Result<VulkanDevice> {
        VulkanDevice::new(
            &self.entry,
            &self.instance,
            self.physical_device,
            &self.device,
            self.platform,
            config.clone(),
        )
    }
}
