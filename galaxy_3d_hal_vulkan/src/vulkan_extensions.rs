/// Vulkan capability sets resolved at device creation
///
/// Entry points are looked up with `vkGetDeviceProcAddr` first and
/// `vkGetInstanceProcAddr` as a fallback (surface and debug-utils commands
/// are instance-level).

use std::ffi::{c_void, CString};
use ash::vk;
use galaxy_3d_hal::galaxy3d::Result;
use galaxy_3d_hal::galaxy3d::capability::{CapabilityDesc, CapabilityTable};

/// Windowing system the instance was created for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VulkanPlatform {
    Win32,
    Xlib,
    Wayland,
    /// Headless / offscreen
    None,
}

impl VulkanPlatform {
    /// Platform of the current build target
    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            VulkanPlatform::Win32
        } else if cfg!(all(unix, not(target_os = "macos"), not(target_os = "android"))) {
            VulkanPlatform::Xlib
        } else {
            VulkanPlatform::None
        }
    }
}

const WIN32_CAPABILITIES: &[CapabilityDesc] = &[
    CapabilityDesc::optional("vkCreateWin32SurfaceKHR", "VK_KHR_win32_surface"),
    CapabilityDesc::optional("vkGetPhysicalDeviceWin32PresentationSupportKHR", "VK_KHR_win32_surface"),
];

const XLIB_CAPABILITIES: &[CapabilityDesc] = &[
    CapabilityDesc::optional("vkCreateXlibSurfaceKHR", "VK_KHR_xlib_surface"),
    CapabilityDesc::optional("vkGetPhysicalDeviceXlibPresentationSupportKHR", "VK_KHR_xlib_surface"),
];

const WAYLAND_CAPABILITIES: &[CapabilityDesc] = &[
    CapabilityDesc::optional("vkCreateWaylandSurfaceKHR", "VK_KHR_wayland_surface"),
    CapabilityDesc::optional("vkGetPhysicalDeviceWaylandPresentationSupportKHR", "VK_KHR_wayland_surface"),
];

/// Device-level entry points
pub const DEVICE_CAPABILITIES: &[CapabilityDesc] = &[
    // Core 1.0, used by this backend
    CapabilityDesc::required("vkCreateRenderPass", "VK_VERSION_1_0"),
    CapabilityDesc::required("vkDestroyRenderPass", "VK_VERSION_1_0"),
    CapabilityDesc::required("vkCreateShaderModule", "VK_VERSION_1_0"),
    CapabilityDesc::required("vkDestroyShaderModule", "VK_VERSION_1_0"),
    CapabilityDesc::required("vkCreateDescriptorSetLayout", "VK_VERSION_1_0"),
    CapabilityDesc::required("vkDestroyDescriptorSetLayout", "VK_VERSION_1_0"),
    // Extensions
    CapabilityDesc::optional("vkCreateRenderPass2KHR", "VK_KHR_create_renderpass2"),
    CapabilityDesc::optional("vkCmdBeginRenderingKHR", "VK_KHR_dynamic_rendering"),
    CapabilityDesc::optional("vkCmdEndRenderingKHR", "VK_KHR_dynamic_rendering"),
    CapabilityDesc::optional("vkCmdPushDescriptorSetKHR", "VK_KHR_push_descriptor"),
    CapabilityDesc::optional("vkSetDebugUtilsObjectNameEXT", "VK_EXT_debug_utils"),
    CapabilityDesc::optional("vkCmdSetVertexInputEXT", "VK_EXT_vertex_input_dynamic_state"),
];

/// Platform-specific capability set
pub fn platform_capabilities(platform: VulkanPlatform) -> &'static [CapabilityDesc] {
    match platform {
        VulkanPlatform::Win32 => WIN32_CAPABILITIES,
        VulkanPlatform::Xlib => XLIB_CAPABILITIES,
        VulkanPlatform::Wayland => WAYLAND_CAPABILITIES,
        VulkanPlatform::None => &[],
    }
}

/// Resolve the platform set then the device set through a name loader
pub fn resolve_capabilities<L>(platform: VulkanPlatform, loader: L) -> Result<CapabilityTable>
where
    L: FnMut(&str) -> *const c_void,
{
    CapabilityTable::resolve(&[platform_capabilities(platform), DEVICE_CAPABILITIES], loader)
}

/// Resolve against a live instance and logical device
pub fn resolve_device_capabilities(
    entry: &ash::Entry,
    instance: &ash::Instance,
    device: &ash::Device,
    platform: VulkanPlatform,
) -> Result<CapabilityTable> {
    let get_device_proc_addr = instance.fp_v1_0().get_device_proc_addr;

    resolve_capabilities(platform, |name: &str| {
        let Ok(c_name) = CString::new(name) else {
            return std::ptr::null();
        };
        unsafe {
            let device_fn = get_device_proc_addr(device.handle(), c_name.as_ptr());
            let function = match device_fn {
                Some(f) => Some(f),
                None => entry.get_instance_proc_addr(instance.handle(), c_name.as_ptr()),
            };
            function.map_or(std::ptr::null(), |f| f as *const c_void)
        }
    })
}

/// Debug-utils object naming, available when `VK_EXT_debug_utils` resolved
#[derive(Clone, Copy)]
pub struct DebugNamer {
    device: vk::Device,
    set_object_name: vk::PFN_vkSetDebugUtilsObjectNameEXT,
}

impl DebugNamer {
    /// Namer for a device, `None` if the entry point is absent
    pub fn new(device: vk::Device, capabilities: &CapabilityTable) -> Option<Self> {
        let entry = capabilities.entry_point("vkSetDebugUtilsObjectNameEXT")?;
        // SAFETY: resolved under this exact name for this device
        let set_object_name = unsafe { entry.cast::<vk::PFN_vkSetDebugUtilsObjectNameEXT>() };
        Some(Self { device, set_object_name })
    }

    /// Attach a name to a Vulkan object
    pub fn name_object<H: vk::Handle>(&self, handle: H, name: &str) {
        let Ok(c_name) = CString::new(name) else {
            galaxy_3d_hal::hal_warn!("galaxy3d::vulkan", "Object name '{}' contains a NUL byte", name);
            return;
        };
        let info = vk::DebugUtilsObjectNameInfoEXT::default()
            .object_handle(handle)
            .object_name(&c_name);
        let result = unsafe { (self.set_object_name)(self.device, &info) };
        if result != vk::Result::SUCCESS {
            galaxy_3d_hal::hal_warn!("galaxy3d::vulkan", "vkSetDebugUtilsObjectNameEXT failed: {:?}", result);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_extensions_tests.rs"]
mod tests;
