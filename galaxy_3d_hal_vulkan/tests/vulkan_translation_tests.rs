//! Integration tests for the Vulkan backend
//!
//! Translation tests run on an offline device. Tests creating native objects
//! need a Vulkan driver and are marked with #[ignore].
//!
//! Run with: cargo test --test vulkan_translation_tests -- --ignored

use std::ffi::CStr;
use std::sync::Arc;
use ash::vk;
use serial_test::serial;
use galaxy_3d_hal::galaxy3d::{Device, DeviceConfig, Hal};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::debug::{decorate_render_pass, Diagnostics};
use galaxy_3d_hal::galaxy3d::render::{
    AttachmentFormatDesc, BindFlags, BindingDesc, ClearFlags, Format, LoadOp, PipelineLayoutDesc,
    RenderPassDesc, ResourceType, ShaderDesc, ShaderSource, ShaderStage, StageFlags,
};
use galaxy_3d_hal_vulkan::{VulkanContext, VulkanDevice, VulkanPlatform};

fn offline_device() -> VulkanDevice {
    let counts = vk::SampleCountFlags::TYPE_1 | vk::SampleCountFlags::TYPE_2 | vk::SampleCountFlags::TYPE_4;
    VulkanDevice::offline(4, counts, counts, CapabilityTable::default(), DeviceConfig::default())
}

fn deferred_pass_desc() -> RenderPassDesc {
    RenderPassDesc {
        color_attachments: vec![
            AttachmentFormatDesc::new(Format::R8G8B8A8_UNORM, LoadOp::Clear),
            AttachmentFormatDesc::new(Format::R16G16B16A16_SFLOAT, LoadOp::Clear),
            AttachmentFormatDesc::new(Format::R10G10B10A2_UNORM, LoadOp::DontCare),
        ],
        depth_attachment: AttachmentFormatDesc::new(Format::D32_SFLOAT, LoadOp::Clear),
        samples: 8,
        ..RenderPassDesc::default()
    }
}

// ============================================================================
// OFFLINE TRANSLATION
// ============================================================================

#[test]
fn test_offline_render_pass_through_device_trait() {
    let device: Arc<dyn Device> = Arc::new(offline_device());
    let pass = device.create_render_pass(&deferred_pass_desc()).unwrap();

    assert_eq!(pass.num_color_attachments(), 3);
    assert_eq!(pass.samples(), 4);
    assert_eq!(pass.clear_flags(), ClearFlags::COLOR0 | ClearFlags::COLOR1 | ClearFlags::DEPTH);
}

#[test]
fn test_offline_pipeline_layout_through_device_trait() {
    let device: Arc<dyn Device> = Arc::new(offline_device());
    let desc = PipelineLayoutDesc {
        bindings: vec![
            BindingDesc::new("camera", ResourceType::Buffer, BindFlags::CONSTANT_BUFFER, StageFlags::VERTEX, 0),
            BindingDesc::new("albedo", ResourceType::Texture, BindFlags::SAMPLED, StageFlags::FRAGMENT, 1),
        ],
    };

    let layout = device.create_pipeline_layout(&desc).unwrap();
    assert_eq!(layout.num_bindings(), 2);
    assert_eq!(layout.bindings()[1].name, "albedo");
}

#[test]
fn test_glsl_source_is_rejected_by_vulkan() {
    let device: Arc<dyn Device> = Arc::new(offline_device());
    let desc = ShaderDesc {
        stage: ShaderStage::Vertex,
        source: ShaderSource::Text("#version 450\nvoid main() {}"),
        entry_point: "main",
    };
    assert!(device.create_shader(&desc).is_err());
}

#[test]
fn test_failed_spirv_is_visible_through_shader_trait() {
    let device: Arc<dyn Device> = Arc::new(offline_device());
    let desc = ShaderDesc {
        stage: ShaderStage::Fragment,
        source: ShaderSource::Binary(&[0xde, 0xad, 0xbe, 0xef]),
        entry_point: "main",
    };

    let shader = device.create_shader(&desc).unwrap();
    assert!(shader.has_errors());
    assert!(shader.report().contains("magic"));
}

#[test]
fn test_debug_layer_over_vulkan_render_pass() {
    let device = offline_device();
    let pass = device.create_render_pass(&RenderPassDesc { samples: 4, ..RenderPassDesc::default() }).unwrap();
    let diagnostics = Diagnostics::new();

    let decorated = decorate_render_pass(pass.as_ref(), Some(&diagnostics));
    assert!(decorated.is_decorated());
    assert_eq!(decorated.samples(), 4);

    decorated.set_name("shadow_pass");
    assert_eq!(decorated.label().as_deref(), Some("shadow_pass"));
    assert!(!diagnostics.messages().is_empty());
}

// ============================================================================
// NATIVE OBJECTS (requires a Vulkan driver)
// ============================================================================

struct HeadlessVulkan {
    context: Arc<VulkanContext>,
}

impl HeadlessVulkan {
    fn new() -> Self {
        let entry = unsafe { ash::Entry::load() }.unwrap();
        let app_name = CStr::from_bytes_with_nul(b"galaxy3d-hal-tests\0").unwrap();
        let app_info = vk::ApplicationInfo::default()
            .application_name(app_name)
            .api_version(vk::API_VERSION_1_1);
        let instance_info = vk::InstanceCreateInfo::default().application_info(&app_info);
        let instance = unsafe { entry.create_instance(&instance_info, None) }.unwrap();

        let physical_device = unsafe { instance.enumerate_physical_devices() }.unwrap()[0];
        let queue_family = unsafe { instance.get_physical_device_queue_family_properties(physical_device) }
            .iter()
            .position(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .unwrap() as u32;

        let priorities = [1.0f32];
        let queue_info = vk::DeviceQueueCreateInfo::default()
            .queue_family_index(queue_family)
            .queue_priorities(&priorities);
        let device_info = vk::DeviceCreateInfo::default()
            .queue_create_infos(std::slice::from_ref(&queue_info));
        let device = unsafe { instance.create_device(physical_device, &device_info, None) }.unwrap();

        Self {
            context: Arc::new(VulkanContext {
                entry,
                instance,
                physical_device,
                device,
                platform: VulkanPlatform::None,
            }),
        }
    }
}

impl Drop for HeadlessVulkan {
    fn drop(&mut self) {
        unsafe {
            self.context.device.destroy_device(None);
            self.context.instance.destroy_instance(None);
        }
    }
}

#[test]
#[ignore] // Requires GPU
#[serial]
fn test_vulkan_backend_registration() {
    let vulkan = HeadlessVulkan::new();
    galaxy_3d_hal_vulkan::register(vulkan.context.clone()).unwrap();

    {
        let device = Hal::create_device("vulkan", &DeviceConfig::default()).unwrap();
        assert_eq!(device.backend_name(), "vulkan");
        assert!(device.limits().max_color_attachments >= 4);
        assert!(device.capabilities().is_available("vkCreateRenderPass"));

        let pass = device.create_render_pass(&deferred_pass_desc()).unwrap();
        assert_eq!(pass.num_color_attachments(), 3);
        assert!(pass.samples() >= 1);
        pass.set_name("gbuffer");
    }

    assert!(Hal::unregister_backend("vulkan").unwrap());
}

#[test]
#[ignore] // Requires GPU
fn test_vulkan_native_pipeline_layout() {
    let vulkan = HeadlessVulkan::new();
    {
        let device = vulkan.context.create_device(&DeviceConfig::default()).unwrap();
        let desc = PipelineLayoutDesc {
            bindings: vec![
                BindingDesc::new("camera", ResourceType::Buffer, BindFlags::CONSTANT_BUFFER, StageFlags::ALL_GRAPHICS, 0),
            ],
        };
        let layout = galaxy_3d_hal_vulkan::VulkanPipelineLayout::new(&device, &desc).unwrap();
        assert_ne!(layout.handle(), vk::DescriptorSetLayout::null());
    }
}
