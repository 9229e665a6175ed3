//! Unit tests for VulkanDevice sample negotiation (offline device, no GPU)

use ash::vk;
use galaxy_3d_hal::galaxy3d::{Device, DeviceConfig};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::render::{Format, PassTranslator};
use crate::vulkan_device::VulkanDevice;

fn counts_up_to(max: u32) -> vk::SampleCountFlags {
    vk::SampleCountFlags::from_raw((max << 1) - 1)
}

fn offline_device() -> VulkanDevice {
    VulkanDevice::offline(
        8,
        counts_up_to(8),
        counts_up_to(4),
        CapabilityTable::default(),
        DeviceConfig::default(),
    )
}

#[test]
fn test_limits_intersect_color_and_depth_counts() {
    let device = offline_device();
    assert_eq!(device.limits().max_color_attachments, 8);
    assert_eq!(device.limits().max_samples, 4);
    assert_eq!(device.backend_name(), "vulkan");
    assert!(device.device().is_none());
}

#[test]
fn test_color_only_pass_uses_color_counts() {
    let device = offline_device();
    let samples = device.find_suitable_samples(&[vk::Format::R8G8B8A8_UNORM], vk::Format::UNDEFINED, 8);
    assert_eq!(samples, 8);
}

#[test]
fn test_depth_attachment_restricts_samples() {
    let device = offline_device();
    let samples = device.find_suitable_samples(
        &[vk::Format::R8G8B8A8_UNORM],
        vk::Format::D24_UNORM_S8_UINT,
        8,
    );
    assert_eq!(samples, 4);
}

#[test]
fn test_per_format_counts_restrict_samples() {
    let device = offline_device()
        .with_format_sample_counts(vk::Format::R32G32B32A32_SFLOAT, counts_up_to(2));

    let samples = device.find_suitable_samples(
        &[vk::Format::R8G8B8A8_UNORM, vk::Format::R32G32B32A32_SFLOAT],
        vk::Format::UNDEFINED,
        8,
    );
    assert_eq!(samples, 2);
}

#[test]
fn test_non_power_of_two_request_rounds_down() {
    let device = offline_device();
    assert_eq!(device.find_suitable_samples(&[vk::Format::R8G8B8A8_UNORM], vk::Format::UNDEFINED, 6), 4);
    assert_eq!(device.find_suitable_samples(&[], vk::Format::UNDEFINED, 1), 1);
}

#[test]
fn test_unrenderable_format_falls_back_to_single_sample() {
    let device = offline_device()
        .with_format_sample_counts(vk::Format::R32G32B32_SFLOAT, vk::SampleCountFlags::TYPE_1);
    assert_eq!(device.find_suitable_samples(&[vk::Format::R32G32B32_SFLOAT], vk::Format::UNDEFINED, 8), 1);
}

#[test]
fn test_default_depth_stencil_format_is_widened() {
    let config = DeviceConfig {
        default_depth_stencil_format: Format::D32_SFLOAT,
        ..DeviceConfig::default()
    };
    let device = VulkanDevice::offline(4, counts_up_to(4), counts_up_to(4), CapabilityTable::default(), config);
    assert_eq!(device.default_depth_stencil_format(), vk::Format::D32_SFLOAT_S8_UINT);
}

#[test]
fn test_format_support() {
    let device = offline_device();
    assert!(device.is_format_supported(Format::R10G10B10A2_UNORM));
    assert!(!device.is_format_supported(Format::Undefined));
}
