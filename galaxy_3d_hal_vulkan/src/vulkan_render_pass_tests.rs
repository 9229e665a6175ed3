//! Unit tests for VulkanRenderPass (offline device, no GPU)

use ash::vk;
use galaxy_3d_hal::galaxy3d::{DeviceConfig, Error};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::render::{
    AttachmentDesc, AttachmentFormatDesc, AttachmentKind, ClearFlags, Format, LoadOp, RenderPass,
    RenderPassDesc, StoreOp,
};
use crate::vulkan_device::VulkanDevice;
use crate::vulkan_render_pass::*;

fn device(max_colors: u32) -> VulkanDevice {
    let counts = vk::SampleCountFlags::TYPE_1 | vk::SampleCountFlags::TYPE_2 | vk::SampleCountFlags::TYPE_4;
    VulkanDevice::offline(max_colors, counts, counts, CapabilityTable::default(), DeviceConfig::default())
}

fn image(format: vk::Format) -> VulkanAttachmentImage {
    VulkanAttachmentImage { format, image_view: vk::ImageView::null() }
}

// ============================================================================
// DESCRIPTOR PATH
// ============================================================================

#[test]
fn test_attachment_descriptions_from_desc() {
    let desc = RenderPassDesc {
        color_attachments: vec![
            AttachmentFormatDesc::new(Format::R8G8B8A8_UNORM, LoadOp::Clear),
            AttachmentFormatDesc::new(Format::R16G16B16A16_SFLOAT, LoadOp::Load),
        ],
        depth_attachment: AttachmentFormatDesc::new(Format::D16_UNORM, LoadOp::Clear),
        samples: 4,
        ..RenderPassDesc::default()
    };

    let pass = VulkanRenderPass::new(&device(8), &desc).unwrap();
    assert_eq!(pass.num_color_attachments(), 2);
    assert_eq!(pass.samples(), 4);
    assert_eq!(pass.clear_flags(), ClearFlags::COLOR0 | ClearFlags::DEPTH);
    assert_eq!(pass.handle(), vk::RenderPass::null());

    let attachments = pass.attachment_descriptions();
    assert_eq!(attachments.len(), 3);

    assert_eq!(attachments[0].format, vk::Format::R8G8B8A8_UNORM);
    assert_eq!(attachments[0].load_op, vk::AttachmentLoadOp::CLEAR);
    assert_eq!(attachments[0].initial_layout, vk::ImageLayout::UNDEFINED);
    assert_eq!(attachments[0].samples, vk::SampleCountFlags::TYPE_4);

    assert_eq!(attachments[1].load_op, vk::AttachmentLoadOp::LOAD);
    assert_eq!(attachments[1].initial_layout, vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL);

    assert_eq!(attachments[2].format, vk::Format::D16_UNORM_S8_UINT);
    assert_eq!(attachments[2].load_op, vk::AttachmentLoadOp::CLEAR);
    assert_eq!(attachments[2].stencil_load_op, vk::AttachmentLoadOp::DONT_CARE);
    assert_eq!(attachments[2].final_layout, vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);
}

#[test]
fn test_stencil_only_attachment_uses_stencil_ops() {
    let desc = RenderPassDesc {
        stencil_attachment: AttachmentFormatDesc {
            format: Format::D24_UNORM_S8_UINT,
            load_op: LoadOp::Load,
            store_op: StoreOp::DontCare,
        },
        ..RenderPassDesc::default()
    };

    let pass = VulkanRenderPass::new(&device(8), &desc).unwrap();
    let attachments = pass.attachment_descriptions();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].format, vk::Format::D24_UNORM_S8_UINT);
    assert_eq!(attachments[0].stencil_load_op, vk::AttachmentLoadOp::LOAD);
    assert_eq!(attachments[0].stencil_store_op, vk::AttachmentStoreOp::DONT_CARE);
    assert_eq!(attachments[0].initial_layout, vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL);
}

#[test]
fn test_depth_stencil_mismatch_fails() {
    let desc = RenderPassDesc {
        depth_attachment: AttachmentFormatDesc::new(Format::D32_SFLOAT, LoadOp::Clear),
        stencil_attachment: AttachmentFormatDesc::new(Format::D24_UNORM_S8_UINT, LoadOp::Clear),
        ..RenderPassDesc::default()
    };

    let result = VulkanRenderPass::new(&device(8), &desc);
    assert!(matches!(result, Err(Error::ConfigurationError(_))));
}

#[test]
fn test_colors_beyond_device_limit_are_dropped() {
    let desc = RenderPassDesc {
        color_attachments: vec![AttachmentFormatDesc::new(Format::R8G8B8A8_UNORM, LoadOp::Clear); 4],
        ..RenderPassDesc::default()
    };

    let pass = VulkanRenderPass::new(&device(2), &desc).unwrap();
    assert_eq!(pass.num_color_attachments(), 2);
    assert_eq!(pass.attachment_descriptions().len(), 2);
    assert_eq!(pass.clear_flags(), ClearFlags::COLOR0 | ClearFlags::COLOR1);
}

// ============================================================================
// COMPATIBILITY PATHS
// ============================================================================

#[test]
fn test_from_attachments_keeps_image_formats() {
    let color = image(vk::Format::B8G8R8A8_SRGB);
    let attachments = [
        AttachmentDesc { kind: AttachmentKind::Color, resource: Some(&color) },
        AttachmentDesc { kind: AttachmentKind::DepthStencil, resource: None },
    ];

    let pass = VulkanRenderPass::from_attachments(&device(8), &attachments, 2).unwrap();
    let descriptions = pass.attachment_descriptions();
    assert_eq!(descriptions.len(), 2);
    assert_eq!(descriptions[0].format, vk::Format::B8G8R8A8_SRGB);
    assert_eq!(descriptions[0].load_op, vk::AttachmentLoadOp::LOAD);
    assert_eq!(descriptions[1].format, vk::Format::D24_UNORM_S8_UINT);
    assert_eq!(pass.clear_flags(), ClearFlags::empty());
    assert_eq!(pass.samples(), 2);
}

#[test]
fn test_from_native_formats_truncates_and_widens() {
    let colors = [vk::Format::R8G8B8A8_UNORM, vk::Format::R8_UNORM, vk::Format::R8G8_UNORM];
    let pass = VulkanRenderPass::from_native_formats(&device(2), &colors, vk::Format::D32_SFLOAT, 1).unwrap();

    assert_eq!(pass.num_color_attachments(), 2);
    assert_eq!(pass.compiled().depth_stencil_format(), vk::Format::D32_SFLOAT_S8_UINT);
    assert_eq!(pass.compiled().color_formats(), &[vk::Format::R8G8B8A8_UNORM, vk::Format::R8_UNORM]);
}
