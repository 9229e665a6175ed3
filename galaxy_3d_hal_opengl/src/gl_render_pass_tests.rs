//! Unit tests for GlRenderPass (offline device, no GL context)

use galaxy_3d_hal::galaxy3d::{DeviceConfig, Error};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::render::{
    AttachmentDesc, AttachmentFormatDesc, AttachmentKind, ClearFlags, Format, LoadOp, RenderPass,
    RenderPassDesc,
};
use crate::gl_device::GlDevice;
use crate::gl_render_pass::*;

fn device() -> GlDevice {
    GlDevice::offline(4, 8, CapabilityTable::default(), DeviceConfig::default())
        .with_format_max_samples(gl::RGBA32F, 2)
}

#[test]
fn test_draw_buffers_and_clears() {
    let desc = RenderPassDesc {
        color_attachments: vec![
            AttachmentFormatDesc::new(Format::R8G8B8A8_UNORM, LoadOp::Load),
            AttachmentFormatDesc::new(Format::R8G8B8A8_SRGB, LoadOp::Clear),
            AttachmentFormatDesc::new(Format::R16G16B16A16_SFLOAT, LoadOp::Clear),
        ],
        depth_attachment: AttachmentFormatDesc::new(Format::D24_UNORM_S8_UINT, LoadOp::Clear),
        samples: 4,
        ..RenderPassDesc::default()
    };

    let pass = GlRenderPass::new(&device(), &desc).unwrap();
    assert_eq!(pass.num_color_attachments(), 3);
    assert_eq!(pass.samples(), 4);
    assert_eq!(
        pass.draw_buffers(),
        vec![gl::COLOR_ATTACHMENT0, gl::COLOR_ATTACHMENT1, gl::COLOR_ATTACHMENT2]
    );
    assert_eq!(pass.cleared_color_buffers(), vec![1, 2]);
    assert_eq!(pass.clear_mask(), gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
    assert_eq!(pass.depth_stencil_attachment_point(), Some(gl::DEPTH_STENCIL_ATTACHMENT));
    assert_eq!(pass.compiled().color_formats(), &[gl::RGBA8, gl::SRGB8_ALPHA8, gl::RGBA16F, gl::NONE]);
}

#[test]
fn test_depth_only_is_widened_to_combined_format() {
    let desc = RenderPassDesc {
        depth_attachment: AttachmentFormatDesc::new(Format::D16_UNORM, LoadOp::Clear),
        stencil_attachment: AttachmentFormatDesc::new(Format::Undefined, LoadOp::Clear),
        ..RenderPassDesc::default()
    };

    let pass = GlRenderPass::new(&device(), &desc).unwrap();
    assert_eq!(pass.compiled().depth_stencil_format(), gl::DEPTH24_STENCIL8);
    assert_eq!(pass.clear_flags(), ClearFlags::DEPTH | ClearFlags::STENCIL);
    assert_eq!(pass.clear_mask(), gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);
    assert!(pass.draw_buffers().is_empty());
}

#[test]
fn test_depth_stencil_mismatch_is_rejected() {
    let desc = RenderPassDesc {
        depth_attachment: AttachmentFormatDesc::new(Format::D32_SFLOAT, LoadOp::Clear),
        stencil_attachment: AttachmentFormatDesc::new(Format::D24_UNORM_S8_UINT, LoadOp::Clear),
        ..RenderPassDesc::default()
    };

    assert!(matches!(GlRenderPass::new(&device(), &desc), Err(Error::ConfigurationError(_))));
}

#[test]
fn test_extra_color_attachments_are_clamped() {
    let desc = RenderPassDesc {
        color_attachments: vec![AttachmentFormatDesc::new(Format::R8G8B8A8_UNORM, LoadOp::Clear); 6],
        ..RenderPassDesc::default()
    };

    let pass = GlRenderPass::new(&device(), &desc).unwrap();
    assert_eq!(pass.num_color_attachments(), 4);
    assert_eq!(pass.cleared_color_buffers(), vec![0, 1, 2, 3]);
    assert_eq!(pass.depth_stencil_attachment_point(), None);
}

#[test]
fn test_format_limits_sample_count() {
    let desc = RenderPassDesc {
        color_attachments: vec![AttachmentFormatDesc::new(Format::R32G32B32A32_SFLOAT, LoadOp::Load)],
        samples: 8,
        ..RenderPassDesc::default()
    };

    let pass = GlRenderPass::new(&device(), &desc).unwrap();
    assert_eq!(pass.samples(), 2);
}

#[test]
fn test_bgra_attachment_has_no_internal_format() {
    let desc = RenderPassDesc {
        color_attachments: vec![AttachmentFormatDesc::new(Format::B8G8R8A8_UNORM, LoadOp::Load)],
        ..RenderPassDesc::default()
    };

    let pass = GlRenderPass::new(&device(), &desc).unwrap();
    assert_eq!(pass.num_color_attachments(), 1);
    assert_eq!(pass.compiled().active_color_formats(), &[gl::NONE]);
}

#[test]
fn test_from_attachments_uses_texture_formats() {
    let color = GlAttachmentTexture { texture: 7, internal_format: gl::RGBA16F };
    let attachments = [
        AttachmentDesc { kind: AttachmentKind::Color, resource: Some(&color) },
        AttachmentDesc { kind: AttachmentKind::DepthStencil, resource: None },
    ];

    let pass = GlRenderPass::from_attachments(&device(), &attachments, 4);
    assert_eq!(pass.compiled().active_color_formats(), &[gl::RGBA16F]);
    assert_eq!(pass.compiled().depth_stencil_format(), gl::DEPTH24_STENCIL8);
    assert_eq!(pass.clear_flags(), ClearFlags::empty());
    assert_eq!(pass.clear_mask(), 0);
    assert_eq!(pass.samples(), 4);
}

#[test]
fn test_from_native_formats_widens_depth() {
    let pass = GlRenderPass::from_native_formats(&device(), &[gl::RGBA8], gl::DEPTH_COMPONENT32F, 1);

    assert_eq!(pass.compiled().depth_stencil_format(), gl::DEPTH32F_STENCIL8);
    assert_eq!(pass.depth_stencil_attachment_point(), Some(gl::DEPTH_STENCIL_ATTACHMENT));
    assert_eq!(pass.draw_buffers(), vec![gl::COLOR_ATTACHMENT0]);
}

#[test]
fn test_set_name_keeps_label() {
    let pass = GlRenderPass::from_native_formats(&device(), &[], gl::NONE, 1);
    assert_eq!(pass.label(), None);

    pass.set_name("shadow pass");
    assert_eq!(pass.label().as_deref(), Some("shadow pass"));
}
