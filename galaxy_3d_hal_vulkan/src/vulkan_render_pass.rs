/// VulkanRenderPass - Vulkan implementation of the RenderPass trait

use ash::vk;
use galaxy_3d_hal::galaxy3d::Result;
use galaxy_3d_hal::galaxy3d::render::{
    AttachmentDesc, ClearFlags, CompiledRenderPass, NativeAttachment, RenderPass, RenderPassDesc,
};
use crate::vulkan_device::VulkanDevice;
use crate::vulkan_extensions::DebugNamer;
use crate::vulkan_format::{
    load_op_to_vk, sample_count_to_vk, store_op_to_vk, VulkanFormats,
};

/// Image view created outside the HAL, usable as a render pass attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VulkanAttachmentImage {
    /// Format the image was created with
    pub format: vk::Format,
    pub image_view: vk::ImageView,
}

impl NativeAttachment for VulkanAttachmentImage {
    type Native = vk::Format;

    fn native_format(&self) -> vk::Format {
        self.format
    }
}

/// Load/store operations of one attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentOps {
    pub load_op: vk::AttachmentLoadOp,
    pub store_op: vk::AttachmentStoreOp,
    pub stencil_load_op: vk::AttachmentLoadOp,
    pub stencil_store_op: vk::AttachmentStoreOp,
}

impl AttachmentOps {
    /// Preserve existing contents (used by compatibility passes)
    pub const PRESERVE: AttachmentOps = AttachmentOps {
        load_op: vk::AttachmentLoadOp::LOAD,
        store_op: vk::AttachmentStoreOp::STORE,
        stencil_load_op: vk::AttachmentLoadOp::LOAD,
        stencil_store_op: vk::AttachmentStoreOp::STORE,
    };
}

/// Vulkan render pass
///
/// Always holds the compiled description. A native `vk::RenderPass` is
/// created only when the device owns a logical device.
pub struct VulkanRenderPass {
    compiled: CompiledRenderPass<VulkanFormats>,
    color_ops: Vec<AttachmentOps>,
    depth_stencil_ops: AttachmentOps,
    render_pass: vk::RenderPass,
    device: Option<ash::Device>,
    namer: Option<DebugNamer>,
}

impl VulkanRenderPass {
    /// Create from an abstract descriptor
    pub fn new(device: &VulkanDevice, desc: &RenderPassDesc) -> Result<Self> {
        let compiled = CompiledRenderPass::from_desc(device, desc)?;

        let color_ops = desc.color_attachments.iter()
            .take(compiled.num_color_attachments() as usize)
            .map(|attachment| AttachmentOps {
                load_op: load_op_to_vk(attachment.load_op),
                store_op: store_op_to_vk(attachment.store_op),
                stencil_load_op: vk::AttachmentLoadOp::DONT_CARE,
                stencil_store_op: vk::AttachmentStoreOp::DONT_CARE,
            })
            .collect();

        let depth_stencil_ops = AttachmentOps {
            load_op: load_op_to_vk(desc.depth_attachment.load_op),
            store_op: store_op_to_vk(desc.depth_attachment.store_op),
            stencil_load_op: load_op_to_vk(desc.stencil_attachment.load_op),
            stencil_store_op: store_op_to_vk(desc.stencil_attachment.store_op),
        };

        Self::build(device, compiled, color_ops, depth_stencil_ops)
    }

    /// Compatibility pass for a set of existing images
    ///
    /// Depth-stencil entries without an image use the device's default
    /// depth-stencil format.
    pub fn from_attachments(
        device: &VulkanDevice,
        attachments: &[AttachmentDesc<'_, VulkanAttachmentImage>],
        samples: u32,
    ) -> Result<Self> {
        let compiled = CompiledRenderPass::from_attachments(
            device,
            attachments,
            device.default_depth_stencil_format(),
            samples,
        );
        let color_ops = vec![AttachmentOps::PRESERVE; compiled.num_color_attachments() as usize];
        Self::build(device, compiled, color_ops, AttachmentOps::PRESERVE)
    }

    /// Compatibility pass for raw native formats
    pub fn from_native_formats(
        device: &VulkanDevice,
        color_formats: &[vk::Format],
        depth_stencil_format: vk::Format,
        samples: u32,
    ) -> Result<Self> {
        let compiled = CompiledRenderPass::from_native_formats(
            device,
            color_formats,
            depth_stencil_format,
            samples,
        );
        let color_ops = vec![AttachmentOps::PRESERVE; compiled.num_color_attachments() as usize];
        Self::build(device, compiled, color_ops, AttachmentOps::PRESERVE)
    }

    fn build(
        device: &VulkanDevice,
        compiled: CompiledRenderPass<VulkanFormats>,
        color_ops: Vec<AttachmentOps>,
        depth_stencil_ops: AttachmentOps,
    ) -> Result<Self> {
        let mut pass = Self {
            compiled,
            color_ops,
            depth_stencil_ops,
            render_pass: vk::RenderPass::null(),
            device: None,
            namer: device.namer(),
        };

        if let Some(logical) = device.device() {
            pass.render_pass = pass.create_native(logical)?;
            pass.device = Some(logical.clone());
        }

        Ok(pass)
    }

    fn create_native(&self, device: &ash::Device) -> Result<vk::RenderPass> {
        if let Some(slot) = self.compiled.active_color_formats().iter()
            .position(|format| *format == vk::Format::UNDEFINED)
        {
            galaxy_3d_hal::hal_bail!(
                "galaxy3d::vulkan",
                "Color attachment {} has a format unsupported by Vulkan",
                slot
            );
        }

        let attachments = self.attachment_descriptions();
        let num_colors = self.compiled.num_color_attachments();

        let color_attachment_refs: Vec<vk::AttachmentReference> = (0..num_colors)
            .map(|i| vk::AttachmentReference::default()
                .attachment(i)
                .layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL))
            .collect();

        let depth_attachment_ref = self.compiled.has_depth_stencil().then(|| {
            vk::AttachmentReference::default()
                .attachment(num_colors)
                .layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL)
        });

        let mut subpass = vk::SubpassDescription::default()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(&color_attachment_refs);

        if let Some(ref depth_ref) = depth_attachment_ref {
            subpass = subpass.depth_stencil_attachment(depth_ref);
        }

        let (stage_mask, access_mask) = if depth_attachment_ref.is_some() {
            (
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT
                    | vk::PipelineStageFlags::EARLY_FRAGMENT_TESTS,
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE
                    | vk::AccessFlags::DEPTH_STENCIL_ATTACHMENT_WRITE,
            )
        } else {
            (
                vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
                vk::AccessFlags::COLOR_ATTACHMENT_WRITE,
            )
        };

        let dependency = vk::SubpassDependency::default()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(stage_mask)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(stage_mask)
            .dst_access_mask(access_mask);

        let render_pass_info = vk::RenderPassCreateInfo::default()
            .attachments(&attachments)
            .subpasses(std::slice::from_ref(&subpass))
            .dependencies(std::slice::from_ref(&dependency));

        unsafe { device.create_render_pass(&render_pass_info, None) }
            .map_err(|e| galaxy_3d_hal::hal_err!("galaxy3d::vulkan", "Failed to create render pass: {:?}", e))
    }

    /// Attachment descriptions: active colors first, then depth-stencil
    pub fn attachment_descriptions(&self) -> Vec<vk::AttachmentDescription> {
        let samples = sample_count_to_vk(self.compiled.samples());
        let mut attachments = Vec::with_capacity(self.color_ops.len() + 1);

        for (format, ops) in self.compiled.active_color_formats().iter().zip(&self.color_ops) {
            let initial_layout = if ops.load_op == vk::AttachmentLoadOp::LOAD {
                vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL
            } else {
                vk::ImageLayout::UNDEFINED
            };
            attachments.push(vk::AttachmentDescription::default()
                .format(*format)
                .samples(samples)
                .load_op(ops.load_op)
                .store_op(ops.store_op)
                .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
                .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
                .initial_layout(initial_layout)
                .final_layout(vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL));
        }

        if self.compiled.has_depth_stencil() {
            let ops = self.depth_stencil_ops;
            let preserves = ops.load_op == vk::AttachmentLoadOp::LOAD
                || ops.stencil_load_op == vk::AttachmentLoadOp::LOAD;
            let initial_layout = if preserves {
                vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL
            } else {
                vk::ImageLayout::UNDEFINED
            };
            attachments.push(vk::AttachmentDescription::default()
                .format(self.compiled.depth_stencil_format())
                .samples(samples)
                .load_op(ops.load_op)
                .store_op(ops.store_op)
                .stencil_load_op(ops.stencil_load_op)
                .stencil_store_op(ops.stencil_store_op)
                .initial_layout(initial_layout)
                .final_layout(vk::ImageLayout::DEPTH_STENCIL_ATTACHMENT_OPTIMAL));
        }

        attachments
    }

    /// Compiled description
    pub fn compiled(&self) -> &CompiledRenderPass<VulkanFormats> {
        &self.compiled
    }

    /// Native handle (`null` on offline devices)
    pub fn handle(&self) -> vk::RenderPass {
        self.render_pass
    }
}

impl RenderPass for VulkanRenderPass {
    fn num_color_attachments(&self) -> u32 {
        self.compiled.num_color_attachments()
    }

    fn clear_flags(&self) -> ClearFlags {
        self.compiled.clear_flags()
    }

    fn samples(&self) -> u32 {
        self.compiled.samples()
    }

    fn set_name(&self, name: &str) {
        if self.render_pass == vk::RenderPass::null() {
            return;
        }
        if let Some(namer) = &self.namer {
            namer.name_object(self.render_pass, name);
        }
    }
}

impl Drop for VulkanRenderPass {
    fn drop(&mut self) {
        if let Some(device) = &self.device {
            unsafe {
                device.destroy_render_pass(self.render_pass, None);
            }
        }
    }
}

#[cfg(test)]
#[path = "vulkan_render_pass_tests.rs"]
mod tests;
