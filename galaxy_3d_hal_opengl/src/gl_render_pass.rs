/// GlRenderPass - OpenGL implementation of the RenderPass trait
///
/// OpenGL has no render pass object: the compiled description drives the
/// draw buffer list and the clears issued when a framebuffer is bound.

use std::sync::RwLock;
use gl::types::{GLbitfield, GLenum, GLuint};
use galaxy_3d_hal::galaxy3d::Result;
use galaxy_3d_hal::galaxy3d::render::{
    AttachmentDesc, ClearFlags, CompiledRenderPass, FormatTable, NativeAttachment, RenderPass,
    RenderPassDesc,
};
use crate::gl_device::GlDevice;
use crate::gl_format::GlFormats;

/// Texture or renderbuffer created outside the HAL, usable as an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlAttachmentTexture {
    pub texture: GLuint,
    /// Sized internal format the storage was allocated with
    pub internal_format: GLenum,
}

impl NativeAttachment for GlAttachmentTexture {
    type Native = GLenum;

    fn native_format(&self) -> GLenum {
        self.internal_format
    }
}

pub struct GlRenderPass {
    compiled: CompiledRenderPass<GlFormats>,
    label: RwLock<Option<String>>,
}

impl GlRenderPass {
    /// Create from an abstract descriptor
    pub fn new(device: &GlDevice, desc: &RenderPassDesc) -> Result<Self> {
        Ok(Self::from_compiled(CompiledRenderPass::from_desc(device, desc)?))
    }

    /// Compatibility pass for a set of existing textures
    pub fn from_attachments(
        device: &GlDevice,
        attachments: &[AttachmentDesc<'_, GlAttachmentTexture>],
        samples: u32,
    ) -> Self {
        Self::from_compiled(CompiledRenderPass::from_attachments(
            device,
            attachments,
            device.default_depth_stencil_format(),
            samples,
        ))
    }

    /// Compatibility pass for raw internal formats
    pub fn from_native_formats(
        device: &GlDevice,
        color_formats: &[GLenum],
        depth_stencil_format: GLenum,
        samples: u32,
    ) -> Self {
        Self::from_compiled(CompiledRenderPass::from_native_formats(
            device,
            color_formats,
            depth_stencil_format,
            samples,
        ))
    }

    fn from_compiled(compiled: CompiledRenderPass<GlFormats>) -> Self {
        Self {
            compiled,
            label: RwLock::new(None),
        }
    }

    pub fn compiled(&self) -> &CompiledRenderPass<GlFormats> {
        &self.compiled
    }

    /// Argument of `glDrawBuffers`: one `GL_COLOR_ATTACHMENTi` per active slot
    pub fn draw_buffers(&self) -> Vec<GLenum> {
        (0..self.compiled.num_color_attachments())
            .map(|index| gl::COLOR_ATTACHMENT0 + index)
            .collect()
    }

    /// Color slots cleared at pass entry (`glClearBuffer` draw buffer indices)
    pub fn cleared_color_buffers(&self) -> Vec<u32> {
        let flags = self.compiled.clear_flags();
        (0..self.compiled.num_color_attachments())
            .filter(|index| flags.contains(ClearFlags::color(*index)))
            .collect()
    }

    /// `glClear` mask equivalent to the clear flags
    pub fn clear_mask(&self) -> GLbitfield {
        let flags = self.compiled.clear_flags();
        let mut mask = 0;
        if flags.intersects(ClearFlags::from_bits_truncate(0xFF)) {
            mask |= gl::COLOR_BUFFER_BIT;
        }
        if flags.contains(ClearFlags::DEPTH) {
            mask |= gl::DEPTH_BUFFER_BIT;
        }
        if flags.contains(ClearFlags::STENCIL) {
            mask |= gl::STENCIL_BUFFER_BIT;
        }
        mask
    }

    /// Framebuffer attachment point of the depth-stencil attachment
    pub fn depth_stencil_attachment_point(&self) -> Option<GLenum> {
        if !self.compiled.has_depth_stencil() {
            return None;
        }
        if GlFormats::from_native(self.compiled.depth_stencil_format()).has_stencil() {
            Some(gl::DEPTH_STENCIL_ATTACHMENT)
        } else {
            Some(gl::DEPTH_ATTACHMENT)
        }
    }

    /// Debug label last set through [`RenderPass::set_name`]
    pub fn label(&self) -> Option<String> {
        self.label.read().ok().and_then(|label| label.clone())
    }
}

impl RenderPass for GlRenderPass {
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
        if let Ok(mut label) = self.label.write() {
            *label = Some(name.to_string());
        }
    }
}

#[cfg(test)]
#[path = "gl_render_pass_tests.rs"]
mod tests;
