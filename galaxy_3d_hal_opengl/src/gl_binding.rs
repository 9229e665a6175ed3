/// Binding lowering for OpenGL: one numbering per binding point category

use std::fmt;
use galaxy_3d_hal::galaxy3d::{Error, Result};
use galaxy_3d_hal::galaxy3d::render::{
    resolve_layout, BindFlags, BindingDesc, BindingSlotMapper, PipelineLayout, PipelineLayoutDesc,
    ResolvedLayout, ResourceType,
};
use crate::gl_device::GlDevice;

/// Indexed binding point category of the GL state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlBindingTarget {
    /// `GL_UNIFORM_BUFFER` binding point
    UniformBuffer,
    /// `GL_SHADER_STORAGE_BUFFER` binding point
    StorageBuffer,
    /// Texture unit (`glActiveTexture` / `glBindSampler`)
    TextureUnit,
    /// Image unit (`glBindImageTexture`)
    ImageUnit,
}

/// Native slot: category and index inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlBindingSlot {
    pub target: GlBindingTarget,
    pub index: u32,
}

impl fmt::Display for GlBindingSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.target, self.index)
    }
}

/// Maps abstract bindings onto GL binding points
///
/// Each category is numbered on its own, so a uniform buffer and a texture
/// may both use slot 0. Samplers bind to the texture unit of the texture
/// they sample: a texture and a sampler on the same unit are legal aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlSlotMapper;

impl GlSlotMapper {
    /// Binding point category of one binding
    pub fn target(binding: &BindingDesc) -> Result<GlBindingTarget> {
        let flags = binding.bind_flags;
        match binding.resource_type {
            ResourceType::Buffer if flags.contains(BindFlags::STORAGE) => Ok(GlBindingTarget::StorageBuffer),
            ResourceType::Buffer if flags.contains(BindFlags::CONSTANT_BUFFER) => Ok(GlBindingTarget::UniformBuffer),
            ResourceType::Buffer => Err(Error::ConfigurationError(format!(
                "buffer binding '{}' needs CONSTANT_BUFFER or STORAGE",
                binding.name
            ))),
            ResourceType::Texture if flags.contains(BindFlags::STORAGE) => Ok(GlBindingTarget::ImageUnit),
            ResourceType::Texture | ResourceType::Sampler => Ok(GlBindingTarget::TextureUnit),
        }
    }
}

impl BindingSlotMapper for GlSlotMapper {
    type Slot = GlBindingSlot;

    fn map_binding(&self, binding: &BindingDesc) -> Result<GlBindingSlot> {
        Ok(GlBindingSlot {
            target: Self::target(binding)?,
            index: binding.slot,
        })
    }

    /// Arrays take one binding point or unit per element
    fn covered_slots(&self, binding: &BindingDesc, base: GlBindingSlot) -> Result<Vec<GlBindingSlot>> {
        let count = binding.array_size.max(1);
        if base.index.checked_add(count - 1).is_none() {
            return Err(Error::ConfigurationError(format!(
                "binding '{}' spans past the last {:?} index",
                binding.name, base.target
            )));
        }
        Ok((0..count)
            .map(|offset| GlBindingSlot { target: base.target, index: base.index + offset })
            .collect())
    }

    fn is_legal_alias(&self, first: &BindingDesc, second: &BindingDesc) -> bool {
        matches!(
            (first.resource_type, second.resource_type),
            (ResourceType::Texture, ResourceType::Sampler) | (ResourceType::Sampler, ResourceType::Texture)
        )
    }
}

/// OpenGL pipeline layout
///
/// Holds no GL object: the slots are applied with `glUniformBlockBinding`,
/// `glShaderStorageBlockBinding` and sampler uniforms once a program links.
pub struct GlPipelineLayout {
    layout: ResolvedLayout<GlBindingSlot>,
}

impl GlPipelineLayout {
    pub fn new(_device: &GlDevice, desc: &PipelineLayoutDesc) -> Result<Self> {
        let layout = resolve_layout(&GlSlotMapper, desc)?;

        galaxy_3d_hal::hal_debug!(
            "galaxy3d::opengl",
            "Pipeline layout: {} bindings ({} uniform buffers, {} storage buffers, {} texture units, {} image units)",
            layout.len(),
            count(&layout, GlBindingTarget::UniformBuffer),
            count(&layout, GlBindingTarget::StorageBuffer),
            count(&layout, GlBindingTarget::TextureUnit),
            count(&layout, GlBindingTarget::ImageUnit)
        );

        Ok(Self { layout })
    }

    /// Abstract bindings with their binding point
    pub fn resolved(&self) -> &ResolvedLayout<GlBindingSlot> {
        &self.layout
    }

    /// Names and indices of the bindings of one category, in declaration order
    pub fn bindings_for(&self, target: GlBindingTarget) -> Vec<(&str, u32)> {
        self.layout.bindings()
            .iter()
            .filter(|(_, slot)| slot.target == target)
            .map(|(desc, slot)| (desc.name.as_str(), slot.index))
            .collect()
    }
}

fn count(layout: &ResolvedLayout<GlBindingSlot>, target: GlBindingTarget) -> usize {
    layout.bindings().iter().filter(|(_, slot)| slot.target == target).count()
}

impl PipelineLayout for GlPipelineLayout {
    fn bindings(&self) -> Vec<BindingDesc> {
        self.layout.bindings().iter().map(|(desc, _)| desc.clone()).collect()
    }
}

#[cfg(test)]
#[path = "gl_binding_tests.rs"]
mod tests;
