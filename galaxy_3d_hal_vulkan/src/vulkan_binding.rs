/// Binding lowering for Vulkan: one descriptor set, unified binding numbers

use ash::vk;
use galaxy_3d_hal::galaxy3d::{Error, Result};
use galaxy_3d_hal::galaxy3d::render::{
    resolve_layout, BindFlags, BindingDesc, BindingSlotMapper, PipelineLayout, PipelineLayoutDesc,
    ResolvedLayout, ResourceType,
};
use crate::vulkan_device::VulkanDevice;
use crate::vulkan_format::stage_flags_to_vk;

/// Maps abstract bindings onto Vulkan binding numbers of set 0
///
/// Buffers, textures and samplers share one binding space. A texture and a
/// sampler flagged `COMBINED_SAMPLER` may share a number: they lower to a
/// single `COMBINED_IMAGE_SAMPLER` descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct VulkanSlotMapper;

impl VulkanSlotMapper {
    /// Descriptor type of one binding
    pub fn descriptor_type(binding: &BindingDesc) -> Result<vk::DescriptorType> {
        let flags = binding.bind_flags;
        match binding.resource_type {
            ResourceType::Buffer if flags.contains(BindFlags::STORAGE) => Ok(vk::DescriptorType::STORAGE_BUFFER),
            ResourceType::Buffer if flags.contains(BindFlags::CONSTANT_BUFFER) => Ok(vk::DescriptorType::UNIFORM_BUFFER),
            ResourceType::Buffer => Err(Error::ConfigurationError(format!(
                "buffer binding '{}' needs CONSTANT_BUFFER or STORAGE",
                binding.name
            ))),
            ResourceType::Texture if flags.contains(BindFlags::STORAGE) => Ok(vk::DescriptorType::STORAGE_IMAGE),
            ResourceType::Texture | ResourceType::Sampler if flags.contains(BindFlags::COMBINED_SAMPLER) => {
                Ok(vk::DescriptorType::COMBINED_IMAGE_SAMPLER)
            }
            ResourceType::Texture => Ok(vk::DescriptorType::SAMPLED_IMAGE),
            ResourceType::Sampler => Ok(vk::DescriptorType::SAMPLER),
        }
    }
}

impl BindingSlotMapper for VulkanSlotMapper {
    type Slot = u32;

    fn map_binding(&self, binding: &BindingDesc) -> Result<u32> {
        Self::descriptor_type(binding)?;
        Ok(binding.slot)
    }

    fn is_legal_alias(&self, first: &BindingDesc, second: &BindingDesc) -> bool {
        let pair = (first.resource_type, second.resource_type);
        let combinable = matches!(
            pair,
            (ResourceType::Texture, ResourceType::Sampler) | (ResourceType::Sampler, ResourceType::Texture)
        );
        combinable
            && first.bind_flags.contains(BindFlags::COMBINED_SAMPLER)
            && second.bind_flags.contains(BindFlags::COMBINED_SAMPLER)
            && first.array_size == second.array_size
    }
}

/// One lowered descriptor of set 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSlot {
    pub binding: u32,
    pub descriptor_type: vk::DescriptorType,
    pub descriptor_count: u32,
    pub stage_flags: vk::ShaderStageFlags,
}

impl DescriptorSlot {
    pub fn to_vk(&self) -> vk::DescriptorSetLayoutBinding<'static> {
        vk::DescriptorSetLayoutBinding::default()
            .binding(self.binding)
            .descriptor_type(self.descriptor_type)
            .descriptor_count(self.descriptor_count)
            .stage_flags(self.stage_flags)
    }
}

/// Lower a resolved layout to descriptors
///
/// Combined texture/sampler pairs are merged into one entry whose stage
/// flags are the union of both.
pub fn lower_descriptors(layout: &ResolvedLayout<u32>) -> Result<Vec<DescriptorSlot>> {
    let mut descriptors: Vec<DescriptorSlot> = Vec::with_capacity(layout.len());

    for (desc, slot) in layout.bindings() {
        let descriptor_type = VulkanSlotMapper::descriptor_type(desc)?;
        let stage_flags = stage_flags_to_vk(desc.stage_flags);

        if let Some(existing) = descriptors.iter_mut().find(|d| d.binding == *slot) {
            existing.stage_flags |= stage_flags;
            continue;
        }

        descriptors.push(DescriptorSlot {
            binding: *slot,
            descriptor_type,
            descriptor_count: desc.array_size,
            stage_flags,
        });
    }

    Ok(descriptors)
}

/// Vulkan pipeline layout (descriptor set 0)
pub struct VulkanPipelineLayout {
    layout: ResolvedLayout<u32>,
    descriptors: Vec<DescriptorSlot>,
    set_layout: vk::DescriptorSetLayout,
    device: Option<ash::Device>,
}

impl VulkanPipelineLayout {
    pub fn new(device: &VulkanDevice, desc: &PipelineLayoutDesc) -> Result<Self> {
        let layout = resolve_layout(&VulkanSlotMapper, desc)?;
        let descriptors = lower_descriptors(&layout)?;

        let mut set_layout = vk::DescriptorSetLayout::null();
        let mut owner = None;
        if let Some(logical) = device.device() {
            let bindings: Vec<vk::DescriptorSetLayoutBinding> = descriptors.iter()
                .map(DescriptorSlot::to_vk)
                .collect();
            let layout_create = vk::DescriptorSetLayoutCreateInfo::default()
                .bindings(&bindings);

            set_layout = unsafe { logical.create_descriptor_set_layout(&layout_create, None) }
                .map_err(|e| galaxy_3d_hal::hal_err!(
                    "galaxy3d::vulkan",
                    "Failed to create descriptor set layout: {:?}",
                    e
                ))?;
            owner = Some(logical.clone());

            if let Some(namer) = device.namer() {
                namer.name_object(set_layout, "galaxy3d::pipeline_layout");
            }
        }

        galaxy_3d_hal::hal_debug!(
            "galaxy3d::vulkan",
            "Pipeline layout: {} bindings lowered to {} descriptors",
            layout.len(),
            descriptors.len()
        );

        Ok(Self {
            layout,
            descriptors,
            set_layout,
            device: owner,
        })
    }

    /// Abstract bindings with their binding number
    pub fn resolved(&self) -> &ResolvedLayout<u32> {
        &self.layout
    }

    /// Descriptors of set 0, ordered by first declaration
    pub fn descriptors(&self) -> &[DescriptorSlot] {
        &self.descriptors
    }

    /// Native handle (`null` on offline devices)
    pub fn handle(&self) -> vk::DescriptorSetLayout {
        self.set_layout
    }
}

impl PipelineLayout for VulkanPipelineLayout {
    fn bindings(&self) -> Vec<BindingDesc> {
        self.layout.bindings().iter().map(|(desc, _)| desc.clone()).collect()
    }
}

impl Drop for VulkanPipelineLayout {
    fn drop(&mut self) {
        if let Some(device) = &self.device {
            unsafe {
                device.destroy_descriptor_set_layout(self.set_layout, None);
            }
        }
    }
}

#[cfg(test)]
#[path = "vulkan_binding_tests.rs"]
mod tests;
