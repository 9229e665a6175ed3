/// Vulkan format table and enum conversions

use ash::vk;
use galaxy_3d_hal::galaxy3d::render::{Format, FormatTable, LoadOp, StoreOp, ShaderStage, StageFlags};

/// [`FormatTable`] of the Vulkan backend (`vk::Format`, sentinel `UNDEFINED`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VulkanFormats;

impl FormatTable for VulkanFormats {
    type Native = vk::Format;

    const UNSUPPORTED: vk::Format = vk::Format::UNDEFINED;

    fn to_native(format: Format) -> vk::Format {
        match format {
            Format::Undefined => vk::Format::UNDEFINED,
            // Color formats
            Format::R8_UNORM => vk::Format::R8_UNORM,
            Format::R8G8_UNORM => vk::Format::R8G8_UNORM,
            Format::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
            Format::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
            Format::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
            Format::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
            Format::R10G10B10A2_UNORM => vk::Format::A2B10G10R10_UNORM_PACK32,
            Format::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
            // Float formats
            Format::R32_SFLOAT => vk::Format::R32_SFLOAT,
            Format::R32G32_SFLOAT => vk::Format::R32G32_SFLOAT,
            Format::R32G32B32_SFLOAT => vk::Format::R32G32B32_SFLOAT,
            Format::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
            // Integer formats (signed)
            Format::R32_SINT => vk::Format::R32_SINT,
            Format::R32G32_SINT => vk::Format::R32G32_SINT,
            Format::R32G32B32_SINT => vk::Format::R32G32B32_SINT,
            Format::R32G32B32A32_SINT => vk::Format::R32G32B32A32_SINT,
            // Integer formats (unsigned)
            Format::R32_UINT => vk::Format::R32_UINT,
            Format::R32G32_UINT => vk::Format::R32G32_UINT,
            Format::R32G32B32_UINT => vk::Format::R32G32B32_UINT,
            Format::R32G32B32A32_UINT => vk::Format::R32G32B32A32_UINT,
            // Depth / stencil formats
            Format::D16_UNORM => vk::Format::D16_UNORM,
            Format::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
            Format::D32_SFLOAT => vk::Format::D32_SFLOAT,
            Format::D32_SFLOAT_S8_UINT => vk::Format::D32_SFLOAT_S8_UINT,
        }
    }

    fn from_native(native: vk::Format) -> Format {
        match native {
            vk::Format::R8_UNORM => Format::R8_UNORM,
            vk::Format::R8G8_UNORM => Format::R8G8_UNORM,
            vk::Format::R8G8B8A8_UNORM => Format::R8G8B8A8_UNORM,
            vk::Format::R8G8B8A8_SRGB => Format::R8G8B8A8_SRGB,
            vk::Format::B8G8R8A8_UNORM => Format::B8G8R8A8_UNORM,
            vk::Format::B8G8R8A8_SRGB => Format::B8G8R8A8_SRGB,
            vk::Format::A2B10G10R10_UNORM_PACK32 => Format::R10G10B10A2_UNORM,
            vk::Format::R16G16B16A16_SFLOAT => Format::R16G16B16A16_SFLOAT,
            vk::Format::R32_SFLOAT => Format::R32_SFLOAT,
            vk::Format::R32G32_SFLOAT => Format::R32G32_SFLOAT,
            vk::Format::R32G32B32_SFLOAT => Format::R32G32B32_SFLOAT,
            vk::Format::R32G32B32A32_SFLOAT => Format::R32G32B32A32_SFLOAT,
            vk::Format::R32_SINT => Format::R32_SINT,
            vk::Format::R32G32_SINT => Format::R32G32_SINT,
            vk::Format::R32G32B32_SINT => Format::R32G32B32_SINT,
            vk::Format::R32G32B32A32_SINT => Format::R32G32B32A32_SINT,
            vk::Format::R32_UINT => Format::R32_UINT,
            vk::Format::R32G32_UINT => Format::R32G32_UINT,
            vk::Format::R32G32B32_UINT => Format::R32G32B32_UINT,
            vk::Format::R32G32B32A32_UINT => Format::R32G32B32A32_UINT,
            vk::Format::D16_UNORM => Format::D16_UNORM,
            vk::Format::D24_UNORM_S8_UINT => Format::D24_UNORM_S8_UINT,
            vk::Format::D32_SFLOAT => Format::D32_SFLOAT,
            vk::Format::D32_SFLOAT_S8_UINT => Format::D32_SFLOAT_S8_UINT,
            _ => Format::Undefined,
        }
    }

    fn depth_stencil_view(native: vk::Format) -> vk::Format {
        match native {
            vk::Format::D16_UNORM => vk::Format::D16_UNORM_S8_UINT,
            vk::Format::X8_D24_UNORM_PACK32 => vk::Format::D24_UNORM_S8_UINT,
            vk::Format::D32_SFLOAT => vk::Format::D32_SFLOAT_S8_UINT,
            other => other,
        }
    }
}

/// True for native formats with a depth and/or stencil aspect
pub fn is_depth_stencil_format(format: vk::Format) -> bool {
    matches!(
        format,
        vk::Format::D16_UNORM
            | vk::Format::X8_D24_UNORM_PACK32
            | vk::Format::D32_SFLOAT
            | vk::Format::S8_UINT
            | vk::Format::D16_UNORM_S8_UINT
            | vk::Format::D24_UNORM_S8_UINT
            | vk::Format::D32_SFLOAT_S8_UINT
    )
}

/// Convert LoadOp to Vulkan attachment load op
pub fn load_op_to_vk(op: LoadOp) -> vk::AttachmentLoadOp {
    match op {
        LoadOp::Load => vk::AttachmentLoadOp::LOAD,
        LoadOp::Clear => vk::AttachmentLoadOp::CLEAR,
        LoadOp::DontCare => vk::AttachmentLoadOp::DONT_CARE,
    }
}

/// Convert StoreOp to Vulkan attachment store op
pub fn store_op_to_vk(op: StoreOp) -> vk::AttachmentStoreOp {
    match op {
        StoreOp::Store => vk::AttachmentStoreOp::STORE,
        StoreOp::DontCare => vk::AttachmentStoreOp::DONT_CARE,
    }
}

/// Convert a sample count to its Vulkan flag (non powers of two round down)
pub fn sample_count_to_vk(samples: u32) -> vk::SampleCountFlags {
    match samples {
        0..=1 => vk::SampleCountFlags::TYPE_1,
        2..=3 => vk::SampleCountFlags::TYPE_2,
        4..=7 => vk::SampleCountFlags::TYPE_4,
        8..=15 => vk::SampleCountFlags::TYPE_8,
        16..=31 => vk::SampleCountFlags::TYPE_16,
        32..=63 => vk::SampleCountFlags::TYPE_32,
        _ => vk::SampleCountFlags::TYPE_64,
    }
}

/// Highest sample count contained in a set of sample count flags (at least 1)
pub fn max_sample_count(counts: vk::SampleCountFlags) -> u32 {
    let bits = counts.as_raw() & 0x7F;
    if bits == 0 {
        1
    } else {
        1 << (31 - bits.leading_zeros())
    }
}

/// Convert ShaderStage to Vulkan shader stage flags
pub fn shader_stage_to_vk(stage: ShaderStage) -> vk::ShaderStageFlags {
    match stage {
        ShaderStage::Vertex => vk::ShaderStageFlags::VERTEX,
        ShaderStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
        ShaderStage::Compute => vk::ShaderStageFlags::COMPUTE,
    }
}

/// Convert abstract stage visibility to Vulkan shader stage flags
pub fn stage_flags_to_vk(stages: StageFlags) -> vk::ShaderStageFlags {
    let mut flags = vk::ShaderStageFlags::empty();
    if stages.contains(StageFlags::VERTEX) {
        flags |= vk::ShaderStageFlags::VERTEX;
    }
    if stages.contains(StageFlags::TESS_CONTROL) {
        flags |= vk::ShaderStageFlags::TESSELLATION_CONTROL;
    }
    if stages.contains(StageFlags::TESS_EVALUATION) {
        flags |= vk::ShaderStageFlags::TESSELLATION_EVALUATION;
    }
    if stages.contains(StageFlags::GEOMETRY) {
        flags |= vk::ShaderStageFlags::GEOMETRY;
    }
    if stages.contains(StageFlags::FRAGMENT) {
        flags |= vk::ShaderStageFlags::FRAGMENT;
    }
    if stages.contains(StageFlags::COMPUTE) {
        flags |= vk::ShaderStageFlags::COMPUTE;
    }
    flags
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
