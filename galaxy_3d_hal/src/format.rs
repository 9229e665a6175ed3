/// Abstract pixel / vertex channel formats and the per-backend conversion table contract

use std::fmt;

/// Abstract format identifier shared by textures, attachments and vertex channels
///
/// Every backend maps each variant to exactly one native format, or to its
/// "unsupported" sentinel (see [`FormatTable`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum Format {
    /// No format (unused attachment slot)
    #[default]
    Undefined,

    // Color formats
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R10G10B10A2_UNORM,
    R16G16B16A16_SFLOAT,

    // 32-bit channel formats (color targets and vertex attributes)
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,
    R32_SINT,
    R32G32_SINT,
    R32G32B32_SINT,
    R32G32B32A32_SINT,
    R32_UINT,
    R32G32_UINT,
    R32G32B32_UINT,
    R32G32B32A32_UINT,

    // Depth / stencil formats
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_SFLOAT,
    D32_SFLOAT_S8_UINT,
}

impl Format {
    /// Every defined format, in declaration order
    pub const ALL: [Format; 24] = [
        Format::R8_UNORM,
        Format::R8G8_UNORM,
        Format::R8G8B8A8_UNORM,
        Format::R8G8B8A8_SRGB,
        Format::B8G8R8A8_UNORM,
        Format::B8G8R8A8_SRGB,
        Format::R10G10B10A2_UNORM,
        Format::R16G16B16A16_SFLOAT,
        Format::R32_SFLOAT,
        Format::R32G32_SFLOAT,
        Format::R32G32B32_SFLOAT,
        Format::R32G32B32A32_SFLOAT,
        Format::R32_SINT,
        Format::R32G32_SINT,
        Format::R32G32B32_SINT,
        Format::R32G32B32A32_SINT,
        Format::R32_UINT,
        Format::R32G32_UINT,
        Format::R32G32B32_UINT,
        Format::R32G32B32A32_UINT,
        Format::D16_UNORM,
        Format::D24_UNORM_S8_UINT,
        Format::D32_SFLOAT,
        Format::D32_SFLOAT_S8_UINT,
    ];

    /// Returns false only for [`Format::Undefined`]
    pub fn is_defined(&self) -> bool {
        *self != Format::Undefined
    }

    /// True for formats carrying a depth aspect
    pub fn is_depth(&self) -> bool {
        matches!(
            self,
            Format::D16_UNORM | Format::D24_UNORM_S8_UINT | Format::D32_SFLOAT | Format::D32_SFLOAT_S8_UINT
        )
    }

    /// True for formats carrying a stencil aspect
    pub fn has_stencil(&self) -> bool {
        matches!(self, Format::D24_UNORM_S8_UINT | Format::D32_SFLOAT_S8_UINT)
    }

    /// True for formats with both depth and stencil aspects
    pub fn is_depth_stencil(&self) -> bool {
        self.is_depth() && self.has_stencil()
    }

    /// True for formats usable as color attachments or vertex channels
    pub fn is_color(&self) -> bool {
        self.is_defined() && !self.is_depth()
    }

    /// Number of channels (depth and stencil count as one channel each)
    pub fn components(&self) -> u32 {
        match self {
            Format::Undefined => 0,
            Format::R8_UNORM | Format::R32_SFLOAT | Format::R32_SINT | Format::R32_UINT => 1,
            Format::D16_UNORM | Format::D32_SFLOAT => 1,
            Format::R8G8_UNORM | Format::R32G32_SFLOAT | Format::R32G32_SINT | Format::R32G32_UINT => 2,
            Format::D24_UNORM_S8_UINT | Format::D32_SFLOAT_S8_UINT => 2,
            Format::R32G32B32_SFLOAT | Format::R32G32B32_SINT | Format::R32G32B32_UINT => 3,
            _ => 4,
        }
    }

    /// Size of one texel / vertex element in bits
    pub fn bit_size(&self) -> u32 {
        match self {
            Format::Undefined => 0,
            Format::R8_UNORM => 8,
            Format::R8G8_UNORM | Format::D16_UNORM => 16,
            Format::R8G8B8A8_UNORM
            | Format::R8G8B8A8_SRGB
            | Format::B8G8R8A8_UNORM
            | Format::B8G8R8A8_SRGB
            | Format::R10G10B10A2_UNORM
            | Format::D24_UNORM_S8_UINT
            | Format::D32_SFLOAT
            | Format::R32_SFLOAT
            | Format::R32_SINT
            | Format::R32_UINT => 32,
            // 32 bits depth + 8 bits stencil + 24 bits padding
            Format::D32_SFLOAT_S8_UINT => 64,
            Format::R16G16B16A16_SFLOAT
            | Format::R32G32_SFLOAT
            | Format::R32G32_SINT
            | Format::R32G32_UINT => 64,
            Format::R32G32B32_SFLOAT | Format::R32G32B32_SINT | Format::R32G32B32_UINT => 96,
            Format::R32G32B32A32_SFLOAT | Format::R32G32B32A32_SINT | Format::R32G32B32A32_UINT => 128,
        }
    }
}

// ============================================================================
// Per-backend conversion table
// ============================================================================

/// Bidirectional mapping between [`Format`] and one backend's native format identifiers
///
/// Implemented by a zero-sized marker type per backend (e.g. `VulkanFormats`).
/// All functions are pure and total: formats a backend cannot express map to
/// [`FormatTable::UNSUPPORTED`] instead of failing, so callers decide whether
/// an unsupported format is fatal.
pub trait FormatTable: 'static {
    /// Native format identifier (e.g. `vk::Format`, `GLenum`)
    type Native: Copy + PartialEq + fmt::Debug + Send + Sync + 'static;

    /// Sentinel for "unknown / unsupported / unused"
    const UNSUPPORTED: Self::Native;

    /// Native format for an abstract format
    fn to_native(format: Format) -> Self::Native;

    /// Abstract format for a native one ([`Format::Undefined`] when unknown)
    fn from_native(native: Self::Native) -> Format;

    /// Apply the backend's combined depth-stencil aliasing rule to a native format
    ///
    /// Depth-only formats are widened to the backend's combined depth+stencil
    /// type; every other value passes through unchanged.
    fn depth_stencil_view(native: Self::Native) -> Self::Native;

    /// Native format of an abstract format used as a depth-stencil attachment
    fn to_native_depth_stencil(format: Format) -> Self::Native {
        Self::depth_stencil_view(Self::to_native(format))
    }

    /// True if the format maps to something other than the sentinel
    fn is_supported(format: Format) -> bool {
        Self::to_native(format) != Self::UNSUPPORTED
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
