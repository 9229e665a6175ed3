/// Device trait implemented once per backend, and its configuration

use std::sync::Arc;
use crate::binding::{PipelineLayout, PipelineLayoutDesc};
use crate::capability::CapabilityTable;
use crate::error::Result;
use crate::format::Format;
use crate::render_pass::{RenderPass, RenderPassDesc};
use crate::shader::{Shader, ShaderDesc};

/// Device creation parameters, passed to backend factories
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Application name (reported to drivers that accept it)
    pub app_name: String,
    /// Application version
    pub app_version: (u32, u32, u32),
    /// Wrap created objects in the debug layer
    pub enable_diagnostics: bool,
    /// Depth-stencil format used when a render pass needs one but none is given
    pub default_depth_stencil_format: Format,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            app_name: "Galaxy3D Application".to_string(),
            app_version: (1, 0, 0),
            enable_diagnostics: cfg!(debug_assertions),
            default_depth_stencil_format: Format::D24_UNORM_S8_UINT,
        }
    }
}

/// Limits queried from the native API at device creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceLimits {
    /// Simultaneous color attachments
    pub max_color_attachments: u32,
    /// Highest sample count of any framebuffer attachment
    pub max_samples: u32,
}

/// One native graphics API behind the abstraction
///
/// Selected once through [`Hal::create_device`](crate::galaxy3d::Hal::create_device)
/// and never switched afterwards.
pub trait Device: Send + Sync {
    /// Registered backend name ("vulkan", "opengl", ...)
    fn backend_name(&self) -> &'static str;

    /// Limits of the device
    fn limits(&self) -> DeviceLimits;

    /// Entry points resolved at device creation
    fn capabilities(&self) -> &CapabilityTable;

    /// True if the format maps to a native format on this backend
    fn is_format_supported(&self, format: Format) -> bool;

    /// Compile an abstract render pass
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if the descriptor is invalid.
    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>>;

    /// Map an abstract pipeline layout onto the native binding space
    fn create_pipeline_layout(&self, desc: &PipelineLayoutDesc) -> Result<Arc<dyn PipelineLayout>>;

    /// Create and compile a shader
    ///
    /// Compilation failures are reported through [`Shader::has_errors`], not as `Err`.
    fn create_shader(&self, desc: &ShaderDesc) -> Result<Arc<dyn Shader>>;
}
