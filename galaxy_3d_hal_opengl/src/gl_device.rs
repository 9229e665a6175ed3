/// OpenGL device: context limits, sample negotiation and object factories

use std::ffi::c_void;
use std::sync::Arc;
use gl::types::{GLenum, GLint};
use rustc_hash::FxHashMap;
use galaxy_3d_hal::galaxy3d::{Device, DeviceConfig, DeviceLimits, Error, Result};
use galaxy_3d_hal::galaxy3d::capability::CapabilityTable;
use galaxy_3d_hal::galaxy3d::render::{
    Format, FormatTable, PassTranslator, PipelineLayout, PipelineLayoutDesc, RenderPass,
    RenderPassDesc, Shader, ShaderDesc,
};
use crate::gl_binding::GlPipelineLayout;
use crate::gl_extensions::{features, resolve_capabilities, GlPlatform};
use crate::gl_format::GlFormats;
use crate::gl_render_pass::GlRenderPass;
use crate::gl_shader::GlShader;

/// Read one integer state value
///
/// # Safety
///
/// The GL function pointers must be loaded and a context must be current.
unsafe fn get_integer(pname: GLenum) -> u32 {
    let mut value: GLint = 0;
    gl::GetIntegerv(pname, &mut value);
    value.max(0) as u32
}

/// Largest power of two not above `value` (1 for 0)
fn floor_power_of_two(value: u32) -> u32 {
    if value <= 1 {
        1
    } else {
        1 << (31 - value.leading_zeros())
    }
}

/// OpenGL backend device
///
/// Bound to the context current when [`GlDevice::new`] ran; GL objects must
/// be created and used on that context's thread.
pub struct GlDevice {
    limits: DeviceLimits,
    /// Highest sample count per internal format (missing = `max_samples`)
    format_max_samples: FxHashMap<GLenum, u32>,
    capabilities: CapabilityTable,
    config: DeviceConfig,
    context_loaded: bool,
}

impl GlDevice {
    /// Create the device over the current GL context
    ///
    /// # Arguments
    ///
    /// * `loader` - Entry point loader of the context (`glXGetProcAddress`,
    ///   `SDL_GL_GetProcAddress`, ...). Raw `wglGetProcAddress` returns null
    ///   for GL 1.1 and older functions such as `glGetIntegerv`, so a WGL
    ///   loader must fall back to the `opengl32.dll` exports for those.
    /// * `platform` - Context-creation layer the context comes from
    /// * `config` - Device configuration
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` if a required entry point cannot be resolved.
    pub fn new<L>(mut loader: L, platform: GlPlatform, config: DeviceConfig) -> Result<Self>
    where
        L: FnMut(&str) -> *const c_void,
    {
        let capabilities = resolve_capabilities(platform, &mut loader)?;
        gl::load_with(|name| loader(name));

        let (max_color_attachments, max_samples) = unsafe {
            (get_integer(gl::MAX_COLOR_ATTACHMENTS), get_integer(gl::MAX_SAMPLES))
        };

        let mut format_max_samples = FxHashMap::default();
        if capabilities.is_available(features::INTERNAL_FORMAT_QUERY) {
            for format in Format::ALL {
                let native = GlFormats::to_native(format);
                if native == gl::NONE {
                    continue;
                }
                let mut natives = vec![native];
                let widened = GlFormats::depth_stencil_view(native);
                if widened != native {
                    natives.push(widened);
                }
                for native in natives {
                    let mut samples: GLint = 0;
                    unsafe {
                        gl::GetInternalformativ(gl::RENDERBUFFER, native, gl::SAMPLES, 1, &mut samples);
                    }
                    format_max_samples.insert(native, samples.max(1) as u32);
                }
            }
        } else {
            galaxy_3d_hal::hal_debug!(
                "galaxy3d::opengl",
                "Internal format query unavailable, sample counts limited by GL_MAX_SAMPLES"
            );
        }

        galaxy_3d_hal::hal_info!(
            "galaxy3d::opengl",
            "OpenGL device created: {} color attachments, {}x MSAA, {} entry points",
            max_color_attachments,
            max_samples,
            capabilities.len()
        );

        Ok(Self {
            limits: DeviceLimits {
                max_color_attachments,
                max_samples: max_samples.max(1),
            },
            format_max_samples,
            capabilities,
            config,
            context_loaded: true,
        })
    }

    /// Device without a GL context, built from explicit limits
    ///
    /// Render passes and pipeline layouts translate normally; shader creation fails.
    pub fn offline(
        max_color_attachments: u32,
        max_samples: u32,
        capabilities: CapabilityTable,
        config: DeviceConfig,
    ) -> Self {
        Self {
            limits: DeviceLimits {
                max_color_attachments,
                max_samples: max_samples.max(1),
            },
            format_max_samples: FxHashMap::default(),
            capabilities,
            config,
            context_loaded: false,
        }
    }

    /// Restrict the sample count of one internal format
    pub fn with_format_max_samples(mut self, format: GLenum, max_samples: u32) -> Self {
        self.format_max_samples.insert(format, max_samples.max(1));
        self
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// True if the GL function pointers were loaded by this device
    pub fn has_context(&self) -> bool {
        self.context_loaded
    }

    /// Internal format used for depth-stencil attachments without a resource
    pub fn default_depth_stencil_format(&self) -> GLenum {
        GlFormats::to_native_depth_stencil(self.config.default_depth_stencil_format)
    }

    fn max_samples_of(&self, format: GLenum) -> u32 {
        self.format_max_samples
            .get(&format)
            .copied()
            .unwrap_or(self.limits.max_samples)
    }
}

impl PassTranslator for GlDevice {
    type Formats = GlFormats;

    fn max_color_attachments(&self) -> u32 {
        self.limits.max_color_attachments
    }

    fn max_samples(&self) -> u32 {
        self.limits.max_samples
    }

    fn find_suitable_samples(&self, color_formats: &[GLenum], depth_stencil_format: GLenum, samples: u32) -> u32 {
        let limit = color_formats.iter()
            .chain(std::iter::once(&depth_stencil_format))
            .filter(|format| **format != gl::NONE)
            .map(|format| self.max_samples_of(*format))
            .fold(self.limits.max_samples, u32::min);

        floor_power_of_two(samples.min(limit))
    }
}

impl Device for GlDevice {
    fn backend_name(&self) -> &'static str {
        "opengl"
    }

    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    fn is_format_supported(&self, format: Format) -> bool {
        GlFormats::is_supported(format)
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        Ok(Arc::new(GlRenderPass::new(self, desc)?))
    }

    fn create_pipeline_layout(&self, desc: &PipelineLayoutDesc) -> Result<Arc<dyn PipelineLayout>> {
        Ok(Arc::new(GlPipelineLayout::new(self, desc)?))
    }

    fn create_shader(&self, desc: &ShaderDesc) -> Result<Arc<dyn Shader>> {
        if !self.context_loaded {
            return Err(Error::BackendError(
                "OpenGL shaders need a device created over a live context".to_string(),
            ));
        }
        Ok(Arc::new(GlShader::new(self, desc)?))
    }
}

#[cfg(test)]
#[path = "gl_device_tests.rs"]
mod tests;
