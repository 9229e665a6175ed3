/*!
# Galaxy 3D HAL - OpenGL Backend

OpenGL implementation of the galaxy_3d_hal device traits, built on the `gl`
crate.

Entry points are resolved through the loader of the current context, first
against the platform set (WGL / GLX) then against the GL set. Descriptors
translate to sized internal formats, draw buffer lists, binding points and
attribute pointer calls. Shaders are GLSL, compiled at creation.

The backend is registered by name so applications can select it at runtime.
*/

mod gl_device;
mod gl_extensions;
mod gl_format;
mod gl_render_pass;
mod gl_binding;
mod gl_vertex;
mod gl_shader;

#[cfg(test)]
pub(crate) mod gl_test_utils;

use std::ffi::c_void;
use std::sync::Arc;
use galaxy_3d_hal::galaxy3d::{Device, DeviceConfig, Hal, Result};

pub use gl_device::GlDevice;
pub use gl_extensions::{features, platform_capabilities, resolve_capabilities, GlPlatform, GL_CAPABILITIES};
pub use gl_format::{shader_stage_to_gl, vertex_component_count, vertex_component_type, GlFormats};
pub use gl_render_pass::{GlAttachmentTexture, GlRenderPass};
pub use gl_binding::{GlBindingSlot, GlBindingTarget, GlPipelineLayout, GlSlotMapper};
pub use gl_vertex::{bind_vertex_attributes, lower_vertex_format, GlVertexAttribPointer, GlVertexLayout};
pub use gl_shader::GlShader;

/// Name the backend is registered under
pub const BACKEND_NAME: &str = "opengl";

/// Register the OpenGL backend with the HAL
///
/// Devices created through `Hal::create_device("opengl", ..)` resolve their
/// entry points with `loader`; the context must be current on the calling
/// thread. On WGL the loader must also cover GL 1.1 functions, which only
/// `opengl32.dll` exports.
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_hal::galaxy3d::{DeviceConfig, Hal};
/// use galaxy_3d_hal_opengl::GlPlatform;
///
/// # fn get_proc_address(_name: &str) -> *const std::ffi::c_void { std::ptr::null() }
/// # fn run() -> galaxy_3d_hal::galaxy3d::Result<()> {
/// galaxy_3d_hal_opengl::register(get_proc_address, GlPlatform::native())?;
/// let _device = Hal::create_device("opengl", &DeviceConfig::default())?;
/// # Ok(())
/// # }
/// ```
pub fn register<L>(loader: L, platform: GlPlatform) -> Result<()>
where
    L: Fn(&str) -> *const c_void + Send + Sync + 'static,
{
    Hal::register_backend(BACKEND_NAME, move |config: &DeviceConfig| {
        let device: Arc<dyn Device> = Arc::new(GlDevice::new(|name: &str| loader(name), platform, config.clone())?);
        Ok(device)
    })
}
