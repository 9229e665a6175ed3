/// OpenGL capability sets
///
/// The platform set (WGL / GLX) is resolved before the GL set. Core entry
/// points this backend calls unconditionally are required; everything that
/// comes from an extension is optional and degrades at use sites.

use std::ffi::c_void;
use galaxy_3d_hal::galaxy3d::Result;
use galaxy_3d_hal::galaxy3d::capability::{CapabilityDesc, CapabilityTable};

/// Context-creation layer the GL context comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlPlatform {
    Wgl,
    Glx,
    /// Context created elsewhere (EGL, test harness, ...)
    None,
}

impl GlPlatform {
    /// Platform of the current build target
    pub fn native() -> Self {
        if cfg!(target_os = "windows") {
            GlPlatform::Wgl
        } else if cfg!(all(unix, not(target_os = "macos"), not(target_os = "android"))) {
            GlPlatform::Glx
        } else {
            GlPlatform::None
        }
    }
}

const WGL_CAPABILITIES: &[CapabilityDesc] = &[
    CapabilityDesc::required("wglCreateContextAttribsARB", "WGL_ARB_create_context"),
    CapabilityDesc::optional("wglSwapIntervalEXT", "WGL_EXT_swap_control"),
    CapabilityDesc::optional("wglGetSwapIntervalEXT", "WGL_EXT_swap_control"),
    CapabilityDesc::optional("wglChoosePixelFormatARB", "WGL_ARB_pixel_format"),
    CapabilityDesc::optional("wglGetPixelFormatAttribivARB", "WGL_ARB_pixel_format"),
    CapabilityDesc::optional("wglGetExtensionsStringARB", "WGL_ARB_extensions_string"),
];

const GLX_CAPABILITIES: &[CapabilityDesc] = &[
    CapabilityDesc::optional("glXSwapIntervalSGI", "GLX_SGI_swap_control"),
];

/// GL entry points
///
/// GL 1.0 / 1.1 functions are not exposed by `wglGetProcAddress`; on Windows
/// the loader resolves them from `opengl32.dll`.
pub const GL_CAPABILITIES: &[CapabilityDesc] = &[
    // Core, called unconditionally
    CapabilityDesc::required("glGetIntegerv", "GL_VERSION_1_0"),
    CapabilityDesc::required("glCreateShader", "GL_VERSION_2_0"),
    CapabilityDesc::required("glShaderSource", "GL_VERSION_2_0"),
    CapabilityDesc::required("glCompileShader", "GL_VERSION_2_0"),
    CapabilityDesc::required("glGetShaderiv", "GL_VERSION_2_0"),
    CapabilityDesc::required("glGetShaderInfoLog", "GL_VERSION_2_0"),
    CapabilityDesc::required("glDeleteShader", "GL_VERSION_2_0"),
    CapabilityDesc::required("glVertexAttribPointer", "GL_VERSION_2_0"),
    CapabilityDesc::required("glEnableVertexAttribArray", "GL_VERSION_2_0"),
    // Indexed blending and color masks
    CapabilityDesc::optional("glBlendFuncSeparatei", "GL_ARB_draw_buffers_blend"),
    CapabilityDesc::optional("glBlendEquationSeparatei", "GL_ARB_draw_buffers_blend"),
    CapabilityDesc::optional("glColorMaski", "GL_EXT_draw_buffers2"),
    CapabilityDesc::optional("glClearTexImage", "GL_ARB_clear_texture"),
    CapabilityDesc::optional("glGenSamplers", "GL_ARB_sampler_objects"),
    CapabilityDesc::optional("glBindSampler", "GL_ARB_sampler_objects"),
    CapabilityDesc::optional("glDeleteSamplers", "GL_ARB_sampler_objects"),
    CapabilityDesc::optional("glBindBuffersBase", "GL_ARB_multi_bind"),
    CapabilityDesc::optional("glBindTextures", "GL_ARB_multi_bind"),
    CapabilityDesc::optional("glBindSamplers", "GL_ARB_multi_bind"),
    CapabilityDesc::optional("glVertexAttribDivisor", "GL_ARB_instanced_arrays"),
    CapabilityDesc::optional("glGetInternalformativ", "GL_ARB_internalformat_query"),
    CapabilityDesc::optional("glVertexAttribIPointer", "GL_EXT_gpu_shader4"),
    CapabilityDesc::optional("glObjectLabel", "GL_KHR_debug"),
    CapabilityDesc::optional("glDebugMessageCallback", "GL_KHR_debug"),
    CapabilityDesc::optional("glDrawArraysInstancedBaseInstance", "GL_ARB_base_instance"),
    CapabilityDesc::optional("glDrawElementsInstancedBaseVertexBaseInstance", "GL_ARB_base_instance"),
];

/// Names of the entry points a feature depends on
pub mod features {
    pub const INTERNAL_FORMAT_QUERY: &str = "glGetInternalformativ";
    pub const INSTANCED_ARRAYS: &str = "glVertexAttribDivisor";
    pub const INTEGER_ATTRIBUTES: &str = "glVertexAttribIPointer";
    pub const OBJECT_LABEL: &str = "glObjectLabel";
}

/// Platform-specific capability set
pub fn platform_capabilities(platform: GlPlatform) -> &'static [CapabilityDesc] {
    match platform {
        GlPlatform::Wgl => WGL_CAPABILITIES,
        GlPlatform::Glx => GLX_CAPABILITIES,
        GlPlatform::None => &[],
    }
}

/// Resolve the platform set then the GL set through a name loader
///
/// # Errors
///
/// `CapabilityMissing` naming the first required entry point not found.
pub fn resolve_capabilities<L>(platform: GlPlatform, loader: L) -> Result<CapabilityTable>
where
    L: FnMut(&str) -> *const c_void,
{
    CapabilityTable::resolve(&[platform_capabilities(platform), GL_CAPABILITIES], loader)
}

#[cfg(test)]
#[path = "gl_extensions_tests.rs"]
mod tests;
