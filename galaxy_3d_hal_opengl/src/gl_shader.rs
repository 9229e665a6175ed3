/// GlShader - GLSL shader object compiled at creation

use std::ffi::CString;
use std::ptr::null;
use std::sync::RwLock;
use gl::types::{GLchar, GLint, GLsizei, GLuint};
use galaxy_3d_hal::galaxy3d::{Device, Error, Result};
use galaxy_3d_hal::galaxy3d::render::{Shader, ShaderDesc, ShaderSource, ShaderStage};
use crate::gl_device::GlDevice;
use crate::gl_extensions::features;
use crate::gl_format::shader_stage_to_gl;

/// OpenGL shader object
///
/// Compile status and info log are read back from the live object on every
/// query. GLSL always enters at `main`; any other entry point name is ignored.
pub struct GlShader {
    id: GLuint,
    stage: ShaderStage,
    object_label: bool,
    label: RwLock<Option<String>>,
}

impl GlShader {
    /// Create and compile a GLSL shader
    ///
    /// # Errors
    ///
    /// `InvalidResource` for binary sources or sources containing NUL bytes,
    /// `BackendError` if the driver refuses to create the object. Compile
    /// errors are not `Err`: they yield a shader whose `has_errors()` is true.
    pub fn new(device: &GlDevice, desc: &ShaderDesc) -> Result<Self> {
        let text = match desc.source {
            ShaderSource::Text(text) => text,
            ShaderSource::Binary(_) => {
                return Err(Error::InvalidResource(
                    "OpenGL shaders must be provided as GLSL source".to_string(),
                ));
            }
        };
        let source = CString::new(text).map_err(|_| {
            Error::InvalidResource("GLSL source contains a NUL byte".to_string())
        })?;

        if !desc.entry_point.is_empty() && desc.entry_point != "main" {
            galaxy_3d_hal::hal_warn!(
                "galaxy3d::opengl",
                "GLSL entry point is always 'main', '{}' ignored",
                desc.entry_point
            );
        }

        let id = unsafe { gl::CreateShader(shader_stage_to_gl(desc.stage)) };
        if id == 0 {
            galaxy_3d_hal::hal_bail!("galaxy3d::opengl", "Unable to create {:?} shader object", desc.stage);
        }

        unsafe {
            gl::ShaderSource(id, 1, [source.as_ptr()].as_ptr(), null());
            gl::CompileShader(id);
        }

        let shader = Self {
            id,
            stage: desc.stage,
            object_label: device.capabilities().is_available(features::OBJECT_LABEL),
            label: RwLock::new(None),
        };

        if shader.has_errors() {
            galaxy_3d_hal::hal_warn!(
                "galaxy3d::opengl",
                "{:?} shader failed to compile: {}",
                desc.stage,
                shader.report().trim_end()
            );
        }

        Ok(shader)
    }

    /// Native object name
    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Debug label last set through [`Shader::set_name`]
    pub fn label(&self) -> Option<String> {
        self.label.read().ok().and_then(|label| label.clone())
    }
}

impl Shader for GlShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn set_name(&self, name: &str) {
        if let Ok(mut label) = self.label.write() {
            *label = Some(name.to_string());
        }
        if self.object_label {
            unsafe {
                gl::ObjectLabel(gl::SHADER, self.id, name.len() as GLsizei, name.as_ptr() as *const GLchar);
            }
        }
    }

    fn has_errors(&self) -> bool {
        let mut compiled: GLint = gl::FALSE.into();
        unsafe {
            gl::GetShaderiv(self.id, gl::COMPILE_STATUS, &mut compiled);
        }
        compiled != GLint::from(gl::TRUE)
    }

    fn report(&self) -> String {
        let mut log_len: GLint = 0;
        unsafe {
            gl::GetShaderiv(self.id, gl::INFO_LOG_LENGTH, &mut log_len);
        }
        if log_len <= 0 {
            return String::new();
        }

        let mut log = vec![0u8; log_len as usize];
        let mut written: GLsizei = 0;
        unsafe {
            gl::GetShaderInfoLog(self.id, log_len, &mut written, log.as_mut_ptr() as *mut GLchar);
        }
        log.truncate(written.max(0) as usize);
        String::from_utf8_lossy(&log).into_owned()
    }
}

impl Drop for GlShader {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteShader(self.id);
        }
    }
}

#[cfg(test)]
#[path = "gl_shader_tests.rs"]
mod tests;
