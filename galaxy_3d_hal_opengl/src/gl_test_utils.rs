//! Fake OpenGL driver for tests (no GL context required)
//!
//! Implements the handful of GL functions the backend calls, with process-wide
//! state. Tests loading it through `gl::load_with` must run `#[serial]`.
//!
//! Limits: `GL_MAX_COLOR_ATTACHMENTS` = 4, `GL_MAX_SAMPLES` = 8. Internal
//! format queries report 4 samples for `GL_RGBA32F`, 2 for
//! `GL_DEPTH32F_STENCIL8` and 8 for everything else. Shader sources
//! containing [`FAKE_COMPILE_ERROR_MARKER`] fail to compile.

#![allow(dead_code)]

use std::ffi::{c_void, CStr};
use std::sync::Mutex;
use gl::types::{GLboolean, GLchar, GLenum, GLint, GLsizei, GLuint};

pub const FAKE_COMPILE_ERROR_MARKER: &str = "#error";
pub const FAKE_MAX_COLOR_ATTACHMENTS: GLint = 4;
pub const FAKE_MAX_SAMPLES: GLint = 8;

#[derive(Debug, Clone, Default)]
pub struct FakeShader {
    pub kind: GLenum,
    pub source: String,
    pub compiled: bool,
    pub label: Option<String>,
    pub deleted: bool,
}

static SHADERS: Mutex<Vec<FakeShader>> = Mutex::new(Vec::new());
static CALLS: Mutex<Vec<String>> = Mutex::new(Vec::new());

/// Forget every shader and recorded call
pub fn reset_fake_gl() {
    SHADERS.lock().unwrap().clear();
    CALLS.lock().unwrap().clear();
}

/// Shader state by GL name
pub fn fake_shader(id: GLuint) -> FakeShader {
    SHADERS.lock().unwrap()[(id - 1) as usize].clone()
}

/// Vertex attribute calls recorded since the last reset
pub fn recorded_calls() -> Vec<String> {
    CALLS.lock().unwrap().clone()
}

fn record(call: String) {
    CALLS.lock().unwrap().push(call);
}

// ============================================================================
// Fake entry points
// ============================================================================

extern "system" fn stub() {}

extern "system" fn get_integerv(pname: GLenum, data: *mut GLint) {
    let value = match pname {
        gl::MAX_COLOR_ATTACHMENTS => FAKE_MAX_COLOR_ATTACHMENTS,
        gl::MAX_SAMPLES => FAKE_MAX_SAMPLES,
        _ => 0,
    };
    unsafe { *data = value };
}

extern "system" fn get_internalformativ(
    _target: GLenum,
    internal_format: GLenum,
    pname: GLenum,
    buf_size: GLsizei,
    params: *mut GLint,
) {
    if pname != gl::SAMPLES || buf_size < 1 {
        return;
    }
    let max = match internal_format {
        gl::RGBA32F => 4,
        gl::DEPTH32F_STENCIL8 => 2,
        _ => 8,
    };
    unsafe { *params = max };
}

extern "system" fn create_shader(kind: GLenum) -> GLuint {
    let mut shaders = SHADERS.lock().unwrap();
    shaders.push(FakeShader { kind, ..FakeShader::default() });
    shaders.len() as GLuint
}

extern "system" fn shader_source(
    shader: GLuint,
    count: GLsizei,
    strings: *const *const GLchar,
    lengths: *const GLint,
) {
    let mut source = String::new();
    for i in 0..count as usize {
        unsafe {
            let ptr = *strings.add(i);
            if lengths.is_null() || *lengths.add(i) < 0 {
                source.push_str(&CStr::from_ptr(ptr).to_string_lossy());
            } else {
                let bytes = std::slice::from_raw_parts(ptr as *const u8, *lengths.add(i) as usize);
                source.push_str(&String::from_utf8_lossy(bytes));
            }
        }
    }
    SHADERS.lock().unwrap()[(shader - 1) as usize].source = source;
}

extern "system" fn compile_shader(shader: GLuint) {
    let mut shaders = SHADERS.lock().unwrap();
    let entry = &mut shaders[(shader - 1) as usize];
    entry.compiled = !entry.source.contains(FAKE_COMPILE_ERROR_MARKER);
}

fn info_log(shader: &FakeShader) -> String {
    if shader.compiled {
        String::new()
    } else {
        "0:1(1): error: #error directive".to_string()
    }
}

extern "system" fn get_shaderiv(shader: GLuint, pname: GLenum, params: *mut GLint) {
    let shaders = SHADERS.lock().unwrap();
    let entry = &shaders[(shader - 1) as usize];
    let value = match pname {
        gl::COMPILE_STATUS => entry.compiled as GLint,
        gl::INFO_LOG_LENGTH => {
            let log = info_log(entry);
            if log.is_empty() { 0 } else { log.len() as GLint + 1 }
        }
        gl::SHADER_TYPE => entry.kind as GLint,
        _ => 0,
    };
    unsafe { *params = value };
}

extern "system" fn get_shader_info_log(
    shader: GLuint,
    buf_size: GLsizei,
    length: *mut GLsizei,
    info_log_out: *mut GLchar,
) {
    let log = info_log(&SHADERS.lock().unwrap()[(shader - 1) as usize]);
    let written = log.len().min((buf_size as usize).saturating_sub(1));
    unsafe {
        std::ptr::copy_nonoverlapping(log.as_ptr(), info_log_out as *mut u8, written);
        *info_log_out.add(written) = 0;
        if !length.is_null() {
            *length = written as GLsizei;
        }
    }
}

extern "system" fn delete_shader(shader: GLuint) {
    SHADERS.lock().unwrap()[(shader - 1) as usize].deleted = true;
}

extern "system" fn object_label(identifier: GLenum, name: GLuint, length: GLsizei, label: *const GLchar) {
    if identifier != gl::SHADER {
        return;
    }
    let text = unsafe {
        let bytes = std::slice::from_raw_parts(label as *const u8, length as usize);
        String::from_utf8_lossy(bytes).into_owned()
    };
    SHADERS.lock().unwrap()[(name - 1) as usize].label = Some(text);
}

extern "system" fn vertex_attrib_pointer(
    index: GLuint,
    size: GLint,
    kind: GLenum,
    normalized: GLboolean,
    stride: GLsizei,
    pointer: *const c_void,
) {
    record(format!(
        "pointer {} {} 0x{:x} {} {} {}",
        index, size, kind, normalized, stride, pointer as usize
    ));
}

extern "system" fn vertex_attrib_i_pointer(
    index: GLuint,
    size: GLint,
    kind: GLenum,
    stride: GLsizei,
    pointer: *const c_void,
) {
    record(format!("ipointer {} {} 0x{:x} {} {}", index, size, kind, stride, pointer as usize));
}

extern "system" fn vertex_attrib_divisor(index: GLuint, divisor: GLuint) {
    record(format!("divisor {} {}", index, divisor));
}

extern "system" fn enable_vertex_attrib_array(index: GLuint) {
    record(format!("enable {}", index));
}

// ============================================================================
// Loaders
// ============================================================================

/// Address of a fake entry point; every other name resolves to a no-op stub
pub fn fake_proc_address(name: &str) -> *const c_void {
    match name {
        "glGetIntegerv" => get_integerv as *const c_void,
        "glGetInternalformativ" => get_internalformativ as *const c_void,
        "glCreateShader" => create_shader as *const c_void,
        "glShaderSource" => shader_source as *const c_void,
        "glCompileShader" => compile_shader as *const c_void,
        "glGetShaderiv" => get_shaderiv as *const c_void,
        "glGetShaderInfoLog" => get_shader_info_log as *const c_void,
        "glDeleteShader" => delete_shader as *const c_void,
        "glObjectLabel" => object_label as *const c_void,
        "glVertexAttribPointer" => vertex_attrib_pointer as *const c_void,
        "glVertexAttribIPointer" => vertex_attrib_i_pointer as *const c_void,
        "glVertexAttribDivisor" => vertex_attrib_divisor as *const c_void,
        "glEnableVertexAttribArray" => enable_vertex_attrib_array as *const c_void,
        _ => stub as *const c_void,
    }
}

/// Fake loader where the listed names (and their suffixed aliases) are absent
pub fn fake_loader_without(absent: &'static [&'static str]) -> impl FnMut(&str) -> *const c_void {
    move |name: &str| {
        if absent.iter().any(|missing| name.starts_with(missing)) {
            std::ptr::null()
        } else {
            fake_proc_address(name)
        }
    }
}
