/// Shader objects as seen by the application and the debug layer

use bitflags::bitflags;

/// Pipeline stage of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

/// Shader code handed to a backend
///
/// Loading the code from disk is the caller's business; backends receive
/// it fully in memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderSource<'a> {
    /// Source text (GLSL for the OpenGL backend)
    Text(&'a str),
    /// Binary module (SPIR-V for the Vulkan backend)
    Binary(&'a [u8]),
}

/// Shader creation parameters
#[derive(Debug, Clone, Copy)]
pub struct ShaderDesc<'a> {
    /// Pipeline stage
    pub stage: ShaderStage,
    /// Code
    pub source: ShaderSource<'a>,
    /// Entry point name (e.g. "main")
    pub entry_point: &'a str,
}

/// Compilation state of a shader
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    Uncompiled,
    Compiled,
    Failed,
}

bitflags! {
    /// Options of [`Shader::disassemble`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DisassembleFlags: u32 {
        /// Prefix every line with its offset / index
        const SHOW_OFFSETS = 1 << 0;
        /// Include resource bindings in the listing
        const SHOW_BINDINGS = 1 << 1;
    }
}

/// Compiled shader object
///
/// Backends compile at creation time, so a shader is either `Compiled` or
/// `Failed`; compile errors are object state, not `Err` values.
pub trait Shader: Send + Sync {
    /// Pipeline stage
    fn stage(&self) -> ShaderStage;

    /// Attach a debug label to the native object (no-op when unsupported)
    fn set_name(&self, name: &str);

    /// True if compilation (or validation) failed
    fn has_errors(&self) -> bool;

    /// Accumulated compiler / validation messages (empty if none)
    fn report(&self) -> String;

    /// Human-readable listing of the compiled code, empty when unsupported
    fn disassemble(&self, _flags: DisassembleFlags) -> String {
        String::new()
    }

    /// Compilation state derived from [`Shader::has_errors`]
    fn compile_status(&self) -> CompileStatus {
        if self.has_errors() {
            CompileStatus::Failed
        } else {
            CompileStatus::Compiled
        }
    }
}
