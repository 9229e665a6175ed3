/// VulkanShader - SPIR-V validation, reflection and shader module creation

use std::fmt::Write as _;
use std::sync::RwLock;
use ash::vk;
use galaxy_3d_hal::galaxy3d::{Error, Result};
use galaxy_3d_hal::galaxy3d::render::{
    DisassembleFlags, Shader, ShaderDesc, ShaderSource, ShaderStage,
};
use crate::vulkan_device::VulkanDevice;
use crate::vulkan_extensions::DebugNamer;

/// First word of every SPIR-V module
pub const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Resource found by reflection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectedResource {
    Descriptor {
        name: String,
        set: u32,
        binding: u32,
        /// Descriptor type as reported by the reflector
        kind: String,
    },
    PushConstant {
        name: String,
        size: Option<u32>,
    },
}

/// Decode a SPIR-V byte stream into words
///
/// # Errors
///
/// Returns a message if the length is not a multiple of 4 or the magic
/// number is wrong.
pub fn spirv_words(bytes: &[u8]) -> std::result::Result<Vec<u32>, String> {
    if bytes.len() % 4 != 0 {
        return Err(format!("SPIR-V size {} is not a multiple of 4", bytes.len()));
    }
    let words: Vec<u32> = bytes.chunks_exact(4)
        .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();
    match words.first() {
        Some(&SPIRV_MAGIC) => Ok(words),
        Some(other) => Err(format!("invalid SPIR-V magic number 0x{:08x}", other)),
        None => Err("empty SPIR-V module".to_string()),
    }
}

/// Reflect the interface of `entry_point`
fn reflect(words: &[u32], entry_point: &str) -> std::result::Result<Vec<ReflectedResource>, String> {
    let entry_points = spirq::ReflectConfig::new()
        .spv(words)
        .ref_all_rscs(true)
        .reflect()
        .map_err(|e| format!("SPIR-V reflection failed: {:?}", e))?;

    let Some(entry) = entry_points.iter().find(|ep| ep.name == entry_point) else {
        let names: Vec<&str> = entry_points.iter().map(|ep| ep.name.as_str()).collect();
        return Err(format!(
            "entry point '{}' not found (module declares: {})",
            entry_point,
            names.join(", ")
        ));
    };

    let mut resources = Vec::new();
    for var in entry.vars.iter() {
        match var {
            spirq::var::Variable::Descriptor { name, desc_bind, desc_ty, .. } => {
                resources.push(ReflectedResource::Descriptor {
                    name: name.clone().unwrap_or_default(),
                    set: desc_bind.set(),
                    binding: desc_bind.bind(),
                    kind: format!("{:?}", desc_ty),
                });
            }
            spirq::var::Variable::PushConstant { name, ty } => {
                resources.push(ReflectedResource::PushConstant {
                    name: name.clone().unwrap_or_default(),
                    size: ty.nbyte().map(|s| s as u32),
                });
            }
            _ => {}
        }
    }
    Ok(resources)
}

/// Vulkan shader
///
/// SPIR-V is validated and reflected at creation. A module that fails is
/// kept as a failed shader carrying its report; no `vk::ShaderModule` is
/// created for it.
pub struct VulkanShader {
    stage: ShaderStage,
    entry_point: String,
    errors: Option<String>,
    resources: Vec<ReflectedResource>,
    word_count: usize,
    module: vk::ShaderModule,
    label: RwLock<Option<String>>,
    device: Option<ash::Device>,
    namer: Option<DebugNamer>,
}

impl VulkanShader {
    /// Create a shader from a SPIR-V binary
    ///
    /// # Errors
    ///
    /// `InvalidResource` for text sources. A native module creation failure
    /// is returned as `BackendError`. Invalid SPIR-V is not an error: it
    /// yields a shader whose `has_errors()` is true.
    pub fn new(device: &VulkanDevice, desc: &ShaderDesc) -> Result<Self> {
        let bytes = match desc.source {
            ShaderSource::Binary(bytes) => bytes,
            ShaderSource::Text(_) => {
                return Err(Error::InvalidResource(
                    "Vulkan shaders must be provided as SPIR-V binaries".to_string(),
                ));
            }
        };

        let mut shader = Self {
            stage: desc.stage,
            entry_point: desc.entry_point.to_string(),
            errors: None,
            resources: Vec::new(),
            word_count: 0,
            module: vk::ShaderModule::null(),
            label: RwLock::new(None),
            device: None,
            namer: device.namer(),
        };

        let words = match spirv_words(bytes).and_then(|words| {
            reflect(&words, desc.entry_point).map(|resources| (words, resources))
        }) {
            Ok((words, resources)) => {
                shader.resources = resources;
                words
            }
            Err(message) => {
                galaxy_3d_hal::hal_warn!(
                    "galaxy3d::vulkan",
                    "{:?} shader rejected: {}",
                    desc.stage,
                    message
                );
                shader.errors = Some(message);
                return Ok(shader);
            }
        };
        shader.word_count = words.len();

        if let Some(logical) = device.device() {
            let create_info = vk::ShaderModuleCreateInfo::default().code(&words);
            shader.module = unsafe { logical.create_shader_module(&create_info, None) }
                .map_err(|e| galaxy_3d_hal::hal_err!(
                    "galaxy3d::vulkan",
                    "Failed to create shader module: {:?}",
                    e
                ))?;
            shader.device = Some(logical.clone());
        }

        Ok(shader)
    }

    /// Reflected descriptors and push constants of the entry point
    pub fn resources(&self) -> &[ReflectedResource] {
        &self.resources
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Native handle (`null` when failed or offline)
    pub fn handle(&self) -> vk::ShaderModule {
        self.module
    }

    /// Debug label last set through [`Shader::set_name`]
    pub fn label(&self) -> Option<String> {
        self.label.read().ok().and_then(|label| label.clone())
    }
}

impl Shader for VulkanShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn set_name(&self, name: &str) {
        if let Ok(mut label) = self.label.write() {
            *label = Some(name.to_string());
        }
        if self.module == vk::ShaderModule::null() {
            return;
        }
        if let Some(namer) = &self.namer {
            namer.name_object(self.module, name);
        }
    }

    fn has_errors(&self) -> bool {
        self.errors.is_some()
    }

    fn report(&self) -> String {
        self.errors.clone().unwrap_or_default()
    }

    /// Listing of the reflected interface (empty for failed shaders)
    fn disassemble(&self, flags: DisassembleFlags) -> String {
        if self.has_errors() {
            return String::new();
        }

        let mut out = String::new();
        let _ = writeln!(
            out,
            "; {:?} entry point '{}', {} words",
            self.stage, self.entry_point, self.word_count
        );
        for (index, resource) in self.resources.iter().enumerate() {
            if flags.contains(DisassembleFlags::SHOW_OFFSETS) {
                let _ = write!(out, "{:04}: ", index);
            }
            match resource {
                ReflectedResource::Descriptor { name, set, binding, kind } => {
                    if flags.contains(DisassembleFlags::SHOW_BINDINGS) {
                        let _ = writeln!(out, "descriptor {} {} (set={}, binding={})", kind, name, set, binding);
                    } else {
                        let _ = writeln!(out, "descriptor {} {}", kind, name);
                    }
                }
                ReflectedResource::PushConstant { name, size } => match size {
                    Some(size) => {
                        let _ = writeln!(out, "push_constant {} ({} bytes)", name, size);
                    }
                    None => {
                        let _ = writeln!(out, "push_constant {}", name);
                    }
                },
            }
        }
        out
    }
}

impl Drop for VulkanShader {
    fn drop(&mut self) {
        if let Some(device) = &self.device {
            unsafe {
                device.destroy_shader_module(self.module, None);
            }
        }
    }
}

#[cfg(test)]
#[path = "vulkan_shader_tests.rs"]
mod tests;
