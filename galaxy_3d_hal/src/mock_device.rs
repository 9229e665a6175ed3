/// Mock device for unit tests (no GPU required)
///
/// Provides a format table over plain integers, a device with configurable
/// limits and per-format sample counts, and mock shaders / render passes /
/// textures so the translator and the debug layer can be exercised without
/// any native API.

use std::sync::{Arc, Mutex, RwLock};
use crate::binding::{BindingDesc, BindingSlotMapper, PipelineLayout, PipelineLayoutDesc, ResolvedLayout, resolve_layout};
use crate::capability::CapabilityTable;
use crate::device::{Device, DeviceConfig, DeviceLimits};
use crate::error::{Error, Result};
use crate::format::{Format, FormatTable};
use crate::render_pass::{ClearFlags, CompiledRenderPass, NativeAttachment, PassTranslator, RenderPass, RenderPassDesc};
use crate::shader::{Shader, ShaderDesc, ShaderSource, ShaderStage};

/// Marker in shader text making the mock compiler fail
pub const MOCK_COMPILE_ERROR_MARKER: &str = "#error";

// ============================================================================
// Mock Formats
// ============================================================================

/// Format table mapping each format to `100 + index in Format::ALL`
///
/// `B8G8R8A8_SRGB` is unsupported, the sentinel is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MockFormats;

impl FormatTable for MockFormats {
    type Native = u32;

    const UNSUPPORTED: u32 = 0;

    fn to_native(format: Format) -> u32 {
        match format {
            Format::Undefined | Format::B8G8R8A8_SRGB => 0,
            other => Format::ALL.iter()
                .position(|f| *f == other)
                .map(|index| 100 + index as u32)
                .unwrap_or(0),
        }
    }

    fn from_native(native: u32) -> Format {
        native.checked_sub(100)
            .and_then(|index| Format::ALL.get(index as usize).copied())
            .unwrap_or(Format::Undefined)
    }

    fn depth_stencil_view(native: u32) -> u32 {
        match Self::from_native(native) {
            Format::D16_UNORM => Self::to_native(Format::D24_UNORM_S8_UINT),
            Format::D32_SFLOAT => Self::to_native(Format::D32_SFLOAT_S8_UINT),
            _ => native,
        }
    }
}

// ============================================================================
// Mock Texture
// ============================================================================

/// Existing resource with a fixed native format
#[derive(Debug)]
pub struct MockTexture {
    pub native: u32,
}

impl MockTexture {
    pub fn new(format: Format) -> Self {
        Self { native: MockFormats::to_native(format) }
    }
}

impl NativeAttachment for MockTexture {
    type Native = u32;

    fn native_format(&self) -> u32 {
        self.native
    }
}

// ============================================================================
// Mock Render Pass
// ============================================================================

#[derive(Debug)]
pub struct MockRenderPass {
    pub compiled: CompiledRenderPass<MockFormats>,
    pub name: Mutex<String>,
}

impl MockRenderPass {
    pub fn new(compiled: CompiledRenderPass<MockFormats>) -> Self {
        Self { compiled, name: Mutex::new(String::new()) }
    }

    pub fn name(&self) -> String {
        self.name.lock().unwrap().clone()
    }
}

impl RenderPass for MockRenderPass {
    fn num_color_attachments(&self) -> u32 {
        self.compiled.num_color_attachments()
    }

    fn clear_flags(&self) -> ClearFlags {
        self.compiled.clear_flags()
    }

    fn samples(&self) -> u32 {
        self.compiled.samples()
    }

    fn set_name(&self, name: &str) {
        *self.name.lock().unwrap() = name.to_string();
    }
}

// ============================================================================
// Mock Shader
// ============================================================================

/// Shader "compiled" by looking for [`MOCK_COMPILE_ERROR_MARKER`]
#[derive(Debug)]
pub struct MockShader {
    pub stage: ShaderStage,
    /// Compiler log, `Some` when compilation failed
    pub errors: RwLock<Option<String>>,
    pub name: Mutex<String>,
}

impl MockShader {
    pub fn compile(stage: ShaderStage, source: &str) -> Self {
        let shader = Self {
            stage,
            errors: RwLock::new(None),
            name: Mutex::new(String::new()),
        };
        shader.recompile(source);
        shader
    }

    /// Replace the shader code in place (the live state changes)
    pub fn recompile(&self, source: &str) {
        let errors = source.contains(MOCK_COMPILE_ERROR_MARKER)
            .then(|| format!("ERROR: 0:1: '{}' : compilation failed", MOCK_COMPILE_ERROR_MARKER));
        *self.errors.write().unwrap() = errors;
    }

    pub fn name(&self) -> String {
        self.name.lock().unwrap().clone()
    }
}

impl Shader for MockShader {
    fn stage(&self) -> ShaderStage {
        self.stage
    }

    fn set_name(&self, name: &str) {
        *self.name.lock().unwrap() = name.to_string();
    }

    fn has_errors(&self) -> bool {
        self.errors.read().unwrap().is_some()
    }

    fn report(&self) -> String {
        self.errors.read().unwrap().clone().unwrap_or_default()
    }
}

// ============================================================================
// Mock Pipeline Layout
// ============================================================================

/// Single unified binding space: native slot = abstract slot
pub struct MockSlotMapper;

impl BindingSlotMapper for MockSlotMapper {
    type Slot = u32;

    fn map_binding(&self, binding: &BindingDesc) -> Result<u32> {
        Ok(binding.slot)
    }
}

pub struct MockPipelineLayout {
    pub layout: ResolvedLayout<u32>,
}

impl PipelineLayout for MockPipelineLayout {
    fn bindings(&self) -> Vec<BindingDesc> {
        self.layout.bindings().iter().map(|(desc, _)| desc.clone()).collect()
    }
}

// ============================================================================
// Mock Device
// ============================================================================

pub struct MockDevice {
    pub limits: DeviceLimits,
    /// (native format, max samples) overrides, other formats support `limits.max_samples`
    pub format_samples: Vec<(u32, u32)>,
    pub capabilities: CapabilityTable,
    pub config: DeviceConfig,
}

impl MockDevice {
    pub fn new(max_color_attachments: u32, max_samples: u32) -> Self {
        Self {
            limits: DeviceLimits { max_color_attachments, max_samples },
            format_samples: Vec::new(),
            capabilities: CapabilityTable::default(),
            config: DeviceConfig::default(),
        }
    }

    /// Restrict one format to at most `max_samples`
    pub fn with_format_samples(mut self, format: Format, max_samples: u32) -> Self {
        self.format_samples.push((MockFormats::to_native(format), max_samples));
        self
    }

    fn format_max_samples(&self, native: u32) -> u32 {
        self.format_samples.iter()
            .find(|(f, _)| *f == native)
            .map(|(_, max)| *max)
            .unwrap_or(self.limits.max_samples)
    }
}

impl PassTranslator for MockDevice {
    type Formats = MockFormats;

    fn max_color_attachments(&self) -> u32 {
        self.limits.max_color_attachments
    }

    fn max_samples(&self) -> u32 {
        self.limits.max_samples
    }

    fn find_suitable_samples(&self, color_formats: &[u32], depth_stencil_format: u32, samples: u32) -> u32 {
        let limit = color_formats.iter()
            .chain(std::iter::once(&depth_stencil_format))
            .filter(|native| **native != MockFormats::UNSUPPORTED)
            .map(|native| self.format_max_samples(*native))
            .fold(samples, u32::min);

        // Highest power of two not above the limit
        let mut result = 1;
        while result * 2 <= limit {
            result *= 2;
        }
        result
    }
}

impl Device for MockDevice {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    fn limits(&self) -> DeviceLimits {
        self.limits
    }

    fn capabilities(&self) -> &CapabilityTable {
        &self.capabilities
    }

    fn is_format_supported(&self, format: Format) -> bool {
        MockFormats::is_supported(format)
    }

    fn create_render_pass(&self, desc: &RenderPassDesc) -> Result<Arc<dyn RenderPass>> {
        let compiled = CompiledRenderPass::<MockFormats>::from_desc(self, desc)?;
        Ok(Arc::new(MockRenderPass::new(compiled)))
    }

    fn create_pipeline_layout(&self, desc: &PipelineLayoutDesc) -> Result<Arc<dyn PipelineLayout>> {
        let layout = resolve_layout(&MockSlotMapper, desc)?;
        Ok(Arc::new(MockPipelineLayout { layout }))
    }

    fn create_shader(&self, desc: &ShaderDesc) -> Result<Arc<dyn Shader>> {
        match desc.source {
            ShaderSource::Text(text) => Ok(Arc::new(MockShader::compile(desc.stage, text))),
            ShaderSource::Binary(_) => Err(Error::InvalidResource(
                "mock device only accepts shader text".to_string(),
            )),
        }
    }
}
