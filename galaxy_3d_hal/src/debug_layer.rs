//! Transparent diagnostics layer
//!
//! [`DebugWrapper`] sits in front of a backend object (a shader, a render
//! pass) and implements the same trait by forwarding every call to it. It
//! borrows the backend object and never owns it, so the borrow checker keeps
//! the wrapper from outliving what it decorates. Besides forwarding, the
//! wrapper keeps its own label and posts diagnostics to a [`Diagnostics`]
//! sink.
//!
//! Callers go through [`decorate_shader`] / [`decorate_render_pass`], which
//! return the raw object when diagnostics are disabled and a wrapper
//! otherwise. Both deref to the same trait object, so call sites do not
//! change.

use std::ops::Deref;
use std::sync::Mutex;
use crate::device::DeviceConfig;
use crate::log::LogSeverity;
use crate::render_pass::{ClearFlags, RenderPass};
use crate::shader::{CompileStatus, DisassembleFlags, Shader, ShaderStage};

// ============================================================================
// Diagnostics sink
// ============================================================================

/// One message recorded by the debug layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugMessage {
    pub severity: LogSeverity,
    /// Label (or kind) of the object the message is about
    pub object: String,
    pub text: String,
}

/// Collects debug layer messages and forwards them to the logger
#[derive(Debug, Default)]
pub struct Diagnostics {
    messages: Mutex<Vec<DebugMessage>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink for a device configuration, `None` when diagnostics are disabled
    pub fn for_config(config: &DeviceConfig) -> Option<Self> {
        config.enable_diagnostics.then(Self::new)
    }

    /// Record a message and log it under "galaxy3d::debug"
    pub fn post(&self, severity: LogSeverity, object: &str, text: &str) {
        crate::galaxy3d::Hal::log(severity, "galaxy3d::debug", format!("[{}] {}", object, text));
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(DebugMessage {
                severity,
                object: object.to_string(),
                text: text.to_string(),
            });
        }
    }

    /// Snapshot of every recorded message
    pub fn messages(&self) -> Vec<DebugMessage> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Number of recorded errors
    pub fn error_count(&self) -> usize {
        self.messages.lock()
            .map(|m| m.iter().filter(|msg| msg.severity == LogSeverity::Error).count())
            .unwrap_or(0)
    }

    pub fn clear(&self) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.clear();
        }
    }
}

// ============================================================================
// Wrapper
// ============================================================================

/// Decorator borrowing one backend object of capability `T`
pub struct DebugWrapper<'a, T: ?Sized> {
    instance: &'a T,
    label: Mutex<String>,
    diagnostics: &'a Diagnostics,
}

impl<'a, T: ?Sized> DebugWrapper<'a, T> {
    /// Decorated backend object
    pub fn instance(&self) -> &'a T {
        self.instance
    }

    /// Label set through `set_name` (empty until then)
    pub fn label(&self) -> String {
        self.label.lock().map(|l| l.clone()).unwrap_or_default()
    }

    fn store_label(&self, name: &str) {
        if let Ok(mut label) = self.label.lock() {
            *label = name.to_string();
        }
    }
}

impl<'a, T: Shader + ?Sized> DebugWrapper<'a, T> {
    /// Wrap a shader, posting its report if it already failed to compile
    pub fn new_shader(instance: &'a T, diagnostics: &'a Diagnostics) -> Self {
        let wrapper = Self {
            instance,
            label: Mutex::new(String::new()),
            diagnostics,
        };
        if instance.has_errors() {
            let object = format!("{:?} shader", instance.stage());
            diagnostics.post(LogSeverity::Error, &object, &instance.report());
        }
        wrapper
    }

    /// True while the wrapped shader compiled successfully
    pub fn is_compiled(&self) -> bool {
        !self.instance.has_errors()
    }
}

impl<'a, T: Shader + ?Sized> Shader for DebugWrapper<'a, T> {
    fn stage(&self) -> ShaderStage {
        self.instance.stage()
    }

    fn set_name(&self, name: &str) {
        self.store_label(name);
        self.instance.set_name(name);
    }

    fn has_errors(&self) -> bool {
        self.instance.has_errors()
    }

    fn report(&self) -> String {
        self.instance.report()
    }

    fn disassemble(&self, flags: DisassembleFlags) -> String {
        self.instance.disassemble(flags)
    }

    fn compile_status(&self) -> CompileStatus {
        self.instance.compile_status()
    }
}

impl<'a, T: RenderPass + ?Sized> DebugWrapper<'a, T> {
    /// Wrap a render pass
    pub fn new_render_pass(instance: &'a T, diagnostics: &'a Diagnostics) -> Self {
        if instance.samples() > 1 && instance.num_color_attachments() == 0 {
            diagnostics.post(LogSeverity::Warn, "render pass", "multisampled render pass without color attachments");
        }
        if instance.clear_flags().is_empty() {
            diagnostics.post(LogSeverity::Trace, "render pass", "render pass clears nothing at entry");
        }
        Self {
            instance,
            label: Mutex::new(String::new()),
            diagnostics,
        }
    }
}

impl<'a, T: RenderPass + ?Sized> RenderPass for DebugWrapper<'a, T> {
    fn num_color_attachments(&self) -> u32 {
        self.instance.num_color_attachments()
    }

    fn clear_flags(&self) -> ClearFlags {
        self.instance.clear_flags()
    }

    fn samples(&self) -> u32 {
        self.instance.samples()
    }

    fn set_name(&self, name: &str) {
        self.store_label(name);
        self.instance.set_name(name);
    }
}

// ============================================================================
// Factories
// ============================================================================

/// Backend object, raw or decorated
pub enum Decorated<'a, T: ?Sized> {
    Native(&'a T),
    Debug(DebugWrapper<'a, T>),
}

impl<'a, T: ?Sized> Decorated<'a, T> {
    /// True if the debug layer is interposed
    pub fn is_decorated(&self) -> bool {
        matches!(self, Decorated::Debug(_))
    }

    /// Label of the wrapper, `None` for raw objects
    pub fn label(&self) -> Option<String> {
        match self {
            Decorated::Native(_) => None,
            Decorated::Debug(wrapper) => Some(wrapper.label()),
        }
    }
}

impl<'a> Deref for Decorated<'a, dyn Shader + 'a> {
    type Target = dyn Shader + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Decorated::Native(instance) => *instance,
            Decorated::Debug(wrapper) => wrapper,
        }
    }
}

impl<'a> Deref for Decorated<'a, dyn RenderPass + 'a> {
    type Target = dyn RenderPass + 'a;

    fn deref(&self) -> &Self::Target {
        match self {
            Decorated::Native(instance) => *instance,
            Decorated::Debug(wrapper) => wrapper,
        }
    }
}

/// Interpose the debug layer in front of a shader when diagnostics are enabled
pub fn decorate_shader<'a>(
    instance: &'a (dyn Shader + 'a),
    diagnostics: Option<&'a Diagnostics>,
) -> Decorated<'a, dyn Shader + 'a> {
    match diagnostics {
        Some(sink) => Decorated::Debug(DebugWrapper::new_shader(instance, sink)),
        None => Decorated::Native(instance),
    }
}

/// Interpose the debug layer in front of a render pass when diagnostics are enabled
pub fn decorate_render_pass<'a>(
    instance: &'a (dyn RenderPass + 'a),
    diagnostics: Option<&'a Diagnostics>,
) -> Decorated<'a, dyn RenderPass + 'a> {
    match diagnostics {
        Some(sink) => Decorated::Debug(DebugWrapper::new_render_pass(instance, sink)),
        None => Decorated::Native(instance),
    }
}

#[cfg(test)]
#[path = "debug_layer_tests.rs"]
mod tests;
