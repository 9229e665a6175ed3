/// Vulkan validation messenger
///
/// Routes validation-layer messages to the HAL logger and keeps per-severity
/// counters plus a count of repeated messages. Compiled only with the
/// `vulkan-validation` feature.

use std::ffi::{c_void, CStr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use ash::vk;
use colored::*;
use rustc_hash::FxHashMap;
use galaxy_3d_hal::galaxy3d::{Hal, Result};
use galaxy_3d_hal::galaxy3d::log::LogSeverity;

const SOURCE: &str = "galaxy3d::vulkan::validation";

static STATS: StatsCounters = StatsCounters::new();

static CONFIG: Mutex<Option<ValidationConfig>> = Mutex::new(None);

static REPEATS: Mutex<Option<FxHashMap<String, u32>>> = Mutex::new(None);

/// Lowest severity forwarded by the messenger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    ErrorsOnly,
    ErrorsAndWarnings,
    All,
}

impl ValidationLevel {
    fn accepts(&self, severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> bool {
        match self {
            ValidationLevel::ErrorsOnly => severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR),
            ValidationLevel::ErrorsAndWarnings => severity.intersects(
                vk::DebugUtilsMessageSeverityFlagsEXT::ERROR | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
            ),
            ValidationLevel::All => true,
        }
    }

    fn severity_mask(&self) -> vk::DebugUtilsMessageSeverityFlagsEXT {
        let errors = vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;
        let warnings = errors | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING;
        match self {
            ValidationLevel::ErrorsOnly => errors,
            ValidationLevel::ErrorsAndWarnings => warnings,
            ValidationLevel::All => warnings
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE,
        }
    }
}

/// Messenger configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationConfig {
    pub level: ValidationLevel,
    /// Skip performance warnings
    pub ignore_performance: bool,
    /// Count messages per severity and track repeats
    pub enable_stats: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            level: ValidationLevel::ErrorsAndWarnings,
            ignore_performance: false,
            enable_stats: true,
        }
    }
}

/// Snapshot of the messenger counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

struct StatsCounters {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    verbose: AtomicU32,
}

impl StatsCounters {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            verbose: AtomicU32::new(0),
        }
    }

    fn counter(&self, severity: LogSeverity) -> &AtomicU32 {
        match severity {
            LogSeverity::Error => &self.errors,
            LogSeverity::Warn => &self.warnings,
            LogSeverity::Info => &self.info,
            _ => &self.verbose,
        }
    }

    fn snapshot(&self) -> ValidationStats {
        ValidationStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            verbose: self.verbose.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        for counter in [&self.errors, &self.warnings, &self.info, &self.verbose] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Install the configuration used by [`validation_callback`] and reset counters
pub fn configure_validation(config: ValidationConfig) {
    STATS.reset();
    if let Ok(mut repeats) = REPEATS.lock() {
        *repeats = Some(FxHashMap::default());
    }
    if let Ok(mut current) = CONFIG.lock() {
        *current = Some(config);
    }
}

/// Current counters
pub fn validation_stats() -> ValidationStats {
    STATS.snapshot()
}

/// Number of distinct messages reported more than once
pub fn repeated_message_count() -> usize {
    REPEATS.lock()
        .ok()
        .and_then(|repeats| repeats.as_ref().map(|map| map.values().filter(|&&n| n > 1).count()))
        .unwrap_or(0)
}

/// Colored summary of the counters, for end-of-run reporting
pub fn validation_report() -> String {
    let stats = validation_stats();
    if stats.total() == 0 {
        return format!("{}", "No validation messages".green().bold());
    }

    let mut lines = vec![format!("{}", "Validation summary".bright_blue().bold())];
    if stats.errors > 0 {
        lines.push(format!("  {} {}", "Errors:".red().bold(), stats.errors));
    }
    if stats.warnings > 0 {
        lines.push(format!("  {} {}", "Warnings:".yellow().bold(), stats.warnings));
    }
    if stats.info > 0 {
        lines.push(format!("  {} {}", "Info:".cyan(), stats.info));
    }
    if stats.verbose > 0 {
        lines.push(format!("  {} {}", "Verbose:".bright_black(), stats.verbose));
    }
    let repeated = repeated_message_count();
    if repeated > 0 {
        lines.push(format!("  {} {}", "Repeated:".bright_black(), repeated));
    }
    lines.join("\n")
}

fn log_severity(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> LogSeverity {
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        LogSeverity::Error
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        LogSeverity::Warn
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        LogSeverity::Info
    } else {
        LogSeverity::Trace
    }
}

fn message_kind(kind: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    if kind.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
        "validation"
    } else if kind.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        "performance"
    } else {
        "general"
    }
}

unsafe fn c_text<'a>(ptr: *const std::os::raw::c_char, fallback: &'a str) -> std::borrow::Cow<'a, str> {
    if ptr.is_null() {
        std::borrow::Cow::Borrowed(fallback)
    } else {
        CStr::from_ptr(ptr).to_string_lossy()
    }
}

/// Messenger callback registered with `VK_EXT_debug_utils`
///
/// # Safety
///
/// `p_callback_data` must be null or point to valid callback data.
pub unsafe extern "system" fn validation_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    let Some(config) = CONFIG.lock().ok().and_then(|config| *config) else {
        return vk::FALSE;
    };
    if p_callback_data.is_null() || !config.level.accepts(message_severity) {
        return vk::FALSE;
    }
    if config.ignore_performance && message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        return vk::FALSE;
    }

    let data = &*p_callback_data;
    let message_id = c_text(data.p_message_id_name, "unknown");
    let message = c_text(data.p_message, "");
    let severity = log_severity(message_severity);

    let mut occurrences = 1;
    if config.enable_stats {
        STATS.counter(severity).fetch_add(1, Ordering::Relaxed);
        if let Ok(mut repeats) = REPEATS.lock() {
            let count = repeats.get_or_insert_with(FxHashMap::default)
                .entry(message.to_string())
                .or_insert(0);
            *count += 1;
            occurrences = *count;
        }
    }

    let repeat = if occurrences > 1 {
        format!(" (x{})", occurrences)
    } else {
        String::new()
    };
    Hal::log(
        severity,
        SOURCE,
        format!("[{}] {}{}: {}", message_kind(message_type), message_id, repeat, message),
    );

    vk::FALSE
}

/// Debug-utils messenger bound to an instance, destroyed on drop
pub struct ValidationMessenger {
    loader: ash::ext::debug_utils::Instance,
    messenger: vk::DebugUtilsMessengerEXT,
}

impl ValidationMessenger {
    /// Configure the callback and register it on `instance`
    pub fn new(entry: &ash::Entry, instance: &ash::Instance, config: ValidationConfig) -> Result<Self> {
        configure_validation(config);

        let mut message_type = vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
            | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION;
        if !config.ignore_performance {
            message_type |= vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE;
        }

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::default()
            .message_severity(config.level.severity_mask())
            .message_type(message_type)
            .pfn_user_callback(Some(validation_callback));

        let loader = ash::ext::debug_utils::Instance::new(entry, instance);
        let messenger = unsafe { loader.create_debug_utils_messenger(&create_info, None) }
            .map_err(|e| galaxy_3d_hal::hal_err!(SOURCE, "Failed to create debug messenger: {:?}", e))?;

        Ok(Self { loader, messenger })
    }
}

impl Drop for ValidationMessenger {
    fn drop(&mut self) {
        unsafe {
            self.loader.destroy_debug_utils_messenger(self.messenger, None);
        }
    }
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
