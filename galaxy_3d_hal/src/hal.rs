/// Galaxy3D HAL - process-wide facade
///
/// Holds the two pieces of global state of the abstraction layer: the active
/// logger and the registry of backend factories keyed by backend name.
/// Devices themselves are never global: `create_device` hands ownership of a
/// fresh device to the caller, and a device keeps the backend it was created
/// with for its whole lifetime.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::SystemTime;
use rustc_hash::FxHashMap;
use crate::device::{Device, DeviceConfig};
use crate::error::{Error, Result};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

// ===== INTERNAL STATE =====

/// Factory building a device for one backend
pub type BackendFactory = Arc<dyn Fn(&DeviceConfig) -> Result<Arc<dyn Device>> + Send + Sync>;

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Registered backends, keyed by name ("vulkan", "opengl", ...)
static BACKENDS: OnceLock<RwLock<FxHashMap<String, BackendFactory>>> = OnceLock::new();

fn backends() -> &'static RwLock<FxHashMap<String, BackendFactory>> {
    BACKENDS.get_or_init(|| RwLock::new(FxHashMap::default()))
}

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Global entry point of the abstraction layer
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use galaxy_3d_hal::galaxy3d::{Hal, DeviceConfig};
///
/// // Backend crates register themselves under their name
/// // galaxy_3d_hal_vulkan::register(instance, physical_device, device);
///
/// let device = Hal::create_device("vulkan", &DeviceConfig::default())?;
/// println!("running on {}", device.backend_name());
/// # Ok::<(), galaxy_3d_hal::galaxy3d::Error>(())
/// ```
pub struct Hal;

impl Hal {
    // ============================================================================
    // Backend registry
    // ============================================================================

    /// Register (or replace) the factory for a backend
    ///
    /// # Arguments
    ///
    /// * `name` - Backend name used by `create_device`
    /// * `factory` - Closure building a device from a configuration
    pub fn register_backend<F>(name: &str, factory: F) -> Result<()>
    where
        F: Fn(&DeviceConfig) -> Result<Arc<dyn Device>> + Send + Sync + 'static,
    {
        let mut registry = backends().write()
            .map_err(|_| Error::BackendError("Backend registry lock poisoned".to_string()))?;

        if registry.insert(name.to_string(), Arc::new(factory)).is_some() {
            crate::hal_warn!("galaxy3d::hal", "Backend '{}' registered twice, previous factory replaced", name);
        } else {
            crate::hal_debug!("galaxy3d::hal", "Backend '{}' registered", name);
        }
        Ok(())
    }

    /// Remove a backend factory, returns true if it was registered
    pub fn unregister_backend(name: &str) -> Result<bool> {
        let mut registry = backends().write()
            .map_err(|_| Error::BackendError("Backend registry lock poisoned".to_string()))?;
        Ok(registry.remove(name).is_some())
    }

    /// Names of every registered backend, sorted
    pub fn available_backends() -> Result<Vec<String>> {
        let registry = backends().read()
            .map_err(|_| Error::BackendError("Backend registry lock poisoned".to_string()))?;
        let mut names: Vec<String> = registry.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Create a device on the named backend
    ///
    /// # Errors
    ///
    /// Returns `InitializationFailed` if no backend with that name is registered,
    /// or whatever the backend factory fails with (e.g. `CapabilityMissing`).
    pub fn create_device(name: &str, config: &DeviceConfig) -> Result<Arc<dyn Device>> {
        // Factory runs with the registry unlocked
        let factory = {
            let registry = backends().read()
                .map_err(|_| Error::BackendError("Backend registry lock poisoned".to_string()))?;
            registry.get(name).cloned().ok_or_else(|| {
                crate::hal_error!("galaxy3d::hal", "Backend '{}' is not registered", name);
                Error::InitializationFailed(format!("Backend '{}' is not registered", name))
            })?
        };

        let device = factory(config)?;
        crate::hal_info!(
            "galaxy3d::hal",
            "Device created on backend '{}' (diagnostics: {})",
            device.backend_name(),
            config.enable_diagnostics
        );
        Ok(device)
    }

    // ============================================================================
    // Logging
    // ============================================================================

    /// Set a custom logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_3d_hal::galaxy3d::Hal;
    /// use galaxy_3d_hal::galaxy3d::log::{Logger, LogEntry};
    ///
    /// struct Silent;
    ///
    /// impl Logger for Silent {
    ///     fn log(&self, _entry: &LogEntry) {}
    /// }
    ///
    /// Hal::set_logger(Silent);
    /// ```
    pub fn set_logger<L: Logger + 'static>(logger_impl: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(logger_impl);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (used by the hal_* macros)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    ///
    /// # Arguments
    ///
    /// * `severity` - Log severity level (typically Error)
    /// * `source` - Source module (e.g., "galaxy3d::opengl")
    /// * `message` - Log message
    /// * `file` - Source file path
    /// * `line` - Source line number
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }
}

#[cfg(test)]
#[path = "hal_tests.rs"]
mod tests;
