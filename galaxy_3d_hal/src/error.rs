//! Error types for the Galaxy3D hardware abstraction layer
//!
//! This module defines the error types used throughout the HAL,
//! including backend failures, descriptor validation and context creation.

use std::fmt;

/// Result type for Galaxy3D HAL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D HAL errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (Vulkan, OpenGL, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, shader, layout, etc.)
    InvalidResource(String),

    /// Initialization failed (device, backend registry, subsystems)
    InitializationFailed(String),

    /// A descriptor violates a construction contract
    /// (e.g. depth and stencil attachments disagree on format).
    ///
    /// Never retried: the caller must fix the descriptor.
    ConfigurationError(String),

    /// A required entry point could not be resolved while creating a context
    CapabilityMissing {
        /// Name of the missing entry point
        name: String,
        /// Human-readable reason (owning extension, platform)
        cause: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ConfigurationError(msg) => write!(f, "Configuration error: {}", msg),
            Error::CapabilityMissing { name, cause } => {
                write!(f, "Missing required capability '{}': {}", name, cause)
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
