//! Runtime capability / extension resolution
//!
//! A [`CapabilityTable`] is built exactly once per device from a list of
//! capability sets (platform set first, then the core API set). Each entry is
//! looked up through a caller-supplied loader (`wglGetProcAddress`,
//! `vkGetDeviceProcAddr`, a test fake, ...). Missing required entries abort
//! the resolution; missing optional ones are recorded as absent.
//!
//! The table has no mutating API: once `resolve` returns, it can be shared
//! through an `Arc` and read from any thread.

use std::ffi::c_void;
use std::ptr::NonNull;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::{Error, Result};

// ============================================================================
// Entry points
// ============================================================================

/// Resolved, non-null address of a native entry point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint(NonNull<c_void>);

// SAFETY: an entry point is an immutable code address, valid for the lifetime
// of the context it was resolved for.
unsafe impl Send for EntryPoint {}
unsafe impl Sync for EntryPoint {}

impl EntryPoint {
    /// Wrap a raw address, `None` if null
    pub fn new(address: *const c_void) -> Option<Self> {
        NonNull::new(address as *mut c_void).map(EntryPoint)
    }

    /// Raw address
    pub fn as_ptr(&self) -> *const c_void {
        self.0.as_ptr()
    }

    /// Reinterpret the address as a typed function pointer
    ///
    /// # Safety
    ///
    /// `F` must be a function pointer type matching the native signature of
    /// the entry point, and the owning context must still be alive when the
    /// result is called.
    pub unsafe fn cast<F: Copy>(&self) -> F {
        debug_assert_eq!(std::mem::size_of::<F>(), std::mem::size_of::<*const c_void>());
        std::mem::transmute_copy::<*const c_void, F>(&self.as_ptr())
    }
}

// ============================================================================
// Capability descriptions
// ============================================================================

/// Whether a missing entry point fails device creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Device creation fails without it
    Required,
    /// Recorded as absent, call sites must check before use
    Optional,
}

/// One entry point to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityDesc {
    /// Native entry point name (e.g. "glObjectLabel")
    pub name: &'static str,
    /// Extension (or core version) providing it (e.g. "GL_KHR_debug")
    pub extension: &'static str,
    /// Required or optional
    pub requirement: Requirement,
}

impl CapabilityDesc {
    /// Required entry point
    pub const fn required(name: &'static str, extension: &'static str) -> Self {
        Self { name, extension, requirement: Requirement::Required }
    }

    /// Optional entry point
    pub const fn optional(name: &'static str, extension: &'static str) -> Self {
        Self { name, extension, requirement: Requirement::Optional }
    }
}

// ============================================================================
// Capability table
// ============================================================================

/// Per-device mapping from entry point name to resolved address (or absence)
#[derive(Debug, Default)]
pub struct CapabilityTable {
    resolved: FxHashMap<&'static str, EntryPoint>,
    missing: Vec<&'static str>,
    /// extension name -> every entry point of it resolved
    extensions: FxHashMap<&'static str, bool>,
}

impl CapabilityTable {
    /// Resolve every capability set in order
    ///
    /// # Arguments
    ///
    /// * `sets` - Capability sets, platform set first
    /// * `loader` - Returns the address of a named entry point, or null
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` for the first required entry point the loader
    /// cannot resolve. No table is returned in that case.
    pub fn resolve<L>(sets: &[&[CapabilityDesc]], mut loader: L) -> Result<Self>
    where
        L: FnMut(&str) -> *const c_void,
    {
        let mut table = CapabilityTable::default();
        let mut seen: FxHashSet<&'static str> = FxHashSet::default();

        for set in sets {
            for desc in set.iter() {
                // Same entry point listed by two sets: first resolution wins
                if !seen.insert(desc.name) {
                    continue;
                }

                match EntryPoint::new(loader(desc.name)) {
                    Some(entry) => {
                        table.resolved.insert(desc.name, entry);
                        table.extensions.entry(desc.extension).or_insert(true);
                    }
                    None => {
                        if desc.requirement == Requirement::Required {
                            crate::hal_error!(
                                "galaxy3d::hal",
                                "Required entry point '{}' ({}) could not be resolved",
                                desc.name,
                                desc.extension
                            );
                            return Err(Error::CapabilityMissing {
                                name: desc.name.to_string(),
                                cause: format!("required by {}", desc.extension),
                            });
                        }
                        crate::hal_debug!(
                            "galaxy3d::hal",
                            "Optional entry point '{}' ({}) not available",
                            desc.name,
                            desc.extension
                        );
                        table.missing.push(desc.name);
                        table.extensions.insert(desc.extension, false);
                    }
                }
            }
        }

        crate::hal_debug!(
            "galaxy3d::hal",
            "Capability table resolved: {} available, {} missing",
            table.resolved.len(),
            table.missing.len()
        );
        Ok(table)
    }

    /// True if the named entry point resolved
    pub fn is_available(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    /// Resolved entry point, `None` if absent
    pub fn entry_point(&self, name: &str) -> Option<EntryPoint> {
        self.resolved.get(name).copied()
    }

    /// True if every entry point listed for the extension resolved
    pub fn has_extension(&self, extension: &str) -> bool {
        self.extensions.get(extension).copied().unwrap_or(false)
    }

    /// Full name -> available surface, sorted by name
    pub fn capabilities(&self) -> Vec<(&'static str, bool)> {
        let mut all: Vec<(&'static str, bool)> = self.resolved.keys()
            .map(|name| (*name, true))
            .chain(self.missing.iter().map(|name| (*name, false)))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }

    /// Number of resolved entry points
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// True if nothing resolved
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Optional entry points that did not resolve, in resolution order
    pub fn missing(&self) -> &[&'static str] {
        &self.missing
    }
}

#[cfg(test)]
#[path = "capability_tests.rs"]
mod tests;
