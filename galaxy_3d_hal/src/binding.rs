/// Resource binding model shared by every backend
///
/// A pipeline layout is a list of abstract bindings `(resource type, slot)`
/// with a stage visibility mask. Each backend maps these pairs onto its own
/// native binding space through a [`BindingSlotMapper`]; inside one layout
/// the mapping must be a bijection unless the backend declares a pair of
/// bindings as legal aliases.

use std::fmt;
use std::hash::Hash;
use bitflags::bitflags;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};

/// Category of a bound resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Buffer,
    Texture,
    Sampler,
}

bitflags! {
    /// How a bound resource is accessed
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BindFlags: u32 {
        /// Read-only uniform/constant buffer
        const CONSTANT_BUFFER = 1 << 0;
        /// Read-write storage buffer or storage image
        const STORAGE = 1 << 1;
        /// Sampled texture
        const SAMPLED = 1 << 2;
        /// Texture and sampler bound together
        const COMBINED_SAMPLER = 1 << 3;
    }
}

bitflags! {
    /// Shader stages a binding is visible to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StageFlags: u32 {
        const VERTEX = 1 << 0;
        const TESS_CONTROL = 1 << 1;
        const TESS_EVALUATION = 1 << 2;
        const GEOMETRY = 1 << 3;
        const FRAGMENT = 1 << 4;
        const COMPUTE = 1 << 5;
        const ALL_GRAPHICS = Self::VERTEX.bits()
            | Self::TESS_CONTROL.bits()
            | Self::TESS_EVALUATION.bits()
            | Self::GEOMETRY.bits()
            | Self::FRAGMENT.bits();
        const ALL = Self::ALL_GRAPHICS.bits() | Self::COMPUTE.bits();
    }
}

/// One abstract binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDesc {
    /// Shader-side name (diagnostics only)
    pub name: String,
    /// Resource category
    pub resource_type: ResourceType,
    /// Access flags
    pub bind_flags: BindFlags,
    /// Visible stages
    pub stage_flags: StageFlags,
    /// Abstract slot inside the resource category
    pub slot: u32,
    /// Number of array elements (1 for non-arrays)
    pub array_size: u32,
}

impl BindingDesc {
    /// Single-element binding
    pub fn new(
        name: &str,
        resource_type: ResourceType,
        bind_flags: BindFlags,
        stage_flags: StageFlags,
        slot: u32,
    ) -> Self {
        Self {
            name: name.to_string(),
            resource_type,
            bind_flags,
            stage_flags,
            slot,
            array_size: 1,
        }
    }
}

/// Abstract pipeline layout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineLayoutDesc {
    pub bindings: Vec<BindingDesc>,
}

// ============================================================================
// Backend mapping
// ============================================================================

/// Maps abstract bindings onto one backend's native binding space
pub trait BindingSlotMapper {
    /// Native slot identifier
    type Slot: Copy + Eq + Hash + fmt::Debug;

    /// Native slot of one binding
    fn map_binding(&self, binding: &BindingDesc) -> Result<Self::Slot>;

    /// Every native slot a binding occupies, starting at `base`
    ///
    /// Defaults to the base slot alone, for APIs where an array binding
    /// takes a single slot.
    fn covered_slots(&self, _binding: &BindingDesc, base: Self::Slot) -> Result<Vec<Self::Slot>> {
        Ok(vec![base])
    }

    /// True if both bindings may share the same native slot
    fn is_legal_alias(&self, _first: &BindingDesc, _second: &BindingDesc) -> bool {
        false
    }
}

/// Pipeline layout with every binding mapped to its native slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout<S> {
    bindings: Vec<(BindingDesc, S)>,
}

impl<S: Copy> ResolvedLayout<S> {
    /// Bindings and their native slot, in declaration order
    pub fn bindings(&self) -> &[(BindingDesc, S)] {
        &self.bindings
    }

    /// Native slot of a binding by name
    pub fn slot_of(&self, name: &str) -> Option<S> {
        self.bindings.iter().find(|(desc, _)| desc.name == name).map(|(_, slot)| *slot)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Map every binding of a layout and check the mapping is a bijection
///
/// # Errors
///
/// `ConfigurationError` if a binding is visible to no stage, or if two
/// bindings land on the same native slot without being legal aliases.
/// Errors of the mapper itself are returned unchanged.
pub fn resolve_layout<M: BindingSlotMapper>(
    mapper: &M,
    desc: &PipelineLayoutDesc,
) -> Result<ResolvedLayout<M::Slot>> {
    let mut owners: FxHashMap<M::Slot, Vec<usize>> = FxHashMap::default();
    let mut bindings = Vec::with_capacity(desc.bindings.len());

    for (index, binding) in desc.bindings.iter().enumerate() {
        if binding.stage_flags.is_empty() {
            return Err(Error::ConfigurationError(format!(
                "binding '{}' is not visible to any shader stage",
                binding.name
            )));
        }

        let slot = mapper.map_binding(binding)?;
        for covered in mapper.covered_slots(binding, slot)? {
            let sharing = owners.entry(covered).or_default();
            for &other in sharing.iter() {
                let previous = &desc.bindings[other];
                if !mapper.is_legal_alias(previous, binding) {
                    crate::hal_error!(
                        "galaxy3d::hal",
                        "Bindings '{}' and '{}' both resolve to native slot {:?}",
                        previous.name,
                        binding.name,
                        covered
                    );
                    return Err(Error::ConfigurationError(format!(
                        "bindings '{}' and '{}' both resolve to native slot {:?}",
                        previous.name, binding.name, covered
                    )));
                }
            }
            sharing.push(index);
        }
        bindings.push((binding.clone(), slot));
    }

    Ok(ResolvedLayout { bindings })
}

/// Pipeline layout object created by a device
pub trait PipelineLayout: Send + Sync {
    /// Abstract bindings in declaration order
    fn bindings(&self) -> Vec<BindingDesc>;

    /// Number of bindings
    fn num_bindings(&self) -> usize {
        self.bindings().len()
    }
}

#[cfg(test)]
#[path = "binding_tests.rs"]
mod tests;
