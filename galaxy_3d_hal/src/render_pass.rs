/// Render pass descriptors and the backend-agnostic render pass translator
///
/// A render pass is compiled into a [`CompiledRenderPass`] holding, per color
/// slot, the native format of the attachment, the combined depth-stencil
/// native format, the aspects to clear at pass entry and the negotiated
/// sample count. Three descriptor shapes are accepted:
///
/// 1. an abstract [`RenderPassDesc`] ([`CompiledRenderPass::from_desc`])
/// 2. a list of attachments bound to existing resources
///    ([`CompiledRenderPass::from_attachments`])
/// 3. raw native format arrays ([`CompiledRenderPass::from_native_formats`])
///
/// All three produce a fully defined value. Only path 1 can fail, and it does
/// so before anything is built.

use bitflags::bitflags;
use crate::error::{Error, Result};
use crate::format::{Format, FormatTable};

/// Upper bound of color attachments for every backend
pub const MAX_COLOR_ATTACHMENTS: u32 = 8;

// ============================================================================
// Descriptors
// ============================================================================

/// What happens to an attachment's content at pass entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadOp {
    /// Keep previous content
    Load,
    /// Clear to the clear value
    Clear,
    /// Content undefined
    #[default]
    DontCare,
}

/// What happens to an attachment's content at pass exit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreOp {
    /// Write results to memory
    #[default]
    Store,
    /// Results may be discarded
    DontCare,
}

/// Role of an attachment inside a render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Color,
    Depth,
    Stencil,
    DepthStencil,
}

impl AttachmentKind {
    /// True for every non-color kind
    pub fn is_depth_stencil(&self) -> bool {
        !matches!(self, AttachmentKind::Color)
    }
}

/// Format and load/store operations of one attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttachmentFormatDesc {
    /// Attachment format (`Undefined` = not used)
    pub format: Format,
    /// Load operation at pass entry
    pub load_op: LoadOp,
    /// Store operation at pass exit
    pub store_op: StoreOp,
}

impl AttachmentFormatDesc {
    /// Attachment with the given format and load operation, stored at exit
    pub fn new(format: Format, load_op: LoadOp) -> Self {
        Self { format, load_op, store_op: StoreOp::Store }
    }
}

/// Abstract render pass description
///
/// Color attachment order is significant: index `i` becomes native slot `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPassDesc {
    /// Color attachments in slot order
    pub color_attachments: Vec<AttachmentFormatDesc>,
    /// Depth attachment (format `Undefined` if none)
    pub depth_attachment: AttachmentFormatDesc,
    /// Stencil attachment (format `Undefined` if none)
    pub stencil_attachment: AttachmentFormatDesc,
    /// Requested sample count
    pub samples: u32,
}

impl Default for RenderPassDesc {
    fn default() -> Self {
        Self {
            color_attachments: Vec::new(),
            depth_attachment: AttachmentFormatDesc::default(),
            stencil_attachment: AttachmentFormatDesc::default(),
            samples: 1,
        }
    }
}

/// Resource already created by a backend, carrying its actual native format
pub trait NativeAttachment {
    /// Native format identifier of the backend
    type Native: Copy;

    /// Native format the resource was created with
    fn native_format(&self) -> Self::Native;
}

/// Attachment entry bound to an existing resource (raw attachment path)
#[derive(Debug)]
pub struct AttachmentDesc<'a, R: ?Sized> {
    /// Role of the attachment
    pub kind: AttachmentKind,
    /// Bound resource, if any
    pub resource: Option<&'a R>,
}

impl<'a, R: ?Sized> Clone for AttachmentDesc<'a, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, R: ?Sized> Copy for AttachmentDesc<'a, R> {}

bitflags! {
    /// Aspects cleared at render pass entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClearFlags: u32 {
        const COLOR0 = 1 << 0;
        const COLOR1 = 1 << 1;
        const COLOR2 = 1 << 2;
        const COLOR3 = 1 << 3;
        const COLOR4 = 1 << 4;
        const COLOR5 = 1 << 5;
        const COLOR6 = 1 << 6;
        const COLOR7 = 1 << 7;
        const DEPTH = 1 << 8;
        const STENCIL = 1 << 9;
    }
}

impl ClearFlags {
    /// Flag of one color slot (empty for slots past `MAX_COLOR_ATTACHMENTS`)
    pub fn color(index: u32) -> ClearFlags {
        if index < MAX_COLOR_ATTACHMENTS {
            ClearFlags::from_bits_truncate(1 << index)
        } else {
            ClearFlags::empty()
        }
    }
}

// ============================================================================
// Translator
// ============================================================================

/// Backend side of render pass translation (implemented by devices)
pub trait PassTranslator {
    /// Format table of the backend
    type Formats: FormatTable;

    /// Maximum number of simultaneous color attachments
    fn max_color_attachments(&self) -> u32;

    /// Maximum supported sample count
    fn max_samples(&self) -> u32;

    /// Highest sample count not above `samples` that every given format supports
    fn find_suitable_samples(
        &self,
        color_formats: &[<Self::Formats as FormatTable>::Native],
        depth_stencil_format: <Self::Formats as FormatTable>::Native,
        samples: u32,
    ) -> u32;

    /// Number of color slots a compiled pass holds on this backend
    fn color_slot_count(&self) -> u32 {
        self.max_color_attachments().clamp(1, MAX_COLOR_ATTACHMENTS)
    }
}

/// Backend-native, immutable render pass description
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledRenderPass<F: FormatTable> {
    color_formats: Vec<F::Native>,
    num_color_attachments: u32,
    depth_stencil_format: F::Native,
    clear_flags: ClearFlags,
    samples: u32,
}

impl<F: FormatTable> CompiledRenderPass<F> {
    /// Compile an abstract render pass descriptor
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if depth and stencil attachments both specify a
    /// format and the formats differ. Nothing is built in that case.
    pub fn from_desc<T>(translator: &T, desc: &RenderPassDesc) -> Result<Self>
    where
        T: PassTranslator<Formats = F>,
    {
        let depth = desc.depth_attachment.format;
        let stencil = desc.stencil_attachment.format;
        if depth.is_defined() && stencil.is_defined() && depth != stencil {
            crate::hal_error!(
                "galaxy3d::hal",
                "Mismatch between depth ({:?}) and stencil ({:?}) attachment formats",
                depth,
                stencil
            );
            return Err(Error::ConfigurationError(format!(
                "mismatch between depth ({:?}) and stencil ({:?}) attachment formats",
                depth, stencil
            )));
        }

        let slots = translator.color_slot_count();
        let requested = desc.color_attachments.len();
        if requested > slots as usize {
            crate::hal_warn!(
                "galaxy3d::hal",
                "Render pass declares {} color attachments, backend supports {}: extra attachments ignored",
                requested,
                slots
            );
        }
        let active = &desc.color_attachments[..requested.min(slots as usize)];

        let mut clear_flags = ClearFlags::empty();
        for (index, attachment) in active.iter().enumerate() {
            if attachment.load_op == LoadOp::Clear {
                clear_flags |= ClearFlags::color(index as u32);
            }
        }
        if desc.depth_attachment.load_op == LoadOp::Clear {
            clear_flags |= ClearFlags::DEPTH;
        }
        if desc.stencil_attachment.load_op == LoadOp::Clear {
            clear_flags |= ClearFlags::STENCIL;
        }

        let mut color_formats = vec![F::UNSUPPORTED; slots as usize];
        for (slot, attachment) in color_formats.iter_mut().zip(active) {
            *slot = F::to_native(attachment.format);
        }

        let depth_stencil_format = if depth.is_defined() {
            F::to_native_depth_stencil(depth)
        } else if stencil.is_defined() {
            F::to_native_depth_stencil(stencil)
        } else {
            F::UNSUPPORTED
        };

        let num_color_attachments = active.len() as u32;
        let clamped = desc.samples.clamp(1, translator.max_samples().max(1));
        let samples = translator.find_suitable_samples(
            &color_formats[..active.len()],
            depth_stencil_format,
            clamped,
        );

        Ok(Self {
            color_formats,
            num_color_attachments,
            depth_stencil_format,
            clear_flags,
            samples,
        })
    }

    /// Compile from attachments bound to existing resources
    ///
    /// Color resources take the next free slot and keep their actual native
    /// format. Depth/stencil entries use the resource format, or
    /// `default_depth_stencil` when no resource is bound. Clear flags are not
    /// computed on this path; the result is meant for compatibility passes.
    pub fn from_attachments<T, R>(
        translator: &T,
        attachments: &[AttachmentDesc<'_, R>],
        default_depth_stencil: F::Native,
        samples: u32,
    ) -> Self
    where
        T: PassTranslator<Formats = F>,
        R: NativeAttachment<Native = F::Native> + ?Sized,
    {
        let slots = translator.color_slot_count();
        let mut color_formats = vec![F::UNSUPPORTED; slots as usize];
        let mut depth_stencil_format = F::UNSUPPORTED;
        let mut num_color_attachments = 0u32;

        for attachment in attachments {
            match (attachment.resource, attachment.kind) {
                (Some(resource), AttachmentKind::Color) => {
                    if num_color_attachments < slots {
                        color_formats[num_color_attachments as usize] = resource.native_format();
                        num_color_attachments += 1;
                    } else {
                        crate::hal_warn!(
                            "galaxy3d::hal",
                            "Color attachment ignored: backend supports {} color slots",
                            slots
                        );
                    }
                }
                (Some(resource), _) => {
                    depth_stencil_format = F::depth_stencil_view(resource.native_format());
                }
                (None, AttachmentKind::Color) => {}
                (None, _) => {
                    depth_stencil_format = F::depth_stencil_view(default_depth_stencil);
                }
            }
        }

        Self {
            color_formats,
            num_color_attachments,
            depth_stencil_format,
            clear_flags: ClearFlags::empty(),
            samples: samples.max(1),
        }
    }

    /// Compile from raw native formats, copied verbatim
    ///
    /// Formats past the backend's color slot count are dropped; clear flags are reset.
    pub fn from_native_formats<T>(
        translator: &T,
        color_formats: &[F::Native],
        depth_stencil_format: F::Native,
        samples: u32,
    ) -> Self
    where
        T: PassTranslator<Formats = F>,
    {
        let slots = translator.color_slot_count() as usize;
        let count = color_formats.len().min(slots);
        let mut formats = vec![F::UNSUPPORTED; slots];
        formats[..count].copy_from_slice(&color_formats[..count]);

        Self {
            color_formats: formats,
            num_color_attachments: count as u32,
            depth_stencil_format: F::depth_stencil_view(depth_stencil_format),
            clear_flags: ClearFlags::empty(),
            samples: samples.max(1),
        }
    }

    // ===== ACCESSORS =====

    /// Native format of every color slot, unused slots hold the sentinel
    pub fn color_formats(&self) -> &[F::Native] {
        &self.color_formats
    }

    /// Native formats of the active color slots
    pub fn active_color_formats(&self) -> &[F::Native] {
        &self.color_formats[..self.num_color_attachments as usize]
    }

    /// Number of active color slots
    pub fn num_color_attachments(&self) -> u32 {
        self.num_color_attachments
    }

    /// Combined depth-stencil native format (sentinel if none)
    pub fn depth_stencil_format(&self) -> F::Native {
        self.depth_stencil_format
    }

    /// True if a depth-stencil attachment is present
    pub fn has_depth_stencil(&self) -> bool {
        self.depth_stencil_format != F::UNSUPPORTED
    }

    /// Aspects cleared at pass entry
    pub fn clear_flags(&self) -> ClearFlags {
        self.clear_flags
    }

    /// Negotiated sample count
    pub fn samples(&self) -> u32 {
        self.samples
    }
}

// ============================================================================
// Device-facing trait
// ============================================================================

/// Render pass object created by a device
pub trait RenderPass: Send + Sync {
    /// Number of active color attachments
    fn num_color_attachments(&self) -> u32;

    /// Aspects cleared at pass entry
    fn clear_flags(&self) -> ClearFlags;

    /// Negotiated sample count
    fn samples(&self) -> u32;

    /// Attach a debug label to the native object (no-op when unsupported)
    fn set_name(&self, _name: &str) {}
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
