/*!
# Galaxy 3D HAL

Backend-agnostic core of the Galaxy 3D hardware abstraction layer.

This crate owns the declarative rendering model (formats, render passes,
vertex formats, resource bindings) and the machinery that translates it for
each native graphics API. Backend crates (Vulkan, OpenGL) implement the
traits declared here and register themselves by name.

## Architecture

- **Format tables**: abstract [`Format`](galaxy3d::render::Format) to native format, per backend
- **Capability resolver**: per-device table of optional / required entry points
- **Render pass translator**: descriptor to [`CompiledRenderPass`](galaxy3d::render::CompiledRenderPass)
- **Binding model**: abstract `(resource type, slot)` pairs mapped to native slots
- **Debug layer**: transparent wrappers recording diagnostics
- **Hal**: logger and backend registry
*/

// Internal modules
mod error;
mod hal;
pub mod log;
pub mod format;
pub mod vertex;
pub mod render_pass;
pub mod binding;
pub mod capability;
pub mod shader;
pub mod device;
pub mod debug_layer;

#[cfg(test)]
pub(crate) mod mock_device;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Facade (logger + backend registry)
    pub use crate::hal::{Hal, BackendFactory};

    // Device selection
    pub use crate::device::{Device, DeviceConfig, DeviceLimits};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Render sub-module with all descriptor and translation types
    pub mod render {
        pub use crate::format::*;
        pub use crate::vertex::*;
        pub use crate::render_pass::*;
        pub use crate::binding::*;
        pub use crate::shader::*;
    }

    // Capability resolution
    pub mod capability {
        pub use crate::capability::*;
    }

    // Debug decoration layer
    pub mod debug {
        pub use crate::debug_layer::*;
    }
}
