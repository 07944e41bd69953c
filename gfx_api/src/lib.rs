/*!
# gfx_api

Backend-agnostic GPU resource layer.

This crate provides the driver-independent contract the rest of a rendering
engine programs against: a texture, a buffer and the context that creates them.
Backend crates (e.g. `gfx_api_renderer_opengl`) implement these traits on top of
a native graphics API.

## Architecture

- **Context**: Factory trait for creating GPU resources
- **Texture**: 2D texture with a fully allocated mip chain
- **Buffer**: Linear vertex/index memory with full and partial uploads
- **Engine**: Holder of the active context and of the logger

Every abstract enum (`PixelFormat`, `BufferUsage`, `BufferStorageHint`) is
closed; raw values from outside are validated with `TryFrom`/`FromStr`.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod context;

// Main gfx namespace module
pub mod gfx {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine holder
    pub use crate::engine::Engine;

    // Factory trait and configuration
    pub use crate::context::{Config, Context};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    // Render sub-module with all resource types
    pub mod render {
        pub use crate::context::*;
    }
}

// Re-export math library at crate root
pub use glam;
