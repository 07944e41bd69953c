/// Context trait - the resource factory interface

use crate::context::{Buffer, BufferStorageHint, BufferUsage, PixelFormat, Texture};
use crate::error::Result;

/// Context configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Attach debug labels to native objects when the driver supports it
    pub enable_debug_labels: bool,
    /// Application name (reported when the context comes up)
    pub app_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_debug_labels: cfg!(debug_assertions),
            app_name: "gfx_api application".to_string(),
        }
    }
}

/// Main context trait
///
/// The central factory for GPU resources, implemented by each backend (e.g.
/// `OpenGlContext`). Resources are handed over to the caller: the context keeps
/// no reference to them and does not release them.
pub trait Context {
    /// Create a 2D texture with a full mip chain allocated
    ///
    /// # Arguments
    ///
    /// * `width`, `height` - Extent of level 0, both at least 1
    /// * `format` - Internal format
    /// * `debug_label` - Object label for graphics debuggers; empty for none
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        debug_label: &str,
    ) -> Result<Box<dyn Texture>>;

    /// Create a buffer object with no storage yet
    fn create_buffer_object(
        &self,
        usage: BufferUsage,
        hint: BufferStorageHint,
    ) -> Result<Box<dyn Buffer>>;

    /// Create a buffer object with the default (`StaticDraw`) hint
    fn create_buffer(&self, usage: BufferUsage) -> Result<Box<dyn Buffer>> {
        self.create_buffer_object(usage, BufferStorageHint::default())
    }

    /// Short backend name (e.g. "opengl")
    fn backend_name(&self) -> &'static str;

    /// Configuration the context was created with
    fn config(&self) -> &Config;
}
