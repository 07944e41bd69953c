/// OpenGlContext - OpenGL implementation of the Context trait

use std::rc::Rc;

use gfx_api::gfx::render::{Buffer, BufferStorageHint, BufferUsage, PixelFormat, Texture};
use gfx_api::gfx::{Config, Context, Result};
use gfx_api::engine_info;

use crate::gl_buffer::Buffer as OpenGlBuffer;
use crate::gl_device::{check_error, DeviceCaps, GlDevice};
use crate::gl_texture::Texture as OpenGlTexture;

const SOURCE: &str = "gfx::opengl::Context";

/// OpenGL resource factory
///
/// Wraps the GL context current on the calling thread. Every resource created
/// here shares the device and must stay on that thread.
pub struct OpenGlContext<D = glow::Context> {
    /// Native entry points
    device: Rc<D>,
    /// Features queried once at creation
    caps: DeviceCaps,
    /// Configuration
    config: Config,
}

impl<D: GlDevice> OpenGlContext<D> {
    /// Create a context over a device whose GL context is current on this thread
    ///
    /// # Arguments
    ///
    /// * `device` - Native entry points (`glow::Context` or `SoftwareDevice`)
    /// * `config` - Context configuration
    pub fn new(device: D, config: Config) -> Self {
        let caps = device.capabilities();

        // Texture uploads are tightly packed; the GL default pads rows to 4 bytes.
        device.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
        check_error(&device, SOURCE, "glPixelStorei");

        engine_info!(
            SOURCE,
            "OpenGL context ready for '{}' (debug labels: {}, S3TC: {})",
            config.app_name,
            caps.contains(DeviceCaps::DEBUG_LABELS) && config.enable_debug_labels,
            caps.contains(DeviceCaps::TEXTURE_COMPRESSION_S3TC)
        );

        Self {
            device: Rc::new(device),
            caps,
            config,
        }
    }

    /// Native entry points shared with every resource
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Optional features reported by the device
    pub fn capabilities(&self) -> DeviceCaps {
        self.caps
    }
}

impl<D: GlDevice + 'static> Context for OpenGlContext<D> {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        debug_label: &str,
    ) -> Result<Box<dyn Texture>> {
        let texture = OpenGlTexture::create(
            Rc::clone(&self.device),
            self.caps,
            &self.config,
            width,
            height,
            format,
            debug_label,
        )?;
        Ok(Box::new(texture))
    }

    fn create_buffer_object(
        &self,
        usage: BufferUsage,
        hint: BufferStorageHint,
    ) -> Result<Box<dyn Buffer>> {
        let buffer = OpenGlBuffer::create(Rc::clone(&self.device), usage, hint)?;
        Ok(Box::new(buffer))
    }

    fn backend_name(&self) -> &'static str {
        "opengl"
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
#[path = "gl_context_tests.rs"]
mod tests;
