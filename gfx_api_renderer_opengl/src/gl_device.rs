/// GlDevice - the native OpenGL entry points used by the backend
///
/// Resources never call the driver directly; they go through this trait so the
/// same texture/buffer code runs on a real `glow::Context` or on the CPU
/// `SoftwareDevice`. Object names are plain `u32` (`GLuint`), 0 meaning "none".
///
/// Every method acts on the calling thread's current GL context and on whatever
/// object is bound to the target it names, exactly like the native API.

use bitflags::bitflags;
use gfx_api::engine_error;

bitflags! {
    /// Optional driver features queried once when the context is created
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DeviceCaps: u32 {
        /// glObjectLabel (GL 4.3 or KHR_debug)
        const DEBUG_LABELS = 1 << 0;
        /// EXT_texture_compression_s3tc
        const TEXTURE_COMPRESSION_S3TC = 1 << 1;
    }
}

/// Native OpenGL calls issued by the backend
pub trait GlDevice {
    /// Optional features available on this device
    fn capabilities(&self) -> DeviceCaps;

    /// glGenTextures
    fn create_texture(&self) -> Result<u32, String>;
    /// glDeleteTextures
    fn delete_texture(&self, texture: u32);
    /// glBindTexture (0 unbinds)
    fn bind_texture(&self, target: u32, texture: u32);
    /// glTexImage2D with unsigned-byte client data; `None` allocates without contents
    #[allow(clippy::too_many_arguments)]
    fn tex_image_2d(
        &self,
        target: u32,
        level: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        format: u32,
        data: Option<&[u8]>,
    );
    /// glTexSubImage2D with unsigned-byte client data
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: u32,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        format: u32,
        data: &[u8],
    );
    /// glCompressedTexSubImage2D
    #[allow(clippy::too_many_arguments)]
    fn compressed_tex_sub_image_2d(
        &self,
        target: u32,
        level: u32,
        x_offset: u32,
        y_offset: u32,
        width: u32,
        height: u32,
        format: u32,
        data: &[u8],
    );
    /// glGenerateMipmap
    fn generate_mipmap(&self, target: u32);
    /// glObjectLabel
    fn object_label(&self, identifier: u32, name: u32, label: &str);

    /// glGenBuffers
    fn create_buffer(&self) -> Result<u32, String>;
    /// glDeleteBuffers
    fn delete_buffer(&self, buffer: u32);
    /// glBindBuffer (0 unbinds)
    fn bind_buffer(&self, target: u32, buffer: u32);
    /// glBufferData; `None` reserves `size` bytes without contents
    fn buffer_data(&self, target: u32, size: usize, data: Option<&[u8]>, usage: u32);
    /// glBufferSubData
    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]);

    /// glPixelStorei
    fn pixel_store_i32(&self, parameter: u32, value: i32);

    /// glGetError
    fn get_error(&self) -> u32;
}

/// Name of a glGetError code, for logs
pub fn error_name(error: u32) -> &'static str {
    match error {
        glow::NO_ERROR => "GL_NO_ERROR",
        glow::INVALID_ENUM => "GL_INVALID_ENUM",
        glow::INVALID_VALUE => "GL_INVALID_VALUE",
        glow::INVALID_OPERATION => "GL_INVALID_OPERATION",
        glow::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        glow::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        _ => "unknown GL error",
    }
}

/// Poll glGetError after `operation` when the `gl-error-checks` feature is on
///
/// Driver errors are only reported, never turned into failures.
#[inline]
pub(crate) fn check_error<D: GlDevice + ?Sized>(device: &D, source: &str, operation: &str) {
    if cfg!(feature = "gl-error-checks") {
        let error = device.get_error();
        if error != glow::NO_ERROR {
            engine_error!(source, "{} raised {} (0x{:04X})", operation, error_name(error), error);
        }
    }
}

// ============================================================================
// glow::Context
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{DeviceCaps, GlDevice};
    use gfx_api::engine_fatal;
    use glow::HasContext;
    use std::num::NonZeroU32;

    const SOURCE: &str = "gfx::opengl::Device";

    /// GLint/GLsizei/GLintptr argument; a value the driver cannot represent is fatal
    fn gl_int<T>(value: T, what: &str) -> i32
    where
        T: TryInto<i32> + Copy + std::fmt::Display,
    {
        match value.try_into() {
            Ok(value) => value,
            Err(_) => engine_fatal!(SOURCE, "{} {} does not fit in a GL integer", what, value),
        }
    }

    fn texture(name: u32) -> Option<glow::NativeTexture> {
        NonZeroU32::new(name).map(glow::NativeTexture)
    }

    fn buffer(name: u32) -> Option<glow::NativeBuffer> {
        NonZeroU32::new(name).map(glow::NativeBuffer)
    }

    // SAFETY (all calls below): glow only requires a current context on this
    // thread and valid pointers. Slices carry their own length; for pixel
    // transfers the context sets GL_UNPACK_ALIGNMENT to 1 at creation, so the
    // driver reads exactly the tightly packed size the texture layer checks.
    impl GlDevice for glow::Context {
        fn capabilities(&self) -> DeviceCaps {
            let mut caps = DeviceCaps::empty();
            if self.supports_debug() {
                caps |= DeviceCaps::DEBUG_LABELS;
            }
            if self
                .supported_extensions()
                .contains("GL_EXT_texture_compression_s3tc")
            {
                caps |= DeviceCaps::TEXTURE_COMPRESSION_S3TC;
            }
            caps
        }

        fn create_texture(&self) -> Result<u32, String> {
            unsafe { HasContext::create_texture(self).map(|t| t.0.get()) }
        }

        fn delete_texture(&self, name: u32) {
            if let Some(t) = texture(name) {
                unsafe { HasContext::delete_texture(self, t) }
            }
        }

        fn bind_texture(&self, target: u32, name: u32) {
            unsafe { HasContext::bind_texture(self, target, texture(name)) }
        }

        fn tex_image_2d(
            &self,
            target: u32,
            level: u32,
            internal_format: u32,
            width: u32,
            height: u32,
            format: u32,
            data: Option<&[u8]>,
        ) {
            unsafe {
                HasContext::tex_image_2d(
                    self,
                    target,
                    gl_int(level, "level"),
                    gl_int(internal_format, "internal format"),
                    gl_int(width, "width"),
                    gl_int(height, "height"),
                    0,
                    format,
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(data),
                )
            }
        }

        fn tex_sub_image_2d(
            &self,
            target: u32,
            level: u32,
            x_offset: u32,
            y_offset: u32,
            width: u32,
            height: u32,
            format: u32,
            data: &[u8],
        ) {
            unsafe {
                HasContext::tex_sub_image_2d(
                    self,
                    target,
                    gl_int(level, "level"),
                    gl_int(x_offset, "x offset"),
                    gl_int(y_offset, "y offset"),
                    gl_int(width, "width"),
                    gl_int(height, "height"),
                    format,
                    glow::UNSIGNED_BYTE,
                    glow::PixelUnpackData::Slice(Some(data)),
                )
            }
        }

        fn compressed_tex_sub_image_2d(
            &self,
            target: u32,
            level: u32,
            x_offset: u32,
            y_offset: u32,
            width: u32,
            height: u32,
            format: u32,
            data: &[u8],
        ) {
            unsafe {
                HasContext::compressed_tex_sub_image_2d(
                    self,
                    target,
                    gl_int(level, "level"),
                    gl_int(x_offset, "x offset"),
                    gl_int(y_offset, "y offset"),
                    gl_int(width, "width"),
                    gl_int(height, "height"),
                    format,
                    glow::CompressedPixelUnpackData::Slice(data),
                )
            }
        }

        fn generate_mipmap(&self, target: u32) {
            unsafe { HasContext::generate_mipmap(self, target) }
        }

        fn object_label(&self, identifier: u32, name: u32, label: &str) {
            unsafe { HasContext::object_label(self, identifier, name, Some(label)) }
        }

        fn create_buffer(&self) -> Result<u32, String> {
            unsafe { HasContext::create_buffer(self).map(|b| b.0.get()) }
        }

        fn delete_buffer(&self, name: u32) {
            if let Some(b) = buffer(name) {
                unsafe { HasContext::delete_buffer(self, b) }
            }
        }

        fn bind_buffer(&self, target: u32, name: u32) {
            unsafe { HasContext::bind_buffer(self, target, buffer(name)) }
        }

        fn buffer_data(&self, target: u32, size: usize, data: Option<&[u8]>, usage: u32) {
            unsafe {
                match data {
                    Some(data) => HasContext::buffer_data_u8_slice(self, target, &data[..size], usage),
                    None => HasContext::buffer_data_size(self, target, gl_int(size, "buffer size"), usage),
                }
            }
        }

        fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
            let offset = gl_int(offset, "buffer offset");
            unsafe { HasContext::buffer_sub_data_u8_slice(self, target, offset, data) }
        }

        fn pixel_store_i32(&self, parameter: u32, value: i32) {
            unsafe { HasContext::pixel_store_i32(self, parameter, value) }
        }

        fn get_error(&self) -> u32 {
            unsafe { HasContext::get_error(self) }
        }
    }
}
