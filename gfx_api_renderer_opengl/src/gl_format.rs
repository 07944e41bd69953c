/// Format/enum translation - abstract gfx_api enums to OpenGL constants
///
/// Pure, total mappings: every abstract enum is closed, so there is no
/// "unrecognised value" branch to reach at runtime.

use gfx_api::gfx::render::{BufferStorageHint, BufferUsage, PixelFormat};

/// GL_COMPRESSED_RGB_S3TC_DXT1_EXT
pub const COMPRESSED_RGB_S3TC_DXT1: u32 = 0x83F0;
/// GL_COMPRESSED_RGBA_S3TC_DXT5_EXT
pub const COMPRESSED_RGBA_S3TC_DXT5: u32 = 0x83F3;

/// Internal format used for storage and for compressed uploads
pub fn pixel_format_to_gl(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Rgba => glow::RGBA,
        PixelFormat::Rgb => glow::RGB,
        PixelFormat::CompressedRgb => COMPRESSED_RGB_S3TC_DXT1,
        PixelFormat::CompressedRgba => COMPRESSED_RGBA_S3TC_DXT5,
    }
}

/// Client-side layout passed to glTexImage2D next to the internal format
///
/// Compressed formats allocate from their uncompressed base layout.
pub fn pixel_transfer_format(format: PixelFormat) -> u32 {
    match format {
        PixelFormat::Rgba | PixelFormat::CompressedRgba => glow::RGBA,
        PixelFormat::Rgb | PixelFormat::CompressedRgb => glow::RGB,
    }
}

/// Binding target of a buffer
pub fn buffer_usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::VertexBuffer => glow::ARRAY_BUFFER,
        BufferUsage::IndexBuffer => glow::ELEMENT_ARRAY_BUFFER,
    }
}

/// glBufferData usage hint
pub fn storage_hint_to_gl(hint: BufferStorageHint) -> u32 {
    match hint {
        BufferStorageHint::StaticDraw => glow::STATIC_DRAW,
        BufferStorageHint::DynamicDraw => glow::DYNAMIC_DRAW,
        BufferStorageHint::StreamDraw => glow::STREAM_DRAW,
    }
}

#[cfg(test)]
#[path = "gl_format_tests.rs"]
mod tests;
