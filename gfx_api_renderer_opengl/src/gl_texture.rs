/// Texture - OpenGL implementation of the Texture trait

use std::rc::Rc;

use gfx_api::gfx::render::{PixelFormat, Texture as RendererTexture, TextureInfo};
use gfx_api::gfx::{Config, Error, Result};
use gfx_api::{engine_debug, engine_error, engine_fatal, engine_warn};

use crate::gl_device::{check_error, DeviceCaps, GlDevice};
use crate::gl_format::{pixel_format_to_gl, pixel_transfer_format};

const SOURCE: &str = "gfx::opengl::Texture";

/// OpenGL 2D texture
///
/// Owns one texture name. Every level of the mip chain is allocated at creation.
pub struct Texture<D: GlDevice> {
    /// Shared device (the current GL context)
    device: Rc<D>,
    /// Texture name
    id: u32,
    /// Read-only texture properties
    info: TextureInfo,
}

impl<D: GlDevice> Texture<D> {
    /// Allocate a texture name, label it, and allocate every mip level
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn create(
        device: Rc<D>,
        caps: DeviceCaps,
        config: &Config,
        width: u32,
        height: u32,
        format: PixelFormat,
        debug_label: &str,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            let error = Error::InvalidResource(format!("texture extent {}x{}", width, height));
            engine_error!(SOURCE, "Texture creation failed: {}", error);
            return Err(error);
        }

        if format.is_compressed() && !caps.contains(DeviceCaps::TEXTURE_COMPRESSION_S3TC) {
            engine_warn!(
                SOURCE,
                "Creating {} texture '{}' but the device does not report S3TC support",
                format,
                debug_label
            );
        }

        let id = device.create_texture().map_err(|msg| {
            engine_error!(SOURCE, "glGenTextures failed: {}", msg);
            Error::BackendError(msg)
        })?;

        // From here on the name is owned; Drop releases it on every path.
        let texture = Self {
            device,
            id,
            info: TextureInfo::new(width, height, format, debug_label),
        };
        texture.bind();

        if let Some(label) = &texture.info.label {
            if config.enable_debug_labels && caps.contains(DeviceCaps::DEBUG_LABELS) {
                texture.device.object_label(glow::TEXTURE, id, label);
            }
        }

        let internal_format = pixel_format_to_gl(format);
        let transfer_format = pixel_transfer_format(format);
        for level in 0..texture.info.mip_levels {
            let extent = texture.info.level_extent(level);
            texture.device.tex_image_2d(
                glow::TEXTURE_2D,
                level,
                internal_format,
                extent.x,
                extent.y,
                transfer_format,
                None,
            );
        }
        check_error(texture.device.as_ref(), SOURCE, "glTexImage2D");

        engine_debug!(
            SOURCE,
            "Created texture {} '{}' ({}x{} {}, {} levels)",
            id,
            debug_label,
            width,
            height,
            format,
            texture.info.mip_levels
        );

        Ok(texture)
    }
}

impl<D: GlDevice> RendererTexture for Texture<D> {
    fn bind(&self) {
        self.device.bind_texture(glow::TEXTURE_2D, self.id);
    }

    fn upload(
        &self,
        mip_level: u32,
        offset_x: u32,
        offset_y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) {
        let required = format.data_size(width, height);
        if data.len() < required {
            engine_fatal!(
                SOURCE,
                "Upload of {}x{} {} texels needs {} bytes, got {} (texture {})",
                width,
                height,
                format,
                required,
                data.len(),
                self.id
            );
        }
        let data = &data[..required];

        self.bind();
        if format.is_compressed() {
            self.device.compressed_tex_sub_image_2d(
                glow::TEXTURE_2D,
                mip_level,
                offset_x,
                offset_y,
                width,
                height,
                pixel_format_to_gl(format),
                data,
            );
            check_error(self.device.as_ref(), SOURCE, "glCompressedTexSubImage2D");
        } else {
            self.device.tex_sub_image_2d(
                glow::TEXTURE_2D,
                mip_level,
                offset_x,
                offset_y,
                width,
                height,
                pixel_format_to_gl(format),
                data,
            );
            check_error(self.device.as_ref(), SOURCE, "glTexSubImage2D");
        }
    }

    fn generate_mip_levels(&self) {
        self.bind();
        self.device.generate_mipmap(glow::TEXTURE_2D);
        check_error(self.device.as_ref(), SOURCE, "glGenerateMipmap");
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

impl<D: GlDevice> Drop for Texture<D> {
    fn drop(&mut self) {
        self.device.delete_texture(self.id);
    }
}
