/// Texture trait, pixel formats, and mip-chain math

use glam::UVec2;

// ===== PIXEL FORMAT =====

/// Logical layout of texel data
///
/// Closed set: raw values coming from asset decoders or config files must go
/// through `TryFrom<u32>` / `FromStr` first, which reject unknown values with a
/// recoverable error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per texel
    Rgba,
    /// 8-bit RGB, 3 bytes per texel
    Rgb,
    /// S3TC DXT5 block compression (16 bytes per 4x4 block)
    CompressedRgba,
    /// S3TC DXT1 block compression (8 bytes per 4x4 block)
    CompressedRgb,
}

impl PixelFormat {
    /// All formats, in discriminant order
    pub const ALL: [PixelFormat; 4] = [
        PixelFormat::Rgba,
        PixelFormat::Rgb,
        PixelFormat::CompressedRgba,
        PixelFormat::CompressedRgb,
    ];

    /// Returns true for block-compressed formats
    pub fn is_compressed(self) -> bool {
        matches!(self, PixelFormat::CompressedRgba | PixelFormat::CompressedRgb)
    }

    /// Edge length in texels of one storage block (1 for uncompressed formats)
    pub fn block_extent(self) -> u32 {
        if self.is_compressed() { 4 } else { 1 }
    }

    /// Bytes per storage block (per texel for uncompressed formats)
    pub fn bytes_per_block(self) -> usize {
        match self {
            PixelFormat::Rgba => 4,
            PixelFormat::Rgb => 3,
            PixelFormat::CompressedRgba => 16,
            PixelFormat::CompressedRgb => 8,
        }
    }

    /// Size in bytes of a tightly packed `width` x `height` region
    ///
    /// A size that does not fit in `usize` is fatal.
    pub fn data_size(self, width: u32, height: u32) -> usize {
        let block = self.block_extent();
        let blocks_x = width.div_ceil(block) as usize;
        let blocks_y = height.div_ceil(block) as usize;
        match blocks_x
            .checked_mul(blocks_y)
            .and_then(|blocks| blocks.checked_mul(self.bytes_per_block()))
        {
            Some(size) => size,
            None => crate::engine_fatal!(
                "gfx::render::PixelFormat",
                "Size of a {}x{} {} region overflows usize",
                width,
                height,
                self
            ),
        }
    }

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            PixelFormat::Rgba => "rgba",
            PixelFormat::Rgb => "rgb",
            PixelFormat::CompressedRgba => "compressed_rgba",
            PixelFormat::CompressedRgb => "compressed_rgb",
        }
    }
}

impl_closed_enum_parsing!(PixelFormat, "pixel format");

// ===== MIP CHAIN =====

/// Number of levels in a full mip chain: `floor(log2(max(width, height))) + 1`
///
/// Returns 0 for an empty extent.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    let largest = width.max(height);
    if largest == 0 {
        return 0;
    }
    u32::BITS - largest.leading_zeros()
}

/// Extent of mip `level`: each axis is halved per level and clamped to 1
pub fn mip_level_extent(width: u32, height: u32, level: u32) -> UVec2 {
    let shift = |v: u32| v.checked_shr(level).unwrap_or(0).max(1);
    UVec2::new(shift(width), shift(height))
}

// ===== TEXTURE INFO =====

/// Read-only properties of a created texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// Width of level 0 in texels
    pub width: u32,
    /// Height of level 0 in texels
    pub height: u32,
    /// Internal format
    pub format: PixelFormat,
    /// Number of allocated mip levels (full chain)
    pub mip_levels: u32,
    /// Debug label, if one was requested
    pub label: Option<String>,
}

impl TextureInfo {
    /// Describe a texture with a full mip chain
    pub fn new(width: u32, height: u32, format: PixelFormat, label: &str) -> Self {
        Self {
            width,
            height,
            format,
            mip_levels: mip_level_count(width, height),
            label: (!label.is_empty()).then(|| label.to_string()),
        }
    }

    /// Extent of the given mip level
    pub fn level_extent(&self, level: u32) -> UVec2 {
        mip_level_extent(self.width, self.height, level)
    }
}

// ===== TEXTURE TRAIT =====

/// Texture resource trait
///
/// Implemented by backend texture types. The native object is released when the
/// texture is dropped.
pub trait Texture {
    /// Make this texture the active texture binding
    fn bind(&self);

    /// Write a tightly packed sub-region of `mip_level`
    ///
    /// Binds first. The region must lie inside the level; this is not re-checked
    /// here. `data` must hold at least `format.data_size(width, height)` bytes.
    #[allow(clippy::too_many_arguments)]
    fn upload(
        &self,
        mip_level: u32,
        offset_x: u32,
        offset_y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    );

    /// Regenerate every level below 0 from the current contents of level 0
    fn generate_mip_levels(&self);

    /// Native handle, for collaborators that talk to the driver directly
    fn id(&self) -> u32;

    /// Read-only properties
    fn info(&self) -> &TextureInfo;
}

#[cfg(test)]
#[path = "texture_tests.rs"]
mod tests;
