/// SoftwareDevice - CPU emulation of the GL state driven by the backend
///
/// Texture and buffer objects, binding points and the error flag live in host
/// memory, so resources can be created, written and inspected without a
/// driver or a window. Failing calls behave like the native ones: they leave
/// the state untouched and record an error code that `get_error` returns.
/// Only the first error is kept until it is read.

use std::cell::RefCell;

use gfx_api::engine_debug;
use gfx_api::gfx::render::{mip_level_count, mip_level_extent, PixelFormat};
use rustc_hash::FxHashMap;

use crate::gl_device::{error_name, DeviceCaps, GlDevice};
use crate::gl_format::pixel_format_to_gl;

const SOURCE: &str = "gfx::opengl::SoftwareDevice";

/// Highest level index glTexImage2D accepts
const MAX_LEVEL: u32 = 31;

/// Copy of one texture level, as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSnapshot {
    /// GL internal format
    pub internal_format: u32,
    pub width: u32,
    pub height: u32,
    /// Texels (uncompressed) or S3TC blocks (compressed), tightly packed
    pub data: Vec<u8>,
}

struct Level {
    format: PixelFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

#[derive(Default)]
struct TextureObject {
    levels: Vec<Option<Level>>,
    label: Option<String>,
}

struct BufferObject {
    data: Vec<u8>,
    usage: u32,
    label: Option<String>,
}

impl Default for BufferObject {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            usage: glow::STATIC_DRAW,
            label: None,
        }
    }
}

/// Error raised by a call, with the reason that gets logged
struct Fault {
    code: u32,
    reason: String,
}

fn fault(code: u32, reason: impl Into<String>) -> Fault {
    Fault {
        code,
        reason: reason.into(),
    }
}

struct State {
    last_texture: u32,
    last_buffer: u32,
    textures: FxHashMap<u32, TextureObject>,
    buffers: FxHashMap<u32, BufferObject>,
    texture_bindings: FxHashMap<u32, u32>,
    buffer_bindings: FxHashMap<u32, u32>,
    /// GL_UNPACK_ALIGNMENT
    unpack_alignment: usize,
    error: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            last_texture: 0,
            last_buffer: 0,
            textures: FxHashMap::default(),
            buffers: FxHashMap::default(),
            texture_bindings: FxHashMap::default(),
            buffer_bindings: FxHashMap::default(),
            unpack_alignment: 4,
            error: glow::NO_ERROR,
        }
    }
}

impl State {
    /// Layout of a `width` x `height` client region under the unpack alignment
    fn client_layout(&self, width: u32, height: u32, client_texel: usize) -> ClientLayout {
        let row = width as usize * client_texel;
        let stride = row.next_multiple_of(self.unpack_alignment);
        let len = match height as usize {
            0 => 0,
            rows => (rows - 1) * stride + row,
        };
        ClientLayout { texel: client_texel, stride, len }
    }

    fn bound_texture_mut(&mut self, target: u32) -> Result<&mut TextureObject, Fault> {
        check_texture_target(target)?;
        let name = self.texture_bindings.get(&target).copied().unwrap_or(0);
        self.textures
            .get_mut(&name)
            .ok_or_else(|| fault(glow::INVALID_OPERATION, "no texture bound"))
    }

    fn bound_buffer_mut(&mut self, target: u32) -> Result<&mut BufferObject, Fault> {
        check_buffer_target(target)?;
        let name = self.buffer_bindings.get(&target).copied().unwrap_or(0);
        self.buffers
            .get_mut(&name)
            .ok_or_else(|| fault(glow::INVALID_OPERATION, "no buffer bound"))
    }
}

/// Client-side pixel rows as the driver reads them
#[derive(Clone, Copy)]
struct ClientLayout {
    /// Bytes per texel
    texel: usize,
    /// Bytes between the starts of consecutive rows
    stride: usize,
    /// Bytes read for the whole region (the last row is not padded)
    len: usize,
}

fn check_texture_target(target: u32) -> Result<(), Fault> {
    match target {
        glow::TEXTURE_2D => Ok(()),
        _ => Err(fault(glow::INVALID_ENUM, format!("texture target 0x{:04X}", target))),
    }
}

fn check_buffer_target(target: u32) -> Result<(), Fault> {
    match target {
        glow::ARRAY_BUFFER | glow::ELEMENT_ARRAY_BUFFER => Ok(()),
        _ => Err(fault(glow::INVALID_ENUM, format!("buffer target 0x{:04X}", target))),
    }
}

fn storage_format(internal_format: u32) -> Result<PixelFormat, Fault> {
    PixelFormat::ALL
        .into_iter()
        .find(|&format| pixel_format_to_gl(format) == internal_format)
        .ok_or_else(|| fault(glow::INVALID_ENUM, format!("internal format 0x{:04X}", internal_format)))
}

/// Bytes per texel of client data in `format`
fn client_texel_size(format: u32) -> Result<usize, Fault> {
    match format {
        glow::RGBA => Ok(4),
        glow::RGB => Ok(3),
        _ => Err(fault(glow::INVALID_ENUM, format!("pixel format 0x{:04X}", format))),
    }
}

fn level_mut(texture: &mut TextureObject, level: u32) -> Result<&mut Level, Fault> {
    texture
        .levels
        .get_mut(level as usize)
        .and_then(Option::as_mut)
        .ok_or_else(|| fault(glow::INVALID_OPERATION, format!("level {} is not defined", level)))
}

fn check_region(level: &Level, x: u32, y: u32, width: u32, height: u32) -> Result<(), Fault> {
    let fits = |offset: u32, extent: u32, limit: u32| offset.checked_add(extent).is_some_and(|end| end <= limit);
    if fits(x, width, level.width) && fits(y, height, level.height) {
        Ok(())
    } else {
        Err(fault(
            glow::INVALID_VALUE,
            format!(
                "region {}x{} at ({}, {}) exceeds level extent {}x{}",
                width, height, x, y, level.width, level.height
            ),
        ))
    }
}

/// Copy a client region into uncompressed storage
///
/// Source rows start every `layout.stride` bytes. RGB sources written to RGBA
/// storage get an opaque alpha; RGBA sources written to RGB storage lose theirs.
fn write_texels(level: &mut Level, x: u32, y: u32, width: u32, height: u32, layout: ClientLayout, data: &[u8]) {
    let texel = level.format.bytes_per_block();
    let (width, level_width) = (width as usize, level.width as usize);
    for row in 0..height as usize {
        for col in 0..width {
            let src = &data[row * layout.stride + col * layout.texel..][..layout.texel];
            let offset = ((y as usize + row) * level_width + x as usize + col) * texel;
            let dst = &mut level.data[offset..offset + texel];
            let shared = src.len().min(dst.len());
            dst[..shared].copy_from_slice(&src[..shared]);
            if dst.len() > shared {
                dst[shared..].fill(u8::MAX);
            }
        }
    }
}

/// Copy whole S3TC blocks into compressed storage
fn write_blocks(level: &mut Level, x: u32, y: u32, width: u32, height: u32, data: &[u8]) {
    let block = level.format.block_extent();
    let block_size = level.format.bytes_per_block();
    let level_row = level.width.div_ceil(block) as usize;
    let (block_x, block_y) = ((x / block) as usize, (y / block) as usize);
    let row_bytes = width.div_ceil(block) as usize * block_size;
    for row in 0..height.div_ceil(block) as usize {
        let src = &data[row * row_bytes..][..row_bytes];
        let offset = ((block_y + row) * level_row + block_x) * block_size;
        level.data[offset..offset + row_bytes].copy_from_slice(src);
    }
}

/// 2x2 box filter; odd edges reuse their last row/column
fn downsample(src: &Level, width: u32, height: u32) -> Level {
    let texel = src.format.bytes_per_block();
    let sample = |x: u32, y: u32, channel: usize| {
        let x = x.min(src.width - 1) as usize;
        let y = y.min(src.height - 1) as usize;
        u32::from(src.data[(y * src.width as usize + x) * texel + channel])
    };

    let mut data = Vec::with_capacity(width as usize * height as usize * texel);
    for y in 0..height {
        for x in 0..width {
            for channel in 0..texel {
                let sum = sample(2 * x, 2 * y, channel)
                    + sample(2 * x + 1, 2 * y, channel)
                    + sample(2 * x, 2 * y + 1, channel)
                    + sample(2 * x + 1, 2 * y + 1, channel);
                data.push(((sum + 2) / 4) as u8);
            }
        }
    }

    Level {
        format: src.format,
        width,
        height,
        data,
    }
}

/// Headless GL device
///
/// Names start at 1 and are never reused. Dropping a resource created on this
/// device deletes its object, which `live_textures`/`live_buffers` reflect.
pub struct SoftwareDevice {
    caps: DeviceCaps,
    state: RefCell<State>,
}

impl SoftwareDevice {
    /// Device reporting every optional feature
    pub fn new() -> Self {
        Self::with_capabilities(DeviceCaps::all())
    }

    /// Device reporting only `caps`
    pub fn with_capabilities(caps: DeviceCaps) -> Self {
        Self {
            caps,
            state: RefCell::new(State::default()),
        }
    }

    /// Run one native call, recording its error if it fails
    fn call<T: Default>(&self, name: &str, op: impl FnOnce(&mut State) -> Result<T, Fault>) -> T {
        let mut state = self.state.borrow_mut();
        match op(&mut *state) {
            Ok(value) => value,
            Err(Fault { code, reason }) => {
                engine_debug!(SOURCE, "{} raised {}: {}", name, error_name(code), reason);
                if state.error == glow::NO_ERROR {
                    state.error = code;
                }
                T::default()
            }
        }
    }

    /// Copy of a defined texture level
    pub fn texture_level(&self, texture: u32, level: u32) -> Option<LevelSnapshot> {
        let state = self.state.borrow();
        let level = state.textures.get(&texture)?.levels.get(level as usize)?.as_ref()?;
        Some(LevelSnapshot {
            internal_format: pixel_format_to_gl(level.format),
            width: level.width,
            height: level.height,
            data: level.data.clone(),
        })
    }

    /// Number of defined levels of a texture
    pub fn texture_level_count(&self, texture: u32) -> Option<u32> {
        let state = self.state.borrow();
        let texture = state.textures.get(&texture)?;
        Some(texture.levels.iter().flatten().count() as u32)
    }

    /// Object label attached to a texture
    pub fn texture_label(&self, texture: u32) -> Option<String> {
        self.state.borrow().textures.get(&texture)?.label.clone()
    }

    /// Object label attached to a buffer
    pub fn buffer_label(&self, buffer: u32) -> Option<String> {
        self.state.borrow().buffers.get(&buffer)?.label.clone()
    }

    /// Current data store of a buffer
    pub fn buffer_contents(&self, buffer: u32) -> Option<Vec<u8>> {
        Some(self.state.borrow().buffers.get(&buffer)?.data.clone())
    }

    /// Usage hint given to the last glBufferData
    pub fn buffer_usage_hint(&self, buffer: u32) -> Option<u32> {
        Some(self.state.borrow().buffers.get(&buffer)?.usage)
    }

    /// Texture bound to `target`, 0 if none
    pub fn bound_texture(&self, target: u32) -> u32 {
        self.state.borrow().texture_bindings.get(&target).copied().unwrap_or(0)
    }

    /// Buffer bound to `target`, 0 if none
    pub fn bound_buffer(&self, target: u32) -> u32 {
        self.state.borrow().buffer_bindings.get(&target).copied().unwrap_or(0)
    }

    /// glIsTexture
    pub fn is_texture(&self, texture: u32) -> bool {
        self.state.borrow().textures.contains_key(&texture)
    }

    /// glIsBuffer
    pub fn is_buffer(&self, buffer: u32) -> bool {
        self.state.borrow().buffers.contains_key(&buffer)
    }

    pub fn live_textures(&self) -> usize {
        self.state.borrow().textures.len()
    }

    /// Current GL_UNPACK_ALIGNMENT (4 on a fresh device)
    pub fn unpack_alignment(&self) -> u32 {
        self.state.borrow().unpack_alignment as u32
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }
}

impl Default for SoftwareDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GlDevice for SoftwareDevice {
    fn capabilities(&self) -> DeviceCaps {
        self.caps
    }

    fn create_texture(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        state.last_texture = state
            .last_texture
            .checked_add(1)
            .ok_or_else(|| "texture names exhausted".to_string())?;
        let name = state.last_texture;
        state.textures.insert(name, TextureObject::default());
        Ok(name)
    }

    fn delete_texture(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        if state.textures.remove(&texture).is_some() {
            state.texture_bindings.retain(|_, bound| *bound != texture);
        }
    }

    fn bind_texture(&self, target: u32, texture: u32) {
        self.call("glBindTexture", |state| {
            check_texture_target(target)?;
            if texture != 0 && !state.textures.contains_key(&texture) {
                return Err(fault(glow::INVALID_OPERATION, format!("texture {} does not exist", texture)));
            }
            state.texture_bindings.insert(target, texture);
            Ok(())
        })
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
        self.call("glTexImage2D", |state| {
            let stored = storage_format(internal_format)?;
            let layout = state.client_layout(width, height, client_texel_size(format)?);
            if level > MAX_LEVEL {
                return Err(fault(glow::INVALID_VALUE, format!("level {}", level)));
            }
            let texture = state.bound_texture_mut(target)?;

            let mut storage = Level {
                format: stored,
                width,
                height,
                data: vec![0; stored.data_size(width, height)],
            };
            if let Some(data) = data {
                if stored.is_compressed() {
                    return Err(fault(glow::INVALID_OPERATION, "client data cannot be compressed on upload"));
                }
                if data.len() < layout.len {
                    return Err(fault(glow::INVALID_VALUE, format!("{} bytes given, {} needed", data.len(), layout.len)));
                }
                write_texels(&mut storage, 0, 0, width, height, layout, data);
            }

            let index = level as usize;
            if texture.levels.len() <= index {
                texture.levels.resize_with(index + 1, || None);
            }
            texture.levels[index] = Some(storage);
            Ok(())
        })
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
        self.call("glTexSubImage2D", |state| {
            let layout = state.client_layout(width, height, client_texel_size(format)?);
            let storage = level_mut(state.bound_texture_mut(target)?, level)?;
            if storage.format.is_compressed() {
                return Err(fault(glow::INVALID_OPERATION, format!("level {} holds compressed data", level)));
            }
            check_region(storage, x_offset, y_offset, width, height)?;
            if data.len() < layout.len {
                return Err(fault(glow::INVALID_VALUE, format!("{} bytes given, {} needed", data.len(), layout.len)));
            }
            write_texels(storage, x_offset, y_offset, width, height, layout, data);
            Ok(())
        })
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
        self.call("glCompressedTexSubImage2D", |state| {
            let client_format = storage_format(format)?;
            let storage = level_mut(state.bound_texture_mut(target)?, level)?;
            if client_format != storage.format {
                return Err(fault(
                    glow::INVALID_OPERATION,
                    format!("{} data written to {} storage", client_format, storage.format),
                ));
            }
            check_region(storage, x_offset, y_offset, width, height)?;
            let block = storage.format.block_extent();
            let aligned = |offset: u32, extent: u32, limit: u32| {
                offset % block == 0 && (extent % block == 0 || offset + extent == limit)
            };
            if !aligned(x_offset, width, storage.width) || !aligned(y_offset, height, storage.height) {
                return Err(fault(glow::INVALID_OPERATION, "region is not block aligned"));
            }
            let needed = storage.format.data_size(width, height);
            if data.len() != needed {
                return Err(fault(glow::INVALID_VALUE, format!("image size {}, expected {}", data.len(), needed)));
            }
            write_blocks(storage, x_offset, y_offset, width, height, data);
            Ok(())
        })
    }

    fn generate_mipmap(&self, target: u32) {
        self.call("glGenerateMipmap", |state| {
            let texture = state.bound_texture_mut(target)?;
            let base = level_mut(texture, 0)?;
            if base.format.is_compressed() {
                return Err(fault(
                    glow::INVALID_OPERATION,
                    format!("cannot derive levels of {} storage", base.format),
                ));
            }
            let (width, height) = (base.width, base.height);
            let count = mip_level_count(width, height) as usize;
            if texture.levels.len() < count {
                texture.levels.resize_with(count, || None);
            }
            for level in 1..count {
                let extent = mip_level_extent(width, height, level as u32);
                let derived = match &texture.levels[level - 1] {
                    Some(previous) => downsample(previous, extent.x, extent.y),
                    None => return Err(fault(glow::INVALID_OPERATION, "incomplete mip chain")),
                };
                texture.levels[level] = Some(derived);
            }
            Ok(())
        })
    }

    fn object_label(&self, identifier: u32, name: u32, label: &str) {
        self.call("glObjectLabel", |state| {
            let slot = match identifier {
                glow::TEXTURE => state.textures.get_mut(&name).map(|t| &mut t.label),
                glow::BUFFER => state.buffers.get_mut(&name).map(|b| &mut b.label),
                _ => return Err(fault(glow::INVALID_ENUM, format!("identifier 0x{:04X}", identifier))),
            };
            let slot = slot.ok_or_else(|| fault(glow::INVALID_VALUE, format!("object {} does not exist", name)))?;
            *slot = Some(label.to_string());
            Ok(())
        })
    }

    fn create_buffer(&self) -> Result<u32, String> {
        let mut state = self.state.borrow_mut();
        state.last_buffer = state
            .last_buffer
            .checked_add(1)
            .ok_or_else(|| "buffer names exhausted".to_string())?;
        let name = state.last_buffer;
        state.buffers.insert(name, BufferObject::default());
        Ok(name)
    }

    fn delete_buffer(&self, buffer: u32) {
        let mut state = self.state.borrow_mut();
        if state.buffers.remove(&buffer).is_some() {
            state.buffer_bindings.retain(|_, bound| *bound != buffer);
        }
    }

    fn bind_buffer(&self, target: u32, buffer: u32) {
        self.call("glBindBuffer", |state| {
            check_buffer_target(target)?;
            if buffer != 0 && !state.buffers.contains_key(&buffer) {
                return Err(fault(glow::INVALID_OPERATION, format!("buffer {} does not exist", buffer)));
            }
            state.buffer_bindings.insert(target, buffer);
            Ok(())
        })
    }

    fn buffer_data(&self, target: u32, size: usize, data: Option<&[u8]>, usage: u32) {
        self.call("glBufferData", |state| {
            match usage {
                glow::STREAM_DRAW
                | glow::STREAM_READ
                | glow::STREAM_COPY
                | glow::STATIC_DRAW
                | glow::STATIC_READ
                | glow::STATIC_COPY
                | glow::DYNAMIC_DRAW
                | glow::DYNAMIC_READ
                | glow::DYNAMIC_COPY => {}
                _ => return Err(fault(glow::INVALID_ENUM, format!("usage 0x{:04X}", usage))),
            }
            let buffer = state.bound_buffer_mut(target)?;
            buffer.data = match data {
                Some(data) if data.len() < size => {
                    return Err(fault(glow::INVALID_VALUE, format!("{} bytes given, {} needed", data.len(), size)));
                }
                Some(data) => data[..size].to_vec(),
                None => vec![0; size],
            };
            buffer.usage = usage;
            Ok(())
        })
    }

    fn buffer_sub_data(&self, target: u32, offset: usize, data: &[u8]) {
        self.call("glBufferSubData", |state| {
            let buffer = state.bound_buffer_mut(target)?;
            let end = offset
                .checked_add(data.len())
                .filter(|&end| end <= buffer.data.len())
                .ok_or_else(|| {
                    fault(
                        glow::INVALID_VALUE,
                        format!("range {}+{} exceeds store of {} bytes", offset, data.len(), buffer.data.len()),
                    )
                })?;
            buffer.data[offset..end].copy_from_slice(data);
            Ok(())
        })
    }

    fn pixel_store_i32(&self, parameter: u32, value: i32) {
        self.call("glPixelStorei", |state| {
            if parameter != glow::UNPACK_ALIGNMENT {
                return Err(fault(glow::INVALID_ENUM, format!("parameter 0x{:04X} is not emulated", parameter)));
            }
            match value {
                1 | 2 | 4 | 8 => {
                    state.unpack_alignment = value as usize;
                    Ok(())
                }
                _ => Err(fault(glow::INVALID_VALUE, format!("unpack alignment {}", value))),
            }
        })
    }

    fn get_error(&self) -> u32 {
        std::mem::replace(&mut self.state.borrow_mut().error, glow::NO_ERROR)
    }
}

#[cfg(test)]
#[path = "software_device_tests.rs"]
mod tests;
