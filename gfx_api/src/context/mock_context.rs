/// Mock Context for unit tests (no GPU required)
///
/// Lets Engine and trait-level helpers be tested without a native backend.
/// Resources keep their state on the CPU so tests can inspect it.

use std::cell::{Cell, RefCell};

use crate::context::{
    Buffer, BufferStorageHint, BufferUsage, Config, Context, PixelFormat, Texture, TextureInfo,
};
use crate::error::{Error, Result};

// ============================================================================
// Mock Texture
// ============================================================================

#[derive(Debug)]
pub struct MockTexture {
    pub id: u32,
    pub info: TextureInfo,
    pub uploads: Cell<u32>,
    pub mip_generations: Cell<u32>,
}

impl Texture for MockTexture {
    fn bind(&self) {}

    fn upload(
        &self,
        _mip_level: u32,
        _offset_x: u32,
        _offset_y: u32,
        _width: u32,
        _height: u32,
        _format: PixelFormat,
        _data: &[u8],
    ) {
        self.uploads.set(self.uploads.get() + 1);
    }

    fn generate_mip_levels(&self) {
        self.mip_generations.set(self.mip_generations.get() + 1);
    }

    fn id(&self) -> u32 {
        self.id
    }

    fn info(&self) -> &TextureInfo {
        &self.info
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub id: u32,
    pub usage: BufferUsage,
    pub hint: BufferStorageHint,
    pub contents: RefCell<Vec<u8>>,
}

impl Buffer for MockBuffer {
    fn bind(&self) {}

    fn upload(&mut self, size: usize, data: Option<&[u8]>) {
        let contents = self.contents.get_mut();
        contents.clear();
        match data {
            Some(data) => contents.extend_from_slice(&data[..size]),
            None => contents.resize(size, 0),
        }
    }

    fn update(&self, start: usize, size: usize, data: &[u8]) {
        self.contents.borrow_mut()[start..start + size].copy_from_slice(&data[..size]);
    }

    fn size(&self) -> usize {
        self.contents.borrow().len()
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn storage_hint(&self) -> BufferStorageHint {
        self.hint
    }

    fn id(&self) -> u32 {
        self.id
    }
}

// ============================================================================
// Mock Context
// ============================================================================

pub struct MockContext {
    config: Config,
    next_id: Cell<u32>,
}

impl MockContext {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            next_id: Cell::new(1),
        }
    }

    fn allocate_id(&self) -> u32 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }
}

impl Context for MockContext {
    fn create_texture(
        &self,
        width: u32,
        height: u32,
        format: PixelFormat,
        debug_label: &str,
    ) -> Result<Box<dyn Texture>> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidResource(format!("texture extent {}x{}", width, height)));
        }
        Ok(Box::new(MockTexture {
            id: self.allocate_id(),
            info: TextureInfo::new(width, height, format, debug_label),
            uploads: Cell::new(0),
            mip_generations: Cell::new(0),
        }))
    }

    fn create_buffer_object(
        &self,
        usage: BufferUsage,
        hint: BufferStorageHint,
    ) -> Result<Box<dyn Buffer>> {
        Ok(Box::new(MockBuffer {
            id: self.allocate_id(),
            usage,
            hint,
            contents: RefCell::new(Vec::new()),
        }))
    }

    fn backend_name(&self) -> &'static str {
        "mock"
    }

    fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
#[path = "mock_context_tests.rs"]
mod tests;
