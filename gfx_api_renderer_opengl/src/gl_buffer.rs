/// Buffer - OpenGL implementation of the Buffer trait

use std::rc::Rc;

use gfx_api::gfx::render::{Buffer as RendererBuffer, BufferStorageHint, BufferUsage};
use gfx_api::gfx::{Error, Result};
use gfx_api::{engine_error, engine_fatal, engine_trace, engine_warn};

use crate::gl_device::{check_error, GlDevice};
use crate::gl_format::{buffer_usage_to_gl, storage_hint_to_gl};

const SOURCE: &str = "gfx::opengl::Buffer";

/// OpenGL buffer object
pub struct Buffer<D: GlDevice> {
    /// Shared device (the current GL context)
    device: Rc<D>,
    /// Buffer name
    id: u32,
    /// Binding target semantics
    usage: BufferUsage,
    /// Allocation hint passed to glBufferData
    hint: BufferStorageHint,
    /// Bytes reserved by the last upload
    size: usize,
}

impl<D: GlDevice> Buffer<D> {
    /// Allocate a buffer name; no storage is reserved until the first upload
    pub(crate) fn create(device: Rc<D>, usage: BufferUsage, hint: BufferStorageHint) -> Result<Self> {
        let id = device.create_buffer().map_err(|msg| {
            engine_error!(SOURCE, "glGenBuffers failed: {}", msg);
            Error::BackendError(msg)
        })?;

        engine_trace!(SOURCE, "Created {} {} (hint {})", usage, id, hint);

        Ok(Self {
            device,
            id,
            usage,
            hint,
            size: 0,
        })
    }

    fn target(&self) -> u32 {
        buffer_usage_to_gl(self.usage)
    }
}

impl<D: GlDevice> RendererBuffer for Buffer<D> {
    fn bind(&self) {
        self.device.bind_buffer(self.target(), self.id);
    }

    fn upload(&mut self, size: usize, data: Option<&[u8]>) {
        // GLsizeiptr as glow passes it
        if i32::try_from(size).is_err() {
            engine_fatal!(
                SOURCE,
                "Upload of {} bytes exceeds the largest GL buffer size ({} bytes)",
                size,
                i32::MAX
            );
        }
        if let Some(data) = data {
            if data.len() < size {
                engine_fatal!(
                    SOURCE,
                    "Upload of {} bytes given only {} bytes of data (buffer {})",
                    size,
                    data.len(),
                    self.id
                );
            }
        }

        self.bind();
        self.device.buffer_data(
            self.target(),
            size,
            data.map(|d| &d[..size]),
            storage_hint_to_gl(self.hint),
        );
        check_error(self.device.as_ref(), SOURCE, "glBufferData");
        self.size = size;
    }

    fn update(&self, start: usize, size: usize, data: &[u8]) {
        if start >= self.size {
            engine_fatal!(
                SOURCE,
                "Starting offset ({}) is past end of buffer (length: {})",
                start,
                self.size
            );
        }
        if start.checked_add(size).map_or(true, |end| end > self.size) {
            engine_fatal!(
                SOURCE,
                "Attempt to write past end of buffer (start: {}, size: {}, length: {})",
                start,
                size,
                self.size
            );
        }
        if data.len() < size {
            engine_fatal!(
                SOURCE,
                "Update of {} bytes given only {} bytes of data (buffer {})",
                size,
                data.len(),
                self.id
            );
        }
        if size == 0 {
            engine_warn!(SOURCE, "Attempt to update buffer with 0 bytes of new data");
            return;
        }

        self.bind();
        self.device.buffer_sub_data(self.target(), start, &data[..size]);
        check_error(self.device.as_ref(), SOURCE, "glBufferSubData");
    }

    fn size(&self) -> usize {
        self.size
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

impl<D: GlDevice> Drop for Buffer<D> {
    fn drop(&mut self) {
        self.device.delete_buffer(self.id);
    }
}
