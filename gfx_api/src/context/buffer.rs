/// Buffer trait, buffer usage, and storage hints

/// Binding target semantics of a buffer, fixed for its lifetime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferUsage {
    /// Vertex attribute data
    VertexBuffer,
    /// Index data
    IndexBuffer,
}

impl BufferUsage {
    /// All usages, in discriminant order
    pub const ALL: [BufferUsage; 2] = [BufferUsage::VertexBuffer, BufferUsage::IndexBuffer];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            BufferUsage::VertexBuffer => "vertex_buffer",
            BufferUsage::IndexBuffer => "index_buffer",
        }
    }
}

/// Expected write frequency, passed to the driver as an allocation hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferStorageHint {
    /// Written once, drawn many times
    #[default]
    StaticDraw,
    /// Rewritten often, drawn many times
    DynamicDraw,
    /// Rewritten every use
    StreamDraw,
}

impl BufferStorageHint {
    /// All hints, in discriminant order
    pub const ALL: [BufferStorageHint; 3] = [
        BufferStorageHint::StaticDraw,
        BufferStorageHint::DynamicDraw,
        BufferStorageHint::StreamDraw,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            BufferStorageHint::StaticDraw => "static_draw",
            BufferStorageHint::DynamicDraw => "dynamic_draw",
            BufferStorageHint::StreamDraw => "stream_draw",
        }
    }
}

impl_closed_enum_parsing!(BufferUsage, "buffer usage");
impl_closed_enum_parsing!(BufferStorageHint, "buffer storage hint");

/// Buffer resource trait
///
/// Implemented by backend buffer types. A fresh buffer has no storage
/// (`size() == 0`) until the first `upload`. The native object is released
/// when the buffer is dropped.
pub trait Buffer {
    /// Bind to the binding point derived from the buffer usage
    fn bind(&self);

    /// Replace the whole storage with exactly `size` bytes
    ///
    /// `data == None` reserves storage without initial contents. A slice
    /// shorter than `size` is a fatal programming error.
    fn upload(&mut self, size: usize, data: Option<&[u8]>);

    /// Overwrite `size` bytes starting at `start`, in place
    ///
    /// Fatal unless `start < self.size()` and `start + size <= self.size()`.
    /// A zero-length update is a logged no-op.
    fn update(&self, start: usize, size: usize, data: &[u8]);

    /// Size in bytes set by the most recent upload
    fn size(&self) -> usize;

    /// Usage given at creation
    fn usage(&self) -> BufferUsage;

    /// Storage hint given at creation
    fn storage_hint(&self) -> BufferStorageHint;

    /// Native handle
    fn id(&self) -> u32;
}

impl dyn Buffer {
    /// Upload a slice of plain-old-data values (vertices, indices)
    pub fn upload_pod<T: bytemuck::Pod>(&mut self, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.upload(bytes.len(), Some(bytes));
    }

    /// Overwrite part of the buffer with plain-old-data values, `start` in bytes
    pub fn update_pod<T: bytemuck::Pod>(&self, start: usize, data: &[T]) {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        self.update(start, bytes.len(), bytes);
    }
}

#[cfg(test)]
#[path = "buffer_tests.rs"]
mod tests;
