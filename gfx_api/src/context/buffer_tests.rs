//! Unit tests for Buffer module
//!
//! Tests BufferUsage / BufferStorageHint defaults, names and boundary parsing.

use crate::context::{BufferStorageHint, BufferUsage};
use crate::error::Error;

#[test]
fn test_storage_hint_default_is_static_draw() {
    assert_eq!(BufferStorageHint::default(), BufferStorageHint::StaticDraw);
}

#[test]
fn test_buffer_usage_names() {
    assert_eq!(BufferUsage::VertexBuffer.to_string(), "vertex_buffer");
    assert_eq!(BufferUsage::IndexBuffer.to_string(), "index_buffer");
}

#[test]
fn test_storage_hint_names() {
    assert_eq!(BufferStorageHint::StaticDraw.to_string(), "static_draw");
    assert_eq!(BufferStorageHint::DynamicDraw.to_string(), "dynamic_draw");
    assert_eq!(BufferStorageHint::StreamDraw.to_string(), "stream_draw");
}

#[test]
fn test_buffer_usage_parsing() {
    assert_eq!(BufferUsage::try_from(0), Ok(BufferUsage::VertexBuffer));
    assert_eq!(BufferUsage::try_from(1), Ok(BufferUsage::IndexBuffer));
    assert_eq!("index_buffer".parse::<BufferUsage>(), Ok(BufferUsage::IndexBuffer));

    let err = BufferUsage::try_from(2).unwrap_err();
    assert_eq!(err, Error::InvalidValue("unrecognised buffer usage 2".to_string()));
    assert!("uniform_buffer".parse::<BufferUsage>().is_err());
}

#[test]
fn test_storage_hint_parsing() {
    for (raw, hint) in BufferStorageHint::ALL.into_iter().enumerate() {
        assert_eq!(BufferStorageHint::try_from(raw as u32), Ok(hint));
        assert_eq!(hint.name().parse::<BufferStorageHint>(), Ok(hint));
    }

    let err = "static_read".parse::<BufferStorageHint>().unwrap_err();
    assert_eq!(
        err,
        Error::InvalidValue("unrecognised buffer storage hint 'static_read'".to_string())
    );
}
