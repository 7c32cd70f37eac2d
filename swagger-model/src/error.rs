//! Error types for entity reading and writing.
//!
//! The model builder itself never fails: members it cannot represent are
//! omitted and logged. Errors only arise when entities are decoded from or
//! encoded into a body.

use thiserror::Error;

/// Errors produced by entity readers and writers.
#[derive(Debug, Error)]
pub enum EntityError {
    /// JSON encoding or decoding failed.
    #[error("JSON entity error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML decoding failed.
    #[error("XML entity error: {0}")]
    XmlRead(#[from] quick_xml::DeError),

    /// XML encoding failed.
    #[error("XML entity error: {0}")]
    XmlWrite(#[from] quick_xml::SeError),

    /// A custom accessor failed to decode or encode the entity.
    #[error("entity codec error: {0}")]
    Codec(#[from] erased_serde::Error),

    /// Writing the body failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No accessor is registered for the media type.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),
}

impl EntityError {
    /// Create an unsupported media type error.
    pub fn unsupported(mime: impl Into<String>) -> Self {
        Self::UnsupportedMediaType(mime.into())
    }

    /// Whether this error comes from the payload encoding rather than from
    /// media type negotiation.
    pub fn is_codec_error(&self) -> bool {
        !matches!(self, Self::UnsupportedMediaType(_))
    }
}

/// Result type for entity operations.
pub type EntityResult<T> = Result<T, EntityError>;
