//! Error types for the archive library.
//!
//! The archive fast path (`OArchive::write`, `IArchive::read`) never returns
//! errors. These types surface at the edges: stream seeking, file opening,
//! the checked `IArchive::try_read`, the offline builders and the CLI.

use std::path::PathBuf;
use thiserror::Error;

use crate::io::Origin;

/// Main error type for archive operations.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Stream handed to an archive is not opened
    #[error("Stream is not opened")]
    StreamNotOpened,

    /// Seek before the stream start or past the maximum stream size
    #[error("Invalid seek: offset {offset} from {origin:?}")]
    InvalidSeek { offset: i32, origin: Origin },

    /// Next bytes in the stream do not hold the expected type tag
    #[error("Type tag does not match archive content, expected {expected}")]
    TagMismatch { expected: String },

    /// Object was written with a version this library cannot read
    #[error("Unsupported {type_name} version: {version}")]
    UnsupportedVersion { type_name: &'static str, version: u32 },

    /// Raw (offline) structure failed validation
    #[error("Invalid raw data: {0}")]
    InvalidRaw(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create a raw validation error.
    pub fn invalid_raw(msg: impl Into<String>) -> Self {
        Self::InvalidRaw(msg.into())
    }

    /// Create a tag mismatch error from the raw tag bytes.
    pub(crate) fn tag_mismatch(tag: &[u8]) -> Self {
        let trimmed = tag.strip_suffix(&[0]).unwrap_or(tag);
        Self::TagMismatch {
            expected: String::from_utf8_lossy(trimmed).into_owned(),
        }
    }
}

/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;
