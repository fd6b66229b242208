//! Error types produced by the ingest crate.
//!
//! Every failure here belongs to the I/O edge of the system: the label
//! matching core never sees a partially loaded document. All errors are
//! typed, cloneable, and comparable so callers and tests can match on them.
//!
//! | Error | Category | Description |
//! |-------|----------|-------------|
//! | [`NotFound`](IngestError::NotFound) | I/O | Input path does not exist |
//! | [`Io`](IngestError::Io) | I/O | Input exists but could not be read |
//! | [`InputTooLarge`](IngestError::InputTooLarge) | Validation | File exceeds `max_input_bytes` |
//! | [`UnknownEncoding`](IngestError::UnknownEncoding) | Config | Encoding name not recognized |
//! | [`Config`](IngestError::Config) | Config | [`IngestConfig`](crate::IngestConfig) failed validation |
//!
//! ```rust
//! use ingest::IngestError;
//!
//! fn exit_code(error: &IngestError) -> i32 {
//!     match error {
//!         IngestError::NotFound(_) | IngestError::Io { .. } => 2,
//!         _ => 1,
//!     }
//! }
//! assert_eq!(exit_code(&IngestError::NotFound("a.html".into())), 2);
//! ```
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while loading an annotated document.
///
/// The enum is `#[non_exhaustive]`; match with a catch-all arm.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IngestError {
    /// The input path does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The input exists but reading it failed.
    ///
    /// The underlying `std::io::Error` is flattened to its message so the
    /// error stays `Clone + Eq`.
    #[error("failed to read {path}: {message}")]
    Io { path: String, message: String },

    /// The raw input is larger than the configured limit.
    #[error("{path} is {size} bytes, exceeding the limit of {limit} bytes")]
    InputTooLarge {
        path: String,
        size: usize,
        limit: usize,
    },

    /// An encoding name in configuration is not supported.
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    /// The ingest configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IngestError {
    pub(crate) fn from_io(path: &str, err: &std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            IngestError::NotFound(path.to_string())
        } else {
            IngestError::Io {
                path: path.to_string(),
                message: err.to_string(),
            }
        }
    }
}
