//! Error types for syzygy-fetch.

use std::io;
use thiserror::Error;

/// Any failure here is fatal to the run; there is no retry and no
/// skip-and-continue.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("invalid URL for table {name:?}: {reason}")]
    InvalidUrl { name: String, reason: String },

    #[error("refusing table name that would escape the destination: {0:?}")]
    UnsafeName(String),

    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
}
