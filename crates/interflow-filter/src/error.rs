//! Filter persistence errors.
//!
//! Only the persisted cache can fail. The store itself recovers from every
//! failure (see [`FilterStore`](crate::FilterStore)); these errors surface
//! when the cache is driven directly.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FilterError {
    /// File I/O error.
    #[error("failed to {operation} {path}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize filter cache")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },

    /// Atomic write failed (temp file couldn't be renamed).
    #[error("failed to replace {target_path} with {temp_path}")]
    AtomicWriteFailed {
        temp_path: PathBuf,
        target_path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine the filter cache location")]
    NoCacheLocation,
}

pub type Result<T> = std::result::Result<T, FilterError>;
