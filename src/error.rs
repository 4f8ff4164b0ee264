//! Error types for the Cella library.

use thiserror::Error;

/// Errors that can occur during Cella operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A file-level incompatibility: wrong signature, file type, format
    /// version, or guard integer. The whole file is rejected before any
    /// entity is read.
    #[error("{0}")]
    Format(String),

    /// Corrupt data detected mid-read: a malformed variable-length integer,
    /// a truncated entity, or a garbled footer.
    #[error("{0}")]
    Corrupt(String),

    /// A writer/reader defect: a pool index out of range or a mismatched
    /// cache/index file pair.
    #[error("{0}")]
    Logic(String),

    /// A validation constraint was violated while building a cache.
    #[error("{0}")]
    Validation(String),
}
