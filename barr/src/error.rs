//! Error types for BARR file operations

use std::{io, path::PathBuf};

use barr_core::{CodecError, ElementKind, Shape};
use thiserror::Error;

/// Errors returned by [`BinaryArrayFile`](crate::BinaryArrayFile) and friends
#[derive(Debug, Error)]
pub enum Error {
    /// The path could not be opened in the requested mode
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Corrupt or unrecognized header, or a length that breaks the record arithmetic
    #[error("malformed array file: {0}")]
    Format(#[from] CodecError),
    #[error("shape mismatch: file holds {expected} arrays, got {found}")]
    ShapeMismatch { expected: Shape, found: Shape },
    #[error("element kind mismatch: file holds {expected}, got {found}")]
    KindMismatch {
        expected: ElementKind,
        found: ElementKind,
    },
    #[error("index {index} out of range for {len} arrays")]
    Index { index: usize, len: usize },
    #[error("file is open read-only")]
    ReadOnly,
    #[error("file is open write-only")]
    WriteOnly,
    #[error("file is closed")]
    Closed,
    /// Schema queried before any array fixed it
    #[error("no array has been written yet")]
    NotInitialized,
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }
}

/// Result type for BARR file operations
pub type Result<T> = std::result::Result<T, Error>;
