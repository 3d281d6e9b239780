//! Open modes and lifecycle states of a BARR file handle

use std::{fs::OpenOptions, str::FromStr};

use thiserror::Error;

/// How a [`BinaryArrayFile`](crate::BinaryArrayFile) is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Existing file, no mutation
    Read,
    /// Create or truncate; the schema is fixed by the first array written
    Write,
    /// Open an existing file for get/put/append, or create it if absent
    ReadWrite,
}

impl OpenMode {
    pub const fn can_read(self) -> bool {
        matches!(self, OpenMode::Read | OpenMode::ReadWrite)
    }

    pub const fn can_write(self) -> bool {
        matches!(self, OpenMode::Write | OpenMode::ReadWrite)
    }

    /// `std::fs` options matching this mode
    ///
    /// Write handles never read: appends roll back with `set_len`, which only
    /// needs write access.
    pub(crate) fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        match self {
            OpenMode::Read => {
                options.read(true);
            }
            OpenMode::Write => {
                options.write(true).create(true).truncate(true);
            }
            OpenMode::ReadWrite => {
                options.read(true).write(true).create(true).truncate(false);
            }
        }
        options
    }
}

impl core::fmt::Display for OpenMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            OpenMode::Read => write!(f, "r"),
            OpenMode::Write => write!(f, "w"),
            OpenMode::ReadWrite => write!(f, "rw"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown open mode {0:?}, expected one of r, w, rw")]
pub struct ParseModeError(String);

impl FromStr for OpenMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "r" | "read" => Ok(OpenMode::Read),
            "w" | "write" => Ok(OpenMode::Write),
            "rw" | "r+" | "readwrite" => Ok(OpenMode::ReadWrite),
            other => Err(ParseModeError(other.to_owned())),
        }
    }
}

/// Lifecycle state of a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    OpenRead,
    /// Write mode, no array written yet
    OpenWriteUnsized,
    OpenWriteSized,
    /// ReadWrite mode; unsized until the first append on a fresh file
    OpenReadWrite { sized: bool },
    Closed,
}
