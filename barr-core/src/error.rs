//! Error types for BARR encoding and decoding

use crate::format::ElementKind;

/// Errors that can occur while encoding or decoding BARR data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// Magic bytes do not spell "BARR"
    InvalidMagic,
    /// Format version newer than this library understands
    UnsupportedVersion(u8),
    /// Element kind tag outside the known range
    UnknownElementKind(u8),
    /// A zero extent, or a rank field inconsistent with the header bytes
    InvalidShape,
    /// Fewer bytes than the header needs
    TruncatedHeader { needed: usize, available: usize },
    /// A buffer or file length that disagrees with the record arithmetic
    LengthMismatch { expected: u64, actual: u64 },
    /// Element buffer length differs from the product of the shape's extents
    ElementCountMismatch { expected: usize, actual: usize },
    /// Byte other than 0 or 1 in a bool record
    InvalidBool(u8),
    /// Element data does not match the kind it was declared with
    KindMismatch { expected: ElementKind, found: ElementKind },
    /// Size arithmetic overflowed
    SizeOverflow,
}

impl core::fmt::Display for CodecError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CodecError::InvalidMagic => write!(f, "Invalid BARR magic bytes"),
            CodecError::UnsupportedVersion(v) => write!(f, "Unsupported format version {v}"),
            CodecError::UnknownElementKind(tag) => write!(f, "Unknown element kind tag {tag}"),
            CodecError::InvalidShape => write!(f, "Invalid array shape"),
            CodecError::TruncatedHeader { needed, available } => {
                write!(f, "Header needs {needed} bytes, only {available} available")
            }
            CodecError::LengthMismatch { expected, actual } => {
                write!(f, "Expected {expected} bytes, found {actual}")
            }
            CodecError::ElementCountMismatch { expected, actual } => {
                write!(f, "Shape holds {expected} elements, buffer has {actual}")
            }
            CodecError::InvalidBool(b) => write!(f, "Invalid bool byte {b:#04x}"),
            CodecError::KindMismatch { expected, found } => {
                write!(f, "Expected {expected} elements, found {found}")
            }
            CodecError::SizeOverflow => write!(f, "Size calculation overflowed"),
        }
    }
}

impl core::error::Error for CodecError {}

/// Result type for BARR codec operations
pub type Result<T> = core::result::Result<T, CodecError>;
