//! Offset and length validation for BARR record arithmetic
//!
//! Pure functions with overflow protection and no I/O.

use crate::error::{CodecError, Result};
use crate::format::FileHeader;

/// `base + index * stride`, failing on overflow
pub const fn checked_span(base: u64, index: u64, stride: u64) -> Result<u64> {
    let offset = match index.checked_mul(stride) {
        Some(offset) => offset,
        None => return Err(CodecError::SizeOverflow),
    };
    match base.checked_add(offset) {
        Some(end) => Ok(end),
        None => Err(CodecError::SizeOverflow),
    }
}

/// Check that a byte length matches what the record arithmetic predicts
pub const fn validate_byte_len(expected: u64, actual: u64) -> Result<()> {
    if expected != actual {
        return Err(CodecError::LengthMismatch { expected, actual });
    }
    Ok(())
}

/// Check the `header_size + count * record_size` identity against a file length
pub fn validate_file_len(header: &FileHeader, file_len: u64) -> Result<()> {
    validate_byte_len(header.expected_file_len()?, file_len)
}

/// Byte length of `count` consecutive records
pub fn records_len(header: &FileHeader, count: u64) -> Result<usize> {
    let len = checked_span(0, count, header.record_size()?)?;
    usize::try_from(len).map_err(|_| CodecError::SizeOverflow)
}
