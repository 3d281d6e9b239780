//! Stateless translation between headers, element buffers and bytes
//!
//! Element data is always little-endian. Complex elements are written as
//! (real, imaginary) pairs of the matching float width and bools as one 0/1
//! byte. No widening or narrowing is ever applied.

use alloc::vec::Vec;

use crate::array::{Array, ArrayData};
use crate::error::{CodecError, Result};
use crate::format::{ElementKind, FileHeader, Shape};
use crate::traits::Element;
use crate::validation::bounds::validate_byte_len;

/// Encode the header of an empty file with the given schema
pub fn encode_header(kind: ElementKind, shape: &Shape) -> Vec<u8> {
    FileHeader::new(kind, shape.clone()).to_bytes()
}

/// Decode a header, returning its schema and encoded size
pub fn decode_header(bytes: &[u8]) -> Result<(ElementKind, Shape, usize)> {
    let header = FileHeader::from_bytes(bytes)?;
    let size = header.size();
    Ok((header.kind, header.shape, size))
}

/// Encode a flat buffer that must hold elements of `kind`
pub fn encode_array(data: &ArrayData, kind: ElementKind) -> Result<Vec<u8>> {
    if data.kind() != kind {
        return Err(CodecError::KindMismatch {
            expected: kind,
            found: data.kind(),
        });
    }
    let mut out = Vec::with_capacity(data.len() * kind.size_bytes());
    data.encode_into(&mut out);
    Ok(out)
}

/// Decode exactly `element_count` elements of `kind`
pub fn decode_array(bytes: &[u8], kind: ElementKind, element_count: usize) -> Result<ArrayData> {
    let expected = (element_count as u64)
        .checked_mul(kind.size_bytes() as u64)
        .ok_or(CodecError::SizeOverflow)?;
    validate_byte_len(expected, bytes.len() as u64)?;
    ArrayData::decode(bytes, kind)
}

/// Encode one record for a file with the given header
pub fn encode_record(array: &Array, header: &FileHeader) -> Result<Vec<u8>> {
    if array.shape() != &header.shape {
        return Err(CodecError::InvalidShape);
    }
    encode_array(array.data(), header.kind)
}

/// Decode one record of a file with the given header
pub fn decode_record(bytes: &[u8], header: &FileHeader) -> Result<Array> {
    let data = decode_array(bytes, header.kind, header.elements_per_array()?)?;
    Array::new(header.shape.clone(), data)
}

/// Encode a typed slice without going through [`ArrayData`]
pub fn encode_typed<T: Element>(values: &[T]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * T::size_bytes());
    T::encode_slice(values, &mut out);
    out
}

/// Decode exactly `element_count` elements of type `T`
pub fn decode_typed<T: Element>(bytes: &[u8], element_count: usize) -> Result<Vec<T>> {
    let expected = (element_count as u64)
        .checked_mul(T::size_bytes() as u64)
        .ok_or(CodecError::SizeOverflow)?;
    validate_byte_len(expected, bytes.len() as u64)?;
    T::decode_slice(bytes)
}
