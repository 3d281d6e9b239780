//! Element type constraints for BARR records
//!
//! This module defines the trait that constrains what Rust types can be
//! stored as array elements, and how each one is laid out on disk.

use alloc::vec::Vec;
use num_complex::{Complex32, Complex64};

use crate::array::ArrayData;
use crate::error::{CodecError, Result};
use crate::format::ElementKind;

/// Trait for types that can be stored as array elements
///
/// Every element is written little-endian with the fixed width of its
/// [`ElementKind`]. Complex values are written as (real, imaginary).
pub trait Element: Copy + PartialEq + Send + Sync + Sized + 'static {
    /// Get the BARR ElementKind for this element type
    fn kind() -> ElementKind;

    /// Size in bytes of one encoded element
    fn size_bytes() -> usize {
        Self::kind().size_bytes()
    }

    /// Append the little-endian encoding of `self`
    fn write_le(self, out: &mut Vec<u8>);

    /// Read one element from the start of `bytes`
    fn read_le(bytes: &[u8]) -> Result<Self>;

    /// Append the encoding of every value in `values`
    fn encode_slice(values: &[Self], out: &mut Vec<u8>) {
        out.reserve(values.len() * Self::size_bytes());
        for &value in values {
            value.write_le(out);
        }
    }

    /// Decode a byte slice holding a whole number of elements
    fn decode_slice(bytes: &[u8]) -> Result<Vec<Self>> {
        check_whole_elements(bytes.len(), Self::size_bytes())?;
        bytes
            .chunks_exact(Self::size_bytes())
            .map(Self::read_le)
            .collect()
    }

    /// Wrap a typed vector in the matching [`ArrayData`] variant
    fn into_data(values: Vec<Self>) -> ArrayData;

    /// Borrow the typed elements if `data` holds this type
    fn slice_of(data: &ArrayData) -> Option<&[Self]>;

    /// Take the typed elements back out, returning `data` untouched on mismatch
    fn from_data(data: ArrayData) -> core::result::Result<Vec<Self>, ArrayData>;
}

fn check_whole_elements(byte_len: usize, size: usize) -> Result<()> {
    if byte_len % size != 0 {
        let whole = (byte_len / size * size) as u64;
        return Err(CodecError::LengthMismatch {
            expected: whole,
            actual: byte_len as u64,
        });
    }
    Ok(())
}

fn insufficient(bytes: &[u8], size: usize) -> CodecError {
    CodecError::LengthMismatch {
        expected: size as u64,
        actual: bytes.len() as u64,
    }
}

/// Shared body for [`Element`] impls over `bytemuck::Pod` types
///
/// On little-endian targets the in-memory layout already is the file layout,
/// so whole slices are copied with bytemuck instead of element by element.
macro_rules! pod_slice_codec {
    () => {
        fn encode_slice(values: &[Self], out: &mut Vec<u8>) {
            if cfg!(target_endian = "little") {
                out.extend_from_slice(bytemuck::cast_slice(values));
            } else {
                out.reserve(values.len() * Self::size_bytes());
                for &value in values {
                    value.write_le(out);
                }
            }
        }

        fn decode_slice(bytes: &[u8]) -> Result<Vec<Self>> {
            check_whole_elements(bytes.len(), Self::size_bytes())?;
            if cfg!(target_endian = "little") {
                Ok(bytemuck::pod_collect_to_vec(bytes))
            } else {
                bytes
                    .chunks_exact(Self::size_bytes())
                    .map(Self::read_le)
                    .collect()
            }
        }
    };
}

macro_rules! data_variant {
    ($variant:ident) => {
        fn into_data(values: Vec<Self>) -> ArrayData {
            ArrayData::$variant(values)
        }

        fn slice_of(data: &ArrayData) -> Option<&[Self]> {
            match data {
                ArrayData::$variant(values) => Some(values),
                _ => None,
            }
        }

        fn from_data(data: ArrayData) -> core::result::Result<Vec<Self>, ArrayData> {
            match data {
                ArrayData::$variant(values) => Ok(values),
                other => Err(other),
            }
        }
    };
}

/// Implement Element for primitive numeric types
macro_rules! impl_primitive_element {
    ($type:ty, $variant:ident) => {
        impl Element for $type {
            fn kind() -> ElementKind {
                ElementKind::$variant
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Result<Self> {
                const SIZE: usize = core::mem::size_of::<$type>();
                let array: [u8; SIZE] = bytes
                    .get(..SIZE)
                    .and_then(|b| b.try_into().ok())
                    .ok_or_else(|| insufficient(bytes, SIZE))?;
                Ok(<$type>::from_le_bytes(array))
            }

            pod_slice_codec!();
            data_variant!($variant);
        }
    };
}

impl_primitive_element!(i8, Int8);
impl_primitive_element!(i16, Int16);
impl_primitive_element!(i32, Int32);
impl_primitive_element!(i64, Int64);
impl_primitive_element!(u8, UInt8);
impl_primitive_element!(u16, UInt16);
impl_primitive_element!(u32, UInt32);
impl_primitive_element!(u64, UInt64);
impl_primitive_element!(f32, Float32);
impl_primitive_element!(f64, Float64);

/// Implement Element for complex pairs of a float type
macro_rules! impl_complex_element {
    ($type:ty, $float:ty, $variant:ident) => {
        impl Element for $type {
            fn kind() -> ElementKind {
                ElementKind::$variant
            }

            fn write_le(self, out: &mut Vec<u8>) {
                out.extend_from_slice(&self.re.to_le_bytes());
                out.extend_from_slice(&self.im.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Result<Self> {
                const HALF: usize = core::mem::size_of::<$float>();
                let re = <$float as Element>::read_le(bytes)
                    .map_err(|_| insufficient(bytes, 2 * HALF))?;
                let im = bytes
                    .get(HALF..)
                    .ok_or_else(|| insufficient(bytes, 2 * HALF))
                    .and_then(|rest| {
                        <$float as Element>::read_le(rest)
                            .map_err(|_| insufficient(bytes, 2 * HALF))
                    })?;
                Ok(<$type>::new(re, im))
            }

            pod_slice_codec!();
            data_variant!($variant);
        }
    };
}

impl_complex_element!(Complex32, f32, Complex64);
impl_complex_element!(Complex64, f64, Complex128);

impl Element for bool {
    fn kind() -> ElementKind {
        ElementKind::Bool
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.push(self as u8);
    }

    fn read_le(bytes: &[u8]) -> Result<Self> {
        match bytes.first() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            Some(&other) => Err(CodecError::InvalidBool(other)),
            None => Err(insufficient(bytes, 1)),
        }
    }

    data_variant!(Bool);
}
