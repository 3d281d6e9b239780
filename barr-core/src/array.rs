//! In-memory array buffers exchanged with BARR files
//!
//! An [`Array`] always carries its [`Shape`] and, through [`ArrayData`], its
//! [`ElementKind`]. Nothing about the schema is inferred from the values.

use alloc::vec::Vec;
use num_complex::{Complex32, Complex64};

use crate::error::{CodecError, Result};
use crate::format::{ElementKind, Shape};
use crate::traits::Element;

/// Flat element buffer holding any supported element type
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "values", rename_all = "lowercase"))]
pub enum ArrayData {
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UInt8(Vec<u8>),
    UInt16(Vec<u16>),
    UInt32(Vec<u32>),
    UInt64(Vec<u64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    Complex64(Vec<Complex32>),
    Complex128(Vec<Complex64>),
    Bool(Vec<bool>),
}

/// Run `$body` with `$values` bound to the typed vector of any variant
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ArrayData::Int8($values) => $body,
            ArrayData::Int16($values) => $body,
            ArrayData::Int32($values) => $body,
            ArrayData::Int64($values) => $body,
            ArrayData::UInt8($values) => $body,
            ArrayData::UInt16($values) => $body,
            ArrayData::UInt32($values) => $body,
            ArrayData::UInt64($values) => $body,
            ArrayData::Float32($values) => $body,
            ArrayData::Float64($values) => $body,
            ArrayData::Complex64($values) => $body,
            ArrayData::Complex128($values) => $body,
            ArrayData::Bool($values) => $body,
        }
    };
}

/// Run `$body` with `$t` naming the element type of `$kind`
macro_rules! with_element_type {
    ($kind:expr, $t:ident => $body:expr) => {
        match $kind {
            ElementKind::Int8 => {
                type $t = i8;
                $body
            }
            ElementKind::Int16 => {
                type $t = i16;
                $body
            }
            ElementKind::Int32 => {
                type $t = i32;
                $body
            }
            ElementKind::Int64 => {
                type $t = i64;
                $body
            }
            ElementKind::UInt8 => {
                type $t = u8;
                $body
            }
            ElementKind::UInt16 => {
                type $t = u16;
                $body
            }
            ElementKind::UInt32 => {
                type $t = u32;
                $body
            }
            ElementKind::UInt64 => {
                type $t = u64;
                $body
            }
            ElementKind::Float32 => {
                type $t = f32;
                $body
            }
            ElementKind::Float64 => {
                type $t = f64;
                $body
            }
            ElementKind::Complex64 => {
                type $t = Complex32;
                $body
            }
            ElementKind::Complex128 => {
                type $t = Complex64;
                $body
            }
            ElementKind::Bool => {
                type $t = bool;
                $body
            }
        }
    };
}

impl ArrayData {
    /// Element kind of the held values
    pub fn kind(&self) -> ElementKind {
        match self {
            ArrayData::Int8(_) => ElementKind::Int8,
            ArrayData::Int16(_) => ElementKind::Int16,
            ArrayData::Int32(_) => ElementKind::Int32,
            ArrayData::Int64(_) => ElementKind::Int64,
            ArrayData::UInt8(_) => ElementKind::UInt8,
            ArrayData::UInt16(_) => ElementKind::UInt16,
            ArrayData::UInt32(_) => ElementKind::UInt32,
            ArrayData::UInt64(_) => ElementKind::UInt64,
            ArrayData::Float32(_) => ElementKind::Float32,
            ArrayData::Float64(_) => ElementKind::Float64,
            ArrayData::Complex64(_) => ElementKind::Complex64,
            ArrayData::Complex128(_) => ElementKind::Complex128,
            ArrayData::Bool(_) => ElementKind::Bool,
        }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the little-endian encoding of every element to `out`
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        with_values!(self, values => Element::encode_slice(values.as_slice(), out))
    }

    /// Decode `bytes` as elements of `kind`
    pub fn decode(bytes: &[u8], kind: ElementKind) -> Result<Self> {
        with_element_type!(kind, T => T::decode_slice(bytes).map(T::into_data))
    }
}

/// An element buffer together with the shape it is laid out in
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "ArrayParts"))]
pub struct Array {
    shape: Shape,
    #[cfg_attr(feature = "serde", serde(flatten))]
    data: ArrayData,
}

/// Unchecked wire form, validated through [`Array::new`] on deserialization
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ArrayParts {
    shape: Shape,
    #[serde(flatten)]
    data: ArrayData,
}

#[cfg(feature = "serde")]
impl TryFrom<ArrayParts> for Array {
    type Error = CodecError;

    fn try_from(parts: ArrayParts) -> Result<Self> {
        Self::new(parts.shape, parts.data)
    }
}

impl Array {
    /// Pair a buffer with its shape; the element count must match the shape
    pub fn new(shape: Shape, data: ArrayData) -> Result<Self> {
        let expected = shape.element_count()?;
        if data.len() != expected {
            return Err(CodecError::ElementCountMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    /// Build an array from a typed vector
    pub fn from_vec<T: Element>(shape: Shape, values: Vec<T>) -> Result<Self> {
        Self::new(shape, T::into_data(values))
    }

    /// Rank-0 array holding one value
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            shape: Shape::scalar(),
            data: T::into_data(alloc::vec![value]),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ElementKind {
        self.data.kind()
    }

    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the elements as `T`, if that is their type
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice_of(&self.data)
    }

    /// Take the elements as `T`
    pub fn into_vec<T: Element>(self) -> Result<Vec<T>> {
        T::from_data(self.data).map_err(|data| CodecError::KindMismatch {
            expected: T::kind(),
            found: data.kind(),
        })
    }
}
