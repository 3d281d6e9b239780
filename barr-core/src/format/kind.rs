//! Element kinds supported by the BARR format

/// Scalar (or complex pair) type stored in every element of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum ElementKind {
    /// 8-bit signed integer
    Int8 = 0,
    /// 16-bit signed integer
    Int16 = 1,
    /// 32-bit signed integer
    Int32 = 2,
    /// 64-bit signed integer
    Int64 = 3,
    /// 8-bit unsigned integer
    UInt8 = 4,
    /// 16-bit unsigned integer
    UInt16 = 5,
    /// 32-bit unsigned integer
    UInt32 = 6,
    /// 64-bit unsigned integer
    UInt64 = 7,
    /// 32-bit floating point
    Float32 = 8,
    /// 64-bit floating point
    Float64 = 9,
    /// Pair of 32-bit floats (real, imaginary)
    Complex64 = 10,
    /// Pair of 64-bit floats (real, imaginary)
    Complex128 = 11,
    /// Boolean stored as a single 0/1 byte
    Bool = 12,
}

impl ElementKind {
    /// Every kind, in tag order
    pub const ALL: [ElementKind; 13] = [
        ElementKind::Int8,
        ElementKind::Int16,
        ElementKind::Int32,
        ElementKind::Int64,
        ElementKind::UInt8,
        ElementKind::UInt16,
        ElementKind::UInt32,
        ElementKind::UInt64,
        ElementKind::Float32,
        ElementKind::Float64,
        ElementKind::Complex64,
        ElementKind::Complex128,
        ElementKind::Bool,
    ];

    /// Convert from u8 tag
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ElementKind::Int8),
            1 => Some(ElementKind::Int16),
            2 => Some(ElementKind::Int32),
            3 => Some(ElementKind::Int64),
            4 => Some(ElementKind::UInt8),
            5 => Some(ElementKind::UInt16),
            6 => Some(ElementKind::UInt32),
            7 => Some(ElementKind::UInt64),
            8 => Some(ElementKind::Float32),
            9 => Some(ElementKind::Float64),
            10 => Some(ElementKind::Complex64),
            11 => Some(ElementKind::Complex128),
            12 => Some(ElementKind::Bool),
            _ => None,
        }
    }

    /// Convert to u8 tag
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Size in bytes of one encoded element
    pub const fn size_bytes(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::UInt8 | ElementKind::Bool => 1,
            ElementKind::Int16 | ElementKind::UInt16 => 2,
            ElementKind::Int32 | ElementKind::UInt32 | ElementKind::Float32 => 4,
            ElementKind::Int64
            | ElementKind::UInt64
            | ElementKind::Float64
            | ElementKind::Complex64 => 8,
            ElementKind::Complex128 => 16,
        }
    }

    /// Lowercase name used in messages and JSON output
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::Int8 => "int8",
            ElementKind::Int16 => "int16",
            ElementKind::Int32 => "int32",
            ElementKind::Int64 => "int64",
            ElementKind::UInt8 => "uint8",
            ElementKind::UInt16 => "uint16",
            ElementKind::UInt32 => "uint32",
            ElementKind::UInt64 => "uint64",
            ElementKind::Float32 => "float32",
            ElementKind::Float64 => "float64",
            ElementKind::Complex64 => "complex64",
            ElementKind::Complex128 => "complex128",
            ElementKind::Bool => "bool",
        }
    }
}

impl core::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}
