//! BARR file header
//!
//! Layout (all integers little-endian):
//!
//! ```text
//! offset 0:   magic "BARR"          (4 bytes)
//! offset 4:   version               (1 byte)
//! offset 5:   element kind tag      (1 byte)
//! offset 6:   rank                  (1 byte)
//! offset 7:   extents               (rank x u32)
//! offset N:   array count           (u64)
//! offset N+8: records, record_size bytes each
//! ```

use alloc::vec::Vec;

use crate::error::{CodecError, Result};
use crate::format::constants::{
    offsets, COUNT_SIZE, EXTENT_SIZE, MAGIC, PREAMBLE_SIZE, VERSION,
};
use crate::format::{ElementKind, Shape};
use crate::validation::bounds::checked_span;

/// Parsed header of a BARR file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileHeader {
    /// Element kind shared by every record
    pub kind: ElementKind,
    /// Shape shared by every record
    pub shape: Shape,
    /// Number of records currently stored
    pub count: u64,
}

impl FileHeader {
    /// Magic bytes for .barr files
    pub const MAGIC: [u8; 4] = MAGIC;

    /// Current format version
    pub const VERSION: u8 = VERSION;

    /// Create a header for an empty file
    pub fn new(kind: ElementKind, shape: Shape) -> Self {
        Self {
            kind,
            shape,
            count: 0,
        }
    }

    /// Header size for a given rank
    pub const fn size_for_rank(rank: usize) -> usize {
        PREAMBLE_SIZE + rank * EXTENT_SIZE + COUNT_SIZE
    }

    /// Size of this header in bytes
    pub fn size(&self) -> usize {
        Self::size_for_rank(self.shape.rank())
    }

    /// Byte offset of the count field, rewritten on every append
    pub fn count_offset(&self) -> usize {
        self.size() - COUNT_SIZE
    }

    /// Number of elements in one record
    pub fn elements_per_array(&self) -> Result<usize> {
        self.shape.element_count()
    }

    /// Encoded size of one record in bytes
    pub fn record_size(&self) -> Result<u64> {
        let elements = self.elements_per_array()? as u64;
        elements
            .checked_mul(self.kind.size_bytes() as u64)
            .ok_or(CodecError::SizeOverflow)
    }

    /// File offset of record `index`
    pub fn record_offset(&self, index: u64) -> Result<u64> {
        checked_span(self.size() as u64, index, self.record_size()?)
    }

    /// File length implied by the header and its count
    pub fn expected_file_len(&self) -> Result<u64> {
        self.record_offset(self.count)
    }

    /// Encoded count field
    pub const fn count_bytes(count: u64) -> [u8; COUNT_SIZE] {
        count.to_le_bytes()
    }

    /// Read the full header size from the fixed preamble
    ///
    /// Lets a reader learn how many bytes to fetch before the extents are known.
    pub fn peek_size(bytes: &[u8]) -> Result<usize> {
        Self::check_preamble(bytes)?;
        Ok(Self::size_for_rank(bytes[offsets::RANK] as usize))
    }

    fn check_preamble(bytes: &[u8]) -> Result<ElementKind> {
        if bytes.len() < PREAMBLE_SIZE {
            return Err(CodecError::TruncatedHeader {
                needed: PREAMBLE_SIZE,
                available: bytes.len(),
            });
        }

        if bytes[offsets::MAGIC..offsets::MAGIC + 4] != Self::MAGIC {
            return Err(CodecError::InvalidMagic);
        }

        let version = bytes[offsets::VERSION];
        if version == 0 || version > Self::VERSION {
            return Err(CodecError::UnsupportedVersion(version));
        }

        let tag = bytes[offsets::KIND];
        ElementKind::from_u8(tag).ok_or(CodecError::UnknownElementKind(tag))
    }

    /// Parse header from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let kind = Self::check_preamble(bytes)?;

        let rank = bytes[offsets::RANK] as usize;
        let size = Self::size_for_rank(rank);
        if bytes.len() < size {
            return Err(CodecError::TruncatedHeader {
                needed: size,
                available: bytes.len(),
            });
        }

        let extents = bytes[offsets::EXTENTS..offsets::EXTENTS + rank * EXTENT_SIZE]
            .chunks_exact(EXTENT_SIZE)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect::<Vec<u32>>();
        let shape = Shape::new(extents)?;

        let count_start = size - COUNT_SIZE;
        let mut count_bytes = [0u8; COUNT_SIZE];
        count_bytes.copy_from_slice(&bytes[count_start..size]);
        let count = u64::from_le_bytes(count_bytes);

        let header = Self { kind, shape, count };
        // Reject headers whose record arithmetic cannot be represented
        header.expected_file_len()?;
        Ok(header)
    }

    /// Convert header to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size());

        bytes.extend_from_slice(&Self::MAGIC);
        bytes.push(Self::VERSION);
        bytes.push(self.kind.to_u8());
        // Shape::new caps rank at u8::MAX
        bytes.push(self.shape.rank() as u8);
        for extent in self.shape.extents() {
            bytes.extend_from_slice(&extent.to_le_bytes());
        }
        bytes.extend_from_slice(&Self::count_bytes(self.count));

        bytes
    }
}
