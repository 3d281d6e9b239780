//! Format constants and magic bytes for the BARR file layout

/// Magic bytes at offset 0
pub const MAGIC: [u8; 4] = *b"BARR";

/// Current format version
pub const VERSION: u8 = 1;

/// Bytes before the extents: magic, version, kind tag, rank
pub const PREAMBLE_SIZE: usize = 7;

/// Width of one encoded extent
pub const EXTENT_SIZE: usize = 4;

/// Width of the trailing array count field
pub const COUNT_SIZE: usize = 8;

/// Largest rank the 1-byte rank field can hold
pub const MAX_RANK: usize = u8::MAX as usize;

/// Field offsets inside the preamble
pub mod offsets {
    pub const MAGIC: usize = 0;
    pub const VERSION: usize = 4;
    pub const KIND: usize = 5;
    pub const RANK: usize = 6;
    pub const EXTENTS: usize = 7;
}
