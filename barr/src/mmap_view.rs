//! Read-only memory-mapped view of a BARR file
//!
//! The whole file is mapped once and records are decoded straight out of the
//! mapping, which suits scans over files written earlier. The view sees the
//! length and count fixed at open time; arrays appended later by another
//! handle are not visible.

use std::{
    fs::File,
    path::{Path, PathBuf},
};

use barr_core::{
    codec, validation::validate_file_len, Array, CodecError, Element, ElementKind, FileHeader,
    Shape,
};
use memmap2::{Mmap, MmapOptions};

use crate::error::{Error, Result};

/// Memory-mapped, read-only access to the arrays of a BARR file
pub struct ArrayFileView {
    mmap: Mmap,
    header: FileHeader,
    record_size: usize,
    path: PathBuf,
}

impl ArrayFileView {
    /// Map `path` and validate its header and length
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|err| Error::open(path.clone(), err))?;

        // Zero-length mappings are rejected by some platforms
        let file_len = file.metadata()?.len();
        if file_len == 0 {
            return Err(CodecError::TruncatedHeader {
                needed: barr_core::constants::PREAMBLE_SIZE,
                available: 0,
            }
            .into());
        }

        // SAFETY: Memory mapping a file is unsafe because another process may
        // modify or truncate it underneath us. This is acceptable because:
        // 1. The mapping is read-only
        // 2. The mapping owns its own reference to the file
        // 3. The length identity is checked before any record is touched
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let header = FileHeader::from_bytes(&mmap)?;
        validate_file_len(&header, mmap.len() as u64)?;
        let record_size =
            usize::try_from(header.record_size()?).map_err(|_| CodecError::SizeOverflow)?;

        log::debug!(
            "mapped {}: {} arrays of {} {}",
            path.display(),
            header.count,
            header.kind,
            header.shape
        );

        Ok(Self {
            mmap,
            header,
            record_size,
            path,
        })
    }

    pub fn len(&self) -> usize {
        self.header.count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.header.count == 0
    }

    pub fn shape(&self) -> &Shape {
        &self.header.shape
    }

    pub fn element_kind(&self) -> ElementKind {
        self.header.kind
    }

    pub fn header(&self) -> &FileHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw little-endian bytes of the record at `index`
    pub fn record_bytes(&self, index: usize) -> Result<&[u8]> {
        let len = self.len();
        if index >= len {
            return Err(Error::Index { index, len });
        }
        // In bounds: the length identity was checked at open
        let start = self.header.size() + index * self.record_size;
        Ok(&self.mmap[start..start + self.record_size])
    }

    /// Decode the array at `index`
    pub fn get(&self, index: usize) -> Result<Array> {
        Ok(codec::decode_record(self.record_bytes(index)?, &self.header)?)
    }

    /// Decode the array at `index` as a typed vector
    pub fn get_as<T: Element>(&self, index: usize) -> Result<Vec<T>> {
        if self.header.kind != T::kind() {
            return Err(Error::KindMismatch {
                expected: self.header.kind,
                found: T::kind(),
            });
        }
        let bytes = self.record_bytes(index)?;
        Ok(codec::decode_typed(bytes, self.header.elements_per_array()?)?)
    }

    /// Iterate over every array in order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Result<Array>> + '_ {
        (0..self.len()).map(move |index| self.get(index))
    }
}
