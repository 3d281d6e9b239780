//! Batch appends and range reads
//!
//! Records are encoded and decoded with rayon once a batch reaches
//! [`FileConfig::parallel_threshold`](crate::FileConfig::parallel_threshold).
//! The file itself is always touched with one positional write or read.

use std::ops::Range;

use barr_core::{codec, validation::records_len, Array, CodecError, FileHeader};
use rayon::prelude::*;

use super::{check_schema, file_io, BinaryArrayFile};
use crate::error::{Error, Result};

impl BinaryArrayFile {
    /// Append every array in `arrays` with a single write
    ///
    /// All arrays are checked against the schema before anything is written,
    /// so one mismatch leaves the file untouched. On a fresh file the first
    /// array fixes the schema. A failed sync is reported after the batch is
    /// already stored, as with [`append`](Self::append).
    pub fn extend(&mut self, arrays: &[Array]) -> Result<()> {
        self.check_writable()?;
        let Some(first) = arrays.first() else {
            return Ok(());
        };

        let fixed = match &self.header {
            Some(_) => None,
            None => Some(FileHeader::new(first.kind(), first.shape().clone())),
        };

        let file = self.handle()?;
        let header = fixed
            .as_ref()
            .or(self.header.as_ref())
            .ok_or(Error::NotInitialized)?;
        for array in arrays {
            check_schema(header, array.kind(), array.shape())?;
        }

        let records = if self.config.use_parallel(arrays.len()) {
            arrays
                .par_iter()
                .map(|array| codec::encode_record(array, header))
                .collect::<std::result::Result<Vec<_>, CodecError>>()?
                .concat()
        } else {
            let mut out = Vec::with_capacity(records_len(header, arrays.len() as u64)?);
            for array in arrays {
                out.extend(codec::encode_record(array, header)?);
            }
            out
        };

        let count =
            file_io::append_records(file, header, fixed.is_some(), &records, arrays.len() as u64)?;
        log::trace!(
            "appended {} arrays to {}, {count} total",
            arrays.len(),
            self.path.display()
        );

        self.commit_append(fixed, count);
        self.sync_after_write()
    }

    /// Read the arrays at `range` in order
    pub fn read_range(&self, range: Range<usize>) -> Result<Vec<Array>> {
        let file = self.readable()?;
        let len = self.len()?;
        if range.start > range.end {
            return Err(Error::Index {
                index: range.start,
                len,
            });
        }
        if range.end > len {
            return Err(Error::Index {
                index: range.end - 1,
                len,
            });
        }
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let header = self.schema()?;
        let count = range.end - range.start;
        let mut bytes = vec![0u8; records_len(header, count as u64)?];
        file_io::read_at(file, header.record_offset(range.start as u64)?, &mut bytes)?;

        // Shapes have no zero extents, so records are never empty
        let record_len = records_len(header, 1)?;
        let arrays = if self.config.use_parallel(count) {
            bytes
                .par_chunks_exact(record_len)
                .map(|record| codec::decode_record(record, header))
                .collect::<std::result::Result<Vec<_>, CodecError>>()?
        } else {
            bytes
                .chunks_exact(record_len)
                .map(|record| codec::decode_record(record, header))
                .collect::<std::result::Result<Vec<_>, CodecError>>()?
        };
        log::trace!("read arrays {range:?} from {}", self.path.display());

        Ok(arrays)
    }

    /// Read every stored array
    pub fn read_all(&self) -> Result<Vec<Array>> {
        self.read_range(0..self.len()?)
    }
}
