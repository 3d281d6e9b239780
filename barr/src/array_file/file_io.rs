//! Positional reads and writes against an open BARR file
//!
//! Helpers take `&File` so read paths can share the handle immutably.

use std::{
    fs::File,
    io::{Read, Seek, SeekFrom, Write},
};

use barr_core::{validation::validate_file_len, CodecError, FileHeader};

use crate::error::Result;

pub(crate) fn read_at(mut file: &File, offset: u64, buf: &mut [u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.read_exact(buf)
}

pub(crate) fn write_at(mut file: &File, offset: u64, bytes: &[u8]) -> std::io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(bytes)
}

/// Read and validate the header of an existing, non-empty file
///
/// Checks the `header_size + count * record_size` identity against the
/// actual file length.
pub(crate) fn read_header(file: &File) -> Result<FileHeader> {
    let file_len = file.metadata()?.len();

    let mut preamble = [0u8; barr_core::constants::PREAMBLE_SIZE];
    let available = preamble.len().min(file_len as usize);
    read_at(file, 0, &mut preamble[..available])?;
    let size = FileHeader::peek_size(&preamble[..available])?;

    if file_len < size as u64 {
        return Err(CodecError::TruncatedHeader {
            needed: size,
            available: file_len as usize,
        }
        .into());
    }

    let mut bytes = vec![0u8; size];
    read_at(file, 0, &mut bytes)?;
    let header = FileHeader::from_bytes(&bytes)?;
    validate_file_len(&header, file_len)?;

    Ok(header)
}

/// Append whole encoded records and bump the stored count
///
/// On a fresh file the header is written first. The count is rewritten only
/// after the record bytes are in place. On any failure the file is truncated
/// back to its previous length and the error returned. Returns the new count.
pub(crate) fn append_records(
    file: &File,
    header: &FileHeader,
    fresh: bool,
    records: &[u8],
    added: u64,
) -> Result<u64> {
    let records_offset = header.expected_file_len()?;
    let prev_len = if fresh { 0 } else { records_offset };
    let new_count = header
        .count
        .checked_add(added)
        .ok_or(CodecError::SizeOverflow)?;

    let outcome = (|| -> std::io::Result<()> {
        if fresh {
            write_at(file, 0, &header.to_bytes())?;
        }
        write_at(file, records_offset, records)?;
        write_at(
            file,
            header.count_offset() as u64,
            &FileHeader::count_bytes(new_count),
        )
    })();

    if let Err(err) = outcome {
        log::warn!("append failed ({err}), truncating back to {prev_len} bytes");
        if let Err(truncate_err) = file.set_len(prev_len) {
            log::warn!("rollback truncation failed: {truncate_err}");
        }
        return Err(err.into());
    }

    Ok(new_count)
}

/// Overwrite one record in place, restoring the old bytes if the write fails
pub(crate) fn overwrite_record(file: &File, offset: u64, record: &[u8]) -> Result<()> {
    let mut previous = vec![0u8; record.len()];
    read_at(file, offset, &mut previous)?;

    if let Err(err) = write_at(file, offset, record) {
        log::warn!("overwrite at offset {offset} failed ({err}), restoring previous record");
        if let Err(restore_err) = write_at(file, offset, &previous) {
            log::warn!("restoring previous record failed: {restore_err}");
        }
        return Err(err.into());
    }

    Ok(())
}
