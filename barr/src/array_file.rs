//! Random-access file handle for .barr files
//!
//! A [`BinaryArrayFile`] owns one open file and the header describing it. All
//! records share the schema fixed by the header, so record `i` always lives
//! at `header_size + i * record_size`.
//!
//! The count field is rewritten in place after every successful append, and
//! the length identity `header_size + count * record_size == file_len` is
//! checked on every open. A handle does no locking: two handles on the same
//! path, in this process or another, may observe each other's writes in any
//! order, and keeping them apart is up to the caller.

use std::{
    fs::File,
    ops::Range,
    path::{Path, PathBuf},
};

use barr_core::{codec, validation::records_len, Array, Element, ElementKind, FileHeader, Shape};

use crate::config::FileConfig;
use crate::error::{Error, Result};

mod batch;
pub(crate) mod file_io;
mod mode;

pub use mode::{FileState, OpenMode, ParseModeError};

/// Handle over one BARR file
#[derive(Debug)]
pub struct BinaryArrayFile {
    path: PathBuf,
    mode: OpenMode,
    config: FileConfig,
    /// `None` once closed
    file: Option<File>,
    /// `None` until the schema is fixed
    header: Option<FileHeader>,
    cursor: usize,
    dirty: bool,
}

fn check_schema(header: &FileHeader, kind: ElementKind, shape: &Shape) -> Result<()> {
    if header.shape != *shape {
        return Err(Error::ShapeMismatch {
            expected: header.shape.clone(),
            found: shape.clone(),
        });
    }
    if header.kind != kind {
        return Err(Error::KindMismatch {
            expected: header.kind,
            found: kind,
        });
    }
    Ok(())
}

impl BinaryArrayFile {
    /// Open `path` in `mode` with the default [`FileConfig`]
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        Self::open_with_config(path, mode, FileConfig::default())
    }

    /// Open `path` in `mode`
    ///
    /// Read requires an existing file with a valid header. Write creates or
    /// truncates. ReadWrite parses an existing non-empty file and otherwise
    /// behaves like Write.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        mode: OpenMode,
        config: FileConfig,
    ) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = mode
            .options()
            .open(&path)
            .map_err(|err| Error::open(path.clone(), err))?;

        let header = match mode {
            OpenMode::Write => None,
            OpenMode::Read => Some(file_io::read_header(&file)?),
            OpenMode::ReadWrite => {
                if file.metadata()?.len() == 0 {
                    None
                } else {
                    Some(file_io::read_header(&file)?)
                }
            }
        };

        match &header {
            Some(header) => log::debug!(
                "opened {} ({mode}): {} arrays of {} {}",
                path.display(),
                header.count,
                header.kind,
                header.shape
            ),
            None => log::debug!("opened {} ({mode}) without a schema", path.display()),
        }

        Ok(Self {
            path,
            mode,
            config,
            file: Some(file),
            header,
            cursor: 0,
            dirty: false,
        })
    }

    fn handle(&self) -> Result<&File> {
        self.file.as_ref().ok_or(Error::Closed)
    }

    fn readable(&self) -> Result<&File> {
        let file = self.handle()?;
        if !self.mode.can_read() {
            return Err(Error::WriteOnly);
        }
        Ok(file)
    }

    fn check_writable(&self) -> Result<()> {
        self.handle()?;
        if !self.mode.can_write() {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    fn schema(&self) -> Result<&FileHeader> {
        self.handle()?;
        self.header.as_ref().ok_or(Error::NotInitialized)
    }

    fn checked_index(&self, index: usize) -> Result<&FileHeader> {
        let len = self.len()?;
        if index >= len {
            return Err(Error::Index { index, len });
        }
        self.schema()
    }

    /// Runs after the write is committed, so an error here leaves the new
    /// data in the file and in `len()`; only its durability is unknown
    fn sync_after_write(&self) -> Result<()> {
        if self.config.sync_on_write {
            self.handle()?.sync_data()?;
        }
        Ok(())
    }

    /// Record the count reached by an append, installing the header it fixed
    fn commit_append(&mut self, fixed: Option<FileHeader>, count: u64) {
        if let Some(header) = fixed {
            log::debug!(
                "schema of {} fixed to {} {}",
                self.path.display(),
                header.kind,
                header.shape
            );
            self.header = Some(header);
        }
        if let Some(header) = self.header.as_mut() {
            header.count = count;
        }
        self.dirty = true;
    }

    /// Number of stored arrays
    pub fn len(&self) -> Result<usize> {
        self.handle()?;
        Ok(self.header.as_ref().map_or(0, |header| header.count as usize))
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Shape shared by every array in the file
    pub fn shape(&self) -> Result<&Shape> {
        Ok(&self.schema()?.shape)
    }

    /// Element kind shared by every array in the file
    pub fn element_kind(&self) -> Result<ElementKind> {
        Ok(self.schema()?.kind)
    }

    pub fn rank(&self) -> Result<usize> {
        Ok(self.shape()?.rank())
    }

    pub fn elements_per_array(&self) -> Result<usize> {
        Ok(self.schema()?.elements_per_array()?)
    }

    /// Extent of dimension `dim`
    pub fn extent(&self, dim: usize) -> Result<u32> {
        let shape = self.shape()?;
        shape.extent(dim).ok_or(Error::Index {
            index: dim,
            len: shape.rank(),
        })
    }

    pub fn header(&self) -> Result<&FileHeader> {
        self.schema()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    pub fn config(&self) -> &FileConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    pub fn state(&self) -> FileState {
        if self.file.is_none() {
            return FileState::Closed;
        }
        match (self.mode, self.header.is_some()) {
            (OpenMode::Read, _) => FileState::OpenRead,
            (OpenMode::Write, false) => FileState::OpenWriteUnsized,
            (OpenMode::Write, true) => FileState::OpenWriteSized,
            (OpenMode::ReadWrite, sized) => FileState::OpenReadWrite { sized },
        }
    }

    /// Fix the schema of a file that has none yet
    ///
    /// Writes an empty header immediately. On a file that already has a
    /// schema this only checks that the two agree.
    pub fn init(&mut self, kind: ElementKind, shape: Shape) -> Result<()> {
        self.check_writable()?;
        if let Some(header) = &self.header {
            return check_schema(header, kind, &shape);
        }

        let header = FileHeader::new(kind, shape);
        header.record_size()?;

        let file = self.handle()?;
        if let Err(err) = file_io::write_at(file, 0, &header.to_bytes()) {
            if let Err(truncate_err) = file.set_len(0) {
                log::warn!("rollback truncation failed: {truncate_err}");
            }
            return Err(err.into());
        }

        self.commit_append(Some(header), 0);
        self.sync_after_write()
    }

    /// Append one array at the end of the file
    ///
    /// The first append to a fresh file fixes its schema from `array`. With
    /// [`FileConfig::sync_on_write`] set, an `Io` error after the record is
    /// stored means only the sync failed and the array is already counted.
    pub fn append(&mut self, array: &Array) -> Result<()> {
        self.check_writable()?;

        let fixed = match &self.header {
            Some(header) => {
                check_schema(header, array.kind(), array.shape())?;
                None
            }
            None => Some(FileHeader::new(array.kind(), array.shape().clone())),
        };

        let file = self.handle()?;
        let header = fixed
            .as_ref()
            .or(self.header.as_ref())
            .ok_or(Error::NotInitialized)?;
        let record = codec::encode_record(array, header)?;
        let count = file_io::append_records(file, header, fixed.is_some(), &record, 1)?;
        log::trace!("appended array {} to {}", count - 1, self.path.display());

        self.commit_append(fixed, count);
        self.sync_after_write()
    }

    /// Read the array at `index`
    pub fn get(&self, index: usize) -> Result<Array> {
        let file = self.readable()?;
        let header = self.checked_index(index)?;

        let mut bytes = vec![0u8; records_len(header, 1)?];
        file_io::read_at(file, header.record_offset(index as u64)?, &mut bytes)?;
        log::trace!("read array {index} from {}", self.path.display());

        Ok(codec::decode_record(&bytes, header)?)
    }

    /// Read the array at `index` as a typed vector
    pub fn get_as<T: Element>(&self, index: usize) -> Result<Vec<T>> {
        let file = self.readable()?;
        let header = self.checked_index(index)?;
        if header.kind != T::kind() {
            return Err(Error::KindMismatch {
                expected: header.kind,
                found: T::kind(),
            });
        }

        let mut bytes = vec![0u8; records_len(header, 1)?];
        file_io::read_at(file, header.record_offset(index as u64)?, &mut bytes)?;

        Ok(codec::decode_typed(&bytes, header.elements_per_array()?)?)
    }

    /// Overwrite the array at `index` in place
    ///
    /// As with [`append`](Self::append), a failed sync is reported after the
    /// new record is already written.
    pub fn put(&mut self, index: usize, array: &Array) -> Result<()> {
        let file = self.handle()?;
        match self.mode {
            OpenMode::Read => return Err(Error::ReadOnly),
            OpenMode::Write => return Err(Error::WriteOnly),
            OpenMode::ReadWrite => {}
        }

        let header = self.checked_index(index)?;
        check_schema(header, array.kind(), array.shape())?;
        let record = codec::encode_record(array, header)?;
        file_io::overwrite_record(file, header.record_offset(index as u64)?, &record)?;
        log::trace!("overwrote array {index} in {}", self.path.display());

        self.dirty = true;
        self.sync_after_write()
    }

    /// Read the array under the cursor and advance it; `None` past the end
    pub fn read_next(&mut self) -> Result<Option<Array>> {
        self.readable()?;
        if self.cursor >= self.len()? {
            return Ok(None);
        }
        let array = self.get(self.cursor)?;
        self.cursor += 1;
        Ok(Some(array))
    }

    /// Move the cursor back to the first array
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Iterate over every stored array in order
    pub fn iter(&self) -> Result<Iter<'_>> {
        self.readable()?;
        Ok(Iter {
            file: self,
            range: 0..self.len()?,
        })
    }

    /// Flush and release the file handle
    ///
    /// Calling this again, or dropping the handle afterwards, does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        if self.dirty && self.config.sync_on_close {
            file.sync_all()?;
        }
        log::debug!("closed {}", self.path.display());
        Ok(())
    }
}

impl Drop for BinaryArrayFile {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::warn!("failed to close {}: {err}", self.path.display());
        }
    }
}

/// Iterator over the arrays of a [`BinaryArrayFile`]
pub struct Iter<'a> {
    file: &'a BinaryArrayFile,
    range: Range<usize>,
}

impl Iterator for Iter<'_> {
    type Item = Result<Array>;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.next().map(|index| self.file.get(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use barr_core::{ArrayData, CodecError, Complex64};
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use std::fs;

    pub(crate) fn temp_path(name: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        (dir, path)
    }

    pub(crate) fn random_complex_arrays(n: usize, shape: &Shape, seed: u64) -> Vec<Array> {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = shape.element_count().unwrap();
        (0..n)
            .map(|_| {
                let values = (0..count)
                    .map(|_| Complex64::new(rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)))
                    .collect::<Vec<_>>();
                Array::from_vec(shape.clone(), values).unwrap()
            })
            .collect()
    }

    /// Random array of any kind, built from random bytes
    fn random_array(kind: ElementKind, shape: &Shape, rng: &mut StdRng) -> Array {
        let len = shape.element_count().unwrap() * kind.size_bytes();
        let mut bytes: Vec<u8> = (0..len).map(|_| rng.gen()).collect();
        if kind == ElementKind::Bool {
            bytes.iter_mut().for_each(|b| *b &= 1);
        }
        Array::new(shape.clone(), ArrayData::decode(&bytes, kind).unwrap()).unwrap()
    }

    fn bytes_of(array: &Array) -> Vec<u8> {
        codec::encode_array(array.data(), array.kind()).unwrap()
    }

    fn shape(extents: &[u32]) -> Shape {
        Shape::new(extents.to_vec()).unwrap()
    }

    fn write_file(path: &Path, arrays: &[Array]) {
        let mut file = BinaryArrayFile::open(path, OpenMode::Write).unwrap();
        for array in arrays {
            file.append(array).unwrap();
        }
        file.close().unwrap();
    }

    #[test]
    fn test_can_create() {
        let (_dir, path) = temp_path("create.barr");
        let shape = shape(&[2, 4, 8]);
        let arrays = random_complex_arrays(200, &shape, 1);

        let mut outfile = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        for array in &arrays {
            outfile.append(array).unwrap();
        }
        assert_eq!(outfile.len().unwrap(), 200);
        assert_eq!(outfile.shape().unwrap(), &shape);
        assert_eq!(outfile.element_kind().unwrap(), ElementKind::Complex128);
        drop(outfile);

        let infile = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(infile.len().unwrap(), 200);
        assert_eq!(infile.shape().unwrap(), &shape);
        assert_eq!(infile.element_kind().unwrap(), ElementKind::Complex128);
        for (k, array) in arrays.iter().enumerate() {
            assert_eq!(&infile.get(k).unwrap(), array);
        }
        drop(infile);

        let inoutfile = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        assert_eq!(inoutfile.len().unwrap(), 200);
        assert_eq!(inoutfile.shape().unwrap(), &shape);
        assert_eq!(inoutfile.element_kind().unwrap(), ElementKind::Complex128);
        for (k, array) in arrays.iter().enumerate() {
            assert_eq!(&inoutfile.get(k).unwrap(), array);
        }
    }

    #[test]
    fn test_round_trip_every_kind() {
        let mut rng = StdRng::seed_from_u64(99);
        let shape = shape(&[3, 2]);

        for kind in ElementKind::ALL {
            let (_dir, path) = temp_path("kinds.barr");
            let arrays: Vec<Array> = (0..5).map(|_| random_array(kind, &shape, &mut rng)).collect();
            write_file(&path, &arrays);

            let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
            assert_eq!(file.element_kind().unwrap(), kind);
            for (i, array) in arrays.iter().enumerate() {
                // Compare encodings so NaN payloads count as equal
                assert_eq!(bytes_of(&file.get(i).unwrap()), bytes_of(array), "{kind}");
            }
        }
    }

    #[test]
    fn test_length_invariant() {
        let (_dir, path) = temp_path("length.barr");
        let shape = shape(&[4, 3]);
        let arrays: Vec<Array> = (0..17)
            .map(|i| Array::from_vec(shape.clone(), vec![i as f32; 12]).unwrap())
            .collect();

        let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        for (n, array) in arrays.iter().enumerate() {
            file.append(array).unwrap();
            let header = file.header().unwrap();
            assert_eq!(file.len().unwrap(), n + 1);
            assert_eq!(
                fs::metadata(&path).unwrap().len(),
                header.size() as u64 + (n as u64 + 1) * 48
            );
        }
        file.close().unwrap();

        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(file.len().unwrap(), 17);
    }

    #[test]
    fn test_read_only_rejects_mutation() {
        let (_dir, path) = temp_path("readonly.barr");
        let arrays = random_complex_arrays(3, &shape(&[2, 2]), 2);
        write_file(&path, &arrays);
        let before = fs::read(&path).unwrap();

        let mut file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert!(matches!(file.append(&arrays[0]), Err(Error::ReadOnly)));
        assert!(matches!(file.put(0, &arrays[1]), Err(Error::ReadOnly)));
        assert!(matches!(
            file.init(ElementKind::Complex128, shape(&[2, 2])),
            Err(Error::ReadOnly)
        ));
        drop(file);

        assert_eq!(fs::read(&path).unwrap(), before);
        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(file.len().unwrap(), 3);
    }

    #[test]
    fn test_schema_rigidity() {
        let (_dir, path) = temp_path("schema.barr");
        let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        file.append(&Array::from_vec(shape(&[2, 3]), vec![1i32; 6]).unwrap())
            .unwrap();
        let before = fs::read(&path).unwrap();

        let wrong_shape = Array::from_vec(shape(&[3, 2]), vec![1i32; 6]).unwrap();
        assert!(matches!(
            file.append(&wrong_shape),
            Err(Error::ShapeMismatch { .. })
        ));

        let wrong_kind = Array::from_vec(shape(&[2, 3]), vec![1i64; 6]).unwrap();
        match file.append(&wrong_kind) {
            Err(Error::KindMismatch { expected, found }) => {
                assert_eq!(expected, ElementKind::Int32);
                assert_eq!(found, ElementKind::Int64);
            }
            other => panic!("expected kind mismatch, got {other:?}"),
        }

        assert_eq!(file.len().unwrap(), 1);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_put_schema_mismatch() {
        let (_dir, path) = temp_path("put_schema.barr");
        let shape = shape(&[2, 2]);
        let arrays = random_complex_arrays(4, &shape, 14);

        let mut file = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        file.extend(&arrays).unwrap();
        let before = fs::read(&path).unwrap();

        let wrong_shape = random_complex_arrays(1, &Shape::new(vec![4]).unwrap(), 15).remove(0);
        match file.put(1, &wrong_shape) {
            Err(Error::ShapeMismatch { expected, found }) => {
                assert_eq!(expected, shape);
                assert_eq!(found.extents(), &[4]);
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }

        let wrong_kind = Array::from_vec(shape.clone(), vec![0.5f64; 4]).unwrap();
        match file.put(1, &wrong_kind) {
            Err(Error::KindMismatch { expected, found }) => {
                assert_eq!(expected, ElementKind::Complex128);
                assert_eq!(found, ElementKind::Float64);
            }
            other => panic!("expected kind mismatch, got {other:?}"),
        }

        assert_eq!(file.len().unwrap(), 4);
        assert_eq!(file.get(1).unwrap(), arrays[1]);
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_mixed_mode() {
        let (_dir, path) = temp_path("mixed.barr");
        let shape = shape(&[2, 4, 8]);
        let arrays = random_complex_arrays(10, &shape, 3);
        write_file(&path, &arrays);

        let replacement = random_complex_arrays(1, &shape, 4).remove(0);
        let extra = random_complex_arrays(1, &shape, 5).remove(0);

        let mut file = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        assert_eq!(file.state(), FileState::OpenReadWrite { sized: true });
        for (i, array) in arrays.iter().enumerate() {
            assert_eq!(&file.get(i).unwrap(), array);
        }

        file.put(4, &replacement).unwrap();
        assert_eq!(file.get(4).unwrap(), replacement);
        assert_eq!(file.get(3).unwrap(), arrays[3]);
        assert_eq!(file.get(5).unwrap(), arrays[5]);
        assert_eq!(file.len().unwrap(), 10);

        file.append(&extra).unwrap();
        assert_eq!(file.len().unwrap(), 11);
        assert_eq!(file.get(10).unwrap(), extra);
        file.close().unwrap();

        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(file.len().unwrap(), 11);
        assert_eq!(file.get(4).unwrap(), replacement);
        assert_eq!(file.get(10).unwrap(), extra);
    }

    #[test]
    fn test_out_of_range() {
        let (_dir, path) = temp_path("range.barr");
        let arrays = random_complex_arrays(4, &shape(&[3]), 6);
        write_file(&path, &arrays);

        let mut file = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        assert!(matches!(
            file.get(4),
            Err(Error::Index { index: 4, len: 4 })
        ));
        assert!(matches!(
            file.put(4, &arrays[0]),
            Err(Error::Index { index: 4, len: 4 })
        ));
        assert!(matches!(file.get(usize::MAX), Err(Error::Index { .. })));
        assert!(matches!(file.get_as::<Complex64>(9), Err(Error::Index { .. })));
        assert_eq!(file.len().unwrap(), 4);
    }

    #[test]
    fn test_truncated_header_is_format_error() {
        let (_dir, path) = temp_path("truncated.barr");
        let arrays = random_complex_arrays(2, &shape(&[2, 4, 8]), 7);
        write_file(&path, &arrays);

        let header_size = FileHeader::size_for_rank(3) as u64;
        fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_len(header_size - 1)
            .unwrap();

        assert!(matches!(
            BinaryArrayFile::open(&path, OpenMode::Read),
            Err(Error::Format(CodecError::TruncatedHeader { .. }))
        ));
    }

    #[test]
    fn test_partial_record_is_format_error() {
        let (_dir, path) = temp_path("partial.barr");
        let arrays = random_complex_arrays(2, &shape(&[4]), 8);
        write_file(&path, &arrays);

        let len = fs::metadata(&path).unwrap().len();
        fs::OpenOptions::new()
            .write(true)
            .open(&path)
            .unwrap()
            .set_len(len - 3)
            .unwrap();

        for mode in [OpenMode::Read, OpenMode::ReadWrite] {
            assert!(matches!(
                BinaryArrayFile::open(&path, mode),
                Err(Error::Format(CodecError::LengthMismatch { .. }))
            ));
        }
    }

    #[test]
    fn test_corrupt_magic() {
        let (_dir, path) = temp_path("magic.barr");
        fs::write(&path, b"NOPE\x01\x00\x00\0\0\0\0\0\0\0\0").unwrap();
        assert!(matches!(
            BinaryArrayFile::open(&path, OpenMode::Read),
            Err(Error::Format(CodecError::InvalidMagic))
        ));
    }

    #[test]
    fn test_read_missing_path() {
        let (_dir, path) = temp_path("missing.barr");
        assert!(matches!(
            BinaryArrayFile::open(&path, OpenMode::Read),
            Err(Error::Open { .. })
        ));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let (_dir, path) = temp_path("no/such/dir.barr");
        assert!(matches!(
            BinaryArrayFile::open(&path, OpenMode::Write),
            Err(Error::Open { .. })
        ));
    }

    #[test]
    fn test_empty_file_needs_header_in_read_mode() {
        let (_dir, path) = temp_path("empty.barr");
        fs::write(&path, b"").unwrap();
        assert!(matches!(
            BinaryArrayFile::open(&path, OpenMode::Read),
            Err(Error::Format(CodecError::TruncatedHeader { .. }))
        ));

        let file = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        assert_eq!(file.state(), FileState::OpenReadWrite { sized: false });
        assert_eq!(file.len().unwrap(), 0);
    }

    #[test]
    fn test_not_initialized_before_first_write() {
        let (_dir, path) = temp_path("fresh.barr");
        let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        assert_eq!(file.state(), FileState::OpenWriteUnsized);
        assert_eq!(file.len().unwrap(), 0);
        assert!(matches!(file.shape(), Err(Error::NotInitialized)));
        assert!(matches!(file.element_kind(), Err(Error::NotInitialized)));
        assert!(matches!(file.rank(), Err(Error::NotInitialized)));

        file.append(&Array::scalar(2.5f64)).unwrap();
        assert_eq!(file.state(), FileState::OpenWriteSized);
        assert_eq!(file.rank().unwrap(), 0);
        assert_eq!(file.elements_per_array().unwrap(), 1);
    }

    #[test]
    fn test_write_truncates_existing() {
        let (_dir, path) = temp_path("truncate.barr");
        write_file(&path, &random_complex_arrays(5, &shape(&[2]), 9));

        let file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        assert_eq!(file.len().unwrap(), 0);
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_write_mode_rejects_reads() {
        let (_dir, path) = temp_path("writeonly.barr");
        let arrays = random_complex_arrays(2, &shape(&[2]), 10);
        let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        file.append(&arrays[0]).unwrap();

        assert!(matches!(file.get(0), Err(Error::WriteOnly)));
        assert!(matches!(file.put(0, &arrays[1]), Err(Error::WriteOnly)));
        assert!(matches!(file.read_next(), Err(Error::WriteOnly)));
        assert!(file.iter().is_err());
    }

    #[test]
    fn test_closed_handle() {
        let (_dir, path) = temp_path("closed.barr");
        let arrays = random_complex_arrays(1, &shape(&[2]), 11);
        let mut file = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        file.append(&arrays[0]).unwrap();

        file.close().unwrap();
        file.close().unwrap();
        assert!(file.is_closed());
        assert_eq!(file.state(), FileState::Closed);

        assert!(matches!(file.len(), Err(Error::Closed)));
        assert!(matches!(file.shape(), Err(Error::Closed)));
        assert!(matches!(file.element_kind(), Err(Error::Closed)));
        assert!(matches!(file.get(0), Err(Error::Closed)));
        assert!(matches!(file.put(0, &arrays[0]), Err(Error::Closed)));
        assert!(matches!(file.append(&arrays[0]), Err(Error::Closed)));
        assert!(matches!(file.read_next(), Err(Error::Closed)));
    }

    #[test]
    fn test_readwrite_creates_missing_file() {
        let (_dir, path) = temp_path("created.barr");
        let mut file = BinaryArrayFile::open(&path, OpenMode::ReadWrite).unwrap();
        assert_eq!(file.state(), FileState::OpenReadWrite { sized: false });

        let array = Array::from_vec(shape(&[2]), vec![true, false]).unwrap();
        file.append(&array).unwrap();
        assert_eq!(file.state(), FileState::OpenReadWrite { sized: true });
        assert_eq!(file.get(0).unwrap(), array);
    }

    #[test]
    fn test_init_fixes_schema() {
        let (_dir, path) = temp_path("init.barr");
        let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        file.init(ElementKind::UInt16, shape(&[2, 2])).unwrap();

        assert_eq!(file.state(), FileState::OpenWriteSized);
        assert_eq!(file.len().unwrap(), 0);
        assert_eq!(file.extent(1).unwrap(), 2);
        assert!(matches!(file.extent(2), Err(Error::Index { index: 2, len: 2 })));
        assert_eq!(
            fs::metadata(&path).unwrap().len(),
            FileHeader::size_for_rank(2) as u64
        );

        file.init(ElementKind::UInt16, shape(&[2, 2])).unwrap();
        assert!(matches!(
            file.init(ElementKind::UInt8, shape(&[2, 2])),
            Err(Error::KindMismatch { .. })
        ));
        assert!(matches!(
            file.append(&Array::from_vec(shape(&[4]), vec![0u16; 4]).unwrap()),
            Err(Error::ShapeMismatch { .. })
        ));

        file.append(&Array::from_vec(shape(&[2, 2]), vec![1u16, 2, 3, 4]).unwrap())
            .unwrap();
        file.close().unwrap();

        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(file.get_as::<u16>(0).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_init_empty_file_reopens_empty() {
        let (_dir, path) = temp_path("init_empty.barr");
        let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
        file.init(ElementKind::Float64, shape(&[7])).unwrap();
        file.close().unwrap();

        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(file.len().unwrap(), 0);
        assert_eq!(file.shape().unwrap(), &shape(&[7]));
    }

    #[test]
    fn test_cursor() {
        let (_dir, path) = temp_path("cursor.barr");
        let arrays = random_complex_arrays(3, &shape(&[2]), 12);
        write_file(&path, &arrays);

        let mut file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        for array in &arrays {
            assert_eq!(file.read_next().unwrap().as_ref(), Some(array));
        }
        assert_eq!(file.read_next().unwrap(), None);

        file.rewind();
        assert_eq!(file.read_next().unwrap().as_ref(), Some(&arrays[0]));

        let collected = file.iter().unwrap().collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(collected, arrays);
        assert_eq!(file.iter().unwrap().len(), 3);
    }

    #[test]
    fn test_get_as() {
        let (_dir, path) = temp_path("typed.barr");
        let arrays = random_complex_arrays(2, &shape(&[2, 2]), 13);
        write_file(&path, &arrays);

        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(
            file.get_as::<Complex64>(1).unwrap(),
            arrays[1].as_slice::<Complex64>().unwrap()
        );
        assert!(matches!(
            file.get_as::<f64>(1),
            Err(Error::KindMismatch {
                expected: ElementKind::Complex128,
                found: ElementKind::Float64
            })
        ));
    }

    #[test]
    fn test_drop_releases_and_persists() {
        let (_dir, path) = temp_path("drop.barr");
        {
            let mut file = BinaryArrayFile::open(&path, OpenMode::Write).unwrap();
            file.append(&Array::scalar(7u64)).unwrap();
            file.append(&Array::scalar(8u64)).unwrap();
        }

        let file = BinaryArrayFile::open(&path, OpenMode::Read).unwrap();
        assert_eq!(file.get_as::<u64>(1).unwrap(), vec![8]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_array_json() {
        let array = Array::from_vec(shape(&[2]), vec![Complex64::new(1.0, -1.0); 2]).unwrap();
        let json = serde_json::to_string(&array).unwrap();
        assert_eq!(
            json,
            r#"{"shape":[2],"kind":"complex128","values":[[1.0,-1.0],[1.0,-1.0]]}"#
        );
        assert_eq!(serde_json::from_str::<Array>(&json).unwrap(), array);

        let short = r#"{"shape":[3],"kind":"int8","values":[1,2]}"#;
        assert!(serde_json::from_str::<Array>(short).is_err());
        let zero = r#"{"shape":[0],"kind":"int8","values":[]}"#;
        assert!(serde_json::from_str::<Array>(zero).is_err());
    }

    #[test]
    fn test_durable_config() {
        let (_dir, path) = temp_path("durable.barr");
        let mut file =
            BinaryArrayFile::open_with_config(&path, OpenMode::Write, FileConfig::durable())
                .unwrap();
        file.append(&Array::scalar(1i8)).unwrap();
        file.extend(&[Array::scalar(2i8), Array::scalar(3i8)]).unwrap();
        assert!(file.config().sync_on_write);
        assert_eq!(file.len().unwrap(), 3);
        file.close().unwrap();

        let mut file =
            BinaryArrayFile::open_with_config(&path, OpenMode::ReadWrite, FileConfig::durable())
                .unwrap();
        file.put(0, &Array::scalar(9i8)).unwrap();
        assert_eq!(file.len().unwrap(), 3);
        assert_eq!(file.get_as::<i8>(0).unwrap(), vec![9]);
        assert_eq!(file.get_as::<i8>(2).unwrap(), vec![3]);
    }
}
