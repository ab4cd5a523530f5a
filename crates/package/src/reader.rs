//! Structured reads over a decompressed package payload.

use crate::Header;
use crate::error::{Error, ErrorKind, Result};
use exn::{Exn, ResultExt};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Path reported in errors for packages read from memory.
pub const MEMORY_PATH: &str = "<memory>";
/// A 7-bit encoded `i32` never needs more than five bytes.
const MAX_7BIT_BYTES: u32 = 5;

/// A package opened from disk.
pub type FilePackage = PackageReader<GzDecoder<BufReader<File>>>;

/// Typed reader over the decompressed payload of a package.
///
/// The fixed binary convention shared by every package kind:
///
/// - `i32`/`f32`: four bytes, little-endian
/// - `bool`: one byte, `0` or `1`
/// - counts: `i32`, never negative
/// - strings: 7-bit variable-length byte count, then UTF-8 bytes
/// - blobs: `i32` byte count, then the bytes
///
/// Every failure is reported as [`ErrorKind::CorruptPackage`] carrying the
/// package path, with the specific [`ErrorKind::Malformed`] value as its
/// child. There is no way to skip a bad record; the caller drops whatever it
/// has built so far.
pub struct PackageReader<R> {
    path: PathBuf,
    inner: R,
}

impl FilePackage {
    /// Open a package file, validate its header and start decompressing.
    ///
    /// The file handle is owned by the returned reader and closed when it is
    /// dropped, including on every error path.
    #[instrument(skip_all, fields(path = %path.as_ref().display(), header_len = header.len()))]
    pub fn open(path: impl AsRef<Path>, header: Header<'_>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        Self::with_header(BufReader::new(file), path, header)
    }
}

impl<'a> PackageReader<GzDecoder<&'a [u8]>> {
    /// Validate the header of an in-memory package and start decompressing.
    pub fn from_bytes(bytes: &'a [u8], header: Header<'_>) -> Result<Self> {
        Self::with_header(bytes, MEMORY_PATH, header)
    }
}

impl<S: Read> PackageReader<GzDecoder<S>> {
    /// Strip and validate `header` from `source`, then wrap the remainder in
    /// a gzip decoder. `path` is only used for error reporting.
    pub fn with_header(mut source: S, path: impl Into<PathBuf>, header: Header<'_>) -> Result<Self> {
        let path = path.into();
        let matched = header.strip(&mut source).or_raise(|| ErrorKind::Io(path.clone()))?;
        if !matched {
            tracing::debug!(path = %path.display(), "package header mismatch");
            return Err(Exn::from(ErrorKind::Malformed("header")).raise(ErrorKind::CorruptPackage(path)));
        }
        Ok(Self { path, inner: GzDecoder::new(source) })
    }
}

impl<R: Read> PackageReader<R> {
    /// Path of the package, for diagnostics.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build the error for a value that decoded but makes no sense (unknown
    /// tag, negative count). Used by the table loaders.
    pub fn malformed(&self, what: &'static str) -> Error {
        Exn::from(ErrorKind::Malformed(what)).raise(ErrorKind::CorruptPackage(self.path.clone()))
    }

    fn fill<const N: usize>(&mut self, what: &'static str) -> Result<[u8; N]> {
        let mut buffer = [0u8; N];
        self.inner
            .read_exact(&mut buffer)
            .or_raise(|| ErrorKind::Malformed(what))
            .or_raise(|| ErrorKind::CorruptPackage(self.path.clone()))?;
        Ok(buffer)
    }

    fn take_exact(&mut self, len: usize, what: &'static str) -> Result<Vec<u8>> {
        // Don't trust `len` for a pre-allocation; a corrupt length would
        // otherwise reserve gigabytes before failing.
        let mut buffer = Vec::new();
        (&mut self.inner)
            .take(len as u64)
            .read_to_end(&mut buffer)
            .or_raise(|| ErrorKind::Malformed(what))
            .or_raise(|| ErrorKind::CorruptPackage(self.path.clone()))?;
        if buffer.len() != len {
            return Err(self.malformed(what));
        }
        Ok(buffer)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.fill::<1>("byte")?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.fill::<1>("bool")?[0] {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(self.malformed("bool")),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.fill("i32")?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.fill("f32")?))
    }

    /// Read an `i32` record count. Negative counts are malformed.
    pub fn read_count(&mut self) -> Result<usize> {
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| self.malformed("count"))
    }

    /// Read a 7-bit variable-length encoded length (low groups first, high
    /// bit set on every byte but the last).
    pub fn read_7bit_len(&mut self) -> Result<usize> {
        let mut value: u32 = 0;
        for group in 0..MAX_7BIT_BYTES {
            let byte = self.fill::<1>("string length")?[0];
            if group == MAX_7BIT_BYTES - 1 && byte > 0x0F {
                return Err(self.malformed("string length"));
            }
            value |= u32::from(byte & 0x7F) << (7 * group);
            if byte & 0x80 == 0 {
                return match i32::try_from(value) {
                    Ok(len) => Ok(len as usize),
                    Err(_) => Err(self.malformed("string length")),
                };
            }
        }
        Err(self.malformed("string length"))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_7bit_len()?;
        let bytes = self.take_exact(len, "string")?;
        String::from_utf8(bytes)
            .or_raise(|| ErrorKind::Malformed("string"))
            .or_raise(|| ErrorKind::CorruptPackage(self.path.clone()))
    }

    /// Read an `i32`-length-prefixed byte blob.
    pub fn read_bytes(&mut self) -> Result<Vec<u8>> {
        let len = self.read_count()?;
        self.take_exact(len, "blob")
    }

    /// Assert the payload has been fully consumed.
    pub fn finish(mut self) -> Result<()> {
        let mut probe = [0u8; 1];
        let read = self
            .inner
            .read(&mut probe)
            .or_raise(|| ErrorKind::Malformed("payload"))
            .or_raise(|| ErrorKind::CorruptPackage(self.path.clone()))?;
        match read {
            0 => Ok(()),
            _ => Err(self.malformed("trailing data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PackageWriter;
    use rstest::rstest;

    const HEADER: &[u8] = &[0xAB, 0xCD];

    fn package(build: impl FnOnce(&mut PackageWriter)) -> Vec<u8> {
        let mut writer = PackageWriter::new(Header::new(HEADER));
        build(&mut writer);
        writer.finish().unwrap()
    }

    fn corrupt_path(err: &Error) -> PathBuf {
        match &**err {
            ErrorKind::CorruptPackage(path) => path.clone(),
            other => panic!("expected CorruptPackage, got {other:?}"),
        }
    }

    #[test]
    fn test_primitives() {
        let bytes = package(|w| {
            w.write_u8(7).write_bool(true).write_i32(-42).write_f32(0.5).write_string("sfx/jump.wav");
            w.write_bytes(&[1, 2, 3]);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert!(reader.read_bool().unwrap());
        assert_eq!(reader.read_i32().unwrap(), -42);
        assert_eq!(reader.read_f32().unwrap(), 0.5);
        assert_eq!(reader.read_string().unwrap(), "sfx/jump.wav");
        assert_eq!(reader.read_bytes().unwrap(), vec![1, 2, 3]);
        reader.finish().unwrap();
    }

    #[rstest]
    #[case(&[0xCD, 0xAB])]
    #[case(&[0x1F, 0x8B])]
    #[case(&[0xAB, 0xCD, 0x00])]
    fn test_wrong_header(#[case] expected: &[u8]) {
        let bytes = package(|w| {
            w.write_i32(0);
        });
        let err = PackageReader::from_bytes(&bytes, Header::new(expected)).err().unwrap();
        assert_eq!(corrupt_path(&err), PathBuf::from(MEMORY_PATH));
    }

    #[test]
    fn test_file_shorter_than_header() {
        let err = PackageReader::from_bytes(&[0xAB], Header::new(HEADER)).err().unwrap();
        assert_eq!(corrupt_path(&err), PathBuf::from(MEMORY_PATH));
    }

    #[rstest]
    #[case(0, &[0x00])]
    #[case(1, &[0x01])]
    #[case(127, &[0x7F])]
    #[case(128, &[0x80, 0x01])]
    #[case(300, &[0xAC, 0x02])]
    #[case(i32::MAX as usize, &[0xFF, 0xFF, 0xFF, 0xFF, 0x07])]
    fn test_7bit_len(#[case] expected: usize, #[case] encoded: &[u8]) {
        let bytes = package(|w| {
            w.write_raw(encoded);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert_eq!(reader.read_7bit_len().unwrap(), expected);
    }

    #[rstest]
    // Sixth continuation byte
    #[case(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01])]
    // Doesn't fit in an i32
    #[case(&[0xFF, 0xFF, 0xFF, 0xFF, 0x0F])]
    // Truncated
    #[case(&[0x80])]
    fn test_7bit_len_invalid(#[case] encoded: &[u8]) {
        let bytes = package(|w| {
            w.write_raw(encoded);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert!(reader.read_7bit_len().is_err());
    }

    #[test]
    fn test_negative_count() {
        let bytes = package(|w| {
            w.write_i32(-1);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert!(reader.read_count().is_err());
    }

    #[test]
    fn test_invalid_bool() {
        let bytes = package(|w| {
            w.write_u8(2);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert!(reader.read_bool().is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes = package(|w| {
            w.write_7bit_len(2).write_raw(&[0xC3, 0x28]);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert!(reader.read_string().is_err());
    }

    #[test]
    fn test_truncated_string() {
        let bytes = package(|w| {
            w.write_7bit_len(10).write_raw(b"short");
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        assert!(reader.read_string().is_err());
    }

    #[test]
    fn test_trailing_data() {
        let bytes = package(|w| {
            w.write_i32(1).write_u8(0xFF);
        });
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        reader.read_i32().unwrap();
        assert!(reader.finish().is_err());
    }

    #[test]
    fn test_payload_not_gzip() {
        let mut bytes = HEADER.to_vec();
        bytes.extend_from_slice(b"This is not compressed data");
        let mut reader = PackageReader::from_bytes(&bytes, Header::new(HEADER)).unwrap();
        let err = reader.read_i32().unwrap_err();
        assert_eq!(corrupt_path(&err), PathBuf::from(MEMORY_PATH));
    }

    #[test]
    fn test_open_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("cues.rcru");
        std::fs::write(&path, package(|w| {
            w.write_string("hello");
        }))
        .unwrap();
        let mut reader = PackageReader::open(&path, Header::new(HEADER)).unwrap();
        assert_eq!(reader.path(), path);
        assert_eq!(reader.read_string().unwrap(), "hello");
        reader.finish().unwrap();
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.rcru");
        let err = PackageReader::open(&path, Header::new(HEADER)).err().unwrap();
        assert_eq!(*err, ErrorKind::Io(path));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_open_corrupt_file_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("strings.rcru");
        std::fs::write(&path, b"garbage").unwrap();
        let err = PackageReader::open(&path, Header::new(HEADER)).err().unwrap();
        assert_eq!(corrupt_path(&err), path);
    }
}
