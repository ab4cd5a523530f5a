//! Package encoder for building fixtures.
//!
//! Authoring packages is the export tooling's job; this only exists so tests
//! (in this workspace and downstream) can produce byte-exact packages without
//! checking binary files into the repository.

use crate::Header;
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use flate2::{Compression as GzCompression, write::GzEncoder};
use std::io::Write;

const GZIP_LEVEL: GzCompression = GzCompression::best();

/// Builds a `[header][gzip payload]` package using the same binary
/// convention [`PackageReader`](crate::PackageReader) expects.
///
/// # Examples
///
/// ```
/// use cuebank_package::{Header, PackageReader, PackageWriter};
///
/// let header = Header::new(&[0xAB, 0xCD]);
/// let mut writer = PackageWriter::new(header);
/// writer.write_i32(1).write_string("jump");
/// let bytes = writer.finish().unwrap();
///
/// let mut reader = PackageReader::from_bytes(&bytes, header).unwrap();
/// assert_eq!(reader.read_i32().unwrap(), 1);
/// assert_eq!(reader.read_string().unwrap(), "jump");
/// reader.finish().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PackageWriter {
    header: Vec<u8>,
    payload: Vec<u8>,
}

impl PackageWriter {
    pub fn new(header: Header<'_>) -> Self {
        Self {
            header: header.as_bytes().to_vec(),
            payload: Vec::new(),
        }
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.payload.push(value);
        self
    }

    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(u8::from(value))
    }

    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.payload.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, value: f32) -> &mut Self {
        self.payload.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// Write a record count.
    ///
    /// Panics if `count` doesn't fit in an `i32`; a fixture that large is a
    /// broken test.
    pub fn write_count(&mut self, count: usize) -> &mut Self {
        let Ok(count) = i32::try_from(count) else {
            panic!("PackageWriter::write_count: {count} does not fit in an i32");
        };
        self.write_i32(count)
    }

    pub fn write_7bit_len(&mut self, len: u32) -> &mut Self {
        let mut value = len;
        while value >= 0x80 {
            self.payload.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.write_u8(value as u8)
    }

    pub fn write_string(&mut self, value: &str) -> &mut Self {
        let Ok(len) = u32::try_from(value.len()) else {
            panic!("PackageWriter::write_string: string too long");
        };
        self.write_7bit_len(len);
        self.write_raw(value.as_bytes())
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> &mut Self {
        self.write_count(value.len());
        self.write_raw(value)
    }

    /// Append bytes to the payload verbatim, for deliberately malformed
    /// fixtures.
    pub fn write_raw(&mut self, value: &[u8]) -> &mut Self {
        self.payload.extend_from_slice(value);
        self
    }

    /// Compress the payload and prepend the header.
    pub fn finish(&self) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(self.header.clone(), GZIP_LEVEL);
        encoder.write_all(&self.payload).or_raise(|| ErrorKind::Encoder)?;
        encoder.finish().or_raise(|| ErrorKind::Encoder)
    }
}
