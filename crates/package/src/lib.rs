//! Header-validated, gzip-compressed asset packages.
//!
//! Every content kind the engine ships (cue definitions, sound effects,
//! localized strings) lives in a file laid out as:
//!
//! ```text
//! [fixed magic header bytes][gzip payload]
//! ```
//!
//! - The **header** ([`Header`]) identifies the format version and must match
//!   byte-for-byte; anything else is an [`ErrorKind::CorruptPackage`](error::ErrorKind::CorruptPackage).
//! - The **payload** is read through [`PackageReader`], which decodes the
//!   fixed binary convention (little-endian integers, 7-bit length-prefixed
//!   strings) shared by all package kinds.
//!
//! The `writer` feature exposes [`PackageWriter`] for building fixtures in
//! tests.

pub mod error;
mod header;
mod reader;
#[cfg(any(test, feature = "writer"))]
mod writer;

pub use crate::header::Header;
pub use crate::reader::{FilePackage, MEMORY_PATH, PackageReader};
#[cfg(any(test, feature = "writer"))]
pub use crate::writer::PackageWriter;
