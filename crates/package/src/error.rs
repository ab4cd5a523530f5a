//! Package Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. A failure to read any part of a
//! package always surfaces as [`ErrorKind::CorruptPackage`] (or
//! [`ErrorKind::Io`] when the file itself can't be opened), with the precise
//! cause attached as a child frame.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A package error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for package operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The package is corrupt or was written in an incompatible format
    /// version. Never retry; the whole load must be abandoned.
    #[display("package is corrupt: {}", _0.display())]
    CorruptPackage(#[error(not(source))] PathBuf),
    /// A single value inside the payload was truncated or invalid. Always
    /// found as a child of [`CorruptPackage`](Self::CorruptPackage).
    #[display("malformed {_0}")]
    Malformed(#[error(not(source))] &'static str),
    /// The package file could not be opened or read.
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// Failed to encode a package (fixture writer only).
    #[display("failed to encode package")]
    Encoder,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exn::ResultExt;

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::CorruptPackage(PathBuf::from("content/cues.rcru")).to_string(),
            "package is corrupt: content/cues.rcru"
        );
        assert_eq!(ErrorKind::Malformed("string length").to_string(), "malformed string length");
    }

    #[test]
    fn error_kind_retryable() {
        assert!(!ErrorKind::CorruptPackage(PathBuf::new()).is_retryable());
        assert!(!ErrorKind::Malformed("count").is_retryable());
        assert!(ErrorKind::Io(PathBuf::new()).is_retryable());
    }

    #[test]
    fn malformed_raised_under_corrupt_package() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof));
        let err: Result<()> = result
            .or_raise(|| ErrorKind::Malformed("count"))
            .or_raise(|| ErrorKind::CorruptPackage(PathBuf::from("strings.rcru")));
        assert_eq!(*err.unwrap_err(), ErrorKind::CorruptPackage(PathBuf::from("strings.rcru")));
    }
}
