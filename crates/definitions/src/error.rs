//! Definitions Error Types
//!
//! Loading a content set fails as a whole. The top frame says which package
//! was at fault; the package error underneath says why.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A content loading error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for content loading.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid content configuration")]
    Config,
    #[display("failed to load cues from {}", _0.display())]
    Cues(#[error(not(source))] PathBuf),
    #[display("failed to load sounds from {}", _0.display())]
    Sounds(#[error(not(source))] PathBuf),
    #[display("failed to load strings from {}", _0.display())]
    Strings(#[error(not(source))] PathBuf),
    /// Palette data too short to hold a single texel.
    #[display("invalid palette: {_0} bytes")]
    InvalidPalette(#[error(not(source))] usize),
    #[display("I/O error: {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
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

    #[test]
    fn error_kind_display() {
        assert_eq!(
            ErrorKind::Cues(PathBuf::from("content/cues.rcru")).to_string(),
            "failed to load cues from content/cues.rcru"
        );
        assert_eq!(ErrorKind::InvalidPalette(3).to_string(), "invalid palette: 3 bytes");
        assert!(ErrorKind::Io(PathBuf::new()).is_retryable());
        assert!(!ErrorKind::Strings(PathBuf::new()).is_retryable());
    }
}
