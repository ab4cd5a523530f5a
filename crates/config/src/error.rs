//! Configuration Error Types
//!
//! Same scheme as the package errors: an `exn` tree with an actionable
//! [`ErrorKind`] at each level.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The configuration sources could not be read or merged.
    #[display("failed to load configuration")]
    Extract,
    /// An explicitly requested configuration file doesn't exist.
    #[display("configuration file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// A configuration file with an extension we can't parse.
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// A field holds a value the loaders can't work with.
    #[display("invalid configuration value: {_0}")]
    Invalid(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Configuration errors need a human to edit something.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Invalid("language_count").to_string(), "invalid configuration value: language_count");
        assert_eq!(
            ErrorKind::NotFound(PathBuf::from("/etc/cuebank.toml")).to_string(),
            "configuration file not found: /etc/cuebank.toml"
        );
        assert!(!ErrorKind::Extract.is_retryable());
    }
}
