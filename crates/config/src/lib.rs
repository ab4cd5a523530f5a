//! Content configuration: where the packages are, which headers they carry,
//! how many languages the strings package holds, and how missing content is
//! reported.
//!
//! Loaded with [`figment`], lowest priority first:
//!
//! 1. built-in defaults,
//! 2. a TOML, YAML or JSON file,
//! 3. `CUEBANK_*` environment variables (`CUEBANK_CUES__FILE=...`).

mod content;
pub mod error;

pub use crate::content::{
    CONFIG_FILE_NAME, ContentConfig, DiagnosticsMode, ENV_PREFIX, PackageConfig, default_config_file,
};
