use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "cuebank.toml";
/// Prefix of environment variable overrides; nested keys are split on `__`.
pub const ENV_PREFIX: &str = "CUEBANK_";

/// How content absence is reported at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsMode {
    /// Missing content is handled quietly.
    #[default]
    Silent,
    /// Each distinct missing cue is logged once.
    Developer,
}

/// Where one package lives and which magic header it must start with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageConfig {
    /// File name, relative to [`ContentConfig::content_dir`].
    pub file: PathBuf,
    /// Exact header bytes. Supplied by the game; there is no usable default.
    #[serde(default)]
    pub header: Vec<u8>,
}

impl PackageConfig {
    pub fn new(file: impl Into<PathBuf>, header: impl Into<Vec<u8>>) -> Self {
        Self {
            file: file.into(),
            header: header.into(),
        }
    }

    fn named(file: &str) -> Self {
        Self::new(file, Vec::new())
    }
}

/// Everything needed to locate and validate a content set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentConfig {
    pub content_dir: PathBuf,
    /// Number of language tables in the strings package.
    pub language_count: u8,
    pub cues: PackageConfig,
    pub sounds: PackageConfig,
    pub strings: PackageConfig,
    pub diagnostics: DiagnosticsMode,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            language_count: 1,
            cues: PackageConfig::named("cues.rcru"),
            sounds: PackageConfig::named("sounds.rcru"),
            strings: PackageConfig::named("strings.rcru"),
            diagnostics: DiagnosticsMode::default(),
        }
    }
}

/// The running executable's directory; content ships next to the game.
fn default_content_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// `cuebank.toml` in the platform configuration directory, if there is one.
pub fn default_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cuebank").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl ContentConfig {
    /// Layered sources, lowest priority first: defaults, the configuration
    /// file (if any), then `CUEBANK_*` environment variables.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = match file.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(file)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(file)),
                Some("json") => figment.merge(Json::file(file)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(file.to_path_buf())),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load from an explicit file, which must exist.
    pub fn load(file: impl AsRef<Path>) -> Result<Self> {
        let file = file.as_ref();
        if !file.is_file() {
            exn::bail!(ErrorKind::NotFound(file.to_path_buf()));
        }
        Self::extract(Self::figment(Some(file))?)
    }

    /// Load from the platform configuration file when present, otherwise
    /// from defaults and the environment alone.
    pub fn discover() -> Result<Self> {
        let file = default_config_file().filter(|file| file.is_file());
        match &file {
            Some(file) => tracing::debug!(file = %file.display(), "using configuration file"),
            None => tracing::debug!("no configuration file, using defaults"),
        }
        Self::extract(Self::figment(file.as_deref())?)
    }

    fn extract(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Extract)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the loaders can't work with.
    pub fn validate(&self) -> Result<()> {
        if self.language_count == 0 {
            exn::bail!(ErrorKind::Invalid("language_count"));
        }
        for (field, package) in [("cues", &self.cues), ("sounds", &self.sounds), ("strings", &self.strings)] {
            if package.file.as_os_str().is_empty() {
                exn::bail!(ErrorKind::Invalid(field));
            }
            if package.header.is_empty() {
                tracing::warn!(package = field, "package header is empty");
                exn::bail!(ErrorKind::Invalid(field));
            }
        }
        Ok(())
    }

    /// Full path of a package file.
    pub fn path_of(&self, package: &PackageConfig) -> PathBuf {
        self.content_dir.join(&package.file)
    }
}
