//! Engine configuration
//!
//! Settings come from TOML layers applied in order, later layers winning key
//! by key:
//!
//! 1. `defaults/lesson.default.toml`, compiled into the crate, so every key
//!    always has a value and [`TimingConfig::default`] matches what ships;
//! 2. files added with [`ConfigLoader::layer`] or [`ConfigLoader::layer_if_present`];
//! 3. single keys set with [`ConfigLoader::set`].
//!
//! [`ConfigLoader::load`] merges the layers, deserializes them into
//! [`EngineConfig`] and rejects values the engine cannot run with.

use crate::lesson::timeline::TimingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/lesson.default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub timing: TimingConfig,
    pub library: LibraryConfig,
}

/// Location of lesson scripts for the directory-backed source.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryConfig {
    pub dir: PathBuf,
    /// Script file extension, without the leading dot.
    pub extension: String,
}

impl EngineConfig {
    /// Check the values that would otherwise misbehave silently at playback.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        let text = &self.timing.text;
        if text.per_char == 0 {
            return Err(ConfigLoadError::invalid(
                "timing.text.per_char",
                "must be greater than zero",
            ));
        }
        if text.min > text.max {
            return Err(ConfigLoadError::invalid(
                "timing.text.min",
                format!("{} is above timing.text.max ({})", text.min, text.max),
            ));
        }
        if self.library.extension.is_empty() {
            return Err(ConfigLoadError::invalid(
                "library.extension",
                "must not be empty",
            ));
        }
        Ok(())
    }
}

/// Why a configuration could not be produced.
#[derive(Debug)]
pub enum ConfigLoadError {
    /// A layer was missing or unreadable, or a value had the wrong type.
    Source(config::ConfigError),
    /// Every layer loaded but the merged value is unusable.
    Invalid { key: &'static str, reason: String },
}

impl ConfigLoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        ConfigLoadError::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigLoadError::Source(err) => write!(f, "{}", err),
            ConfigLoadError::Invalid { key, reason } => write!(f, "invalid {}: {}", key, reason),
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigLoadError::Source(err) => Some(err),
            ConfigLoadError::Invalid { .. } => None,
        }
    }
}

impl From<config::ConfigError> for ConfigLoadError {
    fn from(err: config::ConfigError) -> Self {
        ConfigLoadError::Source(err)
    }
}

/// Collects configuration layers on top of the embedded defaults.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    layers: Vec<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder()
                .add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml)),
            layers: Vec::new(),
        }
    }

    /// Add a TOML file. [`load`](Self::load) fails if it does not exist.
    pub fn layer(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Add a TOML file only if it exists, e.g. a per-user settings file.
    pub fn layer_if_present(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), false)
    }

    /// Set one dotted key, e.g. `timing.text.per_char`, above every file layer.
    pub fn set<V>(mut self, key: &str, value: V) -> Result<Self, ConfigLoadError>
    where
        V: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Files layered so far, in the order they apply.
    pub fn layers(&self) -> &[PathBuf] {
        &self.layers
    }

    /// Merge every layer into a validated [`EngineConfig`].
    ///
    /// A leading dot on `library.extension` is dropped, so `".md"` and `"md"`
    /// name the same files.
    pub fn load(self) -> Result<EngineConfig, ConfigLoadError> {
        let mut config: EngineConfig = self.builder.build()?.try_deserialize()?;
        if let Some(bare) = config.library.extension.strip_prefix('.') {
            config.library.extension = bare.to_string();
        }
        config.validate()?;
        tracing::debug!(layers = self.layers.len(), "configuration loaded");
        Ok(config)
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self.builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(required),
        );
        self.layers.push(path.to_path_buf());
        self
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// The embedded defaults alone.
pub fn load_defaults() -> Result<EngineConfig, ConfigLoadError> {
    ConfigLoader::new().load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        write!(file, "{}", contents).expect("write config");
        file
    }

    #[test]
    fn embedded_defaults_match_code_defaults() {
        let config = load_defaults().expect("defaults to load");
        assert_eq!(config.timing, TimingConfig::default());
        assert_eq!(config.library.dir, PathBuf::from("lessons"));
        assert_eq!(config.library.extension, "md");
    }

    #[test]
    fn single_keys_override_defaults() {
        let config = ConfigLoader::new()
            .set("timing.quote.gap", 300)
            .expect("key to apply")
            .load()
            .expect("config to load");
        assert_eq!(config.timing.quote.gap, 300);
        assert_eq!(config.timing.quote.duration, 1200);
    }

    #[test]
    fn later_layers_win() {
        let first = toml_file("[timing.text]\nper_char = 80\n\n[library]\ndir = \"scripts\"\n");
        let second = toml_file("[timing.text]\nper_char = 60\n");

        let loader = ConfigLoader::new().layer(first.path()).layer(second.path());
        assert_eq!(loader.layers().len(), 2);
        let config = loader.load().expect("config to load");
        assert_eq!(config.timing.text.per_char, 60);
        assert_eq!(config.timing.text.max, 2000);
        assert_eq!(config.library.dir, PathBuf::from("scripts"));
    }

    #[test]
    fn absent_optional_layer_is_skipped() {
        let config = ConfigLoader::new()
            .layer_if_present("/definitely/not/here.toml")
            .load()
            .expect("config to load");
        assert_eq!(config.timing, TimingConfig::default());
    }

    #[test]
    fn absent_required_layer_fails() {
        let err = ConfigLoader::new()
            .layer("/definitely/not/here.toml")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::Source(_)));
    }

    #[test]
    fn wrong_type_is_a_source_error() {
        let file = toml_file("[timing.quote]\nduration = \"slow\"\n");
        let err = ConfigLoader::new().layer(file.path()).load().unwrap_err();
        assert!(matches!(err, ConfigLoadError::Source(_)));
    }

    #[test]
    fn inverted_text_clamp_is_rejected() {
        let file = toml_file("[timing.text]\nmin = 3000\n");
        let err = ConfigLoader::new().layer(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid { key: "timing.text.min", .. }
        ));
        assert_eq!(
            err.to_string(),
            "invalid timing.text.min: 3000 is above timing.text.max (2000)"
        );
    }

    #[test]
    fn zero_per_char_is_rejected() {
        let err = ConfigLoader::new()
            .set("timing.text.per_char", 0)
            .expect("key to apply")
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid { key: "timing.text.per_char", .. }
        ));
    }

    #[test]
    fn extension_dot_is_dropped() {
        let config = ConfigLoader::new()
            .set("library.extension", ".lesson")
            .expect("key to apply")
            .load()
            .expect("config to load");
        assert_eq!(config.library.extension, "lesson");

        let err = ConfigLoader::new()
            .set("library.extension", "")
            .expect("key to apply")
            .load()
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::Invalid { key: "library.extension", .. }
        ));
    }
}
