//! Converter settings for xgb2tmva
//!
//! The built-in values live in `defaults/xgb2tmva.default.toml`, compiled in
//! with `include_str!`. A `--config` file and command-line flags are layered
//! over them with [`Loader`], and the result is read into [`Xgb2TmvaConfig`].
//! [`ConvertConfig::to_options`] hands the conversion part to the library.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use xgb2tmva::ensemble::AnalysisType;
use xgb2tmva::ConvertOptions;

const DEFAULT_TOML: &str = include_str!("../defaults/xgb2tmva.default.toml");

/// Everything the `xgb2tmva` binary reads from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Xgb2TmvaConfig {
    pub convert: ConvertConfig,
    pub logging: LoggingConfig,
}

/// Conversion knobs, mirrored into [`ConvertOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub nan_substitution: bool,
    pub analysis_type: AnalysisType,
    pub creator: String,
}

impl ConvertConfig {
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions {
            nan_substitution: self.nan_substitution,
            analysis_type: self.analysis_type,
            creator: self.creator.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
}

/// Layers of TOML and single-key overrides, later layers winning.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Only the compiled-in defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Add a TOML file; `build` fails if it does not exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_file(path.as_ref(), true)
    }

    /// Add a TOML file that may be absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_file(path.as_ref(), false)
    }

    fn with_toml_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        self
    }

    /// Set one dotted key, e.g. `convert.nan_substitution`, over every file layer.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Xgb2TmvaConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The compiled-in configuration with nothing layered over it.
pub fn load_defaults() -> Result<Xgb2TmvaConfig, ConfigError> {
    Loader::new().build()
}
