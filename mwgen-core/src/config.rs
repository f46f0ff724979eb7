//! `mwgen.toml` configuration.
//!
//! Every key is optional; command-line flags take precedence over the file
//! and the file takes precedence over the built-in defaults.

use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::Deserialize;
use thiserror::Error;

use crate::utils::is_go_identifier;

/// File name looked up in the module directory.
pub const CONFIG_FILE_NAME: &str = "mwgen.toml";

/// Default output subdirectory, relative to the module directory.
pub const DEFAULT_OUTPUT: &str = "middleware";

/// Default layer tag attached to log events.
pub const DEFAULT_LAYER: &str = "service";

/// Default structured logger package, imported as `log`.
pub const DEFAULT_LOGGER_IMPORT: &str = "github.com/sirupsen/logrus";

/// Default tracing API package.
pub const DEFAULT_TRACER_IMPORT: &str = "go.opentelemetry.io/otel";

/// Parsed `mwgen.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output subdirectory for generated units.
    pub output: Option<PathBuf>,
    /// Package name of the generated units.
    pub package: Option<String>,
    /// Aspect label (service or tracer name).
    pub label: Option<String>,
    /// Layer tag attached to log events.
    pub layer: Option<String>,
    /// Import path of the package declaring the interface.
    pub import_path: Option<String>,
    /// Parse `_test.go` files as part of the module.
    pub include_tests: bool,
    /// Import path of the structured logger.
    pub logger_import: Option<String>,
    /// Import path of the tracing API.
    pub tracer_import: Option<String>,
}

impl Config {
    /// Open and parse a configuration file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Box<ConfigError>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            Box::new(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Load `mwgen.toml` from `dir` if it exists.
    pub fn discover(dir: impl AsRef<Path>) -> Result<Option<Self>, Box<ConfigError>> {
        let path = dir.as_ref().join(CONFIG_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        Self::open(&path).map(Some)
    }

    /// Parse configuration text, using `filename` in error reports.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self, Box<ConfigError>> {
        let config: Config = toml::from_str(content).map_err(|source| {
            Box::new(ConfigError::Parse {
                src: NamedSource::new(filename, content.to_string()),
                span: source.span().map(SourceSpan::from),
                source,
            })
        })?;
        config.validate(content, filename)?;
        Ok(config)
    }

    fn validate(&self, content: &str, filename: &str) -> Result<(), Box<ConfigError>> {
        let invalid = |key: &str, message: String| {
            Box::new(ConfigError::Invalid {
                src: NamedSource::new(filename, content.to_string()),
                span: find_key_span(content, key),
                message,
            })
        };

        if let Some(package) = &self.package {
            if !is_go_identifier(package) {
                return Err(invalid(
                    "package",
                    format!("'{}' is not a valid Go package name", package),
                ));
            }
        }
        for (key, value) in [
            ("label", &self.label),
            ("layer", &self.layer),
            ("import_path", &self.import_path),
            ("logger_import", &self.logger_import),
            ("tracer_import", &self.tracer_import),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(invalid(key, format!("'{}' must not be empty", key)));
            }
        }
        Ok(())
    }

    /// Output subdirectory, falling back to [`DEFAULT_OUTPUT`].
    pub fn output(&self) -> &Path {
        self.output
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_OUTPUT))
    }

    /// Layer tag, falling back to [`DEFAULT_LAYER`].
    pub fn layer(&self) -> &str {
        self.layer.as_deref().unwrap_or(DEFAULT_LAYER)
    }

    /// Logger import path, falling back to [`DEFAULT_LOGGER_IMPORT`].
    pub fn logger_import(&self) -> &str {
        self.logger_import.as_deref().unwrap_or(DEFAULT_LOGGER_IMPORT)
    }

    /// Tracer import path, falling back to [`DEFAULT_TRACER_IMPORT`].
    pub fn tracer_import(&self) -> &str {
        self.tracer_import.as_deref().unwrap_or(DEFAULT_TRACER_IMPORT)
    }
}

/// Span of `key = ...` at the start of a line, for error labels.
fn find_key_span(content: &str, key: &str) -> Option<SourceSpan> {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix(key) {
            if rest.trim_start().starts_with('=') {
                let start = offset + (line.len() - trimmed.len());
                return Some(SourceSpan::from(start..start + key.len()));
            }
        }
        offset += line.len();
    }
    None
}

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(mwgen::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse mwgen.toml")]
    #[diagnostic(
        code(mwgen::config::parse),
        help(
            "known keys are: output, package, label, layer, import_path, include_tests, logger_import, tracer_import"
        )
    )]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(mwgen::config::invalid))]
    Invalid {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },
}
