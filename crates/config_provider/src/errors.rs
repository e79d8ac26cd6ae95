//! Error types for configuration file discovery and loading.

use std::path::PathBuf;
use thiserror::Error;

pub type ConfigProviderResult<T> = Result<T, ConfigProviderError>;

#[derive(Error, Debug)]
pub enum ConfigProviderError {
    #[error("configuration file not found: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("unsupported configuration format '{format}' for {path}")]
    UnsupportedFormat { format: String, path: PathBuf },

    #[error("failed to parse configuration file {path}: {reason}")]
    ParseError {
        path: PathBuf,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] nextver_core::errors::CoreError),
}

impl ConfigProviderError {
    pub fn parse_error(path: PathBuf, reason: impl Into<String>) -> Self {
        Self::ParseError {
            path,
            reason: reason.into(),
            source: None,
        }
    }

    pub fn parse_error_with_source(
        path: PathBuf,
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ParseError {
            path,
            reason: reason.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn io(path: PathBuf, source: std::io::Error) -> Self {
        Self::Io { path, source }
    }
}

/// Bridges into [`nextver_core::errors::CoreError::Config`] at the crate
/// boundary the CLI consumes.
impl From<ConfigProviderError> for nextver_core::errors::CoreError {
    fn from(err: ConfigProviderError) -> Self {
        match err {
            ConfigProviderError::Core(core_err) => core_err,
            other => nextver_core::errors::CoreError::config(other.to_string()),
        }
    }
}
