use thiserror::Error;

/// Errors that can occur while calculating a version.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The declarative configuration was malformed or internally inconsistent.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The repository port (local or remote adapter) failed to answer a query.
    #[error("repository error: {message}")]
    Repository {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A tag, config value, or CLI argument did not parse as a semantic version.
    #[error("invalid semver '{input}': {reason}")]
    InvalidSemver { input: String, reason: String },

    /// The caller-supplied target branch or commit does not exist in the repository.
    #[error("invalid reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },

    /// The requested output format is not recognized.
    #[error("invalid output format: {0}")]
    Output(String),

    /// Reading a configuration file from disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing a YAML configuration document failed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Parsing a TOML configuration document failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Parsing a JSON payload (output format, explain trace) failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn repository(message: impl Into<String>) -> Self {
        Self::Repository {
            message: message.into(),
            source: None,
        }
    }

    pub fn repository_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Repository {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn invalid_semver(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSemver {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_reference(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output(message.into())
    }

    /// True for errors that a CLI should report as a repository failure per spec §7,
    /// as opposed to a configuration or usage mistake.
    pub fn is_repository_error(&self) -> bool {
        matches!(self, Self::Repository { .. })
    }
}

/// Result type used throughout the calculation engine.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
