use thiserror::Error;

/// Errors that can occur in CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// Calculation engine errors
    #[error("calculation failed: {source}")]
    Core {
        #[from]
        source: nextver_core::CoreError,
    },

    /// GitHub remote adapter errors
    #[error("GitHub operation failed: {source}")]
    GitHub {
        #[from]
        source: nextver_github::Error,
    },

    /// Configuration file loading errors
    #[error("configuration error: {source}")]
    Config {
        #[from]
        source: nextver_config::ConfigProviderError,
    },

    /// File I/O errors
    #[error("file operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// JSON serialization errors (`--output json`, `--show-config`)
    #[error("JSON serialization failed: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// Invalid command arguments
    #[error("invalid argument: {argument} - {message}")]
    InvalidArgument { argument: String, message: String },

    /// A required credential or value was missing
    #[error("missing dependency: {dependency} - {message}")]
    MissingDependency { dependency: String, message: String },
}

impl CliError {
    /// Create a new invalid argument error
    pub fn invalid_argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create a new missing dependency error
    pub fn missing_dependency(dependency: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MissingDependency {
            dependency: dependency.into(),
            message: message.into(),
        }
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;
