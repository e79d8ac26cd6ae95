//! Configuration format detection and (de)serialization.

use std::path::Path;

use nextver_core::Config;

use crate::errors::{ConfigProviderError, ConfigProviderResult};

/// Supported configuration formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
}

impl ConfigFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "yaml",
            ConfigFormat::Toml => "toml",
        }
    }

    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ConfigFormat::Yaml => &["yaml", "yml"],
            ConfigFormat::Toml => &["toml"],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Yaml => "YAML",
            ConfigFormat::Toml => "TOML",
        }
    }

    /// Parses `content`, tolerating unknown keys (spec.md §6: "unknown keys
    /// produce a parse warning and are ignored").
    pub fn parse(&self, content: &str) -> ConfigProviderResult<Config> {
        match self {
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                ConfigProviderError::parse_error_with_source(
                    std::path::PathBuf::new(),
                    format!("failed to parse YAML: {e}"),
                    e,
                )
            }),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| {
                ConfigProviderError::parse_error_with_source(
                    std::path::PathBuf::new(),
                    format!("failed to parse TOML: {e}"),
                    e,
                )
            }),
        }
    }

    pub fn serialize(&self, config: &Config) -> ConfigProviderResult<String> {
        match self {
            ConfigFormat::Yaml => serde_yaml::to_string(config).map_err(|e| {
                ConfigProviderError::parse_error_with_source(
                    std::path::PathBuf::new(),
                    format!("failed to serialize to YAML: {e}"),
                    e,
                )
            }),
            ConfigFormat::Toml => toml::to_string_pretty(config).map_err(|e| {
                ConfigProviderError::parse_error_with_source(
                    std::path::PathBuf::new(),
                    format!("failed to serialize to TOML: {e}"),
                    e,
                )
            }),
        }
    }
}

pub struct FormatDetector;

impl FormatDetector {
    pub fn detect_from_path(path: &Path) -> ConfigProviderResult<ConfigFormat> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(ConfigFormat::Yaml),
            Some("toml") => Ok(ConfigFormat::Toml),
            Some(ext) => Err(ConfigProviderError::UnsupportedFormat {
                format: ext.to_string(),
                path: path.to_path_buf(),
            }),
            None => Err(ConfigProviderError::UnsupportedFormat {
                format: "<none>".to_string(),
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn supported_formats() -> Vec<ConfigFormat> {
        vec![ConfigFormat::Yaml, ConfigFormat::Toml]
    }

    pub fn supported_extensions() -> Vec<&'static str> {
        Self::supported_formats()
            .iter()
            .flat_map(|f| f.extensions().iter().copied())
            .collect()
    }

    pub fn is_supported_extension(extension: &str) -> bool {
        let extension = extension.to_lowercase();
        Self::supported_extensions()
            .iter()
            .any(|&ext| ext == extension)
    }
}

#[cfg(test)]
#[path = "formats_tests.rs"]
mod tests;
