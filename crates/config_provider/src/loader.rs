//! Configuration file discovery and loading (spec.md §6).

use std::path::{Path, PathBuf};

use nextver_core::Config;
use tracing::{debug, warn};

use crate::errors::{ConfigProviderError, ConfigProviderResult};
use crate::formats::FormatDetector;

/// The canonical keys a [`Config`] document may set at its root, used only
/// to warn about unrecognized keys — unknown keys are otherwise tolerated
/// (serde ignores them) per spec.md §6.
const KNOWN_ROOT_KEYS: &[&str] = &[
    "tag-prefix",
    "next-version",
    "base-version",
    "mode",
    "mainline-increment",
    "commit-message-convention",
    "cd-fallback-tag",
    "versioning-scheme",
    "branches",
    "variable-overrides",
];

/// Loads a [`Config`] by searching a repository root for a configuration
/// file, or by reading an explicit path.
pub struct ConfigLoader {
    repo_root: PathBuf,
}

impl ConfigLoader {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Candidate paths in spec.md §6 search order: `.github/GitVersion.yml`,
    /// `.github/<project>.yml`, `GitVersion.yml`, `<project>.yml`, where
    /// `<project>` is the repo root's directory name.
    fn candidates(&self) -> Vec<PathBuf> {
        let project = self
            .repo_root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("project");
        vec![
            self.repo_root.join(".github/GitVersion.yml"),
            self.repo_root.join(format!(".github/{project}.yml")),
            self.repo_root.join("GitVersion.yml"),
            self.repo_root.join(format!("{project}.yml")),
        ]
    }

    /// Finds the first candidate path that exists, or `None`. A 404 on
    /// every candidate is not an error (spec.md §7) — it just means
    /// defaults apply.
    pub fn find_config_file(&self) -> Option<PathBuf> {
        self.candidates().into_iter().find(|p| p.exists())
    }

    /// Loads the config from `explicit_path` if given, otherwise from
    /// auto-discovery; falls back to [`Config::default`] when nothing is
    /// found.
    pub fn load(&self, explicit_path: Option<&Path>) -> ConfigProviderResult<Config> {
        let path = match explicit_path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigProviderError::ConfigFileNotFound {
                        path: p.to_path_buf(),
                    });
                }
                Some(p.to_path_buf())
            }
            None => self.find_config_file(),
        };

        let Some(path) = path else {
            debug!("no configuration file found, using defaults");
            return Ok(Config::default());
        };

        self.load_from_path(&path)
    }

    fn load_from_path(&self, path: &Path) -> ConfigProviderResult<Config> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigProviderError::io(path.to_path_buf(), e))?;

        let format = FormatDetector::detect_from_path(path)?;
        warn_on_unknown_keys(path, &content, format);

        let config = format.parse(&content).map_err(|e| match e {
            ConfigProviderError::ParseError { reason, source, .. } => {
                ConfigProviderError::ParseError {
                    path: path.to_path_buf(),
                    reason,
                    source,
                }
            }
            other => other,
        })?;

        debug!(?path, "loaded configuration file");
        Ok(config)
    }
}

fn warn_on_unknown_keys(path: &Path, content: &str, format: crate::formats::ConfigFormat) {
    use crate::formats::ConfigFormat;

    let keys: Vec<String> = match format {
        ConfigFormat::Yaml => {
            let Ok(serde_yaml::Value::Mapping(map)) = serde_yaml::from_str(content) else {
                return;
            };
            map.keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect()
        }
        ConfigFormat::Toml => {
            let Ok(toml::Value::Table(table)) = toml::from_str(content) else {
                return;
            };
            table.keys().cloned().collect()
        }
    };

    for key in keys {
        if !KNOWN_ROOT_KEYS.contains(&key.as_str()) {
            warn!(?path, key, "unrecognized configuration key, ignoring");
        }
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
