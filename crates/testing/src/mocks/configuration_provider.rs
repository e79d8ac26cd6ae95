//! Mock implementation mirroring `nextver-config`'s [`ConfigLoader`] surface,
//! for testing CLI and core consumers without touching the filesystem.
//!
//! [`ConfigLoader`]: nextver_config::ConfigLoader

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use nextver_core::errors::{CoreError, CoreResult};
use nextver_core::Config;

use crate::mocks::{CallResult, MockState, SharedMockState};

/// In-memory stand-in for `ConfigLoader`: pre-register a [`Config`] per
/// candidate path (or a single default), then `load` it back the way the
/// real loader would.
#[derive(Debug, Clone)]
pub struct MockConfigurationProvider {
    state: SharedMockState,
    configs_by_path: HashMap<PathBuf, Config>,
    default_config: Config,
}

impl MockConfigurationProvider {
    /// A provider that always resolves to `Config::default()`.
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockState::new())),
            configs_by_path: HashMap::new(),
            default_config: Config::default(),
        }
    }

    /// Registers `config` to be returned for `path`.
    pub fn with_config(mut self, path: impl Into<PathBuf>, config: Config) -> Self {
        self.configs_by_path.insert(path.into(), config);
        self
    }

    /// Sets the config returned when no explicit path matches, in place of
    /// [`Config::default`].
    pub fn with_default(mut self, config: Config) -> Self {
        self.default_config = config;
        self
    }

    /// Makes every subsequent `load` call fail with `message`.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.write().await.fail_with = Some(message.into());
    }

    pub async fn call_count(&self) -> usize {
        self.state.read().await.call_count()
    }

    /// Mirrors [`nextver_config::ConfigLoader::load`]: an explicit path must
    /// be pre-registered or it is reported as an error; `None` resolves to
    /// the registered default.
    pub async fn load(&self, explicit_path: Option<&Path>) -> CoreResult<Config> {
        let method = "load";
        let params = format!("{explicit_path:?}");

        if let Some(message) = self.state.read().await.fail_with() {
            self.state
                .write()
                .await
                .record(method, &params, CallResult::Error(message.clone()));
            return Err(CoreError::config(message));
        }

        let result = match explicit_path {
            Some(path) => self.configs_by_path.get(path).cloned().ok_or_else(|| {
                CoreError::config(format!("no mock configuration registered for {path:?}"))
            }),
            None => Ok(self.default_config.clone()),
        };

        let call_result = match &result {
            Ok(_) => CallResult::Success,
            Err(e) => CallResult::Error(e.to_string()),
        };
        self.state.write().await.record(method, &params, call_result);
        result
    }
}

impl Default for MockConfigurationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "configuration_provider_tests.rs"]
mod tests;
