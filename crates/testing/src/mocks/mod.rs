//! Mock implementations of the core ports.
//!
//! All mocks support deterministic configuration, call tracking, and
//! on-demand failure simulation, in the spirit of the teacher crate's mocks
//! module this was distilled from.

use std::sync::Arc;
use tokio::sync::RwLock;

pub mod configuration_provider;
pub mod repository_port;

pub use configuration_provider::MockConfigurationProvider;
pub use repository_port::MockRepositoryPort;

/// Result of a mock method call, recorded for later verification.
#[derive(Debug, Clone)]
pub enum CallResult {
    Success,
    Error(String),
}

/// A single recorded call.
#[derive(Debug, Clone)]
pub struct CallInfo {
    pub method: String,
    pub parameters: String,
    pub result: CallResult,
}

/// Shared call-tracking state, cloned cheaply between a mock and its clones.
#[derive(Debug, Default)]
pub struct MockState {
    call_history: Vec<CallInfo>,
    /// When set, every subsequent call returns this message as an error
    /// instead of the mock's configured success response.
    fail_with: Option<String>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, method: &str, parameters: impl Into<String>, result: CallResult) {
        self.call_history.push(CallInfo {
            method: method.to_string(),
            parameters: parameters.into(),
            result,
        });
    }

    pub fn call_history(&self) -> &[CallInfo] {
        &self.call_history
    }

    pub fn call_count(&self) -> usize {
        self.call_history.len()
    }

    pub fn fail_with(&self) -> Option<String> {
        self.fail_with.clone()
    }
}

pub type SharedMockState = Arc<RwLock<MockState>>;
