//! Builder for [`Config`] test fixtures.

use nextver_core::config::{BranchConfig, CommitMessageConvention, MainlineIncrement, Mode};
use nextver_core::Config;

use crate::builders::TestDataBuilder;

/// Builds a [`Config`], starting from [`Config::default`] and layering
/// overrides on top.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_tag_prefix(mut self, tag_prefix: impl Into<String>) -> Self {
        self.config.tag_prefix = Some(tag_prefix.into());
        self
    }

    pub fn with_next_version(mut self, version: impl Into<String>) -> Self {
        self.config.next_version = Some(version.into());
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.config.mode = Some(mode);
        self
    }

    pub fn with_mainline_increment(mut self, increment: MainlineIncrement) -> Self {
        self.config.mainline_increment = Some(increment);
        self
    }

    pub fn with_commit_message_convention(mut self, convention: CommitMessageConvention) -> Self {
        self.config.commit_message_convention = Some(convention);
        self
    }

    /// Inserts (or replaces) the branch-pattern override for `name`.
    pub fn with_branch(mut self, name: impl Into<String>, branch: BranchConfig) -> Self {
        self.config.branches.insert(name.into(), branch);
        self
    }

    /// Remaps a canonical output variable name, e.g. `"SemVer"` -> `"Version"`.
    pub fn with_variable_override(mut self, canonical: impl Into<String>, renamed: impl Into<String>) -> Self {
        self.config
            .variable_overrides
            .insert(canonical.into(), renamed.into());
        self
    }
}

impl TestDataBuilder<Config> for ConfigBuilder {
    fn build(self) -> Config {
        self.config
    }

    fn reset(self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "config_builder_tests.rs"]
mod tests;
