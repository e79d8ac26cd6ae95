//! Builder for [`Branch`] test fixtures.

use nextver_core::repository::{Branch, Commit, ReferenceName};

use crate::builders::{commit_builder::CommitBuilder, TestDataBuilder};

/// Builds a [`Branch`], defaulting to a local `main` pointing at a freshly
/// built commit.
#[derive(Debug, Clone)]
pub struct BranchBuilder {
    name: String,
    tip: Commit,
    is_remote: bool,
    is_detached: bool,
}

impl BranchBuilder {
    pub fn new() -> Self {
        Self {
            name: "main".to_string(),
            tip: CommitBuilder::new().build(),
            is_remote: false,
            is_detached: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_tip(mut self, tip: Commit) -> Self {
        self.tip = tip;
        self
    }

    pub fn remote(mut self) -> Self {
        self.is_remote = true;
        self
    }

    pub fn detached(mut self) -> Self {
        self.is_detached = true;
        self
    }
}

impl Default for BranchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataBuilder<Branch> for BranchBuilder {
    fn build(self) -> Branch {
        Branch {
            name: ReferenceName::new(format!("refs/heads/{}", self.name)),
            tip: self.tip,
            is_remote: self.is_remote,
            is_detached: self.is_detached,
        }
    }

    fn reset(self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "branch_builder_tests.rs"]
mod tests;
