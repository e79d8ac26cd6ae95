//! Builder for [`Commit`] test fixtures.

use chrono::{DateTime, Utc};

use nextver_core::repository::Commit;

use crate::builders::{helpers, TestDataBuilder};

/// Builds a [`Commit`], defaulting to a plausible, unparented commit.
#[derive(Debug, Clone)]
pub struct CommitBuilder {
    sha: String,
    message: String,
    parents: Vec<String>,
    when: DateTime<Utc>,
}

impl CommitBuilder {
    pub fn new() -> Self {
        Self {
            sha: helpers::generate_git_sha(),
            message: "feat: add new feature".to_string(),
            parents: vec![],
            when: helpers::generate_recent_timestamp(),
        }
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = sha.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Builds a Conventional Commits-style message, e.g. `"feat: add parser"`.
    pub fn with_conventional_message(mut self, commit_type: &str, description: &str) -> Self {
        self.message = format!("{commit_type}: {description}");
        self
    }

    /// Appends a `BREAKING CHANGE:` footer to the current message.
    pub fn with_breaking_change(mut self, description: &str) -> Self {
        self.message = format!("{}\n\nBREAKING CHANGE: {description}", self.message);
        self
    }

    pub fn with_parent(mut self, sha: impl Into<String>) -> Self {
        self.parents.push(sha.into());
        self
    }

    pub fn with_parents(mut self, shas: impl IntoIterator<Item = String>) -> Self {
        self.parents = shas.into_iter().collect();
        self
    }

    pub fn with_when(mut self, when: DateTime<Utc>) -> Self {
        self.when = when;
        self
    }
}

impl Default for CommitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataBuilder<Commit> for CommitBuilder {
    fn build(self) -> Commit {
        Commit {
            sha: self.sha,
            parents: self.parents,
            when: self.when,
            message: self.message,
        }
    }

    fn reset(self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "commit_builder_tests.rs"]
mod tests;
