//! Builder for [`Tag`] test fixtures.

use nextver_core::repository::{ReferenceName, Tag};

use crate::builders::{helpers, TestDataBuilder};

/// Builds a [`Tag`], defaulting to `v0.1.0` pointing at a random sha.
#[derive(Debug, Clone)]
pub struct TagBuilder {
    name: String,
    target_sha: String,
}

impl TagBuilder {
    pub fn new() -> Self {
        Self {
            name: "v0.1.0".to_string(),
            target_sha: helpers::generate_git_sha(),
        }
    }

    /// Sets the friendly tag name, e.g. `"v1.2.3"` or `"release-4.0.0"`.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_target(mut self, sha: impl Into<String>) -> Self {
        self.target_sha = sha.into();
        self
    }
}

impl Default for TagBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataBuilder<Tag> for TagBuilder {
    fn build(self) -> Tag {
        Tag {
            name: ReferenceName::new(format!("refs/tags/{}", self.name)),
            target_sha: self.target_sha,
        }
    }

    fn reset(self) -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tag_builder_tests.rs"]
mod tests;
