//! Repository port: the read-only abstraction over commit history that both
//! the local (on-disk) and remote (forge HTTP API) adapters implement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreResult;
use crate::version::SemanticVersion;

/// A reference name in both canonical (`refs/heads/foo`) and friendly (`foo`)
/// form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceName {
    canonical: String,
}

impl ReferenceName {
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
        }
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Strips a leading `refs/heads/` or `refs/tags/`, if present.
    pub fn friendly(&self) -> &str {
        self.canonical
            .strip_prefix("refs/heads/")
            .or_else(|| self.canonical.strip_prefix("refs/tags/"))
            .unwrap_or(&self.canonical)
    }
}

impl fmt::Display for ReferenceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.friendly())
    }
}

/// A single commit. `parents[0]`, when present, is the mainline parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub sha: String,
    pub parents: Vec<String>,
    pub when: chrono::DateTime<chrono::Utc>,
    pub message: String,
}

impl Commit {
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(|s| s.as_str())
    }
}

/// A branch: current tip commit plus remote/detached flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    pub name: ReferenceName,
    pub tip: Commit,
    pub is_remote: bool,
    pub is_detached: bool,
}

/// A tag, peelable to a commit sha.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: ReferenceName,
    pub target_sha: String,
}

/// A tag whose peeled payload parsed as a semantic version, produced by
/// filtering [`Tag`]s against the configured `tag_prefix`.
#[derive(Debug, Clone)]
pub struct VersionTag {
    pub tag: Tag,
    pub version: SemanticVersion,
    pub commit_sha: String,
}

/// A single path to restrict history walks to. Only one is honored per
/// request; callers passing more than one get the first, silently.
pub type PathFilter = str;

/// Read-only abstraction over a repository's commit, branch, and tag graph.
///
/// Implementations must provide snapshot-consistent reads within a single
/// calculation (repeated calls return the same answer), which they achieve
/// through caching rather than locking the underlying store.
#[async_trait]
pub trait RepositoryPort: Send + Sync {
    /// The current branch. On a detached HEAD, `name` is `"HEAD"` and
    /// `is_detached` is `true`.
    async fn head(&self) -> CoreResult<Branch>;

    /// All local branches.
    async fn branches(&self) -> CoreResult<Vec<Branch>>;

    /// All tags, not filtered by the version-tag prefix.
    async fn tags(&self) -> CoreResult<Vec<Tag>>;

    /// The commit identified by `sha`.
    async fn commit(&self, sha: &str) -> CoreResult<Commit>;

    /// Commits reachable from `to` and not reachable from `from`, exclusive
    /// of `from`, newest-first. When `from` is `None`, returns the full
    /// history bounded by [`RepositoryPort::max_commits`].
    async fn commit_log(
        &self,
        from: Option<&str>,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>>;

    /// First-parent-only subset of [`RepositoryPort::commit_log`].
    async fn mainline_log(
        &self,
        from: Option<&str>,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>>;

    /// Commits on `branch` strictly before `cutoff_time`.
    async fn commits_prior_to(
        &self,
        cutoff_time: chrono::DateTime<chrono::Utc>,
        branch: &str,
    ) -> CoreResult<Vec<Commit>>;

    /// The best common ancestor of `a` and `b`, or `None` if they share no
    /// history.
    async fn find_merge_base(&self, a: &str, b: &str) -> CoreResult<Option<String>>;

    /// All branches whose history contains `sha`.
    async fn branches_containing(&self, sha: &str) -> CoreResult<Vec<Branch>>;

    /// Count of modified, staged, and untracked entries. Remote adapters
    /// that cannot see a working tree may always report 0.
    async fn uncommitted_changes(&self) -> CoreResult<u32>;

    /// Resolves a tag to the commit sha it ultimately points at (identity
    /// for lightweight tags, follows the tag object for annotated ones).
    async fn peel_tag(&self, tag: &Tag) -> CoreResult<String>;

    /// Hard cap on commits scanned by an unbounded [`RepositoryPort::commit_log`]
    /// or [`RepositoryPort::mainline_log`] walk.
    fn max_commits(&self) -> usize {
        1000
    }
}

/// Filters `tags` down to those matching `tag_prefix` whose peeled target
/// parses as a [`SemanticVersion`]. `tag_prefix` is a regex anchored to the
/// start of the friendly tag name (default `^v?`).
pub async fn version_tags(
    repo: &dyn RepositoryPort,
    tags: &[Tag],
    tag_prefix: &regex::Regex,
) -> CoreResult<Vec<VersionTag>> {
    let mut out = Vec::new();
    for tag in tags {
        let friendly = tag.name.friendly();
        let Some(m) = tag_prefix.find(friendly) else {
            continue;
        };
        if m.start() != 0 {
            continue;
        }
        let rest = &friendly[m.end()..];
        let Ok(version) = SemanticVersion::parse(rest) else {
            continue;
        };
        let commit_sha = repo.peel_tag(tag).await?;
        out.push(VersionTag {
            tag: tag.clone(),
            version,
            commit_sha,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
