//! The seven in-memory caches a single calculation's remote adapter owns
//! (spec.md §3): branch list, tag list, commit-by-sha, peeled-tag-by-sha,
//! merge-base-by-pair, commit-log-by-query, and resolved HEAD.
//!
//! Guarded by `tokio::sync::RwLock` the way
//! `FileConfigurationProvider::config_cache` is in the config-loading crate:
//! reads take a shared lock, writes take exclusive, and nothing is ever
//! invalidated within the lifetime of one adapter.

use std::collections::HashMap;

use nextver_core::repository::{Branch, Commit, Tag};
use tokio::sync::RwLock;

/// Key for a commit-log query: `(from, to, path_filter)`.
pub type CommitLogKey = (Option<String>, String, Option<String>);

/// Key for a merge-base query. Always stored sorted so
/// `find_merge_base(a, b)` and `find_merge_base(b, a)` share an entry.
pub type MergeBaseKey = (String, String);

#[derive(Default)]
pub struct RepoCache {
    head: RwLock<Option<Branch>>,
    branches: RwLock<Option<Vec<Branch>>>,
    tags: RwLock<Option<Vec<Tag>>>,
    commits: RwLock<HashMap<String, Commit>>,
    peeled_tags: RwLock<HashMap<String, String>>,
    merge_bases: RwLock<HashMap<MergeBaseKey, Option<String>>>,
    commit_logs: RwLock<HashMap<CommitLogKey, Vec<Commit>>>,
}

impl RepoCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_head(&self) -> Option<Branch> {
        self.head.read().await.clone()
    }

    pub async fn set_head(&self, branch: Branch) {
        *self.head.write().await = Some(branch);
    }

    pub async fn get_branches(&self) -> Option<Vec<Branch>> {
        self.branches.read().await.clone()
    }

    pub async fn set_branches(&self, branches: Vec<Branch>) {
        *self.branches.write().await = Some(branches);
    }

    pub async fn get_tags(&self) -> Option<Vec<Tag>> {
        self.tags.read().await.clone()
    }

    pub async fn set_tags(&self, tags: Vec<Tag>) {
        *self.tags.write().await = Some(tags);
    }

    pub async fn get_commit(&self, sha: &str) -> Option<Commit> {
        self.commits.read().await.get(sha).cloned()
    }

    pub async fn put_commit(&self, commit: Commit) {
        self.commits.write().await.insert(commit.sha.clone(), commit);
    }

    pub async fn get_peeled_tag(&self, tag_sha: &str) -> Option<String> {
        self.peeled_tags.read().await.get(tag_sha).cloned()
    }

    pub async fn put_peeled_tag(&self, tag_sha: &str, commit_sha: String) {
        self.peeled_tags
            .write()
            .await
            .insert(tag_sha.to_string(), commit_sha);
    }

    pub async fn get_merge_base(&self, a: &str, b: &str) -> Option<Option<String>> {
        self.merge_bases.read().await.get(&sorted_pair(a, b)).cloned()
    }

    pub async fn put_merge_base(&self, a: &str, b: &str, base: Option<String>) {
        self.merge_bases
            .write()
            .await
            .insert(sorted_pair(a, b), base);
    }

    pub async fn get_commit_log(&self, key: &CommitLogKey) -> Option<Vec<Commit>> {
        self.commit_logs.read().await.get(key).cloned()
    }

    pub async fn put_commit_log(&self, key: CommitLogKey, commits: Vec<Commit>) {
        self.commit_logs.write().await.insert(key, commits);
    }
}

fn sorted_pair(a: &str, b: &str) -> MergeBaseKey {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
