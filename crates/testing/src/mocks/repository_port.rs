//! Mock implementation of [`RepositoryPort`].
//!
//! Commits are stored as a plain graph (sha -> Commit) and walked the same
//! way a real adapter would: `commit_log` follows every parent edge,
//! `mainline_log` only the first. This makes the mock usable for exercising
//! the calculator's strategies, not just for trait-shape smoke tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use nextver_core::errors::{CoreError, CoreResult};
use nextver_core::repository::{Branch, Commit, PathFilter, ReferenceName, RepositoryPort, Tag};

use crate::mocks::{CallResult, MockState, SharedMockState};

/// Configurable, call-tracking mock of [`RepositoryPort`].
#[derive(Debug, Clone)]
pub struct MockRepositoryPort {
    state: SharedMockState,
    head: Branch,
    branches: Vec<Branch>,
    tags: Vec<Tag>,
    commits: HashMap<String, Commit>,
    uncommitted_changes: u32,
    max_commits: usize,
}

impl MockRepositoryPort {
    /// A single-commit repository on `main`, with no tags and a clean
    /// working tree.
    pub fn new() -> Self {
        let tip = Commit {
            sha: "0000000000000000000000000000000000000".to_string(),
            parents: vec![],
            when: chrono::Utc::now(),
            message: "chore: initial commit".to_string(),
        };
        let head = Branch {
            name: ReferenceName::new("refs/heads/main"),
            tip: tip.clone(),
            is_remote: false,
            is_detached: false,
        };

        let mut commits = HashMap::new();
        commits.insert(tip.sha.clone(), tip);

        Self {
            state: Arc::new(RwLock::new(MockState::new())),
            head: head.clone(),
            branches: vec![head],
            tags: vec![],
            commits,
            uncommitted_changes: 0,
            max_commits: 1000,
        }
    }

    /// Registers `commit` in the graph without placing it on any branch.
    /// Use [`Self::with_branch`] or [`Self::with_head`] to make it reachable.
    pub fn with_commit(mut self, commit: Commit) -> Self {
        self.commits.insert(commit.sha.clone(), commit);
        self
    }

    /// Sets the current branch, replacing the default `main`/initial-commit
    /// head. The branch's tip is registered in the commit graph.
    pub fn with_head(mut self, branch: Branch) -> Self {
        self.commits.insert(branch.tip.sha.clone(), branch.tip.clone());
        if let Some(existing) = self.branches.iter_mut().find(|b| b.name == branch.name) {
            *existing = branch.clone();
        } else {
            self.branches.push(branch.clone());
        }
        self.head = branch;
        self
    }

    /// Adds (or replaces) a branch, without changing the current head.
    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.commits.insert(branch.tip.sha.clone(), branch.tip.clone());
        if let Some(existing) = self.branches.iter_mut().find(|b| b.name == branch.name) {
            *existing = branch;
        } else {
            self.branches.push(branch);
        }
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_uncommitted_changes(mut self, count: u32) -> Self {
        self.uncommitted_changes = count;
        self
    }

    pub fn with_max_commits(mut self, max_commits: usize) -> Self {
        self.max_commits = max_commits;
        self
    }

    /// Makes every subsequent port call fail with `message`, to exercise
    /// repository-error propagation in callers.
    pub async fn fail_with(&self, message: impl Into<String>) {
        self.state.write().await.fail_with = Some(message.into());
    }

    pub async fn call_count(&self) -> usize {
        self.state.read().await.call_count()
    }

    async fn guard(&self, method: &str) -> CoreResult<()> {
        if let Some(message) = self.state.read().await.fail_with() {
            let error = CoreError::repository(message.clone());
            self.state
                .write()
                .await
                .record(method, "", CallResult::Error(message));
            return Err(error);
        }
        self.state.write().await.record(method, "", CallResult::Success);
        Ok(())
    }

    /// Ancestors of `sha` (inclusive), following either every parent edge or
    /// only the first.
    fn ancestors(&self, sha: &str, first_parent_only: bool) -> Vec<Commit> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(sha.to_string());

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            let Some(commit) = self.commits.get(&next) else {
                continue;
            };
            out.push(commit.clone());

            if first_parent_only {
                if let Some(parent) = commit.first_parent() {
                    queue.push_back(parent.to_string());
                }
            } else {
                for parent in &commit.parents {
                    queue.push_back(parent.clone());
                }
            }
        }

        out.sort_by(|a, b| b.when.cmp(&a.when));
        out
    }

    fn log(&self, from: Option<&str>, to: &str, first_parent_only: bool) -> Vec<Commit> {
        let boundary: HashSet<String> = from
            .map(|sha| self.ancestors(sha, first_parent_only).into_iter().map(|c| c.sha).collect())
            .unwrap_or_default();

        self.ancestors(to, first_parent_only)
            .into_iter()
            .filter(|c| !boundary.contains(&c.sha))
            .take(self.max_commits)
            .collect()
    }
}

impl Default for MockRepositoryPort {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryPort for MockRepositoryPort {
    async fn head(&self) -> CoreResult<Branch> {
        self.guard("head").await?;
        Ok(self.head.clone())
    }

    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        self.guard("branches").await?;
        Ok(self.branches.clone())
    }

    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        self.guard("tags").await?;
        Ok(self.tags.clone())
    }

    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        self.guard("commit").await?;
        self.commits
            .get(sha)
            .cloned()
            .ok_or_else(|| CoreError::invalid_reference(sha, "no such commit in mock repository"))
    }

    async fn commit_log(
        &self,
        from: Option<&str>,
        to: &str,
        _path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        self.guard("commit_log").await?;
        Ok(self.log(from, to, false))
    }

    async fn mainline_log(
        &self,
        from: Option<&str>,
        to: &str,
        _path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        self.guard("mainline_log").await?;
        Ok(self.log(from, to, true))
    }

    async fn commits_prior_to(
        &self,
        cutoff_time: chrono::DateTime<chrono::Utc>,
        branch: &str,
    ) -> CoreResult<Vec<Commit>> {
        self.guard("commits_prior_to").await?;
        let Some(tip) = self.branches.iter().find(|b| b.name.friendly() == branch) else {
            return Err(CoreError::invalid_reference(branch, "no such branch in mock repository"));
        };
        Ok(self
            .ancestors(&tip.tip.sha, false)
            .into_iter()
            .filter(|c| c.when < cutoff_time)
            .collect())
    }

    async fn find_merge_base(&self, a: &str, b: &str) -> CoreResult<Option<String>> {
        self.guard("find_merge_base").await?;
        let ancestors_a: HashSet<String> = self.ancestors(a, false).into_iter().map(|c| c.sha).collect();
        Ok(self
            .ancestors(b, false)
            .into_iter()
            .find(|c| ancestors_a.contains(&c.sha))
            .map(|c| c.sha))
    }

    async fn branches_containing(&self, sha: &str) -> CoreResult<Vec<Branch>> {
        self.guard("branches_containing").await?;
        Ok(self
            .branches
            .iter()
            .filter(|b| self.ancestors(&b.tip.sha, false).iter().any(|c| c.sha == sha))
            .cloned()
            .collect())
    }

    async fn uncommitted_changes(&self) -> CoreResult<u32> {
        self.guard("uncommitted_changes").await?;
        Ok(self.uncommitted_changes)
    }

    async fn peel_tag(&self, tag: &Tag) -> CoreResult<String> {
        self.guard("peel_tag").await?;
        Ok(tag.target_sha.clone())
    }

    fn max_commits(&self) -> usize {
        self.max_commits
    }
}

#[cfg(test)]
#[path = "repository_port_tests.rs"]
mod tests;
