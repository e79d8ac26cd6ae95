//! Local on-disk [`RepositoryPort`] adapter backed by `git2`.
//!
//! `git2` is synchronous; every call is bridged onto a blocking thread via
//! [`tokio::task::spawn_blocking`] so the adapter can still implement the
//! async [`RepositoryPort`] trait without holding the executor hostage on a
//! large history walk.

pub mod errors;

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use git2::{Repository, Sort, StatusOptions};
use tracing::instrument;

use nextver_core::errors::{CoreError, CoreResult};
use nextver_core::repository::{Branch, Commit, PathFilter, ReferenceName, RepositoryPort, Tag};

use errors::Error as GitError;

/// A [`RepositoryPort`] over a repository checked out on local disk.
pub struct LocalRepositoryAdapter {
    path: PathBuf,
}

impl LocalRepositoryAdapter {
    /// Opens the repository at `path` (or any of its ancestors, per git2's
    /// usual discovery rules) to fail fast on a bad path rather than on the
    /// first query.
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        Repository::open(&path).map_err(GitError::Git).map_err(to_core_error)?;
        Ok(Self { path })
    }

    async fn run_blocking<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&Repository) -> Result<T, git2::Error> + Send + 'static,
        T: Send + 'static,
    {
        let path = self.path.clone();
        let joined = tokio::task::spawn_blocking(move || {
            let repo = Repository::open(&path)?;
            f(&repo)
        })
        .await;
        match joined {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(git_err)) => Err(to_core_error(GitError::Git(git_err))),
            Err(join_err) => Err(to_core_error(GitError::Join(join_err))),
        }
    }
}

#[async_trait]
impl RepositoryPort for LocalRepositoryAdapter {
    #[instrument(skip(self))]
    async fn head(&self) -> CoreResult<Branch> {
        self.run_blocking(|repo| {
            let head_ref = repo.head()?;
            let is_detached = repo.head_detached()?;
            let commit = head_ref.peel_to_commit()?;
            let canonical = if is_detached {
                "HEAD".to_string()
            } else {
                format!("refs/heads/{}", head_ref.shorthand().unwrap_or("HEAD"))
            };
            Ok(Branch {
                name: ReferenceName::new(canonical),
                tip: commit_from_git2(&commit),
                is_remote: false,
                is_detached,
            })
        })
        .await
    }

    #[instrument(skip(self))]
    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        self.run_blocking(|repo| {
            let mut out = Vec::new();
            for item in repo.branches(Some(git2::BranchType::Local))? {
                let (branch, _) = item?;
                let name = branch.name()?.unwrap_or("").to_string();
                let commit = branch.get().peel_to_commit()?;
                out.push(Branch {
                    name: ReferenceName::new(format!("refs/heads/{name}")),
                    tip: commit_from_git2(&commit),
                    is_remote: false,
                    is_detached: false,
                });
            }
            Ok(out)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        self.run_blocking(|repo| {
            let mut out = Vec::new();
            for name in repo.tag_names(None)?.iter().flatten() {
                let reference = repo.find_reference(&format!("refs/tags/{name}"))?;
                let commit = reference.peel_to_commit()?;
                out.push(Tag {
                    name: ReferenceName::new(format!("refs/tags/{name}")),
                    target_sha: commit.id().to_string(),
                });
            }
            Ok(out)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        let sha = sha.to_string();
        self.run_blocking(move |repo| {
            let commit = repo.find_commit(git2::Oid::from_str(&sha)?)?;
            Ok(commit_from_git2(&commit))
        })
        .await
    }

    #[instrument(skip(self, path_filter))]
    async fn commit_log(
        &self,
        from: Option<&str>,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        let from = from.map(str::to_string);
        let to = to.to_string();
        let path_filter = path_filter.map(str::to_string);
        let max = self.max_commits();
        self.run_blocking(move |repo| {
            walk_commits(repo, &to, from.as_deref(), path_filter.as_deref(), max, false)
        })
        .await
    }

    #[instrument(skip(self, path_filter))]
    async fn mainline_log(
        &self,
        from: Option<&str>,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        let from = from.map(str::to_string);
        let to = to.to_string();
        let path_filter = path_filter.map(str::to_string);
        let max = self.max_commits();
        self.run_blocking(move |repo| {
            walk_commits(repo, &to, from.as_deref(), path_filter.as_deref(), max, true)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn commits_prior_to(
        &self,
        cutoff_time: DateTime<Utc>,
        branch: &str,
    ) -> CoreResult<Vec<Commit>> {
        let branch = branch.to_string();
        let max = self.max_commits();
        self.run_blocking(move |repo| {
            let reference = repo
                .find_reference(&format!("refs/heads/{branch}"))
                .or_else(|_| repo.find_reference(&branch))?;
            let start = reference.peel_to_commit()?;
            let mut walk = repo.revwalk()?;
            walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
            walk.push(start.id())?;
            let mut out = Vec::new();
            for oid in walk {
                let commit = repo.find_commit(oid?)?;
                if let Some(when) = Utc.timestamp_opt(commit.time().seconds(), 0).single() {
                    if when < cutoff_time {
                        out.push(commit_from_git2(&commit));
                    }
                }
                if out.len() >= max {
                    break;
                }
            }
            Ok(out)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_merge_base(&self, a: &str, b: &str) -> CoreResult<Option<String>> {
        let a = a.to_string();
        let b = b.to_string();
        self.run_blocking(move |repo| {
            let oid_a = git2::Oid::from_str(&a)?;
            let oid_b = git2::Oid::from_str(&b)?;
            match repo.merge_base(oid_a, oid_b) {
                Ok(oid) => Ok(Some(oid.to_string())),
                Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
    }

    #[instrument(skip(self))]
    async fn branches_containing(&self, sha: &str) -> CoreResult<Vec<Branch>> {
        let sha = sha.to_string();
        self.run_blocking(move |repo| {
            let target = git2::Oid::from_str(&sha)?;
            let mut out = Vec::new();
            for item in repo.branches(Some(git2::BranchType::Local))? {
                let (branch, _) = item?;
                let tip = branch.get().peel_to_commit()?;
                if tip.id() == target || repo.graph_descendant_of(tip.id(), target)? {
                    let name = branch.name()?.unwrap_or("").to_string();
                    out.push(Branch {
                        name: ReferenceName::new(format!("refs/heads/{name}")),
                        tip: commit_from_git2(&tip),
                        is_remote: false,
                        is_detached: false,
                    });
                }
            }
            Ok(out)
        })
        .await
    }

    async fn uncommitted_changes(&self) -> CoreResult<u32> {
        self.run_blocking(|repo| {
            let mut opts = StatusOptions::new();
            opts.include_untracked(true);
            let statuses = repo.statuses(Some(&mut opts))?;
            Ok(statuses.len() as u32)
        })
        .await
    }

    async fn peel_tag(&self, tag: &Tag) -> CoreResult<String> {
        let canonical = tag.name.canonical().to_string();
        self.run_blocking(move |repo| {
            let commit = repo.find_reference(&canonical)?.peel_to_commit()?;
            Ok(commit.id().to_string())
        })
        .await
    }
}

fn walk_commits(
    repo: &Repository,
    to: &str,
    from: Option<&str>,
    path_filter: Option<&str>,
    max: usize,
    first_parent_only: bool,
) -> Result<Vec<Commit>, git2::Error> {
    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    walk.push(git2::Oid::from_str(to)?)?;
    if let Some(from) = from {
        walk.hide(git2::Oid::from_str(from)?)?;
    }
    if first_parent_only {
        walk.simplify_first_parent()?;
    }
    let mut out = Vec::new();
    for oid in walk {
        let commit = repo.find_commit(oid?)?;
        if let Some(filter) = path_filter {
            if !commit_touches_path(repo, &commit, filter)? {
                continue;
            }
        }
        out.push(commit_from_git2(&commit));
        if out.len() >= max {
            break;
        }
    }
    Ok(out)
}

fn commit_touches_path(
    repo: &Repository,
    commit: &git2::Commit,
    path: &str,
) -> Result<bool, git2::Error> {
    let tree = commit.tree()?;
    let parent_tree = commit.parents().next().map(|p| p.tree()).transpose()?;
    let diff = repo.diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)?;
    let mut touched = false;
    diff.foreach(
        &mut |delta, _| {
            let matches = delta
                .new_file()
                .path()
                .map(|p| p.to_string_lossy().starts_with(path))
                .unwrap_or(false);
            touched |= matches;
            true
        },
        None,
        None,
        None,
    )?;
    Ok(touched)
}

fn commit_from_git2(commit: &git2::Commit) -> Commit {
    let when = Utc
        .timestamp_opt(commit.time().seconds(), 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    Commit {
        sha: commit.id().to_string(),
        parents: commit.parent_ids().map(|id| id.to_string()).collect(),
        when,
        message: commit.message().unwrap_or("").to_string(),
    }
}

fn to_core_error(err: GitError) -> CoreError {
    CoreError::repository_with_source("local git repository query failed", err)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
