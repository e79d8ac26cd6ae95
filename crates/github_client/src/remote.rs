//! Remote [`RepositoryPort`] adapter backed by the GitHub REST API.
//!
//! Every response is memoized in [`crate::cache::RepoCache`] (spec.md §3);
//! the cache is owned exclusively by one adapter for the lifetime of a
//! single calculation and is never invalidated mid-calculation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::Deserialize;
use tracing::{debug, instrument};

use nextver_core::errors::{CoreError, CoreResult};
use nextver_core::repository::{Branch, Commit, PathFilter, ReferenceName, RepositoryPort, Tag};

use crate::cache::RepoCache;
use crate::errors::Error as GitHubError;

/// A [`RepositoryPort`] over a single GitHub repository, reached through an
/// already-authenticated [`Octocrab`] client (see [`crate::create_app_client`]
/// / [`crate::create_token_client`]).
pub struct GitHubRepositoryAdapter {
    client: Octocrab,
    owner: String,
    repo: String,
    cache: RepoCache,
    max_commits: usize,
}

impl GitHubRepositoryAdapter {
    pub fn new(client: Octocrab, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            client,
            owner: owner.into(),
            repo: repo.into(),
            cache: RepoCache::new(),
            max_commits: 1000,
        }
    }

    /// Overrides the default 1000-commit cap on unbounded history walks.
    pub fn set_max_commits(&mut self, max_commits: usize) {
        self.max_commits = max_commits;
    }

    fn api_path(&self, suffix: &str) -> String {
        format!("/repos/{}/{}{suffix}", self.owner, self.repo)
    }

    /// Reads a single file's content at `path` on the repository's default
    /// branch, via the contents API. Used to fetch a remote configuration
    /// file before a calculation starts.
    pub async fn read_file(&self, path: &str) -> CoreResult<String> {
        let content: ApiContent = self.get(&self.api_path(&format!("/contents/{path}"))).await?;
        if content.encoding != "base64" {
            return Err(CoreError::repository(format!(
                "unsupported content encoding '{}' for {path}",
                content.encoding
            )));
        }
        let cleaned: String = content.content.chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, cleaned)
            .map_err(|e| CoreError::repository_with_source(format!("failed to decode {path}"), e))?;
        String::from_utf8(bytes)
            .map_err(|e| CoreError::repository_with_source(format!("{path} is not valid UTF-8"), e))
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> CoreResult<T> {
        self.client
            .get(path, None::<&()>)
            .await
            .map_err(to_core_error)
    }

    async fn fetch_commit(&self, sha: &str) -> CoreResult<Commit> {
        if let Some(cached) = self.cache.get_commit(sha).await {
            return Ok(cached);
        }
        let api: ApiCommit = self.get(&self.api_path(&format!("/commits/{sha}"))).await?;
        let commit = api.into_commit();
        self.cache.put_commit(commit.clone()).await;
        Ok(commit)
    }
}

#[async_trait]
impl RepositoryPort for GitHubRepositoryAdapter {
    #[instrument(skip(self))]
    async fn head(&self) -> CoreResult<Branch> {
        if let Some(cached) = self.cache.get_head().await {
            return Ok(cached);
        }
        let repo: ApiRepository = self.get(&self.api_path("")).await?;
        let api_branch: ApiBranch = self
            .get(&self.api_path(&format!("/branches/{}", repo.default_branch)))
            .await?;
        let tip = self.fetch_commit(&api_branch.commit.sha).await?;
        let branch = Branch {
            name: ReferenceName::new(format!("refs/heads/{}", api_branch.name)),
            tip,
            is_remote: true,
            is_detached: false,
        };
        self.cache.set_head(branch.clone()).await;
        Ok(branch)
    }

    #[instrument(skip(self))]
    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        if let Some(cached) = self.cache.get_branches().await {
            return Ok(cached);
        }
        let api_branches: Vec<ApiBranch> = self
            .get(&self.api_path("/branches?per_page=100"))
            .await?;
        let mut branches = Vec::with_capacity(api_branches.len());
        for api_branch in api_branches {
            let tip = self.fetch_commit(&api_branch.commit.sha).await?;
            branches.push(Branch {
                name: ReferenceName::new(format!("refs/heads/{}", api_branch.name)),
                tip,
                is_remote: true,
                is_detached: false,
            });
        }
        self.cache.set_branches(branches.clone()).await;
        Ok(branches)
    }

    #[instrument(skip(self))]
    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        if let Some(cached) = self.cache.get_tags().await {
            return Ok(cached);
        }
        let api_tags: Vec<ApiTag> = self.get(&self.api_path("/tags?per_page=100")).await?;
        // GitHub's tags endpoint already resolves annotated tags down to the
        // commit they point at, so the peeled sha is known up front.
        for api_tag in &api_tags {
            self.cache
                .put_peeled_tag(&api_tag.commit.sha, api_tag.commit.sha.clone())
                .await;
        }
        let tags: Vec<Tag> = api_tags
            .into_iter()
            .map(|t| Tag {
                name: ReferenceName::new(format!("refs/tags/{}", t.name)),
                target_sha: t.commit.sha,
            })
            .collect();
        self.cache.set_tags(tags.clone()).await;
        Ok(tags)
    }

    #[instrument(skip(self))]
    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        self.fetch_commit(sha).await
    }

    #[instrument(skip(self, path_filter))]
    async fn commit_log(
        &self,
        from: Option<&str>,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        let key = (
            from.map(str::to_string),
            to.to_string(),
            path_filter.map(str::to_string),
        );
        if let Some(cached) = self.cache.get_commit_log(&key).await {
            return Ok(cached);
        }

        let commits = match from {
            // Compare-endpoint-first: a single request returns every commit
            // between the two refs, already newest-first.
            Some(from) => self.compare_commits(from, to).await?,
            None => self.paginated_commits(to, path_filter).await?,
        };

        for commit in &commits {
            self.cache.put_commit(commit.clone()).await;
        }
        self.cache.put_commit_log(key, commits.clone()).await;
        Ok(commits)
    }

    #[instrument(skip(self, path_filter))]
    async fn mainline_log(
        &self,
        from: Option<&str>,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        // First-parent walk: the REST commit-listing endpoints do not expose
        // a first-parent-only filter, so walk parents[0] by hand, bounded by
        // `max_commits`.
        let mut out = Vec::new();
        let mut cursor = to.to_string();
        for _ in 0..self.max_commits() {
            if Some(cursor.as_str()) == from {
                break;
            }
            let commit = self.fetch_commit(&cursor).await?;
            let Some(parent) = commit.first_parent().map(str::to_string) else {
                out.push(commit);
                break;
            };
            out.push(commit);
            cursor = parent;
        }
        let _ = path_filter;
        Ok(out)
    }

    #[instrument(skip(self))]
    async fn commits_prior_to(
        &self,
        cutoff_time: DateTime<Utc>,
        branch: &str,
    ) -> CoreResult<Vec<Commit>> {
        let path = self.api_path(&format!(
            "/commits?sha={branch}&until={}&per_page=100",
            cutoff_time.to_rfc3339()
        ));
        let api_commits: Vec<ApiCommit> = self.get(&path).await?;
        Ok(api_commits.into_iter().map(ApiCommit::into_commit).collect())
    }

    #[instrument(skip(self))]
    async fn find_merge_base(&self, a: &str, b: &str) -> CoreResult<Option<String>> {
        if let Some(cached) = self.cache.get_merge_base(a, b).await {
            return Ok(cached);
        }
        let path = self.api_path(&format!("/compare/{a}...{b}"));
        let comparison: ApiComparison = self.get(&path).await?;
        let base = comparison.merge_base_commit.map(|c| c.sha);
        self.cache.put_merge_base(a, b, base.clone()).await;
        Ok(base)
    }

    #[instrument(skip(self))]
    async fn branches_containing(&self, sha: &str) -> CoreResult<Vec<Branch>> {
        let mut out = Vec::new();
        for branch in self.branches().await? {
            let path = self.api_path(&format!("/compare/{sha}...{}", branch.tip.sha));
            let comparison: ApiComparison = self.get(&path).await?;
            if matches!(comparison.status.as_str(), "identical" | "behind") {
                out.push(branch);
            }
        }
        Ok(out)
    }

    async fn uncommitted_changes(&self) -> CoreResult<u32> {
        // The remote adapter has no working tree to inspect.
        Ok(0)
    }

    async fn peel_tag(&self, tag: &Tag) -> CoreResult<String> {
        if let Some(cached) = self.cache.get_peeled_tag(&tag.target_sha).await {
            return Ok(cached);
        }
        // `tags()` already peels every tag it returns; if this sha wasn't
        // seen through that path, it already is the commit sha.
        Ok(tag.target_sha.clone())
    }

    fn max_commits(&self) -> usize {
        self.max_commits
    }
}

impl GitHubRepositoryAdapter {
    /// Walks `from..to` via the compare endpoint, which caps the commits it
    /// returns well below large ranges' true size. When `total_commits`
    /// exceeds what was actually returned, the compare result is discarded
    /// in favor of a full paginated walk truncated at `from`.
    async fn compare_commits(&self, from: &str, to: &str) -> CoreResult<Vec<Commit>> {
        let path = self.api_path(&format!("/compare/{from}...{to}"));
        let comparison: ApiComparison = self.get(&path).await?;
        if comparison.total_commits > comparison.commits.len() {
            debug!(
                total_commits = comparison.total_commits,
                returned = comparison.commits.len(),
                "compare endpoint truncated result, falling back to paginated listing"
            );
            return self.paginated_commits_until(to, Some(from), None).await;
        }
        let mut commits: Vec<Commit> = comparison.commits.into_iter().map(ApiCommit::into_commit).collect();
        commits.reverse(); // GitHub returns oldest-first; RepositoryPort wants newest-first.
        Ok(commits)
    }

    async fn paginated_commits(
        &self,
        to: &str,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        self.paginated_commits_until(to, None::<&str>, path_filter).await
    }

    /// Pages through `/commits?sha=to` until exhaustion, `max_commits`, or
    /// `stop_at` is seen. Once a commit matching a known version-tag sha
    /// (or the caller-supplied `stop_at`) is seen, one additional buffer
    /// page is fetched and then the walk stops — later pages cannot affect
    /// any calculation anchored at that sha.
    async fn paginated_commits_until(
        &self,
        to: &str,
        stop_at: Option<&str>,
        path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        let version_tag_shas = self.version_tag_shas().await?;

        let mut out = Vec::new();
        let mut page = 1u32;
        let mut buffer_pages_left: Option<u32> = None;
        loop {
            let mut path = self.api_path(&format!("/commits?sha={to}&per_page=100&page={page}"));
            if let Some(filter) = path_filter {
                path.push_str(&format!("&path={filter}"));
            }
            let api_commits: Vec<ApiCommit> = self.get(&path).await?;
            if api_commits.is_empty() {
                break;
            }
            let len = api_commits.len();
            let saw_stop_sha = api_commits
                .iter()
                .any(|c| Some(c.sha.as_str()) == stop_at || version_tag_shas.contains(&c.sha));
            out.extend(api_commits.into_iter().map(ApiCommit::into_commit));

            if saw_stop_sha && buffer_pages_left.is_none() {
                buffer_pages_left = Some(1);
            }
            if let Some(left) = buffer_pages_left {
                if left == 0 {
                    break;
                }
                buffer_pages_left = Some(left - 1);
            }
            if len < 100 || out.len() >= self.max_commits() {
                break;
            }
            page += 1;
        }
        if let Some(sha) = stop_at {
            if let Some(idx) = out.iter().position(|c| c.sha == sha) {
                out.truncate(idx);
            }
        }
        out.truncate(self.max_commits());
        debug!(count = out.len(), "paginated commit walk complete");
        Ok(out)
    }

    /// Every tag's peeled commit sha, used by `paginated_commits_until` to
    /// terminate early once history has walked past the last known release.
    async fn version_tag_shas(&self) -> CoreResult<std::collections::HashSet<String>> {
        let tags = self.tags().await?;
        Ok(tags.into_iter().map(|t| t.target_sha).collect())
    }
}

fn to_core_error(err: octocrab::Error) -> CoreError {
    CoreError::repository_with_source("GitHub API request failed", GitHubError::from(err))
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    default_branch: String,
}

#[derive(Debug, Deserialize)]
struct ApiBranch {
    name: String,
    commit: ApiRef,
}

#[derive(Debug, Deserialize)]
struct ApiTag {
    name: String,
    commit: ApiRef,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ApiContent {
    content: String,
    encoding: String,
}

#[derive(Debug, Deserialize)]
struct ApiComparison {
    status: String,
    merge_base_commit: Option<ApiCommit>,
    #[serde(default)]
    total_commits: usize,
    #[serde(default)]
    commits: Vec<ApiCommit>,
}

#[derive(Debug, Deserialize)]
struct ApiCommit {
    sha: String,
    commit: ApiCommitDetail,
    #[serde(default)]
    parents: Vec<ApiRef>,
}

impl ApiCommit {
    fn into_commit(self) -> Commit {
        Commit {
            sha: self.sha,
            parents: self.parents.into_iter().map(|p| p.sha).collect(),
            when: self.commit.author.date,
            message: self.commit.message,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    message: String,
    author: ApiAuthor,
}

#[derive(Debug, Deserialize)]
struct ApiAuthor {
    date: DateTime<Utc>,
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
