//! Context resolution: pins down the branch and commit a calculation runs
//! against, and the [`crate::config::EffectiveConfiguration`] that applies
//! to them.

use crate::config::{Builder, Config, EffectiveConfiguration};
use crate::errors::{CoreError, CoreResult};
use crate::repository::{Branch, Commit, RepositoryPort};

/// Caller-supplied overrides for context resolution. Both fields default to
/// the implicit choice (current branch, branch tip) when absent.
#[derive(Debug, Clone, Default)]
pub struct ContextOptions {
    pub target_branch: Option<String>,
    pub commit_id: Option<String>,
}

/// The resolved branch, commit, and effective configuration a calculation
/// runs against. Borrows nothing: owns its own copies so it can outlive any
/// single repository-port call.
pub struct Context<'a> {
    pub repo: &'a dyn RepositoryPort,
    pub config: &'a Config,
    pub current_branch: Branch,
    pub current_commit: Commit,
    pub effective: EffectiveConfiguration,
}

impl<'a> Context<'a> {
    /// Resolves a [`Context`] per spec.md §4.F: branch from `target_branch`
    /// or `head()`, commit from `commit_id` or the branch tip, then the
    /// effective configuration from the branch's friendly name.
    pub async fn resolve(
        repo: &'a dyn RepositoryPort,
        config: &'a Config,
        options: &ContextOptions,
    ) -> CoreResult<Context<'a>> {
        let current_branch = match &options.target_branch {
            Some(name) => resolve_branch_by_name(repo, name).await?,
            None => repo.head().await?,
        };

        let current_commit = match &options.commit_id {
            Some(sha) => repo.commit(sha).await?,
            None => current_branch.tip.clone(),
        };

        let builder = Builder::new();
        let effective = builder.resolve(config, current_branch.name.friendly())?;

        Ok(Context {
            repo,
            config,
            current_branch,
            current_commit,
            effective,
        })
    }
}

async fn resolve_branch_by_name(repo: &dyn RepositoryPort, name: &str) -> CoreResult<Branch> {
    let branches = repo.branches().await?;
    branches
        .into_iter()
        .find(|b| b.name.friendly() == name || b.name.canonical() == name)
        .ok_or_else(|| CoreError::invalid_reference(name, "no such branch"))
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
