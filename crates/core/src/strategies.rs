//! Base-version strategies (spec.md §4.G).
//!
//! `Strategy` is a tagged variant, not a runtime trait-object registry: the
//! calculator composes a fixed, statically-known list and invokes
//! [`Strategy::candidates`] on each.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::EffectiveConfiguration;
use crate::context::Context;
use crate::errors::CoreResult;
use crate::repository::version_tags;
use crate::version::SemanticVersion;

/// A candidate base version produced by one strategy, carrying enough
/// provenance for the explain trace and the tie-break priority order.
#[derive(Debug, Clone)]
pub struct BaseVersionCandidate {
    pub semver: SemanticVersion,
    pub source: &'static str,
    pub source_sha: Option<String>,
    pub should_increment: bool,
}

/// Priority order used to break ties between candidates of equal version,
/// lowest number wins. Mirrors the declaration order in spec.md §4.G.
pub fn priority(source: &str) -> u8 {
    match source {
        "NextVersion" => 0,
        "TaggedCommit" => 1,
        "BranchName" => 2,
        "MergeMessage" => 3,
        "Fallback" => 4,
        _ => u8::MAX,
    }
}

/// One of the five base-version strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ConfigNextVersion,
    TaggedCommit,
    VersionInBranchName,
    MergeMessage,
    Fallback,
}

impl Strategy {
    /// All strategies, in the declaration order from spec.md §4.G.
    pub fn all() -> [Strategy; 5] {
        [
            Strategy::ConfigNextVersion,
            Strategy::TaggedCommit,
            Strategy::VersionInBranchName,
            Strategy::MergeMessage,
            Strategy::Fallback,
        ]
    }

    pub async fn candidates(
        &self,
        ctx: &Context<'_>,
        effective: &EffectiveConfiguration,
    ) -> CoreResult<Vec<BaseVersionCandidate>> {
        match self {
            Strategy::ConfigNextVersion => config_next_version(ctx).await,
            Strategy::TaggedCommit => tagged_commit(ctx, effective).await,
            Strategy::VersionInBranchName => version_in_branch_name(ctx).await,
            Strategy::MergeMessage => merge_message(ctx, effective).await,
            Strategy::Fallback => fallback(ctx).await,
        }
    }
}

async fn config_next_version(ctx: &Context<'_>) -> CoreResult<Vec<BaseVersionCandidate>> {
    let Some(next) = ctx.config.next_version()? else {
        return Ok(vec![]);
    };

    // Skipped entirely when the current commit is tagged, so TaggedCommit wins.
    let tags = ctx.repo.tags().await?;
    let version_tags = version_tags(ctx.repo, &tags, &ctx.effective.tag_prefix).await?;
    let is_tagged = version_tags
        .iter()
        .any(|vt| vt.commit_sha == ctx.current_commit.sha);
    if is_tagged {
        return Ok(vec![]);
    }

    Ok(vec![BaseVersionCandidate {
        semver: next,
        source: "NextVersion",
        source_sha: None,
        should_increment: false,
    }])
}

async fn tagged_commit(
    ctx: &Context<'_>,
    effective: &EffectiveConfiguration,
) -> CoreResult<Vec<BaseVersionCandidate>> {
    let tags = ctx.repo.tags().await?;
    let version_tags = version_tags(ctx.repo, &tags, &effective.tag_prefix).await?;

    let mut out = Vec::new();
    for vt in version_tags {
        // Tag-parsing failures are filtered out already by `version_tags`;
        // here we only check reachability from the current commit.
        let reachable = vt.commit_sha == ctx.current_commit.sha
            || ctx
                .repo
                .find_merge_base(&vt.commit_sha, &ctx.current_commit.sha)
                .await?
                .as_deref()
                == Some(vt.commit_sha.as_str());
        if !reachable {
            continue;
        }
        let should_increment = vt.commit_sha != ctx.current_commit.sha;
        out.push(BaseVersionCandidate {
            semver: vt.version,
            source: "TaggedCommit",
            source_sha: Some(vt.commit_sha),
            should_increment,
        });
    }
    Ok(out)
}

static BRANCH_VERSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|/)(\d+)\.(\d+)(?:\.(\d+))?$").unwrap());

async fn version_in_branch_name(ctx: &Context<'_>) -> CoreResult<Vec<BaseVersionCandidate>> {
    let friendly = ctx.current_branch.name.friendly();
    let Some(caps) = BRANCH_VERSION_RE.captures(friendly) else {
        return Ok(vec![]);
    };

    let major: u32 = caps[1].parse().unwrap_or(0);
    let minor: u32 = caps[2].parse().unwrap_or(0);
    let patch: u32 = caps
        .get(3)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0);

    Ok(vec![BaseVersionCandidate {
        semver: SemanticVersion::new(major, minor, patch),
        source: "BranchName",
        source_sha: None,
        should_increment: false,
    }])
}

static MERGE_COMMIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Merge (?:branch|pull request) '?(?:release|hotfix)/(\d+)\.(\d+)\.(\d+)'?").unwrap()
});

async fn merge_message(
    ctx: &Context<'_>,
    effective: &EffectiveConfiguration,
) -> CoreResult<Vec<BaseVersionCandidate>> {
    let tags = ctx.repo.tags().await?;
    let version_tags = version_tags(ctx.repo, &tags, &effective.tag_prefix).await?;
    let last_tag_sha = version_tags
        .iter()
        .max_by(|a, b| a.version.cmp(&b.version))
        .map(|vt| vt.commit_sha.clone());

    let commits = ctx
        .repo
        .mainline_log(last_tag_sha.as_deref(), &ctx.current_commit.sha, None)
        .await?;

    let mut out = Vec::new();
    for commit in commits {
        let Some(caps) = MERGE_COMMIT_RE.captures(&commit.message) else {
            continue;
        };
        let major: u32 = caps[1].parse().unwrap_or(0);
        let minor: u32 = caps[2].parse().unwrap_or(0);
        let patch: u32 = caps[3].parse().unwrap_or(0);
        out.push(BaseVersionCandidate {
            semver: SemanticVersion::new(major, minor, patch),
            source: "MergeMessage",
            source_sha: Some(commit.sha),
            should_increment: true,
        });
    }
    Ok(out)
}

async fn fallback(ctx: &Context<'_>) -> CoreResult<Vec<BaseVersionCandidate>> {
    Ok(vec![BaseVersionCandidate {
        semver: ctx.config.base_version()?,
        source: "Fallback",
        source_sha: Some("root".to_string()),
        should_increment: true,
    }])
}

#[cfg(test)]
#[path = "strategies_tests.rs"]
mod tests;
