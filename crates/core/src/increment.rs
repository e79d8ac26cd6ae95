//! Increment inference (spec.md §4.H): turns a commit message, an explicit
//! `+semver:` directive, or a branch's default policy into an
//! [`IncrementField`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{BranchIncrement, CommitMessageConvention, MainlineIncrement};
use crate::context::Context;
use crate::errors::CoreResult;
use crate::repository::Commit;
use crate::version::IncrementField;

static DIRECTIVE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+semver:\s*\{?\s*(major|minor|patch|none|skip)\s*\}?").unwrap());

/// Per-commit inference outcome. `Skip` means "do not treat as bumpable but
/// do not suppress the branch default either" (spec.md §4.H.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitBump {
    Level(IncrementField),
    Skip,
}

/// Infers the bump level for a single commit message, checking explicit
/// directives first, then conventional-commits parsing if enabled.
fn infer_commit(message: &str, convention: CommitMessageConvention) -> CommitBump {
    if let Some(caps) = DIRECTIVE_RE.captures(message) {
        return match &caps[1] {
            "major" => CommitBump::Level(IncrementField::Major),
            "minor" => CommitBump::Level(IncrementField::Minor),
            "patch" => CommitBump::Level(IncrementField::Patch),
            "none" => CommitBump::Level(IncrementField::None),
            "skip" => CommitBump::Skip,
            _ => unreachable!("directive regex only captures the five known levels"),
        };
    }

    if convention == CommitMessageConvention::ConventionalCommits {
        if let Ok(parsed) = git_conventional::Commit::parse(first_line(message)) {
            let breaking = parsed.breaking() || has_breaking_footer(message);
            if breaking {
                return CommitBump::Level(IncrementField::Major);
            }
            let commit_type = parsed.type_();
            return if commit_type == git_conventional::Type::FEAT {
                CommitBump::Level(IncrementField::Minor)
            } else if commit_type == git_conventional::Type::FIX {
                CommitBump::Level(IncrementField::Patch)
            } else {
                CommitBump::Level(IncrementField::None)
            };
        }
    }

    CommitBump::Level(IncrementField::None)
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or("")
}

fn has_breaking_footer(message: &str) -> bool {
    message
        .lines()
        .any(|line| line.trim_start().starts_with("BREAKING CHANGE:"))
}

fn max_level(a: IncrementField, b: IncrementField) -> IncrementField {
    rank(a).max(rank(b)).into()
}

fn rank(field: IncrementField) -> u8 {
    match field {
        IncrementField::Major => 3,
        IncrementField::Minor => 2,
        IncrementField::Patch => 1,
        IncrementField::None => 0,
    }
}

impl From<u8> for IncrementField {
    fn from(rank: u8) -> Self {
        match rank {
            3 => IncrementField::Major,
            2 => IncrementField::Minor,
            1 => IncrementField::Patch,
            _ => IncrementField::None,
        }
    }
}

fn branch_default_level(default: BranchIncrement) -> IncrementField {
    match default {
        BranchIncrement::Major => IncrementField::Major,
        BranchIncrement::Minor => IncrementField::Minor,
        BranchIncrement::Patch => IncrementField::Patch,
        BranchIncrement::None | BranchIncrement::Inherit => IncrementField::None,
    }
}

/// Aggregates a set of commits into a single [`IncrementField`] per the
/// mode-dependent rules in spec.md §4.H. For `Mainline`/`EachCommit`, the
/// caller is expected to apply each level sequentially instead (see
/// [`per_commit_levels`]); this function answers the CD/aggregate cases.
pub fn aggregate(
    commits: &[Commit],
    ctx: &Context<'_>,
) -> IncrementField {
    let branch_default = branch_default_level(ctx.effective.increment_default);
    let convention = ctx.effective.commit_message_convention;

    let mut level = IncrementField::None;
    let mut saw_bumpable_commit = false;

    for commit in commits {
        match infer_commit(&commit.message, convention) {
            CommitBump::Skip => continue,
            CommitBump::Level(l) => {
                saw_bumpable_commit = true;
                level = max_level(level, l);
            }
        }
    }

    if !saw_bumpable_commit {
        // No commit carried a bump signal (either there were none, or every
        // one was `+semver: skip`): the branch default still applies.
        return branch_default;
    }

    level
}

/// Per-commit levels in chronological (oldest-first) order, for
/// `mode=Mainline, mainline_increment=EachCommit` sequential application.
/// `commits` must already be newest-first (as returned by the repository
/// port); this reverses them.
pub fn per_commit_levels(commits: &[Commit], convention: CommitMessageConvention) -> Vec<IncrementField> {
    commits
        .iter()
        .rev()
        .filter_map(|c| match infer_commit(&c.message, convention) {
            CommitBump::Skip => None,
            CommitBump::Level(l) => Some(l),
        })
        .collect()
}

/// Determines the increment level to apply given the mode and mainline
/// strategy, per spec.md §4.H's aggregation rules.
pub async fn infer(ctx: &Context<'_>, commits_since_source: &[Commit]) -> CoreResult<IncrementStrategy> {
    use crate::config::Mode;

    match (ctx.effective.mode, ctx.effective.mainline_increment) {
        (Mode::Mainline, MainlineIncrement::EachCommit) => Ok(IncrementStrategy::Sequential(
            per_commit_levels(commits_since_source, ctx.effective.commit_message_convention),
        )),
        _ => Ok(IncrementStrategy::Single(aggregate(commits_since_source, ctx))),
    }
}

/// How the winning candidate's increment should be applied.
#[derive(Debug, Clone)]
pub enum IncrementStrategy {
    /// Apply once.
    Single(IncrementField),
    /// Apply each level in order, oldest commit first.
    Sequential(Vec<IncrementField>),
}

#[cfg(test)]
#[path = "increment_tests.rs"]
mod tests;
