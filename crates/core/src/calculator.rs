//! The calculator (spec.md §4.I): runs every strategy, selects the winning
//! candidate, applies the increment, and assigns pre-release/build
//! metadata.

use crate::config::Mode;
use crate::context::Context;
use crate::errors::CoreResult;
use crate::increment::{self, IncrementStrategy};
use crate::repository::version_tags;
use crate::strategies::{priority, BaseVersionCandidate, Strategy};
use crate::version::{IncrementField, PreReleaseTag, SemanticVersion};

/// One evaluated strategy's candidates, kept for the explain trace.
#[derive(Debug, Clone)]
pub struct StrategyEvaluation {
    pub strategy: Strategy,
    pub candidates: Vec<BaseVersionCandidate>,
}

/// Everything the calculator decided, sufficient to reconstruct the explain
/// trace in [`crate::output`].
#[derive(Debug, Clone)]
pub struct CalculationResult {
    pub version: SemanticVersion,
    pub winning_candidate: BaseVersionCandidate,
    pub evaluations: Vec<StrategyEvaluation>,
    pub commits_since_version_source: u32,
}

/// Runs every strategy in spec.md §4.G, selects a winner, applies the
/// increment (§4.H) and pre-release assignment (§4.I.1), and returns the
/// full result including the evaluation trail for `--explain`.
pub async fn calculate(ctx: &Context<'_>) -> CoreResult<CalculationResult> {
    let mut evaluations = Vec::new();
    let mut all_candidates: Vec<BaseVersionCandidate> = Vec::new();

    for strategy in Strategy::all() {
        let candidates = strategy.candidates(ctx, &ctx.effective).await?;
        all_candidates.extend(candidates.iter().cloned());
        evaluations.push(StrategyEvaluation {
            strategy,
            candidates,
        });
    }

    let winner = select_winner(&all_candidates);

    let commits_since_source = commits_since_version_source(ctx, &winner).await?;

    let version = if winner.should_increment {
        apply_increment(ctx, &winner, commits_since_source).await?
    } else {
        winner.semver.clone()
    };

    let version = assign_pre_release(ctx, version, commits_since_source).await?;

    Ok(CalculationResult {
        version,
        winning_candidate: winner,
        evaluations,
        commits_since_version_source: commits_since_source,
    })
}

/// Picks the candidate with the greatest `semver`; ties are broken by the
/// fixed strategy priority from spec.md §4.I step 2.
fn select_winner(candidates: &[BaseVersionCandidate]) -> BaseVersionCandidate {
    candidates
        .iter()
        .cloned()
        .max_by(|a, b| {
            a.semver
                .cmp(&b.semver)
                .then_with(|| priority(b.source).cmp(&priority(a.source)))
        })
        .expect("Fallback strategy always emits at least one candidate")
}

async fn commits_since_version_source(
    ctx: &Context<'_>,
    winner: &BaseVersionCandidate,
) -> CoreResult<u32> {
    let from = winner.source_sha.as_deref().filter(|sha| *sha != "root");
    let commits = ctx
        .repo
        .commit_log(from, &ctx.current_commit.sha, None)
        .await?;
    Ok(commits.len() as u32)
}

async fn apply_increment(
    ctx: &Context<'_>,
    winner: &BaseVersionCandidate,
    commits_since_source: u32,
) -> CoreResult<SemanticVersion> {
    let from = winner.source_sha.as_deref().filter(|sha| *sha != "root");

    match ctx.effective.mode {
        Mode::Mainline => {
            let commits = ctx
                .repo
                .mainline_log(from, &ctx.current_commit.sha, None)
                .await?;
            match increment::infer(ctx, &commits).await? {
                IncrementStrategy::Sequential(levels) => {
                    let mut version = winner.semver.clone();
                    for level in levels {
                        version = version.increment(level, false);
                    }
                    Ok(version)
                }
                IncrementStrategy::Single(level) => Ok(winner.semver.increment(level, false)),
            }
        }
        _ => {
            let commits = ctx
                .repo
                .commit_log(from, &ctx.current_commit.sha, None)
                .await?;
            let level = match increment::infer(ctx, &commits).await? {
                IncrementStrategy::Single(level) => level,
                IncrementStrategy::Sequential(levels) => {
                    levels.into_iter().fold(IncrementField::None, |acc, l| {
                        if rank_ge(l, acc) {
                            l
                        } else {
                            acc
                        }
                    })
                }
            };
            let _ = commits_since_source;
            Ok(winner.semver.increment(level, false))
        }
    }
}

fn rank_ge(a: IncrementField, b: IncrementField) -> bool {
    fn rank(f: IncrementField) -> u8 {
        match f {
            IncrementField::Major => 3,
            IncrementField::Minor => 2,
            IncrementField::Patch => 1,
            IncrementField::None => 0,
        }
    }
    rank(a) >= rank(b)
}

/// Applies spec.md §4.I.1's pre-release rules in place.
async fn assign_pre_release(
    ctx: &Context<'_>,
    version: SemanticVersion,
    commits_since_source: u32,
) -> CoreResult<SemanticVersion> {
    let label = &ctx.effective.label;

    if label.is_empty() && ctx.effective.is_release_branch {
        return Ok(version);
    }

    match ctx.effective.mode {
        Mode::Mainline => Ok(version),
        Mode::ContinuousDeployment => {
            let n = if commits_since_source == 0 {
                1
            } else {
                commits_since_source
            };
            let fallback_label = if label.is_empty() {
                ctx.effective.cd_fallback_tag.as_str()
            } else {
                label.as_str()
            };
            Ok(version.with_pre(PreReleaseTag::new(fallback_label, Some(n as u64))))
        }
        Mode::ContinuousDelivery => {
            let effective_label = if label.is_empty() {
                ctx.effective.cd_fallback_tag.as_str()
            } else {
                label.as_str()
            };
            let n = match existing_label_number(ctx, effective_label).await? {
                Some(max_existing) => max_existing + 1,
                None => commits_since_source as u64 + 1,
            };
            Ok(version.with_pre(PreReleaseTag::new(effective_label, Some(n))))
        }
    }
}

/// The greatest pre-release number already used by a version tag reachable
/// from the current commit whose label matches `label`, if any. Backs
/// spec.md §4.I.1's "otherwise n = max(existing label numbers) + 1" clause.
async fn existing_label_number(ctx: &Context<'_>, label: &str) -> CoreResult<Option<u64>> {
    let tags = ctx.repo.tags().await?;
    let version_tags = version_tags(ctx.repo, &tags, &ctx.effective.tag_prefix).await?;

    let mut max_n = None;
    for vt in version_tags {
        if !vt.version.pre.name.eq_ignore_ascii_case(label) {
            continue;
        }
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
        let n = vt.version.pre.number_or_zero();
        max_n = Some(max_n.map_or(n, |m: u64| m.max(n)));
    }
    Ok(max_n)
}

#[cfg(test)]
#[path = "calculator_tests.rs"]
mod tests;
