//! Declarative configuration: root options, per-branch overrides, and the
//! builder that merges them into an [`EffectiveConfiguration`] for a given
//! branch name.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{CoreError, CoreResult};
use crate::version::SemanticVersion;

/// Deployment mode: how aggressively pre-release tags are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Mode {
    ContinuousDelivery,
    ContinuousDeployment,
    Mainline,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::ContinuousDelivery
    }
}

/// How the increment is derived on a mainline branch with more than one
/// commit since the last version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum MainlineIncrement {
    Aggregate,
    EachCommit,
}

impl Default for MainlineIncrement {
    fn default() -> Self {
        MainlineIncrement::Aggregate
    }
}

/// How commit messages are interpreted for increment inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum CommitMessageConvention {
    None,
    ConventionalCommits,
    Mentioned,
}

impl Default for CommitMessageConvention {
    fn default() -> Self {
        CommitMessageConvention::None
    }
}

/// The increment a branch applies by default. `Inherit` defers to the
/// branch that was merged from (resolved by the increment inferencer, not
/// the config layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchIncrement {
    Major,
    Minor,
    Patch,
    None,
    Inherit,
}

/// The versioning scheme a repository's tags and output follow. Has no
/// effect on increment or pre-release calculation; carried through
/// `EffectiveConfiguration` purely as a reportable setting (spec.md §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum VersioningScheme {
    SemVer,
    MajorMinorPatch,
}

impl Default for VersioningScheme {
    fn default() -> Self {
        VersioningScheme::SemVer
    }
}

/// Per-branch-pattern configuration. Any field left `None` by the caller
/// inherits from the matching built-in default (see
/// [`Builder::new`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BranchConfig {
    pub regex: Option<String>,
    #[serde(default)]
    pub source_branches: Vec<String>,
    pub is_release_branch: Option<bool>,
    pub is_mainline: Option<bool>,
    pub label: Option<String>,
    pub increment: Option<BranchIncrement>,
    pub prevent_increment: Option<bool>,
    pub tracks_release_branches: Option<bool>,
    pub pre_release_weight: Option<u32>,
}

impl BranchConfig {
    /// Overlays `self` on top of `base`: each `Some` field in `self` wins,
    /// `None` fields fall through to `base`.
    fn merged_over(&self, base: &BranchConfig) -> BranchConfig {
        BranchConfig {
            regex: self.regex.clone().or_else(|| base.regex.clone()),
            source_branches: if self.source_branches.is_empty() {
                base.source_branches.clone()
            } else {
                self.source_branches.clone()
            },
            is_release_branch: self.is_release_branch.or(base.is_release_branch),
            is_mainline: self.is_mainline.or(base.is_mainline),
            label: self.label.clone().or_else(|| base.label.clone()),
            increment: self.increment.or(base.increment),
            prevent_increment: self.prevent_increment.or(base.prevent_increment),
            tracks_release_branches: self.tracks_release_branches.or(base.tracks_release_branches),
            pre_release_weight: self.pre_release_weight.or(base.pre_release_weight),
        }
    }
}

/// Root configuration: global options plus a name → [`BranchConfig`] map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub tag_prefix: Option<String>,
    pub next_version: Option<String>,
    pub base_version: Option<String>,
    pub mode: Option<Mode>,
    pub mainline_increment: Option<MainlineIncrement>,
    pub commit_message_convention: Option<CommitMessageConvention>,
    /// The tag substituted for an empty label in continuous-delivery/
    /// -deployment pre-release assignment (spec.md §4.I.1), e.g. `ci`.
    pub cd_fallback_tag: Option<String>,
    pub versioning_scheme: Option<VersioningScheme>,
    #[serde(default)]
    pub branches: HashMap<String, BranchConfig>,
    /// CI-style variable-name overrides, e.g. remapping `SemVer` to a
    /// custom output key. Keys are the canonical variable names from §6.
    #[serde(default)]
    pub variable_overrides: HashMap<String, String>,
}

impl Config {
    pub fn tag_prefix(&self) -> &str {
        self.tag_prefix.as_deref().unwrap_or("^v?")
    }

    pub fn base_version(&self) -> CoreResult<SemanticVersion> {
        SemanticVersion::parse(self.base_version.as_deref().unwrap_or("0.1.0"))
    }

    pub fn mode(&self) -> Mode {
        self.mode.unwrap_or_default()
    }

    pub fn mainline_increment(&self) -> MainlineIncrement {
        self.mainline_increment.unwrap_or_default()
    }

    pub fn commit_message_convention(&self) -> CommitMessageConvention {
        self.commit_message_convention.unwrap_or_default()
    }

    pub fn cd_fallback_tag(&self) -> &str {
        self.cd_fallback_tag.as_deref().unwrap_or("ci")
    }

    pub fn versioning_scheme(&self) -> VersioningScheme {
        self.versioning_scheme.unwrap_or_default()
    }

    pub fn next_version(&self) -> CoreResult<Option<SemanticVersion>> {
        self.next_version
            .as_deref()
            .map(SemanticVersion::parse)
            .transpose()
    }
}

/// The builtin branch-pattern defaults from spec.md §4.E, in declaration
/// order (declaration order matters: the first matching regex wins).
fn builtin_defaults() -> Vec<(&'static str, BranchConfig)> {
    vec![
        (
            "main",
            BranchConfig {
                regex: Some("^master$|^main$".to_string()),
                label: Some(String::new()),
                increment: Some(BranchIncrement::Patch),
                is_release_branch: Some(true),
                is_mainline: Some(true),
                ..Default::default()
            },
        ),
        (
            "develop",
            BranchConfig {
                regex: Some("^dev(elop)?(ment)?$".to_string()),
                label: Some("alpha".to_string()),
                increment: Some(BranchIncrement::Minor),
                is_release_branch: Some(false),
                is_mainline: Some(false),
                tracks_release_branches: Some(true),
                ..Default::default()
            },
        ),
        (
            "release",
            BranchConfig {
                regex: Some("^releases?[/-]".to_string()),
                label: Some(String::new()),
                increment: Some(BranchIncrement::None),
                is_release_branch: Some(true),
                is_mainline: Some(false),
                ..Default::default()
            },
        ),
        (
            "hotfix",
            BranchConfig {
                regex: Some("^hotfix(es)?[/-]".to_string()),
                label: Some("beta".to_string()),
                increment: Some(BranchIncrement::Patch),
                is_release_branch: Some(false),
                is_mainline: Some(false),
                ..Default::default()
            },
        ),
        (
            "feature",
            BranchConfig {
                regex: Some("^features?[/-]".to_string()),
                label: Some("{BranchName}".to_string()),
                increment: Some(BranchIncrement::Inherit),
                is_release_branch: Some(false),
                is_mainline: Some(false),
                ..Default::default()
            },
        ),
        (
            "support",
            BranchConfig {
                regex: Some("^support[/-]".to_string()),
                label: Some(String::new()),
                increment: Some(BranchIncrement::Patch),
                is_release_branch: Some(false),
                is_mainline: Some(true),
                ..Default::default()
            },
        ),
        (
            "pull-request",
            BranchConfig {
                regex: Some("^(pull|pr)[/-]".to_string()),
                label: Some("PullRequest".to_string()),
                increment: Some(BranchIncrement::Inherit),
                is_release_branch: Some(false),
                is_mainline: Some(false),
                ..Default::default()
            },
        ),
    ]
}

/// Flat record of every branch-scoped option after merging user overrides
/// on top of the builtin defaults and the root config.
#[derive(Debug, Clone)]
pub struct EffectiveConfiguration {
    pub tag_prefix: regex::Regex,
    pub increment_default: BranchIncrement,
    pub mode: Mode,
    pub mainline_increment: MainlineIncrement,
    pub label: String,
    pub is_release_branch: bool,
    pub is_mainline: bool,
    pub prevent_increment: bool,
    pub tracks_release_branches: bool,
    pub source_branches: Vec<String>,
    pub commit_message_convention: CommitMessageConvention,
    pub pre_release_weight: u32,
    pub cd_fallback_tag: String,
    pub versioning_scheme: VersioningScheme,
}

/// Replaces every non-alphanumeric character with `-`, per spec.md §4.I.1.
fn sanitize_label(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// Builds an [`EffectiveConfiguration`] for a branch name by merging the
/// builtin per-branch defaults with user overrides, then matching the
/// branch name against each candidate's regex in declaration order.
pub struct Builder {
    defaults: Vec<(String, BranchConfig)>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            defaults: builtin_defaults()
                .into_iter()
                .map(|(name, cfg)| (name.to_string(), cfg))
                .collect(),
        }
    }

    /// Resolves the effective configuration for `branch_friendly_name`
    /// given the root [`Config`]. If no configured or builtin pattern
    /// matches, falls back to the feature-branch template with the branch
    /// name substituted for `{BranchName}`.
    pub fn resolve(&self, config: &Config, branch_friendly_name: &str) -> CoreResult<EffectiveConfiguration> {
        let merged = self.merge_with_overrides(config)?;

        // The part of the branch name left over after the matching regex's
        // prefix (e.g. "feature/" or "hotfix/") is what {BranchName}
        // substitutes with — not the whole ref.
        let mut branch_name_suffix = branch_friendly_name.to_string();
        let matched = merged
            .iter()
            .find_map(|(_, cfg)| {
                let pattern = cfg.regex.as_ref()?;
                let re = regex::Regex::new(pattern).ok()?;
                let m = re.find(branch_friendly_name)?;
                let suffix = &branch_friendly_name[m.end()..];
                Some((cfg.clone(), suffix.to_string()))
            })
            .unwrap_or_else(|| {
                let feature = merged
                    .iter()
                    .find(|(name, _)| name == "feature")
                    .map(|(_, cfg)| cfg.clone())
                    .unwrap_or_default();
                (feature, branch_friendly_name.to_string())
            });
        let (matched, suffix) = matched;
        if !suffix.is_empty() {
            branch_name_suffix = suffix;
        }

        let tag_prefix = regex::Regex::new(config.tag_prefix())
            .map_err(|e| CoreError::config(format!("invalid tag_prefix regex: {e}")))?;

        let sanitized_suffix = sanitize_label(&branch_name_suffix);
        let label = matched
            .label
            .unwrap_or_default()
            .replace("{BranchName}", &sanitized_suffix);

        Ok(EffectiveConfiguration {
            tag_prefix,
            increment_default: matched.increment.unwrap_or(BranchIncrement::Inherit),
            mode: config.mode(),
            mainline_increment: config.mainline_increment(),
            label,
            is_release_branch: matched.is_release_branch.unwrap_or(false),
            is_mainline: matched.is_mainline.unwrap_or(false),
            prevent_increment: matched.prevent_increment.unwrap_or(false),
            tracks_release_branches: matched.tracks_release_branches.unwrap_or(false),
            source_branches: matched.source_branches,
            commit_message_convention: config.commit_message_convention(),
            pre_release_weight: matched.pre_release_weight.unwrap_or(0),
            cd_fallback_tag: config.cd_fallback_tag().to_string(),
            versioning_scheme: config.versioning_scheme(),
        })
    }

    /// Overlays the user's `config.branches` entries on top of the builtin
    /// defaults, preserving builtin declaration order and appending any
    /// user-defined branch patterns with no builtin counterpart.
    fn merge_with_overrides(&self, config: &Config) -> CoreResult<Vec<(String, BranchConfig)>> {
        let mut merged: Vec<(String, BranchConfig)> = Vec::with_capacity(self.defaults.len());
        let mut seen = std::collections::HashSet::new();

        for (name, default_cfg) in &self.defaults {
            let effective = match config.branches.get(name) {
                Some(override_cfg) => override_cfg.merged_over(default_cfg),
                None => default_cfg.clone(),
            };
            seen.insert(name.clone());
            merged.push((name.clone(), effective));
        }

        for (name, override_cfg) in &config.branches {
            if !seen.contains(name) {
                merged.push((name.clone(), override_cfg.clone()));
            }
        }

        Ok(merged)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
