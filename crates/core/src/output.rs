//! Output formatting: projects a [`crate::calculator::CalculationResult`]
//! plus commit metadata into the named variable map from spec.md §6, and
//! renders the explain trace.

use std::collections::BTreeMap;

use crate::calculator::CalculationResult;
use crate::context::Context;
use crate::version::SemVerFormat;

const BUILD_METADATA_PAD_WIDTH: usize = 4;

/// Builds the complete named-variable map for a calculation result.
/// Ordered (`BTreeMap`) so `--output json`/`buildserver` renders
/// deterministically.
pub fn variables(ctx: &Context<'_>, result: &CalculationResult) -> BTreeMap<String, String> {
    let version = &result.version;
    let sha = &ctx.current_commit.sha;
    let short_sha = &sha[..sha.len().min(7)];
    let branch_name = ctx.current_branch.name.friendly().to_string();
    let escaped_branch_name = escape_branch_name(&branch_name);

    let commits_since = result.commits_since_version_source;
    let build_metadata = commits_since.to_string();
    let build_metadata_padded = format!("{commits_since:0width$}", width = BUILD_METADATA_PAD_WIDTH);
    let full_build_metadata = format!(
        "{build_metadata}.Branch.{escaped_branch_name}.Sha.{sha}"
    );

    let pre_release_tag = version.pre.to_string();
    let pre_release_tag_with_dash = if pre_release_tag.is_empty() {
        String::new()
    } else {
        format!("-{pre_release_tag}")
    };
    let pre_release_label = version.pre.name.clone();
    let pre_release_label_with_dash = if pre_release_label.is_empty() {
        String::new()
    } else {
        format!("-{pre_release_label}")
    };
    let pre_release_number = version.pre.number.map(|n| n.to_string()).unwrap_or_default();
    let weighted_pre_release_number =
        (ctx.effective.pre_release_weight as u64 + version.pre.number_or_zero()).to_string();

    let mut vars = BTreeMap::new();
    vars.insert("Major".into(), version.major.to_string());
    vars.insert("Minor".into(), version.minor.to_string());
    vars.insert("Patch".into(), version.patch.to_string());
    vars.insert(
        "MajorMinorPatch".into(),
        format!("{}.{}.{}", version.major, version.minor, version.patch),
    );
    vars.insert("SemVer".into(), version.format(SemVerFormat::Strict));
    vars.insert(
        "FullSemVer".into(),
        format!("{}+{build_metadata}", version.format(SemVerFormat::Strict)),
    );
    vars.insert("LegacySemVer".into(), version.format(SemVerFormat::LegacySemVer));
    vars.insert(
        "LegacySemVerPadded".into(),
        version.format(SemVerFormat::LegacySemVerPadded(BUILD_METADATA_PAD_WIDTH)),
    );
    vars.insert(
        "InformationalVersion".into(),
        format!(
            "{}+Branch.{escaped_branch_name}.Sha.{sha}",
            version.format(SemVerFormat::Strict)
        ),
    );
    vars.insert("BranchName".into(), branch_name.clone());
    vars.insert("EscapedBranchName".into(), escaped_branch_name.clone());
    vars.insert("Sha".into(), sha.to_string());
    vars.insert("ShortSha".into(), short_sha.to_string());
    vars.insert("CommitDate".into(), ctx.current_commit.when.to_rfc3339());
    vars.insert(
        "CommitTag".into(),
        result
            .winning_candidate
            .source_sha
            .clone()
            .filter(|_| result.winning_candidate.source == "TaggedCommit")
            .unwrap_or_default(),
    );
    vars.insert(
        "VersionSourceSha".into(),
        result.winning_candidate.source_sha.clone().unwrap_or_default(),
    );
    vars.insert("CommitsSinceVersionSource".into(), commits_since.to_string());
    vars.insert(
        "CommitsSinceVersionSourcePadded".into(),
        format!("{commits_since:0width$}", width = BUILD_METADATA_PAD_WIDTH),
    );
    vars.insert("BuildMetaData".into(), build_metadata);
    vars.insert("BuildMetaDataPadded".into(), build_metadata_padded);
    vars.insert("FullBuildMetaData".into(), full_build_metadata);
    vars.insert("PreReleaseTag".into(), pre_release_tag);
    vars.insert("PreReleaseTagWithDash".into(), pre_release_tag_with_dash);
    vars.insert("PreReleaseLabel".into(), pre_release_label);
    vars.insert("PreReleaseLabelWithDash".into(), pre_release_label_with_dash);
    vars.insert("PreReleaseNumber".into(), pre_release_number);
    vars.insert("WeightedPreReleaseNumber".into(), weighted_pre_release_number);
    vars.insert(
        "AssemblySemVer".into(),
        format!("{}.{}.{}.0", version.major, version.minor, version.patch),
    );
    vars.insert(
        "AssemblySemFileVer".into(),
        format!("{}.{}.{}.0", version.major, version.minor, version.patch),
    );
    vars.insert(
        "AssemblyInformationalVersion".into(),
        format!(
            "{}+Branch.{escaped_branch_name}.Sha.{sha}",
            version.format(SemVerFormat::Strict)
        ),
    );
    let nuget_version = version.format(SemVerFormat::LegacySemVer);
    vars.insert("NuGetVersion".into(), nuget_version.clone());
    vars.insert("NuGetVersionV2".into(), nuget_version);
    vars.insert(
        "NuGetPreReleaseTag".into(),
        version.pre.name.clone(),
    );
    vars.insert(
        "NuGetPreReleaseTagV2".into(),
        version.pre.name.clone(),
    );
    vars.insert(
        "UncommittedChanges".into(),
        String::new(), // filled in by the caller once `uncommitted_changes()` resolves
    );

    apply_variable_overrides(&mut vars, ctx);
    vars
}

fn apply_variable_overrides(vars: &mut BTreeMap<String, String>, ctx: &Context<'_>) {
    for (canonical, renamed) in &ctx.config.variable_overrides {
        if let Some(value) = vars.remove(canonical) {
            vars.insert(renamed.clone(), value);
        }
    }
}

/// Replaces `/`, `_`, and any non-alphanumeric character with `-`.
pub fn escape_branch_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect()
}

/// A single strategy's evaluation, rendered for the explain trace.
pub struct ExplainTrace<'a> {
    pub result: &'a CalculationResult,
}

impl<'a> ExplainTrace<'a> {
    /// Renders the multi-section human-readable report from spec.md §4.J.
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("Strategies evaluated:\n");
        for evaluation in &self.result.evaluations {
            out.push_str(&format!("  {:?}:\n", evaluation.strategy));
            if evaluation.candidates.is_empty() {
                out.push_str("    (no candidates)\n");
            }
            for candidate in &evaluation.candidates {
                out.push_str(&format!(
                    "    {} (should_increment={}, source_sha={})\n",
                    candidate.semver,
                    candidate.should_increment,
                    candidate.source_sha.as_deref().unwrap_or("-"),
                ));
            }
        }

        out.push_str("Selected:\n");
        out.push_str(&format!(
            "  {} from {}\n",
            self.result.winning_candidate.semver, self.result.winning_candidate.source
        ));

        out.push_str("Increment:\n");
        out.push_str(&format!(
            "  commits since version source: {}\n",
            self.result.commits_since_version_source
        ));

        out.push_str("Pre-release:\n");
        out.push_str(&format!("  {}\n", self.result.version.pre));

        out.push_str("Result:\n");
        out.push_str(&format!("  {}\n", self.result.version));

        out
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
