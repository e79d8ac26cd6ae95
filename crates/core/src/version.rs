//! Semantic version value type.
//!
//! `SemanticVersion` is deliberately not built on the `semver` crate: its
//! pre-release ordering (case-insensitive name, numeric suffix defaulting to
//! zero, empty tag sorts above any non-empty tag) is richer than
//! `semver::Prerelease`'s plain dot-separated identifier comparison.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A parsed `name[.number]` pre-release identifier.
///
/// An empty `PreReleaseTag` (the default) denotes a stable release and
/// compares greater than any non-empty tag with the same major.minor.patch.
#[derive(Debug, Clone, Default, Eq, Serialize, Deserialize)]
pub struct PreReleaseTag {
    pub name: String,
    pub number: Option<u64>,
}

impl PreReleaseTag {
    pub fn new(name: impl Into<String>, number: Option<u64>) -> Self {
        Self {
            name: name.into(),
            number,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.number.is_none()
    }

    /// The numeric component, with a missing value treated as 0 per spec §3.
    pub fn number_or_zero(&self) -> u64 {
        self.number.unwrap_or(0)
    }
}

impl fmt::Display for PreReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        write!(f, "{}", self.name)?;
        if let Some(n) = self.number {
            write!(f, ".{}", n)?;
        }
        Ok(())
    }
}

impl PartialEq for PreReleaseTag {
    fn eq(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name) && self.number_or_zero() == other.number_or_zero()
    }
}

impl PartialOrd for PreReleaseTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PreReleaseTag {
    fn cmp(&self, other: &Self) -> Ordering {
        // Empty (stable) sorts above any non-empty pre-release.
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (false, false) => {}
        }

        self.name
            .to_ascii_lowercase()
            .cmp(&other.name.to_ascii_lowercase())
            .then(self.number_or_zero().cmp(&other.number_or_zero()))
    }
}

/// Build metadata: opaque for comparison, carried verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildMetadata(pub String);

impl fmt::Display for BuildMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The field to increment; `None` is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncrementField {
    Major,
    Minor,
    Patch,
    None,
}

/// Output format variants recognized by [`SemanticVersion::format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemVerFormat {
    /// `M.m.p[-name.number][+build]`
    Strict,
    /// `M.m.p[-namenumber][+build]` — no dot between pre-release name and number.
    LegacySemVer,
    /// Like `LegacySemVer`, with the number zero-padded to the given width.
    LegacySemVerPadded(usize),
}

/// Immutable semantic version with pre-release tag and build metadata.
///
/// Comparison follows SemVer 2.0.0 precedence for major/minor/patch and
/// pre-release (§4.1 of spec.md); build metadata is ignored for ordering
/// and equality.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
pub struct SemanticVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub pre: PreReleaseTag,
    pub build: BuildMetadata,
}

impl SemanticVersion {
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: PreReleaseTag::default(),
            build: BuildMetadata::default(),
        }
    }

    pub fn with_pre(mut self, pre: PreReleaseTag) -> Self {
        self.pre = pre;
        self
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = BuildMetadata(build.into());
        self
    }

    pub fn is_stable(&self) -> bool {
        self.pre.is_empty()
    }

    /// Increments `field`, resetting lower-order fields and the pre-release
    /// tag unless `preserve_pre` is set. `None` is a no-op.
    pub fn increment(&self, field: IncrementField, preserve_pre: bool) -> Self {
        let mut next = self.clone();
        match field {
            IncrementField::Major => {
                next.major += 1;
                next.minor = 0;
                next.patch = 0;
            }
            IncrementField::Minor => {
                next.minor += 1;
                next.patch = 0;
            }
            IncrementField::Patch => {
                next.patch += 1;
            }
            IncrementField::None => {}
        }
        if !preserve_pre && field != IncrementField::None {
            next.pre = PreReleaseTag::default();
        }
        next.build = BuildMetadata::default();
        next
    }

    /// Parses `[v]M.m[.p[.r]][-pre][+build]`. `minor`/`patch` default to 0
    /// when omitted; a fourth numeric component (`revision`) is accepted and
    /// folded away (treated as build-insignificant) since the data model
    /// only tracks major.minor.patch.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let original = input;
        let s = input.strip_prefix('v').unwrap_or(input);

        let (core_and_pre, build) = match s.split_once('+') {
            Some((a, b)) => (a, Some(b)),
            None => (s, None),
        };
        let (core_part, pre) = match core_and_pre.split_once('-') {
            Some((a, b)) => (a, Some(b)),
            None => (core_and_pre, None),
        };

        let mut numbers = core_part.split('.');
        let major = numbers
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::invalid_semver(original, "missing major version"))?
            .parse::<u32>()
            .map_err(|e| CoreError::invalid_semver(original, e.to_string()))?;
        let minor = match numbers.next() {
            Some(m) => m
                .parse::<u32>()
                .map_err(|e| CoreError::invalid_semver(original, e.to_string()))?,
            None => 0,
        };
        let patch = match numbers.next() {
            Some(p) => p
                .parse::<u32>()
                .map_err(|e| CoreError::invalid_semver(original, e.to_string()))?,
            None => 0,
        };
        // Fourth component (revision), if present, must still be numeric.
        if let Some(rev) = numbers.next() {
            rev.parse::<u32>()
                .map_err(|e| CoreError::invalid_semver(original, e.to_string()))?;
        }
        if numbers.next().is_some() {
            return Err(CoreError::invalid_semver(
                original,
                "too many numeric components",
            ));
        }

        let pre_tag = match pre {
            None => PreReleaseTag::default(),
            Some(p) => parse_pre_release(p, original)?,
        };

        let build_meta = match build {
            None => BuildMetadata::default(),
            Some(b) => {
                if b.is_empty() {
                    return Err(CoreError::invalid_semver(original, "empty build metadata"));
                }
                BuildMetadata(b.to_string())
            }
        };

        Ok(Self {
            major,
            minor,
            patch,
            pre: pre_tag,
            build: build_meta,
        })
    }

    /// Renders the version in the requested format. Round-trips with
    /// [`SemanticVersion::parse`] for the `Strict` format.
    pub fn format(&self, format: SemVerFormat) -> String {
        let mut out = format!("{}.{}.{}", self.major, self.minor, self.patch);
        if !self.pre.is_empty() {
            match format {
                SemVerFormat::Strict => {
                    out.push('-');
                    out.push_str(&self.pre.to_string());
                }
                SemVerFormat::LegacySemVer => {
                    out.push('-');
                    out.push_str(&self.pre.name);
                    if let Some(n) = self.pre.number {
                        out.push_str(&n.to_string());
                    }
                }
                SemVerFormat::LegacySemVerPadded(width) => {
                    out.push('-');
                    out.push_str(&self.pre.name);
                    out.push_str(&format!("{:0width$}", self.pre.number_or_zero(), width = width));
                }
            }
        }
        if !self.build.0.is_empty() {
            out.push('+');
            out.push_str(&self.build.0);
        }
        out
    }
}

fn parse_pre_release(raw: &str, original: &str) -> Result<PreReleaseTag, CoreError> {
    if raw.is_empty() {
        return Err(CoreError::invalid_semver(original, "empty pre-release tag"));
    }
    match raw.split_once('.') {
        Some((name, number)) => {
            let n = number
                .parse::<u64>()
                .map_err(|_| CoreError::invalid_semver(original, "pre-release suffix is not numeric"))?;
            Ok(PreReleaseTag::new(name, Some(n)))
        }
        None => {
            // Split a trailing run of digits off an alphanumeric pre-release
            // name, e.g. "alpha1" -> ("alpha", Some(1)), matching the way
            // CI-friendly / legacy tags are written without a dot.
            let split_at = raw
                .char_indices()
                .rev()
                .take_while(|(_, c)| c.is_ascii_digit())
                .last()
                .map(|(i, _)| i);
            match split_at {
                Some(i) if i > 0 => {
                    let (name, digits) = raw.split_at(i);
                    let n = digits.parse::<u64>().ok();
                    Ok(PreReleaseTag::new(name, n))
                }
                _ => Ok(PreReleaseTag::new(raw, None)),
            }
        }
    }
}

impl FromStr for SemanticVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(SemVerFormat::Strict))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.major == other.major
            && self.minor == other.minor
            && self.patch == other.patch
            && self.pre == other.pre
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then(self.pre.cmp(&other.pre))
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
