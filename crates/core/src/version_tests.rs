use super::*;

#[test]
fn parses_bare_major_minor_patch() {
    let v = SemanticVersion::parse("1.2.3").unwrap();
    assert_eq!((v.major, v.minor, v.patch), (1, 2, 3));
    assert!(v.is_stable());
}

#[test]
fn parses_v_prefix_and_defaults_missing_components() {
    let v = SemanticVersion::parse("v2").unwrap();
    assert_eq!((v.major, v.minor, v.patch), (2, 0, 0));
}

#[test]
fn parses_pre_release_with_dot_separated_number() {
    let v = SemanticVersion::parse("1.2.3-beta.4").unwrap();
    assert_eq!(v.pre, PreReleaseTag::new("beta", Some(4)));
}

#[test]
fn parses_pre_release_without_dot() {
    let v = SemanticVersion::parse("1.2.3-rc1").unwrap();
    assert_eq!(v.pre.name, "rc");
    assert_eq!(v.pre.number, Some(1));
}

#[test]
fn parses_build_metadata() {
    let v = SemanticVersion::parse("1.2.3+sha.abcdef").unwrap();
    assert_eq!(v.build.0, "sha.abcdef");
}

#[test]
fn rejects_non_numeric_major() {
    assert!(SemanticVersion::parse("x.2.3").is_err());
}

#[test]
fn rejects_empty_build_metadata() {
    assert!(SemanticVersion::parse("1.2.3+").is_err());
}

#[test]
fn strict_format_round_trips() {
    let v = SemanticVersion::parse("1.2.3-beta.4+build.5").unwrap();
    let rendered = v.format(SemVerFormat::Strict);
    assert_eq!(rendered, "1.2.3-beta.4+build.5");
    let reparsed = SemanticVersion::parse(&rendered).unwrap();
    assert_eq!(v, reparsed);
}

#[test]
fn legacy_format_drops_dot_before_number() {
    let v = SemanticVersion::parse("1.2.3-beta.4").unwrap();
    assert_eq!(v.format(SemVerFormat::LegacySemVer), "1.2.3-beta4");
}

#[test]
fn legacy_padded_format_zero_pads_number() {
    let v = SemanticVersion::parse("1.2.3-beta.4").unwrap();
    assert_eq!(v.format(SemVerFormat::LegacySemVerPadded(4)), "1.2.3-beta0004");
}

#[test]
fn stable_sorts_above_pre_release_with_same_core() {
    let stable = SemanticVersion::parse("1.2.3").unwrap();
    let pre = SemanticVersion::parse("1.2.3-beta.1").unwrap();
    assert!(stable > pre);
}

#[test]
fn pre_release_name_compares_case_insensitively() {
    let a = PreReleaseTag::new("Beta", Some(1));
    let b = PreReleaseTag::new("beta", Some(1));
    assert_eq!(a, b);
}

#[test]
fn pre_release_missing_number_defaults_to_zero_for_ordering() {
    let a = PreReleaseTag::new("beta", None);
    let b = PreReleaseTag::new("beta", Some(0));
    assert_eq!(a, b);
}

#[test]
fn ordering_is_purely_numeric_by_component() {
    let a = SemanticVersion::parse("1.9.0").unwrap();
    let b = SemanticVersion::parse("1.10.0").unwrap();
    assert!(a < b);
}

#[test]
fn build_metadata_does_not_affect_equality_or_order() {
    let a = SemanticVersion::parse("1.2.3+build.1").unwrap();
    let b = SemanticVersion::parse("1.2.3+build.2").unwrap();
    assert_eq!(a, b);
}

#[test]
fn increment_major_resets_minor_and_patch() {
    let v = SemanticVersion::parse("1.2.3").unwrap();
    let next = v.increment(IncrementField::Major, false);
    assert_eq!((next.major, next.minor, next.patch), (2, 0, 0));
}

#[test]
fn increment_minor_resets_patch_only() {
    let v = SemanticVersion::parse("1.2.3").unwrap();
    let next = v.increment(IncrementField::Minor, false);
    assert_eq!((next.major, next.minor, next.patch), (1, 3, 0));
}

#[test]
fn increment_patch_leaves_major_minor() {
    let v = SemanticVersion::parse("1.2.3").unwrap();
    let next = v.increment(IncrementField::Patch, false);
    assert_eq!((next.major, next.minor, next.patch), (1, 2, 4));
}

#[test]
fn increment_none_is_a_no_op() {
    let v = SemanticVersion::parse("1.2.3-beta.1").unwrap();
    let next = v.increment(IncrementField::None, false);
    assert_eq!(v, next);
}

#[test]
fn increment_drops_pre_release_unless_preserved() {
    let v = SemanticVersion::parse("1.2.3-beta.1").unwrap();
    let dropped = v.increment(IncrementField::Patch, false);
    assert!(dropped.pre.is_empty());

    let preserved = v.increment(IncrementField::Patch, true);
    assert_eq!(preserved.pre, PreReleaseTag::new("beta", Some(1)));
}

#[test]
fn increment_always_clears_build_metadata() {
    let v = SemanticVersion::parse("1.2.3+build.1").unwrap();
    let next = v.increment(IncrementField::Patch, false);
    assert!(next.build.0.is_empty());
}
