use super::*;

#[test]
fn default_branch_is_main_on_a_fresh_commit() {
    let branch = BranchBuilder::new().build();
    assert_eq!(branch.name.friendly(), "main");
    assert!(!branch.is_remote);
    assert!(!branch.is_detached);
}

#[test]
fn with_name_sets_the_friendly_name() {
    let branch = BranchBuilder::new().with_name("release/2.0").build();
    assert_eq!(branch.name.friendly(), "release/2.0");
    assert_eq!(branch.name.canonical(), "refs/heads/release/2.0");
}

#[test]
fn detached_and_remote_flags_apply() {
    let branch = BranchBuilder::new().remote().detached().build();
    assert!(branch.is_remote);
    assert!(branch.is_detached);
}
