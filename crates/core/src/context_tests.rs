use super::*;
use crate::repository::{PathFilter, ReferenceName, Tag};
use async_trait::async_trait;

fn commit(sha: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        parents: vec![],
        when: chrono::Utc::now(),
        message: "test".to_string(),
    }
}

fn branch(name: &str, tip_sha: &str) -> Branch {
    Branch {
        name: ReferenceName::new(format!("refs/heads/{name}")),
        tip: commit(tip_sha),
        is_remote: false,
        is_detached: false,
    }
}

struct FakeRepo {
    head: Branch,
    branches: Vec<Branch>,
}

#[async_trait]
impl RepositoryPort for FakeRepo {
    async fn head(&self) -> CoreResult<Branch> {
        Ok(self.head.clone())
    }

    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        Ok(self.branches.clone())
    }

    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        Ok(vec![])
    }

    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        Ok(commit(sha))
    }

    async fn commit_log(
        &self,
        _from: Option<&str>,
        _to: &str,
        _path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        Ok(vec![])
    }

    async fn mainline_log(
        &self,
        _from: Option<&str>,
        _to: &str,
        _path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        Ok(vec![])
    }

    async fn commits_prior_to(
        &self,
        _cutoff_time: chrono::DateTime<chrono::Utc>,
        _branch: &str,
    ) -> CoreResult<Vec<Commit>> {
        Ok(vec![])
    }

    async fn find_merge_base(&self, _a: &str, _b: &str) -> CoreResult<Option<String>> {
        Ok(None)
    }

    async fn branches_containing(&self, _sha: &str) -> CoreResult<Vec<Branch>> {
        Ok(vec![])
    }

    async fn uncommitted_changes(&self) -> CoreResult<u32> {
        Ok(0)
    }

    async fn peel_tag(&self, tag: &Tag) -> CoreResult<String> {
        Ok(tag.target_sha.clone())
    }
}

#[tokio::test]
async fn implicit_branch_resolves_to_head() {
    let repo = FakeRepo {
        head: branch("main", "sha1"),
        branches: vec![],
    };
    let config = Config::default();
    let ctx = Context::resolve(&repo, &config, &ContextOptions::default())
        .await
        .unwrap();

    assert_eq!(ctx.current_branch.name.friendly(), "main");
    assert_eq!(ctx.current_commit.sha, "sha1");
    assert!(ctx.effective.is_mainline);
}

#[tokio::test]
async fn explicit_branch_override_is_looked_up_by_friendly_name() {
    let repo = FakeRepo {
        head: branch("main", "sha1"),
        branches: vec![branch("develop", "sha2")],
    };
    let config = Config::default();
    let options = ContextOptions {
        target_branch: Some("develop".to_string()),
        commit_id: None,
    };
    let ctx = Context::resolve(&repo, &config, &options).await.unwrap();

    assert_eq!(ctx.current_branch.name.friendly(), "develop");
    assert_eq!(ctx.current_commit.sha, "sha2");
    assert_eq!(ctx.effective.label, "alpha");
}

#[tokio::test]
async fn explicit_commit_override_wins_over_branch_tip() {
    let repo = FakeRepo {
        head: branch("main", "sha1"),
        branches: vec![],
    };
    let config = Config::default();
    let options = ContextOptions {
        target_branch: None,
        commit_id: Some("othersha".to_string()),
    };
    let ctx = Context::resolve(&repo, &config, &options).await.unwrap();
    assert_eq!(ctx.current_commit.sha, "othersha");
}

#[tokio::test]
async fn unknown_explicit_branch_is_an_invalid_reference_error() {
    let repo = FakeRepo {
        head: branch("main", "sha1"),
        branches: vec![],
    };
    let config = Config::default();
    let options = ContextOptions {
        target_branch: Some("ghost".to_string()),
        commit_id: None,
    };
    let err = Context::resolve(&repo, &config, &options).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidReference { .. }));
}

#[tokio::test]
async fn unrecognized_branch_name_still_resolves_via_feature_template() {
    let repo = FakeRepo {
        head: branch("exploratory-spike", "sha1"),
        branches: vec![],
    };
    let config = Config::default();
    let ctx = Context::resolve(&repo, &config, &ContextOptions::default())
        .await
        .unwrap();
    assert_eq!(ctx.effective.label, "exploratory-spike");
}
