use super::*;
use crate::config::{Builder, Config};
use crate::repository::{Branch, Commit, PathFilter, ReferenceName, RepositoryPort, Tag};
use async_trait::async_trait;
use std::collections::HashMap;

fn commit(sha: &str, message: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        parents: vec![],
        when: chrono::Utc::now(),
        message: message.to_string(),
    }
}

fn branch(name: &str, tip_sha: &str) -> Branch {
    Branch {
        name: ReferenceName::new(format!("refs/heads/{name}")),
        tip: commit(tip_sha, ""),
        is_remote: false,
        is_detached: false,
    }
}

#[derive(Default)]
struct FakeRepo {
    tags: Vec<Tag>,
    // sha -> ancestors reachable from it, used by find_merge_base stand-in.
    reachable_from: HashMap<String, Vec<String>>,
    mainline: Vec<Commit>,
}

#[async_trait]
impl RepositoryPort for FakeRepo {
    async fn head(&self) -> CoreResult<Branch> {
        Ok(branch("main", "head"))
    }

    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        Ok(vec![])
    }

    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        Ok(commit(sha, ""))
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
        Ok(self.mainline.clone())
    }

    async fn commits_prior_to(
        &self,
        _cutoff_time: chrono::DateTime<chrono::Utc>,
        _branch: &str,
    ) -> CoreResult<Vec<Commit>> {
        Ok(vec![])
    }

    async fn find_merge_base(&self, a: &str, b: &str) -> CoreResult<Option<String>> {
        if self
            .reachable_from
            .get(b)
            .map(|ancestors| ancestors.contains(&a.to_string()))
            .unwrap_or(false)
        {
            Ok(Some(a.to_string()))
        } else {
            Ok(None)
        }
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

fn tag(friendly: &str, target_sha: &str) -> Tag {
    Tag {
        name: ReferenceName::new(format!("refs/tags/{friendly}")),
        target_sha: target_sha.to_string(),
    }
}

async fn build_context<'a>(repo: &'a FakeRepo, config: &'a Config, branch_name: &str, commit_sha: &str) -> Context<'a> {
    let effective = Builder::new().resolve(config, branch_name).unwrap();
    Context {
        repo,
        config,
        current_branch: branch(branch_name, commit_sha),
        current_commit: commit(commit_sha, ""),
        effective,
    }
}

#[tokio::test]
async fn tagged_commit_wins_with_should_increment_false_when_tag_is_head() {
    let repo = FakeRepo {
        tags: vec![tag("v1.0.0", "sha1")],
        ..Default::default()
    };
    let config = Config::default();
    let ctx = build_context(&repo, &config, "main", "sha1").await;

    let candidates = Strategy::TaggedCommit
        .candidates(&ctx, &ctx.effective)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].semver.to_string(), "1.0.0");
    assert!(!candidates[0].should_increment);
}

#[tokio::test]
async fn tagged_commit_sets_should_increment_true_when_tag_is_ancestor() {
    let mut reachable_from = HashMap::new();
    reachable_from.insert("sha2".to_string(), vec!["sha1".to_string()]);
    let repo = FakeRepo {
        tags: vec![tag("v1.0.0", "sha1")],
        reachable_from,
        ..Default::default()
    };
    let config = Config::default();
    let ctx = build_context(&repo, &config, "main", "sha2").await;

    let candidates = Strategy::TaggedCommit
        .candidates(&ctx, &ctx.effective)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert!(candidates[0].should_increment);
}

#[tokio::test]
async fn config_next_version_is_skipped_when_current_commit_is_tagged() {
    let repo = FakeRepo {
        tags: vec![tag("v1.0.0", "sha1")],
        ..Default::default()
    };
    let mut config = Config::default();
    config.next_version = Some("2.0.0".to_string());
    let ctx = build_context(&repo, &config, "main", "sha1").await;

    let candidates = Strategy::ConfigNextVersion
        .candidates(&ctx, &ctx.effective)
        .await
        .unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn config_next_version_emits_candidate_when_untagged() {
    let repo = FakeRepo::default();
    let mut config = Config::default();
    config.next_version = Some("2.0.0".to_string());
    let ctx = build_context(&repo, &config, "main", "sha1").await;

    let candidates = Strategy::ConfigNextVersion
        .candidates(&ctx, &ctx.effective)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].semver.to_string(), "2.0.0");
    assert!(!candidates[0].should_increment);
}

#[tokio::test]
async fn version_in_branch_name_extracts_major_minor_patch() {
    let repo = FakeRepo::default();
    let config = Config::default();
    let ctx = build_context(&repo, &config, "release/2.3.1", "sha1").await;

    let candidates = Strategy::VersionInBranchName.candidates(&ctx, &ctx.effective).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].semver.to_string(), "2.3.1");
    assert!(!candidates[0].should_increment);
}

#[tokio::test]
async fn version_in_branch_name_is_empty_when_no_version_suffix() {
    let repo = FakeRepo::default();
    let config = Config::default();
    let ctx = build_context(&repo, &config, "feature/login", "sha1").await;

    let candidates = Strategy::VersionInBranchName.candidates(&ctx, &ctx.effective).await.unwrap();
    assert!(candidates.is_empty());
}

#[tokio::test]
async fn merge_message_extracts_version_from_release_merge_commit() {
    let repo = FakeRepo {
        mainline: vec![commit("mergesha", "Merge branch 'release/1.4.0'")],
        ..Default::default()
    };
    let config = Config::default();
    let ctx = build_context(&repo, &config, "main", "headsha").await;

    let candidates = Strategy::MergeMessage.candidates(&ctx, &ctx.effective).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].semver.to_string(), "1.4.0");
    assert_eq!(candidates[0].source_sha.as_deref(), Some("mergesha"));
}

#[tokio::test]
async fn fallback_always_emits_base_version_with_root_source_sha() {
    let repo = FakeRepo::default();
    let config = Config::default();
    let ctx = build_context(&repo, &config, "main", "sha1").await;

    let candidates = Strategy::Fallback.candidates(&ctx, &ctx.effective).await.unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].semver.to_string(), "0.1.0");
    assert_eq!(candidates[0].source_sha.as_deref(), Some("root"));
    assert!(candidates[0].should_increment);
}

#[test]
fn priority_order_matches_spec_tie_break() {
    assert!(priority("NextVersion") < priority("TaggedCommit"));
    assert!(priority("TaggedCommit") < priority("BranchName"));
    assert!(priority("BranchName") < priority("MergeMessage"));
    assert!(priority("MergeMessage") < priority("Fallback"));
}
