use super::*;
use crate::errors::CoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

fn commit(sha: &str, parents: &[&str], message: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        parents: parents.iter().map(|s| s.to_string()).collect(),
        when: chrono::Utc::now(),
        message: message.to_string(),
    }
}

struct FakeRepo {
    tags: Vec<Tag>,
    peeled: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl RepositoryPort for FakeRepo {
    async fn head(&self) -> CoreResult<Branch> {
        Err(CoreError::repository("not needed for this test"))
    }

    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        Ok(vec![])
    }

    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        Ok(commit(sha, &[], "test"))
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
        Ok(self
            .peeled
            .lock()
            .unwrap()
            .get(tag.name.canonical())
            .cloned()
            .unwrap_or_else(|| tag.target_sha.clone()))
    }
}

#[test]
fn reference_name_friendly_strips_refs_heads_prefix() {
    let r = ReferenceName::new("refs/heads/feature/foo");
    assert_eq!(r.friendly(), "feature/foo");
}

#[test]
fn reference_name_friendly_passes_through_bare_names() {
    let r = ReferenceName::new("main");
    assert_eq!(r.friendly(), "main");
}

#[test]
fn commit_first_parent_is_none_for_root_commit() {
    let c = commit("abc123", &[], "root");
    assert_eq!(c.first_parent(), None);
}

#[test]
fn commit_first_parent_is_mainline() {
    let c = commit("abc123", &["parent1", "parent2"], "merge");
    assert_eq!(c.first_parent(), Some("parent1"));
}

#[tokio::test]
async fn version_tags_filters_out_non_matching_names() {
    let repo = FakeRepo {
        tags: vec![
            Tag {
                name: ReferenceName::new("refs/tags/v1.2.3"),
                target_sha: "sha1".into(),
            },
            Tag {
                name: ReferenceName::new("refs/tags/not-a-version"),
                target_sha: "sha2".into(),
            },
        ],
        peeled: Mutex::new(HashMap::new()),
    };
    let prefix = regex::Regex::new("^v?").unwrap();
    let tags = repo.tags().await.unwrap();
    let versions = version_tags(&repo, &tags, &prefix).await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version.to_string(), "1.2.3");
}

#[tokio::test]
async fn version_tags_peels_annotated_tags_to_commit_sha() {
    let mut peeled = HashMap::new();
    peeled.insert("refs/tags/v2.0.0".to_string(), "commitsha".to_string());
    let repo = FakeRepo {
        tags: vec![Tag {
            name: ReferenceName::new("refs/tags/v2.0.0"),
            target_sha: "tagobjectsha".into(),
        }],
        peeled: Mutex::new(peeled),
    };
    let prefix = regex::Regex::new("^v?").unwrap();
    let tags = repo.tags().await.unwrap();
    let versions = version_tags(&repo, &tags, &prefix).await.unwrap();
    assert_eq!(versions[0].commit_sha, "commitsha");
}
