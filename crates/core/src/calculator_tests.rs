use super::*;
use crate::config::{Builder, CommitMessageConvention, Config, MainlineIncrement, Mode};
use crate::repository::{Branch, Commit, PathFilter, ReferenceName, RepositoryPort, Tag};
use async_trait::async_trait;

fn mk_commit(sha: &str, parents: &[&str], message: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        parents: parents.iter().map(|s| s.to_string()).collect(),
        when: chrono::Utc::now(),
        message: message.to_string(),
    }
}

struct ScenarioRepo {
    tags: Vec<Tag>,
    /// All commits, newest-first, forming a single linear mainline.
    commits: Vec<Commit>,
}

impl ScenarioRepo {
    fn commits_between(&self, from: Option<&str>, to: &str) -> Vec<Commit> {
        let to_idx = self.commits.iter().position(|c| c.sha == to).unwrap_or(0);
        let from_idx = from.and_then(|f| self.commits.iter().position(|c| c.sha == f));
        match from_idx {
            Some(idx) if idx >= to_idx => self.commits[to_idx..idx].to_vec(),
            _ => self.commits[to_idx..].to_vec(),
        }
    }
}

#[async_trait]
impl RepositoryPort for ScenarioRepo {
    async fn head(&self) -> CoreResult<Branch> {
        Ok(Branch {
            name: ReferenceName::new("refs/heads/main"),
            tip: self.commits.first().cloned().unwrap(),
            is_remote: false,
            is_detached: false,
        })
    }

    async fn branches(&self) -> CoreResult<Vec<Branch>> {
        Ok(vec![])
    }

    async fn tags(&self) -> CoreResult<Vec<Tag>> {
        Ok(self.tags.clone())
    }

    async fn commit(&self, sha: &str) -> CoreResult<Commit> {
        Ok(self
            .commits
            .iter()
            .find(|c| c.sha == sha)
            .cloned()
            .unwrap_or_else(|| mk_commit(sha, &[], "")))
    }

    async fn commit_log(
        &self,
        from: Option<&str>,
        to: &str,
        _path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        Ok(self.commits_between(from, to))
    }

    async fn mainline_log(
        &self,
        from: Option<&str>,
        to: &str,
        _path_filter: Option<&PathFilter>,
    ) -> CoreResult<Vec<Commit>> {
        Ok(self.commits_between(from, to))
    }

    async fn commits_prior_to(
        &self,
        _cutoff_time: chrono::DateTime<chrono::Utc>,
        _branch: &str,
    ) -> CoreResult<Vec<Commit>> {
        Ok(vec![])
    }

    async fn find_merge_base(&self, a: &str, _b: &str) -> CoreResult<Option<String>> {
        // Linear history stand-in: everything in `commits` is an ancestor.
        if self.commits.iter().any(|c| c.sha == a) {
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

fn tag(friendly: &str, sha: &str) -> Tag {
    Tag {
        name: ReferenceName::new(format!("refs/tags/{friendly}")),
        target_sha: sha.to_string(),
    }
}

async fn run(repo: &ScenarioRepo, config: &Config, branch: &str) -> CalculationResult {
    let effective = Builder::new().resolve(config, branch).unwrap();
    let ctx = Context {
        repo,
        config,
        current_branch: Branch {
            name: ReferenceName::new(format!("refs/heads/{branch}")),
            tip: repo.commits.first().cloned().unwrap(),
            is_remote: false,
            is_detached: false,
        },
        current_commit: repo.commits.first().cloned().unwrap(),
        effective,
    };
    calculate(&ctx).await.unwrap()
}

#[tokio::test]
async fn scenario_fallback_no_tags() {
    let repo = ScenarioRepo {
        tags: vec![],
        commits: vec![mk_commit("c2", &["c1"], "second"), mk_commit("c1", &[], "first")],
    };
    let config = Config::default();
    let result = run(&repo, &config, "main").await;

    assert_eq!(result.version.major, 0);
    assert_eq!(result.version.minor, 1);
    assert_eq!(result.version.patch, 0);
    assert!(result.version.is_stable());
    assert_eq!(result.commits_since_version_source, 2);
}

#[tokio::test]
async fn scenario_tagged_head() {
    let repo = ScenarioRepo {
        tags: vec![tag("v1.0.0", "c1")],
        commits: vec![mk_commit("c1", &[], "first")],
    };
    let config = Config::default();
    let result = run(&repo, &config, "main").await;

    assert_eq!(result.version.to_string(), "1.0.0");
    assert_eq!(result.commits_since_version_source, 0);
    assert!(!result.winning_candidate.should_increment);
}

#[tokio::test]
async fn scenario_conventional_feat() {
    let repo = ScenarioRepo {
        tags: vec![tag("v1.0.0", "c1")],
        commits: vec![mk_commit("c2", &["c1"], "feat: add auth"), mk_commit("c1", &[], "init")],
    };
    let mut config = Config::default();
    config.commit_message_convention = Some(CommitMessageConvention::ConventionalCommits);
    let result = run(&repo, &config, "main").await;

    assert_eq!((result.version.major, result.version.minor, result.version.patch), (1, 1, 0));
}

#[tokio::test]
async fn scenario_breaking_footer() {
    let repo = ScenarioRepo {
        tags: vec![tag("v1.0.0", "c1")],
        commits: vec![
            mk_commit("c2", &["c1"], "feat: change\n\nBREAKING CHANGE: x"),
            mk_commit("c1", &[], "init"),
        ],
    };
    let mut config = Config::default();
    config.commit_message_convention = Some(CommitMessageConvention::ConventionalCommits);
    let result = run(&repo, &config, "main").await;

    assert_eq!((result.version.major, result.version.minor, result.version.patch), (2, 0, 0));
}

#[tokio::test]
async fn scenario_feature_branch_carries_label_in_prerelease() {
    let repo = ScenarioRepo {
        tags: vec![tag("v1.0.0", "c1")],
        commits: vec![mk_commit("c2", &["c1"], "feat: add login"), mk_commit("c1", &[], "init")],
    };
    let config = Config::default();
    let result = run(&repo, &config, "feature/login").await;

    assert!(!result.version.pre.is_empty());
    assert_eq!(result.version.pre.name, "login");
}

#[tokio::test]
async fn scenario_mainline_each_commit_applies_sequentially() {
    let repo = ScenarioRepo {
        tags: vec![tag("v1.0.0", "c1")],
        commits: vec![
            mk_commit("c5", &["c4"], "fix: d"),
            mk_commit("c4", &["c3"], "feat: c"),
            mk_commit("c3", &["c2"], "fix: b"),
            mk_commit("c2", &["c1"], "fix: a"),
            mk_commit("c1", &[], "init"),
        ],
    };
    let mut config = Config::default();
    config.mode = Some(Mode::Mainline);
    config.mainline_increment = Some(MainlineIncrement::EachCommit);
    config.commit_message_convention = Some(CommitMessageConvention::ConventionalCommits);
    let result = run(&repo, &config, "main").await;

    assert_eq!(result.version.to_string(), "1.1.1");
}

#[tokio::test]
async fn scenario_bump_directive_skip_still_applies_branch_default() {
    let repo = ScenarioRepo {
        tags: vec![tag("v1.0.0", "c1")],
        commits: vec![
            mk_commit("c2", &["c1"], "docs: update +semver: skip"),
            mk_commit("c1", &[], "init"),
        ],
    };
    let config = Config::default();
    let result = run(&repo, &config, "main").await;

    assert_eq!(result.version.to_string(), "1.0.1");
}

#[test]
fn select_winner_breaks_ties_by_strategy_priority() {
    let candidates = vec![
        BaseVersionCandidate {
            semver: SemanticVersion::new(1, 0, 0),
            source: "Fallback",
            source_sha: Some("root".to_string()),
            should_increment: true,
        },
        BaseVersionCandidate {
            semver: SemanticVersion::new(1, 0, 0),
            source: "TaggedCommit",
            source_sha: Some("sha1".to_string()),
            should_increment: false,
        },
    ];
    let winner = select_winner(&candidates);
    assert_eq!(winner.source, "TaggedCommit");
}

#[test]
fn select_winner_picks_the_greatest_semver_regardless_of_source() {
    let candidates = vec![
        BaseVersionCandidate {
            semver: SemanticVersion::new(1, 0, 0),
            source: "TaggedCommit",
            source_sha: Some("sha1".to_string()),
            should_increment: false,
        },
        BaseVersionCandidate {
            semver: SemanticVersion::new(2, 0, 0),
            source: "BranchName",
            source_sha: None,
            should_increment: false,
        },
    ];
    let winner = select_winner(&candidates);
    assert_eq!(winner.source, "BranchName");
}
