//! Test data builders for creating realistic commits, branches, tags, and
//! configuration documents.

pub mod branch_builder;
pub mod commit_builder;
pub mod config_builder;
pub mod tag_builder;

pub use branch_builder::BranchBuilder;
pub use commit_builder::CommitBuilder;
pub use config_builder::ConfigBuilder;
pub use tag_builder::TagBuilder;

/// Common builder-pattern contract: consume `self` to produce the target
/// type, or reset back to defaults.
pub trait TestDataBuilder<T> {
    fn build(self) -> T;
    fn reset(self) -> Self;
}

/// Realistic-looking filler values, for fields a test doesn't care about.
pub mod helpers {
    use chrono::{DateTime, Utc};
    use rand::Rng;

    /// A 40-character hexadecimal git SHA.
    pub fn generate_git_sha() -> String {
        let mut rng = rand::thread_rng();
        (0..40)
            .map(|_| {
                let hex_chars = b"0123456789abcdef";
                hex_chars[rng.gen_range(0..16)] as char
            })
            .collect()
    }

    pub fn generate_github_login() -> String {
        let adjectives = ["happy", "clever", "bright", "swift", "gentle"];
        let nouns = ["cat", "dog", "bird", "fish", "bear"];
        let mut rng = rand::thread_rng();
        format!(
            "{}{}{}",
            adjectives[rng.gen_range(0..adjectives.len())],
            nouns[rng.gen_range(0..nouns.len())],
            rng.gen_range(100..999)
        )
    }

    pub fn generate_email() -> String {
        format!("{}@example.com", generate_github_login())
    }

    /// A timestamp somewhere in the last 30 days, so ordering-sensitive
    /// tests see distinct values without hardcoding dates.
    pub fn generate_recent_timestamp() -> DateTime<Utc> {
        let mut rng = rand::thread_rng();
        let minutes_ago = rng.gen_range(0..43_200);
        Utc::now() - chrono::Duration::minutes(minutes_ago)
    }
}
