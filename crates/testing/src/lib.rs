//! Testing infrastructure for nextver.
//!
//! Provides mock implementations of the core ports plus builders for
//! realistic test data, so that `nextver-core` and `nextver-cli` tests don't
//! need a real git repository or a live GitHub API.
//!
//! # Mock port implementations
//!
//! ```
//! use nextver_testing::mocks::MockRepositoryPort;
//! use nextver_testing::builders::{CommitBuilder, TestDataBuilder};
//!
//! let commit = CommitBuilder::new()
//!     .with_conventional_message("feat", "add parser")
//!     .build();
//!
//! let repo = MockRepositoryPort::new().with_commit(commit);
//! ```
//!
//! # Test data builders
//!
//! ```
//! use nextver_testing::builders::{ConfigBuilder, TestDataBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .with_tag_prefix("^ver")
//!     .build();
//! ```

pub mod builders;
pub mod mocks;

pub use builders::TestDataBuilder;
pub use mocks::{MockConfigurationProvider, MockRepositoryPort};
