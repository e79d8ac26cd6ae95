use thiserror::Error;

/// Errors raised by the local on-disk repository adapter.
#[derive(Error, Debug)]
pub enum Error {
    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("repository not found at '{path}'")]
    NotFound { path: String },

    #[error("blocking git task panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type GitResult<T> = Result<T, Error>;
