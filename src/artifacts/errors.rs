//! Error taxonomy for remote repository operations and submissions
//!
//! Every remote call fails with one [`RemoteError`] kind. The change submitter
//! wraps those errors in a [`SubmitError`] naming the stage that issued the call,
//! so the user sees a single message such as `precheck: docs/a.md not found on main`.

use crate::artifacts::change::stage::Stage;

/// Coarse classification of a [`RemoteError`], cheap to copy and compare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    NotFound,
    Conflict,
    AlreadyExists,
    Validation,
    StaleState,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// Missing or rejected credential (401/403)
    #[error("authentication failed: {0}")]
    Auth(String),
    /// Path or branch absent
    #[error("{0}")]
    NotFound(String),
    /// The expected content hash no longer matches the server's version
    #[error("conflict: {0}")]
    Conflict(String),
    /// Duplicate create target or branch name
    #[error("{0}")]
    AlreadyExists(String),
    /// Malformed request, rejected before or by the server
    #[error("invalid request: {0}")]
    Validation(String),
    /// The target disappeared between listing and submission
    #[error("{0}")]
    StaleState(String),
    /// Network failure, timeout or unexpected server status
    #[error("transport error: {0}")]
    Transport(String),
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoteError::Auth(_) => ErrorKind::Auth,
            RemoteError::NotFound(_) => ErrorKind::NotFound,
            RemoteError::Conflict(_) => ErrorKind::Conflict,
            RemoteError::AlreadyExists(_) => ErrorKind::AlreadyExists,
            RemoteError::Validation(_) => ErrorKind::Validation,
            RemoteError::StaleState(_) => ErrorKind::StaleState,
            RemoteError::Transport(_) => ErrorKind::Transport,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            RemoteError::Transport(format!("request timed out: {error}"))
        } else {
            RemoteError::Transport(error.to_string())
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// A failed submission: the originating error plus the stage that raised it
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage}: {source}")]
pub struct SubmitError {
    pub stage: Stage,
    #[source]
    pub source: RemoteError,
}

impl SubmitError {
    pub fn new(stage: Stage, source: RemoteError) -> Self {
        Self { stage, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }
}
