use crate::artifacts::branch::ephemeral::EphemeralBranch;
use crate::artifacts::change::operation::Operation;
use crate::artifacts::change::pull_request::PullRequest;
use crate::artifacts::objects::content_hash::ContentHash;

/// Terminal artifact of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Landed directly on the base branch; `hash` is absent for deletions
    Committed {
        operation: Operation,
        path: String,
        branch: String,
        hash: Option<ContentHash>,
    },
    /// Staged on an ephemeral branch with a pull request into the base branch
    PullRequestOpened {
        operation: Operation,
        path: String,
        branch: EphemeralBranch,
        pull_request: PullRequest,
    },
}

impl SubmitOutcome {
    pub fn path(&self) -> &str {
        match self {
            SubmitOutcome::Committed { path, .. } | SubmitOutcome::PullRequestOpened { path, .. } => {
                path
            }
        }
    }

    pub fn pull_request(&self) -> Option<&PullRequest> {
        match self {
            SubmitOutcome::Committed { .. } => None,
            SubmitOutcome::PullRequestOpened { pull_request, .. } => Some(pull_request),
        }
    }
}
