use derive_new::new;

pub const PULL_REQUEST_BODY: &str = "This pull request was opened by the documentation editor.\n\n\
    Review the change and merge it to publish, or close it to discard. \
    The source branch can be deleted once the pull request is merged or closed.";

/// Deterministic title: `{prefix}: {Action} {path}`
pub fn pull_request_title(prefix: &str, action: &str, path: &str) -> String {
    format!("{prefix}: {action} {path}")
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub url: String,
}
