use crate::artifacts::change::operation::Operation;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::remote_file::Content;

/// One user action, consumed exactly once by the submitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub operation: Operation,
    pub path: String,
    pub content: Option<Content>,
    pub message: String,
    pub base_branch: String,
}

impl ChangeRequest {
    pub fn create(
        path: impl Into<String>,
        body: impl Into<Content>,
        message: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self::with_content(Operation::Create, path, Some(body.into()), message, base_branch)
    }

    pub fn update(
        path: impl Into<String>,
        body: impl Into<Content>,
        message: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self::with_content(Operation::Update, path, Some(body.into()), message, base_branch)
    }

    pub fn upload(
        path: impl Into<String>,
        data: impl Into<Content>,
        message: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self::with_content(Operation::Upload, path, Some(data.into()), message, base_branch)
    }

    pub fn delete(
        path: impl Into<String>,
        message: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self::with_content(Operation::Delete, path, None, message, base_branch)
    }

    fn with_content(
        operation: Operation,
        path: impl Into<String>,
        content: Option<Content>,
        message: impl Into<String>,
        base_branch: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            path: path.into(),
            content,
            message: message.into(),
            base_branch: base_branch.into(),
        }
    }
}

/// A validated change ready to be applied to one branch
///
/// `expected_hash` is the version token the write must present: absent for
/// creations, mandatory for updates and deletions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChange {
    pub operation: Operation,
    pub path: String,
    pub content: Option<Content>,
    pub expected_hash: Option<ContentHash>,
    pub message: String,
}

impl StagedChange {
    pub fn from_request(request: &ChangeRequest, path: String) -> Self {
        Self {
            operation: request.operation,
            path,
            content: request.content.clone(),
            expected_hash: None,
            message: request.message.clone(),
        }
    }

    pub fn with_expected_hash(mut self, expected_hash: Option<ContentHash>) -> Self {
        self.expected_hash = expected_hash;
        self
    }
}
