//! JSON payloads of the GitHub REST API
//!
//! Only the fields the editor reads or writes are modelled; unknown fields are
//! ignored on deserialization.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    pub sha: String,
}

/// `GET /repos/{repo}/git/ref/heads/{branch}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefResponse {
    #[serde(rename = "ref")]
    pub full_ref: String,
    pub object: ObjectRef,
}

/// `GET /repos/{repo}/git/commits/{sha}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResponse {
    pub sha: String,
    pub tree: ObjectRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeItem {
    pub path: String,
    #[serde(rename = "type")]
    pub object_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// `GET /repos/{repo}/git/trees/{sha}?recursive=1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeResponse {
    pub sha: String,
    pub tree: Vec<TreeItem>,
    #[serde(default)]
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContents {
    #[serde(rename = "type")]
    pub object_type: String,
    pub path: String,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
}

/// `GET /repos/{repo}/git/blobs/{sha}`, the fallback for files too large to inline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobResponse {
    pub sha: String,
    pub content: String,
    pub encoding: String,
}

/// `GET /repos/{repo}/contents/{path}?ref={branch}`
///
/// A file path yields an object; a directory path yields an array of entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentsResponse {
    File(FileContents),
    Directory(Vec<serde_json::Value>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitterPayload {
    pub name: String,
    pub email: String,
}

/// `PUT /repos/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutFileRequest {
    pub message: String,
    pub content: String,
    pub branch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub committer: CommitterPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutFileResponse {
    pub content: ObjectRef,
}

/// `DELETE /repos/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteFileRequest {
    pub message: String,
    pub sha: String,
    pub branch: String,
    pub committer: CommitterPayload,
}

/// `POST /repos/{repo}/git/refs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRefRequest {
    #[serde(rename = "ref")]
    pub full_ref: String,
    pub sha: String,
}

/// `POST /repos/{repo}/pulls`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullResponse {
    pub html_url: String,
}

/// `GET /user`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub login: String,
}

/// `GET /repos/{repo}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryResponse {
    pub full_name: String,
}

/// Error document returned with 4xx/5xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

pub fn encode_content(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a base64 body; the API wraps it at 60 columns
pub fn decode_content(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let compact = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>();
    STANDARD.decode(compact)
}
