//! Remote repository access
//!
//! The editor never keeps a local checkout. Everything it knows about the
//! repository comes through [`RemoteRepository`], a thin contract over a
//! content-addressed hosting API:
//!
//! - `github`: Authenticated HTTP implementation against the GitHub REST API
//! - `memory`: In-process implementation with the same semantics, used by tests
//! - `wire`: JSON payloads exchanged with the hosting API
//!
//! Every operation is a single attempt. Retries, if any, are the caller's call.

pub mod github;
pub mod memory;
pub mod wire;

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::errors::RemoteResult;
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::remote_file::{Content, RemoteFile};
use crate::artifacts::objects::tree_entry::TreeEntry;
use std::future::Future;

pub trait RemoteRepository: Send + Sync {
    /// Recursive, flattened listing of every blob and subtree on `branch`
    ///
    /// Resolves the branch to its head commit, the commit to its root tree and
    /// lists that tree. Fails with `NotFound` when the branch does not exist.
    fn list_tree(&self, branch: &str) -> impl Future<Output = RemoteResult<Vec<TreeEntry>>> + Send;

    /// Read a regular file; directories and missing paths are `NotFound`
    fn read_file(
        &self,
        path: &str,
        branch: &str,
    ) -> impl Future<Output = RemoteResult<RemoteFile>> + Send;

    /// Create (no `expected_hash`) or update a file, returning its new hash
    ///
    /// Fails with `Conflict` when `expected_hash` does not match the server's
    /// current version of the path.
    fn write_file(
        &self,
        path: &str,
        content: &Content,
        message: &str,
        branch: &str,
        expected_hash: Option<&ContentHash>,
    ) -> impl Future<Output = RemoteResult<ContentHash>> + Send;

    /// Delete a file, subject to the same stale-hash `Conflict` as writes
    fn delete_file(
        &self,
        path: &str,
        hash: &ContentHash,
        message: &str,
        branch: &str,
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Create `name` pointing at the head commit of `from_branch`
    ///
    /// Returns the commit the new branch points at. Fails with `AlreadyExists`
    /// when the name is taken.
    fn create_branch(
        &self,
        name: &BranchName,
        from_branch: &str,
    ) -> impl Future<Output = RemoteResult<ContentHash>> + Send;

    /// Open a pull request and return its URL
    ///
    /// Fails with `Validation` when head and base are the same branch or head
    /// has nothing to merge.
    fn open_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> impl Future<Output = RemoteResult<String>> + Send;

    /// Login of the identity behind the credential
    fn authenticated_user(&self) -> impl Future<Output = RemoteResult<String>> + Send;

    /// Full name (`owner/name`) of the configured repository
    fn repository_name(&self) -> impl Future<Output = RemoteResult<String>> + Send;

    /// Head commit of `branch`
    fn branch_head(&self, branch: &str) -> impl Future<Output = RemoteResult<ContentHash>> + Send;
}
