//! In-process remote repository
//!
//! Mirrors the hosting API's semantics closely enough to exercise the submitter:
//! commits are immutable snapshots addressed by hash, branches point at
//! commits, every write produces exactly one commit and stale version tokens are
//! rejected with `Conflict`.
//!
//! Tests can also inject one-shot failures and simulate a concurrent editor
//! landing a commit right after a given operation.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::change::pull_request::PullRequest;
use crate::artifacts::errors::{RemoteError, RemoteResult};
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::objects::remote_file::{Content, RemoteFile};
use crate::artifacts::objects::tree_entry::{EntryKind, TreeEntry};
use crate::remote::RemoteRepository;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

type Snapshot = BTreeMap<String, Bytes>;

/// Operations of [`RemoteRepository`], used to target injected behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOp {
    ListTree,
    ReadFile,
    WriteFile,
    DeleteFile,
    CreateBranch,
    OpenPullRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub id: ContentHash,
    pub branch: String,
    pub message: String,
}

#[derive(Debug, Clone)]
struct InterleavedWrite {
    branch: String,
    path: String,
    content: Content,
}

#[derive(Debug, Default)]
struct State {
    commits: HashMap<ContentHash, Snapshot>,
    branches: BTreeMap<String, ContentHash>,
    log: Vec<CommitRecord>,
    pull_requests: Vec<PullRequest>,
    failures: HashMap<RemoteOp, RemoteError>,
    interleaved: HashMap<RemoteOp, InterleavedWrite>,
    calls: Vec<RemoteOp>,
}

impl State {
    fn snapshot(&self, branch: &str) -> RemoteResult<(&ContentHash, &Snapshot)> {
        let head = self
            .branches
            .get(branch)
            .ok_or_else(|| RemoteError::NotFound(format!("branch {branch} not found")))?;
        let snapshot = self
            .commits
            .get(head)
            .ok_or_else(|| RemoteError::Transport(format!("dangling branch {branch}")))?;

        Ok((head, snapshot))
    }

    fn commit(&mut self, branch: &str, snapshot: Snapshot, message: &str) -> ContentHash {
        let parent = self
            .branches
            .get(branch)
            .map(|head| head.to_string())
            .unwrap_or_default();
        let description = format!(
            "parent {}\nsequence {}\n\n{}",
            parent,
            self.log.len(),
            message
        );
        let id = ContentHash::of_object("commit", description.as_bytes());

        self.commits.insert(id.clone(), snapshot);
        self.branches.insert(branch.to_string(), id.clone());
        self.log.push(CommitRecord {
            id: id.clone(),
            branch: branch.to_string(),
            message: message.to_string(),
        });

        id
    }

    fn insert_branch(&mut self, name: &BranchName, commit: &ContentHash) -> RemoteResult<()> {
        if self.branches.contains_key(name.as_ref()) {
            return Err(RemoteError::AlreadyExists(format!(
                "branch {name} already exists"
            )));
        }
        if !self.commits.contains_key(commit) {
            return Err(RemoteError::Validation(format!(
                "object {commit} does not exist"
            )));
        }

        self.branches.insert(name.to_string(), commit.clone());
        Ok(())
    }

    fn begin(&mut self, op: RemoteOp) -> RemoteResult<()> {
        self.calls.push(op);
        match self.failures.remove(&op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn finish<T>(&mut self, op: RemoteOp, result: RemoteResult<T>) -> RemoteResult<T> {
        if result.is_ok()
            && let Some(write) = self.interleaved.remove(&op)
            && let Ok((_, snapshot)) = self.snapshot(&write.branch)
        {
            let mut snapshot = snapshot.clone();
            snapshot.insert(write.path.clone(), Bytes::copy_from_slice(write.content.as_bytes()));
            let message = format!("Concurrent edit of {}", write.path);
            self.commit(&write.branch, snapshot, &message);
        }

        result
    }
}

pub struct MemoryRemote {
    repo: String,
    user: String,
    state: Mutex<State>,
}

impl MemoryRemote {
    /// Create a repository whose only branch, `default_branch`, has an empty root commit
    pub fn new(repo: impl Into<String>, default_branch: &str) -> Self {
        let mut state = State::default();
        state.commit(default_branch, Snapshot::new(), "Initial commit");

        Self {
            repo: repo.into(),
            user: "docs-editor-bot".to_string(),
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Commit `files` onto `branch` in one go, bypassing version checks
    pub fn seed<C: Into<Content> + Clone>(&self, branch: &str, files: &[(&str, C)]) -> ContentHash {
        let mut state = self.state();
        let mut snapshot = state
            .snapshot(branch)
            .map(|(_, snapshot)| snapshot.clone())
            .unwrap_or_default();
        for (path, content) in files {
            let content: Content = content.clone().into();
            snapshot.insert(path.to_string(), Bytes::copy_from_slice(content.as_bytes()));
        }

        state.commit(branch, snapshot, "Seed files")
    }

    /// Fail the next call of `op` with `error`
    pub fn fail_next(&self, op: RemoteOp, error: RemoteError) {
        self.state().failures.insert(op, error);
    }

    /// After the next successful call of `op`, land a commit writing `content`
    /// at `path` on `branch`, as a concurrent editor would
    pub fn interleave_write_after(
        &self,
        op: RemoteOp,
        branch: &str,
        path: &str,
        content: impl Into<Content>,
    ) {
        self.state().interleaved.insert(
            op,
            InterleavedWrite {
                branch: branch.to_string(),
                path: path.to_string(),
                content: content.into(),
            },
        );
    }

    pub fn file(&self, branch: &str, path: &str) -> Option<Content> {
        let state = self.state();
        let (_, snapshot) = state.snapshot(branch).ok()?;
        snapshot
            .get(path)
            .map(|bytes| Content::from_bytes(bytes.to_vec()))
    }

    pub fn branches(&self) -> Vec<String> {
        self.state().branches.keys().cloned().collect()
    }

    pub fn head(&self, branch: &str) -> Option<ContentHash> {
        self.state().branches.get(branch).cloned()
    }

    pub fn commit_log(&self) -> Vec<CommitRecord> {
        self.state().log.clone()
    }

    pub fn pull_requests(&self) -> Vec<PullRequest> {
        self.state().pull_requests.clone()
    }

    /// Every operation invoked so far, in order
    pub fn calls(&self) -> Vec<RemoteOp> {
        self.state().calls.clone()
    }

    /// Point a new branch `name` at `commit`, as `POST git/refs` does
    pub fn create_ref(&self, name: &BranchName, commit: &ContentHash) -> RemoteResult<()> {
        let mut state = self.state();
        state.begin(RemoteOp::CreateBranch)?;

        let result = state.insert_branch(name, commit);
        state.finish(RemoteOp::CreateBranch, result)
    }

    /// Flattened listing of a commit's tree, as served for `git/trees/{sha}`
    pub fn commit_tree(&self, commit: &ContentHash) -> Option<Vec<TreeEntry>> {
        self.state().commits.get(commit).map(flatten)
    }

    pub fn user(&self) -> &str {
        &self.user
    }
}

fn flatten(snapshot: &Snapshot) -> Vec<TreeEntry> {
    let directories = snapshot
        .keys()
        .flat_map(|path| {
            path.match_indices('/')
                .map(|(index, _)| path[..index].to_string())
                .collect::<Vec<_>>()
        })
        .collect::<BTreeSet<_>>();

    let mut entries = directories
        .into_iter()
        .map(|path| TreeEntry::new(path, EntryKind::Directory, None))
        .chain(snapshot.iter().map(|(path, bytes)| {
            TreeEntry::new(path.clone(), EntryKind::File, Some(ContentHash::of_blob(bytes)))
        }))
        .collect::<Vec<_>>();
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    entries
}

impl RemoteRepository for MemoryRemote {
    async fn list_tree(&self, branch: &str) -> RemoteResult<Vec<TreeEntry>> {
        let mut state = self.state();
        state.begin(RemoteOp::ListTree)?;

        let result = state.snapshot(branch).map(|(_, snapshot)| flatten(snapshot));
        state.finish(RemoteOp::ListTree, result)
    }

    async fn read_file(&self, path: &str, branch: &str) -> RemoteResult<RemoteFile> {
        let mut state = self.state();
        state.begin(RemoteOp::ReadFile)?;

        let result = state.snapshot(branch).and_then(|(_, snapshot)| {
            snapshot
                .get(path)
                .map(|bytes| {
                    RemoteFile::new(
                        path.to_string(),
                        ContentHash::of_blob(bytes),
                        Content::from_bytes(bytes.to_vec()),
                    )
                })
                .ok_or_else(|| RemoteError::NotFound(format!("{path} not found on {branch}")))
        });
        state.finish(RemoteOp::ReadFile, result)
    }

    async fn write_file(
        &self,
        path: &str,
        content: &Content,
        message: &str,
        branch: &str,
        expected_hash: Option<&ContentHash>,
    ) -> RemoteResult<ContentHash> {
        let mut state = self.state();
        state.begin(RemoteOp::WriteFile)?;

        let result = state.snapshot(branch).and_then(|(_, snapshot)| {
            let current = snapshot.get(path).map(|bytes| ContentHash::of_blob(bytes));
            match (current, expected_hash) {
                (None, None) => Ok(()),
                (Some(current), Some(expected)) if &current == expected => Ok(()),
                (Some(_), None) => Err(RemoteError::Conflict(format!(
                    "{path} already exists on {branch} and no content hash was supplied"
                ))),
                (Some(current), Some(expected)) => Err(RemoteError::Conflict(format!(
                    "{path} is at {} on {branch}, not {}",
                    current.to_short_hash(),
                    expected.to_short_hash()
                ))),
                (None, Some(expected)) => Err(RemoteError::Conflict(format!(
                    "{path} no longer exists on {branch} (expected {})",
                    expected.to_short_hash()
                ))),
            }?;

            let mut snapshot = snapshot.clone();
            snapshot.insert(path.to_string(), Bytes::copy_from_slice(content.as_bytes()));
            Ok(snapshot)
        });

        let result = result.map(|snapshot| {
            state.commit(branch, snapshot, message);
            ContentHash::of_blob(content.as_bytes())
        });
        state.finish(RemoteOp::WriteFile, result)
    }

    async fn delete_file(
        &self,
        path: &str,
        hash: &ContentHash,
        message: &str,
        branch: &str,
    ) -> RemoteResult<()> {
        let mut state = self.state();
        state.begin(RemoteOp::DeleteFile)?;

        let result = state.snapshot(branch).and_then(|(_, snapshot)| {
            let current = snapshot
                .get(path)
                .map(|bytes| ContentHash::of_blob(bytes))
                .ok_or_else(|| RemoteError::NotFound(format!("{path} not found on {branch}")))?;
            if &current != hash {
                return Err(RemoteError::Conflict(format!(
                    "{path} is at {} on {branch}, not {}",
                    current.to_short_hash(),
                    hash.to_short_hash()
                )));
            }

            let mut snapshot = snapshot.clone();
            snapshot.remove(path);
            Ok(snapshot)
        });

        let result = result.map(|snapshot| {
            state.commit(branch, snapshot, message);
        });
        state.finish(RemoteOp::DeleteFile, result)
    }

    async fn create_branch(&self, name: &BranchName, from_branch: &str) -> RemoteResult<ContentHash> {
        let mut state = self.state();
        state.begin(RemoteOp::CreateBranch)?;

        let head = state.snapshot(from_branch).map(|(head, _)| head.clone());
        let result = head.and_then(|head| state.insert_branch(name, &head).map(|_| head));
        state.finish(RemoteOp::CreateBranch, result)
    }

    async fn open_pull_request(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> RemoteResult<String> {
        let mut state = self.state();
        state.begin(RemoteOp::OpenPullRequest)?;

        let result = if head == base {
            Err(RemoteError::Validation(format!(
                "cannot open a pull request from {head} into itself"
            )))
        } else {
            match (state.branches.get(head), state.branches.get(base)) {
                (Some(head_commit), Some(base_commit)) if head_commit == base_commit => {
                    Err(RemoteError::Validation(format!(
                        "no commits between {base} and {head}"
                    )))
                }
                (Some(_), Some(_)) => Ok(()),
                _ => Err(RemoteError::Validation(format!(
                    "head {head} or base {base} does not exist"
                ))),
            }
        };

        let result = result.map(|_| {
            let url = format!(
                "https://github.com/{}/pull/{}",
                self.repo,
                state.pull_requests.len() + 1
            );
            state.pull_requests.push(PullRequest::new(
                title.to_string(),
                body.to_string(),
                head.to_string(),
                base.to_string(),
                url.clone(),
            ));
            url
        });
        state.finish(RemoteOp::OpenPullRequest, result)
    }

    async fn authenticated_user(&self) -> RemoteResult<String> {
        Ok(self.user.clone())
    }

    async fn repository_name(&self) -> RemoteResult<String> {
        Ok(self.repo.clone())
    }

    async fn branch_head(&self, branch: &str) -> RemoteResult<ContentHash> {
        self.state()
            .branches
            .get(branch)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("branch {branch} not found")))
    }
}
