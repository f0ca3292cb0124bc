//! Change submission
//!
//! Lands one [`ChangeRequest`] in the remote repository:
//!
//! ```text
//! VALIDATE → PRECHECK → DIRECT_COMMIT                         → DONE
//!                     ↘ BRANCH_CREATE → STAGE_CHANGE → OPEN_PR → DONE
//! ```
//!
//! Any stage may fail; the error is wrapped with the stage name and returned
//! unchanged otherwise. Nothing is rolled back: a failure after BRANCH_CREATE
//! leaves the branch (and possibly its commit) behind. The listing cache is
//! invalidated only on success.

use crate::areas::config::{PAGE_EXTENSION, SubmitMode};
use crate::areas::editor::Editor;
use crate::artifacts::branch::ephemeral::{self, EphemeralBranch};
use crate::artifacts::change::operation::Operation;
use crate::artifacts::change::outcome::SubmitOutcome;
use crate::artifacts::change::pull_request::{PULL_REQUEST_BODY, PullRequest, pull_request_title};
use crate::artifacts::change::request::{ChangeRequest, StagedChange};
use crate::artifacts::change::stage::Stage;
use crate::artifacts::errors::{RemoteError, RemoteResult, SubmitError};
use crate::artifacts::objects::content_hash::ContentHash;
use crate::artifacts::paths;
use crate::remote::RemoteRepository;
use tracing::{debug, info, instrument, warn};

fn at(stage: Stage) -> impl FnOnce(RemoteError) -> SubmitError {
    move |error| {
        warn!(%stage, error = %error, "submission failed");
        SubmitError::new(stage, error)
    }
}

impl<R: RemoteRepository> Editor<R> {
    #[instrument(
        skip(self, request),
        fields(operation = %request.operation, path = %request.path, base = %request.base_branch)
    )]
    pub async fn submit(&mut self, request: ChangeRequest) -> Result<SubmitOutcome, SubmitError> {
        debug!(stage = %Stage::Validate);
        let staged = self.validate(&request).map_err(at(Stage::Validate))?;
        let base = request.base_branch.as_str();

        debug!(stage = %Stage::Precheck);
        let expected_hash = self.precheck(&staged, base).await.map_err(at(Stage::Precheck))?;

        let outcome = match self.config().submit_mode() {
            SubmitMode::Direct { .. } => {
                debug!(stage = %Stage::DirectCommit);
                let staged = staged.with_expected_hash(expected_hash);
                let hash = self
                    .apply_to_branch(base, &staged)
                    .await
                    .map_err(at(Stage::DirectCommit))?;

                SubmitOutcome::Committed {
                    operation: staged.operation,
                    path: staged.path,
                    branch: base.to_string(),
                    hash,
                }
            }
            SubmitMode::PullRequest { .. } => self.submit_via_pull_request(staged, base).await?,
        };

        self.invalidate_listings();
        info!(path = outcome.path(), "submission landed");

        Ok(outcome)
    }

    /// Normalize the target and enforce the per-operation path rules
    pub fn validate(&self, request: &ChangeRequest) -> RemoteResult<StagedChange> {
        let config = self.config();
        let path = paths::normalize(&request.path);

        if path.is_empty() {
            return Err(RemoteError::Validation("target path is empty".to_string()));
        }
        if paths::has_relative_segments(&request.path) {
            return Err(RemoteError::Validation(format!(
                "{} must not contain '.' or '..' segments",
                request.path
            )));
        }
        if request.base_branch.trim().is_empty() {
            return Err(RemoteError::Validation("base branch is empty".to_string()));
        }

        if request.operation.is_page_operation() {
            if !path.ends_with(PAGE_EXTENSION) {
                return Err(RemoteError::Validation(format!(
                    "{path} must end with {PAGE_EXTENSION}"
                )));
            }
            if !paths::is_under(&config.docs_root, &path) {
                return Err(RemoteError::Validation(format!(
                    "{path} is outside the docs root {}",
                    config.docs_root
                )));
            }
        } else if !paths::is_under(&config.assets_dir, &path) {
            return Err(RemoteError::Validation(format!(
                "{path} is outside the assets directory {}",
                config.assets_dir
            )));
        }

        match (request.operation, &request.content) {
            (Operation::Delete, Some(_)) => {
                return Err(RemoteError::Validation(
                    "a deletion carries no content".to_string(),
                ));
            }
            (Operation::Create | Operation::Update | Operation::Upload, None) => {
                return Err(RemoteError::Validation(format!(
                    "no content supplied for {} of {path}",
                    request.operation
                )));
            }
            _ => {}
        }

        let mut staged = StagedChange::from_request(request, path);
        if staged.message.trim().is_empty() {
            staged.message = staged.operation.default_message(&staged.path);
        }

        Ok(staged)
    }

    /// Read the base branch to decide whether the change may proceed
    ///
    /// Returns the version token the write must present, if any.
    async fn precheck(
        &self,
        staged: &StagedChange,
        base: &str,
    ) -> RemoteResult<Option<ContentHash>> {
        let current = self.current_hash(&staged.path, base).await?;

        match (staged.operation, current) {
            (Operation::Create, Some(_)) => Err(RemoteError::AlreadyExists(format!(
                "{} already exists on {base}",
                staged.path
            ))),
            (Operation::Create, None) => Ok(None),
            (Operation::Update | Operation::Delete, Some(hash)) => Ok(Some(hash)),
            (Operation::Update | Operation::Delete, None) => Err(stale(&staged.path, base)),
            (Operation::Upload, current) => Ok(current),
        }
    }

    /// Current hash of `path` on `branch`; absence is `None`, other failures propagate
    async fn current_hash(&self, path: &str, branch: &str) -> RemoteResult<Option<ContentHash>> {
        match self.remote().read_file(path, branch).await {
            Ok(file) => Ok(Some(file.hash)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }

    /// Perform the single mutating call for `staged` on `branch`
    ///
    /// Returns the new content hash, or `None` for a deletion.
    pub async fn apply_to_branch(
        &self,
        branch: &str,
        staged: &StagedChange,
    ) -> RemoteResult<Option<ContentHash>> {
        match (staged.operation, &staged.content) {
            (Operation::Delete, _) => {
                let hash = staged
                    .expected_hash
                    .as_ref()
                    .ok_or_else(|| stale(&staged.path, branch))?;
                self.remote()
                    .delete_file(&staged.path, hash, &staged.message, branch)
                    .await?;

                Ok(None)
            }
            (_, Some(content)) => {
                let hash = self
                    .remote()
                    .write_file(
                        &staged.path,
                        content,
                        &staged.message,
                        branch,
                        staged.expected_hash.as_ref(),
                    )
                    .await?;

                Ok(Some(hash))
            }
            (operation, None) => Err(RemoteError::Validation(format!(
                "no content supplied for {operation} of {}",
                staged.path
            ))),
        }
    }

    async fn submit_via_pull_request(
        &self,
        staged: StagedChange,
        base: &str,
    ) -> Result<SubmitOutcome, SubmitError> {
        debug!(stage = %Stage::BranchCreate);
        let branch = self.create_ephemeral_branch(base).await.map_err(at(Stage::BranchCreate))?;

        debug!(stage = %Stage::StageChange, branch = %branch.name);
        let staged = self
            .stage_change(staged, &branch)
            .await
            .map_err(at(Stage::StageChange))?;

        debug!(stage = %Stage::OpenPr, branch = %branch.name);
        let title = pull_request_title(
            &self.config().pr_title_prefix,
            staged.operation.action(),
            &staged.path,
        );
        let url = self
            .remote()
            .open_pull_request(branch.name.as_ref(), base, &title, PULL_REQUEST_BODY)
            .await
            .map_err(at(Stage::OpenPr))?;

        let pull_request = PullRequest::new(
            title,
            PULL_REQUEST_BODY.to_string(),
            branch.name.to_string(),
            base.to_string(),
            url,
        );

        Ok(SubmitOutcome::PullRequestOpened {
            operation: staged.operation,
            path: staged.path,
            branch,
            pull_request,
        })
    }

    /// Branch off `base` under a fresh name; a name collision is fatal
    async fn create_ephemeral_branch(&self, base: &str) -> RemoteResult<EphemeralBranch> {
        let name = ephemeral::generate_name(chrono::Utc::now(), &mut rand::thread_rng())
            .map_err(|e| RemoteError::Validation(e.to_string()))?;
        let head = self.remote().create_branch(&name, base).await?;

        Ok(EphemeralBranch::new(name, base.to_string(), head))
    }

    /// Re-read the version token on the base branch, then write to the new branch
    async fn stage_change(
        &self,
        staged: StagedChange,
        branch: &EphemeralBranch,
    ) -> RemoteResult<StagedChange> {
        let expected_hash = match staged.operation {
            Operation::Create => None,
            Operation::Upload => self.current_hash(&staged.path, &branch.base).await?,
            Operation::Update | Operation::Delete => Some(
                self.current_hash(&staged.path, &branch.base)
                    .await?
                    .ok_or_else(|| stale(&staged.path, &branch.base))?,
            ),
        };

        let staged = staged.with_expected_hash(expected_hash);
        self.apply_to_branch(branch.name.as_ref(), &staged).await?;

        Ok(staged)
    }
}

fn stale(path: &str, branch: &str) -> RemoteError {
    RemoteError::StaleState(format!("{path} no longer exists on {branch}"))
}
