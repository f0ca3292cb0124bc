//! Short-lived branches for pull-request submissions
//!
//! Each pull-request submission stages its change on a fresh branch named
//! `docs-edit-<UTC timestamp, second resolution>-<random suffix>`. The branch is
//! never deleted here; once the pull request is open, cleanup belongs to the
//! hosting service's merge/close workflow.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::content_hash::ContentHash;
use chrono::{DateTime, Utc};
use derive_new::new;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub const EPHEMERAL_BRANCH_PREFIX: &str = "docs-edit";
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const SUFFIX_LENGTH: usize = 6;

/// Generate a collision-resistant branch name
pub fn generate_name(now: DateTime<Utc>, rng: &mut impl Rng) -> anyhow::Result<BranchName> {
    let suffix = rng
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LENGTH)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect::<String>();

    BranchName::try_parse(format!(
        "{}-{}-{}",
        EPHEMERAL_BRANCH_PREFIX,
        now.format(TIMESTAMP_FORMAT),
        suffix
    ))
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct EphemeralBranch {
    pub name: BranchName,
    pub base: String,
    pub head: ContentHash,
}
