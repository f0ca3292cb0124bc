//! Documentation editor backed by a remote repository
//!
//! Pages and assets are read from and written to a hosted repository through
//! its HTTP API; there is no local checkout. Changes land either as direct
//! commits or, when the target branch is protected, as pull requests from an
//! ephemeral branch.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod remote;
