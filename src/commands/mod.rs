//! Editor commands
//!
//! Every command is an `impl Editor` block:
//!
//! - `check`: Verify the credential, repository access and base branch
//! - `list`: Pages and assets, served through the listing cache
//! - `show`: Print one file from the listing branch
//! - `submit`: The change submission state machine (direct commit or pull request)
//! - `pages`: Create, edit, delete and upload entry points built on `submit`

pub mod check;
pub mod list;
pub mod pages;
pub mod show;
pub mod submit;
