//! Editor data structures and pure algorithms
//!
//! - `branch`: Branch names and ephemeral branch generation
//! - `change`: Change requests, staged changes and submission outcomes
//! - `errors`: Remote error taxonomy and stage-wrapped submission errors
//! - `objects`: Content hashes, remote files and tree entries
//! - `paths`: Normalization and scoping of repository paths

pub mod branch;
pub mod change;
pub mod errors;
pub mod objects;
pub mod paths;
