//! Session-level components
//!
//! - `config`: Immutable configuration built once at start-up
//! - `editor`: The editing session tying configuration, remote and cache together
//! - `listing_cache`: Time-bounded memo of branch tree listings

pub mod config;
pub mod editor;
pub mod listing_cache;
