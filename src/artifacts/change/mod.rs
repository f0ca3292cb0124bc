//! Change requests and the artifacts of submitting them
//!
//! - `operation`: Create, update, delete or upload
//! - `request`: The user's intent (`ChangeRequest`) and its validated form (`StagedChange`)
//! - `stage`: Named steps of the submission state machine
//! - `pull_request`: Pull-request titles, bodies and results
//! - `outcome`: What a successful submission returns

pub mod operation;
pub mod outcome;
pub mod pull_request;
pub mod request;
pub mod stage;
