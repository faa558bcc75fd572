//! Gate entry flow: form state, authority approval and the final decision.

pub mod approval;
pub mod desk;
pub mod form;

use gate_log::StoreError;
use thiserror::Error;

pub use approval::{ApprovalError, ManualApprover, PendingApproval, SYSTEM_APPROVER};
pub use desk::{Decision, EntryDesk, EntryOutcome, PendingEntry};
pub use form::{EntryDetails, EntryForm, ValidationError, MAX_PEOPLE, MIN_PEOPLE};

#[derive(Debug, Error)]
pub enum EntryError {
    #[error("invalid entry: {0}")]
    Validation(#[from] ValidationError),
    #[error("approval blocked: {0}")]
    Approval(#[from] ApprovalError),
    #[error("visit log write failed: {0}")]
    Store(#[from] StoreError),
}

pub type EntryResult<T> = Result<T, EntryError>;
