//! Error Types
//!
//! `TransferError` covers lookups and setup problems. Rejected drops are
//! not errors; they are described by `RejectReason`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Common result type for board and protocol internals
pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("unknown container: {0}")]
    UnknownContainer(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("no drag in flight for candidate: {0}")]
    UnknownCandidate(String),
    #[error("duplicate id: {0}")]
    DuplicateId(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Why a drop was refused. Surfaced only as a missing valid-drop cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Target (or origin) container is disabled
    Disabled,
    /// Target already holds `cardinality_limit` children
    CardinalityReached,
    /// Transport carries no group marker
    NotManaged,
    /// Neither the payload nor the side-table resolved the candidate
    Unresolved,
    GroupMismatch,
    SelfDrop,
    /// Items never go back into a source pool
    SourceTarget,
    /// Commit without a preceding allowing evaluate on that target
    NotEvaluated,
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            RejectReason::Disabled => "container disabled",
            RejectReason::CardinalityReached => "cardinality limit reached",
            RejectReason::NotManaged => "drag not started by a managed container",
            RejectReason::Unresolved => "candidate could not be resolved",
            RejectReason::GroupMismatch => "group mismatch",
            RejectReason::SelfDrop => "drop onto origin container",
            RejectReason::SourceTarget => "target is a source container",
            RejectReason::NotEvaluated => "target was not accepted by evaluate",
        };
        f.write_str(text)
    }
}
