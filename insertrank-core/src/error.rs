//! Engine error types.
//!
//! Every variant is a caller contract violation. A call that returns an error
//! leaves the engine exactly as it was.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankError {
    /// `start_insertion()` while a comparison is already outstanding.
    #[error("a comparison is already pending; record a decision first")]
    AlreadyComparing,

    /// `record_decision()` with no outstanding comparison.
    #[error("no comparison is pending; call start_insertion() first")]
    NoPendingComparison,

    /// Any insertion call after the last item has been placed.
    #[error("the tournament is complete; nothing left to insert")]
    TournamentComplete,

    /// Proposed order has a different number of items than the ranking.
    #[error("reorder has {actual} items but the ranking has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Proposed order names an item that is not in the ranking.
    #[error("item {0} is not in the current ranking")]
    UnknownItem(i64),

    /// Proposed order names the same item twice.
    #[error("item {0} appears more than once in the reorder")]
    DuplicateItem(i64),

    #[error("position {index} is out of range for a ranking of {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

impl RankError {
    /// True for errors raised by Manual Override validation.
    pub fn is_invalid_override(&self) -> bool {
        matches!(
            self,
            RankError::LengthMismatch { .. }
                | RankError::UnknownItem(_)
                | RankError::DuplicateItem(_)
                | RankError::IndexOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RankError>;
