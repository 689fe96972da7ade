use crate::proposal::ProposalState;
use gavel_timelock::TimelockError;
use gavel_token::LedgerError;
use gavel_types::{ActionHash, Address, FailureKind, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GovernanceError {
    #[error("proposer votes {votes} below proposal threshold {threshold}")]
    BelowThreshold {
        votes: TokenAmount,
        threshold: TokenAmount,
    },

    #[error("a proposal must carry between 1 and {max} actions, got {count}")]
    EmptyActions { count: usize, max: usize },

    #[error("{proposer} already has open proposal {id}")]
    AlreadyPending { proposer: Address, id: u64 },

    #[error("proposal {0} does not exist")]
    UnknownProposal(u64),

    #[error("proposal {id} is {state}, voting is closed")]
    NotActive { id: u64, state: ProposalState },

    #[error("{voter} already voted on proposal {id}")]
    AlreadyVoted { voter: Address, id: u64 },

    #[error("proposal {id} is {state}, only succeeded proposals can be queued")]
    NotSucceeded { id: u64, state: ProposalState },

    #[error("identical action {0} is already queued at this eta")]
    DuplicateAction(ActionHash),

    #[error("proposal {id} is {state}, only queued proposals can be executed")]
    NotQueued { id: u64, state: ProposalState },

    #[error("proposal {id} is already {state}")]
    AlreadyFinal { id: u64, state: ProposalState },

    #[error("{caller} is not allowed to do this")]
    NotAuthorized { caller: Address },

    #[error("invalid governor configuration: {0}")]
    InvalidConfig(String),

    #[error("arithmetic overflow")]
    Overflow,

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Timelock(#[from] TimelockError),
}

impl GovernanceError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::BelowThreshold { .. } | Self::NotAuthorized { .. } => FailureKind::Authorization,
            Self::NotActive { .. }
            | Self::NotSucceeded { .. }
            | Self::NotQueued { .. }
            | Self::AlreadyFinal { .. }
            | Self::AlreadyPending { .. } => FailureKind::StateConflict,
            Self::AlreadyVoted { .. } | Self::DuplicateAction(_) => FailureKind::Duplicate,
            Self::EmptyActions { .. } | Self::Overflow => FailureKind::Capacity,
            Self::UnknownProposal(_) | Self::InvalidConfig(_) => FailureKind::Invalid,
            Self::Ledger(e) => e.kind(),
            Self::Timelock(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_types::Timestamp;

    #[test]
    fn wrapped_errors_keep_their_kind() {
        let err: GovernanceError = TimelockError::TooEarly {
            eta: Timestamp::new(2),
            now: Timestamp::new(1),
        }
        .into();
        assert_eq!(err.kind(), FailureKind::Timing);
        assert!(err.kind().is_retryable());

        let err: GovernanceError = LedgerError::Overflow.into();
        assert_eq!(err.kind(), FailureKind::Capacity);
    }

    #[test]
    fn duplicates_are_never_retryable() {
        let err = GovernanceError::AlreadyVoted {
            voter: Address::new("gvl_alice"),
            id: 1,
        };
        assert_eq!(err.kind(), FailureKind::Duplicate);
        assert!(!err.kind().is_retryable());
    }
}
