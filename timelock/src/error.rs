use gavel_types::{ActionHash, Address, FailureKind, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimelockError {
    #[error("{caller} is not allowed to perform this queue operation")]
    NotAuthorized { caller: Address },

    #[error("eta {eta} is before the earliest allowed eta {earliest}")]
    EtaTooSoon { eta: Timestamp, earliest: Timestamp },

    #[error("action {0} is already queued")]
    AlreadyQueued(ActionHash),

    #[error("action {0} is not queued")]
    NotQueued(ActionHash),

    #[error("action not yet executable: eta {eta}, now {now}")]
    TooEarly { eta: Timestamp, now: Timestamp },

    #[error("action is stale: grace window closed at {deadline}, now {now}")]
    TooLate { deadline: Timestamp, now: Timestamp },

    #[error("action {hash} reverted: {reason}")]
    ActionReverted { hash: ActionHash, reason: String },

    #[error("delay {delay}s outside allowed range [{min}, {max}]")]
    DelayOutOfRange { delay: u64, min: u64, max: u64 },

    #[error("native balance overflow")]
    Overflow,

    #[error("target state could not be saved or restored: {0}")]
    TargetState(String),
}

impl TimelockError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotAuthorized { .. } => FailureKind::Authorization,
            Self::EtaTooSoon { .. } | Self::TooEarly { .. } | Self::TooLate { .. } => {
                FailureKind::Timing
            }
            Self::AlreadyQueued(_) => FailureKind::Duplicate,
            Self::NotQueued(_) | Self::ActionReverted { .. } => FailureKind::StateConflict,
            Self::Overflow => FailureKind::Capacity,
            Self::DelayOutOfRange { .. } | Self::TargetState(_) => FailureKind::Invalid,
        }
    }
}
