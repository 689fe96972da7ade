//! Ledger errors.

use gavel_types::{Address, BlockNumber, FailureKind, Timestamp, TokenAmount};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{caller} is not the minting authority")]
    NotAuthorized { caller: Address },

    #[error("transfers are paused")]
    TransfersPaused,

    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("insufficient allowance: need {needed}, have {available}")]
    InsufficientAllowance {
        needed: TokenAmount,
        available: TokenAmount,
    },

    #[error("minting is locked until {allowed_after} (now {now})")]
    MintingLocked {
        allowed_after: Timestamp,
        now: Timestamp,
    },

    #[error("upgrading is locked until {allowed_after} (now {now})")]
    UpgradeLocked {
        allowed_after: Timestamp,
        now: Timestamp,
    },

    #[error("block {requested} is not yet final (current block {current})")]
    FutureLookup {
        requested: BlockNumber,
        current: BlockNumber,
    },

    #[error("amount exceeds the 96-bit vote weight bound")]
    Overflow,

    #[error("invalid delegation signature")]
    InvalidSignature,

    #[error("invalid delegation nonce: expected {expected}, got {got}")]
    InvalidNonce { expected: u64, got: u64 },

    #[error("delegation signature expired at {expiry} (now {now})")]
    SignatureExpired { expiry: Timestamp, now: Timestamp },

    #[error("snapshot schema version {found} is not supported (current {supported})")]
    IncompatibleSchema { found: u32, supported: u32 },

    #[error("snapshot encoding error: {0}")]
    Snapshot(String),
}

impl LedgerError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotAuthorized { .. } => FailureKind::Authorization,
            Self::TransfersPaused => FailureKind::StateConflict,
            Self::MintingLocked { .. }
            | Self::UpgradeLocked { .. }
            | Self::FutureLookup { .. }
            | Self::SignatureExpired { .. } => FailureKind::Timing,
            Self::InsufficientBalance { .. }
            | Self::InsufficientAllowance { .. }
            | Self::Overflow => FailureKind::Capacity,
            Self::InvalidNonce { .. } => FailureKind::Duplicate,
            Self::InvalidSignature
            | Self::IncompatibleSchema { .. }
            | Self::Snapshot(_) => FailureKind::Invalid,
        }
    }
}
