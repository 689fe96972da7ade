use gavel_governance::GovernanceError;
use gavel_timelock::TimelockError;
use gavel_token::LedgerError;
use gavel_types::FailureKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("timelock error: {0}")]
    Timelock(#[from] TimelockError),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),
}

impl SystemError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Config(_) | Self::Logging(_) => FailureKind::Invalid,
            Self::Ledger(e) => e.kind(),
            Self::Timelock(e) => e.kind(),
            Self::Governance(e) => e.kind(),
        }
    }
}
