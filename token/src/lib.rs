//! The voting ledger for gavel.
//!
//! A fungible token whose balances carry voting weight. Holders delegate that
//! weight (to themselves by default) and every change to a delegate's total is
//! checkpointed by block number, so the governor can ask how much weight an
//! account held at the block a proposal was opened.

pub mod checkpoint;
pub mod error;
pub mod ledger;
pub mod signed;
pub mod snapshot;
pub mod target;

pub use checkpoint::{Checkpoint, CheckpointHistory};
pub use error::LedgerError;
pub use ledger::{LedgerState, TokenParams, VotingLedger};
pub use signed::DelegationMessage;
pub use snapshot::CURRENT_SCHEMA_VERSION;
pub use target::signatures;
