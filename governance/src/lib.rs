//! Token-weighted governance for gavel.
//!
//! Lifecycle: Pending → Active → Defeated | Succeeded → Queued → Executed | Expired,
//! with Canceled reachable until execution.
//!
//! A proposal is a list of actions. Holders of delegated voting power vote on
//! it during a window measured in blocks; if it passes, its actions go through
//! the timelock like any other privileged call. The governor's own settings are
//! one more call target, so governance changes its rules the same way.

pub mod engine;
pub mod error;
pub mod params;
pub mod proposal;

pub use engine::ProposalEngine;
pub use error::GovernanceError;
pub use params::{
    GovernorParams, GovernorSettings, SettingValues, MAX_VOTING_DELAY, MAX_VOTING_PERIOD,
    MIN_VOTING_DELAY, MIN_VOTING_PERIOD, PROPOSAL_MAX_OPERATIONS,
};
pub use proposal::{Proposal, ProposalState, Receipt};
