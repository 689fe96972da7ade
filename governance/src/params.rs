//! Governor parameters and the settings that governance may change about itself.
//!
//! Voting delay, voting period and proposal threshold live in a
//! [`GovernorSettings`] target registered in the timelock under the engine's
//! address. A passed proposal can therefore retune them, and nothing else can.

use crate::error::GovernanceError;
use gavel_types::{
    decode_args, Address, CallContext, CallError, CallTarget, Event, EventBus, TokenAmount,
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::info;

/// Maximum number of actions in one proposal.
pub const PROPOSAL_MAX_OPERATIONS: usize = 10;

/// Voting delay bounds, in blocks.
pub const MIN_VOTING_DELAY: u64 = 1;
pub const MAX_VOTING_DELAY: u64 = 40_320;

/// Voting period bounds, in blocks.
pub const MIN_VOTING_PERIOD: u64 = 5_760;
pub const MAX_VOTING_PERIOD: u64 = 80_640;

/// Signatures accepted by [`GovernorSettings`].
pub mod signatures {
    pub const SET_VOTING_DELAY: &str = "setVotingDelay(uint64)";
    pub const SET_VOTING_PERIOD: &str = "setVotingPeriod(uint64)";
    pub const SET_PROPOSAL_THRESHOLD: &str = "setProposalThreshold(uint96)";
}

#[derive(Clone, Debug)]
pub struct GovernorParams {
    /// The engine's own address: the timelock admin, and the address of its settings target.
    pub address: Address,
    /// Blocks between proposing and the start of voting.
    pub voting_delay: u64,
    /// Blocks during which votes are accepted.
    pub voting_period: u64,
    pub proposal_threshold: TokenAmount,
    pub quorum: TokenAmount,
    /// May cancel any open or queued proposal.
    pub guardian: Option<Address>,
}

impl GovernorParams {
    pub fn validate(&self) -> Result<(), GovernanceError> {
        check_voting_delay(self.voting_delay)?;
        check_voting_period(self.voting_period)?;
        check_threshold(self.proposal_threshold)?;
        if self.quorum.is_zero() {
            return Err(GovernanceError::InvalidConfig("quorum must be positive".into()));
        }
        Ok(())
    }
}

fn check_voting_delay(delay: u64) -> Result<(), GovernanceError> {
    if !(MIN_VOTING_DELAY..=MAX_VOTING_DELAY).contains(&delay) {
        return Err(GovernanceError::InvalidConfig(format!(
            "voting delay {delay} outside [{MIN_VOTING_DELAY}, {MAX_VOTING_DELAY}]"
        )));
    }
    Ok(())
}

fn check_voting_period(period: u64) -> Result<(), GovernanceError> {
    if !(MIN_VOTING_PERIOD..=MAX_VOTING_PERIOD).contains(&period) {
        return Err(GovernanceError::InvalidConfig(format!(
            "voting period {period} outside [{MIN_VOTING_PERIOD}, {MAX_VOTING_PERIOD}]"
        )));
    }
    Ok(())
}

fn check_threshold(threshold: TokenAmount) -> Result<(), GovernanceError> {
    if threshold.is_zero() {
        return Err(GovernanceError::InvalidConfig(
            "proposal threshold must be positive".into(),
        ));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingValues {
    pub voting_delay: u64,
    pub voting_period: u64,
    pub proposal_threshold: TokenAmount,
}

/// The self-governed part of the governor's configuration.
pub struct GovernorSettings {
    timelock: Address,
    values: SettingValues,
    events: Rc<EventBus>,
}

impl GovernorSettings {
    /// Settings that accept changes only from `timelock`.
    pub fn new(timelock: Address, values: SettingValues, events: Rc<EventBus>) -> Self {
        Self {
            timelock,
            values,
            events,
        }
    }

    pub fn values(&self) -> SettingValues {
        self.values
    }

    fn changed(&self, setting: &str, previous: u128, current: u128) {
        info!(setting, previous, current, "governor setting changed");
        self.events.emit(Event::GovernorSettingChanged {
            setting: setting.to_string(),
            previous,
            current,
        });
    }
}

fn reverted(err: GovernanceError) -> CallError {
    CallError::Reverted(err.to_string())
}

impl CallTarget for GovernorSettings {
    fn invoke(&mut self, ctx: &CallContext, signature: &str, data: &[u8]) -> Result<(), CallError> {
        if ctx.caller != self.timelock {
            return Err(CallError::Reverted(format!(
                "{} may not change governor settings",
                ctx.caller
            )));
        }
        match signature {
            signatures::SET_VOTING_DELAY => {
                let delay: u64 = decode_args(data)?;
                check_voting_delay(delay).map_err(reverted)?;
                let previous = std::mem::replace(&mut self.values.voting_delay, delay);
                self.changed("voting_delay", previous.into(), delay.into());
            }
            signatures::SET_VOTING_PERIOD => {
                let period: u64 = decode_args(data)?;
                check_voting_period(period).map_err(reverted)?;
                let previous = std::mem::replace(&mut self.values.voting_period, period);
                self.changed("voting_period", previous.into(), period.into());
            }
            signatures::SET_PROPOSAL_THRESHOLD => {
                let threshold: TokenAmount = decode_args(data)?;
                check_threshold(threshold).map_err(reverted)?;
                let previous = std::mem::replace(&mut self.values.proposal_threshold, threshold);
                self.changed("proposal_threshold", previous.raw(), threshold.raw());
            }
            other => return Err(CallError::UnknownSignature(other.to_string())),
        }
        Ok(())
    }

    fn save_state(&self) -> Result<Vec<u8>, CallError> {
        bincode::serialize(&self.values).map_err(|e| CallError::State(e.to_string()))
    }

    fn load_state(&mut self, bytes: &[u8]) -> Result<(), CallError> {
        self.values = bincode::deserialize(bytes).map_err(|e| CallError::State(e.to_string()))?;
        Ok(())
    }
}
