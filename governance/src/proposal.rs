//! Governance proposals and their lifecycle.

use gavel_types::{Action, Address, BlockNumber, Timestamp, TokenAmount, VoteSupport};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The derived state of a proposal. Never stored; see [`Proposal::state`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Voting has not opened yet.
    Pending,
    /// Votes are being accepted.
    Active,
    Canceled,
    /// Voting closed without a majority or without quorum.
    Defeated,
    /// Voting closed with a majority and quorum; waiting to be queued.
    Succeeded,
    /// Actions are waiting in the timelock.
    Queued,
    /// Queued, but the grace window closed before execution.
    Expired,
    Executed,
}

impl ProposalState {
    /// Pending or Active: the proposal is still collecting votes or about to.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Active)
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Canceled => "canceled",
            Self::Defeated => "defeated",
            Self::Succeeded => "succeeded",
            Self::Queued => "queued",
            Self::Expired => "expired",
            Self::Executed => "executed",
        };
        f.write_str(name)
    }
}

/// A voter's recorded ballot on one proposal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub support: VoteSupport,
    pub votes: TokenAmount,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: u64,
    pub proposer: Address,
    pub actions: Vec<Action>,
    pub description: String,
    /// Voting opens after this block.
    pub start_block: BlockNumber,
    /// Voting closes after this block.
    pub end_block: BlockNumber,
    pub for_votes: TokenAmount,
    pub against_votes: TokenAmount,
    pub abstain_votes: TokenAmount,
    /// Set once the actions are queued in the timelock.
    pub eta: Option<Timestamp>,
    pub canceled: bool,
    pub executed: bool,
    pub receipts: HashMap<Address, Receipt>,
}

impl Proposal {
    /// A majority of for over against, and at least `quorum` for.
    pub fn vote_passed(&self, quorum: TokenAmount) -> bool {
        self.for_votes > self.against_votes && self.for_votes >= quorum
    }

    /// State at `block` / `now`, given the quorum and the timelock's grace period.
    pub fn state(
        &self,
        block: BlockNumber,
        now: Timestamp,
        quorum: TokenAmount,
        grace_period: u64,
    ) -> ProposalState {
        if self.canceled {
            return ProposalState::Canceled;
        }
        if block <= self.start_block {
            return ProposalState::Pending;
        }
        if block <= self.end_block {
            return ProposalState::Active;
        }
        if !self.vote_passed(quorum) {
            return ProposalState::Defeated;
        }
        let Some(eta) = self.eta else {
            return ProposalState::Succeeded;
        };
        if self.executed {
            return ProposalState::Executed;
        }
        match eta.checked_add_secs(grace_period) {
            Some(deadline) if now > deadline => ProposalState::Expired,
            _ => ProposalState::Queued,
        }
    }

    pub fn receipt(&self, voter: &Address) -> Option<Receipt> {
        self.receipts.get(voter).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUORUM: u32 = 400_000;
    const GRACE: u64 = 1_000;

    fn proposal() -> Proposal {
        Proposal {
            id: 1,
            proposer: Address::new("gvl_proposer"),
            actions: Vec::new(),
            description: String::new(),
            start_block: BlockNumber::new(10),
            end_block: BlockNumber::new(20),
            for_votes: TokenAmount::ZERO,
            against_votes: TokenAmount::ZERO,
            abstain_votes: TokenAmount::ZERO,
            eta: None,
            canceled: false,
            executed: false,
            receipts: HashMap::new(),
        }
    }

    fn state_at(p: &Proposal, block: u64, now: u64) -> ProposalState {
        p.state(
            BlockNumber::new(block),
            Timestamp::new(now),
            TokenAmount::from_tokens(QUORUM),
            GRACE,
        )
    }

    #[test]
    fn window_boundaries() {
        let p = proposal();
        assert_eq!(state_at(&p, 10, 0), ProposalState::Pending);
        assert_eq!(state_at(&p, 11, 0), ProposalState::Active);
        assert_eq!(state_at(&p, 20, 0), ProposalState::Active);
        assert_eq!(state_at(&p, 21, 0), ProposalState::Defeated);
    }

    #[test]
    fn majority_and_quorum_are_both_required() {
        let mut p = proposal();
        p.for_votes = TokenAmount::from_tokens(QUORUM);
        p.against_votes = TokenAmount::from_tokens(QUORUM);
        assert_eq!(state_at(&p, 21, 0), ProposalState::Defeated);

        p.against_votes = TokenAmount::ZERO;
        p.for_votes = TokenAmount::from_tokens(QUORUM - 1);
        assert_eq!(state_at(&p, 21, 0), ProposalState::Defeated);

        p.for_votes = TokenAmount::from_tokens(QUORUM);
        assert_eq!(state_at(&p, 21, 0), ProposalState::Succeeded);
    }

    #[test]
    fn queued_then_expired_or_executed() {
        let mut p = proposal();
        p.for_votes = TokenAmount::from_tokens(QUORUM);
        p.eta = Some(Timestamp::new(5_000));
        assert_eq!(state_at(&p, 21, 5_000 + GRACE), ProposalState::Queued);
        assert_eq!(state_at(&p, 21, 5_000 + GRACE + 1), ProposalState::Expired);
        p.executed = true;
        assert_eq!(state_at(&p, 21, 5_000 + GRACE + 1), ProposalState::Executed);
    }

    #[test]
    fn canceled_overrides_everything() {
        let mut p = proposal();
        p.canceled = true;
        assert_eq!(state_at(&p, 0, 0), ProposalState::Canceled);
        assert_eq!(state_at(&p, 100, 0), ProposalState::Canceled);
    }
}
