//! Proposal engine: turns weighted votes into timelocked actions.
//!
//! Voting windows are measured in blocks; eta and grace in wall-clock seconds.
//! A vote weighs the voter's delegated power at the proposal's start block,
//! so power acquired after voting opened never counts.

use crate::error::GovernanceError;
use crate::params::{GovernorParams, GovernorSettings, SettingValues, PROPOSAL_MAX_OPERATIONS};
use crate::proposal::{Proposal, ProposalState, Receipt};
use gavel_timelock::{DelayQueue, TimelockError};
use gavel_token::VotingLedger;
use gavel_types::{
    Action, Address, ChainClock, Event, EventBus, Timestamp, TokenAmount, VoteSupport,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info};

pub struct ProposalEngine {
    address: Address,
    quorum: TokenAmount,
    guardian: Option<Address>,
    settings: Rc<RefCell<GovernorSettings>>,
    ledger: Rc<RefCell<VotingLedger>>,
    queue: Rc<RefCell<DelayQueue>>,
    clock: Rc<dyn ChainClock>,
    events: Rc<EventBus>,
    /// Proposal `id` lives at index `id - 1`.
    proposals: Vec<Proposal>,
    latest_proposal_ids: HashMap<Address, u64>,
}

impl ProposalEngine {
    /// Build the engine and register its settings in `queue` under `params.address`.
    ///
    /// The queue's admin must be `params.address` for queueing and execution
    /// to be accepted.
    pub fn new(
        params: GovernorParams,
        ledger: Rc<RefCell<VotingLedger>>,
        queue: Rc<RefCell<DelayQueue>>,
        clock: Rc<dyn ChainClock>,
        events: Rc<EventBus>,
    ) -> Result<Self, GovernanceError> {
        params.validate()?;
        let timelock = queue.borrow().address().clone();
        let settings = Rc::new(RefCell::new(GovernorSettings::new(
            timelock,
            SettingValues {
                voting_delay: params.voting_delay,
                voting_period: params.voting_period,
                proposal_threshold: params.proposal_threshold,
            },
            Rc::clone(&events),
        )));
        queue
            .borrow_mut()
            .register_target(params.address.clone(), settings.clone());
        Ok(Self {
            address: params.address,
            quorum: params.quorum,
            guardian: params.guardian,
            settings,
            ledger,
            queue,
            clock,
            events,
            proposals: Vec::new(),
            latest_proposal_ids: HashMap::new(),
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn quorum(&self) -> TokenAmount {
        self.quorum
    }

    pub fn guardian(&self) -> Option<&Address> {
        self.guardian.as_ref()
    }

    pub fn voting_delay(&self) -> u64 {
        self.settings.borrow().values().voting_delay
    }

    pub fn voting_period(&self) -> u64 {
        self.settings.borrow().values().voting_period
    }

    pub fn proposal_threshold(&self) -> TokenAmount {
        self.settings.borrow().values().proposal_threshold
    }

    pub fn proposal_count(&self) -> u64 {
        self.proposals.len() as u64
    }

    pub fn latest_proposal_id(&self, proposer: &Address) -> Option<u64> {
        self.latest_proposal_ids.get(proposer).copied()
    }

    pub fn proposal(&self, id: u64) -> Option<&Proposal> {
        let index = id.checked_sub(1)?;
        self.proposals.get(usize::try_from(index).ok()?)
    }

    pub fn actions(&self, id: u64) -> Result<&[Action], GovernanceError> {
        Ok(&self.get(id)?.actions)
    }

    pub fn receipt(&self, id: u64, voter: &Address) -> Result<Option<Receipt>, GovernanceError> {
        Ok(self.get(id)?.receipt(voter))
    }

    pub fn state(&self, id: u64) -> Result<ProposalState, GovernanceError> {
        let proposal = self.get(id)?;
        Ok(self.state_of(proposal))
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Open a proposal carrying `actions`. Returns its id.
    pub fn propose(
        &mut self,
        proposer: &Address,
        actions: Vec<Action>,
        description: impl Into<String>,
    ) -> Result<u64, GovernanceError> {
        let settings = self.settings.borrow().values();
        let votes = self.ledger.borrow().current_votes(proposer);
        if votes < settings.proposal_threshold {
            return Err(GovernanceError::BelowThreshold {
                votes,
                threshold: settings.proposal_threshold,
            });
        }
        if actions.is_empty() || actions.len() > PROPOSAL_MAX_OPERATIONS {
            return Err(GovernanceError::EmptyActions {
                count: actions.len(),
                max: PROPOSAL_MAX_OPERATIONS,
            });
        }
        if let Some(id) = self.latest_proposal_id(proposer) {
            if self.state(id)?.is_open() {
                return Err(GovernanceError::AlreadyPending {
                    proposer: proposer.clone(),
                    id,
                });
            }
        }

        let start_block = self
            .clock
            .block_number()
            .checked_add(settings.voting_delay)
            .ok_or(GovernanceError::Overflow)?;
        let end_block = start_block
            .checked_add(settings.voting_period)
            .ok_or(GovernanceError::Overflow)?;
        let id = self.proposal_count() + 1;
        let description = description.into();

        info!(
            proposal_id = id,
            proposer = %proposer,
            actions = actions.len(),
            start = %start_block,
            end = %end_block,
            "proposal created"
        );
        self.events.emit(Event::ProposalCreated {
            id,
            proposer: proposer.clone(),
            actions: actions.clone(),
            start_block,
            end_block,
            description: description.clone(),
        });
        self.proposals.push(Proposal {
            id,
            proposer: proposer.clone(),
            actions,
            description,
            start_block,
            end_block,
            for_votes: TokenAmount::ZERO,
            against_votes: TokenAmount::ZERO,
            abstain_votes: TokenAmount::ZERO,
            eta: None,
            canceled: false,
            executed: false,
            receipts: HashMap::new(),
        });
        self.latest_proposal_ids.insert(proposer.clone(), id);
        Ok(id)
    }

    /// Vote on an active proposal. Returns the weight counted.
    pub fn cast_vote(
        &mut self,
        voter: &Address,
        id: u64,
        support: VoteSupport,
    ) -> Result<TokenAmount, GovernanceError> {
        self.cast_vote_with_reason(voter, id, support, "")
    }

    pub fn cast_vote_with_reason(
        &mut self,
        voter: &Address,
        id: u64,
        support: VoteSupport,
        reason: impl Into<String>,
    ) -> Result<TokenAmount, GovernanceError> {
        let state = self.state(id)?;
        if state != ProposalState::Active {
            return Err(GovernanceError::NotActive { id, state });
        }
        let start_block = self.get(id)?.start_block;
        if self.get(id)?.receipts.contains_key(voter) {
            return Err(GovernanceError::AlreadyVoted {
                voter: voter.clone(),
                id,
            });
        }
        let votes = self.ledger.borrow().prior_votes(voter, start_block)?;

        let proposal = self.get_mut(id)?;
        let tally = match support {
            VoteSupport::For => &mut proposal.for_votes,
            VoteSupport::Against => &mut proposal.against_votes,
            VoteSupport::Abstain => &mut proposal.abstain_votes,
        };
        *tally = tally.checked_add(votes).ok_or(GovernanceError::Overflow)?;
        proposal
            .receipts
            .insert(voter.clone(), Receipt { support, votes });

        debug!(proposal_id = id, voter = %voter, ?support, votes = %votes, "vote cast");
        self.events.emit(Event::VoteCast {
            voter: voter.clone(),
            proposal_id: id,
            support,
            votes,
            reason: reason.into(),
        });
        Ok(votes)
    }

    /// Schedule a succeeded proposal's actions in the timelock. Returns the eta.
    pub fn queue(&mut self, id: u64) -> Result<Timestamp, GovernanceError> {
        let state = self.state(id)?;
        if state != ProposalState::Succeeded {
            return Err(GovernanceError::NotSucceeded { id, state });
        }
        let eta = {
            let mut queue = self.queue.borrow_mut();
            let eta = self
                .clock
                .timestamp()
                .checked_add_secs(queue.delay())
                .ok_or(GovernanceError::Overflow)?;
            let actions = &self.proposals[index_of(id)].actions;
            queue
                .schedule_batch(&self.address, actions, eta)
                .map_err(|e| match e {
                    TimelockError::AlreadyQueued(hash) => GovernanceError::DuplicateAction(hash),
                    other => other.into(),
                })?;
            eta
        };

        self.get_mut(id)?.eta = Some(eta);
        info!(proposal_id = id, eta = %eta, "proposal queued");
        self.events.emit(Event::ProposalQueued { id, eta });
        Ok(eta)
    }

    /// Run every action of a queued proposal, all or nothing.
    pub fn execute(&mut self, id: u64) -> Result<(), GovernanceError> {
        let state = self.state(id)?;
        let eta = match (state, self.get(id)?.eta) {
            (ProposalState::Queued, Some(eta)) => eta,
            _ => return Err(GovernanceError::NotQueued { id, state }),
        };
        let actions = &self.proposals[index_of(id)].actions;
        self.queue
            .borrow_mut()
            .execute_batch(&self.address, actions, eta)?;

        self.get_mut(id)?.executed = true;
        info!(proposal_id = id, "proposal executed");
        self.events.emit(Event::ProposalExecuted { id });
        Ok(())
    }

    /// Cancel a proposal that has not been executed, defeated or canceled.
    ///
    /// Allowed for the guardian, the proposer, or anyone once the proposer's
    /// current voting power has dropped below the proposal threshold.
    /// Actions already in the timelock are removed from it.
    pub fn cancel(&mut self, caller: &Address, id: u64) -> Result<(), GovernanceError> {
        let state = self.state(id)?;
        if matches!(
            state,
            ProposalState::Executed | ProposalState::Defeated | ProposalState::Canceled
        ) {
            return Err(GovernanceError::AlreadyFinal { id, state });
        }
        let proposal = self.get(id)?;
        let is_guardian = self.guardian.as_ref() == Some(caller);
        let is_proposer = &proposal.proposer == caller;
        let proposer_votes = self.ledger.borrow().current_votes(&proposal.proposer);
        if !is_guardian && !is_proposer && proposer_votes >= self.proposal_threshold() {
            return Err(GovernanceError::NotAuthorized {
                caller: caller.clone(),
            });
        }

        if let Some(eta) = proposal.eta {
            let mut queue = self.queue.borrow_mut();
            for action in &proposal.actions {
                let hash = queue.hash_of(action, eta);
                if queue.is_queued(&hash) {
                    queue.cancel(&self.address, &hash)?;
                }
            }
        }

        self.get_mut(id)?.canceled = true;
        info!(proposal_id = id, by = %caller, "proposal canceled");
        self.events.emit(Event::ProposalCanceled { id });
        Ok(())
    }

    /// The guardian gives up its role for good.
    pub fn abdicate(&mut self, caller: &Address) -> Result<(), GovernanceError> {
        if self.guardian.as_ref() != Some(caller) {
            return Err(GovernanceError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        info!(guardian = %caller, "guardian abdicated");
        self.guardian = None;
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn get(&self, id: u64) -> Result<&Proposal, GovernanceError> {
        self.proposal(id).ok_or(GovernanceError::UnknownProposal(id))
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Proposal, GovernanceError> {
        let index = id
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
            .ok_or(GovernanceError::UnknownProposal(id))?;
        self.proposals
            .get_mut(index)
            .ok_or(GovernanceError::UnknownProposal(id))
    }

    fn state_of(&self, proposal: &Proposal) -> ProposalState {
        proposal.state(
            self.clock.block_number(),
            self.clock.timestamp(),
            self.quorum,
            self.queue.borrow().grace_period(),
        )
    }
}

/// Index of a proposal already known to exist.
fn index_of(id: u64) -> usize {
    (id - 1) as usize
}
