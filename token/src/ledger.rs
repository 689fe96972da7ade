//! The voting ledger: balances, allowances, delegation and vote checkpoints.
//!
//! Every account delegates to itself until it names someone else. An
//! account's voting power is the sum of the balances of all accounts
//! delegating to it, and every change to that sum is checkpointed at the
//! current block so that past voting power can be read back exactly.
//!
//! Operations validate everything (balances, allowances, overflow of the
//! receiving delegate) before touching state, so a failed call leaves the
//! ledger unchanged.

use crate::checkpoint::{Checkpoint, CheckpointHistory};
use crate::error::LedgerError;
use gavel_types::{Address, BlockNumber, ChainClock, Event, EventBus, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, info};

/// Construction parameters for a [`VotingLedger`].
#[derive(Clone, Debug)]
pub struct TokenParams {
    /// The ledger's own address (signed-delegation domain, call target address).
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub initial_holder: Address,
    pub initial_supply: TokenAmount,
    /// The minting authority, which also holds the administrative setters.
    pub minter: Address,
    /// Minting is rejected strictly before this time. Fixed for the ledger's life.
    pub minting_allowed_after: Timestamp,
    /// Upgrading to new ledger logic (see [`VotingLedger::upgrade`]) is rejected
    /// strictly before this time.
    pub change_implementation_after: Timestamp,
    /// Whether holders start out unable to transfer.
    pub transfer_paused: bool,
}

/// All mutable ledger state, kept as one record so it can be snapshotted,
/// migrated between schema versions and restored as a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    pub name: String,
    pub symbol: String,
    pub total_supply: TokenAmount,
    pub balances: HashMap<Address, TokenAmount>,
    /// (owner, spender) → remaining allowance.
    pub allowances: HashMap<(Address, Address), TokenAmount>,
    /// Explicit delegations only; an absent entry means self-delegation.
    pub delegates: HashMap<Address, Address>,
    pub checkpoints: HashMap<Address, CheckpointHistory>,
    /// Next expected signed-delegation nonce per signer.
    pub nonces: HashMap<Address, u64>,
    pub minter: Address,
    pub minting_allowed_after: Timestamp,
    pub change_implementation_after: Timestamp,
    pub transfer_paused: bool,
}

/// A planned checkpoint write: the delegate's vote total moves to `current`.
struct VoteWrite {
    delegate: Address,
    previous: TokenAmount,
    current: TokenAmount,
}

pub struct VotingLedger {
    pub(crate) address: Address,
    pub(crate) state: LedgerState,
    pub(crate) clock: Rc<dyn ChainClock>,
    pub(crate) events: Rc<EventBus>,
}

impl VotingLedger {
    /// Create a ledger with the whole initial supply held (and self-delegated)
    /// by `params.initial_holder`.
    pub fn new(params: TokenParams, clock: Rc<dyn ChainClock>, events: Rc<EventBus>) -> Self {
        let state = LedgerState {
            name: params.name,
            symbol: params.symbol,
            total_supply: TokenAmount::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            delegates: HashMap::new(),
            checkpoints: HashMap::new(),
            nonces: HashMap::new(),
            minter: params.minter,
            minting_allowed_after: params.minting_allowed_after,
            change_implementation_after: params.change_implementation_after,
            transfer_paused: params.transfer_paused,
        };
        let mut ledger = Self::from_state(params.address, state, clock, events);
        if !params.initial_supply.is_zero() {
            let holder = params.initial_holder;
            ledger.state.total_supply = params.initial_supply;
            ledger.set_balance(&holder, params.initial_supply);
            ledger.events.emit(Event::BalanceTransferred {
                from: None,
                to: holder.clone(),
                amount: params.initial_supply,
            });
            ledger.apply_vote_writes(vec![VoteWrite {
                delegate: holder,
                previous: TokenAmount::ZERO,
                current: params.initial_supply,
            }]);
        }
        ledger
    }

    pub(crate) fn from_state(
        address: Address,
        state: LedgerState,
        clock: Rc<dyn ChainClock>,
        events: Rc<EventBus>,
    ) -> Self {
        Self {
            address,
            state,
            clock,
            events,
        }
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.state.name
    }

    pub fn symbol(&self) -> &str {
        &self.state.symbol
    }

    pub fn decimals(&self) -> u8 {
        TokenAmount::DECIMALS
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.state.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> TokenAmount {
        self.state
            .balances
            .get(account)
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> TokenAmount {
        self.state
            .allowances
            .get(&(owner.clone(), spender.clone()))
            .copied()
            .unwrap_or(TokenAmount::ZERO)
    }

    /// The account whose checkpoints accrue `account`'s balance.
    pub fn delegates(&self, account: &Address) -> Address {
        self.state
            .delegates
            .get(account)
            .cloned()
            .unwrap_or_else(|| account.clone())
    }

    pub fn minter(&self) -> &Address {
        &self.state.minter
    }

    pub fn minting_allowed_after(&self) -> Timestamp {
        self.state.minting_allowed_after
    }

    pub fn change_implementation_after(&self) -> Timestamp {
        self.state.change_implementation_after
    }

    pub fn transfer_paused(&self) -> bool {
        self.state.transfer_paused
    }

    /// Next nonce a signed delegation from `account` must carry.
    pub fn nonce(&self, account: &Address) -> u64 {
        self.state.nonces.get(account).copied().unwrap_or(0)
    }

    pub fn num_checkpoints(&self, account: &Address) -> usize {
        self.state
            .checkpoints
            .get(account)
            .map(CheckpointHistory::len)
            .unwrap_or(0)
    }

    pub fn checkpoint(&self, account: &Address, index: usize) -> Option<Checkpoint> {
        self.state
            .checkpoints
            .get(account)
            .and_then(|h| h.get(index))
            .copied()
    }

    /// Voting power as of the most recent checkpoint.
    pub fn current_votes(&self, account: &Address) -> TokenAmount {
        self.state
            .checkpoints
            .get(account)
            .map(CheckpointHistory::latest)
            .unwrap_or(TokenAmount::ZERO)
    }

    /// Voting power at the end of `block`.
    ///
    /// Only finalised blocks can be queried: the current block may still
    /// change, so `block >= current` fails with `FutureLookup`.
    pub fn prior_votes(
        &self,
        account: &Address,
        block: BlockNumber,
    ) -> Result<TokenAmount, LedgerError> {
        let current = self.clock.block_number();
        if block >= current {
            return Err(LedgerError::FutureLookup {
                requested: block,
                current,
            });
        }
        Ok(self
            .state
            .checkpoints
            .get(account)
            .map(|h| h.votes_at(block))
            .unwrap_or(TokenAmount::ZERO))
    }

    // ── Balance movement ────────────────────────────────────────────────

    /// Move `amount` from `caller` to `to`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        self.transfer_tokens(caller, caller, to, amount)
    }

    /// Move `amount` from `from` to `to` using `spender`'s allowance.
    ///
    /// An allowance of [`TokenAmount::MAX`] is unlimited and never decremented.
    pub fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        let mut remaining = None;
        if spender != from {
            let allowance = self.allowance(from, spender);
            if allowance != TokenAmount::MAX {
                let left = allowance.checked_sub(amount).ok_or(
                    LedgerError::InsufficientAllowance {
                        needed: amount,
                        available: allowance,
                    },
                )?;
                remaining = Some(left);
            }
        }
        self.transfer_tokens(spender, from, to, amount)?;
        if let Some(left) = remaining {
            self.state
                .allowances
                .insert((from.clone(), spender.clone()), left);
            self.events.emit(Event::Approval {
                owner: from.clone(),
                spender: spender.clone(),
                amount: left,
            });
        }
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: TokenAmount) {
        self.state
            .allowances
            .insert((owner.clone(), spender.clone()), amount);
        self.events.emit(Event::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
    }

    /// Point `holder`'s voting weight at `delegatee`.
    pub fn delegate(&mut self, holder: &Address, delegatee: &Address) -> Result<(), LedgerError> {
        let previous = self.delegates(holder);
        let balance = self.balance_of(holder);
        let writes = self.plan_vote_move(Some(&previous), Some(delegatee), balance)?;

        if delegatee == holder {
            self.state.delegates.remove(holder);
        } else {
            self.state
                .delegates
                .insert(holder.clone(), delegatee.clone());
        }
        info!(
            delegator = %holder,
            from = %previous,
            to = %delegatee,
            "delegate changed"
        );
        self.events.emit(Event::DelegateChanged {
            delegator: holder.clone(),
            from_delegate: previous,
            to_delegate: delegatee.clone(),
        });
        self.apply_vote_writes(writes);
        Ok(())
    }

    /// Create `amount` new tokens for `to`.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        self.require_minter(caller)?;
        let now = self.clock.timestamp();
        if now < self.state.minting_allowed_after {
            return Err(LedgerError::MintingLocked {
                allowed_after: self.state.minting_allowed_after,
                now,
            });
        }
        let supply = self
            .state
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let delegate = self.delegates(to);
        let writes = self.plan_vote_move(None, Some(&delegate), amount)?;

        self.state.total_supply = supply;
        self.set_balance(to, balance);
        info!(to = %to, amount = %amount, supply = %supply, "minted");
        self.events.emit(Event::BalanceTransferred {
            from: None,
            to: to.clone(),
            amount,
        });
        self.apply_vote_writes(writes);
        Ok(())
    }

    // ── Administration (minting authority only) ─────────────────────────

    pub fn set_transfer_paused(
        &mut self,
        caller: &Address,
        paused: bool,
    ) -> Result<(), LedgerError> {
        self.require_minter(caller)?;
        self.state.transfer_paused = paused;
        info!(paused, "transfer pause changed");
        self.events.emit(Event::TransferPauseChanged { paused });
        Ok(())
    }

    pub fn rename(
        &mut self,
        caller: &Address,
        name: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.require_minter(caller)?;
        self.state.name = name.into();
        self.emit_metadata();
        Ok(())
    }

    pub fn rebrand(
        &mut self,
        caller: &Address,
        symbol: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.require_minter(caller)?;
        self.state.symbol = symbol.into();
        self.emit_metadata();
        Ok(())
    }

    /// Hand the minting authority (and the admin setters) to `new_minter`.
    pub fn set_minter(
        &mut self,
        caller: &Address,
        new_minter: &Address,
    ) -> Result<(), LedgerError> {
        self.require_minter(caller)?;
        let previous = std::mem::replace(&mut self.state.minter, new_minter.clone());
        info!(from = %previous, to = %new_minter, "minter changed");
        self.events.emit(Event::MinterChanged {
            previous,
            current: new_minter.clone(),
        });
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn require_minter(&self, caller: &Address) -> Result<(), LedgerError> {
        if caller != &self.state.minter {
            return Err(LedgerError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn emit_metadata(&self) {
        self.events.emit(Event::MetadataChanged {
            name: self.state.name.clone(),
            symbol: self.state.symbol.clone(),
        });
    }

    fn set_balance(&mut self, account: &Address, amount: TokenAmount) {
        if amount.is_zero() {
            self.state.balances.remove(account);
        } else {
            self.state.balances.insert(account.clone(), amount);
        }
    }

    fn transfer_tokens(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> Result<(), LedgerError> {
        if self.state.transfer_paused && caller != &self.state.minter {
            return Err(LedgerError::TransfersPaused);
        }
        let from_balance = self.balance_of(from);
        let from_after = from_balance
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                needed: amount,
                available: from_balance,
            })?;
        let to_after = if from == to {
            from_balance
        } else {
            self.balance_of(to)
                .checked_add(amount)
                .ok_or(LedgerError::Overflow)?
        };
        let src = self.delegates(from);
        let dst = self.delegates(to);
        let writes = self.plan_vote_move(Some(&src), Some(&dst), amount)?;

        if from != to {
            self.set_balance(from, from_after);
            self.set_balance(to, to_after);
        }
        debug!(from = %from, to = %to, amount = %amount, "transfer");
        self.events.emit(Event::BalanceTransferred {
            from: Some(from.clone()),
            to: to.clone(),
            amount,
        });
        self.apply_vote_writes(writes);
        Ok(())
    }

    /// Work out the checkpoint writes for moving `amount` of voting weight
    /// from `src` to `dst` (`None` = minted / burned) without mutating anything.
    fn plan_vote_move(
        &self,
        src: Option<&Address>,
        dst: Option<&Address>,
        amount: TokenAmount,
    ) -> Result<Vec<VoteWrite>, LedgerError> {
        let mut writes = Vec::with_capacity(2);
        if amount.is_zero() || src == dst {
            return Ok(writes);
        }
        if let Some(src) = src {
            let previous = self.current_votes(src);
            let current = previous.checked_sub(amount).ok_or(LedgerError::Overflow)?;
            writes.push(VoteWrite {
                delegate: src.clone(),
                previous,
                current,
            });
        }
        if let Some(dst) = dst {
            let previous = self.current_votes(dst);
            let current = previous.checked_add(amount).ok_or(LedgerError::Overflow)?;
            writes.push(VoteWrite {
                delegate: dst.clone(),
                previous,
                current,
            });
        }
        Ok(writes)
    }

    fn apply_vote_writes(&mut self, writes: Vec<VoteWrite>) {
        let block = self.clock.block_number();
        for write in writes {
            self.state
                .checkpoints
                .entry(write.delegate.clone())
                .or_default()
                .write(block, write.current);
            debug!(
                delegate = %write.delegate,
                previous = %write.previous,
                current = %write.current,
                block = %block,
                "checkpoint written"
            );
            self.events.emit(Event::VotingPowerChanged {
                delegate: write.delegate,
                previous: write.previous,
                current: write.current,
                block,
            });
        }
    }
}
