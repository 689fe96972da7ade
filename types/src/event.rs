//! Observable events and the bus that delivers them.
//!
//! All three components share one [`EventBus`]. Operations that touch several
//! components (executing a proposal, for instance) open a batch so that events
//! of an aborted operation are discarded instead of reaching listeners.

use crate::address::Address;
use crate::amount::TokenAmount;
use crate::hash::ActionHash;
use crate::call::Action;
use crate::time::{BlockNumber, Timestamp};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

/// How a voter voted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteSupport {
    Against,
    For,
    Abstain,
}

impl TryFrom<u8> for VoteSupport {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(Self::Against),
            1 => Ok(Self::For),
            2 => Ok(Self::Abstain),
            other => Err(other),
        }
    }
}

/// Every externally observable state transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Event {
    // ── ledger ──────────────────────────────────────────────────────────
    /// `from` is `None` for a mint.
    BalanceTransferred {
        from: Option<Address>,
        to: Address,
        amount: TokenAmount,
    },
    Approval {
        owner: Address,
        spender: Address,
        amount: TokenAmount,
    },
    DelegateChanged {
        delegator: Address,
        from_delegate: Address,
        to_delegate: Address,
    },
    VotingPowerChanged {
        delegate: Address,
        previous: TokenAmount,
        current: TokenAmount,
        block: BlockNumber,
    },
    MinterChanged {
        previous: Address,
        current: Address,
    },
    TransferPauseChanged {
        paused: bool,
    },
    MetadataChanged {
        name: String,
        symbol: String,
    },

    // ── governor ────────────────────────────────────────────────────────
    ProposalCreated {
        id: u64,
        proposer: Address,
        actions: Vec<Action>,
        start_block: BlockNumber,
        end_block: BlockNumber,
        description: String,
    },
    VoteCast {
        voter: Address,
        proposal_id: u64,
        support: VoteSupport,
        votes: TokenAmount,
        reason: String,
    },
    ProposalQueued {
        id: u64,
        eta: Timestamp,
    },
    ProposalExecuted {
        id: u64,
    },
    ProposalCanceled {
        id: u64,
    },
    GovernorSettingChanged {
        setting: String,
        previous: u128,
        current: u128,
    },

    // ── timelock ────────────────────────────────────────────────────────
    ActionScheduled {
        hash: ActionHash,
        eta: Timestamp,
    },
    ActionExecuted {
        hash: ActionHash,
        target: Address,
        signature: String,
        eta: Timestamp,
    },
    ActionCanceled {
        hash: ActionHash,
    },
    AdminChanged {
        previous: Address,
        current: Address,
    },
    DelayChanged {
        previous: u64,
        current: u64,
    },
}

type Listener = Box<dyn Fn(&Event)>;

/// Synchronous fan-out bus with nested batches.
///
/// Outside a batch, listeners are invoked inline on `emit`. Inside a batch,
/// events are held until the outermost batch commits. Listeners must not
/// subscribe from inside a callback.
pub struct EventBus {
    listeners: RefCell<Vec<Listener>>,
    batches: RefCell<Vec<Vec<Event>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(Vec::new()),
            batches: RefCell::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: Box<dyn Fn(&Event)>) {
        self.listeners.borrow_mut().push(listener);
    }

    pub fn emit(&self, event: Event) {
        if let Some(batch) = self.batches.borrow_mut().last_mut() {
            batch.push(event);
            return;
        }
        self.deliver(&event);
    }

    /// Open a batch. Must be closed by [`EventBus::commit`] or [`EventBus::rollback`].
    pub fn begin(&self) {
        self.batches.borrow_mut().push(Vec::new());
    }

    /// Close the innermost batch, handing its events to the enclosing batch
    /// or, if it was the outermost one, to the listeners.
    pub fn commit(&self) {
        let finished = {
            let mut batches = self.batches.borrow_mut();
            let Some(finished) = batches.pop() else {
                return;
            };
            match batches.last_mut() {
                Some(parent) => {
                    parent.extend(finished);
                    return;
                }
                None => finished,
            }
        };
        for event in &finished {
            self.deliver(event);
        }
    }

    /// Close the innermost batch and drop its events.
    pub fn rollback(&self) {
        self.batches.borrow_mut().pop();
    }

    /// Run `op` inside a batch, committing on `Ok` and rolling back on `Err`.
    pub fn atomically<T, E>(&self, op: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        self.begin();
        let result = op();
        if result.is_ok() {
            self.commit();
        } else {
            self.rollback();
        }
        result
    }

    fn deliver(&self, event: &Event) {
        for listener in self.listeners.borrow().iter() {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
