//! Versioned ledger state.
//!
//! The whole mutable state is exported as one record tagged with a schema
//! version. Decoding runs the sequential migrations needed to bring an older
//! record up to [`CURRENT_SCHEMA_VERSION`] and refuses records written by a
//! newer schema.
//!
//! Two paths consume snapshots. [`VotingLedger::upgrade`] moves the state into
//! a ledger running new logic and is gated by the minting authority and the
//! `change_implementation_after` time. [`VotingLedger::restore`] puts back a
//! snapshot taken moments earlier to roll back a failed batch and is ungated.

use crate::checkpoint::CheckpointHistory;
use crate::error::LedgerError;
use crate::ledger::{LedgerState, VotingLedger};
use gavel_types::{Address, ChainClock, EventBus, Timestamp, TokenAmount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::rc::Rc;
use tracing::info;

/// The schema version that the current code writes.
pub const CURRENT_SCHEMA_VERSION: u32 = 3;

#[derive(Serialize, Deserialize)]
struct Envelope {
    schema_version: u32,
    payload: Vec<u8>,
}

/// Schema v1: the layout before signed delegation existed (no nonces).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerStateV1 {
    pub name: String,
    pub symbol: String,
    pub total_supply: TokenAmount,
    pub balances: HashMap<Address, TokenAmount>,
    pub allowances: HashMap<(Address, Address), TokenAmount>,
    pub delegates: HashMap<Address, Address>,
    pub checkpoints: HashMap<Address, CheckpointHistory>,
    pub minter: Address,
    pub minting_allowed_after: Timestamp,
    pub transfer_paused: bool,
}

/// Schema v2: nonces added, no upgrade gate yet.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerStateV2 {
    pub name: String,
    pub symbol: String,
    pub total_supply: TokenAmount,
    pub balances: HashMap<Address, TokenAmount>,
    pub allowances: HashMap<(Address, Address), TokenAmount>,
    pub delegates: HashMap<Address, Address>,
    pub checkpoints: HashMap<Address, CheckpointHistory>,
    pub nonces: HashMap<Address, u64>,
    pub minter: Address,
    pub minting_allowed_after: Timestamp,
    pub transfer_paused: bool,
}

impl From<LedgerStateV1> for LedgerStateV2 {
    fn from(v1: LedgerStateV1) -> Self {
        Self {
            name: v1.name,
            symbol: v1.symbol,
            total_supply: v1.total_supply,
            balances: v1.balances,
            allowances: v1.allowances,
            delegates: v1.delegates,
            checkpoints: v1.checkpoints,
            nonces: HashMap::new(),
            minter: v1.minter,
            minting_allowed_after: v1.minting_allowed_after,
            transfer_paused: v1.transfer_paused,
        }
    }
}

impl From<LedgerStateV2> for LedgerState {
    /// Records written before the gate existed take the minting floor as
    /// their upgrade floor.
    fn from(v2: LedgerStateV2) -> Self {
        Self {
            name: v2.name,
            symbol: v2.symbol,
            total_supply: v2.total_supply,
            balances: v2.balances,
            allowances: v2.allowances,
            delegates: v2.delegates,
            checkpoints: v2.checkpoints,
            nonces: v2.nonces,
            minter: v2.minter,
            minting_allowed_after: v2.minting_allowed_after,
            change_implementation_after: v2.minting_allowed_after,
            transfer_paused: v2.transfer_paused,
        }
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, LedgerError> {
    bincode::serialize(value).map_err(|e| LedgerError::Snapshot(e.to_string()))
}

fn decode<'a, T: Deserialize<'a>>(bytes: &'a [u8]) -> Result<T, LedgerError> {
    bincode::deserialize(bytes).map_err(|e| LedgerError::Snapshot(e.to_string()))
}

/// Wrap a state record of `schema_version` for storage or transport.
pub fn encode_versioned<T: Serialize>(
    schema_version: u32,
    state: &T,
) -> Result<Vec<u8>, LedgerError> {
    encode(&Envelope {
        schema_version,
        payload: encode(state)?,
    })
}

/// Decode a snapshot of any supported schema into the current layout.
pub fn decode_state(bytes: &[u8]) -> Result<LedgerState, LedgerError> {
    let envelope: Envelope = decode(bytes)?;
    let payload = &envelope.payload;
    match envelope.schema_version {
        1 => {
            info!(from = 1, to = CURRENT_SCHEMA_VERSION, "migrating ledger state");
            let v2: LedgerStateV2 = decode::<LedgerStateV1>(payload)?.into();
            Ok(v2.into())
        }
        2 => {
            info!(from = 2, to = CURRENT_SCHEMA_VERSION, "migrating ledger state");
            Ok(decode::<LedgerStateV2>(payload)?.into())
        }
        CURRENT_SCHEMA_VERSION => decode(payload),
        found => Err(LedgerError::IncompatibleSchema {
            found,
            supported: CURRENT_SCHEMA_VERSION,
        }),
    }
}

impl VotingLedger {
    /// Export the full state at the current schema version.
    pub fn snapshot(&self) -> Result<Vec<u8>, LedgerError> {
        encode_versioned(CURRENT_SCHEMA_VERSION, &self.state)
    }

    /// Build a ledger running the current logic from an older ledger's
    /// snapshot, migrating older schemas.
    ///
    /// Only the snapshot's minting authority may upgrade, and not before the
    /// snapshot's `change_implementation_after`.
    pub fn upgrade(
        caller: &Address,
        address: Address,
        bytes: &[u8],
        clock: Rc<dyn ChainClock>,
        events: Rc<EventBus>,
    ) -> Result<Self, LedgerError> {
        let state = decode_state(bytes)?;
        if caller != &state.minter {
            return Err(LedgerError::NotAuthorized {
                caller: caller.clone(),
            });
        }
        let now = clock.timestamp();
        if now < state.change_implementation_after {
            return Err(LedgerError::UpgradeLocked {
                allowed_after: state.change_implementation_after,
                now,
            });
        }
        info!(token = %address, by = %caller, "ledger upgraded");
        Ok(Self::from_state(address, state, clock, events))
    }

    /// Replace the whole state with a snapshot (used to roll back a failed batch).
    pub fn restore(&mut self, bytes: &[u8]) -> Result<(), LedgerError> {
        self.state = decode_state(bytes)?;
        Ok(())
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }
}
