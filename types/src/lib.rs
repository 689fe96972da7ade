//! Fundamental types for gavel.
//!
//! This crate defines the vocabulary shared by every other crate in the workspace:
//! addresses, bounded token amounts, action hashes, the two clocks, the call seam
//! used by the timelock to reach targets, and the audit event stream.

pub mod address;
pub mod amount;
pub mod call;
pub mod error;
pub mod event;
pub mod hash;
pub mod keys;
pub mod time;

pub use address::Address;
pub use amount::TokenAmount;
pub use call::{decode_args, encode_args, Action, CallContext, CallError, CallTarget};
pub use error::FailureKind;
pub use event::{Event, EventBus, VoteSupport};
pub use hash::ActionHash;
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use time::{BlockClock, BlockNumber, ChainClock, Timestamp, WallClock};
