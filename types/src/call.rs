//! The seam between the timelock and the things it is allowed to call.
//!
//! An [`Action`] names a target address, a native value, a function signature
//! and bincode-encoded arguments. Anything reachable by an action implements
//! [`CallTarget`]. Targets also expose their state as opaque bytes so a
//! multi-action execution can be rolled back if a later action reverts.

use crate::address::Address;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One privileged call carried by a proposal or queued directly.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Action {
    pub target: Address,
    /// Native value forwarded with the call.
    pub value: u128,
    /// Function signature, e.g. `setMinter(address)`.
    pub signature: String,
    /// bincode-encoded argument tuple.
    pub data: Vec<u8>,
}

impl Action {
    pub fn new(target: Address, signature: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            target,
            value: 0,
            signature: signature.into(),
            data,
        }
    }

    pub fn with_value(mut self, value: u128) -> Self {
        self.value = value;
        self
    }
}

/// Who is calling and with how much native value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    pub value: u128,
}

/// Why a call into a target failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("no target registered at {0}")]
    NoTarget(Address),

    #[error("target does not implement {0}")]
    UnknownSignature(String),

    #[error("malformed call arguments: {0}")]
    BadArguments(String),

    #[error("insufficient native value: need {needed}, have {available}")]
    InsufficientValue { needed: u128, available: u128 },

    #[error("target state could not be saved or restored: {0}")]
    State(String),

    #[error("call reverted: {0}")]
    Reverted(String),
}

/// A component that can be the target of a timelocked action.
pub trait CallTarget {
    /// Perform `signature` with `data` on behalf of `ctx.caller`.
    fn invoke(&mut self, ctx: &CallContext, signature: &str, data: &[u8]) -> Result<(), CallError>;

    /// Serialise the full mutable state.
    fn save_state(&self) -> Result<Vec<u8>, CallError>;

    /// Replace the full mutable state with bytes from [`CallTarget::save_state`].
    fn load_state(&mut self, bytes: &[u8]) -> Result<(), CallError>;
}

/// Encode an argument tuple for [`Action::data`].
pub fn encode_args<T: Serialize>(args: &T) -> Result<Vec<u8>, CallError> {
    bincode::serialize(args).map_err(|e| CallError::BadArguments(e.to_string()))
}

/// Decode an argument tuple from [`Action::data`].
pub fn decode_args<T: DeserializeOwned>(data: &[u8]) -> Result<T, CallError> {
    bincode::deserialize(data).map_err(|e| CallError::BadArguments(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenAmount;

    #[test]
    fn arguments_decode_into_the_encoded_tuple() {
        let to = Address::new("gvl_bob");
        let data = encode_args(&(to.clone(), TokenAmount::from_tokens(5))).unwrap();
        let (decoded_to, amount): (Address, TokenAmount) = decode_args(&data).unwrap();
        assert_eq!(decoded_to, to);
        assert_eq!(amount, TokenAmount::from_tokens(5));
    }

    #[test]
    fn truncated_arguments_are_rejected() {
        let data = encode_args(&(Address::new("gvl_bob"), 7u64)).unwrap();
        let result: Result<(Address, u64), _> = decode_args(&data[..data.len() - 3]);
        assert!(matches!(result, Err(CallError::BadArguments(_))));
    }

    #[test]
    fn oversized_amount_is_rejected_on_decode() {
        let data = encode_args(&u128::MAX).unwrap();
        let result: Result<TokenAmount, _> = decode_args(&data);
        assert!(result.is_err());
    }
}
