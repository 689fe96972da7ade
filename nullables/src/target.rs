//! Nullable call target that records every call it receives.

use gavel_types::{Address, CallContext, CallError, CallTarget};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedCall {
    pub caller: Address,
    pub value: u128,
    pub signature: String,
    pub data: Vec<u8>,
}

#[derive(Default, Serialize, Deserialize)]
struct Recorded {
    calls: Vec<RecordedCall>,
    received_value: u128,
}

/// A call target that accepts any signature and remembers it.
///
/// Signatures registered with [`RecordingTarget::fail_on`] revert instead,
/// without being recorded.
#[derive(Default)]
pub struct RecordingTarget {
    recorded: Recorded,
    failing: HashSet<String>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `signature` revert.
    pub fn fail_on(mut self, signature: impl Into<String>) -> Self {
        self.failing.insert(signature.into());
        self
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.recorded.calls
    }

    pub fn call_count(&self, signature: &str) -> usize {
        self.recorded
            .calls
            .iter()
            .filter(|c| c.signature == signature)
            .count()
    }

    /// Total native value forwarded by successful calls.
    pub fn received_value(&self) -> u128 {
        self.recorded.received_value
    }
}

impl CallTarget for RecordingTarget {
    fn invoke(&mut self, ctx: &CallContext, signature: &str, data: &[u8]) -> Result<(), CallError> {
        if self.failing.contains(signature) {
            return Err(CallError::Reverted(format!("{signature} configured to fail")));
        }
        self.recorded.received_value += ctx.value;
        self.recorded.calls.push(RecordedCall {
            caller: ctx.caller.clone(),
            value: ctx.value,
            signature: signature.to_string(),
            data: data.to_vec(),
        });
        Ok(())
    }

    fn save_state(&self) -> Result<Vec<u8>, CallError> {
        bincode::serialize(&self.recorded).map_err(|e| CallError::State(e.to_string()))
    }

    fn load_state(&mut self, bytes: &[u8]) -> Result<(), CallError> {
        self.recorded = bincode::deserialize(bytes).map_err(|e| CallError::State(e.to_string()))?;
        Ok(())
    }
}
