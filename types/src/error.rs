//! Failure classification shared by every component error.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of precondition a failed operation violated.
///
/// Callers use this to decide whether resubmitting later can succeed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The caller lacks the required role.
    Authorization,
    /// The operation was attempted outside its valid time window.
    Timing,
    /// The operation is invalid for the current derived state.
    StateConflict,
    /// The operation would repeat something that may only happen once.
    Duplicate,
    /// A numeric bound or size limit was hit.
    Capacity,
    /// Malformed input (bad signature, unknown target, bad config).
    Invalid,
}

impl FailureKind {
    /// Only timing failures can succeed if the same operation is resubmitted later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timing)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Authorization => "authorization",
            Self::Timing => "timing",
            Self::StateConflict => "state-conflict",
            Self::Duplicate => "duplicate",
            Self::Capacity => "capacity",
            Self::Invalid => "invalid",
        };
        f.write_str(name)
    }
}
