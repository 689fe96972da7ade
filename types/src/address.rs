//! Account address type with `gvl_` prefix.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A gavel account address, always prefixed with `gvl_`.
///
/// Externally owned accounts derive theirs from an Ed25519 public key (see
/// `gavel_crypto::derive_address`); components such as the timelock or the
/// governor are given a fixed, human-chosen address at construction.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "gvl_";

    /// Create a new address from a raw string.
    ///
    /// # Panics
    /// Panics if the string does not start with `gvl_`.
    pub fn new(raw: impl Into<String>) -> Self {
        let s = raw.into();
        assert!(s.starts_with(Self::PREFIX), "address must start with gvl_");
        Self(s)
    }

    /// Non-panicking constructor for untrusted input.
    pub fn parse(raw: &str) -> Option<Self> {
        let candidate = Self(raw.to_string());
        candidate.is_valid().then_some(candidate)
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.starts_with(Self::PREFIX) && self.0.len() > Self::PREFIX.len()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
