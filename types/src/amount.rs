//! Token amounts and vote weights.
//!
//! Balances and voting power share one bounded unsigned type. The bound is
//! 2^96 - 1 raw units, so a vote tally of any realistic supply fits while an
//! overflow is detected instead of wrapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw units per whole token (18 decimals).
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// A token balance or a vote weight, in raw units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct TokenAmount(u128);

impl TokenAmount {
    pub const ZERO: Self = Self(0);

    /// Largest representable amount: 2^96 - 1.
    pub const MAX: Self = Self((1u128 << 96) - 1);

    pub const DECIMALS: u8 = 18;

    /// Build from raw units, `None` if above [`TokenAmount::MAX`].
    pub fn from_raw(raw: u128) -> Option<Self> {
        (raw <= Self::MAX.0).then_some(Self(raw))
    }

    /// Whole tokens. Any `u32` count of whole tokens fits under the bound.
    pub fn from_tokens(units: u32) -> Self {
        Self(units as u128 * TOKEN_UNIT)
    }

    pub fn raw(&self) -> u128 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).and_then(Self::from_raw)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl TryFrom<u128> for TokenAmount {
    type Error = String;

    fn try_from(raw: u128) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or_else(|| format!("amount {raw} exceeds 96 bits"))
    }
}

impl From<TokenAmount> for u128 {
    fn from(amount: TokenAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} raw", self.0)
    }
}
