//! The two time axes of the system.
//!
//! Voting windows are measured in block numbers (an ordering key that only
//! advances when the host produces a block). The minting gate and the timelock
//! eta/grace window are measured in wall-clock seconds. The two are kept as
//! separate types and separate clock traits so one can never be passed where
//! the other is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// `self + secs`, `None` on overflow.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Self> {
        self.0.checked_add(secs).map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// A block number: the ordering key for checkpoints and voting windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockNumber(u64);

impl BlockNumber {
    pub const GENESIS: Self = Self(0);

    pub fn new(height: u64) -> Self {
        Self(height)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    pub fn checked_add(&self, blocks: u64) -> Option<Self> {
        self.0.checked_add(blocks).map(Self)
    }
}

impl fmt::Display for BlockNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Source of the current block number.
pub trait BlockClock {
    fn block_number(&self) -> BlockNumber;
}

/// Source of the current wall-clock time.
pub trait WallClock {
    fn timestamp(&self) -> Timestamp;
}

/// A host that provides both clocks (every real chain does).
pub trait ChainClock: BlockClock + WallClock {}

impl<T: BlockClock + WallClock + ?Sized> ChainClock for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_checked_add_overflows_to_none() {
        assert_eq!(Timestamp::new(10).checked_add_secs(5), Some(Timestamp::new(15)));
        assert_eq!(Timestamp::new(u64::MAX).checked_add_secs(1), None);
    }

    #[test]
    fn block_numbers_order_by_height() {
        assert!(BlockNumber::new(3) < BlockNumber::new(4));
        assert_eq!(BlockNumber::GENESIS.checked_add(7), Some(BlockNumber::new(7)));
    }
}
