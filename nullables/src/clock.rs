//! Nullable chain clock: deterministic blocks and time for testing.

use gavel_types::{BlockClock, BlockNumber, Timestamp, WallClock};
use std::cell::Cell;

/// A deterministic block and wall clock for testing.
///
/// Neither clock moves until you tell it to, and the two move independently:
/// mining blocks does not advance time.
pub struct NullChain {
    block: Cell<u64>,
    time: Cell<u64>,
}

impl NullChain {
    pub fn new(block: u64, secs: u64) -> Self {
        Self {
            block: Cell::new(block),
            time: Cell::new(secs),
        }
    }

    /// Produce `blocks` new blocks.
    pub fn mine(&self, blocks: u64) {
        self.block.set(self.block.get() + blocks);
    }

    /// Advance time by a number of seconds.
    pub fn advance_time(&self, secs: u64) {
        self.time.set(self.time.get() + secs);
    }

    /// Set the time to a specific value.
    pub fn set_time(&self, secs: u64) {
        self.time.set(secs);
    }

    pub fn set_block(&self, block: u64) {
        self.block.set(block);
    }
}

impl BlockClock for NullChain {
    fn block_number(&self) -> BlockNumber {
        BlockNumber::new(self.block.get())
    }
}

impl WallClock for NullChain {
    fn timestamp(&self) -> Timestamp {
        Timestamp::new(self.time.get())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mining_does_not_move_time() {
        let chain = NullChain::new(5, 100);
        chain.mine(3);
        assert_eq!(chain.block_number(), BlockNumber::new(8));
        assert_eq!(chain.timestamp(), Timestamp::new(100));

        chain.advance_time(50);
        assert_eq!(chain.timestamp(), Timestamp::new(150));
        assert_eq!(chain.block_number(), BlockNumber::new(8));
    }

    #[test]
    fn setters_jump_directly() {
        let chain = NullChain::new(0, 0);
        chain.set_block(42);
        chain.set_time(1_000);
        assert_eq!(chain.block_number(), BlockNumber::new(42));
        assert_eq!(chain.timestamp(), Timestamp::new(1_000));
    }
}
