//! Per-account voting-power history.
//!
//! A history is an append-only list of `(block, votes)` pairs sorted by block.
//! A second write in the same block overwrites the last entry instead of
//! appending, so there is at most one checkpoint per block. Entries before the
//! last one are never modified, which makes any answer for a past block final.

use gavel_types::{BlockNumber, TokenAmount};
use serde::{Deserialize, Serialize};

/// Voting power of one account as of the end of `block`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub block: BlockNumber,
    pub votes: TokenAmount,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointHistory {
    entries: Vec<Checkpoint>,
}

impl CheckpointHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `votes` at `block`, coalescing with an entry at the same block.
    ///
    /// `block` must not precede the latest entry; the block clock is monotonic.
    pub fn write(&mut self, block: BlockNumber, votes: TokenAmount) {
        if let Some(last) = self.entries.last_mut() {
            debug_assert!(last.block <= block, "checkpoint written out of order");
            if last.block == block {
                last.votes = votes;
                return;
            }
        }
        self.entries.push(Checkpoint { block, votes });
    }

    /// Most recent vote value, zero if nothing was ever recorded.
    pub fn latest(&self) -> TokenAmount {
        self.entries.last().map(|c| c.votes).unwrap_or(TokenAmount::ZERO)
    }

    /// Votes recorded by the latest checkpoint at or before `block`.
    ///
    /// The "latest" query is answered without searching; anything older is
    /// an O(log n) binary search.
    pub fn votes_at(&self, block: BlockNumber) -> TokenAmount {
        match self.entries.last() {
            None => TokenAmount::ZERO,
            Some(last) if last.block <= block => last.votes,
            Some(_) => match self.entries.partition_point(|c| c.block <= block) {
                0 => TokenAmount::ZERO,
                n => self.entries[n - 1].votes,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Checkpoint> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Checkpoint> {
        self.entries.iter()
    }
}
