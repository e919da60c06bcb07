//! Read-only view of the block index consumed by the retargeting rules.
//!
//! The block index is owned by the storage layer. Consensus code only needs
//! a handful of fields per block and the ability to jump to an ancestor at an
//! arbitrary height, which [`ChainIndex`] models.

use alloy_primitives::{B256, U256};

/// Number of blocks whose timestamps form the median-time-past.
pub const MEDIAN_TIME_SPAN: i64 = 11;

/// A block index entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockIndexEntry {
    /// Height of the block
    pub height: i64,
    /// Block hash (internal byte order)
    pub hash: B256,
    /// Block timestamp (unix seconds)
    pub time: i64,
    /// Compact difficulty target claimed by the block
    pub bits: u32,
    /// Total work of the chain up to and including this block
    pub chain_work: U256,
}

/// Height-addressable access to the chain a block belongs to.
pub trait ChainIndex {
    /// Returns the ancestor of `tip` at `height`.
    ///
    /// `ancestor(tip, tip.height)` is `tip` itself. Returns `None` for
    /// negative heights, heights above `tip`, and history the index does not
    /// hold.
    fn ancestor(&self, tip: &BlockIndexEntry, height: i64) -> Option<BlockIndexEntry>;

    /// Median timestamp of `tip` and up to ten of its predecessors.
    fn median_time_past(&self, tip: &BlockIndexEntry) -> i64 {
        let mut times = Vec::with_capacity(MEDIAN_TIME_SPAN as usize);
        times.push(tip.time);
        times.extend(
            (1..MEDIAN_TIME_SPAN)
                .map_while(|back| self.ancestor(tip, tip.height - back))
                .map(|block| block.time),
        );
        times.sort_unstable();
        times[times.len() / 2]
    }
}

/// A single linear chain held in memory, indexed by height.
///
/// Ancestor lookups are O(1), which matters because the retargeting
/// algorithms walk up to 120 blocks for every new block.
#[derive(Debug, Clone, Default)]
pub struct InMemoryChain {
    blocks: Vec<BlockIndexEntry>,
}

impl InMemoryChain {
    /// Create an empty chain
    pub const fn new() -> Self {
        Self { blocks: Vec::new() }
    }

    /// Appends a block on top of the current tip and returns its entry.
    ///
    /// The height is assigned from the chain length; `chain_work` is taken as
    /// given.
    pub fn push(&mut self, hash: B256, time: i64, bits: u32, chain_work: U256) -> BlockIndexEntry {
        let entry =
            BlockIndexEntry { height: self.blocks.len() as i64, hash, time, bits, chain_work };
        self.blocks.push(entry);
        entry
    }

    /// Current tip, if any
    pub fn tip(&self) -> Option<&BlockIndexEntry> {
        self.blocks.last()
    }

    /// Block at `height`, if present
    pub fn get(&self, height: i64) -> Option<&BlockIndexEntry> {
        usize::try_from(height).ok().and_then(|h| self.blocks.get(h))
    }

    /// Number of blocks
    pub const fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the chain holds no blocks
    pub const fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl ChainIndex for InMemoryChain {
    fn ancestor(&self, tip: &BlockIndexEntry, height: i64) -> Option<BlockIndexEntry> {
        if height > tip.height {
            return None;
        }
        self.get(height).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_with_times(times: &[i64]) -> InMemoryChain {
        let mut chain = InMemoryChain::new();
        for &time in times {
            chain.push(B256::ZERO, time, 0x2007_ffff, U256::ZERO);
        }
        chain
    }

    #[test]
    fn test_ancestor_bounds() {
        let chain = chain_with_times(&[10, 20, 30, 40]);
        let tip = *chain.get(2).unwrap();

        assert_eq!(chain.ancestor(&tip, 0).map(|b| b.time), Some(10));
        assert_eq!(chain.ancestor(&tip, 2), Some(tip));
        assert_eq!(chain.ancestor(&tip, 3), None);
        assert_eq!(chain.ancestor(&tip, -1), None);
    }

    #[test]
    fn test_median_time_past_short_chain() {
        let chain = chain_with_times(&[100, 300, 200]);
        let tip = *chain.tip().unwrap();

        // Sorted: 100, 200, 300
        assert_eq!(chain.median_time_past(&tip), 200);
    }

    #[test]
    fn test_median_time_past_uses_eleven_blocks() {
        let times: Vec<i64> = (0..20).map(|i| i * 60).collect();
        let chain = chain_with_times(&times);
        let tip = *chain.tip().unwrap();

        // Blocks 9..=19, median is block 14.
        assert_eq!(chain.median_time_past(&tip), 14 * 60);
    }

    #[test]
    fn test_median_time_past_ignores_out_of_order_timestamps() {
        let chain = chain_with_times(&[0, 60, 120, 180, 240, 10_000, 360, 420, 480, 540, 600]);
        let tip = *chain.tip().unwrap();

        assert_eq!(chain.median_time_past(&tip), 360);
    }
}
