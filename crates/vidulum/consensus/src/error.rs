use alloy_primitives::B256;
use vidulum_chainspec::RewardError;

/// Proof-of-work failures of a single header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PowError {
    /// `bits` decodes to a negative, zero or overflowing target, or to one
    /// easier than the network's limit.
    #[error("invalid difficulty bits {bits:#010x}")]
    InvalidTarget {
        /// Claimed compact target
        bits: u32,
    },
    /// The header hash does not meet its claimed target.
    #[error("hash {hash} does not meet target {bits:#010x}")]
    HashExceedsTarget {
        /// Header hash (internal byte order)
        hash: B256,
        /// Claimed compact target
        bits: u32,
    },
    /// No Equihash parameter set has this solution length.
    #[error("unsupported equihash solution size {0}")]
    UnsupportedSolutionSize(usize),
    /// The solution length selects parameters not accepted at this height.
    #[error("equihash {n},{k} not accepted at height {height}")]
    SolutionParamsNotActive {
        /// Solution's `n`
        n: u32,
        /// Solution's `k`
        k: u32,
        /// Height of the block
        height: i64,
    },
    /// The Equihash solution does not verify.
    #[error("invalid equihash solution")]
    InvalidEquihashSolution,
}

/// Header validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsensusError {
    /// Proof-of-work failure
    #[error(transparent)]
    Pow(#[from] PowError),
    /// Rewards System lookup failure
    #[error(transparent)]
    Reward(#[from] RewardError),
    /// The header claims other bits than the retargeting rules require.
    #[error("incorrect difficulty at height {height}: expected {expected:#010x}, got {got:#010x}")]
    BadDifficultyBits {
        /// Height of the block
        height: i64,
        /// Required compact target
        expected: u32,
        /// Claimed compact target
        got: u32,
    },
    /// The header conflicts with a hard-coded checkpoint.
    #[error("checkpoint mismatch at height {height}")]
    CheckpointMismatch {
        /// Checkpointed height
        height: i64,
        /// Checkpointed hash
        expected: B256,
        /// Header hash
        got: B256,
    },
}
