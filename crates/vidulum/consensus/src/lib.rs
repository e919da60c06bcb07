//! Vidulum Consensus Implementation
//!
//! Header-level consensus rules of the Vidulum networks:
//! - Difficulty retargeting: Digishield, LWMA3 and LDAv1, switched by
//!   network upgrade
//! - Proof of work: compact target checks and chain work
//! - Equihash: parameter epochs and solution verification
//!
//! All rules are pure functions of a [`ChainParameterSet`] and a read-only
//! [`ChainIndex`] view of the chain.

mod error;

pub mod difficulty;
pub mod equihash;
pub mod pow;

pub use difficulty::{RetargetAlgorithm, next_work_required};
pub use equihash::{
    EquihashState, EquihashVerifier, check_equihash_params_for_height, check_equihash_solution,
};
pub use error::{ConsensusError, PowError};
pub use pow::{
    block_proof, block_proof_equivalent_time, chain_work, check_proof_of_work,
    has_minimum_chain_work,
};

use std::sync::Arc;
use tracing::debug;
use vidulum_chainspec::ChainParameterSet;
use vidulum_primitives::{BlockHeader, BlockIndexEntry, ChainIndex, Script};

/// Vidulum consensus rules bound to one network's parameters.
#[derive(Debug, Clone)]
pub struct VidulumConsensus {
    params: Arc<ChainParameterSet>,
}

impl VidulumConsensus {
    /// Create consensus rules for `params`
    pub const fn new(params: Arc<ChainParameterSet>) -> Self {
        Self { params }
    }

    /// Network parameters
    pub fn params(&self) -> &ChainParameterSet {
        &self.params
    }

    /// Compact target required for the block after `last`.
    pub fn next_work_required<C>(
        &self,
        chain: &C,
        last: Option<&BlockIndexEntry>,
        candidate: Option<&BlockHeader>,
    ) -> u32
    where
        C: ChainIndex + ?Sized,
    {
        next_work_required(chain, last, candidate, &self.params)
    }

    /// Context-free header checks: Equihash solution, then proof of work.
    pub fn check_header(
        &self,
        header: &BlockHeader,
        verifier: &impl EquihashVerifier,
    ) -> Result<(), ConsensusError> {
        check_equihash_solution(header, verifier)?;
        check_proof_of_work(&header.hash(), header.bits, &self.params)?;
        Ok(())
    }

    /// Checks of `header` against its position on top of `parent`: the
    /// Equihash epoch, the required difficulty and any checkpoint.
    pub fn check_header_against_chain<C>(
        &self,
        chain: &C,
        parent: Option<&BlockIndexEntry>,
        header: &BlockHeader,
    ) -> Result<(), ConsensusError>
    where
        C: ChainIndex + ?Sized,
    {
        let height = parent.map_or(0, |parent| parent.height + 1);
        check_equihash_params_for_height(header, height, &self.params)?;

        let expected = self.next_work_required(chain, parent, Some(header));
        if header.bits != expected {
            debug!(target: "pow", height, expected, got = header.bits, "bad difficulty bits");
            return Err(ConsensusError::BadDifficultyBits { height, expected, got: header.bits });
        }

        if let Some(checkpoint) = self.params.checkpoints.get(height) {
            let hash = header.hash();
            if hash != *checkpoint {
                return Err(ConsensusError::CheckpointMismatch {
                    height,
                    expected: *checkpoint,
                    got: hash,
                });
            }
        }
        Ok(())
    }

    /// Script the Rewards System output must pay at `height`.
    pub fn reward_script_at_height(&self, height: i64) -> Result<Script, ConsensusError> {
        Ok(self.params.reward_script_at_height(height)?)
    }
}
