//! Difficulty retargeting.
//!
//! [`next_work_required`] computes the compact target the block after `last`
//! must carry. It handles the network-wide special cases and then hands off
//! to the algorithm active at that height:
//!
//! | Heights                   | Algorithm                     |
//! |---------------------------|-------------------------------|
//! | before Difa               | [Digishield](digishield)      |
//! | Difa until Liquid         | [LWMA3](lwma)                 |
//! | from Liquid on            | [LDAv1](liquid)               |

pub mod digishield;
pub mod liquid;
pub mod lwma;

pub use digishield::digishield_next_work;
pub use liquid::{LiquidBand, ldav1_next_work};
pub use lwma::lwma3_next_work;

use alloy_primitives::U256;
use tracing::debug;
use vidulum_chainspec::{ChainParameterSet, UpgradeIndex};
use vidulum_primitives::{BlockHeader, BlockIndexEntry, ChainIndex, compact_to_target};

/// Retargeting algorithm in force at a height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetargetAlgorithm {
    /// Digishield v3 over the averaging window
    Digishield,
    /// Linearly weighted moving average, from Difa
    Lwma3,
    /// Liquid Difficulty Algorithm v1, from Liquid
    LiquidV1,
}

impl RetargetAlgorithm {
    /// Algorithm that retargets the block at `height`.
    pub const fn select(params: &ChainParameterSet, height: i64) -> Self {
        if !params.is_upgrade_active(UpgradeIndex::Difa, height) {
            Self::Digishield
        } else if !params.is_upgrade_active(UpgradeIndex::Liquid, height) {
            Self::Lwma3
        } else {
            Self::LiquidV1
        }
    }
}

/// Compact target required for the block following `last`.
///
/// `candidate` is the header being validated or mined, if known; its
/// timestamp drives the testnet minimum-difficulty rule.
pub fn next_work_required<C>(
    chain: &C,
    last: Option<&BlockIndexEntry>,
    candidate: Option<&BlockHeader>,
    params: &ChainParameterSet,
) -> u32
where
    C: ChainIndex + ?Sized,
{
    let pow_limit = params.pow_limit_compact();

    // Genesis
    let Some(last) = last else { return pow_limit };
    let window = params.averaging_window;

    // Let the first epoch's last window restart from the limit so the
    // second parameter set does not inherit its difficulty.
    if let Some(epoch1_end) = params.equihash.epoch1_end() &&
        last.height >= epoch1_end - window &&
        last.height < epoch1_end
    {
        debug!(target: "pow", height = last.height, "equihash epoch reset");
        return pow_limit;
    }

    if let Some(after) = params.min_difficulty_after_height &&
        last.height >= after &&
        let Some(candidate) = candidate &&
        candidate.block_time() > last.time + params.target_spacing * 6
    {
        debug!(target: "pow", height = last.height, "minimum difficulty block");
        return pow_limit;
    }

    let mut total = U256::ZERO;
    for height in (last.height - window + 1..=last.height).rev() {
        let Some(block) = chain.ancestor(last, height) else { return pow_limit };
        total = total.wrapping_add(compact_to_target(block.bits));
    }
    let Some(first) = chain.ancestor(last, last.height - window) else { return pow_limit };
    let average = total / U256::from(window.unsigned_abs());

    match RetargetAlgorithm::select(params, last.height + 1) {
        RetargetAlgorithm::Digishield => digishield_next_work(
            average,
            chain.median_time_past(last),
            chain.median_time_past(&first),
            params,
        ),
        RetargetAlgorithm::Lwma3 => lwma3_next_work(chain, last, params),
        RetargetAlgorithm::LiquidV1 => ldav1_next_work(chain, last, params),
    }
}
