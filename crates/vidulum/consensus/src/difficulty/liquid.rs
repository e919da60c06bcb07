//! Liquid Difficulty Algorithm v1 (LDAv1).
//!
//! Averages the targets of the last [`TARGET_DEPTH`] blocks and compares the
//! linearly weighted solve times of the last [`TIME_DEPTH`] blocks against
//! their expected total. The resulting factor picks a [`LiquidBand`]:
//! hard caps for large swings, a rescale of the averaged target for moderate
//! ones and no change when the chain is close to schedule.

use alloy_primitives::U256;
use tracing::{debug, warn};
use vidulum_chainspec::{ActivationHeight, ChainParameterSet, UpgradeIndex};
use vidulum_primitives::{BlockIndexEntry, ChainIndex, compact_to_target, encode_compact};

/// Blocks whose targets are averaged.
pub const TARGET_DEPTH: i64 = 120;

/// Most recent blocks whose solve times are weighted.
pub const TIME_DEPTH: i64 = 20;

/// How the retarget factor maps onto the next target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiquidBand {
    /// Blocks far too slow: previous target +50%
    CapUp,
    /// Blocks far too fast: previous target -33%
    CapDown,
    /// Moderate drift: averaged target scaled by the factor
    Rescale,
    /// Close to schedule: previous target unchanged
    Hold,
}

impl LiquidBand {
    /// Band of a retarget `factor`, in percent of the expected solve time.
    pub const fn classify(factor: f64) -> Self {
        if factor >= 150.0 {
            Self::CapUp
        } else if factor <= 67.0 {
            Self::CapDown
        } else if factor < 83.0 || factor > 120.0 {
            Self::Rescale
        } else {
            Self::Hold
        }
    }
}

/// Next compact target after `last`.
///
/// Until Liquid has [`TARGET_DEPTH`] blocks of history the network's
/// `liquid_bootstrap_limit` is returned, without the `pow_limit` cap.
pub fn ldav1_next_work<C>(chain: &C, last: &BlockIndexEntry, params: &ChainParameterSet) -> u32
where
    C: ChainIndex + ?Sized,
{
    let activation = match params.upgrades.activation_height(UpgradeIndex::Liquid) {
        ActivationHeight::Height(height) => height,
        ActivationHeight::AlwaysActive => 0,
        ActivationHeight::NeverActive => i64::MAX,
    };
    if last.height < activation.saturating_add(TARGET_DEPTH) {
        debug!(target: "pow", height = last.height, "LDAv1 bootstrap");
        return encode_compact(params.liquid_bootstrap_limit);
    }

    let spacing = params.target_spacing;
    let mut target_total = U256::ZERO;
    let mut weighted_solvetimes: i64 = 0;
    let mut weight = TIME_DEPTH;
    let mut block = *last;

    for _ in 0..TARGET_DEPTH {
        target_total = target_total.wrapping_add(compact_to_target(block.bits));
        let Some(previous) = chain.ancestor(last, block.height - 1) else {
            warn!(target: "pow", height = last.height, "missing LDAv1 history");
            return params.pow_limit_compact();
        };
        if weight >= 1 {
            let solvetime = (block.time - previous.time).clamp(spacing / 10, spacing * 10);
            weighted_solvetimes += solvetime * weight;
            weight -= 1;
        }
        block = previous;
    }

    // Mean target of the window.
    let average_target = (target_total / U256::from(TARGET_DEPTH * 2)).wrapping_mul(U256::from(2));
    let expected = TIME_DEPTH / 2 * (TIME_DEPTH + 1) * spacing;
    let factor = weighted_solvetimes as f64 / expected as f64 * 100.0;
    let band = LiquidBand::classify(factor);

    let last_target = compact_to_target(last.bits);
    let mut next = match band {
        LiquidBand::CapUp => last_target.wrapping_mul(U256::from(150)) / U256::from(100),
        LiquidBand::CapDown => last_target.wrapping_mul(U256::from(67)) / U256::from(100),
        LiquidBand::Rescale => {
            average_target.wrapping_mul(U256::from(factor as u32)) / U256::from(100)
        }
        LiquidBand::Hold => last_target,
    };
    if next > params.pow_limit {
        next = params.pow_limit;
    }

    debug!(
        target: "pow",
        height = last.height,
        factor,
        ?band,
        bits = %format!("{:#010x}", encode_compact(next)),
        "LDAv1 retarget"
    );
    encode_compact(next)
}
