//! LWMA3: linearly weighted moving average of solve times.
//!
//! Recent solve times weigh more than old ones. Timestamps are forced to be
//! strictly increasing and each solve time is capped at six target spacings,
//! so a single bad timestamp cannot swing the target. The result moves at
//! most 50% up or 33% down from the previous target.

use alloy_primitives::U256;
use tracing::{debug, warn};
use vidulum_chainspec::ChainParameterSet;
use vidulum_primitives::{BlockIndexEntry, ChainIndex, compact_to_target, encode_compact};

/// Next compact target after `last`.
pub fn lwma3_next_work<C>(chain: &C, last: &BlockIndexEntry, params: &ChainParameterSet) -> u32
where
    C: ChainIndex + ?Sized,
{
    let spacing = params.target_spacing;
    let window = params.lwma_window;
    let height = last.height;
    let pow_limit = params.pow_limit_compact();

    if height < window {
        return pow_limit;
    }
    // Sum of weights times spacing, scaled by the window again to keep the
    // running target sum in range.
    let divisor = U256::from((window * (window + 1) * spacing / 2 * window).unsigned_abs());

    let Some(before) = chain.ancestor(last, height - window) else {
        warn!(target: "pow", height, "missing LWMA3 history");
        return pow_limit;
    };
    let mut previous_time = before.time;
    let mut weighted_solvetimes: i64 = 0;
    let mut target_sum = U256::ZERO;
    let mut previous_target = U256::ZERO;

    for (weight, block_height) in (height - window + 1..=height).enumerate() {
        let Some(block) = chain.ancestor(last, block_height) else {
            warn!(target: "pow", height, block_height, "missing LWMA3 history");
            return pow_limit;
        };

        let this_time = if block.time > previous_time { block.time } else { previous_time + 1 };
        let solvetime = (this_time - previous_time).min(6 * spacing);
        previous_time = this_time;
        weighted_solvetimes += solvetime * (weight as i64 + 1);

        let target = compact_to_target(block.bits);
        target_sum = target_sum.wrapping_add(target / divisor);
        if block_height == height {
            previous_target = target;
        }
    }

    let mut next = U256::from(weighted_solvetimes.unsigned_abs()).wrapping_mul(target_sum);
    let ceiling = previous_target.wrapping_mul(U256::from(150)) / U256::from(100);
    let floor = previous_target.wrapping_mul(U256::from(67)) / U256::from(100);
    if next > ceiling {
        next = ceiling;
    }
    if floor > next {
        next = floor;
    }
    if next > params.pow_limit {
        next = params.pow_limit;
    }

    debug!(
        target: "pow",
        height,
        weighted_solvetimes,
        bits = %format!("{:#010x}", encode_compact(next)),
        "LWMA3 retarget"
    );
    encode_compact(next)
}
