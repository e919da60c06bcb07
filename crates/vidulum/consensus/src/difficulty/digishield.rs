//! Digishield v3.
//!
//! Scales the average target of the last `averaging_window` blocks by the
//! observed median-time-past span, damped by a factor of four and clamped to
//! the network's adjustment bounds.

use alloy_primitives::U256;
use tracing::debug;
use vidulum_chainspec::ChainParameterSet;
use vidulum_primitives::encode_compact;

/// Next compact target from the window's `average` target and the
/// median-time-past of its last and first blocks.
pub fn digishield_next_work(
    average: U256,
    last_median_time: i64,
    first_median_time: i64,
    params: &ChainParameterSet,
) -> u32 {
    let window_timespan = params.averaging_window_timespan();
    let observed = last_median_time - first_median_time;

    // Truncating division, toward zero for negative deviations.
    let damped = window_timespan + (observed - window_timespan) / 4;
    let actual = damped.clamp(params.min_actual_timespan(), params.max_actual_timespan());

    let mut next = (average / U256::from(window_timespan.unsigned_abs()))
        .wrapping_mul(U256::from(actual.max(0).unsigned_abs()));
    if next > params.pow_limit {
        next = params.pow_limit;
    }

    debug!(
        target: "pow",
        observed,
        damped,
        actual,
        bits = %format!("{:#010x}", encode_compact(next)),
        "digishield retarget"
    );
    encode_compact(next)
}
