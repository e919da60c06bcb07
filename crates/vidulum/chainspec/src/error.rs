//! Chain parameter errors.

use crate::{Network, UpgradeIndex};
use vidulum_primitives::AddressError;

/// Invalid chain configuration.
///
/// These are fatal: a node must not start with parameters that fail these
/// checks.
#[derive(Debug, thiserror::Error)]
pub enum ChainSpecError {
    /// `pow_limit` is zero
    #[error("pow limit must be non-zero")]
    ZeroPowLimit,
    /// Summing `averaging_window` targets at `pow_limit` would overflow 256 bits
    #[error("pow limit too large for an averaging window of {averaging_window} blocks")]
    PowLimitWindowOverflow {
        /// Configured averaging window
        averaging_window: i64,
    },
    /// A window or spacing parameter is not positive
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Parameter name
        name: &'static str,
        /// Configured value
        value: i64,
    },
    /// Digishield adjustment bounds outside `0..=100` up or below zero down
    #[error("invalid digishield adjustment bounds: up {max_adjust_up}%, down {max_adjust_down}%")]
    AdjustmentBounds {
        /// Configured `max_adjust_up`
        max_adjust_up: i64,
        /// Configured `max_adjust_down`
        max_adjust_down: i64,
    },
    /// An upgrade activates below one that precedes it
    #[error("{later} activates at {later_height}, before {earlier} at {earlier_height}")]
    UpgradeOrdering {
        /// Upgrade that comes first in protocol order
        earlier: UpgradeIndex,
        /// Its activation height
        earlier_height: i64,
        /// Upgrade that comes later in protocol order
        later: UpgradeIndex,
        /// Its activation height
        later_height: i64,
    },
    /// The base rules cannot be rescheduled
    #[error("activation of {0} cannot be overridden")]
    BaseUpgradeOverride(UpgradeIndex),
    /// Activation overrides are only accepted on regtest
    #[error("parameter overrides are not allowed on {0}")]
    OverridesNotAllowed(Network),
    /// The reward schedule lists no address
    #[error("reward schedule has no addresses")]
    EmptyRewardSchedule,
    /// More reward addresses than rewarded blocks
    #[error("reward schedule has {addresses} addresses but only {last_block_height} blocks")]
    RewardScheduleTooLong {
        /// Number of addresses
        addresses: usize,
        /// Last rewarded height
        last_block_height: i64,
    },
    /// Network name not recognised
    #[error("unknown network: {0}")]
    UnknownNetwork(String),
    /// Override file is not valid TOML for [`crate::RegtestOverrides`]
    #[error(transparent)]
    InvalidOverrides(#[from] toml::de::Error),
    /// Override file could not be read
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reward schedule lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    /// Height outside `1..=last_block_height`
    #[error("height {height} outside reward range 1..={last_block_height}")]
    OutOfRange {
        /// Requested height
        height: i64,
        /// Last rewarded height
        last_block_height: i64,
    },
    /// Index outside the address list
    #[error("reward address index {index} out of range for {len} addresses")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of addresses
        len: usize,
    },
    /// A configured address does not decode for this network
    #[error("invalid reward address {address}: {source}")]
    InvalidAddress {
        /// The configured address
        address: String,
        /// Decoding failure
        #[source]
        source: AddressError,
    },
    /// A configured address is not pay-to-script-hash
    #[error("reward address {0} is not a script hash address")]
    NotScriptHash(String),
}

/// A solution length that matches no known Equihash parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported equihash solution size {0}")]
pub struct UnsupportedSolutionSize(pub usize);
