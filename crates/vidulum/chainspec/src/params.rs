//! The immutable parameter set consumed by the consensus rules.

use crate::{
    ActivationHeight, ChainSpecError, EquihashEpochs, Network, RegtestOverrides, RewardError,
    RewardSchedule, UpgradeIndex, UpgradeTable, networks,
};
use alloy_primitives::{B256, U256};
use std::collections::BTreeMap;
use tracing::{debug, info};
use vidulum_primitives::{Base58Prefixes, Script, encode_compact};

/// Known-good block hashes by height, with sync progress estimates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Checkpoints {
    /// Block hash (internal byte order) at each checkpointed height
    pub hashes: BTreeMap<i64, B256>,
    /// Timestamp of the last checkpointed block
    pub last_checkpoint_time: i64,
    /// Transactions between genesis and the last checkpoint
    pub transactions_at_last_checkpoint: u64,
    /// Estimated transactions per day after the last checkpoint
    pub transactions_per_day: f64,
}

impl Checkpoints {
    /// Expected hash at `height`, if checkpointed.
    pub fn get(&self, height: i64) -> Option<&B256> {
        self.hashes.get(&height)
    }

    /// Highest checkpointed height.
    pub fn last_height(&self) -> Option<i64> {
        self.hashes.keys().next_back().copied()
    }
}

/// Block-version supermajority thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MajorityWindow {
    /// Blocks in the window required to enforce a new version
    pub enforce_block_upgrade: u32,
    /// Blocks in the window required to reject outdated versions
    pub reject_block_outdated: u32,
    /// Window length
    pub window: u32,
}

/// Consensus and network parameters of one Vidulum network.
///
/// Built once through [`ChainParameterSetBuilder`] and then shared read-only,
/// usually behind an `Arc`.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ChainParameterSet {
    /// Network described by this set
    pub network: Network,
    /// Ticker of the native currency
    pub currency_units: &'static str,
    /// SLIP-0044 coin type
    pub bip44_coin_type: u32,
    /// P2P message start bytes
    pub message_start: [u8; 4],
    /// Default P2P port
    pub default_port: u16,
    /// Base58Check prefixes of transparent addresses
    pub base58_prefixes: Base58Prefixes,
    /// Genesis block hash (internal byte order), if pinned
    pub genesis_hash: Option<B256>,
    /// Checkpointed block hashes
    pub checkpoints: Checkpoints,
    /// Tip age, in seconds, after which the node considers itself syncing
    pub max_tip_age: i64,
    /// Height below which block files may be pruned
    pub prune_after_height: u64,
    /// Block-version supermajority thresholds
    pub majority: MajorityWindow,
    /// Coinbase outputs must be shielded before being spent
    pub coinbase_must_be_protected: bool,

    /// Easiest allowed target
    pub pow_limit: U256,
    /// Target seconds between blocks
    pub target_spacing: i64,
    /// Blocks averaged by the dispatcher and Digishield
    pub averaging_window: i64,
    /// Digishield maximum downward adjustment, in percent
    pub max_adjust_down: i64,
    /// Digishield maximum upward adjustment, in percent
    pub max_adjust_up: i64,
    /// LWMA3 averaging window
    pub lwma_window: i64,
    /// Height after which slow blocks may use the minimum difficulty
    pub min_difficulty_after_height: Option<i64>,
    /// Work the best chain must have before leaving initial sync
    pub minimum_chain_work: U256,
    /// Target used while LDAv1 accumulates its first window
    pub liquid_bootstrap_limit: U256,

    /// Network upgrade schedule
    pub upgrades: UpgradeTable,
    /// Equihash epochs
    pub equihash: EquihashEpochs,
    /// Rewards System payout schedule
    pub reward_schedule: RewardSchedule,
}

impl ChainParameterSet {
    /// Start building a parameter set from a network's defaults.
    pub fn builder(network: Network) -> ChainParameterSetBuilder {
        ChainParameterSetBuilder::new(network)
    }

    /// `averaging_window * target_spacing`
    pub const fn averaging_window_timespan(&self) -> i64 {
        self.averaging_window * self.target_spacing
    }

    /// Lower clamp of the Digishield timespan
    pub const fn min_actual_timespan(&self) -> i64 {
        self.averaging_window_timespan() * (100 - self.max_adjust_up) / 100
    }

    /// Upper clamp of the Digishield timespan
    pub const fn max_actual_timespan(&self) -> i64 {
        self.averaging_window_timespan() * (100 + self.max_adjust_down) / 100
    }

    /// `pow_limit` in compact form
    pub fn pow_limit_compact(&self) -> u32 {
        encode_compact(self.pow_limit)
    }

    /// Activation height of `upgrade`, when it is scheduled at a concrete height.
    pub const fn activation_height(&self, upgrade: UpgradeIndex) -> Option<i64> {
        self.upgrades.activation_height(upgrade).height()
    }

    /// Whether `upgrade` is active at `height`
    pub const fn is_upgrade_active(&self, upgrade: UpgradeIndex, height: i64) -> bool {
        self.upgrades.is_active(upgrade, height)
    }

    /// Rewards System address at `height`
    pub fn reward_address_at_height(&self, height: i64) -> Result<&str, RewardError> {
        self.reward_schedule.address_at_height(height)
    }

    /// Rewards System output script at `height`
    pub fn reward_script_at_height(&self, height: i64) -> Result<Script, RewardError> {
        self.reward_schedule.script_at_height(height, &self.base58_prefixes)
    }

    /// Checks every construction invariant.
    pub fn validate(&self) -> Result<(), ChainSpecError> {
        for (name, value) in [
            ("target_spacing", self.target_spacing),
            ("averaging_window", self.averaging_window),
            ("lwma_window", self.lwma_window),
        ] {
            if value <= 0 {
                return Err(ChainSpecError::NonPositive { name, value });
            }
        }

        // Keeps the lower Digishield clamp at or below the upper one.
        if !(0..=100).contains(&self.max_adjust_up) || self.max_adjust_down < 0 {
            return Err(ChainSpecError::AdjustmentBounds {
                max_adjust_up: self.max_adjust_up,
                max_adjust_down: self.max_adjust_down,
            });
        }

        if self.pow_limit.is_zero() {
            return Err(ChainSpecError::ZeroPowLimit);
        }
        // The dispatcher sums `averaging_window` targets no larger than the limit.
        if U256::MAX / self.pow_limit < U256::from(self.averaging_window) {
            return Err(ChainSpecError::PowLimitWindowOverflow {
                averaging_window: self.averaging_window,
            });
        }

        self.upgrades.validate()?;
        self.reward_schedule.validate()
    }
}

/// Builder for [`ChainParameterSet`].
///
/// Activation overrides and coinbase protection are only accepted for
/// regtest; [`Self::build`] rejects them on other networks.
#[derive(Debug, Clone)]
pub struct ChainParameterSetBuilder {
    params: ChainParameterSet,
    activations: Vec<(UpgradeIndex, ActivationHeight)>,
    protect_coinbase: bool,
}

impl ChainParameterSetBuilder {
    /// Create a builder seeded with `network`'s deployed parameters
    pub fn new(network: Network) -> Self {
        Self { params: networks::defaults(network), activations: Vec::new(), protect_coinbase: false }
    }

    /// Reschedule `upgrade`
    pub fn with_upgrade_activation(
        mut self,
        upgrade: UpgradeIndex,
        activation: ActivationHeight,
    ) -> Self {
        self.activations.push((upgrade, activation));
        self
    }

    /// Require coinbase outputs to be shielded before being spent
    pub const fn protect_coinbase(mut self) -> Self {
        self.protect_coinbase = true;
        self
    }

    /// Replace the Rewards System schedule
    pub fn with_reward_schedule(mut self, schedule: RewardSchedule) -> Self {
        self.params.reward_schedule = schedule;
        self
    }

    /// Apply overrides read from a configuration file
    pub fn apply_overrides(mut self, overrides: &RegtestOverrides) -> Self {
        if overrides.is_empty() {
            return self;
        }
        self.activations.extend(
            overrides
                .upgrades
                .iter()
                .map(|o| (o.upgrade, ActivationHeight::Height(o.height))),
        );
        self.protect_coinbase |= overrides.protect_coinbase;
        self
    }

    /// Apply pending overrides, validate and return the frozen set.
    pub fn build(self) -> Result<ChainParameterSet, ChainSpecError> {
        let Self { mut params, activations, protect_coinbase } = self;
        let network = params.network;

        if (!activations.is_empty() || protect_coinbase) && !network.is_regtest() {
            return Err(ChainSpecError::OverridesNotAllowed(network));
        }

        for (upgrade, activation) in activations {
            if upgrade == UpgradeIndex::BaseSprout {
                return Err(ChainSpecError::BaseUpgradeOverride(upgrade));
            }
            debug!(target: "vidulum::chainspec", %upgrade, ?activation, "Overriding upgrade activation");
            params.upgrades.set_activation(upgrade, activation);
        }
        if protect_coinbase {
            params.coinbase_must_be_protected = true;
        }

        params.validate()?;
        info!(
            target: "vidulum::chainspec",
            %network,
            pow_limit = %format!("{:#010x}", params.pow_limit_compact()),
            current_epoch = %params.upgrades.current_epoch(i64::MAX),
            last_checkpoint = ?params.checkpoints.last_height(),
            "Loaded chain parameters"
        );
        Ok(params)
    }
}
