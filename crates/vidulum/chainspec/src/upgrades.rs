//! Network upgrade activation table.
//!
//! Every consensus rule change is tied to an [`UpgradeIndex`]. Each network
//! schedules the upgrades independently; the rules of an upgrade apply to a
//! block when the upgrade is active at that block's height.

use crate::ChainSpecError;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, IntoEnumIterator};

/// Protocol upgrades, in activation order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumCount,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UpgradeIndex {
    /// Rules in force since genesis
    BaseSprout,
    /// Placeholder upgrade used by tests
    TestDummy,
    /// Overwinter transaction format
    Overwinter,
    /// Sapling shielded pool
    Sapling,
    /// Switch from Digishield to LWMA3 retargeting
    Difa,
    /// Dennis rule set
    Dennis,
    /// Switch from LWMA3 to LDAv1 retargeting
    Liquid,
}

impl UpgradeIndex {
    /// Position in the activation table.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// When an upgrade becomes active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationHeight {
    /// Active from this height on
    Height(i64),
    /// Active at every height, including genesis
    AlwaysActive,
    /// Never active
    NeverActive,
}

impl ActivationHeight {
    /// Concrete activation height, if any.
    pub const fn height(&self) -> Option<i64> {
        match self {
            Self::Height(height) => Some(*height),
            Self::AlwaysActive | Self::NeverActive => None,
        }
    }

    /// Whether the upgrade is active at `height`.
    pub const fn is_active_at(&self, height: i64) -> bool {
        match self {
            Self::Height(activation) => height >= *activation,
            Self::AlwaysActive => true,
            Self::NeverActive => false,
        }
    }
}

/// A single scheduled upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkUpgrade {
    /// Minimum peer protocol version once the upgrade is active
    pub protocol_version: u32,
    /// Activation schedule
    pub activation: ActivationHeight,
}

impl NetworkUpgrade {
    /// Upgrade activating at a concrete height.
    pub const fn at(protocol_version: u32, height: i64) -> Self {
        Self { protocol_version, activation: ActivationHeight::Height(height) }
    }

    /// Upgrade active from genesis.
    pub const fn always(protocol_version: u32) -> Self {
        Self { protocol_version, activation: ActivationHeight::AlwaysActive }
    }

    /// Upgrade that is never scheduled.
    pub const fn never(protocol_version: u32) -> Self {
        Self { protocol_version, activation: ActivationHeight::NeverActive }
    }
}

/// Activation schedule of every [`UpgradeIndex`] on one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeTable {
    upgrades: [NetworkUpgrade; UpgradeIndex::COUNT],
}

impl UpgradeTable {
    /// Creates a table, indexed in [`UpgradeIndex`] order.
    pub const fn new(upgrades: [NetworkUpgrade; UpgradeIndex::COUNT]) -> Self {
        Self { upgrades }
    }

    /// Scheduled upgrade entry.
    pub const fn get(&self, upgrade: UpgradeIndex) -> &NetworkUpgrade {
        &self.upgrades[upgrade.index()]
    }

    /// Whether `upgrade` is active at `height`.
    pub const fn is_active(&self, upgrade: UpgradeIndex, height: i64) -> bool {
        self.get(upgrade).activation.is_active_at(height)
    }

    /// Raw activation schedule of `upgrade`.
    pub const fn activation_height(&self, upgrade: UpgradeIndex) -> ActivationHeight {
        self.get(upgrade).activation
    }

    /// Protocol version required once `upgrade` is active.
    pub const fn protocol_version(&self, upgrade: UpgradeIndex) -> u32 {
        self.get(upgrade).protocol_version
    }

    /// The most recent upgrade active at `height`.
    pub fn current_epoch(&self, height: i64) -> UpgradeIndex {
        UpgradeIndex::iter()
            .rev()
            .find(|upgrade| self.is_active(*upgrade, height))
            .unwrap_or(UpgradeIndex::BaseSprout)
    }

    /// Iterates over `(upgrade, entry)` pairs in activation order.
    pub fn iter(&self) -> impl Iterator<Item = (UpgradeIndex, &NetworkUpgrade)> + '_ {
        UpgradeIndex::iter().zip(self.upgrades.iter())
    }

    pub(crate) const fn set_activation(
        &mut self,
        upgrade: UpgradeIndex,
        activation: ActivationHeight,
    ) {
        self.upgrades[upgrade.index()].activation = activation;
    }

    /// Checks that concrete activation heights never decrease in upgrade
    /// order.
    pub fn validate(&self) -> Result<(), ChainSpecError> {
        let mut previous: Option<(UpgradeIndex, i64)> = None;
        for (upgrade, entry) in self.iter() {
            let Some(height) = entry.activation.height() else { continue };
            if let Some((earlier, earlier_height)) = previous &&
                height < earlier_height
            {
                return Err(ChainSpecError::UpgradeOrdering {
                    earlier,
                    earlier_height,
                    later: upgrade,
                    later_height: height,
                });
            }
            previous = Some((upgrade, height));
        }
        Ok(())
    }
}
