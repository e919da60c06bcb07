//! Vidulum Rewards System payout schedule.
//!
//! A share of each block reward up to `last_block_height` is paid to a
//! multisig (P2SH) address taken from an ordered list.

use crate::{ChainSpecError, RewardError};
use vidulum_primitives::{Base58Prefixes, Script, decode_destination};

/// How heights map onto the address list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RewardRotation {
    /// Every height pays the first address
    #[default]
    Pinned,
    /// The range `1..=last_block_height` is split into equal intervals that
    /// cycle through the list
    Interval,
}

/// Height-indexed reward address schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSchedule {
    addresses: Vec<String>,
    last_block_height: i64,
    rotation: RewardRotation,
}

impl RewardSchedule {
    /// Creates a schedule. Call [`Self::validate`] before use.
    pub fn new(
        addresses: impl IntoIterator<Item = impl Into<String>>,
        last_block_height: i64,
        rotation: RewardRotation,
    ) -> Self {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            last_block_height,
            rotation,
        }
    }

    /// Last height that carries a reward.
    pub const fn last_block_height(&self) -> i64 {
        self.last_block_height
    }

    /// Rotation strategy
    pub const fn rotation(&self) -> RewardRotation {
        self.rotation
    }

    /// Configured addresses in order
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    /// Blocks paid to one address before rotating to the next.
    pub fn rotation_interval(&self) -> i64 {
        let len = self.addresses.len() as i64;
        (self.last_block_height + len) / len
    }

    /// Address receiving the reward at `height`.
    pub fn address_at_height(&self, height: i64) -> Result<&str, RewardError> {
        if height < 1 || height > self.last_block_height {
            return Err(RewardError::OutOfRange {
                height,
                last_block_height: self.last_block_height,
            });
        }

        let index = match self.rotation {
            RewardRotation::Pinned => 0,
            RewardRotation::Interval => {
                let len = self.addresses.len() as i64;
                ((height / self.rotation_interval()) % len) as usize
            }
        };
        self.address_at_index(index)
    }

    /// Address at position `index` of the list.
    pub fn address_at_index(&self, index: usize) -> Result<&str, RewardError> {
        self.addresses
            .get(index)
            .map(String::as_str)
            .ok_or(RewardError::IndexOutOfRange { index, len: self.addresses.len() })
    }

    /// P2SH output script paying the reward at `height`.
    pub fn script_at_height(
        &self,
        height: i64,
        prefixes: &Base58Prefixes,
    ) -> Result<Script, RewardError> {
        let address = self.address_at_height(height)?;
        let destination = decode_destination(address, prefixes).map_err(|source| {
            RewardError::InvalidAddress { address: address.to_string(), source }
        })?;
        let hash = destination
            .script_hash()
            .ok_or_else(|| RewardError::NotScriptHash(address.to_string()))?;
        Ok(Script::p2sh(hash))
    }

    /// Checks the list is non-empty and no longer than the rewarded range.
    pub fn validate(&self) -> Result<(), ChainSpecError> {
        if self.addresses.is_empty() {
            return Err(ChainSpecError::EmptyRewardSchedule);
        }
        if self.addresses.len() as i64 > self.last_block_height {
            return Err(ChainSpecError::RewardScheduleTooLong {
                addresses: self.addresses.len(),
                last_block_height: self.last_block_height,
            });
        }
        Ok(())
    }
}
