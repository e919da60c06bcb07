//! Deployed parameters of mainnet, testnet and regtest.

use crate::{
    Checkpoints, ChainParameterSet, EquihashEpochs, EquihashParams, MajorityWindow, Network,
    NetworkUpgrade, RewardRotation, RewardSchedule, UpgradeTable,
};
use alloy_primitives::{B256, U256, b256, uint};
use std::collections::BTreeMap;
use vidulum_primitives::Base58Prefixes;

/// Seconds between blocks on every network.
const TARGET_SPACING: i64 = 60;

/// Blocks averaged by the dispatcher and Digishield.
const AVERAGING_WINDOW: i64 = 17;

/// LWMA3 window.
const LWMA_WINDOW: i64 = 60;

/// Maximum tip age before the node reports itself as syncing.
const MAX_TIP_AGE: i64 = 24 * 60 * 60;

/// LDAv1 target while its first window fills. Returned as is, without the
/// `pow_limit` cap.
const LIQUID_BOOTSTRAP_LIMIT: U256 =
    uint!(0x001325b61d49f49f49f49f49f49f49f49f49f49f49f49f49f49f49f49f49f49d_U256);

const MAIN_PREFIXES: Base58Prefixes =
    Base58Prefixes { pubkey_address: [0x1d, 0xd8], script_address: [0x1d, 0xde] };

const TEST_PREFIXES: Base58Prefixes =
    Base58Prefixes { pubkey_address: [0x1d, 0x25], script_address: [0x1c, 0xba] };

/// Last height paying the Rewards System: the end of the first halving,
/// shifted by half the slow-start period.
const fn reward_horizon(halving_interval: i64, slow_start_interval: i64) -> i64 {
    halving_interval + slow_start_interval / 2 - 1
}

/// Converts a hash written in display (big-endian) order to internal order.
const fn display_hash(hash: B256) -> B256 {
    let mut bytes = hash.0;
    let mut i = 0;
    while i < 16 {
        let tmp = bytes[i];
        bytes[i] = bytes[31 - i];
        bytes[31 - i] = tmp;
        i += 1;
    }
    B256::new(bytes)
}

/// Unvalidated deployed parameters of `network`.
pub(crate) fn defaults(network: Network) -> ChainParameterSet {
    match network {
        Network::Main => mainnet(),
        Network::Test => testnet(),
        Network::Regtest => regtest(),
    }
}

fn mainnet() -> ChainParameterSet {
    let genesis_hash =
        display_hash(b256!("0001d9baed52947276fac344e3a91ec2de0f13495919c53f7316112d8bc5eda8"));

    ChainParameterSet {
        network: Network::Main,
        currency_units: "VDL",
        bip44_coin_type: 370,
        message_start: [0xde, 0xad, 0xc0, 0x01],
        default_port: 7676,
        base58_prefixes: MAIN_PREFIXES,
        genesis_hash: Some(genesis_hash),
        checkpoints: Checkpoints {
            hashes: BTreeMap::from([
                (0, genesis_hash),
                (
                    395_555,
                    display_hash(b256!(
                        "000035505c0e14edf996f954e8fe11a048edb62bcf98c5bd55cc6a8d79d589bb"
                    )),
                ),
                (
                    695_555,
                    display_hash(b256!(
                        "0000014cac14299e3750264fc6e0fb4036f7f10d784be26bef8f4209e49265b2"
                    )),
                ),
                (
                    1_260_000,
                    display_hash(b256!(
                        "00002271d5a9c0394fafd8ca17484d8f81a6e8bb2ea4fbbbb2dc753fb7780b01"
                    )),
                ),
            ]),
            last_checkpoint_time: 1_617_292_606,
            transactions_at_last_checkpoint: 2_168_671,
            transactions_per_day: 991.0,
        },
        max_tip_age: MAX_TIP_AGE,
        prune_after_height: 100_000,
        majority: MajorityWindow {
            enforce_block_upgrade: 750,
            reject_block_outdated: 950,
            window: 4000,
        },
        coinbase_must_be_protected: true,

        pow_limit: uint!(
            0x0007ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff_U256
        ),
        target_spacing: TARGET_SPACING,
        averaging_window: AVERAGING_WINDOW,
        max_adjust_down: 32,
        max_adjust_up: 16,
        lwma_window: LWMA_WINDOW,
        min_difficulty_after_height: None,
        minimum_chain_work: uint!(0x097bf7cced53_U256),
        liquid_bootstrap_limit: LIQUID_BOOTSTRAP_LIMIT,

        upgrades: UpgradeTable::new([
            NetworkUpgrade::always(170_007),
            NetworkUpgrade::never(170_007),
            NetworkUpgrade::at(170_008, 430_000),
            NetworkUpgrade::at(170_008, 430_000),
            NetworkUpgrade::at(170_008, 430_000),
            NetworkUpgrade::at(170_010, 780_000),
            NetworkUpgrade::at(170_011, 1_290_000),
        ]),
        equihash: EquihashEpochs::new(
            EquihashParams::EH200_9,
            100_020,
            EquihashParams::EH192_7,
            100_000,
        ),
        reward_schedule: RewardSchedule::new(
            ["v3mYjaryMy47xwX8Hgehj8yWLtr8XBWKrFB"],
            reward_horizon(840_000, 20_000),
            RewardRotation::Pinned,
        ),
    }
}

fn testnet() -> ChainParameterSet {
    let genesis_hash =
        display_hash(b256!("05a8853de8a16bed21cb4c60472d6642dee066b3d914e37aba7f7b76ef87002c"));

    ChainParameterSet {
        network: Network::Test,
        currency_units: "VDLT",
        bip44_coin_type: 1,
        message_start: [0xfa, 0x1a, 0xf9, 0xbf],
        default_port: 7677,
        base58_prefixes: TEST_PREFIXES,
        genesis_hash: Some(genesis_hash),
        checkpoints: Checkpoints {
            hashes: BTreeMap::from([
                (0, genesis_hash),
                (
                    500,
                    display_hash(b256!(
                        "00077370398b0ce0f2ecacbb127afff66394d7d525de6b2be608292c015473e6"
                    )),
                ),
            ]),
            last_checkpoint_time: 1_586_391_598,
            transactions_at_last_checkpoint: 504,
            transactions_per_day: 580.0,
        },
        max_tip_age: MAX_TIP_AGE,
        prune_after_height: 1000,
        majority: MajorityWindow { enforce_block_upgrade: 51, reject_block_outdated: 75, window: 400 },
        coinbase_must_be_protected: true,

        pow_limit: uint!(
            0x07ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff_U256
        ),
        target_spacing: TARGET_SPACING,
        averaging_window: AVERAGING_WINDOW,
        max_adjust_down: 32,
        max_adjust_up: 16,
        lwma_window: LWMA_WINDOW,
        min_difficulty_after_height: Some(13_000),
        minimum_chain_work: U256::ZERO,
        liquid_bootstrap_limit: LIQUID_BOOTSTRAP_LIMIT,

        upgrades: UpgradeTable::new([
            NetworkUpgrade::always(170_006),
            NetworkUpgrade::never(170_006),
            NetworkUpgrade::at(170_007, 200),
            NetworkUpgrade::at(170_008, 200),
            NetworkUpgrade::at(170_008, 210),
            NetworkUpgrade::at(170_010, 1210),
            NetworkUpgrade::at(170_011, 6600),
        ]),
        equihash: EquihashEpochs::new(EquihashParams::EH200_9, 10, EquihashParams::EH192_7, 0),
        reward_schedule: RewardSchedule::new(
            ["t274DoPuogFcsgPXr9Qt49u19VScq2ggCyz"],
            reward_horizon(840_000, 20_000),
            RewardRotation::Pinned,
        ),
    }
}

fn regtest() -> ChainParameterSet {
    ChainParameterSet {
        network: Network::Regtest,
        currency_units: "REG",
        bip44_coin_type: 1,
        message_start: [0xaa, 0xe8, 0x3f, 0x5f],
        default_port: 7678,
        base58_prefixes: TEST_PREFIXES,
        genesis_hash: None,
        checkpoints: Checkpoints::default(),
        max_tip_age: MAX_TIP_AGE,
        prune_after_height: 1000,
        majority: MajorityWindow {
            enforce_block_upgrade: 750,
            reject_block_outdated: 950,
            window: 1000,
        },
        coinbase_must_be_protected: false,

        pow_limit: uint!(
            0x0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f0f_U256
        ),
        target_spacing: TARGET_SPACING,
        averaging_window: AVERAGING_WINDOW,
        max_adjust_down: 0,
        max_adjust_up: 0,
        lwma_window: LWMA_WINDOW,
        min_difficulty_after_height: Some(0),
        minimum_chain_work: U256::ZERO,
        liquid_bootstrap_limit: LIQUID_BOOTSTRAP_LIMIT,

        // Difa and Liquid are in force from genesis, so regtest retargets
        // with LDAv1 unless the builder reschedules them.
        upgrades: UpgradeTable::new([
            NetworkUpgrade::always(170_002),
            NetworkUpgrade::never(170_002),
            NetworkUpgrade::never(170_006),
            NetworkUpgrade::never(170_007),
            NetworkUpgrade::always(170_008),
            NetworkUpgrade::never(170_010),
            NetworkUpgrade::always(170_011),
        ]),
        equihash: EquihashEpochs::new(EquihashParams::EH48_5, 1, EquihashParams::EH48_5, 1),
        reward_schedule: RewardSchedule::new(
            ["t274DoPuogFcsgPXr9Qt49u19VScq2ggCyz"],
            reward_horizon(150, 0),
            RewardRotation::Pinned,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActivationHeight, UpgradeIndex};
    use vidulum_primitives::encode_compact;

    #[test]
    fn test_defaults_are_valid() {
        for network in [Network::Main, Network::Test, Network::Regtest] {
            let params = defaults(network);
            assert!(params.validate().is_ok(), "{network} parameters must validate");
            assert_eq!(params.network, network);
        }
    }

    #[test]
    fn test_pow_limits_in_compact_form() {
        assert_eq!(encode_compact(defaults(Network::Main).pow_limit), 0x1f07_ffff);
        assert_eq!(encode_compact(defaults(Network::Test).pow_limit), 0x2007_ffff);
        assert_eq!(encode_compact(defaults(Network::Regtest).pow_limit), 0x200f_0f0f);
    }

    #[test]
    fn test_reward_horizons() {
        assert_eq!(defaults(Network::Main).reward_schedule.last_block_height(), 849_999);
        assert_eq!(defaults(Network::Test).reward_schedule.last_block_height(), 849_999);
        assert_eq!(defaults(Network::Regtest).reward_schedule.last_block_height(), 149);
    }

    #[test]
    fn test_display_hash_reverses_bytes() {
        let hash = display_hash(b256!(
            "0001d9baed52947276fac344e3a91ec2de0f13495919c53f7316112d8bc5eda8"
        ));
        assert_eq!(hash.0[0], 0xa8);
        assert_eq!(hash.0[31], 0x00);
        assert_eq!(hash.0[30], 0x01);
    }

    #[test]
    fn test_mainnet_upgrade_schedule() {
        let params = defaults(Network::Main);
        assert_eq!(
            params.upgrades.activation_height(UpgradeIndex::Difa),
            ActivationHeight::Height(430_000)
        );
        assert_eq!(
            params.upgrades.activation_height(UpgradeIndex::Liquid),
            ActivationHeight::Height(1_290_000)
        );
        assert_eq!(params.upgrades.current_epoch(800_000), UpgradeIndex::Dennis);
    }

    #[test]
    fn test_regtest_upgrade_schedule() {
        let params = defaults(Network::Regtest);
        for upgrade in [UpgradeIndex::BaseSprout, UpgradeIndex::Difa, UpgradeIndex::Liquid] {
            assert_eq!(params.upgrades.activation_height(upgrade), ActivationHeight::AlwaysActive);
        }
        for upgrade in [UpgradeIndex::Overwinter, UpgradeIndex::Sapling, UpgradeIndex::Dennis] {
            assert!(!params.is_upgrade_active(upgrade, i64::MAX));
        }
        assert_eq!(params.upgrades.current_epoch(0), UpgradeIndex::Liquid);
        assert!(!params.coinbase_must_be_protected);
        assert_eq!(params.genesis_hash, None);
    }
}
