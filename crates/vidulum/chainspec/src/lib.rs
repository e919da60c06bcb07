//! Vidulum Chain Specifications
//!
//! Defines the consensus parameters of the Vidulum networks:
//! - Mainnet (`main`, port 7676)
//! - Testnet (`test`, port 7677)
//! - Regtest (`regtest`, port 7678), whose upgrade schedule can be
//!   overridden at startup

mod error;
mod networks;

pub mod equihash;
pub mod network;
pub mod overrides;
pub mod params;
pub mod reward;
pub mod upgrades;

pub use equihash::{EquihashEpoch, EquihashEpochs, EquihashParams};
pub use error::{ChainSpecError, RewardError, UnsupportedSolutionSize};
pub use network::Network;
pub use overrides::{RegtestOverrides, UpgradeActivation};
pub use params::{ChainParameterSet, ChainParameterSetBuilder, Checkpoints, MajorityWindow};
pub use reward::{RewardRotation, RewardSchedule};
pub use upgrades::{ActivationHeight, NetworkUpgrade, UpgradeIndex, UpgradeTable};

use once_cell::sync::Lazy;
use std::sync::Arc;

/// Vidulum mainnet parameters
pub static MAINNET: Lazy<Arc<ChainParameterSet>> = Lazy::new(|| {
    Arc::new(
        ChainParameterSet::builder(Network::Main)
            .build()
            .expect("mainnet parameters are valid"),
    )
});

/// Vidulum testnet parameters
pub static TESTNET: Lazy<Arc<ChainParameterSet>> = Lazy::new(|| {
    Arc::new(
        ChainParameterSet::builder(Network::Test)
            .build()
            .expect("testnet parameters are valid"),
    )
});

/// Vidulum regtest parameters, without overrides
pub static REGTEST: Lazy<Arc<ChainParameterSet>> = Lazy::new(|| {
    Arc::new(
        ChainParameterSet::builder(Network::Regtest)
            .build()
            .expect("regtest parameters are valid"),
    )
});

impl ChainParameterSet {
    /// Shared parameters of a predefined network
    pub fn for_network(network: Network) -> Arc<Self> {
        match network {
            Network::Main => MAINNET.clone(),
            Network::Test => TESTNET.clone(),
            Network::Regtest => REGTEST.clone(),
        }
    }

    /// Get parameters by network name
    pub fn from_name(name: &str) -> Option<Arc<Self>> {
        name.parse().ok().map(Self::for_network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_mainnet_chain_spec() {
        assert_eq!(MAINNET.network, Network::Main);
        assert_eq!(MAINNET.currency_units, "VDL");
        assert_eq!(MAINNET.default_port, 7676);
        assert_eq!(MAINNET.pow_limit_compact(), 0x1f07_ffff);
        assert_eq!(MAINNET.min_difficulty_after_height, None);
    }

    #[test]
    fn test_chain_spec_lookup() {
        assert!(Arc::ptr_eq(&ChainParameterSet::from_name("mainnet").unwrap(), &*MAINNET));
        assert!(Arc::ptr_eq(&ChainParameterSet::from_name("test").unwrap(), &*TESTNET));
        assert!(ChainParameterSet::from_name("regtest").is_some());
        assert!(ChainParameterSet::from_name("devnet").is_none());
    }

    #[test]
    fn test_mainnet_reward_script() {
        assert_eq!(
            MAINNET.reward_script_at_height(1).unwrap().to_hex(),
            "a914710ecf05cc7129d4e86a00426850595898990d6987"
        );
        assert_eq!(
            MAINNET.reward_address_at_height(849_999).unwrap(),
            "v3mYjaryMy47xwX8Hgehj8yWLtr8XBWKrFB"
        );
    }

    #[test]
    fn test_deployed_schedules_pay_one_address() {
        for params in [&*MAINNET, &*TESTNET, &*REGTEST] {
            let first = params.reward_address_at_height(1).unwrap();
            let last = params.reward_schedule.last_block_height();
            for height in [2, last / 2, last] {
                assert_eq!(params.reward_address_at_height(height).unwrap(), first);
            }
        }
    }

    /// 48 testnet 2-of-3 multisig addresses rotated over the reward range.
    const INTERVAL_FIXTURE: [&str; 48] = [
        "t2UNzUUx8mWBCRYPRezvA363EYXyEpHokyi",
        "t2N9PH9Wk9xjqYg9iin1Ua3aekJqfAtE543",
        "t2NGQjYMQhFndDHguvUw4wZdNdsssA6K7x2",
        "t2ENg7hHVqqs9JwU5cgjvSbxnT2a9USNfhy",
        "t2BkYdVCHzvTJJUTx4yZB8qeegD8QsPx8bo",
        "t2J8q1xH1EuigJ52MfExyyjYtN3VgvshKDf",
        "t2Crq9mydTm37kZokC68HzT6yez3t2FBnFj",
        "t2EaMPUiQ1kthqcP5UEkF42CAFKJqXCkXC9",
        "t2F9dtQc63JDDyrhnfpzvVYTJcr57MkqA12",
        "t2LPirmnfYSZc481GgZBa6xUGcoovfytBnC",
        "t26xfxoSw2UV9Pe5o3C8V4YybQD4SESfxtp",
        "t2D3k4fNdErd66YxtvXEdft9xuLoKD7CcVo",
        "t29G2d6jUjYjaz4wMYJ5QqPxGfHKAMKNEKj",
        "t27me9bxq6pMmpdRXPT4QKfXY8ib8wuqaZy",
        "t2R6BMTdN4ZmRhHmDGVZCArrUeJyQp6pxrP",
        "t2FP9vskBW3pMAMXD32nt8VQq5t4DTxA8rU",
        "t2BuMrZhyK6YZ9S46PP8gQK8trTM2ZJ6Zzc",
        "t2EdBKE5BoiXSHr1Vv6v1CwYaT8c9wRgho4",
        "t2NbUPMPv8qUxcFeavm1frmnUsrZ62GLGC8",
        "t2Jqixgmc6BdKEE8K7DaqVSv1RxvXPpoXKx",
        "t2FegarVZrY5hNvJmLAS1PfLYfjjr7QZqUM",
        "t2GR13uSpuFAnpyAKPdMkJgJnYpzXLYVRcW",
        "t2HGZFi7xGjKUMXwDmV78c3ovNaU6gXZcc4",
        "t26nNDJqiysRHPFmBLC53uEHcTQyzCYJ7WZ",
        "t26u2MDPEpjCQKdbJgRXF63UY6jNpye2yUx",
        "t2FE3LPt9VaipHzoGX4JEeFz4i3EL9orp4r",
        "t2CGqaHKHFNhpcEuEdVpQskRwDk5XzErBkS",
        "t2QWdvdvwFvXSwcRoZzKmgHsAPWcrFzLF9A",
        "t27xrFxhWoKSWetq7RpkdATghuAoHWgww8r",
        "t2Q7r9TRPvq4hG4WczR2XVY3Gz55u6z9FyJ",
        "t2Q5bNr1WDBPegHkEfFiAzz4eHFtLbbmYW1",
        "t2PRkSwDifBjZ4Bx7zsdxbY5DtfUZR2gVQY",
        "t2GCrea4WUo89huFpkiygtegsugWyTLdzt6",
        "t2Neymt11zjMDnP4DeE5yg4USHkKDVaeyYH",
        "t27Q2UfmjYM79kpKZKAMjfeVCDpuTBBYfZG",
        "t2QzLVqwVAnbrrsnrs5SDpQrKjUHX1aRx1H",
        "t2PTwiqaAYttqqGFiZpBUKmjs9cLgNWZy5V",
        "t2VEfGaTPrKZegT63vf4G8zmHhA4SjjDQaA",
        "t2Ef18tVqPjiivVbRxrqPPPvNSbKWueghQn",
        "t26dsaKn3rp7u6T4d4KU4MQw1wF82CdUZQU",
        "t275F8cxuKqgf1GpFdU1WdrLUKEm65smWcu",
        "t26z9JeeeBnP5ewmPesDAzMraKvXSDfqyu5",
        "t29VSQLeGk6sPGbL9eQmqjsdtLeRqFHZTmd",
        "t2ThcAkcApmg6YesxQYZup1oPTNXE7C5LJf",
        "t2FfvZKBUs6qr9p1zAd4rAQ5Nwf9eH2Yd1T",
        "t2KAJ6fkAsxy7xaFSUXzf3WGkepJiunnXVy",
        "t2GBc1dg5Bg4gnTG8vSCzVPzVn2XEwCPdP3",
        "t2U5Uk5YtcdaWfgjuXWvWBmTh6gXhShaLRz",
    ];

    #[test]
    fn test_interval_schedule_fixture() {
        let params = ChainParameterSet::builder(Network::Test)
            .with_reward_schedule(RewardSchedule::new(
                INTERVAL_FIXTURE,
                849_999,
                RewardRotation::Interval,
            ))
            .build()
            .unwrap();
        let schedule = &params.reward_schedule;
        assert_eq!(schedule.rotation_interval(), 17_709);

        assert_eq!(
            params.reward_address_at_height(1).unwrap(),
            "t2UNzUUx8mWBCRYPRezvA363EYXyEpHokyi"
        );
        assert_eq!(
            params.reward_script_at_height(1).unwrap().to_hex(),
            "a914ef775f1f997f122a062fff1a2d7443abd1f9c64287"
        );
        assert_eq!(
            params.reward_address_at_height(53_126).unwrap(),
            "t2NGQjYMQhFndDHguvUw4wZdNdsssA6K7x2"
        );
        assert_eq!(
            params.reward_script_at_height(53_126).unwrap().to_hex(),
            "a914ac67f4c072668138d88a86ff21b27207b283212f87"
        );
        assert_eq!(
            params.reward_address_at_height(53_127).unwrap(),
            "t2ENg7hHVqqs9JwU5cgjvSbxnT2a9USNfhy"
        );
        assert_eq!(
            params.reward_script_at_height(53_127).unwrap().to_hex(),
            "a91455d64928e69829d9376c776550b6cc710d42715387"
        );

        assert_matches!(
            params.reward_script_at_height(0),
            Err(RewardError::OutOfRange { height: 0, last_block_height: 849_999 })
        );
        assert_matches!(
            params.reward_address_at_height(850_000),
            Err(RewardError::OutOfRange { .. })
        );
    }

    #[test]
    fn test_interval_schedule_distribution() {
        let schedule = RewardSchedule::new(INTERVAL_FIXTURE, 849_999, RewardRotation::Interval);
        let first = schedule.address_at_index(0).unwrap();
        let paid_to_first =
            (1..=849_999).filter(|h| schedule.address_at_height(*h).unwrap() == first).count();
        // Height 0 is never rewarded, so the first address misses one block.
        assert_eq!(paid_to_first, 17_708);
    }

    #[test]
    fn test_selection_boundaries_testnet() {
        assert!(!TESTNET.is_upgrade_active(UpgradeIndex::Difa, 209));
        assert!(TESTNET.is_upgrade_active(UpgradeIndex::Difa, 210));
        assert!(!TESTNET.is_upgrade_active(UpgradeIndex::Liquid, 6599));
        assert!(TESTNET.is_upgrade_active(UpgradeIndex::Liquid, 6600));
    }
}
