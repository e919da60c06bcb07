//! Proof-of-work predicate and chain work accounting.

use crate::PowError;
use alloy_primitives::{B256, U256};
use tracing::trace;
use vidulum_chainspec::ChainParameterSet;
use vidulum_primitives::{BlockIndexEntry, decode_compact, hash_to_uint};

/// Checks that `hash` meets the target encoded in `bits`.
///
/// The target itself must be positive, must not overflow and must not be
/// easier than the network's `pow_limit`.
pub fn check_proof_of_work(
    hash: &B256,
    bits: u32,
    params: &ChainParameterSet,
) -> Result<(), PowError> {
    let Some(target) = decode_compact(bits).usable().filter(|target| *target <= params.pow_limit)
    else {
        trace!(target: "pow", bits = %format!("{bits:#010x}"), "rejecting unusable target");
        return Err(PowError::InvalidTarget { bits });
    };

    if hash_to_uint(hash) > target {
        trace!(target: "pow", %hash, bits = %format!("{bits:#010x}"), "hash above target");
        return Err(PowError::HashExceedsTarget { hash: *hash, bits });
    }
    Ok(())
}

/// Expected number of hashes to find a block at `bits`: `2^256 / (target + 1)`.
///
/// Unusable targets prove nothing.
pub fn block_proof(bits: u32) -> U256 {
    match decode_compact(bits).usable() {
        // 2^256 does not fit, so compute (2^256 - target - 1) / (target + 1) + 1.
        Some(target) => (!target / (target + U256::from(1))) + U256::from(1),
        None => U256::ZERO,
    }
}

/// Total work of a block with `bits` on top of `parent`.
pub fn chain_work(parent: Option<&BlockIndexEntry>, bits: u32) -> U256 {
    parent.map_or(U256::ZERO, |parent| parent.chain_work).wrapping_add(block_proof(bits))
}

/// Whether `tip` carries at least the network's minimum chain work.
pub fn has_minimum_chain_work(tip: &BlockIndexEntry, params: &ChainParameterSet) -> bool {
    tip.chain_work >= params.minimum_chain_work
}

/// Time it would take to mine the work between `from` and `to` at the
/// difficulty of `tip`, in seconds.
///
/// Negative when `to` has less work than `from`. Saturates at `±i64::MAX`,
/// including when `tip` carries no usable target.
pub fn block_proof_equivalent_time(
    to: &BlockIndexEntry,
    from: &BlockIndexEntry,
    tip: &BlockIndexEntry,
    params: &ChainParameterSet,
) -> i64 {
    let (work, sign) = if to.chain_work > from.chain_work {
        (to.chain_work - from.chain_work, 1)
    } else {
        (from.chain_work - to.chain_work, -1)
    };

    let tip_proof = block_proof(tip.bits);
    if tip_proof.is_zero() {
        return sign * i64::MAX;
    }

    let time = work.wrapping_mul(U256::from(params.target_spacing.unsigned_abs())) / tip_proof;
    if time.bit_len() > 63 {
        return sign * i64::MAX;
    }
    sign * time.to::<i64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use assert_matches::assert_matches;
    use vidulum_chainspec::{MAINNET, TESTNET};

    fn entry(bits: u32, chain_work: u64) -> BlockIndexEntry {
        BlockIndexEntry {
            height: 0,
            hash: B256::ZERO,
            time: 0,
            bits,
            chain_work: U256::from(chain_work),
        }
    }

    #[test]
    fn test_hash_at_target_passes() {
        // Little-endian hash equal to the target of 0x1f07ffff.
        let mut bytes = [0u8; 32];
        bytes[30] = 0x07;
        bytes[29] = 0xff;
        bytes[28] = 0xff;
        assert!(check_proof_of_work(&B256::new(bytes), 0x1f07_ffff, &MAINNET).is_ok());

        bytes[0] = 0x01;
        assert_matches!(
            check_proof_of_work(&B256::new(bytes), 0x1f07_ffff, &MAINNET),
            Err(PowError::HashExceedsTarget { bits: 0x1f07_ffff, .. })
        );
    }

    #[test]
    fn test_rejects_unusable_targets() {
        for bits in [0x1f87_ffff, 0x1f00_0000, 0xff12_3456, 0x2007_ffff] {
            assert_matches!(
                check_proof_of_work(&B256::ZERO, bits, &MAINNET),
                Err(PowError::InvalidTarget { bits: got }) if got == bits
            );
        }
        // The testnet limit is easier than the mainnet one.
        assert!(check_proof_of_work(&B256::ZERO, 0x2007_ffff, &TESTNET).is_ok());
    }

    #[test]
    fn test_hash_is_compared_little_endian() {
        let hash = b256!("00000000000000000000000000000000000000000000000000000000000000ff");
        assert_matches!(
            check_proof_of_work(&hash, 0x1f07_ffff, &MAINNET),
            Err(PowError::HashExceedsTarget { .. })
        );
        let hash = b256!("ff00000000000000000000000000000000000000000000000000000000000000");
        assert!(check_proof_of_work(&hash, 0x1f07_ffff, &MAINNET).is_ok());
    }

    #[test]
    fn test_block_proof() {
        assert_eq!(block_proof(0x1d00_ffff), U256::from(0x1_0001_0001u64));
        assert_eq!(block_proof(0x1f07_ffff), U256::from(0x2000));
        assert_eq!(block_proof(0x2007_ffff), U256::from(0x20));
        assert_eq!(block_proof(0), U256::ZERO);
        assert_eq!(block_proof(0x1f87_ffff), U256::ZERO);
    }

    #[test]
    fn test_chain_work_accumulates() {
        let genesis = entry(0x1f07_ffff, 0x2000);
        assert_eq!(chain_work(None, 0x1f07_ffff), U256::from(0x2000));
        assert_eq!(chain_work(Some(&genesis), 0x1f07_ffff), U256::from(0x4000));
    }

    #[test]
    fn test_minimum_chain_work() {
        assert!(!has_minimum_chain_work(&entry(0x1f07_ffff, 0x2000), &MAINNET));
        assert!(has_minimum_chain_work(&entry(0x1f07_ffff, 0x097b_f7cc_ed53), &MAINNET));
        assert!(has_minimum_chain_work(&entry(0x1f07_ffff, 0), &TESTNET));
    }

    #[test]
    fn test_equivalent_time() {
        let tip = entry(0x1f07_ffff, 0);
        let low = entry(0x1f07_ffff, 0x2000);
        let high = entry(0x1f07_ffff, 0x2000 * 11);

        // Ten blocks of work at the tip's difficulty.
        assert_eq!(block_proof_equivalent_time(&high, &low, &tip, &MAINNET), 600);
        assert_eq!(block_proof_equivalent_time(&low, &high, &tip, &MAINNET), -600);
        assert_eq!(block_proof_equivalent_time(&low, &low, &tip, &MAINNET), 0);
    }

    #[test]
    fn test_equivalent_time_saturates() {
        let from = entry(0x1f07_ffff, 0);
        let mut to = from;
        to.chain_work = U256::from(1) << 200;
        let tip = entry(0x2007_ffff, 0);

        assert_eq!(block_proof_equivalent_time(&to, &from, &tip, &MAINNET), i64::MAX);
        assert_eq!(block_proof_equivalent_time(&from, &to, &tip, &MAINNET), -i64::MAX);

        let unusable_tip = entry(0, 0);
        let to = entry(0x1f07_ffff, 1);
        assert_eq!(block_proof_equivalent_time(&to, &from, &unusable_tip, &MAINNET), i64::MAX);
    }
}
