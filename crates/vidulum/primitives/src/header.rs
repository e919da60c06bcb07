//! Block header as seen by the header-level consensus rules.

use alloy_primitives::{B256, Bytes};
use sha2::{Digest, Sha256};

/// Size of the Equihash input ("I"): the header without nonce and solution.
pub const EQUIHASH_INPUT_SIZE: usize = 4 + 32 * 3 + 4 + 4;

/// A block header.
///
/// All hashes are kept in internal (little-endian) byte order, exactly as
/// they are serialized on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockHeader {
    /// Block version
    pub version: i32,
    /// Hash of the previous block
    pub prev_block: B256,
    /// Merkle root of the block's transactions
    pub merkle_root: B256,
    /// Sapling note commitment tree root after this block
    pub final_sapling_root: B256,
    /// Block timestamp (unix seconds)
    pub time: u32,
    /// Compact difficulty target
    pub bits: u32,
    /// Equihash nonce
    pub nonce: B256,
    /// Equihash solution; its length selects the Equihash parameters
    pub solution: Bytes,
}

impl BlockHeader {
    /// Block timestamp widened for arithmetic against the block index.
    pub const fn block_time(&self) -> i64 {
        self.time as i64
    }

    /// Serializes the Equihash input "I": every header field except nonce
    /// and solution.
    pub fn equihash_input(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(EQUIHASH_INPUT_SIZE);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.extend_from_slice(self.prev_block.as_slice());
        out.extend_from_slice(self.merkle_root.as_slice());
        out.extend_from_slice(self.final_sapling_root.as_slice());
        out.extend_from_slice(&self.time.to_le_bytes());
        out.extend_from_slice(&self.bits.to_le_bytes());
        out
    }

    /// Full wire serialization: `I || nonce || compact_size(solution) || solution`.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = self.equihash_input();
        out.reserve(32 + 9 + self.solution.len());
        out.extend_from_slice(self.nonce.as_slice());
        write_compact_size(&mut out, self.solution.len() as u64);
        out.extend_from_slice(&self.solution);
        out
    }

    /// Block hash: double SHA-256 of the serialized header, in internal byte order.
    pub fn hash(&self) -> B256 {
        let first = Sha256::digest(self.serialize());
        B256::from_slice(&Sha256::digest(first))
    }
}

fn write_compact_size(out: &mut Vec<u8>, len: u64) {
    match len {
        0..=0xfc => out.push(len as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(len as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(len as u32).to_le_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&len.to_le_bytes());
        }
    }
}
