//! Compact ("nBits") encoding of 256-bit difficulty targets.
//!
//! A compact value packs a 256-bit integer into 32 bits using a base-256
//! floating point layout:
//!
//! ```text
//!   bits 24..32  size in bytes (exponent)
//!   bit  23      sign
//!   bits 0..23   mantissa
//! ```
//!
//! The exact bit pattern is consensus-critical: block headers carry the
//! compact value, and retargeting results are compared against it after a
//! round trip through [`encode_compact`].

use alloy_primitives::{B256, U256};

/// Sign bit of the compact mantissa.
const SIGN_BIT: u32 = 0x0080_0000;

/// Unsigned mantissa mask.
const MANTISSA_MASK: u32 = 0x007f_ffff;

/// Result of decoding a compact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedTarget {
    /// The expanded 256-bit value. Bits shifted past 256 are dropped.
    pub target: U256,
    /// The sign bit was set on a non-zero mantissa.
    pub negative: bool,
    /// The value does not fit in 256 bits.
    pub overflow: bool,
}

impl DecodedTarget {
    /// Returns the target when it can be used as a proof-of-work threshold:
    /// not negative, not overflowed and not zero.
    pub fn usable(&self) -> Option<U256> {
        (!self.negative && !self.overflow && !self.target.is_zero()).then_some(self.target)
    }
}

/// Decodes a compact value, reporting the sign and overflow conditions.
pub fn decode_compact(bits: u32) -> DecodedTarget {
    let size = (bits >> 24) as usize;
    let mut word = bits & MANTISSA_MASK;

    let target = if size <= 3 {
        word >>= 8 * (3 - size);
        U256::from(word)
    } else {
        shl_bytes(U256::from(word), size - 3)
    };

    let negative = word != 0 && bits & SIGN_BIT != 0;
    let overflow = word != 0 &&
        (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32));

    DecodedTarget { target, negative, overflow }
}

/// Decodes a compact value into its 256-bit target, ignoring the sign and
/// overflow flags.
///
/// This is the conversion the retargeting algorithms apply to historical
/// `bits`, which were already validated when their blocks were accepted.
pub fn compact_to_target(bits: u32) -> U256 {
    decode_compact(bits).target
}

/// Encodes a 256-bit target into its compact form.
///
/// The mantissa is truncated to 23 bits, so `compact_to_target(encode_compact(x)) <= x`.
pub fn encode_compact(value: U256) -> u32 {
    let mut size = value.bit_len().div_ceil(8);
    let mut compact = if size <= 3 {
        (value.as_limbs()[0] << (8 * (3 - size))) as u32
    } else {
        (value >> (8 * (size - 3))).as_limbs()[0] as u32
    };

    // The sign bit is part of the mantissa, move it into the exponent.
    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact | ((size as u32) << 24)
}

/// Interprets a block hash, stored in internal (little-endian) byte order, as
/// a 256-bit integer for comparison against a target.
pub fn hash_to_uint(hash: &B256) -> U256 {
    U256::from_le_bytes(hash.0)
}

fn shl_bytes(value: U256, bytes: usize) -> U256 {
    let bits = bytes * 8;
    if bits >= 256 { U256::ZERO } else { value << bits }
}
