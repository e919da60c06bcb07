//! Output scripts.

use crate::address::Hash160;
use alloy_primitives::{Bytes, hex};
use core::fmt;

const OP_HASH160: u8 = 0xa9;
const OP_EQUAL: u8 = 0x87;
const PUSH_20: u8 = 0x14;

/// A serialized output script.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script(pub Bytes);

impl Script {
    /// Pay-to-script-hash: `OP_HASH160 <hash> OP_EQUAL`.
    pub fn p2sh(hash: &Hash160) -> Self {
        let mut bytes = Vec::with_capacity(23);
        bytes.push(OP_HASH160);
        bytes.push(PUSH_20);
        bytes.extend_from_slice(hash.as_slice());
        bytes.push(OP_EQUAL);
        Self(bytes.into())
    }

    /// Raw script bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex without prefix
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_p2sh_layout() {
        let script = Script::p2sh(&Hash160::from(hex!("058ff36e38e1635874807a0ad4bdb1703fe28710")));
        assert_eq!(script.as_bytes().len(), 23);
        assert_eq!(script.to_hex(), "a914058ff36e38e1635874807a0ad4bdb1703fe2871087");
        assert_eq!(script.to_string(), script.to_hex());
    }

    #[test]
    fn test_empty_script() {
        assert_eq!(Script::default().to_hex(), "");
        assert!(Script::default().as_bytes().is_empty());
    }
}
