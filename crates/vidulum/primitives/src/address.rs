//! Base58Check transparent destinations.

use alloy_primitives::FixedBytes;

/// A RIPEMD160(SHA256(x)) digest identifying a key or a script.
pub type Hash160 = FixedBytes<20>;

/// Length of a decoded transparent address: two version bytes and a hash.
const ADDRESS_PAYLOAD_LEN: usize = 2 + 20;

/// Two-byte Base58Check version prefixes of a network's transparent addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Base58Prefixes {
    /// Prefix of pay-to-pubkey-hash addresses
    pub pubkey_address: [u8; 2],
    /// Prefix of pay-to-script-hash addresses
    pub script_address: [u8; 2],
}

/// A decoded transparent destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Pay to the hash of a public key
    PubKeyHash(Hash160),
    /// Pay to the hash of a redeem script
    ScriptHash(Hash160),
}

impl Destination {
    /// Returns the script hash for P2SH destinations.
    pub const fn script_hash(&self) -> Option<&Hash160> {
        match self {
            Self::ScriptHash(hash) => Some(hash),
            Self::PubKeyHash(_) => None,
        }
    }
}

/// Address decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Not valid Base58, or the checksum does not match
    #[error("invalid base58check encoding: {0}")]
    Base58(String),
    /// Payload has the wrong length
    #[error("invalid address payload length {0}, expected {ADDRESS_PAYLOAD_LEN}")]
    InvalidLength(usize),
    /// Version prefix belongs to neither address kind of this network
    #[error("unknown address prefix {0:02x?}")]
    UnknownPrefix([u8; 2]),
}

/// Decodes a Base58Check transparent address against a network's prefixes.
pub fn decode_destination(
    address: &str,
    prefixes: &Base58Prefixes,
) -> Result<Destination, AddressError> {
    let payload = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|err| AddressError::Base58(err.to_string()))?;

    if payload.len() != ADDRESS_PAYLOAD_LEN {
        return Err(AddressError::InvalidLength(payload.len()));
    }

    let prefix = [payload[0], payload[1]];
    let hash = Hash160::from_slice(&payload[2..]);
    if prefix == prefixes.script_address {
        Ok(Destination::ScriptHash(hash))
    } else if prefix == prefixes.pubkey_address {
        Ok(Destination::PubKeyHash(hash))
    } else {
        Err(AddressError::UnknownPrefix(prefix))
    }
}
