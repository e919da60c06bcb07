//! Vidulum primitive types
//!
//! The building blocks shared by the chain parameters and the consensus
//! rules:
//! - 256-bit compact ("nBits") target codec
//! - Block header with the Equihash input serialization
//! - Read-only block index view used by difficulty retargeting
//! - Base58Check transparent destinations and output scripts

pub mod address;
pub mod chain;
pub mod compact;
pub mod header;
pub mod script;

pub use address::{AddressError, Base58Prefixes, Destination, Hash160, decode_destination};
pub use chain::{BlockIndexEntry, ChainIndex, InMemoryChain};
pub use compact::{DecodedTarget, compact_to_target, decode_compact, encode_compact, hash_to_uint};
pub use header::BlockHeader;
pub use script::Script;

pub use alloy_primitives::{B256, Bytes, U256};
