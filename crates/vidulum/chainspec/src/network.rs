//! Network identifiers.

use crate::ChainSpecError;
use core::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// The Vidulum networks a parameter set can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network
    Main,
    /// Public test network
    Test,
    /// Local regression test network
    Regtest,
}

impl Network {
    /// Network id string used in data directories and logs.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Test => "test",
            Self::Regtest => "regtest",
        }
    }

    /// Whether the network's parameters may be overridden at startup.
    pub const fn is_regtest(&self) -> bool {
        matches!(self, Self::Regtest)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ChainSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "main" | "mainnet" => Ok(Self::Main),
            "test" | "testnet" => Ok(Self::Test),
            "regtest" => Ok(Self::Regtest),
            _ => Err(ChainSpecError::UnknownNetwork(s.to_string())),
        }
    }
}
