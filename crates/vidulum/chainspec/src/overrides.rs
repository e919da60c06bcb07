//! Regtest parameter overrides loaded from TOML.
//!
//! ```toml
//! protect_coinbase = true
//!
//! [[upgrades]]
//! upgrade = "difa"
//! height = 100
//! ```

use crate::{ChainSpecError, UpgradeIndex};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Startup overrides for a regtest parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegtestOverrides {
    /// Enforce that coinbase outputs are shielded before being spent
    pub protect_coinbase: bool,
    /// Upgrade activation heights to replace
    pub upgrades: Vec<UpgradeActivation>,
}

/// A single activation override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpgradeActivation {
    /// Upgrade to reschedule
    pub upgrade: UpgradeIndex,
    /// New activation height
    pub height: i64,
}

impl RegtestOverrides {
    /// Parse overrides from a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self, ChainSpecError> {
        Ok(toml::from_str(s)?)
    }

    /// Load overrides from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ChainSpecError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Whether applying these overrides would change anything.
    pub fn is_empty(&self) -> bool {
        !self.protect_coinbase && self.upgrades.is_empty()
    }
}
