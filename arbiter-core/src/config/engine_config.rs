//! Configuration for the reputation engine.
//!
//! # Examples
//!
//! ```
//! use arbiter_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.minimum_stake, 100);
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MINIMUM_STAKE;
use crate::errors::{ArbiterError, ArbiterResult};

/// Engine-wide configuration.
///
/// `minimum_stake` only seeds the persisted setting on a fresh ledger;
/// later changes go through the admin surface and are stored with the
/// ledger so they survive reopen.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial minimum stake required for staked feedback. Default: 100.
    pub minimum_stake: u64,
    /// Principal granted the admin capability when the capability table is
    /// empty. Default: "arbiter://admin".
    pub bootstrap_admin: String,
    /// Read pool size for file-backed databases. Default: 4.
    pub read_pool_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            minimum_stake: DEFAULT_MINIMUM_STAKE,
            bootstrap_admin: "arbiter://admin".to_string(),
            read_pool_size: 4,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing fields fall back to defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbiter_core::config::EngineConfig;
    ///
    /// let config = EngineConfig::from_toml_str("minimum_stake = 250").unwrap();
    /// assert_eq!(config.minimum_stake, 250);
    /// assert_eq!(config.read_pool_size, 4);
    /// ```
    pub fn from_toml_str(text: &str) -> ArbiterResult<Self> {
        toml::from_str(text).map_err(|e| ArbiterError::Config(e.to_string()))
    }
}
