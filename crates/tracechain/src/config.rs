//! Contract and host configuration.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Where operations take their timestamps from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampSource {
    /// The platform-supplied transaction timestamp. Identical on every
    /// replica executing the transaction.
    #[default]
    Transaction,
    /// The executing node's wall clock. Replicas will disagree; only for
    /// parity with deployments that already stored wall-clock times.
    LocalClock,
}

/// Configuration for the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    pub timestamp_source: TimestampSource,
}

/// Configuration for the local ledger host.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Contract configuration.
    pub contract: ContractConfig,
    /// Domain separator mixed into every derived transaction id.
    pub tx_id_domain: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            contract: ContractConfig::default(),
            tx_id_domain: "tracechain-tx-v0".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading ledger configuration");
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
