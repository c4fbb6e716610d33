//! Configuration Management Module
//!
//! This module handles loading and managing configuration for the relayer
//! plugin service. Configuration includes the subscription filters, the
//! expected destination address, retry bounds, staging-lock timing, and the
//! EVM execution endpoints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Fatal configuration errors that stop plugin startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No subscription filters were supplied; the plugin would never
    /// receive a message.
    #[error("contract filters not specified in config")]
    MissingFilters,
    /// The expected destination address is not a 32-byte hex string.
    #[error("target address must be 64 hex characters (32 bytes): {0}")]
    InvalidTargetAddress(String),
}

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure containing all service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Plugin-level settings (filters, destination, retry bound)
    pub plugin: PluginConfig,
    /// Staging-area settings (exclusive-access timing)
    #[serde(default)]
    pub staging: StagingConfig,
    /// Destination-chain execution endpoints
    #[serde(default)]
    pub chains: ChainsConfig,
}

/// Plugin-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Expected 32-byte destination address, hex encoded (64 chars, with or
    /// without a 0x prefix). Only messages whose transfer payload targets
    /// this address are accepted.
    pub target_address: String,
    /// Maximum redelivery attempts for a failed execution
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Emitter subscriptions: which (chain, emitter) pairs to listen to
    #[serde(default)]
    pub spy_service_filters: Vec<ContractFilter>,
}

/// One emitter subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractFilter {
    /// Chain ID the emitter lives on
    pub chain_id: u16,
    /// Emitter contract address (hex, 32 bytes left-padded)
    pub emitter_address: String,
}

/// Staging-area configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Upper bound on waiting for exclusive access to a staging key, in
    /// milliseconds. Acquisition past this bound fails instead of blocking
    /// indefinitely.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

/// Destination-chain execution endpoints, grouped by chain family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainsConfig {
    /// EVM-family chains the executor can submit transactions to
    #[serde(default)]
    pub evm: Vec<EvmChainConfig>,
}

/// Configuration for one EVM-compatible execution endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvmChainConfig {
    /// Chain ID in the cross-chain network's numbering
    pub chain_id: u16,
    /// JSON-RPC endpoint URL (e.g., "http://127.0.0.1:8545")
    pub rpc_url: String,
    /// Node-managed account transactions are sent from
    pub wallet_address: String,
}

fn default_max_retries() -> u32 {
    10
}

fn default_lock_timeout_ms() -> u64 {
    5000
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

// ============================================================================
// CONFIGURATION LOADING
// ============================================================================

impl Config {
    /// Loads configuration from the TOML file.
    ///
    /// The path defaults to `config/relayer.toml` and can be overridden with
    /// the `RELAYER_CONFIG_PATH` environment variable (used by tests).
    ///
    /// # Returns
    ///
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(anyhow::Error)` - File missing or not parseable
    pub fn load() -> anyhow::Result<Self> {
        let config_path = std::env::var("RELAYER_CONFIG_PATH")
            .unwrap_or_else(|_| "config/relayer.toml".to_string());

        if std::path::Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/relayer.template.toml config/relayer.toml\n\
                Then edit config/relayer.toml with your actual values.",
                config_path
            ))
        }
    }

    /// Parses the configured expected destination into its 32-byte form.
    ///
    /// # Returns
    ///
    /// * `Ok([u8; 32])` - Decoded destination address
    /// * `Err(ConfigError::InvalidTargetAddress)` - Wrong length or not hex
    pub fn target_address_bytes(&self) -> Result<[u8; 32], ConfigError> {
        let raw = self.plugin.target_address.trim();
        let stripped = raw.strip_prefix("0x").unwrap_or(raw);
        let decoded = hex::decode(stripped)
            .map_err(|_| ConfigError::InvalidTargetAddress(raw.to_string()))?;
        decoded
            .try_into()
            .map_err(|_| ConfigError::InvalidTargetAddress(raw.to_string()))
    }
}
