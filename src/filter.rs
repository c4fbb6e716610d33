//! Acceptance Filter Module
//!
//! Decides, from a verified message's transfer payload, whether this plugin
//! instance should process it. Filtering is a pure comparison of the
//! payload's 32-byte `to` field against the configured expected destination;
//! a malformed or irrelevant message is silently skipped, never reported as
//! an error.

use crate::codec::{self, VerifiedMessage};
use crate::config::{Config, ConfigError, ContractFilter};

/// Destination-address filter built once at plugin construction.
#[derive(Debug, Clone)]
pub struct AcceptanceFilter {
    /// The 32-byte destination a transfer payload must target to be accepted
    expected_destination: [u8; 32],
}

impl AcceptanceFilter {
    /// Builds the filter from configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(AcceptanceFilter)` - Filter bound to the configured destination
    /// * `Err(ConfigError::InvalidTargetAddress)` - Destination not a
    ///   32-byte hex value
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            expected_destination: config.target_address_bytes()?,
        })
    }

    /// The destination this filter accepts.
    pub fn expected_destination(&self) -> &[u8; 32] {
        &self.expected_destination
    }

    /// Returns true iff the message's transfer payload targets the expected
    /// destination. Any decode failure yields false, not an error.
    pub fn should_accept(&self, message: &VerifiedMessage) -> bool {
        match codec::decode_transfer_payload(&message.payload) {
            Ok(transfer) => transfer.to == self.expected_destination,
            Err(_) => false,
        }
    }
}

/// Returns the configured emitter subscriptions.
///
/// # Returns
///
/// * `Ok(Vec<ContractFilter>)` - The (chain, emitter) pairs to subscribe to
/// * `Err(ConfigError::MissingFilters)` - None configured; fatal at startup
pub fn contract_filters(config: &Config) -> Result<Vec<ContractFilter>, ConfigError> {
    if config.plugin.spy_service_filters.is_empty() {
        return Err(ConfigError::MissingFilters);
    }
    Ok(config.plugin.spy_service_filters.clone())
}
