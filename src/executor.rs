//! Action Executor Module
//!
//! Holds one execution client per configured destination chain and hands the
//! right client to the dispatch path. Wallets are node-managed; this module
//! never touches key material.

use anyhow::Result;
use std::collections::HashMap;

use crate::config::Config;
use crate::dispatch::WorkflowError;
use crate::evm_client::EvmClient;

/// Per-chain registry of execution clients.
pub struct ActionExecutor {
    /// EVM clients keyed by destination chain ID
    evm_clients: HashMap<u16, EvmClient>,
}

impl ActionExecutor {
    /// Builds clients for every configured EVM chain.
    ///
    /// # Returns
    ///
    /// * `Ok(ActionExecutor)` - One client per `[[chains.evm]]` entry
    /// * `Err(anyhow::Error)` - A client could not be constructed
    pub fn new(config: &Config) -> Result<Self> {
        let mut evm_clients = HashMap::new();
        for chain in &config.chains.evm {
            let client = EvmClient::new(&chain.rpc_url, &chain.wallet_address)?;
            evm_clients.insert(chain.chain_id, client);
        }
        Ok(Self { evm_clients })
    }

    /// Returns the EVM client for a destination chain.
    ///
    /// # Returns
    ///
    /// * `Ok(&EvmClient)` - Client bound to the chain's endpoint and wallet
    /// * `Err(WorkflowError::NoClientForChain)` - Chain is EVM-family but
    ///   not configured; terminal misconfiguration, not a retry candidate
    pub fn on_evm(&self, chain_id: u16) -> Result<&EvmClient, WorkflowError> {
        self.evm_clients
            .get(&chain_id)
            .ok_or(WorkflowError::NoClientForChain(chain_id))
    }

    /// Chain IDs this executor can submit to.
    pub fn configured_chains(&self) -> Vec<u16> {
        self.evm_clients.keys().copied().collect()
    }
}
