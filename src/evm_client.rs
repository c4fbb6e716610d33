//! EVM Client Module
//!
//! This module provides a client for submitting relayed messages to
//! EVM-compatible blockchain nodes via their JSON-RPC API. Transactions are
//! sent from a node-managed wallet account; key custody stays with the node.

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use std::time::Duration;

/// Solidity signature of the recipient contract's entry point.
const PROCESS_MESSAGE_SIGNATURE: &str = "processMyMessage(bytes)";

/// ABI word size.
const WORD: usize = 32;

// ============================================================================
// API RESPONSE STRUCTURES
// ============================================================================

/// EVM JSON-RPC request wrapper
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Vec<serde_json::Value>,
    id: u64,
}

/// EVM JSON-RPC response wrapper
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    result: Option<T>,
    error: Option<JsonRpcError>,
    #[allow(dead_code)]
    id: u64,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

// ============================================================================
// CALLDATA ENCODING
// ============================================================================

/// First four bytes of the Keccak-256 hash of the entry point signature.
fn process_message_selector() -> [u8; 4] {
    let mut hasher = Keccak256::new();
    hasher.update(PROCESS_MESSAGE_SIGNATURE.as_bytes());
    let hash = hasher.finalize();
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// ABI-encodes a single dynamic `bytes` argument: offset word, length word,
/// then the data padded to a word boundary.
fn encode_bytes_argument(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(WORD) * WORD;
    let mut encoded = Vec::with_capacity(2 * WORD + padded_len);

    let mut offset_word = [0u8; WORD];
    offset_word[WORD - 8..].copy_from_slice(&(WORD as u64).to_be_bytes());
    encoded.extend_from_slice(&offset_word);

    let mut length_word = [0u8; WORD];
    length_word[WORD - 8..].copy_from_slice(&(data.len() as u64).to_be_bytes());
    encoded.extend_from_slice(&length_word);

    encoded.extend_from_slice(data);
    encoded.resize(2 * WORD + padded_len, 0);
    encoded
}

// ============================================================================
// EVM CLIENT IMPLEMENTATION
// ============================================================================

/// Client for submitting message-processing transactions to an EVM node.
pub struct EvmClient {
    /// HTTP client for making requests
    client: Client,
    /// Base URL of the EVM node (e.g., "http://127.0.0.1:8545")
    base_url: String,
    /// Node-managed account transactions are sent from
    wallet_address: String,
}

impl EvmClient {
    /// Creates a new EVM client for the given node URL and wallet account.
    ///
    /// # Arguments
    ///
    /// * `node_url` - Base URL of the EVM node
    /// * `wallet_address` - Account the node signs transactions with
    ///
    /// # Returns
    ///
    /// * `Ok(EvmClient)` - Successfully created client
    /// * `Err(anyhow::Error)` - Failed to create HTTP client
    pub fn new(node_url: &str, wallet_address: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: node_url.to_string(),
            wallet_address: wallet_address.to_string(),
        })
    }

    /// Submits a `processMyMessage(bytes)` call carrying the full verified
    /// message to the recipient contract.
    ///
    /// # Arguments
    ///
    /// * `recipient` - Recipient contract address (0x-prefixed)
    /// * `message` - Raw verified-message bytes, passed as the sole argument
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Transaction hash returned by the node
    /// * `Err(anyhow::Error)` - Transport failure or JSON-RPC error
    pub async fn process_message(&self, recipient: &str, message: &[u8]) -> Result<String> {
        let mut calldata = process_message_selector().to_vec();
        calldata.extend_from_slice(&encode_bytes_argument(message));

        let transaction = serde_json::json!({
            "from": self.wallet_address,
            "to": recipient,
            "data": format!("0x{}", hex::encode(&calldata)),
        });

        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: "eth_sendTransaction".to_string(),
            params: vec![transaction],
            id: 1,
        };

        let response: JsonRpcResponse<String> = self
            .client
            .post(&self.base_url)
            .json(&request)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to send eth_sendTransaction request to {}",
                    self.base_url
                )
            })?
            .json()
            .await
            .with_context(|| {
                format!(
                    "Failed to parse eth_sendTransaction response from {}",
                    self.base_url
                )
            })?;

        if let Some(error) = response.error {
            return Err(anyhow::anyhow!(
                "JSON-RPC error from {}: {} (code: {})",
                self.base_url,
                error.message,
                error.code
            ));
        }

        response
            .result
            .ok_or_else(|| anyhow::anyhow!("No result in eth_sendTransaction response"))
    }

    /// Returns the base URL of this client
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_is_stable() {
        let selector = process_message_selector();
        assert_eq!(selector.len(), 4);
        assert_eq!(selector, process_message_selector());
    }

    #[test]
    fn bytes_argument_pads_to_word_boundary() {
        let encoded = encode_bytes_argument(&[0xAA; 5]);
        assert_eq!(encoded.len(), 3 * WORD);
        // offset word points just past itself
        assert_eq!(encoded[WORD - 1], WORD as u8);
        // length word records the unpadded length
        assert_eq!(encoded[2 * WORD - 1], 5);
        assert_eq!(&encoded[2 * WORD..2 * WORD + 5], &[0xAA; 5]);
        assert!(encoded[2 * WORD + 5..].iter().all(|b| *b == 0));
    }
}
