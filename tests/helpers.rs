//! Shared test helpers
//!
//! This module provides fixture builders used by the integration tests:
//! test configurations, encoded transfer payloads, ABI-encoded
//! general-message tails, and raw verified-message (VAA) bytes.

#![allow(dead_code)]

use general_message_relayer::codec::{self, VerifiedMessage};
use general_message_relayer::config::{
    ChainsConfig, Config, ContractFilter, EvmChainConfig, PluginConfig, StagingConfig,
};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Destination address the test filter accepts (32 bytes, hex)
pub const TARGET_ADDRESS_HEX: &str =
    "0000000000000000000000000000000000000000000000000000000000000815";

/// EVM-family destination chain used by fixtures (Moonbeam)
pub const EVM_DEST_CHAIN: u16 = 16;

/// Non-EVM destination chain used by fixtures (Solana)
pub const NON_EVM_DEST_CHAIN: u16 = 1;

/// The `to` value of the accepted fixture as bytes.
pub fn target_address() -> [u8; 32] {
    let mut address = [0u8; 32];
    address[30] = 0x08;
    address[31] = 0x15;
    address
}

/// A 20-byte address left-padded to 32 bytes.
pub fn padded_address(address: &[u8; 20]) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..].copy_from_slice(address);
    padded
}

// ============================================================================
// CONFIGURATION BUILDERS
// ============================================================================

/// Minimal valid configuration: one emitter subscription, no chains.
pub fn build_test_config() -> Config {
    Config {
        plugin: PluginConfig {
            target_address: TARGET_ADDRESS_HEX.to_string(),
            max_retries: 2,
            spy_service_filters: vec![ContractFilter {
                chain_id: 10,
                emitter_address:
                    "0x000000000000000000000000f1277d1ed8ad466beddf92ef448a132661956621"
                        .to_string(),
            }],
        },
        staging: StagingConfig::default(),
        chains: ChainsConfig::default(),
    }
}

/// Configuration with one EVM execution endpoint (typically a mock server).
pub fn build_test_config_with_evm(chain_id: u16, rpc_url: &str) -> Config {
    let mut config = build_test_config();
    config.chains.evm = vec![EvmChainConfig {
        chain_id,
        rpc_url: rpc_url.to_string(),
        wallet_address: "0x0000000000000000000000000000000000000001".to_string(),
    }];
    config
}

// ============================================================================
// PAYLOAD BUILDERS
// ============================================================================

/// ABI-encodes the general-message tuple
/// `(bytes32 recipient, uint16 destination_chain, bytes32 sender, string message)`.
pub fn encode_general_message(
    recipient: &[u8; 32],
    destination_chain: u16,
    sender: &[u8; 32],
    message: &str,
) -> Vec<u8> {
    let mut encoded = Vec::new();
    encoded.extend_from_slice(recipient);

    let mut chain_word = [0u8; 32];
    chain_word[30..].copy_from_slice(&destination_chain.to_be_bytes());
    encoded.extend_from_slice(&chain_word);

    encoded.extend_from_slice(sender);

    // String head slot points just past the four head words
    let mut offset_word = [0u8; 32];
    offset_word[24..].copy_from_slice(&128u64.to_be_bytes());
    encoded.extend_from_slice(&offset_word);

    let bytes = message.as_bytes();
    let mut length_word = [0u8; 32];
    length_word[24..].copy_from_slice(&(bytes.len() as u64).to_be_bytes());
    encoded.extend_from_slice(&length_word);

    encoded.extend_from_slice(bytes);
    let padding = (32 - bytes.len() % 32) % 32;
    encoded.extend_from_slice(&vec![0u8; padding]);
    encoded
}

/// Builds a transfer payload with the fixture's header values, the given
/// `to` field, and the given tail.
pub fn build_transfer_payload(to: &[u8; 32], tail: &[u8]) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.push(0x03); // payload ID

    let mut amount = [0u8; 32];
    amount[28..].copy_from_slice(&0x01312d00u32.to_be_bytes());
    payload.extend_from_slice(&amount);

    payload.extend_from_slice(&padded_address(&[
        0xf1, 0x27, 0x7d, 0x1e, 0xd8, 0xad, 0x46, 0x6b, 0xed, 0xdf, 0x92, 0xef, 0x44, 0x8a,
        0x13, 0x26, 0x61, 0x95, 0x66, 0x21,
    ])); // token address
    payload.extend_from_slice(&10u16.to_be_bytes()); // token chain

    payload.extend_from_slice(to);
    payload.extend_from_slice(&EVM_DEST_CHAIN.to_be_bytes()); // to chain

    payload.extend_from_slice(&padded_address(&[
        0xb7, 0xe8, 0xc3, 0x56, 0x09, 0xca, 0x73, 0x27, 0x7b, 0x22, 0x07, 0xd0, 0x7b, 0x51,
        0xc9, 0xac, 0x57, 0x98, 0xb3, 0x80,
    ])); // from address

    payload.extend_from_slice(tail);
    payload
}

/// A transfer payload accepted by the test filter, carrying a
/// general-message tail for the given destination chain.
pub fn accepted_transfer_payload(destination_chain: u16, message: &str) -> Vec<u8> {
    let recipient = padded_address(&[
        0x35, 0x4b, 0x10, 0xd4, 0x7e, 0x84, 0xa0, 0x06, 0xb9, 0xe7, 0xe6, 0x6a, 0x22, 0x9d,
        0x17, 0x4e, 0x8f, 0xf2, 0xa0, 0x63,
    ]);
    let sender = padded_address(&[
        0xb7, 0xe8, 0xc3, 0x56, 0x09, 0xca, 0x73, 0x27, 0x7b, 0x22, 0x07, 0xd0, 0x7b, 0x51,
        0xc9, 0xac, 0x57, 0x98, 0xb3, 0x80,
    ]);
    let tail = encode_general_message(&recipient, destination_chain, &sender, message);
    build_transfer_payload(&target_address(), &tail)
}

/// The normalized form of the fixture's recipient address.
pub const FIXTURE_RECIPIENT: &str = "0x354b10d47e84a006b9e7e66a229d174e8ff2a063";

// ============================================================================
// MESSAGE BUILDERS
// ============================================================================

/// Builds raw version-1 VAA bytes around the given payload: one zeroed
/// guardian signature, emitter chain 10, sequence 3.
pub fn build_vaa(payload: &[u8]) -> Vec<u8> {
    let mut vaa = Vec::new();
    vaa.push(1); // version
    vaa.extend_from_slice(&0u32.to_be_bytes()); // guardian set index
    vaa.push(1); // signature count
    vaa.extend_from_slice(&[0u8; 66]); // signature entry (unverified here)

    vaa.extend_from_slice(&0u32.to_be_bytes()); // timestamp
    vaa.extend_from_slice(&0u32.to_be_bytes()); // nonce
    vaa.extend_from_slice(&10u16.to_be_bytes()); // emitter chain
    let mut emitter = [0u8; 32];
    emitter[31] = 0x01;
    vaa.extend_from_slice(&emitter);
    vaa.extend_from_slice(&3u64.to_be_bytes()); // sequence
    vaa.push(1); // consistency level
    vaa.extend_from_slice(payload);
    vaa
}

/// Parses fixture VAA bytes into a `VerifiedMessage`.
pub fn verified_message(payload: &[u8]) -> VerifiedMessage {
    codec::parse_vaa(&build_vaa(payload)).expect("fixture VAA should parse")
}
