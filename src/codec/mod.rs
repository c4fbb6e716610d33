//! Payload Codec Module
//!
//! This module decodes the binary layouts the relayer consumes: the verified
//! message (VAA) wire format, the fixed-offset token-transfer payload carried
//! inside it, and the ABI-encoded general-message tuple carried in the
//! transfer payload's tail. It also owns the serialized work-item
//! representation handed from the acceptance phase to the execution phase.
//!
//! All functions here are pure; nothing in this module performs I/O.

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

/// Error decoding a binary payload.
///
/// Decode errors are per-message and never retryable: a payload that fails to
/// decode will fail identically on every redelivery.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input ended before the fixed-length portion of the layout.
    #[error("payload truncated: need at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    /// The input is long enough but internally inconsistent.
    #[error("malformed payload: {0}")]
    Malformed(String),
}

// ============================================================================
// VERIFIED MESSAGE (VAA)
// ============================================================================

/// Byte length of one guardian signature entry (index + 65-byte signature).
const SIGNATURE_LEN: usize = 66;

/// Byte length of the VAA header before the signature array
/// (version + guardian set index + signature count).
const VAA_HEADER_LEN: usize = 6;

/// Byte length of the fixed portion of the VAA body
/// (timestamp + nonce + emitter chain + emitter address + sequence +
/// consistency level).
const VAA_BODY_FIXED_LEN: usize = 4 + 4 + 2 + 32 + 8 + 1;

/// A cross-chain message whose authenticity has already been verified
/// upstream. The core only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedMessage {
    /// Monotonic sequence number per emitter
    pub sequence: u64,
    /// Chain ID of the emitting chain
    pub emitter_chain: u16,
    /// Emitter contract address (32 bytes, left-padded)
    pub emitter_address: [u8; 32],
    /// Opaque message payload
    pub payload: Vec<u8>,
    /// Keccak-256 digest of the message body
    pub hash: [u8; 32],
    /// Full encoded message as received off the wire
    pub raw_bytes: Vec<u8>,
}

/// Parses a version-1 VAA from its raw bytes.
///
/// Signature entries are skipped, not verified; verification happened
/// upstream. The digest is Keccak-256 over the body, matching what signers
/// attest to.
///
/// # Arguments
///
/// * `bytes` - Full encoded VAA
///
/// # Returns
///
/// * `Ok(VerifiedMessage)` - Parsed message with its payload and digest
/// * `Err(DecodeError::Truncated)` - Input shorter than the declared layout
pub fn parse_vaa(bytes: &[u8]) -> Result<VerifiedMessage, DecodeError> {
    if bytes.len() < VAA_HEADER_LEN {
        return Err(DecodeError::Truncated {
            expected: VAA_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let signature_count = bytes[5] as usize;
    let body_start = VAA_HEADER_LEN + signature_count * SIGNATURE_LEN;
    if bytes.len() < body_start + VAA_BODY_FIXED_LEN {
        return Err(DecodeError::Truncated {
            expected: body_start + VAA_BODY_FIXED_LEN,
            actual: bytes.len(),
        });
    }

    let body = &bytes[body_start..];
    let emitter_chain = u16::from_be_bytes([body[8], body[9]]);
    let mut emitter_address = [0u8; 32];
    emitter_address.copy_from_slice(&body[10..42]);
    let sequence = u64::from_be_bytes(
        body[42..50]
            .try_into()
            .expect("slice of fixed length 8"),
    );
    let payload = body[VAA_BODY_FIXED_LEN..].to_vec();

    let mut hasher = Keccak256::new();
    hasher.update(body);
    let hash: [u8; 32] = hasher.finalize().into();

    Ok(VerifiedMessage {
        sequence,
        emitter_chain,
        emitter_address,
        payload,
        hash,
        raw_bytes: bytes.to_vec(),
    })
}

// ============================================================================
// TOKEN TRANSFER PAYLOAD
// ============================================================================

/// Minimum length of the fixed-offset transfer header:
/// payload ID (1) + amount (32) + token address (32) + token chain (2) +
/// to (32) + to chain (2) + from address (32).
pub const TRANSFER_HEADER_LEN: usize = 1 + 32 + 32 + 2 + 32 + 2 + 32;

/// Byte range of the `to` field inside the transfer header.
pub const TO_FIELD_OFFSET: usize = 67;

/// Decoded view of a token-bridge-style transfer payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransferPayload {
    /// Payload type discriminator; any value is accepted
    pub payload_id: u8,
    /// Transfer amount (32 bytes, big-endian unsigned)
    pub amount: [u8; 32],
    /// Token address on its native chain
    pub token_address: [u8; 32],
    /// Chain ID the token is native to
    pub token_chain: u16,
    /// Destination address the relayer filters on
    pub to: [u8; 32],
    /// Destination chain ID
    pub to_chain: u16,
    /// Sender address on the source chain
    pub from_address: [u8; 32],
    /// Variable-length tail, itself an ABI-encoded tuple
    pub payload: Vec<u8>,
}

/// Decodes the fixed-offset transfer header and its variable tail.
///
/// No validation of `payload_id` is performed; the filter only cares about
/// the `to` field and the dispatch path only cares about the tail.
pub fn decode_transfer_payload(bytes: &[u8]) -> Result<TokenTransferPayload, DecodeError> {
    if bytes.len() < TRANSFER_HEADER_LEN {
        return Err(DecodeError::Truncated {
            expected: TRANSFER_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let mut amount = [0u8; 32];
    amount.copy_from_slice(&bytes[1..33]);
    let mut token_address = [0u8; 32];
    token_address.copy_from_slice(&bytes[33..65]);
    let mut to = [0u8; 32];
    to.copy_from_slice(&bytes[TO_FIELD_OFFSET..TO_FIELD_OFFSET + 32]);
    let mut from_address = [0u8; 32];
    from_address.copy_from_slice(&bytes[101..133]);

    Ok(TokenTransferPayload {
        payload_id: bytes[0],
        amount,
        token_address,
        token_chain: u16::from_be_bytes([bytes[65], bytes[66]]),
        to,
        to_chain: u16::from_be_bytes([bytes[99], bytes[100]]),
        from_address,
        payload: bytes[TRANSFER_HEADER_LEN..].to_vec(),
    })
}

// ============================================================================
// GENERAL MESSAGE PAYLOAD (ABI TAIL)
// ============================================================================

/// ABI word size.
const WORD: usize = 32;

/// Decoded general-message tuple from the transfer payload's tail:
/// `(bytes32 recipient, uint16 destination_chain, bytes32 sender, string message)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralMessagePayload {
    /// Recipient contract on the destination chain (32 bytes, left-padded)
    pub recipient: [u8; 32],
    /// Destination chain ID
    pub destination_chain: u16,
    /// Sender on the source chain (32 bytes, left-padded)
    pub sender: [u8; 32],
    /// Human-readable message content
    pub message: String,
}

/// Reads the ABI head word at the given slot index.
fn head_word(data: &[u8], slot: usize) -> Result<[u8; 32], DecodeError> {
    let start = slot * WORD;
    let end = start + WORD;
    if data.len() < end {
        return Err(DecodeError::Malformed(format!(
            "missing head word {}: need {} bytes, got {}",
            slot,
            end,
            data.len()
        )));
    }
    let mut word = [0u8; 32];
    word.copy_from_slice(&data[start..end]);
    Ok(word)
}

/// Interprets an ABI word as a usize, rejecting values that cannot index the
/// buffer it points into.
fn word_as_offset(word: &[u8; 32], what: &str) -> Result<usize, DecodeError> {
    if word[..24].iter().any(|b| *b != 0) {
        return Err(DecodeError::Malformed(format!("{} out of range", what)));
    }
    let value = u64::from_be_bytes(word[24..].try_into().expect("slice of fixed length 8"));
    usize::try_from(value).map_err(|_| DecodeError::Malformed(format!("{} out of range", what)))
}

/// Decodes the 4-field general-message tuple using the standard
/// fixed-head/dynamic-tail ABI convention.
///
/// # Returns
///
/// * `Ok(GeneralMessagePayload)` - Decoded tuple
/// * `Err(DecodeError::Malformed)` - Any head/offset/length inconsistency,
///   including non-canonical integer slots and non-UTF-8 string bytes
pub fn decode_general_message(bytes: &[u8]) -> Result<GeneralMessagePayload, DecodeError> {
    let recipient = head_word(bytes, 0)?;

    let chain_word = head_word(bytes, 1)?;
    if chain_word[..30].iter().any(|b| *b != 0) {
        return Err(DecodeError::Malformed(
            "destination chain does not fit in uint16".to_string(),
        ));
    }
    let destination_chain = u16::from_be_bytes([chain_word[30], chain_word[31]]);

    let sender = head_word(bytes, 2)?;

    let string_offset = word_as_offset(&head_word(bytes, 3)?, "string offset")?;
    let length_word_end = string_offset
        .checked_add(WORD)
        .ok_or_else(|| DecodeError::Malformed("string offset overflow".to_string()))?;
    if length_word_end > bytes.len() {
        return Err(DecodeError::Malformed(format!(
            "string offset {} points past end of payload ({} bytes)",
            string_offset,
            bytes.len()
        )));
    }
    let mut length_word = [0u8; 32];
    length_word.copy_from_slice(&bytes[string_offset..length_word_end]);
    let string_len = word_as_offset(&length_word, "string length")?;

    let string_start = length_word_end;
    let string_end = string_start
        .checked_add(string_len)
        .ok_or_else(|| DecodeError::Malformed("string length overflow".to_string()))?;
    if string_end > bytes.len() {
        return Err(DecodeError::Malformed(format!(
            "string of {} bytes exceeds payload ({} bytes)",
            string_len,
            bytes.len()
        )));
    }

    let message = String::from_utf8(bytes[string_start..string_end].to_vec())
        .map_err(|e| DecodeError::Malformed(format!("message is not valid UTF-8: {}", e)))?;

    Ok(GeneralMessagePayload {
        recipient,
        destination_chain,
        sender,
        message,
    })
}

// ============================================================================
// ADDRESS NORMALIZATION
// ============================================================================

/// Formats a 32-byte address as a 0x-prefixed hex string.
///
/// A left-zero-padded 20-byte value reduces to its 40-hex-char EVM form;
/// anything else keeps all 64 hex chars. Pure and total.
pub fn normalize_address(address: &[u8; 32]) -> String {
    if address[..12].iter().all(|b| *b == 0) {
        format!("0x{}", hex::encode(&address[12..]))
    } else {
        format!("0x{}", hex::encode(address))
    }
}

// ============================================================================
// WORK ITEMS
// ============================================================================

/// Serialized unit handed from the acceptance phase to the execution phase.
///
/// Never mutated after creation; the host scheduler wraps it with delivery
/// metadata (see [`crate::engine::Workflow`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Base64 of the full encoded message
    pub vaa: String,
    /// Shared counter value observed at acceptance time
    pub count: u64,
}

/// Packages an accepted message and the counter value into a work item.
pub fn encode_work_item(message: &VerifiedMessage, count: u64) -> WorkItem {
    WorkItem {
        vaa: general_purpose::STANDARD.encode(&message.raw_bytes),
        count,
    }
}

/// Recovers the raw message bytes from a work item.
///
/// Inverse of [`encode_work_item`] for any work item it produced.
pub fn decode_work_item(item: &WorkItem) -> Result<Vec<u8>, DecodeError> {
    general_purpose::STANDARD
        .decode(&item.vaa)
        .map_err(|e| DecodeError::Malformed(format!("work item is not valid base64: {}", e)))
}
