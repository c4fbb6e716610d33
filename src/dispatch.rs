//! Dispatch Router Module
//!
//! Maps a decoded destination chain ID to a chain family and selects the
//! execution target for a work item. The family set is closed: anything
//! outside it routes to an explicit rejection instead of falling through
//! silently.

use crate::codec::DecodeError;
use thiserror::Error;

// ============================================================================
// CHAIN FAMILIES
// ============================================================================

/// Chain IDs of the EVM family in the cross-chain network's numbering.
const EVM_CHAIN_IDS: &[u16] = &[
    2,  // Ethereum
    4,  // BNB Smart Chain
    5,  // Polygon
    6,  // Avalanche
    7,  // Oasis
    9,  // Aurora
    10, // Fantom
    11, // Karura
    12, // Acala
    13, // Klaytn
    14, // Celo
    16, // Moonbeam
    23, // Arbitrum
    24, // Optimism
    25, // Gnosis
    30, // Base
];

/// Chain family of a destination chain ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// Chains sharing the EVM contract-call execution model
    Evm,
    /// No execution path exists for this chain
    Unsupported,
}

impl ChainFamily {
    /// Classifies a destination chain ID.
    pub fn of(chain_id: u16) -> ChainFamily {
        if EVM_CHAIN_IDS.contains(&chain_id) {
            ChainFamily::Evm
        } else {
            ChainFamily::Unsupported
        }
    }
}

// ============================================================================
// ROUTING
// ============================================================================

/// Where a work item should be executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionTarget {
    /// Execute as an EVM contract call to `recipient`
    Evm {
        /// Destination chain ID
        chain_id: u16,
        /// Normalized recipient address
        recipient: String,
    },
    /// Terminally rejected: no execution path for this chain family
    Rejected {
        /// Destination chain ID
        chain_id: u16,
    },
}

/// Selects the execution target for a destination chain and recipient.
pub fn route(destination_chain: u16, recipient: &str) -> ExecutionTarget {
    match ChainFamily::of(destination_chain) {
        ChainFamily::Evm => ExecutionTarget::Evm {
            chain_id: destination_chain,
            recipient: recipient.to_string(),
        },
        ChainFamily::Unsupported => ExecutionTarget::Rejected {
            chain_id: destination_chain,
        },
    }
}

// ============================================================================
// WORKFLOW ERRORS
// ============================================================================

/// Error handling a scheduled work item.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The work item or its embedded message could not be decoded.
    /// Terminal: a malformed payload decodes identically on every retry.
    #[error("work item could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    /// The destination chain has no execution path. Terminal.
    #[error("destination chain {0} is not part of a supported chain family")]
    UnsupportedChain(u16),
    /// The chain is supported but no execution client is configured for it.
    /// Terminal: a config change is required, not a retry.
    #[error("no execution client configured for chain {0}")]
    NoClientForChain(u16),
    /// The on-chain call failed (revert, network error, insufficient funds).
    /// Retryable up to the configured bound.
    #[error("execution failed: {0}")]
    Execution(#[source] anyhow::Error),
}

impl WorkflowError {
    /// Whether the host should redeliver the work item.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WorkflowError::Execution(_))
    }
}
