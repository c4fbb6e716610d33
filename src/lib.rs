//! General Message Relayer Library
//!
//! This crate provides a relayer plugin that bridges a cross-chain
//! message-passing network to destination-chain smart contracts: it filters
//! verified messages for a configured destination, tracks acceptances in a
//! concurrency-safe shared counter, and dispatches accepted messages as
//! contract calls on the destination chain.

pub mod codec;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod evm_client;
pub mod executor;
pub mod filter;
pub mod plugin;
pub mod staging;

// Re-export commonly used types
pub use codec::{DecodeError, GeneralMessagePayload, TokenTransferPayload, VerifiedMessage, WorkItem};
pub use config::{Config, ConfigError, ContractFilter, EvmChainConfig};
pub use dispatch::{ChainFamily, ExecutionTarget, WorkflowError};
pub use engine::{RelayerEngine, Workflow};
pub use executor::ActionExecutor;
pub use filter::AcceptanceFilter;
pub use plugin::GeneralMessagePlugin;
pub use staging::{StagingArea, StagingError};
