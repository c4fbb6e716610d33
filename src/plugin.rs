//! General Message Plugin Module
//!
//! The plugin proper: the listener half (`consume_event`) filters verified
//! messages and turns accepted ones into work items under the shared
//! counter; the executor half (`handle_workflow`) decodes redelivered work
//! items and dispatches them to the destination chain.
//!
//! Acceptance and execution are separated by the serialized work item, so a
//! slow or failed chain call never runs while the counter's lock is held.

use base64::{engine::general_purpose, Engine as _};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::codec::{self, VerifiedMessage, WorkItem};
use crate::config::{Config, ConfigError, ContractFilter};
use crate::dispatch::{self, ExecutionTarget, WorkflowError};
use crate::engine::Workflow;
use crate::executor::ActionExecutor;
use crate::filter::{self, AcceptanceFilter};
use crate::staging::{StagingArea, StagingError, COUNTER_KEY};

/// Name the plugin registers under with the host.
pub const PLUGIN_NAME: &str = "general-message-relayer";

/// The relayer plugin.
pub struct GeneralMessagePlugin {
    /// Destination-address filter
    filter: AcceptanceFilter,
    /// Keyed exclusive-access store for the shared counter
    staging: Arc<StagingArea>,
    /// Per-chain execution clients
    executor: Arc<ActionExecutor>,
    /// Emitter subscriptions handed to the host at setup time
    filters: Vec<ContractFilter>,
    /// Redelivery bound for failed executions
    max_retries: u32,
}

impl GeneralMessagePlugin {
    /// Builds the plugin from configuration and its collaborators.
    ///
    /// # Returns
    ///
    /// * `Ok(GeneralMessagePlugin)` - Ready to be registered with the host
    /// * `Err(ConfigError)` - Invalid destination address or missing filters
    pub fn new(
        config: &Config,
        staging: Arc<StagingArea>,
        executor: Arc<ActionExecutor>,
    ) -> Result<Self, ConfigError> {
        let filter = AcceptanceFilter::new(config)?;
        let filters = filter::contract_filters(config).map_err(|e| {
            error!("contract filters not specified in config");
            e
        })?;
        Ok(Self {
            filter,
            staging,
            executor,
            filters,
            max_retries: config.plugin.max_retries,
        })
    }

    /// Emitter subscriptions, called by the host at subscription-setup time.
    pub fn get_filters(&self) -> &[ContractFilter] {
        &self.filters
    }

    /// Redelivery bound for failed executions.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    // ========================================================================
    // LISTENER
    // ========================================================================

    /// Consumes one delivered verified message.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(WorkItem))` - Accepted; schedule the work item
    /// * `Ok(None)` - Dropped silently (filter mismatch or malformed payload)
    /// * `Err(StagingError)` - Counter unavailable; the message must not be
    ///   accepted, since accepting without incrementing would silently lose
    ///   counter accuracy
    pub async fn consume_event(
        &self,
        message: &VerifiedMessage,
    ) -> Result<Option<WorkItem>, StagingError> {
        debug!(
            hash = %general_purpose::STANDARD.encode(message.hash),
            "verified message received"
        );
        debug!(bytes = %hex::encode(&message.raw_bytes), "message bytes");

        if !self.filter.should_accept(message) {
            return Ok(None);
        }

        let count = self.staging.increment_counter(COUNTER_KEY).await?;
        debug!(count, sequence = message.sequence, "message accepted for relay");

        Ok(Some(codec::encode_work_item(message, count)))
    }

    // ========================================================================
    // EXECUTOR
    // ========================================================================

    /// Handles one scheduled work item: decode, route, execute.
    ///
    /// Exactly one contract call is submitted per successful workflow.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Message relayed
    /// * `Err(WorkflowError)` - Terminal or retryable failure; see
    ///   [`WorkflowError::is_retryable`]
    pub async fn handle_workflow(&self, workflow: &Workflow) -> Result<(), WorkflowError> {
        info!(id = workflow.id, "workflow received");

        let raw_message = codec::decode_work_item(&workflow.data)?;
        let message = codec::parse_vaa(&raw_message)?;
        info!(sequence = message.sequence, "parsed verified message");

        let transfer = codec::decode_transfer_payload(&message.payload)?;
        let general = codec::decode_general_message(&transfer.payload)?;

        let recipient = codec::normalize_address(&general.recipient);
        let sender = codec::normalize_address(&general.sender);
        info!(
            "{} sent {:?} to {} on chain {}",
            sender, general.message, recipient, general.destination_chain
        );

        match dispatch::route(general.destination_chain, &recipient) {
            ExecutionTarget::Evm {
                chain_id,
                recipient,
            } => {
                let client = self.executor.on_evm(chain_id)?;
                let tx_hash = client
                    .process_message(&recipient, &raw_message)
                    .await
                    .map_err(WorkflowError::Execution)?;
                info!(chain_id, tx_hash = %tx_hash, "message relayed");
                Ok(())
            }
            ExecutionTarget::Rejected { chain_id } => {
                error!(
                    chain_id,
                    "destination chain is not an EVM chain, which is currently unsupported"
                );
                Err(WorkflowError::UnsupportedChain(chain_id))
            }
        }
    }
}
