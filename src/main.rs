//! General Message Relayer Service
//!
//! A relayer plugin service that observes verified cross-chain messages,
//! filters ones targeting the configured destination, and relays accepted
//! messages to destination-chain contracts.
//!
//! ## Overview
//!
//! The relayer:
//! 1. Subscribes to the configured (chain, emitter) pairs
//! 2. Filters each verified message by its transfer payload's `to` field
//! 3. Increments a shared counter under exclusive access on acceptance
//! 4. Schedules accepted messages as durable work items
//! 5. Decodes redelivered work items and executes them on the destination
//!    chain (EVM family; anything else is terminally rejected)

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

use general_message_relayer::config::Config;
use general_message_relayer::engine::RelayerEngine;
use general_message_relayer::executor::ActionExecutor;
use general_message_relayer::plugin::{GeneralMessagePlugin, PLUGIN_NAME};
use general_message_relayer::staging::StagingArea;

/// Depth of the inbound verified-message channel.
const EVENT_QUEUE_DEPTH: usize = 256;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

/// Main application entry point that initializes and runs the relayer.
///
/// This function:
/// 1. Initializes logging and tracing
/// 2. Loads configuration from TOML file
/// 3. Initializes the staging area, execution clients, and the plugin
/// 4. Runs the engine until shutdown
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured logging for debugging and monitoring
    tracing_subscriber::fmt::init();

    info!("Starting {}", PLUGIN_NAME);

    // Load configuration from config/relayer.toml
    let config = Config::load()?;
    info!("Configuration loaded successfully");

    let staging = Arc::new(StagingArea::new(Duration::from_millis(
        config.staging.lock_timeout_ms,
    )));
    let executor = Arc::new(ActionExecutor::new(&config)?);
    let plugin = Arc::new(GeneralMessagePlugin::new(&config, staging, executor)?);

    for filter in plugin.get_filters() {
        info!(
            chain_id = filter.chain_id,
            emitter = %filter.emitter_address,
            "subscribing to emitter"
        );
    }

    // The transport delivering verified messages owns the sender half; it is
    // attached by the host deployment, so the engine idles until shutdown
    // when run standalone.
    let (_event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_DEPTH);
    let engine = RelayerEngine::new(plugin);

    tokio::select! {
        result = engine.run(event_rx) => result?,
        _ = tokio::signal::ctrl_c() => info!("shutdown signal received"),
    }

    Ok(())
}
