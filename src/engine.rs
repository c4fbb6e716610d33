//! Relayer Engine Module
//!
//! A minimal in-process host harness: a listener loop that feeds verified
//! messages through the plugin's acceptance path, and an executor loop that
//! drains the resulting work queue with at-least-once redelivery bounded by
//! the plugin's retry count. A production deployment would swap this for the
//! full host engine; the plugin surface is identical either way.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::codec::{VerifiedMessage, WorkItem};
use crate::plugin::GeneralMessagePlugin;

/// Work queue depth before the listener backpressures.
const WORK_QUEUE_DEPTH: usize = 64;

/// Base delay between redelivery attempts; grows linearly with the attempt.
const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// A scheduled work item with host-assigned delivery metadata.
#[derive(Debug, Clone)]
pub struct Workflow {
    /// Scheduler-assigned identifier
    pub id: u64,
    /// Zero-based delivery attempt
    pub attempt: u32,
    /// The serialized work item
    pub data: WorkItem,
}

/// In-process listener + executor harness around one plugin.
pub struct RelayerEngine {
    plugin: Arc<GeneralMessagePlugin>,
}

impl RelayerEngine {
    /// Creates an engine driving the given plugin.
    pub fn new(plugin: Arc<GeneralMessagePlugin>) -> Self {
        Self { plugin }
    }

    /// Runs until the message stream closes and all scheduled work drains.
    ///
    /// The listener half consumes `events`; accepted messages are queued as
    /// workflows and each executes in its own task, so a workflow waiting
    /// out a retry backoff never blocks the queue behind it and never stalls
    /// acceptance. Retryable execution failures are redelivered with the
    /// attempt incremented up to the plugin's retry bound, then error-logged
    /// as terminally failed.
    pub async fn run(&self, mut events: mpsc::Receiver<VerifiedMessage>) -> anyhow::Result<()> {
        let (work_tx, mut work_rx) = mpsc::channel::<Workflow>(WORK_QUEUE_DEPTH);

        let plugin = self.plugin.clone();
        let executor = tokio::spawn(async move {
            let mut tasks = tokio::task::JoinSet::new();
            while let Some(workflow) = work_rx.recv().await {
                let plugin = plugin.clone();
                tasks.spawn(async move {
                    Self::execute_with_retries(&plugin, workflow).await;
                });
            }
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    error!(error = %e, "workflow task did not complete");
                }
            }
        });

        let mut next_id: u64 = 1;
        while let Some(message) = events.recv().await {
            match self.plugin.consume_event(&message).await {
                Ok(Some(item)) => {
                    let workflow = Workflow {
                        id: next_id,
                        attempt: 0,
                        data: item,
                    };
                    next_id += 1;
                    if work_tx.send(workflow).await.is_err() {
                        break;
                    }
                }
                Ok(None) => {
                    debug!(sequence = message.sequence, "message dropped by filter");
                }
                Err(e) => {
                    warn!(
                        sequence = message.sequence,
                        error = %e,
                        "acceptance aborted; message not scheduled"
                    );
                }
            }
        }

        // Event stream closed: let the executor drain the queue and stop.
        drop(work_tx);
        executor.await?;
        Ok(())
    }

    /// Executes one workflow, redelivering on retryable failure.
    async fn execute_with_retries(plugin: &GeneralMessagePlugin, mut workflow: Workflow) {
        loop {
            match plugin.handle_workflow(&workflow).await {
                Ok(()) => {
                    info!(id = workflow.id, "workflow complete");
                    return;
                }
                Err(e) if e.is_retryable() && workflow.attempt < plugin.max_retries() => {
                    workflow.attempt += 1;
                    warn!(
                        id = workflow.id,
                        attempt = workflow.attempt,
                        error = %e,
                        "execution failed; redelivering"
                    );
                    tokio::time::sleep(RETRY_BACKOFF * workflow.attempt).await;
                }
                Err(e) => {
                    error!(id = workflow.id, error = %e, "workflow terminally failed");
                    return;
                }
            }
        }
    }
}
