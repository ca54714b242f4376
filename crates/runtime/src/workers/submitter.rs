//! Submission worker that sends composed batches to the ledger.
//!
//! Batches are submitted one at a time in the order they were queued, so
//! ingestion never waits on the ledger. Failures bump a shared counter and
//! are reported on the action topic; nothing is retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use client_blockchain_core::GameLedger;

use crate::composer::ActionBatch;
use crate::events::{ActionEvent, EventBus};

pub struct SubmissionWorker {
    ledger: Arc<dyn GameLedger>,
    batch_rx: mpsc::Receiver<ActionBatch>,
    failures: Arc<AtomicU64>,
    event_bus: EventBus,
}

impl SubmissionWorker {
    pub fn new(
        ledger: Arc<dyn GameLedger>,
        batch_rx: mpsc::Receiver<ActionBatch>,
        failures: Arc<AtomicU64>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            ledger,
            batch_rx,
            failures,
            event_bus,
        }
    }

    /// Main worker loop; ends once every batch sender is dropped.
    pub async fn run(mut self) {
        while let Some(batch) = self.batch_rx.recv().await {
            self.submit(batch).await;
        }
        debug!(target: "runtime::submitter", "submission worker stopped");
    }

    async fn submit(&self, batch: ActionBatch) {
        let origin = batch.origin;

        match self.ledger.submit_batch(batch.calls).await {
            Ok(receipt) => {
                info!(
                    target: "runtime::submitter",
                    ?origin,
                    calls = receipt.call_count,
                    "batch submitted"
                );
                self.event_bus.publish(ActionEvent::BatchSubmitted {
                    origin,
                    call_count: receipt.call_count,
                });
            }
            Err(error) => {
                let count = self.failures.fetch_add(1, Ordering::SeqCst) + 1;
                warn!(
                    target: "runtime::submitter",
                    ?origin,
                    failures = count,
                    %error,
                    "batch submission failed"
                );
                self.event_bus.publish(ActionEvent::FailureCountChanged {
                    origin,
                    count,
                    error: error.to_string(),
                });
            }
        }
    }
}
