//! High-level director orchestrator.
//!
//! The director owns background workers, wires up command, submission and
//! signal channels, and exposes a builder-based API for clients to attach to
//! sessions through a [`DirectorHandle`].

use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use client_blockchain_core::GameLedger;

use crate::api::{DirectorHandle, Result, RuntimeError};
use crate::catalog::{CatalogConfig, EventTypeCatalog};
use crate::composer::{ActionBatch, ActionComposer};
use crate::config::DirectorConfig;
use crate::events::EventBus;
use crate::processor::EventProcessor;
use crate::resolver::SessionResolver;
use crate::workers::{Command, DirectorWorker, SubmissionWorker};

/// Session director keeping a local session consistent with the ledger.
///
/// Design: Director owns workers and coordinates their lifetime.
/// [`DirectorHandle`] provides a cloneable façade for clients.
pub struct Director {
    handle: DirectorHandle,
    director_worker_handle: JoinHandle<()>,
    submission_worker_handle: JoinHandle<()>,
}

impl Director {
    /// Create a new director builder
    pub fn builder() -> DirectorBuilder {
        DirectorBuilder::new()
    }

    /// Get a cloneable handle to this director
    pub fn handle(&self) -> DirectorHandle {
        self.handle.clone()
    }

    /// Shutdown the director gracefully
    ///
    /// Cancels the live subscription, drops pending events, and waits for
    /// already queued submissions to finish.
    pub async fn shutdown(self) -> Result<()> {
        if let Err(error) = self.handle.shutdown_worker().await {
            tracing::debug!(%error, "director worker already stopped");
        }
        drop(self.handle);

        self.director_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;
        self.submission_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Director`] with flexible configuration.
pub struct DirectorBuilder {
    config: DirectorConfig,
    ledger: Option<Arc<dyn GameLedger>>,
    catalog: Option<CatalogConfig>,
}

impl DirectorBuilder {
    fn new() -> Self {
        Self {
            config: DirectorConfig::default(),
            ledger: None,
            catalog: None,
        }
    }

    /// Override director configuration
    pub fn config(mut self, config: DirectorConfig) -> Self {
        self.config = config;
        self
    }

    /// Set required ledger
    pub fn ledger(mut self, ledger: impl GameLedger + 'static) -> Self {
        self.ledger = Some(Arc::new(ledger));
        self
    }

    /// Set required ledger from a shared instance
    pub fn shared_ledger(mut self, ledger: Arc<dyn GameLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Use `catalog` instead of the one named by the configuration
    pub fn catalog(mut self, catalog: CatalogConfig) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Build the director and spawn its workers
    pub async fn build(self) -> Result<Director> {
        let ledger = self.ledger.ok_or(RuntimeError::MissingLedger)?;
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => self.config.catalog()?,
        };
        let catalog = Arc::new(EventTypeCatalog::new(catalog));

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (batch_tx, batch_rx) =
            mpsc::channel::<ActionBatch>(self.config.submission_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.signal_buffer_size);
        let failures = Arc::new(AtomicU64::new(0));

        tracing::info!(
            ledger = ledger.name(),
            network = ledger.network(),
            surface = %self.config.surface,
            vrf_enabled = self.config.vrf_enabled,
            "starting session director"
        );

        let submission_worker = SubmissionWorker::new(
            Arc::clone(&ledger),
            batch_rx,
            Arc::clone(&failures),
            event_bus.clone(),
        );
        let submission_worker_handle = tokio::spawn(async move {
            submission_worker.run().await;
        });

        let director_worker = DirectorWorker::new(
            SessionResolver::new(ledger, Arc::clone(&catalog), self.config.vrf_enabled),
            EventProcessor::new(catalog),
            ActionComposer::new(batch_tx),
            command_rx,
            event_bus.clone(),
            self.config.replay_autoplay,
        );
        let director_worker_handle = tokio::spawn(async move {
            director_worker.run().await;
        });

        Ok(Director {
            handle: DirectorHandle::new(command_tx, event_bus, failures),
            director_worker_handle,
            submission_worker_handle,
        })
    }
}
