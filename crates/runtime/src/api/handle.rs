//! Cloneable façade for issuing commands to the director.
//!
//! [`DirectorHandle`] hides channel plumbing and offers async helpers for
//! attaching to sessions, submitting intents, driving replays, or streaming
//! signals from specific topics.
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{broadcast, mpsc, oneshot};

use game_core::{Equipment, Intent, ItemId};

use super::errors::{Result, RuntimeError};
use super::snapshot::SessionSnapshot;
use crate::composer::ActionBatch;
use crate::cues::Cue;
use crate::events::{Event, EventBus, Topic};
use crate::mode::SessionMode;
use crate::replay::{ReplayControl, ReplayStatus};
use crate::resolver::AttachRequest;
use crate::workers::Command;

/// Client-facing handle to interact with the director
#[derive(Clone)]
pub struct DirectorHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    failures: Arc<AtomicU64>,
}

impl DirectorHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        failures: Arc<AtomicU64>,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            failures,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Attach to a session, replacing the current one.
    ///
    /// Returns the resolved mode. Transport errors leave the director
    /// detached; attaching again retries from scratch.
    pub async fn attach(&self, request: AttachRequest) -> Result<SessionMode> {
        self.request(|reply| Command::Attach { request, reply })
            .await?
    }

    /// Detach from the current session and cancel its subscription.
    pub async fn detach(&self) -> Result<()> {
        self.request(|reply| Command::Detach { reply }).await
    }

    /// Compose `intent` into a batch and queue it for submission.
    ///
    /// Returns once the batch is queued; its outcome is published on
    /// [`Topic::Action`].
    pub async fn execute_action(&self, intent: Intent) -> Result<ActionBatch> {
        self.request(|reply| Command::ExecuteAction { intent, reply })
            .await?
    }

    /// Arrange the loadout locally; changed slots are equipped implicitly
    /// before the next intent.
    pub async fn set_loadout(&self, equipment: Equipment) -> Result<()> {
        self.request(|reply| Command::SetLoadout { equipment, reply })
            .await?
    }

    /// Finish (or skip) the active cue, returning the next active one.
    pub async fn complete_cue(&self) -> Result<Option<Cue>> {
        self.request(|reply| Command::CompleteCue { reply }).await
    }

    pub async fn take_new_inventory_items(&self) -> Result<Vec<ItemId>> {
        self.request(|reply| Command::TakeNewInventoryItems { reply })
            .await
    }

    pub async fn acknowledge_market(&self) -> Result<()> {
        self.request(|reply| Command::AcknowledgeMarket { reply })
            .await
    }

    /// Query the current session (read-only snapshot)
    pub async fn query_state(&self) -> Result<SessionSnapshot> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    pub async fn mode(&self) -> Result<SessionMode> {
        Ok(self.query_state().await?.mode)
    }

    pub async fn replay_play(&self) -> Result<ReplayStatus> {
        self.replay(ReplayControl::Play).await
    }

    pub async fn replay_pause(&self) -> Result<ReplayStatus> {
        self.replay(ReplayControl::Pause).await
    }

    pub async fn replay_step(&self) -> Result<ReplayStatus> {
        self.replay(ReplayControl::Step).await
    }

    pub async fn replay_seek(&self, position: usize) -> Result<ReplayStatus> {
        self.replay(ReplayControl::Seek(position)).await
    }

    async fn replay(&self, control: ReplayControl) -> Result<ReplayStatus> {
        self.request(|reply| Command::Replay { control, reply })
            .await?
    }

    /// Number of failed batch submissions since the director started.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }

    /// Subscribe to signals from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::State` - Mode changes, applied events, log appends
    /// - `Topic::Presentation` - Cues, overlay, inventory, battle display
    /// - `Topic::Action` - Batch submissions and failures
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut cues = handle.subscribe(Topic::Presentation);
    /// while let Ok(signal) = cues.recv().await {
    ///     // Play cinematics
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the signal bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub(crate) async fn shutdown_worker(&self) -> Result<()> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}
