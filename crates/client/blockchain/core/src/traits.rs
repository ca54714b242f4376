//! Ledger abstraction traits.
//!
//! This module defines the layered ledger surface:
//! - Layer 1: EventSource, CallSubmitter, SettingsProvider, AdventurerReader
//! - Layer 2: GameLedger (composite trait)

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use game_core::{Adventurer, SessionId};

use crate::types::{BatchReceipt, Call, RawRecord, Settings};

// ============================================================================
// Error Types
// ============================================================================

/// Transport layer errors (subscriptions, fetches, point reads).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Subscription for session {0} is closed")]
    SubscriptionClosed(SessionId),

    #[error("Settings {0} not found")]
    SettingsNotFound(u32),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Backend-specific error: {0}")]
    BackendError(String),
}

/// Batch submission errors.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Batch rejected: {0}")]
    Rejected(String),

    #[error("Transaction reverted: {reason}")]
    Reverted { reason: String },

    #[error("Transport error: {0}")]
    TransportError(#[from] TransportError),
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Cancels a live subscription on the ledger side.
pub trait SubscriptionHandle: Send + Sync {
    fn cancel(&self) -> Result<(), TransportError>;
}

/// Live half of a subscription: batches in arrival order plus the handle
/// that stops them.
pub struct LiveFeed {
    pub batches: mpsc::UnboundedReceiver<Vec<RawRecord>>,
    pub handle: Box<dyn SubscriptionHandle>,
}

impl LiveFeed {
    pub fn new(
        batches: mpsc::UnboundedReceiver<Vec<RawRecord>>,
        handle: Box<dyn SubscriptionHandle>,
    ) -> Self {
        Self { batches, handle }
    }

    /// Cancels the ledger side of the feed.
    pub fn cancel(&self) -> Result<(), TransportError> {
        self.handle.cancel()
    }
}

impl fmt::Debug for LiveFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveFeed").finish_non_exhaustive()
    }
}

/// Result of subscribing to a session: everything already on the log, and
/// the feed of what comes next. Both share the same record shape.
#[derive(Debug)]
pub struct Subscription {
    pub historical: Vec<RawRecord>,
    pub live: LiveFeed,
}

// ============================================================================
// Layer 1: Game Domain Traits
// ============================================================================

/// Source of a session's event log.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch the historical log and open a live feed for `session`.
    async fn subscribe(&self, session: SessionId) -> Result<Subscription, TransportError>;
}

/// Submission of game calls.
#[async_trait]
pub trait CallSubmitter: Send + Sync {
    /// Submit `calls` as one atomic unit: either all of them land, in order,
    /// or none does.
    async fn submit_batch(&self, calls: Vec<Call>) -> Result<BatchReceipt, SubmitError>;
}

/// Session settings lookup.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn get_settings(&self, settings_id: u32) -> Result<Settings, TransportError>;
}

/// Direct read of a session's current adventurer.
#[async_trait]
pub trait AdventurerReader: Send + Sync {
    /// Returns `None` when the ledger knows no adventurer for `session`.
    async fn get_adventurer(&self, session: SessionId)
    -> Result<Option<Adventurer>, TransportError>;
}

// ============================================================================
// Layer 2: Composite Trait
// ============================================================================

/// Everything the session director needs from a ledger.
pub trait GameLedger:
    EventSource + CallSubmitter + SettingsProvider + AdventurerReader + Send + Sync
{
    /// Get the ledger name (e.g., "Starknet").
    fn name(&self) -> &str;

    /// Get the network name (e.g., "mainnet", "sepolia", "local").
    fn network(&self) -> &str;
}
