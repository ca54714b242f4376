//! Ledger abstraction layer for the survivor client.
//!
//! The game logic runs on a remote ledger the client does not control. This
//! crate describes the narrow surface the client consumes from it.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: GameLedger (composite trait)
//!          ├── EventSource        (historical log + live subscription)
//!          ├── CallSubmitter      (atomic batches of game calls)
//!          ├── SettingsProvider   (session settings lookup)
//!          └── AdventurerReader   (point read of a session's adventurer)
//!
//! Layer 0: RawRecord / Call (already-serialized transport shapes)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use client_blockchain_core::{Call, EventSource, CallSubmitter};
//!
//! async fn start(ledger: &dyn GameLedger, session: SessionId) {
//!     let subscription = ledger.subscribe(session).await?;
//!     ledger.submit_batch(vec![Call::RequestRandomness, Call::Explore { session, till_beast: true }]).await?;
//! }
//! ```

pub mod traits;
pub mod types;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export all traits
pub use traits::{
    AdventurerReader, CallSubmitter, EventSource, GameLedger, LiveFeed, SettingsProvider,
    SubmitError, Subscription, SubscriptionHandle, TransportError,
};

// Re-export all types
pub use types::{BatchReceipt, Call, RawRecord, Settings, TransactionId, GAME_EVENT_MODEL};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockLedger;
