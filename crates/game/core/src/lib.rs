//! Session data model shared across the survivor client.
//!
//! `game-core` defines the typed events emitted by the remote ledger, the
//! snapshots they carry (adventurer, bag, beast, market) and the
//! [`SessionState`] those snapshots are folded into. Everything here is pure:
//! ordering, pacing and side effects live in the `runtime` crate.
pub mod action;
pub mod event;
pub mod state;

pub use action::{Intent, IntentKind};
pub use event::{
    BeastDefeated, BeastFled, Discovery, DiscoveryKind, EventDetails, EventType, Flee, GameEvent,
    ItemsBought, LevelUp, Obstacle, SequenceNumber, StatUpgrade, Strike,
};
pub use state::{
    Adventurer, Applied, Beast, Equipment, Item, ItemId, ItemPurchase, SessionId, SessionState,
    Slot, Stats,
};
