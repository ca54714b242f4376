//! Snapshot types folded into [`SessionState`](super::SessionState).
mod adventurer;
mod common;
mod equipment;
mod item;

pub use adventurer::{Adventurer, Beast, Stats};
pub use common::SessionId;
pub use equipment::{Equipment, Slot};
pub use item::{Item, ItemId, ItemPurchase};
