//! Locally mirrored session state.
//!
//! [`SessionState`] is what the client knows about one run: the latest
//! snapshots received from the ledger plus the logs built from narrative
//! events. It is owned by the runtime's director and mutated only through
//! [`SessionState::apply`] and the log helpers, one event at a time.
pub mod types;

pub use types::{Adventurer, Beast, Equipment, Item, ItemId, ItemPurchase, SessionId, Slot, Stats};

use crate::event::{EventDetails, GameEvent, SequenceNumber};

/// Canonical client-side view of a session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionState {
    pub adventurer: Option<Adventurer>,
    /// Bag contents; empty slots are never stored.
    pub bag: Vec<Item>,
    pub beast: Option<Beast>,
    pub market_item_ids: Vec<ItemId>,
    /// Set when a new market arrives, cleared once the presentation shows it.
    pub new_market: bool,
    /// Narrative of the player's own run.
    pub explore_log: Vec<GameEvent>,
    /// Narrative of a spectated run.
    pub replay_log: Vec<GameEvent>,
    pub events_processed: u64,
    /// Highest sequence applied so far.
    pub last_applied: Option<SequenceNumber>,
}

/// Outcome of [`SessionState::apply`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The event was folded into the state.
    Applied {
        /// Snapshot replaced by an `Adventurer` event, if any.
        previous_adventurer: Option<Adventurer>,
    },
    /// The event's sequence was already applied; nothing changed.
    Duplicate,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Equipment last confirmed by the ledger.
    pub fn confirmed_equipment(&self) -> Equipment {
        self.adventurer
            .as_ref()
            .map(|adventurer| adventurer.equipment.clone())
            .unwrap_or_default()
    }

    /// Returns true if `sequence` is at or below the highest applied sequence.
    pub fn has_applied(&self, sequence: SequenceNumber) -> bool {
        self.last_applied.is_some_and(|last| sequence <= last)
    }

    /// Folds the snapshot carried by `event` into the state.
    ///
    /// Narrative variants only advance the sequence watermark here; routing
    /// them to a log depends on the viewing mode and is done by the caller
    /// through [`push_explore`](Self::push_explore) or
    /// [`push_replay`](Self::push_replay).
    pub fn apply(&mut self, event: &GameEvent) -> Applied {
        if self.has_applied(event.sequence) {
            return Applied::Duplicate;
        }

        let mut previous_adventurer = None;
        match &event.details {
            EventDetails::Adventurer(adventurer) => {
                previous_adventurer = self.adventurer.replace(adventurer.clone());
            }
            EventDetails::Bag(items) => {
                self.bag = items.iter().copied().filter(|item| !item.is_empty()).collect();
            }
            EventDetails::Beast(beast) => {
                self.beast = Some(beast.clone());
            }
            EventDetails::MarketItems(ids) => {
                self.market_item_ids = ids.clone();
                self.new_market = true;
            }
            _ => {}
        }

        self.last_applied = Some(event.sequence);
        self.events_processed += 1;

        Applied::Applied {
            previous_adventurer,
        }
    }

    pub fn push_explore(&mut self, event: &GameEvent) {
        self.explore_log.push(event.clone());
    }

    pub fn push_replay(&mut self, event: &GameEvent) {
        self.replay_log.push(event.clone());
    }
}
