//! Read-only view of the director's session.
use serde::{Deserialize, Serialize};

use game_core::{Equipment, ItemId, SessionId, SessionState};

use crate::cues::Cue;
use crate::mode::SessionMode;
use crate::replay::ReplayStatus;

/// Copy of everything the director knows about the attached session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session: Option<SessionId>,
    pub mode: SessionMode,
    pub state: SessionState,
    /// Loadout as currently displayed (local arrangement or confirmed equipment).
    pub loadout: Equipment,
    pub randomness_required: bool,
    pub active_cue: Option<Cue>,
    pub pending_cues: usize,
    /// Loot found since the presentation last flashed the inventory.
    pub new_inventory_items: Vec<ItemId>,
    pub pending_events: usize,
    pub replay: Option<ReplayStatus>,
    pub live_feed_open: bool,
}
