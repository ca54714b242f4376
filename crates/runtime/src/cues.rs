//! Presentation cues and their sequencing.
use std::collections::VecDeque;

use game_core::ItemId;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::events::PresentationEvent;

/// A cinematic the presentation plays on top of the game view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Cue {
    Death,
    SpecialsUnlocked,
    LevelUp,
}

/// FIFO of cues with at most one active at a time.
///
/// Queuing a cue hides the overlay. Completing the active cue activates the
/// next one; completing the last one shows the overlay again.
#[derive(Debug, Default)]
pub struct CueQueue {
    active: Option<Cue>,
    pending: VecDeque<Cue>,
}

impl CueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, cue: Cue) -> Vec<PresentationEvent> {
        let mut signals = vec![PresentationEvent::Overlay { visible: false }];

        if self.active.is_none() {
            self.active = Some(cue);
            signals.push(PresentationEvent::ShowCue(cue));
        } else {
            self.pending.push_back(cue);
        }

        signals
    }

    /// Finishes (or skips) the active cue.
    pub fn complete(&mut self) -> Vec<PresentationEvent> {
        if self.active.take().is_none() {
            return Vec::new();
        }

        match self.pending.pop_front() {
            Some(next) => {
                self.active = Some(next);
                vec![PresentationEvent::ShowCue(next)]
            }
            None => vec![PresentationEvent::Overlay { visible: true }],
        }
    }

    pub fn active(&self) -> Option<Cue> {
        self.active
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Drops every cue. Shows the overlay again if a cue was hiding it.
    pub fn clear(&mut self) -> Vec<PresentationEvent> {
        self.pending.clear();
        match self.active.take() {
            Some(_) => vec![PresentationEvent::Overlay { visible: true }],
            None => Vec::new(),
        }
    }
}

/// Presentation-side leftovers of applied events.
///
/// Owned by the worker next to the session state, so that reapplying the
/// same log always yields the same `SessionState`.
#[derive(Debug, Default)]
pub struct Presentation {
    pub cues: CueQueue,
    /// Loot found since the presentation last flashed the inventory.
    pub new_inventory_items: Vec<ItemId>,
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_new_inventory_items(&mut self) -> Vec<ItemId> {
        std::mem::take(&mut self.new_inventory_items)
    }

    pub fn clear(&mut self) -> Vec<PresentationEvent> {
        self.new_inventory_items.clear();
        self.cues.clear()
    }
}
