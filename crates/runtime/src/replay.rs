//! Finite, controllable replay of a recorded session log.
use serde::{Deserialize, Serialize};

use game_core::GameEvent;

/// Position and playback state of a [`Replay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayStatus {
    /// Index of the next event to present.
    pub position: usize,
    pub len: usize,
    pub playing: bool,
}

impl ReplayStatus {
    pub fn is_finished(&self) -> bool {
        self.position >= self.len
    }
}

/// Playback control requested by the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayControl {
    Play,
    Pause,
    /// Present the next event immediately and pause.
    Step,
    /// Jump so that the next presented event is at the given index.
    Seek(usize),
}

/// Recorded events ascending by sequence, and a cursor over them.
#[derive(Debug, Clone, Default)]
pub struct Replay {
    events: Vec<GameEvent>,
    position: usize,
    playing: bool,
}

impl Replay {
    pub fn new(events: Vec<GameEvent>, autoplay: bool) -> Self {
        Self {
            events,
            position: 0,
            playing: autoplay,
        }
    }

    pub fn status(&self) -> ReplayStatus {
        ReplayStatus {
            position: self.position,
            len: self.events.len(),
            playing: self.playing,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing && !self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.events.len()
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Takes the next event and advances the cursor.
    pub fn advance(&mut self) -> Option<GameEvent> {
        let event = self.events.get(self.position)?.clone();
        self.position += 1;
        Some(event)
    }

    /// Moves the cursor to `target` (clamped to the end).
    ///
    /// Returns the events before the new cursor; the caller rebuilds its
    /// state from them.
    pub fn seek(&mut self, target: usize) -> &[GameEvent] {
        self.position = target.min(self.events.len());
        &self.events[..self.position]
    }

    /// Appends events that arrived after the replay was built.
    ///
    /// Only sequences beyond the last recorded one are kept.
    pub fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) -> usize {
        let mut added = 0;
        for event in events {
            let last = self.events.last().map(|last| last.sequence);
            if last.is_none_or(|last| event.sequence > last) {
                self.events.push(event);
                added += 1;
            }
        }
        added
    }
}
