//! Ordered buffer of events waiting to be processed.
use std::collections::VecDeque;

use game_core::{GameEvent, SequenceNumber};

/// Pending events, sorted ascending by sequence at insertion time.
///
/// Arrival order is not trusted: batches from the subscription can overlap,
/// repeat, or arrive out of order. Each inserted event is placed by scanning
/// from the back, which is the cheap path for the common in-order case.
/// Sequences already pending, or at or below the last drained one, are
/// discarded, so drained sequences strictly increase.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<GameEvent>,
    last_drained: Option<SequenceNumber>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `events`, returning how many were accepted.
    pub fn enqueue<I>(&mut self, events: I) -> usize
    where
        I: IntoIterator<Item = GameEvent>,
    {
        events
            .into_iter()
            .filter_map(|event| self.insert(event).then_some(()))
            .count()
    }

    /// Inserts one event in sequence order.
    ///
    /// Returns false if the sequence was already pending or drained.
    pub fn insert(&mut self, event: GameEvent) -> bool {
        if self
            .last_drained
            .is_some_and(|drained| event.sequence <= drained)
        {
            return false;
        }

        let mut index = self.pending.len();
        loop {
            if index == 0 {
                self.pending.push_front(event);
                return true;
            }

            index -= 1;

            let existing = self.pending[index].sequence;
            if existing == event.sequence {
                return false;
            }
            if existing < event.sequence {
                self.pending.insert(index + 1, event);
                return true;
            }
        }
    }

    /// Removes the lowest pending event.
    pub fn drain_next(&mut self) -> Option<GameEvent> {
        let event = self.pending.pop_front()?;
        self.last_drained = Some(event.sequence);
        Some(event)
    }

    pub fn peek(&self) -> Option<&GameEvent> {
        self.pending.front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn last_drained(&self) -> Option<SequenceNumber> {
        self.last_drained
    }

    /// Drops pending events and forgets the drained watermark.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.last_drained = None;
    }
}
