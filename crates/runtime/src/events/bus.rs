//! Topic-based signal bus implementation.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{ActionEvent, PresentationEvent, StateEvent};

/// Topics for signal routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Session state changes (mode, applied events, logs)
    State,
    /// Cues, overlay, inventory, battle display
    Presentation,
    /// Batch submission outcomes
    Action,
}

/// Signal wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    State(StateEvent),
    Presentation(PresentationEvent),
    Action(ActionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::State(_) => Topic::State,
            Event::Presentation(_) => Topic::Presentation,
            Event::Action(_) => Topic::Action,
        }
    }
}

impl From<StateEvent> for Event {
    fn from(event: StateEvent) -> Self {
        Event::State(event)
    }
}

impl From<PresentationEvent> for Event {
    fn from(event: PresentationEvent) -> Self {
        Event::Presentation(event)
    }
}

impl From<ActionEvent> for Event {
    fn from(event: ActionEvent) -> Self {
        Event::Action(event)
    }
}

/// Topic-based signal bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// signals they care about. Publishing never blocks; slow subscribers lag.
#[derive(Clone)]
pub struct EventBus {
    state: broadcast::Sender<Event>,
    presentation: broadcast::Sender<Event>,
    action: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: broadcast::channel(capacity).0,
            presentation: broadcast::channel(capacity).0,
            action: broadcast::channel(capacity).0,
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::State => &self.state,
            Topic::Presentation => &self.presentation,
            Topic::Action => &self.action,
        }
    }

    /// Publish a signal to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    pub fn publish_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.publish(event);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive signals for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
