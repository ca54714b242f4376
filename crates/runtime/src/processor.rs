//! Applies events to the session state and derives presentation signals.
//!
//! Processing is split from the worker so that every derived effect is a
//! plain return value: the worker publishes the signals and honours the delay.
use std::sync::Arc;
use std::time::Duration;

use game_core::{Adventurer, Applied, EventDetails, GameEvent, SessionState};

use crate::catalog::{EventTypeCatalog, PacingMode};
use crate::cues::{Cue, CueQueue, Presentation};
use crate::events::{Event, PresentationEvent, StateEvent};

/// Log an applied narrative event is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routing {
    /// The player's own run.
    Explore,
    /// A spectated run.
    Replay,
}

/// How one event should be processed.
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    pub routing: Routing,
    pub pacing: PacingMode,
    /// Apply the state mutation only.
    pub skip_effects: bool,
}

impl ProcessOptions {
    pub fn live(routing: Routing, pacing: PacingMode) -> Self {
        Self {
            routing,
            pacing,
            skip_effects: false,
        }
    }

    pub fn silent(routing: Routing) -> Self {
        Self {
            routing,
            pacing: PacingMode::Live,
            skip_effects: true,
        }
    }
}

/// Result of processing one event.
#[derive(Debug, Default)]
pub struct Processed {
    /// False when the sequence had already been applied.
    pub applied: bool,
    /// Signals to publish, in order.
    pub signals: Vec<Event>,
    /// Minimum wait before the next event may drain.
    pub delay: Duration,
}

#[derive(Debug, Clone)]
pub struct EventProcessor {
    catalog: Arc<EventTypeCatalog>,
}

impl EventProcessor {
    pub fn new(catalog: Arc<EventTypeCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &EventTypeCatalog {
        &self.catalog
    }

    /// Applies `event` to `state`.
    pub fn process_one(
        &self,
        state: &mut SessionState,
        presentation: &mut Presentation,
        event: &GameEvent,
        options: ProcessOptions,
    ) -> Processed {
        let previous_adventurer = match state.apply(event) {
            Applied::Duplicate => {
                tracing::debug!(
                    target: "runtime::processor",
                    sequence = event.sequence,
                    "discarding already applied event"
                );
                return Processed::default();
            }
            Applied::Applied {
                previous_adventurer,
            } => previous_adventurer,
        };

        let event_type = event.event_type();
        let skip = options.skip_effects;
        let mut signals = vec![Event::from(StateEvent::StateChanged {
            sequence: event.sequence,
            event_type,
        })];

        if let EventDetails::Adventurer(adventurer) = &event.details
            && !skip
        {
            adventurer_signals(
                adventurer,
                previous_adventurer.as_ref(),
                &mut presentation.cues,
                &mut signals,
            );
        }

        match options.routing {
            Routing::Explore if self.catalog.is_explore_narrative(event_type) => {
                if !skip
                    && let EventDetails::Discovery(discovery) = &event.details
                    && let Some(item) = discovery.loot()
                {
                    presentation.new_inventory_items.push(item);
                    signals.push(
                        StateEvent::NewInventoryItems(presentation.new_inventory_items.clone())
                            .into(),
                    );
                }

                state.push_explore(event);
                if !skip {
                    signals.push(StateEvent::NarrativeAppended(event.clone()).into());
                }
            }
            Routing::Replay if self.catalog.is_replay_narrative(event_type) => {
                state.push_replay(event);
                if !skip {
                    signals.push(StateEvent::ReplayAppended(event.clone()).into());
                }
            }
            _ => {}
        }

        if skip {
            return Processed {
                applied: true,
                signals,
                delay: Duration::ZERO,
            };
        }

        if self.catalog.is_battle(event_type) {
            signals.push(PresentationEvent::BattleEvent(event.clone()).into());
        }

        if let EventDetails::LevelUp(_) = event.details {
            signals.extend(
                presentation
                    .cues
                    .enqueue(Cue::LevelUp)
                    .into_iter()
                    .map(Event::from),
            );
        }

        Processed {
            applied: true,
            signals,
            delay: self.catalog.pacing_delay(event_type, options.pacing),
        }
    }
}

/// Cues and inventory toggles derived from a new adventurer snapshot.
fn adventurer_signals(
    current: &Adventurer,
    previous: Option<&Adventurer>,
    cues: &mut CueQueue,
    signals: &mut Vec<Event>,
) {
    let previous_health = previous.map_or(0, |adventurer| adventurer.health);
    let previous_seed = previous.map_or(0, |adventurer| adventurer.item_specials_seed);
    let previous_upgrades = previous.map_or(0, |adventurer| adventurer.stat_upgrades_available);

    if previous_health > 0 && current.health == 0 {
        signals.extend(cues.enqueue(Cue::Death).into_iter().map(Event::from));
    }

    if current.item_specials_seed != 0 && current.item_specials_seed != previous_seed {
        signals.extend(
            cues.enqueue(Cue::SpecialsUnlocked)
                .into_iter()
                .map(Event::from),
        );
        signals.push(PresentationEvent::ShowInventory { visible: true }.into());
    }

    if previous_upgrades == 0 && current.stat_upgrades_available > 0 {
        signals.push(PresentationEvent::ShowInventory { visible: true }.into());
    } else if previous_upgrades > 0 && current.stat_upgrades_available == 0 {
        signals.push(PresentationEvent::ShowInventory { visible: false }.into());
    }
}
