#![allow(dead_code)]

use std::time::Duration;

use client_blockchain_core::{MockLedger, Settings};
use game_core::{
    Adventurer, BeastDefeated, Discovery, DiscoveryKind, EventDetails, GameEvent, Item, ItemId,
    LevelUp, Obstacle, SequenceNumber, SessionId, Slot, Strike,
};
use runtime::{
    Director, DirectorConfig, DirectorHandle, Event, SessionSnapshot, StateEvent,
};
use tokio::sync::broadcast;

pub const SESSION: SessionId = SessionId(7);
pub const SETTINGS_ID: u32 = 1;

pub fn settings(fixed_seed: u64, seed_until_xp: u16, starting_adventurer_xp: u16) -> Settings {
    Settings {
        settings_id: SETTINGS_ID,
        fixed_seed,
        seed_until_xp,
        starting_adventurer_xp,
    }
}

pub fn ledger_with(settings: Settings) -> MockLedger {
    let ledger = MockLedger::new();
    ledger.insert_settings(settings);
    ledger
}

pub async fn start(ledger: &MockLedger, config: DirectorConfig) -> Director {
    Director::builder()
        .config(config)
        .ledger(ledger.clone())
        .build()
        .await
        .expect("director should build")
}

pub fn event(sequence: SequenceNumber, details: EventDetails) -> GameEvent {
    GameEvent::new(SESSION, sequence, details)
}

pub fn adventurer(sequence: SequenceNumber, health: u16) -> GameEvent {
    event(
        sequence,
        EventDetails::Adventurer(Adventurer {
            health,
            ..Adventurer::default()
        }),
    )
}

pub fn adventurer_with(sequence: SequenceNumber, adventurer: Adventurer) -> GameEvent {
    event(sequence, EventDetails::Adventurer(adventurer))
}

pub fn obstacle(sequence: SequenceNumber) -> GameEvent {
    event(sequence, EventDetails::Obstacle(Obstacle::default()))
}

pub fn attack(sequence: SequenceNumber) -> GameEvent {
    event(sequence, EventDetails::Attack(Strike::default()))
}

pub fn defeated_beast(sequence: SequenceNumber) -> GameEvent {
    event(sequence, EventDetails::DefeatedBeast(BeastDefeated::default()))
}

pub fn level_up(sequence: SequenceNumber) -> GameEvent {
    event(sequence, EventDetails::LevelUp(LevelUp { level: 2 }))
}

pub fn discovery(sequence: SequenceNumber, kind: DiscoveryKind, amount: u16) -> GameEvent {
    event(sequence, EventDetails::Discovery(Discovery { kind, amount }))
}

pub fn loadout(weapon: ItemId, head: ItemId) -> game_core::Equipment {
    let mut equipment = game_core::Equipment::empty();
    equipment.equip(Slot::Weapon, Item::new(weapon));
    equipment.equip(Slot::Head, Item::new(head));
    equipment
}

/// Polls the director until `predicate` holds, letting paused time advance.
pub async fn wait_until<F>(handle: &DirectorHandle, mut predicate: F) -> SessionSnapshot
where
    F: FnMut(&SessionSnapshot) -> bool,
{
    for _ in 0..1_000 {
        let snapshot = handle.query_state().await.expect("director alive");
        if predicate(&snapshot) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached");
}

/// Receives signals until one matches, returning it.
pub async fn next_matching<F>(rx: &mut broadcast::Receiver<Event>, mut predicate: F) -> Event
where
    F: FnMut(&Event) -> bool,
{
    tokio::time::timeout(Duration::from_secs(60), async {
        loop {
            let signal = rx.recv().await.expect("signal bus open");
            if predicate(&signal) {
                return signal;
            }
        }
    })
    .await
    .expect("signal not received in time")
}

/// Waits for the state-changed signal of `sequence`.
pub async fn applied(rx: &mut broadcast::Receiver<Event>, sequence: SequenceNumber) {
    next_matching(rx, |signal| {
        matches!(
            signal,
            Event::State(StateEvent::StateChanged { sequence: s, .. }) if *s == sequence
        )
    })
    .await;
}

/// Drains every signal currently buffered in `rx`.
pub fn buffered(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}
