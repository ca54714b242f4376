mod common;

use std::time::Duration;

use client_blockchain_core::RawRecord;
use game_core::{DiscoveryKind, GameEvent, SessionId};
use runtime::{
    AttachRequest, DirectorConfig, Event, SessionMode, SessionSnapshot, StateEvent, Topic,
};
use tokio::time::Instant;

use common::*;

fn sequences(log: &[GameEvent]) -> Vec<u32> {
    log.iter().map(|event| event.sequence).collect()
}

#[tokio::test(start_paused = true)]
async fn out_of_order_live_batch_is_applied_in_sequence() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut state_rx = handle.subscribe(Topic::State);

    let mode = handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    assert_eq!(mode, SessionMode::Live);

    assert!(ledger.push_live(SESSION, &[obstacle(4), obstacle(2), obstacle(3)]));
    let snapshot = wait_until(&handle, |s| s.state.events_processed == 4).await;

    assert_eq!(sequences(&snapshot.state.explore_log), vec![2, 3, 4]);

    let applied: Vec<u32> = buffered(&mut state_rx)
        .into_iter()
        .filter_map(|signal| match signal {
            Event::State(StateEvent::StateChanged { sequence, .. }) => Some(sequence),
            _ => None,
        })
        .collect();
    assert_eq!(applied, vec![1, 2, 3, 4]);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn redelivered_events_are_applied_once() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100), obstacle(2)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    ledger.push_live(SESSION, &[obstacle(2), obstacle(3)]);
    ledger.push_live(SESSION, &[obstacle(3), obstacle(4)]);
    ledger.push_live(SESSION, &[obstacle(1)]);
    let snapshot = wait_until(&handle, |s| s.state.events_processed == 4).await;

    tokio::time::sleep(Duration::from_secs(5)).await;
    let later = handle.query_state().await.unwrap();

    assert_eq!(sequences(&snapshot.state.explore_log), vec![2, 3, 4]);
    assert_eq!(later.state.events_processed, 4);
    assert_eq!(later.pending_events, 0);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn events_of_another_session_are_discarded() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    let foreign = GameEvent::new(SessionId(99), 2, obstacle(2).details);
    let records = vec![
        RawRecord::from_event(&foreign).unwrap(),
        RawRecord::from_event(&obstacle(3)).unwrap(),
        RawRecord::default(),
    ];
    ledger.push_live_records(SESSION, records);

    let snapshot = wait_until(&handle, |s| s.state.events_processed == 2).await;
    assert_eq!(sequences(&snapshot.state.explore_log), vec![3]);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn pacing_holds_the_next_event_until_the_deadline() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut state_rx = handle.subscribe(Topic::State);
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    ledger.push_live(SESSION, &[attack(2), obstacle(3), obstacle(4)]);

    applied(&mut state_rx, 2).await;
    let attack_applied = Instant::now();

    let during = handle.query_state().await.unwrap();
    assert_eq!(during.pending_events, 2);
    assert!(Instant::now() - attack_applied < Duration::from_millis(2000));

    applied(&mut state_rx, 3).await;
    let waited = Instant::now() - attack_applied;
    assert!(waited >= Duration::from_millis(2000), "waited {waited:?}");
    assert!(waited < Duration::from_millis(2100), "waited {waited:?}");

    // Obstacles carry no desktop live delay.
    applied(&mut state_rx, 4).await;
    assert!(Instant::now() - attack_applied < Duration::from_millis(2100));

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn detach_during_pacing_drops_pending_events() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut state_rx = handle.subscribe(Topic::State);
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    ledger.push_live(SESSION, &[attack(2), obstacle(3)]);
    applied(&mut state_rx, 2).await;

    handle.detach().await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let snapshot = handle.query_state().await.unwrap();
    assert_eq!(snapshot.mode, SessionMode::Detached);
    assert_eq!(snapshot.pending_events, 0);
    assert_eq!(snapshot.state.events_processed, 0);
    assert!(!snapshot.live_feed_open);
    assert_eq!(ledger.cancellations(), 1);
    assert!(!ledger.push_live(SESSION, &[obstacle(5)]));

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn silent_history_plus_live_redelivery_matches_single_pass() {
    let full: Vec<GameEvent> = vec![
        adventurer(1, 100),
        obstacle(2),
        discovery(3, DiscoveryKind::Loot, 9),
        adventurer(4, 80),
        level_up(5),
        obstacle(6),
        adventurer(7, 60),
    ];
    let settled = |s: &SessionSnapshot| s.state.events_processed == 7 && s.pending_events == 0;

    let split_ledger = ledger_with(settings(0, 0, 0));
    split_ledger.set_history(SESSION, &full[..4]);
    let split = start(&split_ledger, DirectorConfig::default()).await;
    let split_handle = split.handle();
    split_handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    split_ledger.push_live(SESSION, &full[2..]);
    let split_state = wait_until(&split_handle, settled).await.state;

    let single_ledger = ledger_with(settings(0, 0, 0));
    let single = start(&single_ledger, DirectorConfig::default()).await;
    let single_handle = single.handle();
    let mode = single_handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    assert_eq!(mode, SessionMode::Fresh);
    single_ledger.push_live(SESSION, &full);
    let single_snapshot = wait_until(&single_handle, settled).await;

    assert_eq!(single_snapshot.new_inventory_items, vec![9]);
    assert_eq!(split_state, single_snapshot.state);

    split.shutdown().await.unwrap();
    single.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_the_live_subscription() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    director.shutdown().await.unwrap();

    assert_eq!(ledger.cancellations(), 1);
    assert!(!ledger.is_subscribed(SESSION));
    assert!(handle.query_state().await.is_err());
}
