mod common;

use std::time::Duration;

use client_blockchain_core::Call;
use game_core::{Adventurer, DiscoveryKind, Intent, SessionId};
use runtime::{
    AttachRequest, DirectorConfig, Event, PresentationEvent, RuntimeError, SessionMode,
    StateEvent, Topic,
};
use tokio::time::Instant;

use common::*;

#[tokio::test(start_paused = true)]
async fn fresh_session_submits_exactly_one_create_session() {
    let ledger = ledger_with(settings(0, 0, 10));
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();

    let mode = handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    assert_eq!(mode, SessionMode::Fresh);

    director_settles().await;
    assert_eq!(
        ledger.submitted(),
        vec![vec![Call::CreateSession {
            session: SESSION,
            request_randomness: true,
        }]]
    );
    let snapshot = handle.query_state().await.unwrap();
    assert_eq!(snapshot.state.events_processed, 0);
    assert_eq!(snapshot.mode, SessionMode::Fresh);

    ledger.push_live(SESSION, &[adventurer(1, 100)]);
    let snapshot = wait_until(&handle, |s| s.state.events_processed == 1).await;
    assert_eq!(snapshot.mode, SessionMode::Live);
    assert_eq!(ledger.submitted().len(), 1);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn create_session_randomness_flag_follows_settings() {
    for (fixed_seed, starting_xp, expected) in [(0, 0, false), (42, 10, false), (0, 3, true)] {
        let ledger = ledger_with(settings(fixed_seed, 0, starting_xp));
        let director = start(&ledger, DirectorConfig::default()).await;

        director
            .handle()
            .attach(AttachRequest::play(SESSION, SETTINGS_ID))
            .await
            .unwrap();
        director.shutdown().await.unwrap();

        assert_eq!(
            ledger.submitted(),
            vec![vec![Call::CreateSession {
                session: SESSION,
                request_randomness: expected,
            }]],
            "fixed_seed={fixed_seed} starting_xp={starting_xp}"
        );
    }
}

#[tokio::test(start_paused = true)]
async fn resume_replays_history_without_effects() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(
        SESSION,
        &[
            level_up(3),
            adventurer(1, 100),
            discovery(2, DiscoveryKind::Loot, 9),
            adventurer(4, 0),
        ],
    );
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut presentation_rx = handle.subscribe(Topic::Presentation);
    let mut state_rx = handle.subscribe(Topic::State);

    let mode = handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    assert_eq!(mode, SessionMode::Live);
    let snapshot = handle.query_state().await.unwrap();
    assert_eq!(snapshot.state.events_processed, 4);
    assert_eq!(snapshot.state.adventurer.map(|a| a.health), Some(0));
    assert_eq!(snapshot.state.explore_log.len(), 1);
    assert!(snapshot.new_inventory_items.is_empty());
    assert_eq!(snapshot.active_cue, None);
    assert!(buffered(&mut presentation_rx).is_empty());

    let modes: Vec<SessionMode> = buffered(&mut state_rx)
        .into_iter()
        .filter_map(|signal| match signal {
            Event::State(StateEvent::ModeChanged { to, .. }) => Some(to),
            Event::State(StateEvent::NarrativeAppended(_)) => {
                panic!("silent replay must not announce narrative")
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        modes,
        vec![
            SessionMode::Attaching,
            SessionMode::Resuming,
            SessionMode::Live
        ]
    );

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn reattach_replaces_the_subscription() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    ledger.fail_cancellations(true);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();

    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    let mode = handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    assert_eq!(mode, SessionMode::Live);
    assert_eq!(ledger.subscriptions(), 2);
    assert_eq!(ledger.cancellations(), 1);
    assert!(ledger.is_subscribed(SESSION));

    ledger.push_live(SESSION, &[obstacle(2)]);
    let snapshot = wait_until(&handle, |s| s.state.events_processed == 2).await;
    assert_eq!(snapshot.state.explore_log.len(), 1);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn transport_errors_surface_and_the_next_attach_retries() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    ledger.fail_next_subscribes(1);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();

    let failed = handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await;
    assert!(matches!(failed, Err(RuntimeError::Transport(_))));
    assert_eq!(handle.mode().await.unwrap(), SessionMode::Detached);

    let missing_settings = handle.attach(AttachRequest::play(SESSION, 404)).await;
    assert!(matches!(missing_settings, Err(RuntimeError::Transport(_))));

    let retried = handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    assert_eq!(retried, SessionMode::Live);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn unsubmitted_session_creation_detaches() {
    let ledger = ledger_with(settings(0, 0, 0)).with_submit_delay(Duration::from_secs(30));
    ledger.set_history(SESSION, &[adventurer(1, 100)]);
    let config = DirectorConfig {
        submission_buffer_size: 1,
        ..DirectorConfig::default()
    };
    let director = start(&ledger, config).await;
    let handle = director.handle();
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    let drop_item = || Intent::Drop { items: vec![3] };
    handle.execute_action(drop_item()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;
    handle.execute_action(drop_item()).await.unwrap();

    let fresh = SessionId(8);
    let failed = handle.attach(AttachRequest::play(fresh, SETTINGS_ID)).await;

    assert!(matches!(failed, Err(RuntimeError::SubmissionBacklogFull)));
    let snapshot = handle.query_state().await.unwrap();
    assert_eq!(snapshot.mode, SessionMode::Detached);
    assert_eq!(snapshot.session, None);
    assert!(!snapshot.live_feed_open);
    assert!(!ledger.is_subscribed(fresh));

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn spectating_a_living_subject_follows_live_events_into_the_replay_log() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 100), obstacle(2)]);
    ledger.set_adventurer(
        SESSION,
        Adventurer {
            health: 100,
            ..Adventurer::default()
        },
    );
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut state_rx = handle.subscribe(Topic::State);

    let mode = handle
        .attach(AttachRequest::spectate(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    assert_eq!(mode, SessionMode::Spectating);

    ledger.push_live(SESSION, &[discovery(3, DiscoveryKind::Loot, 12)]);
    let appended = next_matching(&mut state_rx, |signal| {
        matches!(signal, Event::State(StateEvent::ReplayAppended(_)))
    })
    .await;
    assert_eq!(
        appended,
        Event::State(StateEvent::ReplayAppended(discovery(
            3,
            DiscoveryKind::Loot,
            12
        )))
    );

    let snapshot = handle.query_state().await.unwrap();
    assert!(snapshot.state.explore_log.is_empty());
    assert_eq!(snapshot.state.replay_log.len(), 2);
    assert!(snapshot.new_inventory_items.is_empty());

    let rejected = handle
        .execute_action(Intent::Explore { till_beast: false })
        .await;
    assert!(matches!(
        rejected,
        Err(RuntimeError::IntentRejected {
            mode: SessionMode::Spectating,
            ..
        })
    ));
    assert!(ledger.submitted().is_empty());

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn dead_subject_is_replayed_with_replay_pacing() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(
        SESSION,
        &[
            adventurer(1, 0),
            discovery(2, DiscoveryKind::Gold, 5),
            defeated_beast(3),
            obstacle(4),
        ],
    );
    ledger.set_adventurer(SESSION, Adventurer::default());
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut state_rx = handle.subscribe(Topic::State);

    let mode = handle
        .attach(AttachRequest::spectate(SESSION, SETTINGS_ID))
        .await
        .unwrap();
    assert_eq!(mode, SessionMode::SpectatingReplay);

    applied(&mut state_rx, 2).await;
    let discovery_at = Instant::now();
    applied(&mut state_rx, 3).await;
    let defeated_at = Instant::now();
    applied(&mut state_rx, 4).await;
    let obstacle_at = Instant::now();

    assert_eq!(defeated_at - discovery_at, Duration::from_millis(2000));
    assert_eq!(obstacle_at - defeated_at, Duration::from_millis(1000));

    let snapshot = handle.query_state().await.unwrap();
    let replay = snapshot.replay.unwrap();
    assert!(replay.is_finished());
    assert_eq!(snapshot.state.replay_log.len(), 3);

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn spectating_a_session_without_events_is_a_replay() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_adventurer(
        SESSION,
        Adventurer {
            health: 100,
            ..Adventurer::default()
        },
    );
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();

    let mode = handle
        .attach(AttachRequest::spectate(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    assert_eq!(mode, SessionMode::SpectatingReplay);
    assert!(ledger.submitted().is_empty());

    director.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn death_is_not_cued_while_resuming_but_is_live() {
    let ledger = ledger_with(settings(0, 0, 0));
    ledger.set_history(SESSION, &[adventurer(1, 0)]);
    let director = start(&ledger, DirectorConfig::default()).await;
    let handle = director.handle();
    let mut presentation_rx = handle.subscribe(Topic::Presentation);
    handle
        .attach(AttachRequest::play(SESSION, SETTINGS_ID))
        .await
        .unwrap();

    ledger.push_live(SESSION, &[adventurer(2, 40), adventurer(3, 0)]);
    let cue = next_matching(&mut presentation_rx, |signal| {
        matches!(signal, Event::Presentation(PresentationEvent::ShowCue(_)))
    })
    .await;

    assert_eq!(
        cue,
        Event::Presentation(PresentationEvent::ShowCue(runtime::Cue::Death))
    );

    director.shutdown().await.unwrap();
}

async fn director_settles() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
