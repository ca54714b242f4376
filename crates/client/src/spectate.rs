//! Spectates a recorded session through the director.

use anyhow::{Context, Result};
use tokio::sync::broadcast::{self, error::RecvError};

use game_core::GameEvent;
use runtime::{
    AttachRequest, Cue, Director, DirectorConfig, DirectorHandle, Event, PresentationEvent,
    SessionMode, SessionSnapshot, StateEvent, Topic,
};

use crate::recording::RecordedLedger;

/// What the presentation saw while spectating.
#[derive(Debug, Clone)]
pub struct SpectateSummary {
    pub mode: SessionMode,
    pub events_processed: u64,
    pub narrative: Vec<GameEvent>,
    pub cues: Vec<Cue>,
}

/// Attaches to the recorded session as a spectator and presents it to the end.
///
/// Cues are completed as soon as they are shown.
pub async fn spectate(ledger: RecordedLedger, config: DirectorConfig) -> Result<SpectateSummary> {
    let session = ledger.session();
    let settings_id = ledger.settings_id();

    let director = Director::builder()
        .config(config)
        .ledger(ledger)
        .build()
        .await
        .context("Failed to build director")?;
    let handle = director.handle();
    let mut state_rx = handle.subscribe(Topic::State);
    let mut presentation_rx = handle.subscribe(Topic::Presentation);

    let mode = handle
        .attach(AttachRequest::spectate(session, settings_id))
        .await
        .with_context(|| format!("Failed to attach to session {session}"))?;
    tracing::info!(%session, %mode, "spectating recording");

    if mode == SessionMode::SpectatingReplay {
        handle.replay_play().await?;
    }

    let mut cues = Vec::new();
    let snapshot = loop {
        let snapshot = handle.query_state().await?;
        if is_presented(&snapshot) {
            break snapshot;
        }

        tokio::select! {
            signal = state_rx.recv() => {
                if !observe_state(signal) {
                    break handle.query_state().await?;
                }
            }
            signal = presentation_rx.recv() => {
                observe_presentation(&handle, signal, &mut cues).await?;
            }
        }
    };

    while let Ok(signal) = presentation_rx.try_recv() {
        observe_presentation(&handle, Ok(signal), &mut cues).await?;
    }

    director.shutdown().await?;

    tracing::info!(
        events = snapshot.state.events_processed,
        cues = cues.len(),
        "recording presented"
    );

    Ok(SpectateSummary {
        mode,
        events_processed: snapshot.state.events_processed,
        narrative: snapshot.state.replay_log,
        cues,
    })
}

fn is_presented(snapshot: &SessionSnapshot) -> bool {
    match &snapshot.replay {
        Some(replay) => replay.is_finished(),
        None => snapshot.pending_events == 0,
    }
}

/// Logs state signals; returns false once the bus is gone.
fn observe_state(signal: Result<Event, RecvError>) -> bool {
    match signal {
        Ok(Event::State(StateEvent::ReplayAppended(event))) => {
            tracing::info!(
                sequence = event.sequence,
                event_type = %event.event_type(),
                "narrative"
            );
            true
        }
        Ok(_) => true,
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "state signals lagged");
            true
        }
        Err(RecvError::Closed) => false,
    }
}

async fn observe_presentation(
    handle: &DirectorHandle,
    signal: Result<Event, broadcast::error::RecvError>,
    cues: &mut Vec<Cue>,
) -> Result<()> {
    match signal {
        Ok(Event::Presentation(PresentationEvent::ShowCue(cue))) => {
            tracing::info!(?cue, "cue");
            cues.push(cue);
            handle.complete_cue().await?;
        }
        Ok(Event::Presentation(PresentationEvent::BattleEvent(event))) => {
            tracing::debug!(sequence = event.sequence, "battle");
        }
        Ok(_) => {}
        Err(RecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "presentation signals lagged");
        }
        Err(RecvError::Closed) => {}
    }

    Ok(())
}
