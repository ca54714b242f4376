//! Director worker that owns the authoritative [`SessionState`].
//!
//! Receives commands from [`DirectorHandle`](crate::DirectorHandle), drains
//! live batches from the subscription into the ordered queue, and applies
//! queued events one at a time. Pacing is a deadline before the next drain,
//! so commands stay responsive while the presentation lingers on an event.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use client_blockchain_core::{LiveFeed, RawRecord};
use game_core::{EventDetails, Equipment, GameEvent, Intent, ItemId, SessionId, SessionState};

use crate::api::{Result, RuntimeError, SessionSnapshot};
use crate::composer::{ActionBatch, ActionComposer, ComposeContext};
use crate::cues::{Cue, Presentation};
use crate::events::{EventBus, StateEvent};
use crate::mode::SessionMode;
use crate::processor::{EventProcessor, ProcessOptions, Routing};
use crate::queue::EventQueue;
use crate::replay::{Replay, ReplayControl, ReplayStatus};
use crate::resolver::{AttachRequest, RandomnessGate, SessionResolver, cancel_quietly};

/// Commands that can be sent to the director worker
pub enum Command {
    /// Replace the current session (if any) with `request`.
    Attach {
        request: AttachRequest,
        reply: oneshot::Sender<Result<SessionMode>>,
    },
    /// Drop the current session and cancel its subscription.
    Detach { reply: oneshot::Sender<()> },
    /// Compose an intent and queue it for submission.
    ExecuteAction {
        intent: Intent,
        reply: oneshot::Sender<Result<ActionBatch>>,
    },
    /// Replace the locally arranged loadout.
    SetLoadout {
        equipment: Equipment,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Finish (or skip) the active cue; replies with the next active cue.
    CompleteCue { reply: oneshot::Sender<Option<Cue>> },
    TakeNewInventoryItems { reply: oneshot::Sender<Vec<ItemId>> },
    /// Clear the new-market flag once the market was shown.
    AcknowledgeMarket { reply: oneshot::Sender<()> },
    /// Query a read-only snapshot of the session.
    QueryState {
        reply: oneshot::Sender<SessionSnapshot>,
    },
    Replay {
        control: ReplayControl,
        reply: oneshot::Sender<Result<ReplayStatus>>,
    },
    Shutdown { reply: oneshot::Sender<()> },
}

/// Background task that owns one session at a time.
pub struct DirectorWorker {
    resolver: SessionResolver,
    processor: EventProcessor,
    composer: ActionComposer,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    replay_autoplay: bool,

    session: Option<SessionId>,
    mode: SessionMode,
    state: SessionState,
    queue: EventQueue,
    presentation: Presentation,
    gate: RandomnessGate,
    /// Loadout arranged locally; `None` means the confirmed equipment.
    loadout: Option<Equipment>,
    live: Option<LiveFeed>,
    replay: Option<Replay>,
    next_drain: Instant,
}

impl DirectorWorker {
    pub fn new(
        resolver: SessionResolver,
        processor: EventProcessor,
        composer: ActionComposer,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        replay_autoplay: bool,
    ) -> Self {
        Self {
            resolver,
            processor,
            composer,
            command_rx,
            event_bus,
            replay_autoplay,
            session: None,
            mode: SessionMode::Detached,
            state: SessionState::new(),
            queue: EventQueue::new(),
            presentation: Presentation::new(),
            gate: RandomnessGate::default(),
            loadout: None,
            live: None,
            replay: None,
            next_drain: Instant::now(),
        }
    }

    /// Main worker loop.
    pub async fn run(mut self) {
        loop {
            let ready = self.has_pending_work();
            let deadline = self.next_drain;

            tokio::select! {
                biased;

                command = self.command_rx.recv() => match command {
                    Some(command) => {
                        if self.handle_command(command).await.is_break() {
                            break;
                        }
                    }
                    None => break,
                },
                batch = next_batch(&mut self.live) => self.handle_live_batch(batch),
                () = time::sleep_until(deadline), if ready => self.drain_one(),
            }
        }

        self.end_session();
        debug!(target: "runtime::director", "director worker stopped");
    }

    async fn handle_command(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Attach { request, reply } => {
                let result = self.handle_attach(request).await;
                if reply.send(result).is_err() {
                    debug!("Attach reply channel closed (caller dropped)");
                }
            }
            Command::Detach { reply } => {
                self.end_session();
                self.set_mode(SessionMode::Detached);
                if reply.send(()).is_err() {
                    debug!("Detach reply channel closed (caller dropped)");
                }
            }
            Command::ExecuteAction { intent, reply } => {
                let result = self.handle_execute_action(intent);
                if reply.send(result).is_err() {
                    debug!("ExecuteAction reply channel closed (caller dropped)");
                }
            }
            Command::SetLoadout { equipment, reply } => {
                let result = self.handle_set_loadout(equipment);
                if reply.send(result).is_err() {
                    debug!("SetLoadout reply channel closed (caller dropped)");
                }
            }
            Command::CompleteCue { reply } => {
                let signals = self.presentation.cues.complete();
                self.event_bus
                    .publish_all(signals.into_iter().map(Into::into));
                if reply.send(self.presentation.cues.active()).is_err() {
                    debug!("CompleteCue reply channel closed (caller dropped)");
                }
            }
            Command::TakeNewInventoryItems { reply } => {
                let items = self.presentation.take_new_inventory_items();
                if reply.send(items).is_err() {
                    debug!("TakeNewInventoryItems reply channel closed (caller dropped)");
                }
            }
            Command::AcknowledgeMarket { reply } => {
                self.state.new_market = false;
                if reply.send(()).is_err() {
                    debug!("AcknowledgeMarket reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.snapshot()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::Replay { control, reply } => {
                let result = self.handle_replay(control);
                if reply.send(result).is_err() {
                    debug!("Replay reply channel closed (caller dropped)");
                }
            }
            Command::Shutdown { reply } => {
                self.end_session();
                self.set_mode(SessionMode::Detached);
                if reply.send(()).is_err() {
                    debug!("Shutdown reply channel closed (caller dropped)");
                }
                return ControlFlow::Break(());
            }
        }

        ControlFlow::Continue(())
    }

    /// Tears down the current session, resolves `request`, and seeds the new
    /// session according to the resolved mode.
    async fn handle_attach(&mut self, request: AttachRequest) -> Result<SessionMode> {
        self.end_session();
        self.session = Some(request.session);
        self.set_mode(SessionMode::Attaching);

        let resolution = match self.resolver.resolve(request).await {
            Ok(resolution) => resolution,
            Err(error) => {
                warn!(
                    target: "runtime::director",
                    session = %request.session,
                    %error,
                    "attach failed"
                );
                self.session = None;
                self.set_mode(SessionMode::Detached);
                return Err(error);
            }
        };

        self.gate = resolution.gate;
        self.live = Some(resolution.live);
        self.next_drain = Instant::now();

        match resolution.mode {
            SessionMode::Fresh => {
                self.set_mode(SessionMode::Fresh);
                let create = ActionBatch::create_session(
                    request.session,
                    resolution.create_with_randomness,
                );
                if let Err(error) = self.composer.submit(create) {
                    warn!(
                        target: "runtime::director",
                        session = %request.session,
                        %error,
                        "session creation not submitted"
                    );
                    self.end_session();
                    self.set_mode(SessionMode::Detached);
                    return Err(error);
                }
            }
            SessionMode::Resuming => {
                self.set_mode(SessionMode::Resuming);
                self.apply_history(resolution.history);
                self.set_mode(SessionMode::Live);
            }
            SessionMode::Spectating => {
                self.set_mode(SessionMode::Spectating);
                self.apply_history(resolution.history);
            }
            SessionMode::SpectatingReplay => {
                self.replay = Some(Replay::new(resolution.history, self.replay_autoplay));
                self.set_mode(SessionMode::SpectatingReplay);
            }
            other => self.set_mode(other),
        }

        Ok(self.mode)
    }

    fn handle_execute_action(&mut self, intent: Intent) -> Result<ActionBatch> {
        let session = self.session.ok_or(RuntimeError::NotAttached)?;
        if !self.mode.accepts_intents() {
            return Err(RuntimeError::IntentRejected {
                intent: intent.kind(),
                mode: self.mode,
            });
        }

        let confirmed = self.state.confirmed_equipment();
        let ctx = ComposeContext {
            session,
            randomness_required: self.gate.is_required(),
            adventurer: self.state.adventurer.as_ref(),
            displayed: self.loadout.as_ref().unwrap_or(&confirmed),
        };

        self.composer.submit_intent(&intent, &ctx)
    }

    fn handle_set_loadout(&mut self, equipment: Equipment) -> Result<()> {
        if self.session.is_none() {
            return Err(RuntimeError::NotAttached);
        }
        if !self.mode.accepts_intents() {
            return Err(RuntimeError::LoadoutRejected { mode: self.mode });
        }

        self.loadout = Some(equipment);
        Ok(())
    }

    fn handle_replay(&mut self, control: ReplayControl) -> Result<ReplayStatus> {
        let mode = self.mode;
        let replay = self
            .replay
            .as_mut()
            .ok_or(RuntimeError::NoReplay { mode })?;

        match control {
            ReplayControl::Play => replay.play(),
            ReplayControl::Pause => replay.pause(),
            ReplayControl::Step => {
                replay.pause();
                if let Some(event) = replay.advance() {
                    let delay = self.apply_event(&event, false);
                    self.next_drain = Instant::now() + delay;
                }
            }
            ReplayControl::Seek(target) => {
                let prefix = replay.seek(target).to_vec();
                self.state = SessionState::new();
                let signals = self.presentation.clear();
                self.event_bus
                    .publish_all(signals.into_iter().map(Into::into));
                for event in &prefix {
                    self.apply_event(event, true);
                }
                self.next_drain = Instant::now();
            }
        }

        self.replay
            .as_ref()
            .map(Replay::status)
            .ok_or(RuntimeError::NoReplay { mode })
    }

    /// Routes one live batch into the queue (or the replay).
    fn handle_live_batch(&mut self, batch: Option<Vec<RawRecord>>) {
        let Some(records) = batch else {
            debug!(target: "runtime::director", "live feed closed");
            self.live = None;
            return;
        };
        let Some(session) = self.session else {
            return;
        };

        let (mut events, stale): (Vec<GameEvent>, Vec<GameEvent>) = self
            .processor
            .catalog()
            .classify_all(&records)
            .into_iter()
            .partition(|event| event.session == session);
        if !stale.is_empty() {
            debug!(
                target: "runtime::director",
                %session,
                discarded = stale.len(),
                "discarding events of another session"
            );
        }

        if self.mode == SessionMode::SpectatingReplay {
            events.sort_by_key(|event| event.sequence);
            if let Some(replay) = self.replay.as_mut() {
                replay.extend(events);
            }
            return;
        }

        let received = events.len();
        let accepted = self.queue.enqueue(events);
        debug!(
            target: "runtime::director",
            %session,
            received,
            accepted,
            pending = self.queue.len(),
            "live batch queued"
        );
    }

    fn has_pending_work(&self) -> bool {
        match self.mode {
            SessionMode::Detached | SessionMode::Attaching => false,
            SessionMode::SpectatingReplay => self.replay.as_ref().is_some_and(Replay::is_playing),
            _ => !self.queue.is_empty(),
        }
    }

    /// Applies the next due event and schedules the one after it.
    fn drain_one(&mut self) {
        let event = match self.mode {
            SessionMode::SpectatingReplay => self.replay.as_mut().and_then(Replay::advance),
            _ => self.queue.drain_next(),
        };
        let Some(event) = event else {
            return;
        };

        let delay = self.apply_event(&event, false);
        self.next_drain = Instant::now() + delay;

        if self.mode == SessionMode::SpectatingReplay
            && self.replay.as_ref().is_some_and(Replay::is_finished)
        {
            info!(target: "runtime::director", "replay finished");
        }
    }

    /// Silently applies a sorted historical log through the queue, leaving
    /// its watermark at the last historical sequence.
    fn apply_history(&mut self, history: Vec<GameEvent>) {
        let count = self.queue.enqueue(history);
        while let Some(event) = self.queue.drain_next() {
            self.apply_event(&event, true);
        }
        debug!(target: "runtime::director", count, "history applied");
    }

    fn apply_event(&mut self, event: &GameEvent, skip_effects: bool) -> Duration {
        let routing = if self.mode.is_spectating() {
            Routing::Replay
        } else {
            Routing::Explore
        };
        let options = if skip_effects {
            ProcessOptions::silent(routing)
        } else {
            ProcessOptions::live(routing, self.mode.pacing())
        };

        let processed = self
            .processor
            .process_one(&mut self.state, &mut self.presentation, event, options);
        if !processed.applied {
            return Duration::ZERO;
        }

        debug!(
            target: "runtime::director",
            sequence = event.sequence,
            event_type = %event.event_type(),
            skip_effects,
            "event applied"
        );

        if let EventDetails::Adventurer(adventurer) = &event.details {
            self.loadout = None;
            if self.gate.observe(adventurer) {
                info!(
                    target: "runtime::director",
                    xp = adventurer.xp,
                    "randomness requests now required"
                );
            }
        }

        self.event_bus.publish_all(processed.signals);

        if self.mode == SessionMode::Fresh {
            self.set_mode(SessionMode::Live);
        }

        processed.delay
    }

    fn set_mode(&mut self, to: SessionMode) {
        let from = self.mode;
        if from == to {
            return;
        }

        self.mode = to;
        info!(
            target: "runtime::director",
            session = ?self.session,
            %from,
            %to,
            "mode changed"
        );
        self.event_bus.publish(StateEvent::ModeChanged {
            session: self.session,
            from,
            to,
        });
    }

    /// Cancels the live feed (errors ignored) and drops everything pending.
    fn end_session(&mut self) {
        if let Some(feed) = self.live.take() {
            cancel_quietly(&feed, self.session.unwrap_or_default());
        }

        self.session = None;
        self.state = SessionState::new();
        self.queue.clear();
        let signals = self.presentation.clear();
        self.event_bus
            .publish_all(signals.into_iter().map(Into::into));
        self.gate = RandomnessGate::default();
        self.loadout = None;
        self.replay = None;
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.session,
            mode: self.mode,
            state: self.state.clone(),
            loadout: self
                .loadout
                .clone()
                .unwrap_or_else(|| self.state.confirmed_equipment()),
            randomness_required: self.gate.is_required(),
            active_cue: self.presentation.cues.active(),
            pending_cues: self.presentation.cues.pending(),
            new_inventory_items: self.presentation.new_inventory_items.clone(),
            pending_events: self.queue.len(),
            replay: self.replay.as_ref().map(Replay::status),
            live_feed_open: self.live.is_some(),
        }
    }
}

async fn next_batch(live: &mut Option<LiveFeed>) -> Option<Vec<RawRecord>> {
    match live {
        Some(feed) => feed.batches.recv().await,
        None => std::future::pending().await,
    }
}
