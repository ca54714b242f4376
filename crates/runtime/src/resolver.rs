//! Attach-time resolution of a session's viewing mode.
//!
//! On attach the resolver fetches the session settings, subscribes to the
//! event log, and decides from the history (and, when spectating, from the
//! subject's current snapshot) how the director should proceed.
use std::sync::Arc;

use client_blockchain_core::{GameLedger, LiveFeed, Settings};
use game_core::{Adventurer, GameEvent, SessionId};

use crate::api::Result;
use crate::catalog::EventTypeCatalog;
use crate::mode::SessionMode;

/// What the caller wants to attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachRequest {
    pub session: SessionId,
    pub settings_id: u32,
    /// Watch another player's session instead of playing one's own.
    pub spectate: bool,
}

impl AttachRequest {
    pub fn play(session: SessionId, settings_id: u32) -> Self {
        Self {
            session,
            settings_id,
            spectate: false,
        }
    }

    pub fn spectate(session: SessionId, settings_id: u32) -> Self {
        Self {
            session,
            settings_id,
            spectate: true,
        }
    }
}

/// Whether outcome-dependent calls need a preceding randomness request.
///
/// Once required, stays required for the rest of the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomnessGate {
    vrf_enabled: bool,
    seed_until_xp: u16,
    required: bool,
}

impl RandomnessGate {
    pub fn new(vrf_enabled: bool, settings: &Settings) -> Self {
        Self {
            vrf_enabled,
            seed_until_xp: settings.seed_until_xp,
            required: vrf_enabled && settings.fixed_seed == 0,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Re-evaluates the gate against a new adventurer snapshot.
    ///
    /// Returns true if this snapshot switched the gate on.
    pub fn observe(&mut self, adventurer: &Adventurer) -> bool {
        if self.required || !self.vrf_enabled || self.seed_until_xp == 0 {
            return false;
        }

        self.required = adventurer.xp >= self.seed_until_xp;
        self.required
    }
}

/// Outcome of resolving an attach request.
#[derive(Debug)]
pub struct Resolution {
    pub mode: SessionMode,
    pub settings: Settings,
    /// Historical events of the session, ascending by sequence.
    pub history: Vec<GameEvent>,
    pub live: LiveFeed,
    pub gate: RandomnessGate,
    /// Value of the create-session randomness flag; meaningful for `Fresh`.
    pub create_with_randomness: bool,
}

pub struct SessionResolver {
    ledger: Arc<dyn GameLedger>,
    catalog: Arc<EventTypeCatalog>,
    vrf_enabled: bool,
}

impl SessionResolver {
    pub fn new(
        ledger: Arc<dyn GameLedger>,
        catalog: Arc<EventTypeCatalog>,
        vrf_enabled: bool,
    ) -> Self {
        Self {
            ledger,
            catalog,
            vrf_enabled,
        }
    }

    /// Resolves `request` into a mode, a sorted history and a live feed.
    ///
    /// Callers must cancel any previously held feed before calling this.
    pub async fn resolve(&self, request: AttachRequest) -> Result<Resolution> {
        let settings = self.ledger.get_settings(request.settings_id).await?;
        let subscription = self.ledger.subscribe(request.session).await?;

        let mut history: Vec<GameEvent> = self
            .catalog
            .classify_all(&subscription.historical)
            .into_iter()
            .filter(|event| event.session == request.session)
            .collect();
        history.sort_by_key(|event| event.sequence);
        history.dedup_by_key(|event| event.sequence);

        let mode = if request.spectate {
            let subject = match self.ledger.get_adventurer(request.session).await {
                Ok(subject) => subject,
                Err(error) => {
                    cancel_quietly(&subscription.live, request.session);
                    return Err(error.into());
                }
            };

            match subject {
                Some(adventurer) if adventurer.is_alive() && !history.is_empty() => {
                    SessionMode::Spectating
                }
                _ => SessionMode::SpectatingReplay,
            }
        } else if history.is_empty() {
            SessionMode::Fresh
        } else {
            SessionMode::Resuming
        };

        tracing::info!(
            target: "runtime::resolver",
            session = %request.session,
            %mode,
            history = history.len(),
            "resolved attach"
        );

        Ok(Resolution {
            mode,
            gate: RandomnessGate::new(self.vrf_enabled, &settings),
            create_with_randomness: settings.fixed_seed == 0
                && settings.starting_adventurer_xp != 0,
            settings,
            history,
            live: subscription.live,
        })
    }
}

/// Cancels `feed`, logging instead of failing.
pub(crate) fn cancel_quietly(feed: &LiveFeed, session: SessionId) {
    if let Err(error) = feed.cancel() {
        tracing::warn!(
            target: "runtime::resolver",
            %session,
            %error,
            "ignoring subscription cancel failure"
        );
    }
}
