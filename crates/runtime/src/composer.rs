//! Turns player intents into ordered batches of ledger calls.
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use client_blockchain_core::Call;
use game_core::{Adventurer, Equipment, Intent, ItemId, SessionId};

use crate::api::{Result, RuntimeError};
use crate::events::BatchOrigin;

/// Calls submitted together; either all land, in order, or none does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionBatch {
    pub origin: BatchOrigin,
    pub calls: Vec<Call>,
}

impl ActionBatch {
    pub fn create_session(session: SessionId, request_randomness: bool) -> Self {
        Self {
            origin: BatchOrigin::CreateSession,
            calls: vec![Call::CreateSession {
                session,
                request_randomness,
            }],
        }
    }
}

/// Read-only view of the state an intent is composed against.
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub session: SessionId,
    pub randomness_required: bool,
    /// Last snapshot confirmed by the ledger.
    pub adventurer: Option<&'a Adventurer>,
    /// Loadout as currently arranged by the player.
    pub displayed: &'a Equipment,
}

impl ComposeContext<'_> {
    fn in_battle(&self) -> bool {
        self.adventurer.is_some_and(Adventurer::in_battle)
    }

    fn newly_equipped(&self) -> Vec<ItemId> {
        let confirmed = self
            .adventurer
            .map(|adventurer| adventurer.equipment.clone())
            .unwrap_or_default();

        self.displayed
            .newly_equipped(&confirmed)
            .into_iter()
            .map(|item| item.id)
            .collect()
    }
}

/// Builds the batch for `intent`.
///
/// The batch is, in order: a randomness request when the gate requires one
/// for this intent, an implicit equip of locally changed slots (for every
/// intent but equip itself), and the primary call.
pub fn compose(intent: &Intent, ctx: &ComposeContext<'_>) -> ActionBatch {
    let kind = intent.kind();
    let session = ctx.session;
    let mut calls = Vec::with_capacity(3);

    let needs_randomness = ctx.randomness_required
        && (kind.is_randomized() || (matches!(intent, Intent::Equip) && ctx.in_battle()));
    if needs_randomness {
        calls.push(Call::RequestRandomness);
    }

    let newly_equipped = ctx.newly_equipped();
    if !matches!(intent, Intent::Equip) && !newly_equipped.is_empty() {
        calls.push(Call::Equip {
            session,
            items: newly_equipped.clone(),
        });
    }

    let primary = match intent {
        Intent::Explore { till_beast } => Call::Explore {
            session,
            till_beast: *till_beast,
        },
        Intent::Attack { to_the_death } => Call::Attack {
            session,
            to_the_death: *to_the_death,
        },
        Intent::Flee { to_the_death } => Call::Flee {
            session,
            to_the_death: *to_the_death,
        },
        Intent::BuyItems { potions, purchases } => Call::BuyItems {
            session,
            potions: *potions,
            purchases: purchases.clone(),
        },
        Intent::SelectStatUpgrades { stats } => Call::SelectStatUpgrades {
            session,
            stats: *stats,
        },
        Intent::Equip => Call::Equip {
            session,
            items: newly_equipped,
        },
        Intent::Drop { items } => Call::Drop {
            session,
            items: items.clone(),
        },
    };
    calls.push(primary);

    ActionBatch {
        origin: BatchOrigin::Intent(kind),
        calls,
    }
}

/// Hands composed batches to the submission worker.
///
/// Submission is fire-and-forget: outcomes arrive on the action topic. A full
/// backlog is reported to the caller instead of stalling the director.
#[derive(Debug, Clone)]
pub struct ActionComposer {
    submissions: mpsc::Sender<ActionBatch>,
}

impl ActionComposer {
    pub fn new(submissions: mpsc::Sender<ActionBatch>) -> Self {
        Self { submissions }
    }

    /// Composes `intent` and queues it for submission.
    pub fn submit_intent(
        &self,
        intent: &Intent,
        ctx: &ComposeContext<'_>,
    ) -> Result<ActionBatch> {
        let batch = compose(intent, ctx);
        self.submit(batch.clone())?;
        Ok(batch)
    }

    pub fn submit(&self, batch: ActionBatch) -> Result<()> {
        tracing::debug!(
            target: "runtime::composer",
            origin = ?batch.origin,
            calls = ?batch.calls.iter().map(Call::name).collect::<Vec<_>>(),
            "queueing batch"
        );

        self.submissions.try_send(batch).map_err(|error| match error {
            TrySendError::Full(_) => RuntimeError::SubmissionBacklogFull,
            TrySendError::Closed(_) => RuntimeError::SubmissionChannelClosed,
        })
    }
}
