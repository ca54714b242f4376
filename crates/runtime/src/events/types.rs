//! Signal types for different topics.

use serde::{Deserialize, Serialize};

use game_core::{EventType, GameEvent, IntentKind, ItemId, SequenceNumber, SessionId};

use crate::cues::Cue;
use crate::mode::SessionMode;

/// Changes to the mirrored session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StateEvent {
    ModeChanged {
        session: Option<SessionId>,
        from: SessionMode,
        to: SessionMode,
    },
    /// An event was folded into the state.
    StateChanged {
        sequence: SequenceNumber,
        event_type: EventType,
    },
    /// Narrative appended to the player's explore log.
    NarrativeAppended(GameEvent),
    /// Narrative appended to the spectator's replay log.
    ReplayAppended(GameEvent),
    /// Loot accumulated since the presentation last took it.
    NewInventoryItems(Vec<ItemId>),
}

/// Instructions for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresentationEvent {
    ShowCue(Cue),
    Overlay { visible: bool },
    ShowInventory { visible: bool },
    BattleEvent(GameEvent),
}

/// What triggered a submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOrigin {
    /// Automatic session creation on a fresh attach.
    CreateSession,
    Intent(IntentKind),
}

/// Outcomes of batch submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionEvent {
    BatchSubmitted {
        origin: BatchOrigin,
        call_count: usize,
    },
    /// A batch failed; the counter never decreases.
    FailureCountChanged {
        origin: BatchOrigin,
        count: u64,
        error: String,
    },
}
