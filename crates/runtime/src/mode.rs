//! Viewing mode of the attached session.
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::catalog::PacingMode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionMode {
    /// No session attached.
    #[default]
    Detached,
    /// Settings and history are being fetched.
    Attaching,
    /// No prior events; session creation was requested.
    Fresh,
    /// Prior events are being replayed silently.
    Resuming,
    /// Caught up with the player's own session.
    Live,
    /// Following another player's session.
    Spectating,
    /// Presenting the recorded log of a spectated session as a finite replay.
    SpectatingReplay,
}

impl SessionMode {
    pub fn is_spectating(self) -> bool {
        matches!(self, SessionMode::Spectating | SessionMode::SpectatingReplay)
    }

    /// Modes in which the player may act on the session.
    pub fn accepts_intents(self) -> bool {
        matches!(
            self,
            SessionMode::Fresh | SessionMode::Resuming | SessionMode::Live
        )
    }

    pub fn pacing(self) -> PacingMode {
        if self.is_spectating() {
            PacingMode::Replay
        } else {
            PacingMode::Live
        }
    }
}
