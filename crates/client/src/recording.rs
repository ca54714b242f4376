//! Ledger backed by a recorded session.
//!
//! A recording is a JSON document holding everything the director reads from
//! a ledger for one session: its settings, the subject's adventurer snapshot,
//! and the raw event records in delivery order.

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use client_blockchain_core::{
    AdventurerReader, BatchReceipt, Call, CallSubmitter, EventSource, GameLedger, LiveFeed,
    RawRecord, Settings, SettingsProvider, SubmitError, Subscription, SubscriptionHandle,
    TransportError,
};
use game_core::{Adventurer, SessionId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub session: SessionId,
    pub settings: Settings,
    /// Adventurer as last read from the ledger; absent for unknown subjects.
    #[serde(default)]
    pub adventurer: Option<Adventurer>,
    #[serde(default)]
    pub records: Vec<RawRecord>,
}

impl Recording {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read recording: {}", path.display()))?;

        serde_json::from_str(&source)
            .with_context(|| format!("Failed to parse recording: {}", path.display()))
    }
}

/// Read-only ledger replaying one [`Recording`].
///
/// The live feed closes right away: nothing happens after the recording ends.
#[derive(Debug, Clone)]
pub struct RecordedLedger {
    recording: Recording,
}

impl RecordedLedger {
    pub fn new(recording: Recording) -> Self {
        Self { recording }
    }

    pub fn session(&self) -> SessionId {
        self.recording.session
    }

    pub fn settings_id(&self) -> u32 {
        self.recording.settings.settings_id
    }
}

struct ClosedFeed;

impl SubscriptionHandle for ClosedFeed {
    fn cancel(&self) -> Result<(), TransportError> {
        Ok(())
    }
}

#[async_trait]
impl EventSource for RecordedLedger {
    async fn subscribe(&self, session: SessionId) -> Result<Subscription, TransportError> {
        if session != self.recording.session {
            return Err(TransportError::BackendError(format!(
                "no recording for session {session}"
            )));
        }

        let (_tx, rx) = mpsc::unbounded_channel();
        Ok(Subscription {
            historical: self.recording.records.clone(),
            live: LiveFeed::new(rx, Box::new(ClosedFeed)),
        })
    }
}

#[async_trait]
impl CallSubmitter for RecordedLedger {
    async fn submit_batch(&self, calls: Vec<Call>) -> Result<BatchReceipt, SubmitError> {
        Err(SubmitError::Rejected(format!(
            "recorded ledger is read-only ({} calls dropped)",
            calls.len()
        )))
    }
}

#[async_trait]
impl SettingsProvider for RecordedLedger {
    async fn get_settings(&self, settings_id: u32) -> Result<Settings, TransportError> {
        if settings_id == self.recording.settings.settings_id {
            Ok(self.recording.settings.clone())
        } else {
            Err(TransportError::SettingsNotFound(settings_id))
        }
    }
}

#[async_trait]
impl AdventurerReader for RecordedLedger {
    async fn get_adventurer(
        &self,
        session: SessionId,
    ) -> Result<Option<Adventurer>, TransportError> {
        if session == self.recording.session {
            Ok(self.recording.adventurer.clone())
        } else {
            Ok(None)
        }
    }
}

impl GameLedger for RecordedLedger {
    fn name(&self) -> &str {
        "RecordedLedger"
    }

    fn network(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use game_core::{EventDetails, GameEvent, Obstacle};

    use super::*;

    fn recording() -> Recording {
        let event = GameEvent::new(SessionId(3), 1, EventDetails::Obstacle(Obstacle::default()));
        Recording {
            session: SessionId(3),
            settings: Settings {
                settings_id: 8,
                ..Settings::default()
            },
            adventurer: None,
            records: vec![RawRecord::from_event(&event).unwrap()],
        }
    }

    #[test]
    fn load_reads_a_json_recording() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&recording()).unwrap().as_bytes())
            .unwrap();

        assert_eq!(Recording::load(file.path()).unwrap(), recording());
    }

    #[test]
    fn load_reports_the_failing_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let error = Recording::load(file.path()).unwrap_err();
        assert!(error.to_string().contains("Failed to parse recording"));
    }

    #[tokio::test]
    async fn recorded_ledger_serves_only_its_session() {
        let ledger = RecordedLedger::new(recording());

        let mut subscription = ledger.subscribe(SessionId(3)).await.unwrap();
        assert_eq!(subscription.historical.len(), 1);
        assert!(subscription.live.batches.recv().await.is_none());

        assert!(ledger.subscribe(SessionId(4)).await.is_err());
        assert!(matches!(
            ledger.get_settings(9).await,
            Err(TransportError::SettingsNotFound(9))
        ));
        assert!(ledger.submit_batch(vec![Call::RequestRandomness]).await.is_err());
    }
}
