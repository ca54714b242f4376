//! Mock ledger for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use game_core::{Adventurer, GameEvent, SessionId};

use crate::traits::{
    AdventurerReader, CallSubmitter, EventSource, GameLedger, LiveFeed, SettingsProvider,
    SubmitError, Subscription, SubscriptionHandle, TransportError,
};
use crate::types::{BatchReceipt, Call, RawRecord, Settings, TransactionId};

#[derive(Default)]
struct Inner {
    settings: HashMap<u32, Settings>,
    history: HashMap<SessionId, Vec<RawRecord>>,
    adventurers: HashMap<SessionId, Adventurer>,
    live: HashMap<SessionId, mpsc::UnboundedSender<Vec<RawRecord>>>,
    submitted: Vec<Vec<Call>>,
    failures: VecDeque<bool>,
    subscribe_failures: usize,
    fail_cancel: bool,
    subscriptions: usize,
    cancellations: usize,
    transaction_counter: u64,
}

/// Mock ledger for testing without network.
///
/// Holds scripted history per session, forwards injected live batches to the
/// current subscriber, and records every submitted batch.
#[derive(Clone, Default)]
pub struct MockLedger {
    inner: Arc<Mutex<Inner>>,
    submit_delay: Option<Duration>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every submission by `delay` before resolving it.
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert_settings(&self, settings: Settings) {
        self.lock().settings.insert(settings.settings_id, settings);
    }

    /// Replace the historical log of `session` with `events`, kept in the given order.
    pub fn set_history(&self, session: SessionId, events: &[GameEvent]) {
        self.set_history_records(session, to_records(events));
    }

    pub fn set_history_records(&self, session: SessionId, records: Vec<RawRecord>) {
        self.lock().history.insert(session, records);
    }

    pub fn set_adventurer(&self, session: SessionId, adventurer: Adventurer) {
        self.lock().adventurers.insert(session, adventurer);
    }

    /// Deliver `events` to the live subscriber of `session`.
    ///
    /// Returns false when nobody is subscribed.
    pub fn push_live(&self, session: SessionId, events: &[GameEvent]) -> bool {
        self.push_live_records(session, to_records(events))
    }

    pub fn push_live_records(&self, session: SessionId, records: Vec<RawRecord>) -> bool {
        self.lock()
            .live
            .get(&session)
            .is_some_and(|tx| tx.send(records).is_ok())
    }

    /// Script outcomes of upcoming submissions, in order (`true` = fail).
    pub fn script_submissions(&self, outcomes: &[bool]) {
        self.lock().failures.extend(outcomes.iter().copied());
    }

    /// Fail the next `count` subscribe calls with a network error.
    pub fn fail_next_subscribes(&self, count: usize) {
        self.lock().subscribe_failures = count;
    }

    /// Make every cancel call report an error (the feed still closes).
    pub fn fail_cancellations(&self, fail: bool) {
        self.lock().fail_cancel = fail;
    }

    /// Batches submitted so far, failed ones included.
    pub fn submitted(&self) -> Vec<Vec<Call>> {
        self.lock().submitted.clone()
    }

    pub fn subscriptions(&self) -> usize {
        self.lock().subscriptions
    }

    pub fn cancellations(&self) -> usize {
        self.lock().cancellations
    }

    pub fn is_subscribed(&self, session: SessionId) -> bool {
        self.lock().live.contains_key(&session)
    }
}

fn to_records(events: &[GameEvent]) -> Vec<RawRecord> {
    events
        .iter()
        .filter_map(|event| RawRecord::from_event(event).ok())
        .collect()
}

struct MockSubscriptionHandle {
    inner: Arc<Mutex<Inner>>,
    session: SessionId,
}

impl SubscriptionHandle for MockSubscriptionHandle {
    fn cancel(&self) -> Result<(), TransportError> {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.cancellations += 1;
        inner.live.remove(&self.session);

        if inner.fail_cancel {
            return Err(TransportError::SubscriptionClosed(self.session));
        }
        Ok(())
    }
}

#[async_trait]
impl EventSource for MockLedger {
    async fn subscribe(&self, session: SessionId) -> Result<Subscription, TransportError> {
        let mut inner = self.lock();

        if inner.subscribe_failures > 0 {
            inner.subscribe_failures -= 1;
            return Err(TransportError::NetworkError("mock subscribe failure".into()));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        inner.live.insert(session, tx);
        inner.subscriptions += 1;

        let historical = inner.history.get(&session).cloned().unwrap_or_default();
        let handle = MockSubscriptionHandle {
            inner: Arc::clone(&self.inner),
            session,
        };

        Ok(Subscription {
            historical,
            live: LiveFeed::new(rx, Box::new(handle)),
        })
    }
}

#[async_trait]
impl CallSubmitter for MockLedger {
    async fn submit_batch(&self, calls: Vec<Call>) -> Result<BatchReceipt, SubmitError> {
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.lock();
        let call_count = calls.len();
        inner.submitted.push(calls);

        if inner.failures.pop_front().unwrap_or(false) {
            return Err(SubmitError::Reverted {
                reason: "mock revert".into(),
            });
        }

        inner.transaction_counter += 1;
        Ok(BatchReceipt {
            transaction_id: TransactionId::from_bytes(
                inner.transaction_counter.to_le_bytes().to_vec(),
            ),
            call_count,
        })
    }
}

#[async_trait]
impl SettingsProvider for MockLedger {
    async fn get_settings(&self, settings_id: u32) -> Result<Settings, TransportError> {
        self.lock()
            .settings
            .get(&settings_id)
            .cloned()
            .ok_or(TransportError::SettingsNotFound(settings_id))
    }
}

#[async_trait]
impl AdventurerReader for MockLedger {
    async fn get_adventurer(
        &self,
        session: SessionId,
    ) -> Result<Option<Adventurer>, TransportError> {
        Ok(self.lock().adventurers.get(&session).cloned())
    }
}

impl GameLedger for MockLedger {
    fn name(&self) -> &str {
        "MockLedger"
    }

    fn network(&self) -> &str {
        "mock-network"
    }
}
