//! Common types for ledger interactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use game_core::{GameEvent, ItemId, ItemPurchase, SessionId, Stats};

/// Model name under which the ledger stores session events.
pub const GAME_EVENT_MODEL: &str = "GameEvent";

/// One entity as delivered by the ledger indexer.
///
/// An entity bundles any number of named models. Only entities carrying a
/// [`GAME_EVENT_MODEL`] are session events; everything else shares the same
/// subscription but is irrelevant to the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub entity_id: String,
    #[serde(default)]
    pub models: BTreeMap<String, serde_json::Value>,
}

impl RawRecord {
    /// Returns the model named `name`, if present.
    pub fn model(&self, name: &str) -> Option<&serde_json::Value> {
        self.models.get(name)
    }

    /// Wraps a typed event in the ledger's record shape.
    pub fn from_event(event: &GameEvent) -> Result<Self, serde_json::Error> {
        let value = serde_json::to_value(event)?;
        let mut models = BTreeMap::new();
        models.insert(GAME_EVENT_MODEL.to_string(), value);

        Ok(Self {
            entity_id: format!("{}:{}", event.session.0, event.sequence),
            models,
        })
    }
}

/// Session settings stored on the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub settings_id: u32,
    /// Nonzero when every outcome derives from a fixed seed.
    pub fixed_seed: u64,
    /// Xp at which a fixed-seed session switches to requested randomness; zero disables the switch.
    pub seed_until_xp: u16,
    pub starting_adventurer_xp: u16,
}

/// Descriptor of one ledger call.
///
/// Descriptors are opaque to the runtime: it only orders them into batches.
/// Translating them into real transactions is the submitter's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    RequestRandomness,
    CreateSession {
        session: SessionId,
        request_randomness: bool,
    },
    Explore {
        session: SessionId,
        till_beast: bool,
    },
    Attack {
        session: SessionId,
        to_the_death: bool,
    },
    Flee {
        session: SessionId,
        to_the_death: bool,
    },
    BuyItems {
        session: SessionId,
        potions: u8,
        purchases: Vec<ItemPurchase>,
    },
    SelectStatUpgrades {
        session: SessionId,
        stats: Stats,
    },
    Equip {
        session: SessionId,
        items: Vec<ItemId>,
    },
    Drop {
        session: SessionId,
        items: Vec<ItemId>,
    },
}

impl Call {
    /// Snake-case name of the ledger entrypoint.
    pub fn name(&self) -> &'static str {
        match self {
            Call::RequestRandomness => "request_randomness",
            Call::CreateSession { .. } => "create_session",
            Call::Explore { .. } => "explore",
            Call::Attack { .. } => "attack",
            Call::Flee { .. } => "flee",
            Call::BuyItems { .. } => "buy_items",
            Call::SelectStatUpgrades { .. } => "select_stat_upgrades",
            Call::Equip { .. } => "equip",
            Call::Drop { .. } => "drop",
        }
    }
}

/// Generic transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub Vec<u8>);

impl TransactionId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Confirmation of an accepted batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReceipt {
    pub transaction_id: TransactionId,
    pub call_count: usize,
}
