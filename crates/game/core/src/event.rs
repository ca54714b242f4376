//! Typed ledger events.
//!
//! The ledger appends one [`GameEvent`] per observable outcome of an action.
//! Snapshot variants (`Adventurer`, `Bag`, `Beast`, `MarketItems`) replace
//! local state wholesale; the remaining variants are narrative entries or
//! combat ticks that only feed logs and presentation.
//!
//! With the `serde` feature, a `GameEvent` decodes directly from the ledger's
//! JSON model:
//!
//! ```json
//! { "adventurer_id": 7, "action_count": 3, "details": { "discovery": { "kind": "gold", "amount": 12 } } }
//! ```

use strum::{AsRefStr, EnumIter, EnumString};

use crate::state::{Adventurer, Beast, Item, ItemId, ItemPurchase, SessionId, Stats};

/// Per-session ordinal assigned by the ledger (`action_count`).
pub type SequenceNumber = u32;

/// One event from a session's append-only log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameEvent {
    #[cfg_attr(feature = "serde", serde(rename = "adventurer_id"))]
    pub session: SessionId,
    #[cfg_attr(feature = "serde", serde(rename = "action_count"))]
    pub sequence: SequenceNumber,
    pub details: EventDetails,
}

impl GameEvent {
    pub fn new(session: SessionId, sequence: SequenceNumber, details: EventDetails) -> Self {
        Self {
            session,
            sequence,
            details,
        }
    }

    pub fn event_type(&self) -> EventType {
        self.details.event_type()
    }
}

/// Variant-specific payload of a [`GameEvent`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EventDetails {
    Adventurer(Adventurer),
    Bag(Vec<Item>),
    Beast(Beast),
    MarketItems(Vec<ItemId>),
    Discovery(Discovery),
    Obstacle(Obstacle),
    DefeatedBeast(BeastDefeated),
    FledBeast(BeastFled),
    StatUpgrade(StatUpgrade),
    BuyItems(ItemsBought),
    LevelUp(LevelUp),
    Equip(Vec<ItemId>),
    Drop(Vec<ItemId>),
    Attack(Strike),
    BeastAttack(Strike),
    Flee(Flee),
}

impl EventDetails {
    pub fn event_type(&self) -> EventType {
        match self {
            EventDetails::Adventurer(_) => EventType::Adventurer,
            EventDetails::Bag(_) => EventType::Bag,
            EventDetails::Beast(_) => EventType::Beast,
            EventDetails::MarketItems(_) => EventType::MarketItems,
            EventDetails::Discovery(_) => EventType::Discovery,
            EventDetails::Obstacle(_) => EventType::Obstacle,
            EventDetails::DefeatedBeast(_) => EventType::DefeatedBeast,
            EventDetails::FledBeast(_) => EventType::FledBeast,
            EventDetails::StatUpgrade(_) => EventType::StatUpgrade,
            EventDetails::BuyItems(_) => EventType::BuyItems,
            EventDetails::LevelUp(_) => EventType::LevelUp,
            EventDetails::Equip(_) => EventType::Equip,
            EventDetails::Drop(_) => EventType::Drop,
            EventDetails::Attack(_) => EventType::Attack,
            EventDetails::BeastAttack(_) => EventType::BeastAttack,
            EventDetails::Flee(_) => EventType::Flee,
        }
    }
}

/// Payload-free discriminant of [`EventDetails`].
///
/// Used as the key of pacing tables and routing sets, so it round-trips
/// through its snake_case name (`"beast_attack"`).
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    AsRefStr,
    strum::Display,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    Adventurer,
    Bag,
    Beast,
    MarketItems,
    Discovery,
    Obstacle,
    DefeatedBeast,
    FledBeast,
    StatUpgrade,
    BuyItems,
    LevelUp,
    Equip,
    Drop,
    Attack,
    BeastAttack,
    Flee,
}

/// What an exploration step turned up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiscoveryKind {
    Gold,
    Health,
    /// `amount` is the id of the item found.
    Loot,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Discovery {
    pub kind: DiscoveryKind,
    pub amount: u16,
}

impl Discovery {
    /// Item id for loot discoveries.
    pub fn loot(&self) -> Option<ItemId> {
        match self.kind {
            DiscoveryKind::Loot => ItemId::try_from(self.amount).ok(),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Obstacle {
    pub id: u8,
    pub dodged: bool,
    pub damage: u16,
    pub location: u8,
    pub critical_hit: bool,
    pub xp_reward: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BeastDefeated {
    pub beast_id: u8,
    pub gold_reward: u16,
    pub xp_reward: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BeastFled {
    pub beast_id: u8,
    pub xp_reward: u16,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatUpgrade {
    pub stats: Stats,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemsBought {
    pub potions: u8,
    pub items_purchased: Vec<ItemPurchase>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelUp {
    pub level: u8,
}

/// One blow in a fight, dealt by the adventurer or by the beast.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Strike {
    pub damage: u16,
    pub location: u8,
    pub critical_hit: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flee {
    pub success: bool,
}
