//! Player intents.
//!
//! An [`Intent`] is what the player asked for. The runtime's action composer
//! turns it into the ordered batch of ledger calls that realises it.

use crate::state::{ItemId, ItemPurchase, Stats};

/// A player's request to act within their own session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Intent {
    Explore { till_beast: bool },
    Attack { to_the_death: bool },
    Flee { to_the_death: bool },
    BuyItems {
        potions: u8,
        purchases: Vec<ItemPurchase>,
    },
    SelectStatUpgrades { stats: Stats },
    /// Commit the locally arranged loadout.
    Equip,
    Drop { items: Vec<ItemId> },
}

/// Payload-free discriminant of [`Intent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum IntentKind {
    Explore,
    Attack,
    Flee,
    BuyItems,
    SelectStatUpgrades,
    Equip,
    Drop,
}

impl Intent {
    pub fn kind(&self) -> IntentKind {
        match self {
            Intent::Explore { .. } => IntentKind::Explore,
            Intent::Attack { .. } => IntentKind::Attack,
            Intent::Flee { .. } => IntentKind::Flee,
            Intent::BuyItems { .. } => IntentKind::BuyItems,
            Intent::SelectStatUpgrades { .. } => IntentKind::SelectStatUpgrades,
            Intent::Equip => IntentKind::Equip,
            Intent::Drop { .. } => IntentKind::Drop,
        }
    }
}

impl IntentKind {
    /// Intents whose outcome the ledger resolves with fresh randomness.
    pub fn is_randomized(self) -> bool {
        matches!(self, IntentKind::Explore | IntentKind::Attack | IntentKind::Flee)
    }
}
