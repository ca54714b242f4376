//! Item-related state types.
//!
//! Items are referenced by their ledger id. Id `0` marks an empty slot in
//! both the bag and the equipment snapshot.

/// Ledger identifier of an item definition.
pub type ItemId = u8;

/// An owned item: its definition id plus the experience it has accumulated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: ItemId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub xp: u16,
}

impl Item {
    pub const EMPTY: Self = Self { id: 0, xp: 0 };

    pub const fn new(id: ItemId) -> Self {
        Self { id, xp: 0 }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.id == 0
    }
}

/// One market purchase inside a `buyItems` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemPurchase {
    pub item_id: ItemId,
    /// Equip immediately instead of storing in the bag.
    pub equip: bool,
}

impl ItemPurchase {
    pub const fn new(item_id: ItemId, equip: bool) -> Self {
        Self { item_id, equip }
    }
}
