//! Equipment snapshot for the adventurer.
//!
//! The ledger reports the full loadout on every adventurer event. The client
//! keeps that confirmed loadout next to whatever the player has rearranged
//! locally, and [`Equipment::newly_equipped`] computes the difference that has
//! to be sent back before the next action resolves.

use strum::{EnumIter, IntoEnumIterator};

use super::{Item, ItemId};

/// Equipment slots, in ledger order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum Slot {
    Weapon,
    Chest,
    Head,
    Waist,
    Foot,
    Hand,
    Neck,
    Ring,
}

/// Items currently equipped, one per slot. Empty slots hold [`Item::EMPTY`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Equipment {
    pub weapon: Item,
    pub chest: Item,
    pub head: Item,
    pub waist: Item,
    pub foot: Item,
    pub hand: Item,
    pub neck: Item,
    pub ring: Item,
}

impl Equipment {
    /// Creates empty equipment.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the item in `slot`.
    pub fn get(&self, slot: Slot) -> Item {
        match slot {
            Slot::Weapon => self.weapon,
            Slot::Chest => self.chest,
            Slot::Head => self.head,
            Slot::Waist => self.waist,
            Slot::Foot => self.foot,
            Slot::Hand => self.hand,
            Slot::Neck => self.neck,
            Slot::Ring => self.ring,
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Item {
        match slot {
            Slot::Weapon => &mut self.weapon,
            Slot::Chest => &mut self.chest,
            Slot::Head => &mut self.head,
            Slot::Waist => &mut self.waist,
            Slot::Foot => &mut self.foot,
            Slot::Hand => &mut self.hand,
            Slot::Neck => &mut self.neck,
            Slot::Ring => &mut self.ring,
        }
    }

    /// Puts `item` into `slot`, returning the item previously there.
    pub fn equip(&mut self, slot: Slot, item: Item) -> Item {
        std::mem::replace(self.slot_mut(slot), item)
    }

    /// Clears `slot`, returning the item previously there.
    pub fn unequip(&mut self, slot: Slot) -> Item {
        self.equip(slot, Item::EMPTY)
    }

    /// Iterates `(slot, item)` pairs in ledger order, empty slots included.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Item)> + '_ {
        Slot::iter().map(move |slot| (slot, self.get(slot)))
    }

    /// Ids of every non-empty slot.
    pub fn item_ids(&self) -> Vec<ItemId> {
        self.iter()
            .filter(|(_, item)| !item.is_empty())
            .map(|(_, item)| item.id)
            .collect()
    }

    /// Items present in `self` but not in the same slot of `confirmed`.
    ///
    /// Slots emptied locally are not reported: the ledger has no unequip call,
    /// an item leaves a slot only when another one replaces it.
    pub fn newly_equipped(&self, confirmed: &Equipment) -> Vec<Item> {
        self.iter()
            .filter(|(slot, item)| !item.is_empty() && confirmed.get(*slot).id != item.id)
            .map(|(_, item)| item)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWORD: ItemId = 12;
    const DAGGER: ItemId = 13;
    const HELM: ItemId = 40;

    fn loadout(weapon: ItemId, head: ItemId) -> Equipment {
        let mut equipment = Equipment::empty();
        equipment.equip(Slot::Weapon, Item::new(weapon));
        equipment.equip(Slot::Head, Item::new(head));
        equipment
    }

    #[test]
    fn newly_equipped_reports_changed_slots_only() {
        let displayed = loadout(SWORD, HELM);
        let confirmed = loadout(DAGGER, HELM);

        let diff = displayed.newly_equipped(&confirmed);
        assert_eq!(diff, vec![Item::new(SWORD)]);
    }

    #[test]
    fn newly_equipped_ignores_emptied_slots() {
        let mut displayed = loadout(SWORD, HELM);
        displayed.unequip(Slot::Head);
        let confirmed = loadout(SWORD, HELM);

        assert!(displayed.newly_equipped(&confirmed).is_empty());
    }

    #[test]
    fn item_ids_skip_empty_slots() {
        assert_eq!(loadout(SWORD, HELM).item_ids(), vec![SWORD, HELM]);
        assert!(Equipment::empty().item_ids().is_empty());
    }
}
