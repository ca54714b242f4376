//! Adventurer and beast snapshots as reported by the ledger.

use super::Equipment;

/// Core attributes. Also used as the allocation payload of stat upgrades.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    pub strength: u8,
    pub dexterity: u8,
    pub vitality: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
    pub luck: u8,
}

impl Stats {
    /// Sum of all attribute points.
    pub fn total(&self) -> u16 {
        [
            self.strength,
            self.dexterity,
            self.vitality,
            self.intelligence,
            self.wisdom,
            self.charisma,
            self.luck,
        ]
        .iter()
        .map(|&points| u16::from(points))
        .sum()
    }
}

/// Vital stats snapshot of an adventurer.
///
/// Every field is authoritative: the ledger always sends the full snapshot,
/// never a delta.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Adventurer {
    pub health: u16,
    pub xp: u16,
    pub gold: u16,
    /// Health of the beast currently engaged; zero outside of a fight.
    pub beast_health: u16,
    pub stat_upgrades_available: u8,
    pub stats: Stats,
    pub equipment: Equipment,
    /// Seed that reveals item specials; zero until specials unlock.
    pub item_specials_seed: u16,
    pub action_count: u16,
}

impl Adventurer {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    #[inline]
    pub fn in_battle(&self) -> bool {
        self.beast_health > 0
    }

    /// Level derived from xp (`floor(sqrt(xp))`, at least 1).
    pub fn level(&self) -> u16 {
        let mut level: u16 = 1;
        while u32::from(level + 1) * u32::from(level + 1) <= u32::from(self.xp) {
            level += 1;
        }
        level
    }
}

/// The beast currently blocking the adventurer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Beast {
    pub id: u8,
    pub seed: u64,
    pub health: u16,
    pub level: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_square_root_of_xp() {
        let mut adventurer = Adventurer::default();
        assert_eq!(adventurer.level(), 1);

        adventurer.xp = 3;
        assert_eq!(adventurer.level(), 1);

        adventurer.xp = 4;
        assert_eq!(adventurer.level(), 2);

        adventurer.xp = 99;
        assert_eq!(adventurer.level(), 9);

        adventurer.xp = 100;
        assert_eq!(adventurer.level(), 10);
    }

    #[test]
    fn stats_total_sums_every_attribute() {
        let stats = Stats {
            strength: 2,
            luck: 1,
            charisma: 3,
            ..Stats::default()
        };
        assert_eq!(stats.total(), 6);
    }
}
