//! Classification of raw ledger records and per-event pacing.
//!
//! The catalog is pure data: which records are session events, how long the
//! presentation lingers after each event type, and which event types feed the
//! explore log, the replay log, and the battle display. Desktop and mobile
//! share the same director and differ only in the [`CatalogConfig`] they load.
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use client_blockchain_core::{GAME_EVENT_MODEL, RawRecord};
use game_core::{EventType, GameEvent};

use crate::config::ConfigError;

/// Client surface a catalog preset is tuned for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Surface {
    #[default]
    Desktop,
    Mobile,
}

/// Which pacing table applies to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacingMode {
    /// Own session, caught up.
    Live,
    /// Spectated sessions and finished-session replays.
    Replay,
}

/// Milliseconds to wait after an event before the next one may drain.
///
/// Event types absent from the table have no delay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacingTable(BTreeMap<EventType, u64>);

impl PacingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, event_type: EventType, millis: u64) -> Self {
        self.0.insert(event_type, millis);
        self
    }

    pub fn delay(&self, event_type: EventType) -> Duration {
        self.0
            .get(&event_type)
            .map(|&millis| Duration::from_millis(millis))
            .unwrap_or(Duration::ZERO)
    }
}

impl FromIterator<(EventType, u64)> for PacingTable {
    fn from_iter<I: IntoIterator<Item = (EventType, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Serializable catalog data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub live_pacing: PacingTable,
    pub replay_pacing: PacingTable,
    /// Narrative routed to the explore log of the player's own run.
    pub explore_log: BTreeSet<EventType>,
    /// Narrative routed to the replay log while spectating.
    pub replay_log: BTreeSet<EventType>,
    /// Combat ticks forwarded to the battle display.
    pub battle: BTreeSet<EventType>,
}

impl CatalogConfig {
    pub fn desktop() -> Self {
        use EventType::*;

        Self {
            live_pacing: PacingTable::from_iter([
                (Attack, 2000),
                (BeastAttack, 2000),
                (Flee, 1000),
                (LevelUp, 2000),
            ]),
            replay_pacing: Self::replay_table(),
            explore_log: BTreeSet::from([
                Discovery,
                Obstacle,
                DefeatedBeast,
                FledBeast,
                StatUpgrade,
                BuyItems,
            ]),
            replay_log: Self::replay_narrative(),
            battle: BTreeSet::from([Attack, BeastAttack, Flee]),
        }
    }

    pub fn mobile() -> Self {
        use EventType::*;

        let mut config = Self::desktop();
        config.live_pacing = PacingTable::from_iter([
            (LevelUp, 1000),
            (Discovery, 1000),
            (Obstacle, 1000),
            (Attack, 2000),
            (BeastAttack, 2000),
            (Flee, 1000),
        ]);
        config.explore_log.insert(LevelUp);
        config
    }

    pub fn for_surface(surface: Surface) -> Self {
        match surface {
            Surface::Desktop => Self::desktop(),
            Surface::Mobile => Self::mobile(),
        }
    }

    /// Parses a catalog from RON text.
    pub fn from_ron(source: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(source)
    }

    /// Loads a catalog from a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_ron(&source).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn replay_table() -> PacingTable {
        use EventType::*;

        PacingTable::from_iter([
            (Discovery, 2000),
            (Obstacle, 2000),
            (Attack, 2000),
            (BeastAttack, 2000),
            (Beast, 2000),
            (Flee, 2000),
            (FledBeast, 2000),
            (DefeatedBeast, 1000),
            (BuyItems, 2000),
            (Equip, 2000),
            (Drop, 2000),
        ])
    }

    fn replay_narrative() -> BTreeSet<EventType> {
        use EventType::*;

        BTreeSet::from([
            Discovery,
            Obstacle,
            Beast,
            Attack,
            BeastAttack,
            Flee,
            DefeatedBeast,
            FledBeast,
            StatUpgrade,
            BuyItems,
            LevelUp,
            Equip,
            Drop,
        ])
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::desktop()
    }
}

/// Stateless lookup over a [`CatalogConfig`].
#[derive(Debug, Clone, Default)]
pub struct EventTypeCatalog {
    config: CatalogConfig,
}

impl EventTypeCatalog {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Decodes `record` into a typed event.
    ///
    /// Returns `None` for entities that carry no game event model, and for
    /// models that do not decode; neither is an error.
    pub fn classify(&self, record: &RawRecord) -> Option<GameEvent> {
        let model = record.model(GAME_EVENT_MODEL)?;

        match GameEvent::deserialize(model) {
            Ok(event) => Some(event),
            Err(error) => {
                tracing::trace!(
                    target: "runtime::catalog",
                    entity = %record.entity_id,
                    %error,
                    "dropping undecodable game event"
                );
                None
            }
        }
    }

    /// Classifies `records`, keeping arrival order.
    pub fn classify_all(&self, records: &[RawRecord]) -> Vec<GameEvent> {
        records
            .iter()
            .filter_map(|record| self.classify(record))
            .collect()
    }

    pub fn pacing_delay(&self, event_type: EventType, mode: PacingMode) -> Duration {
        match mode {
            PacingMode::Live => self.config.live_pacing.delay(event_type),
            PacingMode::Replay => self.config.replay_pacing.delay(event_type),
        }
    }

    pub fn is_explore_narrative(&self, event_type: EventType) -> bool {
        self.config.explore_log.contains(&event_type)
    }

    pub fn is_replay_narrative(&self, event_type: EventType) -> bool {
        self.config.replay_log.contains(&event_type)
    }

    pub fn is_battle(&self, event_type: EventType) -> bool {
        self.config.battle.contains(&event_type)
    }
}
