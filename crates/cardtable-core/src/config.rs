//! Game variant configuration.
//!
//! A variant fixes the zone set every player gets, the counters seeded on
//! each player, and the numeric limits the dispatcher validates against.
//! Every field has a default, so a partial JSON document is enough to
//! override a single value.

use crate::counter::{DEFAULT_COUNTER_MAX, DEFAULT_COUNTER_MIN};
use crate::zone::{LayoutKind, Visibility};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Name of the counter the life actions operate on.
pub const LIFE_COUNTER: &str = "life";

/// Upper bound for counters placed on a single card.
pub const MAX_COUNTERS_ON_CARD: u32 = 999;

/// Horizontal grid step used when rearranging table cards.
pub const RASTER_WIDTH: i32 = 36;

/// Vertical grid step used when rearranging table cards.
pub const RASTER_HEIGHT: i32 = 50;

/// Horizontal distance between two neighbouring cards in a hand.
pub const HAND_CARD_SPACING: i32 = 72;

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Malformed config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Zone {0} is declared twice")]
    DuplicateZone(String),

    #[error("Counter {0} is declared twice")]
    DuplicateCounter(String),

    #[error("Counter {name} has min {min} above max {max}")]
    InvalidCounterBounds { name: String, min: i64, max: i64 },

    #[error("Token zone {0} is not a declared zone")]
    UnknownTokenZone(String),

    #[error("Dice range {min}..={max} is empty or below two sides")]
    InvalidDiceRange { min: u32, max: u32 },
}

/// A zone every player owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSpec {
    pub name: String,
    pub visibility: Visibility,
    pub layout: LayoutKind,
}

impl ZoneSpec {
    pub fn new(name: &str, visibility: Visibility, layout: LayoutKind) -> Self {
        Self {
            name: name.to_string(),
            visibility,
            layout,
        }
    }
}

/// A counter seeded on every player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSpec {
    pub name: String,
    pub initial: i64,
    #[serde(default = "default_counter_min")]
    pub min: i64,
    #[serde(default = "default_counter_max")]
    pub max: i64,
}

fn default_counter_min() -> i64 {
    DEFAULT_COUNTER_MIN
}

fn default_counter_max() -> i64 {
    DEFAULT_COUNTER_MAX
}

/// Accepted die sizes for the roll action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiceConfig {
    pub min_sides: u32,
    pub max_sides: u32,
    pub default_sides: u32,
}

impl Default for DiceConfig {
    fn default() -> Self {
        Self {
            min_sides: 2,
            max_sides: 1000,
            default_sides: 20,
        }
    }
}

/// Complete description of a game variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub zones: Vec<ZoneSpec>,
    pub counters: Vec<CounterSpec>,
    pub max_counters_on_card: u32,
    pub raster_width: i32,
    pub raster_height: i32,
    pub hand_card_spacing: i32,
    pub dice: DiceConfig,
    /// Zone that freshly created tokens are put into
    pub token_zone: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            zones: vec![
                ZoneSpec::new("table", Visibility::Public, LayoutKind::Table),
                ZoneSpec::new("hand", Visibility::Private, LayoutKind::Hand),
                ZoneSpec::new("deck", Visibility::Private, LayoutKind::Stack),
                ZoneSpec::new("graveyard", Visibility::Public, LayoutKind::Stack),
                ZoneSpec::new("rfg", Visibility::Public, LayoutKind::Stack),
                ZoneSpec::new("sb", Visibility::Private, LayoutKind::Stack),
            ],
            counters: vec![CounterSpec {
                name: LIFE_COUNTER.to_string(),
                initial: 20,
                min: DEFAULT_COUNTER_MIN,
                max: DEFAULT_COUNTER_MAX,
            }],
            max_counters_on_card: MAX_COUNTERS_ON_CARD,
            raster_width: RASTER_WIDTH,
            raster_height: RASTER_HEIGHT,
            hand_card_spacing: HAND_CARD_SPACING,
            dice: DiceConfig::default(),
            token_zone: "table".to_string(),
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field rules serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if !seen.insert(zone.name.as_str()) {
                return Err(ConfigError::DuplicateZone(zone.name.clone()));
            }
        }
        if !seen.contains(self.token_zone.as_str()) {
            return Err(ConfigError::UnknownTokenZone(self.token_zone.clone()));
        }

        let mut seen = HashSet::new();
        for counter in &self.counters {
            if !seen.insert(counter.name.as_str()) {
                return Err(ConfigError::DuplicateCounter(counter.name.clone()));
            }
            if counter.min > counter.max {
                return Err(ConfigError::InvalidCounterBounds {
                    name: counter.name.clone(),
                    min: counter.min,
                    max: counter.max,
                });
            }
        }

        if self.dice.min_sides < 2 || self.dice.min_sides > self.dice.max_sides {
            return Err(ConfigError::InvalidDiceRange {
                min: self.dice.min_sides,
                max: self.dice.max_sides,
            });
        }

        Ok(())
    }

    pub fn zone_spec(&self, name: &str) -> Option<&ZoneSpec> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn counter_spec(&self, name: &str) -> Option<&CounterSpec> {
        self.counters.iter().find(|c| c.name == name)
    }

    /// Bounds for a counter, falling back to the generic range for counters
    /// the variant does not declare
    pub fn counter_bounds(&self, name: &str) -> (i64, i64) {
        self.counter_spec(name)
            .map(|c| (c.min, c.max))
            .unwrap_or((DEFAULT_COUNTER_MIN, DEFAULT_COUNTER_MAX))
    }
}
