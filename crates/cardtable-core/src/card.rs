//! Card instances as this client knows them.

use crate::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Card identifier, unique within a game and stable across moves
pub type CardId = u32;

/// Free placement coordinates on the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A card sitting in exactly one zone.
///
/// `owner` and `zone` always name the zone holding the card; zones rewrite
/// them on insertion so nothing has to be recovered from a display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardItem {
    pub id: CardId,
    /// `None` while the identity has not been revealed to this client
    pub name: Option<String>,
    pub owner: PlayerId,
    pub zone: String,
    pub position: Position,
    pub tapped: bool,
    pub face_down: bool,
    pub counters: u32,
}

impl CardItem {
    pub fn new(id: CardId, name: Option<String>, owner: PlayerId, zone: impl Into<String>) -> Self {
        Self {
            id,
            name,
            owner,
            zone: zone.into(),
            position: Position::ORIGIN,
            tapped: false,
            face_down: false,
            counters: 0,
        }
    }

    /// Name suitable for a log line
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("a card")
    }

    /// Set the counter count, clamped to `max`. Returns the previous count.
    pub fn set_counters(&mut self, value: u32, max: u32) -> u32 {
        std::mem::replace(&mut self.counters, value.min(max))
    }
}
