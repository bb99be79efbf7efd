//! Inbound server events and the notifications derived from them.
//!
//! Events are what the server says happened; notifications are what the
//! presentation layer should show about it. Applying an event returns its
//! notifications instead of broadcasting them, so their order can be
//! checked directly.

use crate::card::CardId;
use crate::player::{Player, PlayerId};
use crate::zone::APPEND;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One ordered event from the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEvent {
    /// Player the event originates from
    pub player_id: PlayerId,
    /// Name carried by roster events (join/leave)
    #[serde(default)]
    pub player_name: String,
    /// `false` for events addressed only to this client
    pub public: bool,
    pub kind: EventKind,
}

impl ServerEvent {
    pub fn public(player_id: PlayerId, kind: EventKind) -> Self {
        Self {
            player_id,
            player_name: String::new(),
            public: true,
            kind,
        }
    }

    pub fn private(player_id: PlayerId, kind: EventKind) -> Self {
        Self {
            player_id,
            player_name: String::new(),
            public: false,
            kind,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = name.into();
        self
    }
}

/// Card attribute carried by `setCardAttr`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "attr", content = "value", rename_all = "camelCase")]
pub enum CardAttr {
    Tapped(bool),
    Counters(u32),
}

/// A card revealed to its drawer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub id: CardId,
    pub name: String,
}

/// Roster snapshot entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
}

fn append() -> i32 {
    APPEND
}

/// Event payloads, one variant per kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum EventKind {
    // ==================== Session ====================
    Say {
        message: String,
    },
    Join,
    Leave,
    ReadyStart,
    GameStart,

    // ==================== Announcements ====================
    Shuffle,
    RollDice {
        sides: u32,
        result: u32,
    },
    SetActivePlayer {
        player: PlayerId,
    },
    SetActivePhase {
        phase: u32,
    },
    DumpZone {
        zone_owner: PlayerId,
        zone: String,
        count: usize,
    },

    // ==================== Player state ====================
    Name {
        name: String,
    },
    CreateToken {
        zone: String,
        card_id: CardId,
        name: String,
        #[serde(default)]
        x: i32,
        #[serde(default)]
        y: i32,
    },
    SetupZones {
        deck: usize,
        #[serde(default)]
        sideboard: usize,
    },
    SetCardAttr {
        zone: String,
        card_id: CardId,
        attr: CardAttr,
    },
    SetCounter {
        name: String,
        value: i64,
    },
    DelCounter {
        name: String,
    },
    PlayerId {
        id: PlayerId,
    },
    /// Public draws only carry `count`; the drawer's private copy also
    /// lists the cards
    Draw {
        count: usize,
        #[serde(default)]
        cards: Vec<DrawnCard>,
    },
    MoveCard {
        card_id: CardId,
        #[serde(default)]
        card_name: Option<String>,
        start_zone: String,
        target_zone: String,
        #[serde(default = "append")]
        x: i32,
        #[serde(default)]
        y: i32,
        #[serde(default)]
        face_down: bool,
    },

    /// A kind this client does not understand
    #[serde(skip)]
    Unknown {
        kind: String,
    },
}

impl EventKind {
    /// Wire names of every kind this client understands
    pub const KNOWN: [&'static str; 19] = [
        "say",
        "join",
        "leave",
        "readyStart",
        "gameStart",
        "shuffle",
        "rollDice",
        "setActivePlayer",
        "setActivePhase",
        "dumpZone",
        "name",
        "createToken",
        "setupZones",
        "setCardAttr",
        "setCounter",
        "delCounter",
        "playerId",
        "draw",
        "moveCard",
    ];

    /// Decode a kind from its wire name and JSON payload.
    ///
    /// Unknown kinds decode to [`EventKind::Unknown`]; a known kind with a
    /// payload that does not fit is an error.
    pub fn decode(kind: &str, data: serde_json::Value) -> Result<Self, serde_json::Error> {
        if !Self::KNOWN.contains(&kind) {
            return Ok(EventKind::Unknown {
                kind: kind.to_string(),
            });
        }
        serde_json::from_value(serde_json::json!({ "kind": kind, "data": data }))
    }

    /// Wire name of this kind
    pub fn name(&self) -> &str {
        match self {
            EventKind::Say { .. } => "say",
            EventKind::Join => "join",
            EventKind::Leave => "leave",
            EventKind::ReadyStart => "readyStart",
            EventKind::GameStart => "gameStart",
            EventKind::Shuffle => "shuffle",
            EventKind::RollDice { .. } => "rollDice",
            EventKind::SetActivePlayer { .. } => "setActivePlayer",
            EventKind::SetActivePhase { .. } => "setActivePhase",
            EventKind::DumpZone { .. } => "dumpZone",
            EventKind::Name { .. } => "name",
            EventKind::CreateToken { .. } => "createToken",
            EventKind::SetupZones { .. } => "setupZones",
            EventKind::SetCardAttr { .. } => "setCardAttr",
            EventKind::SetCounter { .. } => "setCounter",
            EventKind::DelCounter { .. } => "delCounter",
            EventKind::PlayerId { .. } => "playerId",
            EventKind::Draw { .. } => "draw",
            EventKind::MoveCard { .. } => "moveCard",
            EventKind::Unknown { kind } => kind,
        }
    }
}

/// Event in its wire shape: the kind as a free string, the payload as
/// untyped JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub player_id: PlayerId,
    #[serde(default)]
    pub player_name: String,
    pub public: bool,
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl RawEvent {
    pub fn decode(self) -> Result<ServerEvent, serde_json::Error> {
        Ok(ServerEvent {
            player_id: self.player_id,
            player_name: self.player_name,
            public: self.public,
            kind: EventKind::decode(&self.kind, self.data)?,
        })
    }
}

/// Something the presentation layer should know about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Notification {
    // ==================== Roster ====================
    PlayerAdded {
        id: PlayerId,
        name: String,
    },
    /// Carries the detached player, zones included; it is destroyed once
    /// the notification is dropped
    PlayerRemoved {
        player: Box<Player>,
    },
    PlayerListReceived {
        names: Vec<String>,
    },
    Join {
        name: String,
    },
    Leave {
        name: String,
    },
    Renamed {
        old: String,
        new: String,
    },

    // ==================== Game flow ====================
    Say {
        player: String,
        message: String,
    },
    ReadyStart {
        player: String,
    },
    GameStart,
    /// The pre-game setup surface should be presented again
    ShowSetupSurface,
    Shuffle {
        player: String,
    },
    RollDice {
        player: String,
        sides: u32,
        result: u32,
    },
    DumpZone {
        viewer: String,
        zone_owner: String,
        zone: String,
        count: usize,
    },

    // ==================== Cards and counters ====================
    Draw {
        player: String,
        count: usize,
    },
    MoveCard {
        player: String,
        card: Option<String>,
        start_zone: String,
        target_zone: String,
    },
    CreateToken {
        player: String,
        card: String,
    },
    SetTapped {
        player: String,
        card: String,
        tapped: bool,
    },
    SetCardCounters {
        player: String,
        card: String,
        old: u32,
        new: u32,
    },
    SetCounter {
        player: String,
        counter: String,
        old: Option<i64>,
        new: i64,
    },

    // ==================== Pass-through ====================
    HoverCard {
        name: String,
    },
    ShowCardMenu {
        x: i32,
        y: i32,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::PlayerAdded { id, name } => write!(f, "{} (#{}) is at the table", name, id),
            Notification::PlayerRemoved { player } => {
                write!(f, "{} (#{}) left the table", player.name(), player.id())
            }
            Notification::PlayerListReceived { names } => {
                write!(f, "Players: {}", names.join(", "))
            }
            Notification::Join { name } => write!(f, "{} has joined the game", name),
            Notification::Leave { name } => write!(f, "{} has left the game", name),
            Notification::Renamed { old, new } => write!(f, "{} is now called {}", old, new),
            Notification::Say { player, message } => write!(f, "{}: {}", player, message),
            Notification::ReadyStart { player } => write!(f, "{} is ready to start a new game", player),
            Notification::GameStart => write!(f, "Game has started"),
            Notification::ShowSetupSurface => write!(f, "Choose a deck to start the game"),
            Notification::Shuffle { player } => write!(f, "{} shuffles their library", player),
            Notification::RollDice {
                player,
                sides,
                result,
            } => write!(f, "{} rolls a {} with a {}-sided dice", player, result, sides),
            Notification::DumpZone {
                viewer,
                zone_owner,
                zone,
                count,
            } => write!(
                f,
                "{} is looking at {}'s {} ({} cards)",
                viewer, zone_owner, zone, count
            ),
            Notification::Draw { player, count } => {
                if *count == 1 {
                    write!(f, "{} draws a card", player)
                } else {
                    write!(f, "{} draws {} cards", player, count)
                }
            }
            Notification::MoveCard {
                player,
                card,
                start_zone,
                target_zone,
            } => write!(
                f,
                "{} moves {} from {} to {}",
                player,
                card.as_deref().unwrap_or("a card"),
                start_zone,
                target_zone
            ),
            Notification::CreateToken { player, card } => {
                write!(f, "{} creates token: {}", player, card)
            }
            Notification::SetTapped {
                player,
                card,
                tapped,
            } => write!(
                f,
                "{} {} {}",
                player,
                if *tapped { "taps" } else { "untaps" },
                card
            ),
            Notification::SetCardCounters {
                player,
                card,
                old,
                new,
            } => write!(
                f,
                "{} sets counters of {} to {} (was {})",
                player, card, new, old
            ),
            Notification::SetCounter {
                player,
                counter,
                old,
                new,
            } => match old {
                Some(old) => write!(f, "{} sets counter \"{}\" to {} (was {})", player, counter, new, old),
                None => write!(f, "{} sets counter \"{}\" to {}", player, counter, new),
            },
            Notification::HoverCard { name } => write!(f, "Hovering {}", name),
            Notification::ShowCardMenu { x, y } => write!(f, "Card menu at ({}, {})", x, y),
        }
    }
}
