//! Core game state machine.
//!
//! `GameStateMachine` owns every player and applies the server's ordered
//! event stream to them. It is the only thing that mutates the
//! player/zone/card/counter graph; everything else reads it.
//!
//! # Routing
//!
//! - Private events go straight to the local player's apply path.
//! - Public events go to the originating player, except that `draw` and
//!   `moveCard` echoes of the local player's own actions only produce their
//!   log line: the private copy already moved the cards.
//!
//! A protocol error drops the offending event whole and is logged once;
//! the next event is processed normally.

use crate::card::{CardId, CardItem};
use crate::config::GameConfig;
use crate::events::{EventKind, Notification, RosterEntry, ServerEvent};
use crate::player::{Player, PlayerId};
use crate::registry::PlayerRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first game to start
    NotStarted,
    /// A game is in progress
    Started,
    /// A player signalled readiness for the next game
    AwaitingRestart,
}

/// Errors raised while applying inbound events. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ProtocolError {
    #[error("Unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player {0} is already at the table")]
    DuplicatePlayer(PlayerId),

    #[error("Unhandled event kind {0}")]
    UnhandledEventKind(String),

    #[error("Player {player} has no zone {zone}")]
    UnknownZone { player: PlayerId, zone: String },

    #[error("Card {card} is not in {zone} of player {player}")]
    UnknownCard {
        player: PlayerId,
        zone: String,
        card: CardId,
    },

    #[error("Player {player} has no counter {counter}")]
    UnknownCounter { player: PlayerId, counter: String },

    #[error("Card {card} is already in play")]
    DuplicateCard { card: CardId },

    #[error("Player {0} would break the single local player rule")]
    LocalPlayer(PlayerId),
}

/// The authority mirror for one client
#[derive(Debug, Clone, Serialize)]
pub struct GameStateMachine {
    config: GameConfig,
    players: PlayerRegistry,
    local_id: PlayerId,
    phase: GamePhase,
}

impl GameStateMachine {
    /// Start a session with the local player already seated
    pub fn new(local_id: PlayerId, local_name: impl Into<String>, config: GameConfig) -> Self {
        let local = Player::new(local_id, local_name, true, &config);
        info!(player = local_id, name = local.name(), "local player seated");
        let players = PlayerRegistry::with_player(local);

        Self {
            config,
            players,
            local_id,
            phase: GamePhase::NotStarted,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn local_id(&self) -> PlayerId {
        self.local_id
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.players.get(self.local_id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn players(&self) -> &PlayerRegistry {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Owner and zone currently holding a card
    pub fn card_location(&self, card: CardId) -> Option<(PlayerId, &str)> {
        self.players.locate_card(card)
    }

    /// Resolve local card ids into a selection, skipping unknown ids but
    /// keeping the given order
    pub fn select(&self, ids: &[CardId]) -> Vec<&CardItem> {
        let Some(local) = self.local_player() else {
            return Vec::new();
        };
        ids.iter().filter_map(|&id| local.card(id)).collect()
    }

    // ==================== Roster ====================

    /// Register a player and instantiate its zones and counters.
    ///
    /// The returned player is what the presentation layer should register.
    pub fn add_player(
        &mut self,
        id: PlayerId,
        name: &str,
        local: bool,
    ) -> Result<&Player, ProtocolError> {
        if local && self.players.contains(self.local_id) {
            return Err(ProtocolError::LocalPlayer(id));
        }
        let player = Player::new(id, name, local, &self.config);
        let player = self.players.insert(player)?;
        info!(player = id, name, "player added");
        Ok(player)
    }

    /// Detach a player and everything it owns.
    ///
    /// Ownership of the detached player passes to the caller, which sees it
    /// before it is dropped. The local player cannot be removed this way.
    pub fn remove_player(&mut self, id: PlayerId) -> Result<Player, ProtocolError> {
        if id == self.local_id {
            return Err(ProtocolError::LocalPlayer(id));
        }
        let player = self
            .players
            .remove(id)
            .ok_or(ProtocolError::UnknownPlayer(id))?;
        info!(player = id, name = player.name(), "player removed");
        Ok(player)
    }

    /// Seed the registry from a roster snapshot
    pub fn apply_roster(&mut self, roster: &[RosterEntry]) -> Vec<Notification> {
        let mut notifications = Vec::new();

        for entry in roster {
            if entry.id == self.local_id {
                continue;
            }
            match self.add_player(entry.id, &entry.name, false) {
                Ok(player) => notifications.push(Notification::PlayerAdded {
                    id: player.id(),
                    name: player.name().to_string(),
                }),
                Err(e) => warn!(player = entry.id, error = %e, "skipping roster entry"),
            }
        }

        notifications.push(Notification::PlayerListReceived {
            names: roster.iter().map(|e| e.name.clone()).collect(),
        });
        notifications.push(Notification::ShowSetupSurface);
        notifications
    }

    /// Tear the session down, removing every player (local last).
    ///
    /// Each detached player travels in its `PlayerRemoved` notification.
    pub fn end_session(mut self) -> Vec<Notification> {
        let mut ids: Vec<PlayerId> = self.players.ids().to_vec();
        ids.sort_by_key(|&id| id == self.local_id);

        ids.into_iter()
            .filter_map(|id| self.players.remove(id))
            .map(|player| Notification::PlayerRemoved {
                player: Box::new(player),
            })
            .collect()
    }

    // ==================== Pass-through ====================

    pub fn hover_card(&self, card: CardId) -> Option<Notification> {
        let card = self.players.find_card(card)?;
        Some(Notification::HoverCard {
            name: card.name.clone()?,
        })
    }

    pub fn show_card_menu(&self, x: i32, y: i32) -> Notification {
        Notification::ShowCardMenu { x, y }
    }

    // ==================== Event application ====================

    /// Apply one event to completion.
    ///
    /// On error nothing was mutated; the error is the event's single
    /// diagnostic and processing can continue with the next event.
    pub fn apply_event(&mut self, event: &ServerEvent) -> Result<Vec<Notification>, ProtocolError> {
        let result = if event.public {
            self.apply_public(event)
        } else {
            self.apply_private(event)
        };

        match &result {
            Ok(notifications) => debug!(
                player = event.player_id,
                kind = event.kind.name(),
                public = event.public,
                notifications = notifications.len(),
                "event applied"
            ),
            Err(e) => warn!(
                player = event.player_id,
                kind = event.kind.name(),
                public = event.public,
                error = %e,
                "event dropped"
            ),
        }
        result
    }

    fn apply_private(&mut self, event: &ServerEvent) -> Result<Vec<Notification>, ProtocolError> {
        self.delegate(self.local_id, &event.kind)
    }

    fn apply_public(&mut self, event: &ServerEvent) -> Result<Vec<Notification>, ProtocolError> {
        let origin = event.player_id;

        match &event.kind {
            EventKind::Join => {
                let player = self.add_player(origin, &event.player_name, false)?;
                let name = player.name().to_string();
                Ok(vec![
                    Notification::Join { name: name.clone() },
                    Notification::PlayerAdded { id: origin, name },
                ])
            }

            EventKind::Leave => {
                let player = self.remove_player(origin)?;
                Ok(vec![
                    Notification::Leave {
                        name: player.name().to_string(),
                    },
                    Notification::PlayerRemoved {
                        player: Box::new(player),
                    },
                ])
            }

            EventKind::Say { message } => Ok(vec![Notification::Say {
                player: self.origin_name(origin)?,
                message: message.clone(),
            }]),

            EventKind::ReadyStart => {
                let player = self.origin_name(origin)?;
                if self.phase != GamePhase::Started {
                    debug!(phase = ?self.phase, "ready signal outside a running game ignored");
                    return Ok(Vec::new());
                }
                self.phase = GamePhase::AwaitingRestart;
                let mut notifications = vec![Notification::ReadyStart { player }];
                if origin != self.local_id {
                    notifications.push(Notification::ShowSetupSurface);
                }
                Ok(notifications)
            }

            EventKind::GameStart => {
                self.origin_name(origin)?;
                self.phase = GamePhase::Started;
                Ok(vec![Notification::GameStart])
            }

            EventKind::Shuffle => Ok(vec![Notification::Shuffle {
                player: self.origin_name(origin)?,
            }]),

            EventKind::RollDice { sides, result } => Ok(vec![Notification::RollDice {
                player: self.origin_name(origin)?,
                sides: *sides,
                result: *result,
            }]),

            // Turn structure belongs to the turn tracker
            EventKind::SetActivePlayer { .. } | EventKind::SetActivePhase { .. } => {
                self.origin_name(origin)?;
                Ok(Vec::new())
            }

            EventKind::DumpZone {
                zone_owner,
                zone,
                count,
            } => {
                let viewer = self.origin_name(origin)?;
                let owner = self
                    .players
                    .get_mut(*zone_owner)
                    .ok_or(ProtocolError::UnknownPlayer(*zone_owner))?;
                let owner_name = owner.name().to_string();
                owner
                    .zone_mut(zone)
                    .ok_or_else(|| ProtocolError::UnknownZone {
                        player: *zone_owner,
                        zone: zone.clone(),
                    })?
                    .assert_count(*count);
                Ok(vec![Notification::DumpZone {
                    viewer,
                    zone_owner: owner_name,
                    zone: zone.clone(),
                    count: *count,
                }])
            }

            EventKind::Draw { count, .. } => {
                let mut notifications = vec![Notification::Draw {
                    player: self.origin_name(origin)?,
                    count: *count,
                }];
                if origin == self.local_id {
                    debug!(count, "own draw echo, already applied privately");
                    return Ok(notifications);
                }
                notifications.extend(self.delegate(origin, &event.kind)?);
                Ok(notifications)
            }

            EventKind::MoveCard { card_id, .. } => {
                self.origin_name(origin)?;
                if origin == self.local_id {
                    debug!(card = card_id, "own move echo, already applied privately");
                    return Ok(Vec::new());
                }
                self.delegate(origin, &event.kind)
            }

            EventKind::Name { .. }
            | EventKind::CreateToken { .. }
            | EventKind::SetupZones { .. }
            | EventKind::SetCardAttr { .. }
            | EventKind::SetCounter { .. }
            | EventKind::DelCounter { .. }
            | EventKind::PlayerId { .. } => self.delegate(origin, &event.kind),

            EventKind::Unknown { kind } => Err(ProtocolError::UnhandledEventKind(kind.clone())),
        }
    }

    fn origin_name(&self, id: PlayerId) -> Result<String, ProtocolError> {
        self.players
            .get(id)
            .map(|p| p.name().to_string())
            .ok_or(ProtocolError::UnknownPlayer(id))
    }

    /// Hand a player-level event to its target player
    fn delegate(&mut self, target: PlayerId, kind: &EventKind) -> Result<Vec<Notification>, ProtocolError> {
        if !self.players.contains(target) {
            return Err(ProtocolError::UnknownPlayer(target));
        }
        self.check_new_cards(target, kind)?;

        if let EventKind::PlayerId { id } = kind {
            self.players.rekey(target, *id)?;
            if target == self.local_id {
                self.local_id = *id;
            }
            return Ok(Vec::new());
        }

        let config = &self.config;
        let player = self
            .players
            .get_mut(target)
            .ok_or(ProtocolError::UnknownPlayer(target))?;
        player.apply_event(kind, config)
    }

    /// Reject events that would give a card id a second home
    fn check_new_cards(&self, target: PlayerId, kind: &EventKind) -> Result<(), ProtocolError> {
        let taken = |card: CardId| -> Result<(), ProtocolError> {
            match self.players.locate_card(card) {
                Some(_) => Err(ProtocolError::DuplicateCard { card }),
                None => Ok(()),
            }
        };

        match kind {
            EventKind::CreateToken { card_id, .. } => taken(*card_id),
            EventKind::Draw { cards, .. } => {
                let mut drawn = HashSet::new();
                cards.iter().try_for_each(|c| {
                    if !drawn.insert(c.id) {
                        return Err(ProtocolError::DuplicateCard { card: c.id });
                    }
                    taken(c.id)
                })
            }
            EventKind::MoveCard {
                card_id,
                start_zone,
                ..
            } => match self.players.locate_card(*card_id) {
                Some((owner, zone)) if owner == target && zone == start_zone => Ok(()),
                Some(_) => Err(ProtocolError::DuplicateCard { card: *card_id }),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }
}
