//! Player state: zones and counters.
//!
//! A player exclusively owns its zones (and through them its cards) and its
//! counters. The fixed zone set and the seeded counters come from the
//! [`GameConfig`]; counters the server sets later are created on demand.

use crate::card::{CardId, CardItem};
use crate::config::GameConfig;
use crate::counter::Counter;
use crate::events::{CardAttr, EventKind, Notification};
use crate::game::ProtocolError;
use crate::zone::{Removed, Zone, APPEND};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Player identifier, unique within a game
pub type PlayerId = u32;

/// Zone cards are drawn from
pub const DECK_ZONE: &str = "deck";

/// Zone drawn cards go to
pub const HAND_ZONE: &str = "hand";

/// Zone holding the sideboard
pub const SIDEBOARD_ZONE: &str = "sb";

/// Zone holding permanents
pub const TABLE_ZONE: &str = "table";

/// A participant in the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    local: bool,
    zones: Vec<Zone>,
    counters: Vec<Counter>,
}

impl Player {
    /// Create a player with the variant's zone and counter set
    pub fn new(id: PlayerId, name: impl Into<String>, local: bool, config: &GameConfig) -> Self {
        let zones = config
            .zones
            .iter()
            .map(|spec| Zone::new(spec, id, local, config.hand_card_spacing))
            .collect();
        let counters = config.counters.iter().map(Counter::from_spec).collect();

        Self {
            id,
            name: name.into(),
            local,
            zones,
            counters,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this player operates this client
    pub fn is_local(&self) -> bool {
        self.local
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name() == name)
    }

    pub fn zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.zones.iter_mut().find(|z| z.name() == name)
    }

    pub fn counters(&self) -> &[Counter] {
        &self.counters
    }

    pub fn counter(&self, name: &str) -> Option<&Counter> {
        self.counters.iter().find(|c| c.name() == name)
    }

    /// Every materialized card across all zones
    pub fn cards(&self) -> impl Iterator<Item = &CardItem> {
        self.zones.iter().flat_map(|z| z.cards().iter())
    }

    pub fn card(&self, id: CardId) -> Option<&CardItem> {
        self.cards().find(|c| c.id == id)
    }

    /// Total cards across all zones, hidden ones included
    pub fn card_count(&self) -> usize {
        self.zones
            .iter()
            .map(Zone::card_count)
            .fold(0, usize::saturating_add)
    }

    pub(crate) fn reassign_id(&mut self, id: PlayerId) {
        self.id = id;
        for zone in &mut self.zones {
            zone.set_owner(id);
        }
    }

    fn zone_or_err(&self, zone: &str) -> Result<&Zone, ProtocolError> {
        self.zone(zone).ok_or_else(|| ProtocolError::UnknownZone {
            player: self.id,
            zone: zone.to_string(),
        })
    }

    /// Apply a player-level event.
    ///
    /// Every precondition is checked before anything is mutated, so an
    /// error leaves the player untouched.
    pub fn apply_event(
        &mut self,
        kind: &EventKind,
        config: &GameConfig,
    ) -> Result<Vec<Notification>, ProtocolError> {
        let mut notifications = Vec::new();

        match kind {
            EventKind::Name { name } => {
                let old = std::mem::replace(&mut self.name, name.clone());
                notifications.push(Notification::Renamed {
                    old,
                    new: name.clone(),
                });
            }

            EventKind::CreateToken {
                zone,
                card_id,
                name,
                x,
                y,
            } => {
                self.zone_or_err(zone)?;
                let card = CardItem::new(*card_id, Some(name.clone()), self.id, zone.as_str());
                if let Some(target) = self.zone_mut(zone) {
                    target.insert(card, *x, *y);
                }
                notifications.push(Notification::CreateToken {
                    player: self.name.clone(),
                    card: name.clone(),
                });
            }

            EventKind::SetupZones { deck, sideboard } => {
                self.zone_or_err(DECK_ZONE)?;
                self.zone_or_err(SIDEBOARD_ZONE)?;
                for zone in &mut self.zones {
                    zone.clear();
                }
                if let Some(zone) = self.zone_mut(DECK_ZONE) {
                    zone.add_hidden(*deck);
                }
                if let Some(zone) = self.zone_mut(SIDEBOARD_ZONE) {
                    zone.add_hidden(*sideboard);
                }
                debug!(player = self.id, deck, sideboard, "zones set up");
            }

            EventKind::SetCardAttr {
                zone,
                card_id,
                attr,
            } => {
                let player = self.name.clone();
                let player_id = self.id;
                let card = self
                    .zone_mut(zone)
                    .ok_or_else(|| ProtocolError::UnknownZone {
                        player: player_id,
                        zone: zone.clone(),
                    })?
                    .card_mut(*card_id)
                    .ok_or_else(|| ProtocolError::UnknownCard {
                        player: player_id,
                        zone: zone.clone(),
                        card: *card_id,
                    })?;

                match attr {
                    CardAttr::Tapped(tapped) => {
                        card.tapped = *tapped;
                        notifications.push(Notification::SetTapped {
                            player,
                            card: card.display_name().to_string(),
                            tapped: *tapped,
                        });
                    }
                    CardAttr::Counters(value) => {
                        let old = card.set_counters(*value, config.max_counters_on_card);
                        notifications.push(Notification::SetCardCounters {
                            player,
                            card: card.display_name().to_string(),
                            old,
                            new: card.counters,
                        });
                    }
                }
            }

            EventKind::SetCounter { name, value } => {
                let (old, new) = match self.counters.iter_mut().find(|c| c.name() == name) {
                    Some(counter) => {
                        let old = counter.set(*value);
                        (Some(old), counter.value())
                    }
                    None => {
                        let (min, max) = config.counter_bounds(name);
                        let counter = Counter::new(name.clone(), *value, min, max);
                        let new = counter.value();
                        self.counters.push(counter);
                        (None, new)
                    }
                };
                notifications.push(Notification::SetCounter {
                    player: self.name.clone(),
                    counter: name.clone(),
                    old,
                    new,
                });
            }

            EventKind::DelCounter { name } => {
                let index = self
                    .counters
                    .iter()
                    .position(|c| c.name() == name)
                    .ok_or_else(|| ProtocolError::UnknownCounter {
                        player: self.id,
                        counter: name.clone(),
                    })?;
                self.counters.remove(index);
            }

            EventKind::PlayerId { id } => self.reassign_id(*id),

            EventKind::Draw { count, cards } => {
                self.zone_or_err(DECK_ZONE)?;
                self.zone_or_err(HAND_ZONE)?;
                let total = (*count).max(cards.len());

                if let Some(deck) = self.zone_mut(DECK_ZONE) {
                    let removed = deck.remove_hidden(total);
                    if removed < total {
                        debug!(
                            wanted = total,
                            removed,
                            "deck held fewer hidden cards than were drawn"
                        );
                    }
                }

                let owner = self.id;
                if let Some(hand) = self.zone_mut(HAND_ZONE) {
                    for drawn in cards {
                        let card = CardItem::new(drawn.id, Some(drawn.name.clone()), owner, HAND_ZONE);
                        hand.insert(card, APPEND, 0);
                    }
                    hand.add_hidden(total - cards.len());
                }
            }

            EventKind::MoveCard {
                card_id,
                card_name,
                start_zone,
                target_zone,
                x,
                y,
                face_down,
            } => {
                if !self.zone_or_err(start_zone)?.can_take(*card_id) {
                    return Err(ProtocolError::UnknownCard {
                        player: self.id,
                        zone: start_zone.clone(),
                        card: *card_id,
                    });
                }
                self.zone_or_err(target_zone)?;

                let owner = self.id;
                let mut card = match self.zone_mut(start_zone).and_then(|z| z.take(*card_id)) {
                    Some(Removed::Card(card)) => card,
                    Some(Removed::Hidden) | None => {
                        CardItem::new(*card_id, None, owner, target_zone.as_str())
                    }
                };
                if card_name.is_some() {
                    card.name = card_name.clone();
                }
                card.face_down = *face_down;
                let shown = card.name.clone();

                if let Some(target) = self.zone_mut(target_zone) {
                    target.insert(card, *x, *y);
                }
                notifications.push(Notification::MoveCard {
                    player: self.name.clone(),
                    card: shown,
                    start_zone: start_zone.clone(),
                    target_zone: target_zone.clone(),
                });
            }

            other => return Err(ProtocolError::UnhandledEventKind(other.name().to_string())),
        }

        Ok(notifications)
    }
}
