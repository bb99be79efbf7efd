//! Card zones.
//!
//! A zone holds the cards whose identity this client knows plus a count of
//! cards it cannot see. What is materialized depends on the zone's
//! [`Visibility`] and on whether the owner is the local player:
//!
//! - `Public`: every card is materialized.
//! - `Private`: materialized only for the local owner, and never for a
//!   `Stack` (nobody knows the order of their own deck).
//! - `TopCardPublic`: only the top card is known; covering it folds the
//!   previous top into the hidden count.
//!
//! A card entering a zone that does not materialize identities is
//! forgotten, so no hidden card keeps an id around.

use crate::card::{CardId, CardItem};
use crate::config::ZoneSpec;
use crate::layout;
use crate::player::PlayerId;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Insertion coordinate meaning "append at the end"
pub const APPEND: i32 = -1;

/// What a non-owning client may know about a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    TopCardPublic,
}

/// How cards in a zone are positioned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// Single row, re-laid out on every insertion and removal
    Hand,
    /// Free placement at explicit coordinates
    Table,
    /// Ordered pile, last card on top
    Stack,
}

/// Result of taking a card out of a zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removed {
    /// The card was materialized in the zone
    Card(CardItem),
    /// One of the hidden cards was taken; its identity comes from the event
    Hidden,
}

/// An ordered collection of cards owned by one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    name: String,
    owner: PlayerId,
    owner_local: bool,
    visibility: Visibility,
    layout: LayoutKind,
    hand_spacing: i32,
    cards: Vec<CardItem>,
    hidden: usize,
    asserted_count: Option<usize>,
}

impl Zone {
    pub fn new(spec: &ZoneSpec, owner: PlayerId, owner_local: bool, hand_spacing: i32) -> Self {
        Self {
            name: spec.name.clone(),
            owner,
            owner_local,
            visibility: spec.visibility,
            layout: spec.layout,
            hand_spacing,
            cards: Vec::new(),
            hidden: 0,
            asserted_count: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn layout(&self) -> LayoutKind {
        self.layout
    }

    /// Materialized cards in zone order
    pub fn cards(&self) -> &[CardItem] {
        &self.cards
    }

    /// Number of cards present but not identified
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    /// Total number of cards, known or not
    pub fn card_count(&self) -> usize {
        self.hidden.saturating_add(self.cards.len())
    }

    pub fn is_empty(&self) -> bool {
        self.card_count() == 0
    }

    /// Count from the last full-zone dump, if any was received
    pub fn asserted_count(&self) -> Option<usize> {
        self.asserted_count
    }

    /// Whether cards entering this zone keep their identity
    pub fn tracks_identities(&self) -> bool {
        match self.visibility {
            Visibility::Public => true,
            Visibility::Private => self.owner_local && self.layout != LayoutKind::Stack,
            Visibility::TopCardPublic => false,
        }
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    pub fn card(&self, id: CardId) -> Option<&CardItem> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: CardId) -> Option<&mut CardItem> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Whether [`Zone::take`] would succeed for `id`
    pub fn can_take(&self, id: CardId) -> bool {
        self.contains(id) || self.hidden > 0
    }

    /// Remove a card. Falls back to one of the hidden cards when `id` is
    /// not materialized here.
    pub fn take(&mut self, id: CardId) -> Option<Removed> {
        if let Some(index) = self.cards.iter().position(|c| c.id == id) {
            let card = self.cards.remove(index);
            self.relayout();
            return Some(Removed::Card(card));
        }
        if self.hidden > 0 {
            self.hidden -= 1;
            return Some(Removed::Hidden);
        }
        None
    }

    /// Insert a card at `(x, y)`.
    ///
    /// For hands `x` is the insertion index ([`APPEND`] or out of range
    /// appends), for tables it is the placement, stacks always put the card
    /// on top. Returns `false` when the card was folded into the hidden
    /// count instead of being materialized.
    pub fn insert(&mut self, mut card: CardItem, x: i32, y: i32) -> bool {
        card.owner = self.owner;
        card.zone = self.name.clone();

        if self.visibility == Visibility::TopCardPublic {
            if card.name.is_none() {
                self.add_hidden(1);
                return false;
            }
            self.add_hidden(self.cards.len());
            self.cards.clear();
            self.cards.push(card);
            return true;
        }

        if !self.tracks_identities() {
            self.add_hidden(1);
            return false;
        }

        match self.layout {
            LayoutKind::Hand => {
                let index = usize::try_from(x)
                    .ok()
                    .filter(|&i| i <= self.cards.len())
                    .unwrap_or(self.cards.len());
                self.cards.insert(index, card);
                self.relayout();
            }
            LayoutKind::Table => {
                card.position.x = x;
                card.position.y = y;
                self.cards.push(card);
            }
            LayoutKind::Stack => self.cards.push(card),
        }
        true
    }

    /// Add unidentified cards. Counts come off the wire, so the total
    /// saturates instead of overflowing.
    pub fn add_hidden(&mut self, count: usize) {
        self.hidden = self.hidden.saturating_add(count);
    }

    /// Remove up to `count` hidden cards, returning how many were removed
    pub fn remove_hidden(&mut self, count: usize) -> usize {
        let removed = count.min(self.hidden);
        self.hidden -= removed;
        removed
    }

    /// Drop every card, known or not
    pub fn clear(&mut self) {
        self.cards.clear();
        self.hidden = 0;
        self.asserted_count = None;
    }

    /// Record a full-zone count and reconcile the hidden part with it
    pub fn assert_count(&mut self, count: usize) {
        self.asserted_count = Some(count);
        if count < self.cards.len() {
            warn!(
                zone = %self.name,
                owner = self.owner,
                asserted = count,
                known = self.cards.len(),
                "zone dump reports fewer cards than are materialized"
            );
            self.hidden = 0;
        } else {
            self.hidden = count - self.cards.len();
        }
    }

    /// Re-lay out the whole zone according to its layout kind
    pub fn relayout(&mut self) {
        if self.layout != LayoutKind::Hand {
            return;
        }
        let positions = layout::hand_positions(self.cards.len(), self.hand_spacing);
        for (card, position) in self.cards.iter_mut().zip(positions) {
            card.position = position;
        }
    }

    pub(crate) fn set_owner(&mut self, owner: PlayerId) {
        self.owner = owner;
        for card in &mut self.cards {
            card.owner = owner;
        }
    }
}
