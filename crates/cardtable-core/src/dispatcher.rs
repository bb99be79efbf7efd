//! Turns local user actions into outbound intents.
//!
//! The dispatcher never mutates the game: it only reads the current state to
//! validate an action and compute its intents. Validation is all-or-nothing,
//! so a rejected action sends nothing at all.

use crate::actions::{Intent, UserAction};
use crate::card::{CardItem, Position};
use crate::config::LIFE_COUNTER;
use crate::counter::Counter;
use crate::events::CardAttr;
use crate::game::GameStateMachine;
use crate::layout;
use crate::player::TABLE_ZONE;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Lookup of card names that may be created or put in a deck
pub trait CardCatalog {
    fn resolve_card(&self, name: &str) -> bool;
}

impl CardCatalog for HashSet<String> {
    fn resolve_card(&self, name: &str) -> bool {
        self.contains(name)
    }
}

/// Catalog that accepts every name, for sessions without a card database
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenCatalog;

impl CardCatalog for OpenCatalog {
    fn resolve_card(&self, _name: &str) -> bool {
        true
    }
}

/// Reasons a local action is refused before anything is sent
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum LocalValidationError {
    #[error("No cards selected")]
    EmptySelection,

    #[error("Unknown card: {0}")]
    UnknownCard(String),

    #[error("Value {value} is outside {min}..={max}")]
    CounterBoundExceeded { value: i64, min: i64, max: i64 },

    #[error("A dice needs between {min} and {max} sides, not {sides}")]
    InvalidDice { sides: u32, min: u32, max: u32 },
}

/// Validates user actions and computes the intents for them
#[derive(Debug, Clone)]
pub struct ActionDispatcher<C> {
    catalog: C,
}

impl<C: CardCatalog> ActionDispatcher<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Compute the intents for `action` on `selection`.
    ///
    /// Per-card actions produce one intent per selected card, in selection
    /// order.
    pub fn dispatch(
        &self,
        action: &UserAction,
        selection: &[&CardItem],
        game: &GameStateMachine,
    ) -> Result<Vec<Intent>, LocalValidationError> {
        if action.needs_selection() && selection.is_empty() {
            return Err(LocalValidationError::EmptySelection);
        }
        let config = game.config();
        let max_counters = config.max_counters_on_card;

        let intents = match action {
            UserAction::Tap => set_attr(selection, |_| CardAttr::Tapped(true)),
            UserAction::Untap => set_attr(selection, |_| CardAttr::Tapped(false)),

            UserAction::AddCounter => {
                if let Some(card) = selection.iter().find(|c| c.counters >= max_counters) {
                    return Err(card_bound(i64::from(card.counters) + 1, max_counters));
                }
                set_attr(selection, |c| CardAttr::Counters(c.counters + 1))
            }

            UserAction::RemoveCounter => {
                if selection.iter().any(|c| c.counters == 0) {
                    return Err(card_bound(-1, max_counters));
                }
                set_attr(selection, |c| CardAttr::Counters(c.counters - 1))
            }

            UserAction::SetCounters(value) => {
                if *value > max_counters {
                    return Err(card_bound(i64::from(*value), max_counters));
                }
                set_attr(selection, |_| CardAttr::Counters(*value))
            }

            UserAction::Rearrange => {
                let current: Vec<Position> = selection.iter().map(|c| c.position).collect();
                let targets =
                    layout::rearrange_positions(&current, config.raster_width, config.raster_height);
                selection
                    .iter()
                    .zip(targets)
                    .map(|(card, target)| Intent::MoveCard {
                        card_id: card.id,
                        start_zone: card.zone.clone(),
                        target_zone: card.zone.clone(),
                        x: target.x,
                        y: target.y,
                        face_down: card.face_down,
                    })
                    .collect()
            }

            UserAction::UntapAll => game
                .local_player()
                .and_then(|p| p.zone(TABLE_ZONE))
                .map(|table| {
                    table
                        .cards()
                        .iter()
                        .map(|card| Intent::SetCardAttr {
                            zone: TABLE_ZONE.to_string(),
                            card_id: card.id,
                            attr: CardAttr::Tapped(false),
                        })
                        .collect()
                })
                .unwrap_or_default(),

            UserAction::IncLife => vec![life_delta(1)],
            UserAction::DecLife => vec![life_delta(-1)],

            UserAction::SetLife(value) => {
                let life = game
                    .local_player()
                    .and_then(|p| p.counter(LIFE_COUNTER))
                    .cloned()
                    .unwrap_or_else(|| {
                        let (min, max) = config.counter_bounds(LIFE_COUNTER);
                        Counter::new(LIFE_COUNTER, min, min, max)
                    });
                if !life.accepts(*value) {
                    return Err(LocalValidationError::CounterBoundExceeded {
                        value: *value,
                        min: life.min(),
                        max: life.max(),
                    });
                }
                vec![Intent::SetCounter {
                    counter: LIFE_COUNTER.to_string(),
                    value: *value,
                }]
            }

            UserAction::Shuffle => vec![Intent::Shuffle],

            UserAction::DrawCards(0) => Vec::new(),
            UserAction::DrawCards(count) => vec![Intent::DrawCards { count: *count }],

            UserAction::RollDice { sides } => {
                let dice = &config.dice;
                if !(dice.min_sides..=dice.max_sides).contains(sides) {
                    return Err(LocalValidationError::InvalidDice {
                        sides: *sides,
                        min: dice.min_sides,
                        max: dice.max_sides,
                    });
                }
                vec![Intent::RollDice { sides: *sides }]
            }

            UserAction::CreateToken { name } => {
                self.resolve(name)?;
                vec![Intent::CreateToken {
                    zone: config.token_zone.clone(),
                    name: name.clone(),
                    x: 0,
                    y: 0,
                }]
            }

            UserAction::ReadyStart => vec![Intent::ReadyStart],

            UserAction::SubmitDeck(cards) => {
                for name in cards {
                    self.resolve(name)?;
                }
                vec![Intent::SubmitDeck {
                    cards: cards.clone(),
                }]
            }

            UserAction::Say(message) => vec![Intent::Say {
                message: message.clone(),
            }],
        };

        debug!(?action, selected = selection.len(), intents = intents.len(), "action dispatched");
        Ok(intents)
    }

    fn resolve(&self, name: &str) -> Result<(), LocalValidationError> {
        if self.catalog.resolve_card(name) {
            Ok(())
        } else {
            Err(LocalValidationError::UnknownCard(name.to_string()))
        }
    }
}

fn set_attr(selection: &[&CardItem], attr: impl Fn(&CardItem) -> CardAttr) -> Vec<Intent> {
    selection
        .iter()
        .map(|card| Intent::SetCardAttr {
            zone: card.zone.clone(),
            card_id: card.id,
            attr: attr(card),
        })
        .collect()
}

fn card_bound(value: i64, max: u32) -> LocalValidationError {
    LocalValidationError::CounterBoundExceeded {
        value,
        min: 0,
        max: i64::from(max),
    }
}

fn life_delta(delta: i64) -> Intent {
    Intent::IncCounter {
        counter: LIFE_COUNTER.to_string(),
        delta,
    }
}
