//! Local user actions and the intents they turn into.
//!
//! An action is what the operator asked for; an intent is the request sent
//! to the server. Nothing here touches game state: the effect of an intent
//! only shows up once the server answers with an event.

use crate::card::CardId;
use crate::events::CardAttr;
use serde::{Deserialize, Serialize};

/// Everything the operator can ask for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserAction {
    // ==================== Selection Actions ====================
    /// Tap every selected card
    Tap,
    /// Untap every selected card
    Untap,
    /// Put one more counter on every selected card
    AddCounter,
    /// Take one counter off every selected card
    RemoveCounter,
    /// Set the counter count of every selected card
    SetCounters(u32),
    /// Lay the selected cards out on a grid anchored at the leftmost card
    Rearrange,

    // ==================== Player Actions ====================
    /// Untap every card on the local table
    UntapAll,
    IncLife,
    DecLife,
    SetLife(i64),
    Shuffle,
    DrawCards(u32),
    RollDice { sides: u32 },
    CreateToken { name: String },

    // ==================== Session ====================
    /// Signal that the pre-game setup is done
    ReadyStart,
    /// Submit a deck list
    SubmitDeck(Vec<String>),
    /// Chat
    Say(String),
}

impl UserAction {
    /// Whether the action operates on the card selection
    pub fn needs_selection(&self) -> bool {
        matches!(
            self,
            UserAction::Tap
                | UserAction::Untap
                | UserAction::AddCounter
                | UserAction::RemoveCounter
                | UserAction::SetCounters(_)
                | UserAction::Rearrange
        )
    }
}

/// Outbound request to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    SetCardAttr {
        zone: String,
        card_id: CardId,
        attr: CardAttr,
    },
    IncCounter {
        counter: String,
        delta: i64,
    },
    SetCounter {
        counter: String,
        value: i64,
    },
    Shuffle,
    DrawCards {
        count: u32,
    },
    RollDice {
        sides: u32,
    },
    CreateToken {
        zone: String,
        name: String,
        x: i32,
        y: i32,
    },
    MoveCard {
        card_id: CardId,
        start_zone: String,
        target_zone: String,
        x: i32,
        y: i32,
        face_down: bool,
    },
    ReadyStart,
    SubmitDeck {
        cards: Vec<String>,
    },
    Say {
        message: String,
    },
}
