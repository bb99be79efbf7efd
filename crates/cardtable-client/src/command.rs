//! Operator commands typed on stdin.
//!
//! One command per line: a verb followed by its arguments. Selection verbs
//! take the ids of the local cards to operate on.

use cardtable_core::{CardId, UserAction};
use thiserror::Error;

/// Sides rolled when `roll` is given no argument
pub const DEFAULT_DICE_SIDES: u32 = 20;

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub action: UserAction,
    /// Local card ids, in the order they were typed
    pub selection: Vec<CardId>,
}

impl Command {
    fn new(action: UserAction) -> Self {
        Self {
            action,
            selection: Vec::new(),
        }
    }

    fn on(action: UserAction, selection: Vec<CardId>) -> Self {
        Self { action, selection }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
}

/// Parse one input line
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let command = match verb {
        "" => return Err(CommandError::Empty),

        "tap" => Command::on(UserAction::Tap, ids(&args)?),
        "untap" => Command::on(UserAction::Untap, ids(&args)?),
        "counter+" => Command::on(UserAction::AddCounter, ids(&args)?),
        "counter-" => Command::on(UserAction::RemoveCounter, ids(&args)?),
        "counters" => {
            let (value, cards) = args
                .split_first()
                .ok_or(CommandError::MissingArgument("counters"))?;
            Command::on(UserAction::SetCounters(number(value)?), ids(cards)?)
        }
        "rearrange" => Command::on(UserAction::Rearrange, ids(&args)?),

        "untapall" => Command::new(UserAction::UntapAll),
        "life+" => Command::new(UserAction::IncLife),
        "life-" => Command::new(UserAction::DecLife),
        "life" => {
            let value = args.first().ok_or(CommandError::MissingArgument("life"))?;
            Command::new(UserAction::SetLife(number(value)?))
        }
        "shuffle" => Command::new(UserAction::Shuffle),
        "draw" => {
            let count = args.first().map(|n| number(n)).transpose()?.unwrap_or(1);
            Command::new(UserAction::DrawCards(count))
        }
        "roll" => {
            let sides = args
                .first()
                .map(|n| number(n))
                .transpose()?
                .unwrap_or(DEFAULT_DICE_SIDES);
            Command::new(UserAction::RollDice { sides })
        }
        "token" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("token"));
            }
            Command::new(UserAction::CreateToken {
                name: rest.to_string(),
            })
        }
        "ready" => Command::new(UserAction::ReadyStart),
        "deck" => {
            let cards: Vec<String> = rest
                .split(';')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from)
                .collect();
            if cards.is_empty() {
                return Err(CommandError::MissingArgument("deck"));
            }
            Command::new(UserAction::SubmitDeck(cards))
        }
        "say" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument("say"));
            }
            Command::new(UserAction::Say(rest.to_string()))
        }

        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    Ok(command)
}

fn number<T: std::str::FromStr>(arg: &str) -> Result<T, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

fn ids(args: &[&str]) -> Result<Vec<CardId>, CommandError> {
    args.iter().map(|arg| number(arg)).collect()
}
