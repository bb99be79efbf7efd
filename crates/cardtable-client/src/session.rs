//! One seat at a table: the mirrored game plus the local action path.

use crate::catalog::Catalog;
use crate::command;
use crate::config::ClientConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use cardtable_core::{ActionDispatcher, GameStateMachine, Notification};
use tracing::{debug, info, warn};

/// Client-side session state
pub struct Session {
    game: GameStateMachine,
    dispatcher: ActionDispatcher<Catalog>,
}

impl Session {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            game: GameStateMachine::new(config.player_id, config.player_name, config.game),
            dispatcher: ActionDispatcher::new(config.catalog),
        }
    }

    pub fn game(&self) -> &GameStateMachine {
        &self.game
    }

    /// Apply a server message and log what it changed
    pub fn handle_server_message(&mut self, msg: ServerMessage) -> Vec<Notification> {
        let notifications = match msg {
            ServerMessage::Event(raw) => {
                let kind = raw.kind.clone();
                match raw.decode() {
                    // Protocol errors are already reported by the state machine
                    Ok(event) => self.game.apply_event(&event).unwrap_or_default(),
                    Err(e) => {
                        warn!("Malformed {} event: {}", kind, e);
                        Vec::new()
                    }
                }
            }
            ServerMessage::PlayerList { players } => self.game.apply_roster(&players),
            ServerMessage::Error { message } => {
                warn!("Server error: {}", message);
                Vec::new()
            }
            ServerMessage::Pong => {
                debug!("Pong");
                Vec::new()
            }
        };

        for notification in &notifications {
            info!("{}", notification);
        }
        notifications
    }

    /// Turn an operator command line into outbound messages.
    ///
    /// Nothing is sent for a line that does not parse or an action that
    /// fails local validation.
    pub fn handle_command_line(&self, line: &str) -> Vec<ClientMessage> {
        let command = match command::parse(line) {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                return Vec::new();
            }
        };

        let selection = self.game.select(&command.selection);
        if selection.len() < command.selection.len() {
            debug!(
                typed = command.selection.len(),
                kept = selection.len(),
                "dropped ids that are not local cards"
            );
        }

        match self.dispatcher.dispatch(&command.action, &selection, &self.game) {
            Ok(intents) => intents.into_iter().map(ClientMessage::Intent).collect(),
            Err(e) => {
                warn!("Cannot {:?}: {}", command.action, e);
                Vec::new()
            }
        }
    }

    /// Leave the table, logging every player that goes away
    pub fn finish(self) -> Vec<Notification> {
        let notifications = self.game.end_session();
        for notification in &notifications {
            info!("{}", notification);
        }
        notifications
    }
}
