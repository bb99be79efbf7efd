//! WebSocket protocol messages between the client and the game server.

use cardtable_core::{Intent, RawEvent, RosterEntry};
use serde::{Deserialize, Serialize};

/// Messages sent from client to server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Request produced by a local action
    Intent(Intent),

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// One event of the ordered game stream
    Event(RawEvent),

    /// Players already at the table when we joined
    PlayerList { players: Vec<RosterEntry> },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_event_frame() {
        let text = json!({
            "type": "Event",
            "payload": {
                "player_id": 2,
                "public": true,
                "kind": "rollDice",
                "data": { "sides": 6, "result": 4 }
            }
        })
        .to_string();

        match serde_json::from_str::<ServerMessage>(&text).unwrap() {
            ServerMessage::Event(raw) => {
                assert_eq!(raw.kind, "rollDice");
                assert_eq!(raw.player_id, 2);
                assert!(raw.player_name.is_empty());
            }
            other => panic!("unexpected message {:?}", other),
        }
    }

    #[test]
    fn test_intent_frame() {
        let msg = ClientMessage::Intent(Intent::DrawCards { count: 2 });
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "type": "Intent",
                "payload": { "intent": "drawCards", "count": 2 }
            })
        );
        assert_eq!(
            serde_json::to_value(&ClientMessage::Ping).unwrap(),
            json!({ "type": "Ping" })
        );
    }
}
