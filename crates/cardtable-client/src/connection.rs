//! WebSocket connection to the game server.

use crate::config::ClientConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::Session;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};

/// Interval between keepalive pings
const KEEPALIVE: Duration = Duration::from_secs(30);

/// Connect, then feed server messages and stdin commands to the session
/// until either side closes.
pub async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let (ws_stream, _) = connect_async(config.server_url.as_str()).await?;
    info!("Connected to {}", config.server_url);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Create channel for outgoing messages
    let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();

    // Spawn task to forward messages from channel to WebSocket
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
        let _ = ws_sender.close().await;
    });

    let mut session = Session::new(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut keepalive = tokio::time::interval(KEEPALIVE);

    loop {
        tokio::select! {
            msg = ws_receiver.next() => match msg {
                Some(Ok(Message::Text(text))) => {
                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(msg) => {
                            session.handle_server_message(msg);
                        }
                        Err(e) => warn!("Invalid message from server: {}", e),
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("Server closed the connection");
                    break;
                }
                Some(Err(e)) => {
                    error!("WebSocket error: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            },

            line = lines.next_line() => match line? {
                Some(line) => {
                    for msg in session.handle_command_line(&line) {
                        let _ = tx.send(msg);
                    }
                }
                None => {
                    info!("Input closed, leaving the table");
                    break;
                }
            },

            _ = keepalive.tick() => {
                let _ = tx.send(ClientMessage::Ping);
            }
        }
    }

    // Let queued intents go out before the socket closes
    drop(tx);
    let _ = send_task.await;

    session.finish();
    Ok(())
}
