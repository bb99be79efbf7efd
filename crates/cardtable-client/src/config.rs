//! Client settings read from the environment.

use crate::catalog::Catalog;
use anyhow::Context;
use cardtable_core::{GameConfig, PlayerId};

/// Everything needed to join a table
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub server_url: String,
    pub player_id: PlayerId,
    pub player_name: String,
    pub game: GameConfig,
    pub catalog: Catalog,
}

impl ClientConfig {
    /// Read `SERVER_URL`, `PLAYER_ID`, `PLAYER_NAME`, `CARDTABLE_CONFIG` and
    /// `CARD_CATALOG`
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let server_url = var("SERVER_URL").unwrap_or_else(|| "ws://127.0.0.1:8080".into());
        let player_id = match var("PLAYER_ID") {
            Some(id) => id.parse().with_context(|| format!("Invalid PLAYER_ID {}", id))?,
            None => 0,
        };
        let player_name = var("PLAYER_NAME").unwrap_or_else(|| "Player".into());

        let game = match var("CARDTABLE_CONFIG") {
            Some(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Cannot read game config {}", path))?;
                GameConfig::from_json(&text)?
            }
            None => GameConfig::default(),
        };

        let catalog = match var("CARD_CATALOG") {
            Some(path) => {
                Catalog::load(&path).with_context(|| format!("Cannot read card catalog {}", path))?
            }
            None => Catalog::Open,
        };

        Ok(Self {
            server_url,
            player_id,
            player_name,
            game,
            catalog,
        })
    }
}
