//! The set of players in a game.

use crate::card::{CardId, CardItem};
use crate::game::ProtocolError;
use crate::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Players keyed by id, enumerated in the order they were registered
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRegistry {
    players: HashMap<PlayerId, Player>,
    /// Registration order for enumeration
    order: Vec<PlayerId>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with a single player
    pub fn with_player(player: Player) -> Self {
        let id = player.id();
        Self {
            players: HashMap::from([(id, player)]),
            order: vec![id],
        }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.players.contains_key(&id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    /// Register a player. An id that is already present is rejected and the
    /// registry is left as it was.
    pub fn insert(&mut self, player: Player) -> Result<&mut Player, ProtocolError> {
        let id = player.id();
        if self.players.contains_key(&id) {
            return Err(ProtocolError::DuplicatePlayer(id));
        }
        self.order.push(id);
        Ok(self.players.entry(id).or_insert(player))
    }

    /// Detach a player, handing ownership to the caller
    pub fn remove(&mut self, id: PlayerId) -> Option<Player> {
        let player = self.players.remove(&id)?;
        self.order.retain(|&p| p != id);
        Some(player)
    }

    /// Move a player to a new id, keeping its place in the enumeration order
    pub fn rekey(&mut self, old: PlayerId, new: PlayerId) -> Result<(), ProtocolError> {
        if old == new {
            return Ok(());
        }
        if self.players.contains_key(&new) {
            return Err(ProtocolError::DuplicatePlayer(new));
        }
        let mut player = self
            .players
            .remove(&old)
            .ok_or(ProtocolError::UnknownPlayer(old))?;
        player.reassign_id(new);
        self.players.insert(new, player);
        for id in &mut self.order {
            if *id == old {
                *id = new;
            }
        }
        Ok(())
    }

    /// Players in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.order.iter().filter_map(|id| self.players.get(id))
    }

    pub fn ids(&self) -> &[PlayerId] {
        &self.order
    }

    /// Find a materialized card anywhere in the game
    pub fn find_card(&self, id: CardId) -> Option<&CardItem> {
        self.iter().find_map(|p| p.card(id))
    }

    /// Owner and zone currently holding a card
    pub fn locate_card(&self, id: CardId) -> Option<(PlayerId, &str)> {
        self.find_card(id).map(|c| (c.owner, c.zone.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::events::EventKind;

    fn player(id: PlayerId, name: &str) -> Player {
        Player::new(id, name, false, &GameConfig::default())
    }

    #[test]
    fn test_insert_and_enumerate_in_order() {
        let mut registry = PlayerRegistry::new();
        registry.insert(player(3, "C")).unwrap();
        registry.insert(player(1, "A")).unwrap();
        registry.insert(player(2, "B")).unwrap();

        let names: Vec<&str> = registry.iter().map(Player::name).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
        assert_eq!(registry.ids(), &[3, 1, 2]);
    }

    #[test]
    fn test_seeded_registry() {
        let mut registry = PlayerRegistry::with_player(player(4, "D"));
        assert_eq!(registry.ids(), &[4]);
        assert_eq!(registry.get(4).unwrap().name(), "D");
        assert_eq!(
            registry.insert(player(4, "D")).unwrap_err(),
            ProtocolError::DuplicatePlayer(4)
        );
    }

    #[test]
    fn test_duplicate_insert_leaves_registry_unchanged() {
        let mut registry = PlayerRegistry::new();
        registry.insert(player(1, "A")).unwrap();
        let err = registry.insert(player(1, "Impostor")).unwrap_err();

        assert_eq!(err, ProtocolError::DuplicatePlayer(1));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(1).unwrap().name(), "A");
    }

    #[test]
    fn test_remove() {
        let mut registry = PlayerRegistry::new();
        registry.insert(player(1, "A")).unwrap();
        registry.insert(player(2, "B")).unwrap();

        let removed = registry.remove(1).unwrap();
        assert_eq!(removed.name(), "A");
        assert_eq!(registry.ids(), &[2]);
        assert!(registry.remove(1).is_none());
    }

    #[test]
    fn test_rekey() {
        let mut registry = PlayerRegistry::new();
        registry.insert(player(1, "A")).unwrap();
        registry.insert(player(2, "B")).unwrap();

        assert_eq!(registry.rekey(1, 2), Err(ProtocolError::DuplicatePlayer(2)));
        registry.rekey(1, 7).unwrap();
        assert_eq!(registry.ids(), &[7, 2]);
        assert_eq!(registry.get(7).unwrap().id(), 7);
        assert!(!registry.contains(1));
    }

    #[test]
    fn test_locate_card() {
        let config = GameConfig::default();
        let mut registry = PlayerRegistry::new();
        let bob = registry.insert(player(2, "B")).unwrap();
        bob.apply_event(
            &EventKind::CreateToken {
                zone: "table".into(),
                card_id: 40,
                name: "Soldier".into(),
                x: 0,
                y: 0,
            },
            &config,
        )
        .unwrap();

        assert_eq!(registry.locate_card(40), Some((2, "table")));
        assert_eq!(registry.locate_card(41), None);
    }
}
