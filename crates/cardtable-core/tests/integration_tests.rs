//! Integration tests for the Cardtable state mirror.
//!
//! These tests drive whole sessions through the public API: roster, local
//! actions round-tripping through the server, and long event streams.

use cardtable_core::*;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::collections::HashSet;

const ALICE: PlayerId = 1;
const BOB: PlayerId = 2;
const CAROL: PlayerId = 3;

const ZONES: [&str; 6] = ["table", "hand", "deck", "graveyard", "rfg", "sb"];

/// Alice is local, Bob and Carol come from the roster
fn seated_game() -> GameStateMachine {
    let mut game = GameStateMachine::new(ALICE, "Alice", GameConfig::default());
    game.apply_roster(&[
        RosterEntry {
            id: BOB,
            name: "Bob".into(),
        },
        RosterEntry {
            id: CAROL,
            name: "Carol".into(),
        },
    ]);
    game
}

fn catalog() -> HashSet<String> {
    ["Goblin", "Soldier", "Island"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Every materialized card lives in exactly one zone, and its back-reference
/// names that zone
fn assert_single_home(game: &GameStateMachine) {
    let mut seen = HashSet::new();
    for player in game.players().iter() {
        for zone in player.zones() {
            for card in zone.cards() {
                assert!(seen.insert(card.id), "card {} is in two zones", card.id);
                assert_eq!(card.owner, player.id());
                assert_eq!(card.zone, zone.name());
            }
        }
    }
}

/// Play what the server would send back for an intent from the local player
fn echo(game: &mut GameStateMachine, intent: &Intent, card_id: CardId) -> Vec<Notification> {
    let kind = match intent.clone() {
        Intent::CreateToken { zone, name, x, y } => EventKind::CreateToken {
            zone,
            card_id,
            name,
            x,
            y,
        },
        Intent::SetCardAttr {
            zone,
            card_id,
            attr,
        } => EventKind::SetCardAttr {
            zone,
            card_id,
            attr,
        },
        Intent::MoveCard {
            card_id,
            start_zone,
            target_zone,
            x,
            y,
            face_down,
        } => {
            let kind = EventKind::MoveCard {
                card_id,
                card_name: None,
                start_zone,
                target_zone,
                x,
                y,
                face_down,
            };
            let mut notifications = game
                .apply_event(&ServerEvent::private(ALICE, kind.clone()))
                .unwrap();
            notifications.extend(game.apply_event(&ServerEvent::public(ALICE, kind)).unwrap());
            return notifications;
        }
        other => panic!("no echo for {:?}", other),
    };
    game.apply_event(&ServerEvent::public(ALICE, kind)).unwrap()
}

#[test]
fn test_session_lifecycle() {
    let mut game = seated_game();
    assert_eq!(game.player_count(), 3);
    assert_eq!(game.phase(), GamePhase::NotStarted);

    game.apply_event(&ServerEvent::public(BOB, EventKind::GameStart))
        .unwrap();
    assert_eq!(game.phase(), GamePhase::Started);

    let notes = game
        .apply_event(&ServerEvent::public(CAROL, EventKind::ReadyStart))
        .unwrap();
    assert!(notes.contains(&Notification::ShowSetupSurface));
    assert_eq!(game.phase(), GamePhase::AwaitingRestart);

    let notes = game
        .apply_event(&ServerEvent::public(CAROL, EventKind::Leave))
        .unwrap();
    assert_eq!(
        notes.last().map(ToString::to_string),
        Some("Carol (#3) left the table".to_string())
    );

    let removed = game.end_session();
    assert_eq!(removed.len(), 2);
    match removed.last() {
        Some(Notification::PlayerRemoved { player }) => {
            assert_eq!(player.id(), ALICE);
            assert!(player.is_local());
        }
        other => panic!("unexpected notification {:?}", other),
    }
}

#[test]
fn test_local_token_round_trip() {
    let mut game = seated_game();
    let dispatcher = ActionDispatcher::new(catalog());

    let intents = dispatcher
        .dispatch(
            &UserAction::CreateToken {
                name: "Goblin".into(),
            },
            &[],
            &game,
        )
        .unwrap();
    // Nothing happens until the server answers
    assert_eq!(game.local_player().unwrap().card_count(), 0);

    let notes = echo(&mut game, &intents[0], 500);
    assert_eq!(notes[0].to_string(), "Alice creates token: Goblin");
    assert_eq!(game.card_location(500), Some((ALICE, "table")));

    let selection = game.select(&[500]);
    let intents = dispatcher.dispatch(&UserAction::Tap, &selection, &game).unwrap();
    echo(&mut game, &intents[0], 500);
    assert!(game.local_player().unwrap().card(500).unwrap().tapped);

    let intents = dispatcher.dispatch(&UserAction::UntapAll, &[], &game).unwrap();
    assert_eq!(intents.len(), 1);
    echo(&mut game, &intents[0], 500);
    assert!(!game.local_player().unwrap().card(500).unwrap().tapped);
}

#[test]
fn test_own_move_is_applied_once() {
    let mut game = seated_game();
    game.apply_event(&ServerEvent::public(
        ALICE,
        EventKind::CreateToken {
            zone: "table".into(),
            card_id: 9,
            name: "Soldier".into(),
            x: 10,
            y: 10,
        },
    ))
    .unwrap();

    let intent = Intent::MoveCard {
        card_id: 9,
        start_zone: "table".into(),
        target_zone: "graveyard".into(),
        x: 0,
        y: 0,
        face_down: false,
    };
    let notes = echo(&mut game, &intent, 9);

    // One log line from the private apply, nothing from the echo
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes[0].to_string(),
        "Alice moves Soldier from table to graveyard"
    );
    let alice = game.local_player().unwrap();
    assert_eq!(alice.zone("table").unwrap().card_count(), 0);
    assert_eq!(alice.zone("graveyard").unwrap().card_count(), 1);
    assert_single_home(&game);
}

#[test]
fn test_rearrange_round_trip() {
    let mut game = seated_game();
    for (id, x, y) in [(1, 50, 10), (2, 10, 40), (3, 30, 5)] {
        game.apply_event(&ServerEvent::public(
            ALICE,
            EventKind::CreateToken {
                zone: "table".into(),
                card_id: id,
                name: "Goblin".into(),
                x,
                y,
            },
        ))
        .unwrap();
    }

    let dispatcher = ActionDispatcher::new(OpenCatalog);
    let selection = game.select(&[1, 2, 3]);
    let intents = dispatcher
        .dispatch(&UserAction::Rearrange, &selection, &game)
        .unwrap();
    for intent in &intents {
        echo(&mut game, intent, 0);
    }

    let positions: Vec<Position> = [1, 2, 3]
        .iter()
        .map(|&id| game.local_player().unwrap().card(id).unwrap().position)
        .collect();
    assert_eq!(
        positions,
        vec![
            Position::new(10, 40),
            Position::new(46, 90),
            Position::new(82, 140),
        ]
    );
}

#[test]
fn test_hand_closes_gaps() {
    let mut game = seated_game();
    game.apply_event(&ServerEvent::private(
        ALICE,
        EventKind::SetupZones {
            deck: 60,
            sideboard: 15,
        },
    ))
    .unwrap();
    game.apply_event(&ServerEvent::private(
        ALICE,
        EventKind::Draw {
            count: 3,
            cards: vec![
                DrawnCard {
                    id: 11,
                    name: "Island".into(),
                },
                DrawnCard {
                    id: 12,
                    name: "Forest".into(),
                },
                DrawnCard {
                    id: 13,
                    name: "Swamp".into(),
                },
            ],
        },
    ))
    .unwrap();

    game.apply_event(&ServerEvent::private(
        ALICE,
        EventKind::MoveCard {
            card_id: 12,
            card_name: None,
            start_zone: "hand".into(),
            target_zone: "table".into(),
            x: 100,
            y: 100,
            face_down: false,
        },
    ))
    .unwrap();

    let hand = game.local_player().unwrap().zone("hand").unwrap();
    let layout: Vec<(CardId, i32, i32)> = hand
        .cards()
        .iter()
        .map(|c| (c.id, c.position.x, c.position.y))
        .collect();
    assert_eq!(layout, vec![(11, 0, 0), (13, 72, 0)]);

    let alice = game.local_player().unwrap();
    assert_eq!(alice.zone("deck").unwrap().card_count(), 57);
    assert_eq!(alice.card_count(), 75);
}

#[test]
fn test_opponent_hand_stays_hidden() {
    let mut game = seated_game();
    game.apply_event(&ServerEvent::public(
        BOB,
        EventKind::SetupZones {
            deck: 40,
            sideboard: 0,
        },
    ))
    .unwrap();
    game.apply_event(&ServerEvent::public(BOB, EventKind::Draw { count: 7, cards: vec![] }))
        .unwrap();

    // Bob plays an unseen card from hand: it becomes known on the table
    let notes = game
        .apply_event(&ServerEvent::public(
            BOB,
            EventKind::MoveCard {
                card_id: 77,
                card_name: Some("Lightning Bolt".into()),
                start_zone: "hand".into(),
                target_zone: "graveyard".into(),
                x: 0,
                y: 0,
                face_down: false,
            },
        ))
        .unwrap();
    assert_eq!(
        notes[0].to_string(),
        "Bob moves Lightning Bolt from hand to graveyard"
    );

    let bob = game.player(BOB).unwrap();
    assert_eq!(bob.zone("hand").unwrap().card_count(), 6);
    assert!(bob.zone("hand").unwrap().cards().is_empty());
    assert_eq!(game.card_location(77), Some((BOB, "graveyard")));
}

#[test]
fn test_unknown_wire_kind_is_contained() {
    let mut game = seated_game();
    let raw: RawEvent = serde_json::from_value(json!({
        "player_id": BOB,
        "public": true,
        "kind": "castSpell",
        "data": { "target": 3 }
    }))
    .unwrap();
    let event = raw.decode().unwrap();
    let before = game.players().clone();

    assert_eq!(
        game.apply_event(&event),
        Err(ProtocolError::UnhandledEventKind("castSpell".into()))
    );
    assert_eq!(game.players(), &before);

    let raw: RawEvent = serde_json::from_value(json!({
        "player_id": BOB,
        "public": true,
        "kind": "say",
        "data": { "message": "still here" }
    }))
    .unwrap();
    let notes = game.apply_event(&raw.decode().unwrap()).unwrap();
    assert_eq!(notes[0].to_string(), "Bob: still here");
}

#[test]
fn test_life_is_clamped() {
    let mut game = seated_game();
    for (value, expected) in [(37, 37), (-5, 0), (3_000_000_000, 2_000_000_000)] {
        game.apply_event(&ServerEvent::public(
            BOB,
            EventKind::SetCounter {
                name: "life".into(),
                value,
            },
        ))
        .unwrap();
        assert_eq!(
            game.player(BOB).unwrap().counter("life").unwrap().value(),
            expected
        );
    }
}

#[test]
fn test_rejected_action_sends_nothing() {
    let game = seated_game();
    let dispatcher = ActionDispatcher::new(catalog());
    let deck = UserAction::SubmitDeck(vec!["Island".into(), "Black Lotus".into()]);
    assert_eq!(
        dispatcher.dispatch(&deck, &[], &game),
        Err(LocalValidationError::UnknownCard("Black Lotus".into()))
    );
}

/// Random but well-formed traffic from every seat
#[test]
fn test_single_home_under_random_events() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut game = seated_game();
    let mut next_id: CardId = 1000;
    let players = [ALICE, BOB, CAROL];

    for &player in &players {
        let setup = EventKind::SetupZones {
            deck: 30,
            sideboard: 5,
        };
        let event = if player == ALICE {
            ServerEvent::private(player, setup)
        } else {
            ServerEvent::public(player, setup)
        };
        game.apply_event(&event).unwrap();
    }

    for _ in 0..2000 {
        let player = *players.choose(&mut rng).unwrap();
        let local = player == ALICE;

        let (known, hidden): (Vec<(CardId, String)>, Vec<String>) = {
            let p = game.player(player).unwrap();
            (
                p.cards().map(|c| (c.id, c.zone.clone())).collect(),
                p.zones()
                    .iter()
                    .filter(|z| z.hidden() > 0)
                    .map(|z| z.name().to_string())
                    .collect(),
            )
        };

        let kind = match rng.gen_range(0..5) {
            0 => {
                next_id += 1;
                EventKind::CreateToken {
                    zone: ["table", "graveyard", "rfg"].choose(&mut rng).unwrap().to_string(),
                    card_id: next_id,
                    name: "Goblin".into(),
                    x: rng.gen_range(0..500),
                    y: rng.gen_range(0..500),
                }
            }
            1 if !known.is_empty() => {
                let (card_id, zone) = known.choose(&mut rng).unwrap().clone();
                EventKind::MoveCard {
                    card_id,
                    card_name: Some("Known".into()),
                    start_zone: zone,
                    target_zone: ZONES.choose(&mut rng).unwrap().to_string(),
                    x: rng.gen_range(-1..10),
                    y: rng.gen_range(0..500),
                    face_down: false,
                }
            }
            2 if !hidden.is_empty() => {
                next_id += 1;
                EventKind::MoveCard {
                    card_id: next_id,
                    card_name: Some("Revealed".into()),
                    start_zone: hidden.choose(&mut rng).unwrap().clone(),
                    target_zone: ZONES.choose(&mut rng).unwrap().to_string(),
                    x: rng.gen_range(-1..10),
                    y: rng.gen_range(0..500),
                    face_down: false,
                }
            }
            3 => {
                let count = rng.gen_range(0..3);
                let cards = if local {
                    (0..count)
                        .map(|_| {
                            next_id += 1;
                            DrawnCard {
                                id: next_id,
                                name: "Drawn".into(),
                            }
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                EventKind::Draw { count, cards }
            }
            _ if !known.is_empty() => {
                let (card_id, zone) = known.choose(&mut rng).unwrap().clone();
                EventKind::SetCardAttr {
                    zone,
                    card_id,
                    attr: CardAttr::Tapped(rng.gen_bool(0.5)),
                }
            }
            _ => EventKind::Shuffle,
        };

        let echoed = matches!(kind, EventKind::Draw { .. } | EventKind::MoveCard { .. });
        if local && echoed {
            game.apply_event(&ServerEvent::private(player, kind.clone()))
                .unwrap();
            assert_single_home(&game);
            game.apply_event(&ServerEvent::public(player, kind)).unwrap();
        } else {
            game.apply_event(&ServerEvent::public(player, kind)).unwrap();
        }
        assert_single_home(&game);
    }
}
