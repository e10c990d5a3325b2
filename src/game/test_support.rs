//! Shared fixtures for the game tests

use super::snapshot::Snapshot;
use super::Game;
use crate::config::Config;
use crate::storage::TileStore;
use crate::transport::Request;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::mpsc::{channel, Receiver};

/// Tile store kept in memory; clones share the same slots.
#[derive(Clone, Default)]
pub struct MemoryStore {
    slots: Rc<RefCell<HashMap<(usize, &'static str), String>>>,
}

impl MemoryStore {
    fn get(&self, slot: usize, kind: &'static str) -> Option<String> {
        self.slots.borrow().get(&(slot, kind)).cloned()
    }

    fn put(&self, slot: usize, kind: &'static str, value: Option<&str>) {
        let mut slots = self.slots.borrow_mut();
        match value {
            Some(value) => slots.insert((slot, kind), value.to_string()),
            None => slots.remove(&(slot, kind)),
        };
    }
}

impl TileStore for MemoryStore {
    fn tile(&self, slot: usize) -> Option<String> {
        self.get(slot, "t")
    }

    fn square(&self, slot: usize) -> Option<String> {
        self.get(slot, "sq")
    }

    fn set_tile(&mut self, slot: usize, tile: Option<&str>) {
        self.put(slot, "t", tile);
    }

    fn set_square(&mut self, slot: usize, square: Option<&str>) {
        self.put(slot, "sq", square);
    }
}

const DEFAULTS: &[(&str, &str)] = &[
    ("player", "0"),
    ("locale", r#""en_US""#),
    ("board_type", r#""standard""#),
    ("userid", r#"["me", "you"]"#),
    ("nickname", r#"["Me", "You"]"#),
    (
        "tile_scores",
        r#"{"a": 1, "b": 3, "c": 3, "d": 2, "e": 1, "t": 1, "x": 8, "z": 10, "?": 0}"#,
    ),
    (
        "rack",
        r#"[["a", 1], ["b", 3], ["c", 3], ["d", 2], ["e", 1], ["?", 0], ["t", 1]]"#,
    ),
    ("bag", r#""aeiou""#),
];

/// Snapshot JSON for seat 0 on a standard board. Fields in `extra` are
/// appended and replace the default of the same name.
pub fn fixture(extra: &str) -> String {
    let mut json = String::from("{\n    \"result\": 0,\n");
    for (key, value) in DEFAULTS {
        if !extra.contains(&format!("\"{}\":", key)) {
            json.push_str(&format!("    \"{}\": {},\n", key, value));
        }
    }
    json.push_str("    ");
    json.push_str(extra);
    json.push_str("\n}");
    json
}

pub fn game_with_store(json: &str, store: MemoryStore) -> (Game, Receiver<Request>) {
    let (tx, rx) = channel();
    let snapshot = Snapshot::from_json(json).unwrap();
    let game = Game::new("g1", snapshot, tx, Box::new(store), &Config::default()).unwrap();
    (game, rx)
}

pub fn game_from_json(json: &str) -> (Game, Receiver<Request>) {
    game_with_store(json, MemoryStore::default())
}

/// Everything the game has sent so far
pub fn drain(rx: &Receiver<Request>) -> Vec<Request> {
    rx.try_iter().collect()
}

#[test]
fn test_fixture_extra_replaces_defaults() {
    let json = fixture(r#""moves": [], "rack": [["z", 10]], "board_type": "explo""#);
    let snapshot = Snapshot::from_json(&json).unwrap();
    assert_eq!(snapshot.rack, Some(vec![("z".to_string(), 10)]));
    assert_eq!(snapshot.board_type.as_deref(), Some("explo"));
    assert_eq!(snapshot.player, Some(0));
}
