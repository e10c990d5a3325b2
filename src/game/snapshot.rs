//! Server snapshots of a game
//!
//! Every field is optional: a snapshot only overwrites the fields it
//! carries, and [`Game::merge`](super::Game) applies them one by one.

use super::moves::Move;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    /// 0 = ok, 99 = game over, anything else is an error code
    pub result: Option<i32>,
    pub msg: Option<String>,
    /// Moves to append to the history
    pub newmoves: Option<Vec<Move>>,
    /// Two-letter word reference, passed through to the display
    pub two_letter_words: Option<serde_json::Value>,
    pub locale: Option<String>,
    pub alphabet: Option<String>,
    pub tile_scores: Option<HashMap<String, u32>>,
    pub board_type: Option<String>,
    /// Seat of the viewing player
    pub player: Option<usize>,
    pub userid: Option<[String; 2]>,
    pub nickname: Option<[String; 2]>,
    pub fullname: Option<[String; 2]>,
    pub autoplayer: Option<[bool; 2]>,
    pub scores: Option<[i32; 2]>,
    /// Full move history
    pub moves: Option<Vec<Move>>,
    /// (tile, score) pairs
    pub rack: Option<Vec<(String, u32)>>,
    pub bag: Option<String>,
    pub over: Option<bool>,
    pub manual: Option<bool>,
    pub fairplay: Option<bool>,
    /// Exchange allowed
    pub xchg: Option<bool>,
    /// Challenge allowed
    pub chall: Option<bool>,
    pub last_chall: Option<bool>,
    /// The viewing player's previous move was successfully challenged
    pub succ_chall: Option<bool>,
    pub lastmove: Option<Vec<LastMoveTile>>,
    pub messages: Option<Vec<ChatMessage>>,
    pub time_info: Option<TimeInfo>,
    pub overdue: Option<bool>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Snapshot, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One tile of the opponent's most recent move: (square, tile, letter, score)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LastMoveTile(pub String, pub String, pub String, pub i32);

impl LastMoveTile {
    pub fn square(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatMessage {
    pub from_userid: String,
    pub msg: String,
    #[serde(default)]
    pub ts: String,
}

/// Clock settings of a timed game
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
pub struct TimeInfo {
    /// Minutes per player
    pub duration: f64,
    /// Seconds used per player, as of the snapshot
    pub elapsed: [f64; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_snapshot_parses() {
        let snap = Snapshot::from_json(r#"{"result": 0, "over": true, "extra_field": 12}"#).unwrap();
        assert_eq!(snap.result, Some(0));
        assert_eq!(snap.over, Some(true));
        assert!(snap.moves.is_none());
        assert!(snap.rack.is_none());
    }

    #[test]
    fn test_full_snapshot_parses() {
        let json = r#"{
            "result": 0,
            "board_type": "explo",
            "player": 1,
            "userid": ["u0", "u1"],
            "autoplayer": [false, true],
            "scores": [10, 4],
            "moves": [[0, ["H8", "cat", 10]]],
            "rack": [["a", 1], ["?", 0]],
            "tile_scores": {"a": 1, "c": 3, "t": 1, "?": 0},
            "lastmove": [["H8", "c", "c", 3]],
            "time_info": {"duration": 25.0, "elapsed": [61.5, 12.0]}
        }"#;
        let snap = Snapshot::from_json(json).unwrap();
        assert_eq!(snap.player, Some(1));
        assert_eq!(snap.moves.as_ref().map(Vec::len), Some(1));
        assert_eq!(snap.rack.as_ref().unwrap()[1], ("?".to_string(), 0));
        assert_eq!(snap.lastmove.as_ref().unwrap()[0].square(), "H8");
        assert_eq!(snap.time_info.unwrap().elapsed[0], 61.5);
    }
}
