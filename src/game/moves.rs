//! Historical moves as delivered by the server
//!
//! The server encodes each move as `[player, [coord, tiles, score]]`, with
//! an optional trailing highlight flag. Non-placement moves have an empty
//! coordinate and a sentinel in the tiles field. The sentinel is decoded
//! once here so the rest of the crate matches on [`MoveKind`].

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveKind {
    /// Tiles laid on the board starting at `coord`
    Placement { coord: String, tiles: String },
    Pass,
    Exchange { letters: String },
    Resign,
    Challenge,
    /// Outcome of a challenge; a negative score means it succeeded
    ChallengeResponse,
    /// Overtime adjustment
    TimePenalty,
    GameOver,
    /// Final deduction for tiles left on the rack
    RackLeave { letters: String },
}

impl MoveKind {
    pub fn decode(coord: &str, tiles: &str) -> MoveKind {
        if !coord.is_empty() {
            return MoveKind::Placement {
                coord: coord.to_string(),
                tiles: tiles.to_string(),
            };
        }
        match tiles {
            "PASS" => MoveKind::Pass,
            "RSGN" => MoveKind::Resign,
            "CHALL" => MoveKind::Challenge,
            "RESP" => MoveKind::ChallengeResponse,
            "TIME" => MoveKind::TimePenalty,
            "OVER" => MoveKind::GameOver,
            _ => match tiles.strip_prefix("EXCH") {
                Some(letters) => MoveKind::Exchange {
                    letters: letters.trim().to_string(),
                },
                None => MoveKind::RackLeave {
                    letters: tiles.to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawMove")]
pub struct Move {
    /// Seat index of the player who made the move
    pub player: i32,
    pub kind: MoveKind,
    pub score: i32,
    pub highlight: bool,
}

impl Move {
    pub fn new(player: i32, coord: &str, tiles: &str, score: i32) -> Move {
        Move {
            player,
            kind: MoveKind::decode(coord, tiles),
            score,
            highlight: false,
        }
    }

    pub fn is_placement(&self) -> bool {
        matches!(self.kind, MoveKind::Placement { .. })
    }

    /// A challenge response that took the challenged move off the board.
    pub fn is_successful_challenge(&self) -> bool {
        self.kind == MoveKind::ChallengeResponse && self.score < 0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawMove {
    Plain(i32, (String, String, i32)),
    Flagged(i32, (String, String, i32), bool),
}

impl From<RawMove> for Move {
    fn from(raw: RawMove) -> Self {
        let (player, (coord, tiles, score), highlight) = match raw {
            RawMove::Plain(player, summary) => (player, summary, false),
            RawMove::Flagged(player, summary, highlight) => (player, summary, highlight),
        };
        if !(0..=1).contains(&player) {
            log::warn!("move by unexpected player index {}", player);
        }
        Move {
            player,
            kind: MoveKind::decode(&coord, &tiles),
            score,
            highlight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_sentinels() {
        assert_eq!(MoveKind::decode("", "PASS"), MoveKind::Pass);
        assert_eq!(MoveKind::decode("", "RSGN"), MoveKind::Resign);
        assert_eq!(MoveKind::decode("", "CHALL"), MoveKind::Challenge);
        assert_eq!(MoveKind::decode("", "RESP"), MoveKind::ChallengeResponse);
        assert_eq!(MoveKind::decode("", "TIME"), MoveKind::TimePenalty);
        assert_eq!(MoveKind::decode("", "OVER"), MoveKind::GameOver);
        assert_eq!(
            MoveKind::decode("", "EXCHabc"),
            MoveKind::Exchange {
                letters: "abc".to_string()
            }
        );
        assert_eq!(
            MoveKind::decode("", "xq"),
            MoveKind::RackLeave {
                letters: "xq".to_string()
            }
        );
        assert_eq!(
            MoveKind::decode("H8", "PASS"),
            MoveKind::Placement {
                coord: "H8".to_string(),
                tiles: "PASS".to_string()
            }
        );
    }

    #[test]
    fn test_deserialize_server_tuples() {
        let moves: Vec<Move> = serde_json::from_str(
            r#"[[0, ["H8", "cat", 10]], [1, ["", "PASS", 0], true], [0, ["", "RESP", -10]]]"#,
        )
        .unwrap();
        assert_eq!(moves.len(), 3);
        assert!(moves[0].is_placement());
        assert!(!moves[0].highlight);
        assert_eq!(moves[1].kind, MoveKind::Pass);
        assert!(moves[1].highlight);
        assert!(moves[2].is_successful_challenge());
    }

    #[test]
    fn test_failed_challenge_is_not_successful() {
        let m = Move::new(1, "", "RESP", 5);
        assert!(!m.is_successful_challenge());
    }
}
