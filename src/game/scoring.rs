//! Scoring of the pending move

use super::tile::Tile;
use super::Game;
use crate::board::{Square, BOARD_SIZE, RACK_SIZE};

/// Bonus for using every rack tile in one move
pub const BINGO_BONUS: i32 = 50;

/// Score of the pending move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveScore {
    /// Main word
    pub word: String,
    /// Main word followed by every cross word
    pub words: Vec<String>,
    pub score: i32,
}

/// A word formed across the main word through one placed tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossWord {
    pub word: String,
    pub score: i32,
}

impl Game {
    pub fn tile_at(&self, row: i32, col: i32) -> Option<&Tile> {
        Square::board(row, col).and_then(|square| self.tiles.get(&square))
    }

    fn occupied(&self, row: i32, col: i32) -> bool {
        self.tile_at(row, col).is_some()
    }

    /// Score the tiles dragged onto the board.
    ///
    /// Returns None unless the pending tiles form one contiguous line
    /// that covers the start square (first move) or touches existing
    /// tiles (later moves).
    pub fn calc_score(&self) -> Option<MoveScore> {
        let mut letter_score = 0i32;
        let mut word_mult = 1i32;
        let (mut min_row, mut max_row) = (BOARD_SIZE, -1);
        let (mut min_col, mut max_col) = (BOARD_SIZE, -1);
        let mut placed = 0usize;

        for (square, tile) in &self.tiles {
            let Some((row, col)) = square.position() else {
                continue;
            };
            if !tile.draggable {
                continue;
            }
            letter_score += (tile.score * self.board_type.letter_multiplier(row, col)) as i32;
            word_mult *= self.board_type.word_multiplier(row, col) as i32;
            min_row = min_row.min(row);
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
            placed += 1;
        }
        if placed == 0 {
            return None;
        }
        if min_row != max_row && min_col != max_col {
            // Not in one line
            return None;
        }

        let vertical = if min_row != max_row {
            true
        } else if min_col != max_col {
            false
        } else {
            self.occupied(min_row - 1, min_col) || self.occupied(min_row + 1, min_col)
        };
        let (dx, dy) = if vertical { (0, 1) } else { (1, 0) };

        let (mut row, mut col) = (min_row, min_col);
        while self.occupied(row - dy, col - dx) {
            row -= dy;
            col -= dx;
        }

        let mut word = String::new();
        let mut cross_words = Vec::new();
        let mut cross_score = 0;
        let mut connections = 0;
        while let Some(tile) = self.tile_at(row, col) {
            word.push(tile.letter);
            if tile.draggable {
                if let Some(cross) = self.calc_cross_score(row, col, dx, dy) {
                    cross_score += cross.score;
                    cross_words.push(cross.word);
                    connections += 1;
                }
            } else {
                letter_score += tile.score as i32;
                connections += 1;
            }
            row += dy;
            col += dx;
        }

        if self.num_tile_moves == 0 {
            let (start_row, start_col) = self.board_type.start_coord();
            if !self.occupied(start_row, start_col) {
                return None;
            }
        } else if connections == 0 {
            return None;
        }
        // The walk stopped at an empty square inside the placed range
        let has_gap = if vertical { row <= max_row } else { col <= max_col };
        if has_gap {
            return None;
        }

        let bingo = if placed == RACK_SIZE { BINGO_BONUS } else { 0 };
        let mut words = vec![word.clone()];
        words.extend(cross_words);
        Some(MoveScore {
            word,
            words,
            score: letter_score * word_mult + cross_score + bingo,
        })
    }

    /// Score the word running across the main word (whose direction is
    /// `dx`, `dy`) through the placed tile at (`row`, `col`).
    ///
    /// Returns None when the tile has no neighbours in that direction.
    pub fn calc_cross_score(&self, row: i32, col: i32, dx: i32, dy: i32) -> Option<CrossWord> {
        // Walk perpendicular to the main word
        let (step_row, step_col) = (dx, dy);
        let (mut r, mut c) = (row, col);
        while self.occupied(r - step_row, c - step_col) {
            r -= step_row;
            c -= step_col;
        }

        let mut word = String::new();
        let mut score = 0i32;
        let mut others = 0;
        while let Some(tile) = self.tile_at(r, c) {
            word.push(tile.letter);
            if r == row && c == col {
                score += (tile.score * self.board_type.letter_multiplier(row, col)) as i32;
            } else {
                score += tile.score as i32;
                others += 1;
            }
            r += step_row;
            c += step_col;
        }
        if others == 0 {
            return None;
        }
        Some(CrossWord {
            word,
            score: score * self.board_type.word_multiplier(row, col) as i32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use test_log::test;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn all_ones() -> String {
        fixture(
            r#""moves": [], "rack": [["a", 1], ["b", 1], ["c", 1], ["d", 1], ["e", 1], ["f", 1], ["g", 1]]"#,
        )
    }

    #[test]
    fn test_nothing_placed() {
        let (game, _rx) = game_from_json(&fixture(r#""moves": []"#));
        assert_eq!(game.calc_score(), None);
    }

    #[test]
    fn test_three_letters_through_start() {
        let json = fixture(r#""moves": [], "rack": [["a", 1], ["b", 3], ["c", 3]]"#);
        let (mut game, _rx) = game_from_json(&json);
        game.attempt_move(sq("R1"), sq("H7")).unwrap();
        game.attempt_move(sq("R2"), sq("H8")).unwrap();
        game.attempt_move(sq("R3"), sq("H9")).unwrap();
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "abc");
        assert_eq!(scored.words, vec!["abc".to_string()]);
        // (1 + 3 + 3) on the double word start square
        assert_eq!(scored.score, 14);
        assert_eq!(game.current_score, Some(14));
    }

    #[test]
    fn test_first_move_must_cover_start() {
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": []"#));
        game.attempt_move(sq("R1"), sq("A1")).unwrap();
        game.attempt_move(sq("R2"), sq("A2")).unwrap();
        assert_eq!(game.calc_score(), None);
        assert_eq!(game.current_score, None);
    }

    #[test]
    fn test_explo_start_square() {
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": [], "board_type": "explo""#));
        game.attempt_move(sq("R1"), sq("H8")).unwrap();
        game.attempt_move(sq("R2"), sq("H9")).unwrap();
        assert_eq!(game.calc_score(), None);
        game.reset_rack();
        game.attempt_move(sq("R1"), sq("D4")).unwrap();
        game.attempt_move(sq("R2"), sq("D5")).unwrap();
        assert!(game.calc_score().is_some());
    }

    #[test]
    fn test_bingo_bonus() {
        let (mut game, _rx) = game_from_json(&all_ones());
        for (i, name) in ["H5", "H6", "H7", "H8", "H9", "H10", "H11"].iter().enumerate() {
            game.attempt_move(Square::Rack(i + 1), sq(name)).unwrap();
        }
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "abcdefg");
        assert_eq!(scored.score, 7 * 2 + BINGO_BONUS);
    }

    #[test]
    fn test_blank_scores_nothing() {
        let json = fixture(r#""moves": [], "rack": [["?", 0], ["b", 3]]"#);
        let (mut game, _rx) = game_from_json(&json);
        game.attempt_move(sq("R1"), sq("H8")).unwrap();
        game.place_blank('z').unwrap();
        game.attempt_move(sq("R2"), sq("H9")).unwrap();
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "zb");
        assert_eq!(scored.score, 3 * 2);
    }

    #[test]
    fn test_isolated_word_rejected() {
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": [[1, ["H8", "cat", 5]]]"#));
        game.attempt_move(sq("R1"), sq("A1")).unwrap();
        game.attempt_move(sq("R2"), sq("A2")).unwrap();
        assert_eq!(game.calc_score(), None);
    }

    #[test]
    fn test_not_in_line_rejected() {
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": []"#));
        game.attempt_move(sq("R1"), sq("H8")).unwrap();
        game.attempt_move(sq("R2"), sq("G9")).unwrap();
        assert_eq!(game.calc_score(), None);
    }

    #[test]
    fn test_gap_rejected() {
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": []"#));
        game.attempt_move(sq("R1"), sq("H8")).unwrap();
        game.attempt_move(sq("R2"), sq("H10")).unwrap();
        assert_eq!(game.calc_score(), None);
    }

    #[test]
    fn test_extending_existing_word() {
        // c(3) a(1) t(1) on H8..H10, then e on H11
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": [[1, ["H8", "cat", 10]]]"#));
        game.attempt_move(sq("R5"), sq("H11")).unwrap();
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "cate");
        assert_eq!(scored.score, 3 + 1 + 1 + 1);
    }

    #[test]
    fn test_bridging_gap_with_existing_tile() {
        // Pending tiles on both sides of an existing one form one word
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": [[1, ["H8", "a", 1]]]"#));
        game.attempt_move(sq("R3"), sq("H7")).unwrap();
        game.attempt_move(sq("R7"), sq("H9")).unwrap();
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "cat");
        assert_eq!(scored.score, 3 + 1 + 1);
    }

    #[test]
    fn test_single_tile_goes_down_next_to_vertical_neighbour() {
        // c on H8 from the history; a placed below it on I8
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": [[1, ["H8", "c", 3]]]"#));
        game.attempt_move(sq("R1"), sq("I8")).unwrap();
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "ca");
        assert_eq!(scored.words, vec!["ca".to_string()]);
    }

    #[test]
    fn test_cross_words_are_scored() {
        // cat on H8..H10; pending "be" on I9..I10 forms "ab" and "te"
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": [[1, ["H8", "cat", 10]]]"#));
        game.attempt_move(sq("R2"), sq("I9")).unwrap();
        game.attempt_move(sq("R5"), sq("I10")).unwrap();
        let scored = game.calc_score().unwrap();
        assert_eq!(scored.word, "be");
        assert_eq!(
            scored.words,
            vec!["be".to_string(), "ab".to_string(), "te".to_string()]
        );
        // I9 is a double letter: be = 3*2 + 1, ab = 1 + 3*2, te = 1 + 1
        assert_eq!(scored.score, 7 + 7 + 2);
    }

    #[test]
    fn test_cross_score_without_neighbours() {
        let (mut game, _rx) = game_from_json(&fixture(r#""moves": []"#));
        game.attempt_move(sq("R1"), sq("H8")).unwrap();
        assert_eq!(game.calc_cross_score(7, 7, 1, 0), None);
    }
}
