//! Square names and direction vectors
//!
//! Board squares are named by a row letter (A-O) and a 1-based column
//! number, e.g. "H8". A move coordinate uses the same two parts, with the
//! order giving the direction: "H8" runs across, "8H" runs down. Rack
//! slots are named "R1" through "R7".

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of rows and columns on the board
pub const BOARD_SIZE: i32 = 15;

/// Number of tiles on a full rack
pub const RACK_SIZE: usize = 7;

/// Row identifiers, top to bottom
pub const ROW_IDS: &str = "ABCDEFGHIJKLMNO";

/// Name of the square at (row, col), or None if it is off the board.
pub fn coordinate_of(row: i32, col: i32) -> Option<String> {
    if !(0..BOARD_SIZE).contains(&row) || !(0..BOARD_SIZE).contains(&col) {
        return None;
    }
    let row_id = ROW_IDS.as_bytes()[row as usize] as char;
    Some(format!("{}{}", row_id, col + 1))
}

/// Start square and step direction of a move coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vector {
    pub row: i32,
    pub col: i32,
    /// Column step: 1 for a horizontal move
    pub dx: i32,
    /// Row step: 1 for a vertical move
    pub dy: i32,
}

/// Decode a move coordinate.
///
/// A leading row letter ("H8") means horizontal; a trailing one ("8H")
/// means vertical.
pub fn vector_of(co: &str) -> Option<Vector> {
    let first = co.chars().next()?;
    if let Some(row) = row_index(first) {
        let col: i32 = co[1..].parse().ok()?;
        return Some(Vector {
            row,
            col: col - 1,
            dx: 1,
            dy: 0,
        });
    }
    let last = co.chars().last()?;
    let row = row_index(last)?;
    let col: i32 = co[..co.len() - 1].parse().ok()?;
    Some(Vector {
        row,
        col: col - 1,
        dx: 0,
        dy: 1,
    })
}

fn row_index(c: char) -> Option<i32> {
    ROW_IDS.find(c).map(|i| i as i32)
}

/// Key of the tile dictionary: a board square or a rack slot.
///
/// Ordering is row-major over the board, followed by the rack slots
/// left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Square {
    Board { row: i32, col: i32 },
    /// 1-based rack slot
    Rack(usize),
}

impl Square {
    /// Board square at (row, col), if on the board.
    pub fn board(row: i32, col: i32) -> Option<Square> {
        if (0..BOARD_SIZE).contains(&row) && (0..BOARD_SIZE).contains(&col) {
            Some(Square::Board { row, col })
        } else {
            None
        }
    }

    /// Rack slot 1..=RACK_SIZE.
    pub fn rack(slot: usize) -> Option<Square> {
        if (1..=RACK_SIZE).contains(&slot) {
            Some(Square::Rack(slot))
        } else {
            None
        }
    }

    /// All rack slots, left to right.
    pub fn rack_slots() -> impl Iterator<Item = Square> {
        (1..=RACK_SIZE).map(Square::Rack)
    }

    pub fn is_rack(&self) -> bool {
        matches!(self, Square::Rack(_))
    }

    /// (row, col) for board squares
    pub fn position(&self) -> Option<(i32, i32)> {
        match *self {
            Square::Board { row, col } => Some((row, col)),
            Square::Rack(_) => None,
        }
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Square::Board { row, col } => {
                let row_id = ROW_IDS.as_bytes()[row as usize] as char;
                write!(f, "{}{}", row_id, col + 1)
            }
            Square::Rack(slot) => write!(f, "R{}", slot),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid square name [{0}]")]
pub struct SquareParseError(pub String);

impl FromStr for Square {
    type Err = SquareParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || SquareParseError(s.to_string());
        if let Some(slot) = s.strip_prefix('R') {
            let slot: usize = slot.parse().map_err(|_| err())?;
            return Square::rack(slot).ok_or_else(err);
        }
        match vector_of(s) {
            Some(Vector { row, col, dx: 1, .. }) => Square::board(row, col).ok_or_else(err),
            _ => Err(err()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_coordinates() {
        let table = [
            (0, 0, "A1"),
            (7, 7, "H8"),
            (3, 3, "D4"),
            (14, 14, "O15"),
            (0, 14, "A15"),
            (14, 0, "O1"),
        ];
        for (row, col, name) in table {
            assert_eq!(coordinate_of(row, col).as_deref(), Some(name));
        }
    }

    #[test]
    fn test_coordinate_out_of_bounds() {
        assert_eq!(coordinate_of(-1, 0), None);
        assert_eq!(coordinate_of(0, -1), None);
        assert_eq!(coordinate_of(15, 3), None);
        assert_eq!(coordinate_of(3, 15), None);
    }

    #[test]
    fn test_vector_roundtrip_all_squares() {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let across = coordinate_of(row, col).unwrap();
                let v = vector_of(&across).unwrap();
                assert_eq!((v.row, v.col, v.dx, v.dy), (row, col, 1, 0));

                let row_id = &across[..1];
                let down = format!("{}{}", col + 1, row_id);
                let v = vector_of(&down).unwrap();
                assert_eq!((v.row, v.col, v.dx, v.dy), (row, col, 0, 1));
            }
        }
    }

    #[test]
    fn test_vector_rejects_garbage() {
        assert_eq!(vector_of(""), None);
        assert_eq!(vector_of("Z9"), None);
        assert_eq!(vector_of("HX"), None);
    }

    #[test]
    fn test_square_parse_and_display() {
        assert_eq!("H8".parse::<Square>(), Ok(Square::Board { row: 7, col: 7 }));
        assert_eq!("R3".parse::<Square>(), Ok(Square::Rack(3)));
        assert!("R0".parse::<Square>().is_err());
        assert!("R8".parse::<Square>().is_err());
        assert!("8H".parse::<Square>().is_err());
        assert!("P1".parse::<Square>().is_err());
        assert_eq!(Square::Board { row: 0, col: 14 }.to_string(), "A15");
        assert_eq!(Square::Rack(7).to_string(), "R7");
    }

    #[test]
    fn test_square_ordering_board_before_rack() {
        let mut squares = vec![
            Square::Rack(1),
            Square::Board { row: 7, col: 9 },
            Square::Board { row: 7, col: 8 },
            Square::Board { row: 6, col: 14 },
        ];
        squares.sort();
        assert_eq!(
            squares,
            vec![
                Square::Board { row: 6, col: 14 },
                Square::Board { row: 7, col: 8 },
                Square::Board { row: 7, col: 9 },
                Square::Rack(1),
            ]
        );
    }
}
