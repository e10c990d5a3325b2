//! Premium square tables for the board variants

use super::coord::{Square, BOARD_SIZE};
use once_cell::sync::Lazy;

/// Word multipliers on the standard board, row A at the top
const STANDARD_WORD: [&str; 15] = [
    "311111131111113",
    "121111111111121",
    "112111111111211",
    "111211111112111",
    "111121111121111",
    "111111111111111",
    "111111111111111",
    "311111121111113",
    "111111111111111",
    "111111111111111",
    "111121111121111",
    "111211111112111",
    "112111111111211",
    "121111111111121",
    "311111131111113",
];

/// Letter multipliers on the standard board
const STANDARD_LETTER: [&str; 15] = [
    "111211111112111",
    "111113111311111",
    "111111212111111",
    "211111121111112",
    "111111111111111",
    "131113111311131",
    "112111212111211",
    "111211111112111",
    "112111212111211",
    "131113111311131",
    "111111111111111",
    "211111121111112",
    "111111212111111",
    "111113111311111",
    "111211111112111",
];

const EXPLO_WORD: [&str; 15] = [
    "311111111111113",
    "111121111121111",
    "111111111111111",
    "112111111111211",
    "111111121111111",
    "111111111111111",
    "121111111111121",
    "111111131111111",
    "121111111111121",
    "111111111111111",
    "111111121111111",
    "112111111111211",
    "111111111111111",
    "111121111121111",
    "311111111111113",
];

const EXPLO_LETTER: [&str; 15] = [
    "111211111112111",
    "131111111111131",
    "111112111211111",
    "211111313111112",
    "111131111131111",
    "111211111112111",
    "113111111111311",
    "211111111111112",
    "113111111111311",
    "111211111112111",
    "111131111131111",
    "211111313111112",
    "111112111211111",
    "131111111111131",
    "111211111112111",
];

/// Parsed multiplier grid
struct Grid([[u32; 15]; 15]);

impl Grid {
    fn parse(rows: &[&str; 15]) -> Grid {
        let mut cells = [[1u32; 15]; 15];
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().take(15).enumerate() {
                cells[r][c] = ch.to_digit(10).unwrap_or(1);
            }
        }
        Grid(cells)
    }

    fn at(&self, row: i32, col: i32) -> u32 {
        if !(0..BOARD_SIZE).contains(&row) || !(0..BOARD_SIZE).contains(&col) {
            return 1;
        }
        self.0[row as usize][col as usize]
    }
}

static STANDARD_WORD_GRID: Lazy<Grid> = Lazy::new(|| Grid::parse(&STANDARD_WORD));
static STANDARD_LETTER_GRID: Lazy<Grid> = Lazy::new(|| Grid::parse(&STANDARD_LETTER));
static EXPLO_WORD_GRID: Lazy<Grid> = Lazy::new(|| Grid::parse(&EXPLO_WORD));
static EXPLO_LETTER_GRID: Lazy<Grid> = Lazy::new(|| Grid::parse(&EXPLO_LETTER));

/// Board variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardType {
    #[default]
    Standard,
    Explo,
}

impl BoardType {
    /// Board type from its server name. Unknown names fall back to the
    /// standard board.
    pub fn from_name(name: &str) -> BoardType {
        match name {
            "explo" => BoardType::Explo,
            "standard" => BoardType::Standard,
            other => {
                log::warn!("unknown board type [{}], using standard", other);
                BoardType::Standard
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoardType::Standard => "standard",
            BoardType::Explo => "explo",
        }
    }

    /// Square that the first tile-laying move must cover.
    pub fn start_square(&self) -> Square {
        match self {
            BoardType::Standard => Square::Board { row: 7, col: 7 },
            BoardType::Explo => Square::Board { row: 3, col: 3 },
        }
    }

    /// (row, col) of the start square
    pub fn start_coord(&self) -> (i32, i32) {
        match self.start_square() {
            Square::Board { row, col } => (row, col),
            Square::Rack(_) => (7, 7),
        }
    }

    pub fn word_multiplier(&self, row: i32, col: i32) -> u32 {
        match self {
            BoardType::Standard => STANDARD_WORD_GRID.at(row, col),
            BoardType::Explo => EXPLO_WORD_GRID.at(row, col),
        }
    }

    pub fn letter_multiplier(&self, row: i32, col: i32) -> u32 {
        match self {
            BoardType::Standard => STANDARD_LETTER_GRID.at(row, col),
            BoardType::Explo => EXPLO_LETTER_GRID.at(row, col),
        }
    }

    /// Premium category of a square. The word multiplier is checked first.
    pub fn square_category(&self, row: i32, col: i32) -> SquareCategory {
        match self.word_multiplier(row, col) {
            3 => return SquareCategory::TripleWord,
            2 => return SquareCategory::DoubleWord,
            _ => {}
        }
        match self.letter_multiplier(row, col) {
            3 => SquareCategory::TripleLetter,
            2 => SquareCategory::DoubleLetter,
            _ => SquareCategory::None,
        }
    }
}

/// Premium category of a board square, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareCategory {
    None,
    DoubleWord,
    TripleWord,
    DoubleLetter,
    TripleLetter,
}
