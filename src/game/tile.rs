//! Tiles on the board and on the rack

/// Identity of a blank tile
pub const BLANK: char = '?';

/// Display letter of a blank tile that has no assigned meaning
pub const UNASSIGNED: char = ' ';

/// Move highlight color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    /// Move by the viewing player
    Local,
    /// Move by the opponent
    Remote,
}

/// A tile in the tile dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Player who laid the tile (or who holds it on the rack)
    pub player: i32,
    /// Tile identity: a letter, or '?' for a blank
    pub tile: char,
    /// Displayed letter; differs from `tile` only for blanks
    pub letter: char,
    /// Point value (0 for blanks)
    pub score: u32,
    /// Just laid by the opponent
    pub fresh: bool,
    /// Part of the pending move or on the rack
    pub draggable: bool,
    /// Animation order within a highlighted move
    pub index: u32,
    /// Selected for exchange
    pub xchg: bool,
    pub highlight: Option<Highlight>,
}

impl Tile {
    /// A tile dealt to the rack.
    pub fn rack(player: i32, tile: char, score: u32) -> Tile {
        Tile {
            player,
            tile,
            letter: if tile == BLANK { UNASSIGNED } else { tile },
            score,
            fresh: false,
            draggable: true,
            index: 0,
            xchg: false,
            highlight: None,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.tile == BLANK
    }

    /// Forget the meaning of a blank tile.
    pub fn erase_meaning(&mut self) {
        if self.is_blank() {
            self.letter = UNASSIGNED;
        }
    }

    /// Text form used for move submission and local storage:
    /// the identity, followed by the assigned letter for blanks.
    pub fn token(&self) -> String {
        if self.is_blank() {
            format!("{}{}", BLANK, self.letter)
        } else {
            self.tile.to_string()
        }
    }
}
