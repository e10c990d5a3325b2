//! Moving tiles between the rack and the board

use super::error::GameError;
use super::tile::{Tile, UNASSIGNED};
use super::Game;
use crate::board::{Square, RACK_SIZE};
use crate::storage::SavedTile;
use rand::seq::SliceRandom;
use rand::Rng;

impl Game {
    /// Board squares holding tiles of the pending move, row-major
    pub fn tiles_placed(&self) -> Vec<Square> {
        self.tiles
            .iter()
            .filter(|(square, tile)| !square.is_rack() && tile.draggable)
            .map(|(square, _)| *square)
            .collect()
    }

    /// Move a tile between any two squares.
    ///
    /// Dropping onto an occupied rack slot shifts the rack to open a gap.
    pub fn move_tile(&mut self, from: Square, to: Square) -> Result<(), GameError> {
        if !to.is_rack() && self.tiles.contains_key(&to) {
            return Err(GameError::SquareOccupied(to));
        }
        let original = self.tiles.remove(&from).ok_or(GameError::EmptySquare(from))?;
        let mut tile = original.clone();
        if to.is_rack() {
            tile.erase_meaning();
            if self.tiles.contains_key(&to) {
                if let Err(e) = self.open_rack_slot(to) {
                    self.tiles.insert(from, original);
                    return Err(e);
                }
            }
        }
        self.tiles.insert(to, tile);
        self.clear_error();
        self.update_score();
        self.save_tiles();
        Ok(())
    }

    /// Shift rack tiles so that `slot` is free: rightwards if there is
    /// room to the right, else leftwards.
    fn open_rack_slot(&mut self, slot: Square) -> Result<(), GameError> {
        let Square::Rack(at) = slot else {
            return Ok(());
        };
        let free = |game: &Game, s: usize| !game.tiles.contains_key(&Square::Rack(s));

        if let Some(gap) = (at + 1..=RACK_SIZE).find(|&s| free(self, s)) {
            for s in (at..gap).rev() {
                self.shift_rack_tile(s, s + 1);
            }
            return Ok(());
        }
        if let Some(gap) = (1..at).rev().find(|&s| free(self, s)) {
            for s in gap + 1..=at {
                self.shift_rack_tile(s, s - 1);
            }
            return Ok(());
        }
        Err(GameError::RackFull)
    }

    fn shift_rack_tile(&mut self, from: usize, to: usize) {
        if let Some(tile) = self.tiles.remove(&Square::Rack(from)) {
            self.tiles.insert(Square::Rack(to), tile);
        }
    }

    /// Drag a tile from one square to another.
    ///
    /// An unassigned blank dropped on the board waits in
    /// `asking_for_blank` until [`Game::place_blank`] gives it a letter.
    pub fn attempt_move(&mut self, from: Square, to: Square) -> Result<(), GameError> {
        if from == to {
            return Ok(());
        }
        let tile = self.tiles.get(&from).ok_or(GameError::EmptySquare(from))?;
        if !tile.draggable {
            return Err(GameError::TileFixed(from));
        }
        if !to.is_rack() && self.tiles.contains_key(&to) {
            return Err(GameError::SquareOccupied(to));
        }
        if !to.is_rack() && tile.is_blank() && tile.letter == UNASSIGNED {
            self.asking_for_blank = Some((from, to));
            return Ok(());
        }
        self.move_tile(from, to)
    }

    /// Give the waiting blank its letter and finish the move.
    pub fn place_blank(&mut self, letter: char) -> Result<(), GameError> {
        let (from, to) = self.asking_for_blank.take().ok_or(GameError::NoPendingBlank)?;
        if !to.is_rack() && self.tiles.contains_key(&to) {
            return Err(GameError::SquareOccupied(to));
        }
        let tile = self.tiles.get_mut(&from).ok_or(GameError::EmptySquare(from))?;
        tile.letter = letter;
        let moved = self.move_tile(from, to);
        if moved.is_err() {
            if let Some(tile) = self.tiles.get_mut(&from) {
                tile.erase_meaning();
            }
        }
        moved
    }

    pub fn cancel_blank(&mut self) {
        self.asking_for_blank = None;
    }

    /// Recall the pending move and shuffle the rack.
    pub fn rescramble_rack(&mut self) {
        self.rescramble_rack_with_rng(&mut rand::rng());
    }

    pub fn rescramble_rack_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.showing_dialog.is_some() {
            return;
        }
        self.recall_tiles();
        let mut slots: Vec<Option<Tile>> = Square::rack_slots()
            .map(|square| self.tiles.remove(&square))
            .collect();
        slots.shuffle(rng);
        for (i, tile) in slots.into_iter().flatten().enumerate() {
            self.tiles.insert(Square::Rack(i + 1), tile);
        }
        self.update_score();
        self.save_tiles();
    }

    /// Recall every pending tile to the rack.
    pub fn reset_rack(&mut self) {
        self.recall_tiles();
        self.update_score();
        self.save_tiles();
        self.clear_error();
    }

    fn recall_tiles(&mut self) {
        for square in self.tiles_placed() {
            let Some(free) = Square::rack_slots().find(|s| !self.tiles.contains_key(s)) else {
                log::warn!("no rack slot free for the tile at {}", square);
                break;
            };
            if let Some(mut tile) = self.tiles.remove(&square) {
                tile.erase_meaning();
                self.tiles.insert(free, tile);
            }
        }
    }

    /// Remember where every draggable tile is.
    pub fn save_tiles(&mut self) {
        let saved: Vec<SavedTile> = self
            .tiles
            .iter()
            .filter(|(_, tile)| tile.draggable)
            .map(|(square, tile)| SavedTile {
                square: square.to_string(),
                tile: tile.token(),
            })
            .collect();
        self.store.save_tiles(&saved);
    }

    /// Put saved tiles back where they were.
    ///
    /// Nothing changes unless the saved tiles are exactly the tiles in
    /// the rack and every target square is free. Returns whether the
    /// placement was restored.
    pub fn restore_tiles(&mut self, saved: &[SavedTile]) -> bool {
        if saved.is_empty() {
            return false;
        }
        let mut saved_letters: Vec<char> = saved.iter().filter_map(|s| s.tile.chars().next()).collect();
        let mut rack_letters: Vec<char> = Square::rack_slots()
            .filter_map(|square| self.tiles.get(&square).map(|tile| tile.tile))
            .collect();
        saved_letters.sort_unstable();
        rack_letters.sort_unstable();
        if saved_letters.len() != saved.len() || saved_letters != rack_letters {
            log::debug!("game {}: saved tiles belong to another rack", self.uuid);
            return false;
        }

        let mut targets: Vec<Square> = Vec::with_capacity(saved.len());
        for entry in saved {
            let Ok(square) = entry.square.parse::<Square>() else {
                log::debug!("game {}: bad saved square [{}]", self.uuid, entry.square);
                return false;
            };
            if targets.contains(&square) || (!square.is_rack() && self.tiles.contains_key(&square)) {
                return false;
            }
            targets.push(square);
        }

        let mut pool: Vec<Tile> = Square::rack_slots()
            .filter_map(|square| self.tiles.remove(&square))
            .collect();
        for (entry, square) in saved.iter().zip(targets) {
            let mut chars = entry.tile.chars();
            let Some(identity) = chars.next() else {
                continue;
            };
            let Some(pos) = pool.iter().position(|tile| tile.tile == identity) else {
                continue;
            };
            let mut tile = pool.swap_remove(pos);
            if !square.is_rack() && tile.is_blank() {
                if let Some(letter) = chars.next() {
                    tile.letter = letter;
                }
            }
            self.tiles.insert(square, tile);
        }
        // Anything unmatched goes back to the first free slots
        for tile in pool {
            if let Some(free) = Square::rack_slots().find(|s| !self.tiles.contains_key(s)) {
                self.tiles.insert(free, tile);
            }
        }
        true
    }
}
