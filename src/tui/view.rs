//! Keyboard-driven view state: cursor, held tile and key dispatch

use crossterm::event::KeyCode;
use skrafl::board::{Square, BOARD_SIZE, RACK_SIZE};
use skrafl::game::error::GameError;
use skrafl::game::{Dialog, Game};

/// Where the cursor is and what the player is carrying
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub cursor: Square,
    /// Square the picked-up tile came from
    pub held: Option<Square>,
    pub status: String,
    pub should_quit: bool,
}

impl Default for View {
    fn default() -> Self {
        Self {
            cursor: Square::Rack(1),
            held: None,
            status: String::new(),
            should_quit: false,
        }
    }
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle one key press.
    pub fn on_key(&mut self, game: &mut Game, key: KeyCode) -> Result<(), GameError> {
        if game.current_error.is_some() {
            game.clear_error();
        }

        if game.asking_for_blank.is_some() {
            match key {
                KeyCode::Char(c) if c.is_alphabetic() => game.place_blank(c.to_ascii_lowercase())?,
                KeyCode::Esc => game.cancel_blank(),
                _ => {}
            }
            return Ok(());
        }

        if let Some(dialog) = game.showing_dialog {
            let answer = match key {
                KeyCode::Char('y') | KeyCode::Enter => Some(true),
                KeyCode::Char('n') | KeyCode::Esc => Some(false),
                KeyCode::Char(' ') if dialog == Dialog::Exchange => {
                    game.toggle_exchange(self.cursor);
                    None
                }
                other => {
                    self.move_cursor(other);
                    None
                }
            };
            if let Some(yes) = answer {
                match dialog {
                    Dialog::Pass => game.confirm_pass(yes),
                    Dialog::Challenge => game.confirm_challenge(yes),
                    Dialog::Exchange => game.confirm_exchange(yes),
                    Dialog::Resign => game.confirm_resign(yes),
                }
            }
            return Ok(());
        }

        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => self.pick_or_drop(game)?,
            KeyCode::Enter => {
                if !game.move_in_progress {
                    game.submit_move();
                }
            }
            KeyCode::Backspace => {
                self.held = None;
                game.rescramble_rack();
            }
            KeyCode::Esc => {
                self.held = None;
                game.deselect();
                game.reset_rack();
            }
            KeyCode::Char('p') => game.submit_pass(),
            KeyCode::Char('x') => {
                self.cursor = Square::Rack(1);
                game.submit_exchange();
            }
            KeyCode::Char('c') => game.submit_challenge(),
            KeyCode::Char('r') => game.submit_resign(),
            KeyCode::PageUp => self.step_review(game, -1)?,
            KeyCode::PageDown => self.step_review(game, 1)?,
            KeyCode::Home => game.end_review()?,
            other => self.move_cursor(other),
        }
        Ok(())
    }

    fn pick_or_drop(&mut self, game: &mut Game) -> Result<(), GameError> {
        if game.reviewing.is_some() {
            return Ok(());
        }
        match self.held.take() {
            None => {
                if game.tiles.get(&self.cursor).is_some_and(|t| t.draggable) {
                    self.held = Some(self.cursor);
                    game.select_square(self.cursor);
                }
            }
            Some(from) => {
                game.deselect();
                if let Err(e) = game.attempt_move(from, self.cursor) {
                    self.status = e.to_string();
                }
            }
        }
        Ok(())
    }

    fn step_review(&mut self, game: &mut Game, delta: i64) -> Result<(), GameError> {
        let total = game.moves.len() as i64;
        let current = game.reviewing.map_or(total, |n| n as i64);
        let next = (current + delta).clamp(0, total);
        self.held = None;
        if next == total {
            game.end_review()
        } else {
            game.review(next as usize)
        }
    }

    fn move_cursor(&mut self, key: KeyCode) {
        self.cursor = match (self.cursor, key) {
            (Square::Board { row, col }, KeyCode::Up) => Square::Board { row: (row - 1).max(0), col },
            (Square::Board { row, col }, KeyCode::Down) => {
                if row + 1 >= BOARD_SIZE {
                    Square::Rack((col as usize).min(RACK_SIZE - 1) + 1)
                } else {
                    Square::Board { row: row + 1, col }
                }
            }
            (Square::Board { row, col }, KeyCode::Left) => Square::Board { row, col: (col - 1).max(0) },
            (Square::Board { row, col }, KeyCode::Right) => Square::Board {
                row,
                col: (col + 1).min(BOARD_SIZE - 1),
            },
            (Square::Rack(slot), KeyCode::Left) => Square::Rack(slot.saturating_sub(1).max(1)),
            (Square::Rack(slot), KeyCode::Right) => Square::Rack((slot + 1).min(RACK_SIZE)),
            (Square::Rack(slot), KeyCode::Up) => Square::Board {
                row: BOARD_SIZE - 1,
                col: slot as i32 - 1,
            },
            (Square::Board { .. }, KeyCode::Tab) => Square::Rack(1),
            (Square::Rack(_), KeyCode::Tab) => Square::Board { row: 7, col: 7 },
            (cursor, _) => cursor,
        };
    }
}
