//! Game clock with overtime penalties
//!
//! Elapsed time comes from the server with every snapshot; between
//! snapshots the player to move is charged the wall-clock time since the
//! last sync. The host drives the display by calling [`Game::tick`]
//! every `tick_interval`.

use super::Game;
use crate::transport::Request;
use std::time::{Duration, Instant};

/// Remaining time below which a clock is shown as running out
const RUNNING_OUT_SECS: f64 = 120.0;

/// Remaining time below which the clock of the player to move blinks
const BLINK_SECS: f64 = 30.0;

/// Points lost per started minute of overtime
const PENALTY_PER_MINUTE: i32 = 10;

#[derive(Debug, Clone)]
pub struct Clock {
    /// Minutes per player; below 1 the game is untimed
    pub duration: f64,
    /// Seconds used per player, as of the last sync
    pub elapsed: [f64; 2],
    /// MM:SS, or -MM:SS in overtime
    pub text: [String; 2],
    pub running_out: [bool; 2],
    pub blinking: [bool; 2],
    /// Provisional overtime penalty
    pub penalty: [i32; 2],
    time_base: Instant,
    running: bool,
    max_overtime: Duration,
}

impl Clock {
    pub fn new(max_overtime: Duration) -> Self {
        Self {
            duration: 0.0,
            elapsed: [0.0; 2],
            text: Default::default(),
            running_out: [false; 2],
            blinking: [false; 2],
            penalty: [0; 2],
            time_base: Instant::now(),
            running: false,
            max_overtime,
        }
    }

    pub(crate) fn stop(&mut self) {
        self.running = false;
    }
}

fn format_time(remaining: f64) -> String {
    let abs = remaining.abs();
    let minutes = (abs / 60.0).floor();
    let seconds = (abs - minutes * 60.0).floor();
    let sign = if remaining < 0.0 { "-" } else { "" };
    format!("{}{:02}:{:02}", sign, minutes as u64, seconds as u64)
}

impl Game {
    pub fn is_timed(&self) -> bool {
        self.clock.duration >= 1.0
    }

    fn seat_to_move(&self) -> usize {
        self.moves.len() % 2
    }

    pub fn clock_running(&self) -> bool {
        self.clock.running
    }

    /// Remaining time of `player`, formatted for display.
    pub fn calc_time_to_go(&mut self, player: usize) -> String {
        self.calc_time_to_go_at(player, Instant::now())
    }

    pub fn calc_time_to_go_at(&mut self, player: usize, now: Instant) -> String {
        format_time(self.remaining_at(player, now))
    }

    /// Seconds left for `player`; negative in overtime.
    ///
    /// Updates the player's penalty. Once the player to move has used up
    /// the overtime as well, asks the server for a fresh snapshot.
    fn remaining_at(&mut self, player: usize, now: Instant) -> f64 {
        let mut elapsed = self.clock.elapsed[player];
        if !self.over && player == self.seat_to_move() {
            elapsed += now.saturating_duration_since(self.clock.time_base).as_secs_f64();
            let limit = self.clock.duration * 60.0 + self.clock.max_overtime.as_secs_f64();
            if elapsed > limit && !self.move_in_progress {
                log::info!("game {}: player {} out of overtime, refreshing", self.uuid, player);
                self.move_in_progress = true;
                self.send(Request::Refresh {
                    ticket: self.ticket(),
                    uuid: self.uuid.clone(),
                    delay: self.refresh_delay,
                });
            }
        }
        let remaining = self.clock.duration * 60.0 - elapsed;
        self.clock.penalty[player] = if self.over || remaining >= 0.0 {
            0
        } else {
            -PENALTY_PER_MINUTE * (-remaining / 60.0).ceil() as i32
        };
        remaining
    }

    /// Recompute the display of both clocks.
    pub fn update_clock_at(&mut self, now: Instant) {
        let to_move = self.seat_to_move();
        for player in 0..2 {
            let remaining = self.remaining_at(player, now);
            self.clock.text[player] = format_time(remaining);
            self.clock.running_out[player] = remaining < RUNNING_OUT_SECS;
            self.clock.blinking[player] =
                !self.over && player == to_move && (0.0..BLINK_SECS).contains(&remaining);
        }
    }

    /// Resync the time base after a server update.
    pub fn reset_clock(&mut self) {
        self.reset_clock_at(Instant::now());
    }

    pub fn reset_clock_at(&mut self, now: Instant) {
        self.clock.time_base = now;
        self.update_clock_at(now);
        if self.over {
            self.clock.running = false;
            self.clock.running_out = [false; 2];
            self.clock.blinking = [false; 2];
        }
    }

    pub fn start_clock(&mut self) {
        self.start_clock_at(Instant::now());
    }

    pub fn start_clock_at(&mut self, now: Instant) {
        self.reset_clock_at(now);
        if !self.over {
            self.clock.running = true;
        }
    }

    /// Periodic refresh; does nothing while the clock is stopped.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        if self.clock.running {
            self.update_clock_at(now);
        }
    }

    /// Score with the provisional overtime penalty, never below zero.
    pub fn display_score(&self, player: usize) -> i32 {
        (self.scores[player] + self.clock.penalty[player]).max(0)
    }
}
