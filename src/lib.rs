//! Client-side model of a two-player crossword tile game
//!
//! The [`game::Game`] aggregate rebuilds the board from the server's move
//! history, scores the move being composed, keeps the rack and the game
//! clock, and talks to the network only through [`transport`] messages.

pub mod board;
pub mod config;
pub mod game;
pub mod storage;
pub mod transport;
