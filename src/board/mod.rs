//! Board geometry: square names and premium tables

pub mod coord;
pub mod layout;

pub use coord::{coordinate_of, vector_of, Square, Vector, BOARD_SIZE, RACK_SIZE};
pub use layout::{BoardType, SquareCategory};
