//! Terminal front end for a single game

mod terminal;
mod ui;
mod view;

pub use terminal::Tui;
pub use ui::render;
pub use view::View;
