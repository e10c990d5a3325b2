//! Runtime settings

use std::path::PathBuf;
use std::time::Duration;

/// Overtime allowed past the clock before a player loses on time
pub const DEFAULT_MAX_OVERTIME: Duration = Duration::from_secs(10 * 60);

/// Clock display refresh interval
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Delay before asking the server for a verdict once overtime runs out
pub const DEFAULT_REFRESH_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_overtime: Duration,
    pub tick_interval: Duration,
    pub refresh_delay: Duration,
    /// Database file for saved tile placement; None uses the OS data dir
    pub db_path: Option<PathBuf>,
    /// Persist tile placement between sessions
    pub use_store: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_overtime: DEFAULT_MAX_OVERTIME,
            tick_interval: DEFAULT_TICK_INTERVAL,
            refresh_delay: DEFAULT_REFRESH_DELAY,
            db_path: None,
            use_store: true,
        }
    }
}

impl Config {
    /// Override the overtime limit (used to speed up tests)
    pub fn with_max_overtime(mut self, max_overtime: Duration) -> Self {
        self.max_overtime = max_overtime;
        self
    }
}
