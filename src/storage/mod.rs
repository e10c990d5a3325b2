//! Local persistence of the in-progress tile placement
//!
//! This module provides:
//! - A SQLite key/value store in the OS-standard data directory
//!   (via `directories` crate), with schema versioning
//! - The [`TileStore`] capability used by the game model, with a
//!   SQLite-backed implementation and a no-op fallback
//!
//! Persistence is best-effort. Failures are logged and swallowed; the
//! game never depends on a save having succeeded.

use crate::board::RACK_SIZE;
use crate::config::Config;
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current schema version. Bump this when making schema changes.
/// Version history:
/// - v1: meta and kv tables
const SCHEMA_VERSION: u32 = 1;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("could not determine data directory")]
    NoDataDirectory,
    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchemaVersion { found: u32, supported: u32 },
    #[error("failed to create data directory: {0}")]
    CreateDirFailed(std::io::Error),
}

/// SQLite-backed string key/value store.
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Open or create the database in the OS-standard data directory:
    /// - Linux: `$XDG_DATA_HOME/skrafl/` or `~/.local/share/skrafl/`
    /// - macOS: `~/Library/Application Support/skrafl/`
    pub fn open() -> Result<Self, StorageError> {
        let data_dir = Self::data_dir()?;
        std::fs::create_dir_all(&data_dir).map_err(StorageError::CreateDirFailed)?;
        Self::open_at(&data_dir.join("skrafl.db"))
    }

    /// Open or create the database at a specific path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open(path)?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let storage = Storage {
            conn: Connection::open_in_memory()?,
        };
        storage.initialize_schema()?;
        Ok(storage)
    }

    /// Get the OS-standard data directory
    pub fn data_dir() -> Result<PathBuf, StorageError> {
        ProjectDirs::from("", "", "skrafl")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(StorageError::NoDataDirectory)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now_millis()],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// Remove every key starting with `prefix`. Returns the number removed.
    pub fn remove_prefix(&self, prefix: &str) -> Result<usize, StorageError> {
        let removed = self.conn.execute(
            "DELETE FROM kv WHERE substr(key, 1, length(?1)) = ?1",
            params![prefix],
        )?;
        Ok(removed)
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }

    fn initialize_schema(&self) -> Result<(), StorageError> {
        let current_version = self.get_schema_version()?;

        if current_version == 0 {
            self.create_schema_v1()?;
        } else if current_version > SCHEMA_VERSION {
            // Database is from a newer version of skrafl
            return Err(StorageError::FutureSchemaVersion {
                found: current_version,
                supported: SCHEMA_VERSION,
            });
        }

        Ok(())
    }

    fn get_schema_version(&self) -> Result<u32, StorageError> {
        let table_exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='meta'",
            [],
            |row| row.get(0),
        )?;

        if !table_exists {
            return Ok(0);
        }

        let version: u32 = self
            .conn
            .query_row("SELECT schema_version FROM meta LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        Ok(version)
    }

    fn create_schema_v1(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            -- Meta table: schema version
            CREATE TABLE meta (
                schema_version INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            -- String key/value pairs, namespaced by key prefix
            CREATE TABLE kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT INTO meta (schema_version, created_at) VALUES (?1, ?2)",
            params![SCHEMA_VERSION, now_millis()],
        )?;

        Ok(())
    }
}

fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A saved draggable tile: its square name and its tile text
/// (the identity, plus the assigned letter for blanks).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedTile {
    pub square: String,
    pub tile: String,
}

/// Per-slot storage of the draggable tiles of one game.
///
/// Slots run from 1 to [`RACK_SIZE`]. A slot without a square means
/// "empty", and loading stops at the first empty slot.
pub trait TileStore {
    fn tile(&self, slot: usize) -> Option<String>;
    fn square(&self, slot: usize) -> Option<String>;
    fn set_tile(&mut self, slot: usize, tile: Option<&str>);
    fn set_square(&mut self, slot: usize, square: Option<&str>);

    /// Forget every slot.
    fn clear(&mut self) {
        for slot in 1..=RACK_SIZE {
            self.set_square(slot, None);
            self.set_tile(slot, None);
        }
    }

    /// Store `tiles` in slots 1.. and empty the slots after them.
    fn save_tiles(&mut self, tiles: &[SavedTile]) {
        let count = tiles.len().min(RACK_SIZE);
        for (i, saved) in tiles.iter().take(count).enumerate() {
            self.set_square(i + 1, Some(&saved.square));
            self.set_tile(i + 1, Some(&saved.tile));
        }
        for slot in count + 1..=RACK_SIZE {
            self.set_square(slot, None);
            self.set_tile(slot, None);
        }
    }

    fn load_tiles(&self) -> Vec<SavedTile> {
        let mut tiles = Vec::new();
        for slot in 1..=RACK_SIZE {
            match (self.square(slot), self.tile(slot)) {
                (Some(square), Some(tile)) => tiles.push(SavedTile { square, tile }),
                _ => break,
            }
        }
        tiles
    }
}

/// Tile store backed by [`Storage`], with keys
/// `game.<uuid>.tile.<slot>.t` and `game.<uuid>.tile.<slot>.sq`.
pub struct LocalStore {
    storage: Storage,
    uuid: String,
}

impl LocalStore {
    pub fn new(storage: Storage, uuid: &str) -> Self {
        Self {
            storage,
            uuid: uuid.to_string(),
        }
    }

    fn key(&self, slot: usize, suffix: &str) -> String {
        format!("game.{}.tile.{}.{}", self.uuid, slot, suffix)
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage.get(key).unwrap_or_else(|e| {
            log::debug!("reading [{}] failed: {}", key, e);
            None
        })
    }

    fn write(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            log::debug!("writing [{}] failed: {}", key, e);
        }
    }
}

impl TileStore for LocalStore {
    fn tile(&self, slot: usize) -> Option<String> {
        self.read(&self.key(slot, "t"))
    }

    fn square(&self, slot: usize) -> Option<String> {
        self.read(&self.key(slot, "sq"))
    }

    fn set_tile(&mut self, slot: usize, tile: Option<&str>) {
        let key = self.key(slot, "t");
        self.write(&key, tile);
    }

    fn set_square(&mut self, slot: usize, square: Option<&str>) {
        let key = self.key(slot, "sq");
        self.write(&key, square);
    }

    fn clear(&mut self) {
        let prefix = format!("game.{}.tile.", self.uuid);
        if let Err(e) = self.storage.remove_prefix(&prefix) {
            log::debug!("clearing [{}] failed: {}", prefix, e);
        }
    }
}

/// Tile store that remembers nothing.
#[derive(Debug, Default)]
pub struct NullStore;

impl TileStore for NullStore {
    fn tile(&self, _slot: usize) -> Option<String> {
        None
    }

    fn square(&self, _slot: usize) -> Option<String> {
        None
    }

    fn set_tile(&mut self, _slot: usize, _tile: Option<&str>) {}

    fn set_square(&mut self, _slot: usize, _square: Option<&str>) {}
}

/// Pick the tile store for a game: SQLite when the database can be
/// opened, otherwise the no-op store.
pub fn open_tile_store(config: &Config, uuid: &str) -> Box<dyn TileStore> {
    if !config.use_store {
        return Box::new(NullStore);
    }
    let opened = match &config.db_path {
        Some(path) => Storage::open_at(path),
        None => Storage::open(),
    };
    match opened {
        Ok(storage) => Box::new(LocalStore::new(storage, uuid)),
        Err(e) => {
            log::warn!("local storage unavailable, tile placement will not be saved: {}", e);
            Box::new(NullStore)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn saved(square: &str, tile: &str) -> SavedTile {
        SavedTile {
            square: square.to_string(),
            tile: tile.to_string(),
        }
    }

    #[test]
    fn test_storage_creation() {
        let storage = Storage::open_in_memory().unwrap();
        assert!(storage.is_empty().unwrap());
    }

    #[test]
    fn test_schema_version_is_current() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get_schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_get_set_remove() {
        let storage = Storage::open_in_memory().unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
        storage.set("a", "1").unwrap();
        storage.set("a", "2").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("2"));
        storage.remove("a").unwrap();
        assert_eq!(storage.get("a").unwrap(), None);
    }

    #[test]
    fn test_remove_prefix_leaves_other_keys() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("game.x.tile.1.t", "a").unwrap();
        storage.set("game.x.tile.1.sq", "H8").unwrap();
        storage.set("game.y.tile.1.t", "b").unwrap();
        assert_eq!(storage.remove_prefix("game.x.").unwrap(), 2);
        assert_eq!(storage.len().unwrap(), 1);
    }

    #[test]
    fn test_data_dir() {
        let dir = Storage::data_dir();
        if let Ok(path) = dir {
            assert!(path.to_string_lossy().contains("skrafl"));
        }
    }

    #[test]
    fn test_reopen_keeps_values() {
        let path = std::env::temp_dir().join(format!("skrafl-test-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);
        {
            let storage = Storage::open_at(&path).unwrap();
            storage.set("k", "v").unwrap();
        }
        let storage = Storage::open_at(&path).unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));
        drop(storage);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_local_store_key_scheme() {
        let mut store = LocalStore::new(Storage::open_in_memory().unwrap(), "abc");
        store.set_square(2, Some("H8"));
        store.set_tile(2, Some("?x"));
        assert_eq!(
            store.storage.get("game.abc.tile.2.sq").unwrap().as_deref(),
            Some("H8")
        );
        assert_eq!(
            store.storage.get("game.abc.tile.2.t").unwrap().as_deref(),
            Some("?x")
        );
    }

    #[test]
    fn test_save_and_load_tiles() {
        let mut store = LocalStore::new(Storage::open_in_memory().unwrap(), "g1");
        let tiles = vec![saved("H8", "c"), saved("H9", "?a"), saved("R3", "t")];
        store.save_tiles(&tiles);
        assert_eq!(store.load_tiles(), tiles);
    }

    #[test]
    fn test_save_clears_stale_slots() {
        let mut store = LocalStore::new(Storage::open_in_memory().unwrap(), "g1");
        store.save_tiles(&[saved("H8", "a"), saved("H9", "b"), saved("H10", "c")]);
        store.save_tiles(&[saved("R1", "d")]);
        assert_eq!(store.load_tiles(), vec![saved("R1", "d")]);
        assert_eq!(store.tile(2), None);
        assert_eq!(store.square(3), None);

        // Saving the same list twice changes nothing
        store.save_tiles(&[saved("R1", "d")]);
        assert_eq!(store.storage.len().unwrap(), 2);
    }

    #[test]
    fn test_clear_only_touches_own_game() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set("game.other.tile.1.t", "z").unwrap();
        let mut store = LocalStore::new(storage, "mine");
        store.save_tiles(&[saved("A1", "q")]);
        store.clear();
        assert!(store.load_tiles().is_empty());
        assert_eq!(store.storage.len().unwrap(), 1);
    }

    #[test]
    fn test_null_store_remembers_nothing() {
        let mut store = NullStore;
        store.save_tiles(&[saved("H8", "a")]);
        assert!(store.load_tiles().is_empty());
    }

    #[test]
    fn test_open_tile_store_disabled() {
        let config = Config {
            use_store: false,
            ..Config::default()
        };
        let store = open_tile_store(&config, "x");
        assert!(store.load_tiles().is_empty());
    }
}
