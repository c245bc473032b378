//! Indexed tier: device-local SQLite key-value table under `~/.barnstormer/`.
//!
//! - `indexed.db` + WAL
//! - one `kv` table, created on open

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use barnstormer_constant::app;
use rusqlite::{params, Connection, OptionalExtension};

use super::KeyValueStore;
use crate::error::StoreError;

const KV_TABLE: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(KV_TABLE)
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Opens `<dir>/indexed.db`, creating `dir` if needed. Enables WAL and runs migrations.
    pub fn open_at(dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join(app::INDEXED_DB))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA busy_timeout=5000;")?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens `~/.barnstormer/indexed.db`.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = Self::default_dir()
            .ok_or_else(|| StoreError::Other("home directory not found".to_string()))?;
        Self::open_at(&dir)
    }

    pub fn default_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(app::DATA_DIR))
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&conn)?)
    }

    pub fn get_item_blocking(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
        })
    }

    /// Insert or replace.
    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO kv (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = ?2",
                params![key, value],
            )
            .map(|_| ())
        })
    }

    /// Returns whether a row was deleted.
    pub fn remove_item(&self, key: &str) -> Result<bool, StoreError> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM kv WHERE key = ?1", params![key])
                .map(|n| n > 0)
        })
    }

    pub fn entries(&self) -> Result<Vec<(String, String)>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT key, value FROM kv ORDER BY key")?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    fn name(&self) -> &str {
        "indexed"
    }

    async fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let store = self.clone();
        let key = key.to_string();
        tokio::task::spawn_blocking(move || store.get_item_blocking(&key)).await?
    }
}
