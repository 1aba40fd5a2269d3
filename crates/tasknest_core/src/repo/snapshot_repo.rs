//! Snapshot blob storage contracts and implementations.
//!
//! # Responsibility
//! - Store opaque snapshot blobs under a fixed key.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `save_blob` replaces the previous value for the key atomically.
//! - Blobs are stored verbatim; this layer never inspects their content.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage transport error.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// A previous writer panicked while holding the connection lock.
    LockPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "snapshot store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::LockPoisoned => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value blob storage used by the persistence adapter.
pub trait SnapshotStore: Send + Sync {
    fn load_blob(&self, key: &str) -> StoreResult<Option<String>>;
    fn save_blob(&self, key: &str, blob: &str) -> StoreResult<()>;
}

/// SQLite-backed snapshot store over the `kv_store` table.
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load_blob(&self, key: &str) -> StoreResult<Option<String>> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        let value = conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save_blob(&self, key: &str, blob: &str) -> StoreResult<()> {
        let conn = self.conn.lock().map_err(|_| StoreError::LockPoisoned)?;
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, blob],
        )?;
        Ok(())
    }
}

/// Process-local snapshot store.
///
/// Counts writes so callers can observe debounce behavior. The count is
/// updated under the same lock as the blobs.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    inner: Mutex<MemoryBlobs>,
}

#[derive(Default)]
struct MemoryBlobs {
    blobs: HashMap<String, String>,
    writes: usize,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns how many successful `save_blob` calls happened.
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load_blob(&self, key: &str) -> StoreResult<Option<String>> {
        let inner = self.inner.lock().map_err(|_| StoreError::LockPoisoned)?;
        Ok(inner.blobs.get(key).cloned())
    }

    fn save_blob(&self, key: &str, blob: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::LockPoisoned)?;
        inner.blobs.insert(key.to_string(), blob.to_string());
        inner.writes += 1;
        Ok(())
    }
}
