//! SQLite-backed gist store.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};

use super::schema;
use super::{Gist, GistStore, Namespace};
use crate::error::StoreResult;

/// Gist store persisted in a SQLite database.
///
/// Writes use `INSERT OR REPLACE`, so a `set` racing another `set` for the
/// same key silently overwrites it, as with any document store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create the database at `path`.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        schema::init_schema(&conn)?;

        tracing::info!(path = %path.display(), "gist database opened");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored gists across all namespaces.
    pub fn count(&self) -> StoreResult<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM gists", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn unix_now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

#[async_trait]
impl GistStore for SqliteStore {
    async fn exists(&self, namespace: &Namespace, code: &str) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM gists WHERE directory = ? AND code = ?",
                params![namespace.as_key(), code],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    async fn get(&self, namespace: &Namespace, code: &str) -> StoreResult<Option<Gist>> {
        let conn = self.conn.lock();
        let gist = conn
            .query_row(
                "SELECT content, name FROM gists WHERE directory = ? AND code = ?",
                params![namespace.as_key(), code],
                |row| {
                    Ok(Gist {
                        content: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(gist)
    }

    async fn set(&self, namespace: &Namespace, code: &str, gist: Gist) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT OR REPLACE INTO gists (directory, code, content, name, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                namespace.as_key(),
                code,
                gist.content,
                gist.name,
                Self::unix_now()
            ],
        )?;
        Ok(())
    }
}
