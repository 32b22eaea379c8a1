//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation.
//!
//! Collections are not mapped to relational tables.  The whole persisted
//! state is eight independent keyed blobs (one JSON array per collection plus
//! the session singleton) stored in a single `kv` table; a blob write is a
//! single upsert and is assumed atomic at this layer.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`].
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/suearhan/suearhan.db`
    /// - macOS:   `~/Library/Application Support/com.suearhan.suearhan/suearhan.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\suearhan\suearhan\data\suearhan.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "suearhan", "suearhan").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("suearhan.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;

        // Run schema migrations.
        migrations::run_migrations(&conn)?;

        Ok(Self { conn })
    }

    /// Read the raw JSON blob stored under `key`, if any.
    pub fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Write the raw JSON blob under `key`, unconditionally replacing any
    /// prior contents.
    pub fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove the blob stored under `key`.  Returns `true` if a row existed.
    pub fn delete_blob(&self, key: &str) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = Database::open_at(&path).expect("should open");
        assert!(db.path().is_some());

        assert_eq!(db.get_blob("missing").unwrap(), None);

        db.put_blob("k", "[1,2,3]").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("[1,2,3]"));

        db.put_blob("k", "[]").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("[]"));

        assert!(db.delete_blob("k").unwrap());
        assert!(!db.delete_blob("k").unwrap());
    }
}
