//! Database connection management.
//!
//! The [`Database`] struct owns a [`rusqlite::Connection`] and guarantees
//! that migrations are run before any other operation.  It also owns the
//! sender half of the change feed; subscribers obtained through
//! [`Database::subscribe_changes`] receive a [`ChangeEvent`] after every
//! committed mutation.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::changes::{self, ChangeEvent};
use crate::error::{Result, StoreError};
use crate::migrations;

/// Wrapper around a [`rusqlite::Connection`] plus the change feed sender.
pub struct Database {
    conn: Connection,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Database {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/rentline/rentline.db`
    /// - macOS:   `~/Library/Application Support/com.rentline.rentline/rentline.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\rentline\rentline\data\rentline.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "rentline", "rentline").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("rentline.db");

        tracing::info!(path = %db_path.display(), "opening database");

        Self::open_at(&db_path)
    }

    /// Open (or create) a database at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Open a transient in-memory database.  Used by tests and demos.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        // Recommended SQLite settings.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // Run schema migrations.
        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            changes: changes::change_channel(),
        })
    }

    /// Return a reference to the underlying `rusqlite::Connection`.
    ///
    /// Callers should prefer the typed CRUD helpers, but direct access is
    /// occasionally needed for transactions or ad-hoc queries.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Subscribe to the table-level change feed.
    ///
    /// The receiver gets one [`ChangeEvent`] per committed mutation, for
    /// every table, unfiltered.  Dropping the receiver is the unsubscribe.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Publish a change event.  A send error only means there are no
    /// subscribers right now, which is fine.
    pub(crate) fn notify(&self, event: ChangeEvent) {
        if self.changes.send(event).is_err() {
            tracing::trace!(?event, "change event dropped (no subscribers)");
        }
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
    }

    #[test]
    fn in_memory_runs_migrations() {
        let db = Database::open_in_memory().expect("should open");
        // The messages table must exist after migration.
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
