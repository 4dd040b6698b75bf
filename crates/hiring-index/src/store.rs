//! SQLite-backed posting store.
//!
//! Provides:
//! - Open/close of one index file (or an in-memory database)
//! - Schema lifecycle: initialize, migrate, drop
//! - Transactional upsert keyed by posting id

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use hiring_types::Posting;

use crate::error::StoreError;
use crate::schema::{self, SchemaState, POSTINGS_TABLE, SCHEMA_VERSION};

const OPEN_PRAGMAS: &str = r#"
PRAGMA busy_timeout = 5000;
PRAGMA foreign_keys = ON;
"#;

const FILE_PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA synchronous = NORMAL;
"#;

const UPSERT_POSTING: &str = r#"
INSERT INTO postings (id, text, "by", timestamp, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT(id) DO UPDATE SET
    text = excluded.text,
    "by" = excluded."by",
    timestamp = excluded.timestamp
"#;

/// Full-text index of postings for one root item.
///
/// Owns its connection; dropping the store closes it.
pub struct IndexStore {
    pub(crate) conn: Connection,
    path: Option<PathBuf>,
}

impl IndexStore {
    /// Open the index file at `path`, creating it and its parent directory if necessary.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        info!(path = %path.display(), "Opening posting index");

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(OPEN_PRAGMAS)?;
        conn.execute_batch(FILE_PRAGMAS)?;

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a private in-memory index.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(OPEN_PRAGMAS)?;
        Ok(Self { conn, path: None })
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Close the connection, reporting any error SQLite raises doing so.
    pub fn close(self) -> Result<(), StoreError> {
        debug!(path = ?self.path, "Closing posting index");
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }

    /// Current shape of the on-disk schema.
    pub fn schema_state(&self) -> Result<SchemaState, StoreError> {
        schema::detect(&self.conn)
    }

    /// True if the postings table exists, whatever its schema version.
    pub fn table_exists(&self) -> Result<bool, StoreError> {
        schema::object_exists(&self.conn, "table", POSTINGS_TABLE)
    }

    /// Create or migrate the schema. Safe to call repeatedly.
    ///
    /// A current schema is left untouched. An older layout is migrated in
    /// place inside one transaction. A layout written by a newer version is
    /// refused with [`StoreError::SchemaVersion`].
    pub fn initialize(&mut self) -> Result<(), StoreError> {
        match self.schema_state()? {
            SchemaState::Current => {
                debug!("Posting index schema is current");
                Ok(())
            }
            SchemaState::Newer(found) => {
                warn!(found, expected = SCHEMA_VERSION, "Refusing newer schema");
                Err(StoreError::SchemaVersion {
                    found,
                    expected: SCHEMA_VERSION,
                })
            }
            SchemaState::Absent => {
                let tx = self.conn.transaction()?;
                schema::create(&tx)?;
                tx.commit()?;
                Ok(())
            }
            SchemaState::Outdated(from) => {
                let tx = self.conn.transaction()?;
                schema::migrate(&tx, from, Utc::now().timestamp())?;
                tx.commit()?;
                Ok(())
            }
        }
    }

    /// Remove the full-text index and the postings table. No-op if absent.
    pub fn drop_table(&mut self) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        schema::drop_all(&tx)?;
        tx.commit()?;
        info!("Dropped posting index tables");
        Ok(())
    }

    /// Insert or replace postings in one transaction.
    ///
    /// On an id collision `text`, `by` and `timestamp` are replaced and the
    /// original `created_at` is kept. Returns the number of postings written.
    pub fn upsert(&mut self, postings: &[Posting]) -> Result<usize, StoreError> {
        self.ensure_current()?;

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_POSTING)?;
            for posting in postings {
                stmt.execute(params![
                    posting.id,
                    posting.text,
                    posting.by,
                    posting.timestamp,
                    posting.created_at.timestamp(),
                ])?;
            }
        }
        tx.commit()?;

        debug!(count = postings.len(), "Upserted postings");
        Ok(postings.len())
    }

    /// Number of stored postings.
    pub fn count(&self) -> Result<usize, StoreError> {
        self.ensure_current()?;
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM postings", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub(crate) fn ensure_current(&self) -> Result<(), StoreError> {
        match self.schema_state()? {
            SchemaState::Current => Ok(()),
            _ => Err(StoreError::NotInitialized),
        }
    }
}
