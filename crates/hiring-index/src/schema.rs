//! Physical schema for the posting index.
//!
//! Layout:
//! - `postings`: canonical records, primary key `id`
//! - `postings_fts`: FTS5 external-content table over `id`, `text`, `by`,
//!   addressed by the `postings` rowid
//! - `postings_ai` / `postings_ad` / `postings_au`: triggers that mirror
//!   every insert, delete and update into `postings_fts`
//! - secondary indexes on `timestamp`, `by` and `created_at`
//!
//! The layout version lives in `PRAGMA user_version`. Version 1 files
//! predate `created_at`; they are detected by column probing as well.
//! Rowids of `postings` must stay stable, so the file is never VACUUMed.

use rusqlite::{params, Connection};
use tracing::{debug, info};

use crate::error::StoreError;

/// Current layout version.
pub const SCHEMA_VERSION: i32 = 2;

pub const POSTINGS_TABLE: &str = "postings";
pub const FTS_TABLE: &str = "postings_fts";

/// Columns the current layout requires on `postings`.
const REQUIRED_COLUMNS: &[&str] = &["id", "text", "by", "timestamp", "created_at"];

const CREATE_POSTINGS: &str = r#"
CREATE TABLE IF NOT EXISTS postings (
    id TEXT PRIMARY KEY,
    text TEXT NOT NULL,
    "by" TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    created_at INTEGER NOT NULL
);
"#;

const CREATE_INDEXES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_postings_timestamp ON postings(timestamp);
CREATE INDEX IF NOT EXISTS idx_postings_by ON postings("by");
CREATE INDEX IF NOT EXISTS idx_postings_created_at ON postings(created_at);
"#;

const CREATE_FTS: &str = r#"
CREATE VIRTUAL TABLE IF NOT EXISTS postings_fts USING fts5(
    id,
    text,
    "by",
    content='postings',
    content_rowid='rowid',
    tokenize='porter unicode61'
);

CREATE TRIGGER IF NOT EXISTS postings_ai AFTER INSERT ON postings BEGIN
    INSERT INTO postings_fts(rowid, id, text, "by")
    VALUES (new.rowid, new.id, new.text, new."by");
END;

CREATE TRIGGER IF NOT EXISTS postings_ad AFTER DELETE ON postings BEGIN
    INSERT INTO postings_fts(postings_fts, rowid, id, text, "by")
    VALUES ('delete', old.rowid, old.id, old.text, old."by");
END;

CREATE TRIGGER IF NOT EXISTS postings_au AFTER UPDATE ON postings BEGIN
    INSERT INTO postings_fts(postings_fts, rowid, id, text, "by")
    VALUES ('delete', old.rowid, old.id, old.text, old."by");
    INSERT INTO postings_fts(rowid, id, text, "by")
    VALUES (new.rowid, new.id, new.text, new."by");
END;
"#;

const DROP_FTS: &str = r#"
DROP TRIGGER IF EXISTS postings_ai;
DROP TRIGGER IF EXISTS postings_ad;
DROP TRIGGER IF EXISTS postings_au;
DROP TABLE IF EXISTS postings_fts;
"#;

/// What `initialize` will find on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// No `postings` table
    Absent,
    /// Older layout at the given version; migrated in place
    Outdated(i32),
    /// Current layout
    Current,
    /// Written by a newer build; left untouched
    Newer(i32),
}

/// True iff an object of `kind` ("table", "index", "trigger") named `name` exists.
pub fn object_exists(conn: &Connection, kind: &str, name: &str) -> Result<bool, StoreError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = ?1 AND name = ?2)",
        params![kind, name],
        |row| row.get(0),
    )?;
    Ok(exists)
}

pub fn user_version(conn: &Connection) -> Result<i32, StoreError> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn set_user_version(conn: &Connection, version: i32) -> Result<(), StoreError> {
    conn.pragma_update(None, "user_version", version)?;
    Ok(())
}

fn postings_columns(conn: &Connection) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
    let columns = stmt
        .query_map(params![POSTINGS_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

/// Classify the on-disk layout.
pub fn detect(conn: &Connection) -> Result<SchemaState, StoreError> {
    if !object_exists(conn, "table", POSTINGS_TABLE)? {
        return Ok(SchemaState::Absent);
    }

    let version = user_version(conn)?;
    if version > SCHEMA_VERSION {
        return Ok(SchemaState::Newer(version));
    }

    let columns = postings_columns(conn)?;
    let has_columns = REQUIRED_COLUMNS
        .iter()
        .all(|required| columns.iter().any(|c| c == required));
    let has_fts = object_exists(conn, "table", FTS_TABLE)?;

    if version == SCHEMA_VERSION && has_columns && has_fts {
        Ok(SchemaState::Current)
    } else {
        // Unversioned files with a postings table use the first layout.
        Ok(SchemaState::Outdated(version.max(1)))
    }
}

/// Create the full current layout on an empty file.
pub fn create(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(CREATE_POSTINGS)?;
    conn.execute_batch(CREATE_INDEXES)?;
    conn.execute_batch(CREATE_FTS)?;
    set_user_version(conn, SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Created posting index schema");
    Ok(())
}

/// Bring an older layout up to [`SCHEMA_VERSION`], keeping its rows.
///
/// Adds `created_at` (stamped with `now`) when missing, recreates the
/// full-text table and triggers, and rebuilds the full-text content
/// from `postings`.
pub fn migrate(conn: &Connection, from: i32, now: i64) -> Result<(), StoreError> {
    info!(from, to = SCHEMA_VERSION, "Migrating posting index schema");

    let columns = postings_columns(conn)?;
    if !columns.iter().any(|c| c == "created_at") {
        conn.execute_batch(
            "ALTER TABLE postings ADD COLUMN created_at INTEGER NOT NULL DEFAULT 0;",
        )?;
        let stamped = conn.execute(
            "UPDATE postings SET created_at = ?1 WHERE created_at = 0",
            params![now],
        )?;
        debug!(rows = stamped, "Backfilled created_at");
    }

    conn.execute_batch(DROP_FTS)?;
    conn.execute_batch(CREATE_INDEXES)?;
    conn.execute_batch(CREATE_FTS)?;
    conn.execute_batch("INSERT INTO postings_fts(postings_fts) VALUES ('rebuild');")?;
    set_user_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

/// Remove the full-text table, its triggers and the postings table.
pub fn drop_all(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(DROP_FTS)?;
    conn.execute_batch("DROP TABLE IF EXISTS postings;")?;
    set_user_version(conn, 0)?;
    Ok(())
}
