//! Schema creation.
//!
//! [`ensure_schema`] runs a single `CREATE TABLE IF NOT EXISTS` batch for
//! the six fixed tables and is safe to call on every startup.  Columns
//! hold only TEXT and INTEGER; structured fields are pre-serialized to
//! JSON by the row codec before they reach SQLite.
//!
//! There is no migration chain yet.  `PRAGMA user_version` is stamped so
//! a future runner has a base version to start from.

use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Current schema version, recorded in `PRAGMA user_version`.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Campaigns
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS campaigns (
    id            TEXT PRIMARY KEY NOT NULL,
    name          TEXT NOT NULL,
    subject       TEXT NOT NULL,
    segment       TEXT NOT NULL,
    status        TEXT NOT NULL,               -- draft / running / paused / completed
    sent          INTEGER NOT NULL DEFAULT 0,
    opened        INTEGER NOT NULL DEFAULT 0,
    clicked       INTEGER NOT NULL DEFAULT 0,
    converted     INTEGER NOT NULL DEFAULT 0,
    audience_size INTEGER NOT NULL DEFAULT 0,
    last_updated  TEXT NOT NULL,
    template_id   TEXT,                        -- weak reference, may dangle
    funnel_config TEXT                         -- JSON tree
);

-- ----------------------------------------------------------------
-- Contacts
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS contacts (
    id            TEXT PRIMARY KEY NOT NULL,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    email         TEXT NOT NULL,
    company       TEXT NOT NULL,
    role          TEXT NOT NULL,
    industry      TEXT NOT NULL,
    tags          TEXT NOT NULL,               -- JSON array
    status        TEXT NOT NULL,               -- lead lifecycle
    score         INTEGER NOT NULL DEFAULT 0,
    history       TEXT NOT NULL,               -- JSON array, most recent first
    last_activity TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Email templates
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS templates (
    id            TEXT PRIMARY KEY NOT NULL,
    name          TEXT NOT NULL,
    subject       TEXT NOT NULL,
    category      TEXT NOT NULL,
    content       TEXT NOT NULL,
    tags          TEXT NOT NULL,               -- JSON array
    is_system     INTEGER NOT NULL DEFAULT 0,  -- boolean 0/1
    last_modified TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Settings (singleton rows keyed by name)
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL                        -- JSON payload
);

-- ----------------------------------------------------------------
-- Sending domains
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS domains (
    id             TEXT PRIMARY KEY NOT NULL,
    domain         TEXT NOT NULL,
    status         TEXT NOT NULL,
    spf_verified   INTEGER NOT NULL DEFAULT 0, -- boolean 0/1
    dkim_verified  INTEGER NOT NULL DEFAULT 0,
    dmarc_verified INTEGER NOT NULL DEFAULT 0
);

-- ----------------------------------------------------------------
-- Notifications
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS notifications (
    id        TEXT PRIMARY KEY NOT NULL,
    title     TEXT NOT NULL,
    message   TEXT NOT NULL,
    kind      TEXT NOT NULL,                   -- info / success / warning / error
    is_read   INTEGER NOT NULL DEFAULT 0,      -- boolean 0/1
    timestamp TEXT NOT NULL,                   -- ISO-8601 / RFC-3339
    link      TEXT
);

CREATE INDEX IF NOT EXISTS idx_notifications_ts
    ON notifications(timestamp DESC);
"#;

/// Create any missing tables and stamp the schema version.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)
        .map_err(|e| StoreError::Schema(e.to_string()))?;

    let current: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if current < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }

    tracing::debug!(version = SCHEMA_VERSION, "schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('campaigns','contacts','templates','settings','domains','notifications')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 6);
    }
}
