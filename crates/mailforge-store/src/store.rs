//! Embedded relational store.
//!
//! The [`Store`] owns an in-memory [`rusqlite::Connection`] holding all six
//! tables.  On open, a previously published snapshot blob (if any) is
//! restored into the engine; after every mutating statement the whole
//! engine is serialized into a staging file and handed to the background
//! [`Persister`](crate::persist::Persister) for atomic publication.
//!
//! A write whose snapshot has not yet been renamed into place is lost on
//! abrupt termination.  That window is accepted for a local single-user
//! tool; [`Store::flush`] closes it when a caller needs durability.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{Connection, DatabaseName};

use crate::error::{Result, StoreError};
use crate::persist::Persister;
use crate::schema;

pub struct Store {
    conn: Connection,
    persister: Option<Persister>,
}

impl Store {
    /// Open the default application store.
    ///
    /// The snapshot blob is placed in the platform-appropriate data
    /// directory:
    /// - Linux:   `~/.local/share/mailforge/snapshot.db`
    /// - macOS:   `~/Library/Application Support/io.mailforge.mailforge/snapshot.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\mailforge\mailforge\data\snapshot.db`
    pub fn open_default() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("io", "mailforge", "mailforge").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Self::open_at(data_dir.join("snapshot.db"))
    }

    /// Open a store persisted at an explicit snapshot path.
    ///
    /// Useful for tests and for embedding the store inside custom
    /// directory layouts.  Any failure here is fatal to startup and
    /// propagates; callers must not render data-dependent views after an
    /// error.
    pub fn open_at(snapshot_path: impl Into<PathBuf>) -> Result<Self> {
        let snapshot_path = snapshot_path.into();
        let mut conn = Connection::open_in_memory()?;

        if snapshot_path.exists() {
            tracing::info!(path = %snapshot_path.display(), "restoring snapshot");
            conn.restore(
                DatabaseName::Main,
                &snapshot_path,
                None::<fn(rusqlite::backup::Progress)>,
            )?;
        } else {
            tracing::info!(path = %snapshot_path.display(), "no snapshot found, starting empty");
        }

        schema::ensure_schema(&conn)?;

        let persister = Persister::spawn(snapshot_path)?;

        Ok(Self {
            conn,
            persister: Some(persister),
        })
    }

    /// Open an ephemeral store with no on-disk snapshot.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::ensure_schema(&conn)?;
        Ok(Self {
            conn,
            persister: None,
        })
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Serialize the whole engine and queue it for publication.
    ///
    /// Called by every typed write helper after its statement succeeds.
    /// Serialization failures propagate; the asynchronous publish does not.
    pub(crate) fn checkpoint(&self) -> Result<()> {
        let Some(persister) = &self.persister else {
            return Ok(());
        };
        let staged = persister.next_staging_path();
        self.conn.backup(DatabaseName::Main, &staged, None)?;
        persister.publish(staged);
        Ok(())
    }

    /// Block until every queued snapshot publication has completed.
    pub fn flush(&self) {
        if let Some(persister) = &self.persister {
            persister.flush();
        }
    }

    /// The on-disk snapshot path, if this store persists at all.
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.persister.as_ref().map(|p| p.snapshot_path().as_path())
    }
}
