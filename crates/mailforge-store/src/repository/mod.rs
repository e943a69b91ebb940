//! Repository API: the CRUD / search / aggregate surface UI views consume.
//!
//! A [`Repository`] owns the [`Store`] and the current [`CacheSnapshot`].
//! Every mutation writes through the store (which checkpoints a snapshot)
//! and then rebuilds the cache before returning, so a read issued on the
//! very next statement observes the new state.  Reads never touch SQLite
//! and always return defensive copies.
//!
//! Mutations take `&mut self`: there is exactly one writer at a time by
//! construction, no locking needed.

mod campaigns;
mod contacts;
mod domains;
mod notifications;
mod search;
mod templates;

pub use contacts::{ContactPatch, NewActivity, NewContact};
pub use notifications::NewNotification;
pub use templates::TemplateDraft;

use mailforge_shared::AppSettings;
use uuid::Uuid;

use crate::cache::CacheSnapshot;
use crate::error::Result;
use crate::seed;
use crate::store::Store;

pub struct Repository {
    store: Store,
    cache: CacheSnapshot,
}

impl Repository {
    /// Open the default on-disk repository.
    pub fn open_default() -> Result<Self> {
        Self::open(Store::open_default()?)
    }

    /// Wrap a store: seed the demo dataset on first run, then load the
    /// cache.  This is the one-time initialization sequence; callers must
    /// not render data-dependent views until it returns.
    pub fn open(store: Store) -> Result<Self> {
        let seeded = seed::seed_if_empty(&store)?;
        let cache = CacheSnapshot::load(&store);

        tracing::info!(
            seeded,
            campaigns = cache.campaigns.len(),
            contacts = cache.contacts.len(),
            "repository ready"
        );

        Ok(Self { store, cache })
    }

    /// Rebuild the cache from the store.  Called after every mutation.
    pub(crate) fn refresh(&mut self) {
        self.cache = CacheSnapshot::load(&self.store);
    }

    pub(crate) fn cache(&self) -> &CacheSnapshot {
        &self.cache
    }

    /// Block until every queued snapshot publication has completed.
    pub fn flush(&self) {
        self.store.flush();
    }

    /// Tear down, waiting for pending persistence first.
    pub fn close(self) {
        self.store.flush();
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    pub fn settings(&self) -> AppSettings {
        self.cache.settings.clone()
    }

    pub fn save_settings(&mut self, settings: AppSettings) -> Result<()> {
        self.store.save_settings(&settings)?;
        self.refresh();
        Ok(())
    }
}

/// New opaque id with a short type prefix.
pub(crate) fn generate_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

#[cfg(test)]
pub(crate) fn seeded_repo() -> Repository {
    Repository::open(Store::in_memory().unwrap()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_seeds_and_loads_cache() {
        let repo = seeded_repo();
        assert_eq!(repo.campaigns().len(), 3);
        assert_eq!(repo.contacts().len(), 4);
        assert_eq!(repo.templates().len(), 3);
        assert_eq!(repo.domains().len(), 2);
        assert_eq!(repo.notifications().len(), 3);
        assert_eq!(repo.settings().organization_name, "Mailforge");
    }

    #[test]
    fn settings_round_trip() {
        let mut repo = seeded_repo();
        let mut settings = repo.settings();
        settings.daily_send_limit = 1200;
        settings.auto_responders = false;
        repo.save_settings(settings.clone()).unwrap();
        assert_eq!(repo.settings(), settings);
    }

    #[test]
    fn state_survives_close_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.db");

        {
            let mut repo = Repository::open(Store::open_at(&path).unwrap()).unwrap();
            repo.update_contact(
                "u-004",
                ContactPatch {
                    score: Some(77),
                    ..Default::default()
                },
            )
            .unwrap();
            repo.close();
        }

        let repo = Repository::open(Store::open_at(&path).unwrap()).unwrap();
        // Reopen must not re-seed, and must see the persisted write.
        assert_eq!(repo.campaigns().len(), 3);
        assert_eq!(repo.contact("u-004").unwrap().score, 77);
    }
}
