//! In-memory read snapshot.
//!
//! The repository rebuilds the whole snapshot after every mutation and
//! swaps it in as one value, so readers never observe a half-refreshed
//! cache.  No incremental patching: wholesale reload is simple and cheap
//! at this data scale.

use mailforge_shared::{AppNotification, AppSettings, Campaign, Contact, Domain, EmailTemplate};

use crate::store::Store;

#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    pub campaigns: Vec<Campaign>,
    pub contacts: Vec<Contact>,
    pub templates: Vec<EmailTemplate>,
    pub domains: Vec<Domain>,
    /// Kept sorted descending by timestamp.  No other collection has an
    /// ordering guarantee beyond table insertion order.
    pub notifications: Vec<AppNotification>,
    pub settings: AppSettings,
}

impl CacheSnapshot {
    /// Re-read all six tables in full and build a fresh snapshot.
    pub fn load(store: &Store) -> Self {
        let mut notifications = store.load_notifications();
        notifications.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Self {
            campaigns: store.load_campaigns(),
            contacts: store.load_contacts(),
            templates: store.load_templates(),
            domains: store.load_domains(),
            notifications,
            settings: store.load_settings(),
        }
    }
}
