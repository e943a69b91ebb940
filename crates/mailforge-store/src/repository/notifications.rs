//! Notification operations.

use chrono::Utc;
use mailforge_shared::{AppNotification, NotificationKind};

use crate::error::Result;
use crate::repository::{generate_id, Repository};

/// Input for [`Repository::add_notification`].  Id, timestamp and the
/// unread flag are stamped at insert time.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
}

impl Repository {
    /// All notifications, most recent first.
    pub fn notifications(&self) -> Vec<AppNotification> {
        self.cache().notifications.clone()
    }

    pub fn unread_notification_count(&self) -> usize {
        self.cache()
            .notifications
            .iter()
            .filter(|n| !n.is_read)
            .count()
    }

    pub fn add_notification(&mut self, new: NewNotification) -> Result<AppNotification> {
        let note = AppNotification {
            id: generate_id("n"),
            title: new.title,
            message: new.message,
            kind: new.kind,
            is_read: false,
            timestamp: Utc::now(),
            link: new.link,
        };

        self.store.insert_notification(&note)?;
        self.refresh();
        Ok(note)
    }

    pub fn mark_notification_read(&mut self, id: &str) -> Result<bool> {
        let marked = self.store.mark_notification_read(id)?;
        self.refresh();
        Ok(marked)
    }

    /// Returns how many notifications were newly marked.
    pub fn mark_all_notifications_read(&mut self) -> Result<usize> {
        let marked = self.store.mark_all_notifications_read()?;
        self.refresh();
        Ok(marked)
    }
}
