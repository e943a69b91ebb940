use mailforge_shared::AppNotification;
use rusqlite::params;

use crate::codec;
use crate::error::Result;
use crate::store::Store;

const SELECT: &str =
    "SELECT id, title, message, kind, is_read, timestamp, link FROM notifications";

impl Store {
    pub(crate) fn load_notifications(&self) -> Vec<AppNotification> {
        self.read_all("notifications", SELECT, codec::row_to_notification)
    }

    pub(crate) fn insert_notification(&self, note: &AppNotification) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO notifications
                (id, title, message, kind, is_read, timestamp, link)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.id,
                note.title,
                note.message,
                note.kind.as_str(),
                note.is_read as i64,
                note.timestamp.to_rfc3339(),
                note.link,
            ],
        )?;
        self.checkpoint()
    }

    pub(crate) fn mark_notification_read(&self, id: &str) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE notifications SET is_read = 1 WHERE id = ?1",
            params![id],
        )?;
        self.checkpoint()?;
        Ok(affected > 0)
    }

    pub(crate) fn mark_all_notifications_read(&self) -> Result<usize> {
        let affected = self
            .conn()
            .execute("UPDATE notifications SET is_read = 1 WHERE is_read = 0", [])?;
        self.checkpoint()?;
        Ok(affected)
    }
}
