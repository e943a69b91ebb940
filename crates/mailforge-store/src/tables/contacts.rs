use mailforge_shared::{ActivityEvent, Contact};
use rusqlite::params;

use crate::codec;
use crate::error::Result;
use crate::store::Store;

const SELECT: &str = "SELECT id, first_name, last_name, email, company, role, industry,
        tags, status, score, history, last_activity
 FROM contacts";

impl Store {
    pub(crate) fn load_contacts(&self) -> Vec<Contact> {
        self.read_all("contacts", SELECT, codec::row_to_contact)
    }

    /// Insert or fully rewrite a contact row (merge-then-rewrite updates
    /// land here too).
    pub(crate) fn upsert_contact(&self, contact: &Contact) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO contacts
                (id, first_name, last_name, email, company, role, industry,
                 tags, status, score, history, last_activity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                contact.id,
                contact.first_name,
                contact.last_name,
                contact.email,
                contact.company,
                contact.role,
                contact.industry,
                codec::encode_json(&contact.tags)?,
                contact.status.as_str(),
                contact.score,
                codec::encode_json(&contact.history)?,
                contact.last_activity,
            ],
        )?;
        self.checkpoint()
    }

    /// Rewrite only the embedded history column and stamp the freshness
    /// label.
    pub(crate) fn update_contact_history(
        &self,
        id: &str,
        history: &[ActivityEvent],
    ) -> Result<bool> {
        let affected = self.conn().execute(
            "UPDATE contacts SET history = ?1, last_activity = 'Just now' WHERE id = ?2",
            params![codec::encode_json(&history)?, id],
        )?;
        self.checkpoint()?;
        Ok(affected > 0)
    }

    pub(crate) fn delete_contact(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
        self.checkpoint()?;
        Ok(affected > 0)
    }
}
