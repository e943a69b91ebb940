use mailforge_shared::EmailTemplate;
use rusqlite::params;

use crate::codec;
use crate::error::Result;
use crate::store::Store;

const SELECT: &str = "SELECT id, name, subject, category, content, tags, is_system, last_modified
 FROM templates";

impl Store {
    pub(crate) fn load_templates(&self) -> Vec<EmailTemplate> {
        self.read_all("templates", SELECT, codec::row_to_template)
    }

    pub(crate) fn upsert_template(&self, template: &EmailTemplate) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO templates
                (id, name, subject, category, content, tags, is_system, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                template.id,
                template.name,
                template.subject,
                template.category.as_str(),
                template.content,
                codec::encode_json(&template.tags)?,
                template.is_system as i64,
                template.last_modified,
            ],
        )?;
        self.checkpoint()
    }

    pub(crate) fn delete_template(&self, id: &str) -> Result<bool> {
        let affected = self
            .conn()
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        self.checkpoint()?;
        Ok(affected > 0)
    }
}
