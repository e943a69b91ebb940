//! Email template operations.

use chrono::Utc;
use mailforge_shared::{EmailTemplate, TemplateCategory};

use crate::error::{Result, StoreError};
use crate::repository::{generate_id, Repository};

/// Input for [`Repository::save_template`].
///
/// With an id, present fields are merged over the stored template; without
/// one, a new template is created with defaults for anything omitted.
#[derive(Debug, Clone, Default)]
pub struct TemplateDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub subject: Option<String>,
    pub category: Option<TemplateCategory>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Repository {
    pub fn templates(&self) -> Vec<EmailTemplate> {
        self.cache().templates.clone()
    }

    pub fn template(&self, id: &str) -> Option<EmailTemplate> {
        self.cache().templates.iter().find(|t| t.id == id).cloned()
    }

    /// Create or merge-update a template, stamping `last_modified`.
    ///
    /// Returns the stored record, or `Ok(None)` when the draft names an
    /// id that does not exist.
    pub fn save_template(&mut self, draft: TemplateDraft) -> Result<Option<EmailTemplate>> {
        let stamp = Utc::now().format("%b %-d").to_string();

        let template = match &draft.id {
            Some(id) => {
                let Some(mut current) = self.template(id) else {
                    return Ok(None);
                };
                if let Some(v) = draft.name {
                    current.name = v;
                }
                if let Some(v) = draft.subject {
                    current.subject = v;
                }
                if let Some(v) = draft.category {
                    current.category = v;
                }
                if let Some(v) = draft.content {
                    current.content = v;
                }
                if let Some(v) = draft.tags {
                    current.tags = v;
                }
                current.last_modified = stamp;
                current
            }
            None => EmailTemplate {
                id: generate_id("t"),
                name: draft.name.unwrap_or_else(|| "Untitled".to_string()),
                subject: draft.subject.unwrap_or_default(),
                category: draft.category.unwrap_or_default(),
                content: draft.content.unwrap_or_default(),
                tags: draft.tags.unwrap_or_default(),
                is_system: false,
                last_modified: stamp,
            },
        };

        self.store.upsert_template(&template)?;
        self.refresh();
        Ok(Some(template))
    }

    /// Delete a template.  System templates are protected; campaigns
    /// referencing the deleted id keep their dangling weak reference.
    pub fn delete_template(&mut self, id: &str) -> Result<bool> {
        if let Some(template) = self.template(id) {
            if template.is_system {
                return Err(StoreError::Validation(
                    "system templates cannot be deleted".into(),
                ));
            }
        }

        let deleted = self.store.delete_template(id)?;
        self.refresh();
        Ok(deleted)
    }
}
