//! Contact / lead operations, including activity logging and bulk send.

use std::collections::BTreeMap;

use chrono::Utc;
use mailforge_shared::{ActivityEvent, ActivityKind, Contact, LeadStatus, NotificationKind};
use serde_json::{json, Value};

use crate::error::{Result, StoreError};
use crate::repository::{generate_id, NewNotification, Repository};

/// Input for [`Repository::add_contact`].  Omitted lifecycle fields get
/// their defaults: status `new`, score 0, empty history, `"Just now"`.
#[derive(Debug, Clone, Default)]
pub struct NewContact {
    /// Explicit id, e.g. for imports.  Generated when `None`.
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub industry: String,
    pub tags: Vec<String>,
}

/// Partial update merged over the current record (last writer wins).
#[derive(Debug, Clone, Default)]
pub struct ContactPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub industry: Option<String>,
    pub tags: Option<Vec<String>>,
    pub status: Option<LeadStatus>,
    pub score: Option<i64>,
    pub last_activity: Option<String>,
}

impl ContactPatch {
    fn apply(self, mut contact: Contact) -> Contact {
        if let Some(v) = self.first_name {
            contact.first_name = v;
        }
        if let Some(v) = self.last_name {
            contact.last_name = v;
        }
        if let Some(v) = self.email {
            contact.email = v;
        }
        if let Some(v) = self.company {
            contact.company = v;
        }
        if let Some(v) = self.role {
            contact.role = v;
        }
        if let Some(v) = self.industry {
            contact.industry = v;
        }
        if let Some(v) = self.tags {
            contact.tags = v;
        }
        if let Some(v) = self.status {
            contact.status = v;
        }
        if let Some(v) = self.score {
            contact.score = v;
        }
        if let Some(v) = self.last_activity {
            contact.last_activity = v;
        }
        contact
    }
}

/// Input for [`Repository::add_activity`].  The event id and timestamp
/// are stamped at insert time.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub description: String,
    pub metadata: BTreeMap<String, Value>,
}

impl NewActivity {
    pub fn new(kind: ActivityKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            metadata: BTreeMap::new(),
        }
    }
}

impl Repository {
    pub fn contacts(&self) -> Vec<Contact> {
        self.cache().contacts.clone()
    }

    pub fn contact(&self, id: &str) -> Option<Contact> {
        self.cache().contacts.iter().find(|c| c.id == id).cloned()
    }

    /// Create a contact with lifecycle defaults.  Rejected before any
    /// write when the email is empty.
    pub fn add_contact(&mut self, new: NewContact) -> Result<Contact> {
        if new.email.trim().is_empty() {
            return Err(StoreError::Validation("contact email is required".into()));
        }

        let contact = Contact {
            id: new.id.unwrap_or_else(|| generate_id("u")),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            company: new.company,
            role: new.role,
            industry: new.industry,
            tags: new.tags,
            status: LeadStatus::New,
            score: 0,
            history: Vec::new(),
            last_activity: "Just now".to_string(),
        };

        self.store.upsert_contact(&contact)?;
        self.refresh();
        Ok(contact)
    }

    /// Merge the patch over the current record and rewrite the full row.
    /// Returns `Ok(false)` for an unknown id.
    pub fn update_contact(&mut self, id: &str, patch: ContactPatch) -> Result<bool> {
        let Some(current) = self.contact(id) else {
            return Ok(false);
        };

        let merged = patch.apply(current);
        self.store.upsert_contact(&merged)?;
        self.refresh();
        Ok(true)
    }

    pub fn delete_contact(&mut self, id: &str) -> Result<bool> {
        let deleted = self.store.delete_contact(id)?;
        self.refresh();
        Ok(deleted)
    }

    /// Mark a lead converted: status `converted`, score +50 capped at 100,
    /// and a `status_change` activity.  Idempotent; returns whether the
    /// conversion happened.
    pub fn convert_lead(&mut self, id: &str) -> Result<bool> {
        let Some(contact) = self.contact(id) else {
            return Ok(false);
        };
        if contact.status == LeadStatus::Converted {
            return Ok(false);
        }

        self.update_contact(
            id,
            ContactPatch {
                status: Some(LeadStatus::Converted),
                score: Some((contact.score + 50).min(100)),
                ..Default::default()
            },
        )?;
        self.add_activity(
            id,
            NewActivity::new(ActivityKind::StatusChange, "Lead converted to deal"),
        )?;
        Ok(true)
    }

    /// Prepend a generated-id event to the contact's history (most recent
    /// first) and stamp the freshness label.  No-op for unknown ids.
    pub fn add_activity(&mut self, contact_id: &str, activity: NewActivity) -> Result<bool> {
        let Some(contact) = self.contact(contact_id) else {
            return Ok(false);
        };

        let mut history = contact.history;
        history.insert(
            0,
            ActivityEvent {
                id: generate_id("evt"),
                kind: activity.kind,
                description: activity.description,
                timestamp: Utc::now(),
                metadata: activity.metadata,
            },
        );

        self.store.update_contact_history(contact_id, &history)?;
        self.refresh();
        Ok(true)
    }

    /// Log an `email_sent` activity for each contact id and raise one
    /// aggregate success notification.
    ///
    /// Returns 0 and performs no writes when the template id does not
    /// resolve (weak reference).  Not transactional: a failure partway
    /// through leaves earlier contacts' activities persisted
    /// (at-least-once per contact, no rollback).
    pub fn bulk_send_email(
        &mut self,
        contact_ids: &[String],
        template_id: &str,
        subject: &str,
    ) -> Result<usize> {
        if self.template(template_id).is_none() {
            tracing::warn!(template_id, "bulk send aborted, unknown template");
            return Ok(0);
        }

        let mut sent = 0;
        for contact_id in contact_ids {
            let mut activity = NewActivity::new(
                ActivityKind::EmailSent,
                format!("Bulk email: {subject}"),
            );
            activity
                .metadata
                .insert("template_id".to_string(), json!(template_id));

            self.add_activity(contact_id, activity)?;
            sent += 1;
        }

        self.add_notification(NewNotification {
            title: "Bulk Email Sent".to_string(),
            message: format!("Successfully sent \"{subject}\" to {sent} contacts."),
            kind: NotificationKind::Success,
            link: None,
        })?;

        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::seeded_repo;

    #[test]
    fn add_contact_fills_lifecycle_defaults() {
        let mut repo = seeded_repo();
        let contact = repo
            .add_contact(NewContact {
                first_name: "Grace".to_string(),
                last_name: "Hopper".to_string(),
                email: "grace@navy.mil".to_string(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(contact.status, LeadStatus::New);
        assert_eq!(contact.score, 0);
        assert!(contact.history.is_empty());
        assert_eq!(contact.last_activity, "Just now");
        assert_eq!(repo.contact(&contact.id), Some(contact));
    }

    #[test]
    fn add_contact_requires_an_email() {
        let mut repo = seeded_repo();
        let before = repo.contacts().len();
        let err = repo.add_contact(NewContact::default()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(repo.contacts().len(), before);
    }

    #[test]
    fn read_reflects_most_recent_write() {
        let mut repo = seeded_repo();
        assert!(repo
            .update_contact(
                "u-002",
                ContactPatch {
                    score: Some(81),
                    ..Default::default()
                },
            )
            .unwrap());
        assert_eq!(repo.contact("u-002").unwrap().score, 81);

        // Untouched fields survive the merge-then-rewrite.
        assert_eq!(repo.contact("u-002").unwrap().company, "Dow Chemical");
    }

    #[test]
    fn update_unknown_contact_reports_false() {
        let mut repo = seeded_repo();
        assert!(!repo.update_contact("u-999", ContactPatch::default()).unwrap());
    }

    #[test]
    fn convert_lead_is_idempotent() {
        let mut repo = seeded_repo();

        // u-002 starts engaged with score 65.
        assert!(repo.convert_lead("u-002").unwrap());
        let converted = repo.contact("u-002").unwrap();
        assert_eq!(converted.status, LeadStatus::Converted);
        assert_eq!(converted.score, 100); // 65 + 50, capped
        assert_eq!(converted.history[0].kind, ActivityKind::StatusChange);

        // Second call is a no-op.
        assert!(!repo.convert_lead("u-002").unwrap());
        let unchanged = repo.contact("u-002").unwrap();
        assert_eq!(unchanged.score, 100);
        assert_eq!(unchanged.history.len(), converted.history.len());
    }

    #[test]
    fn convert_lead_clamps_score_at_100() {
        let mut repo = seeded_repo();
        // u-004 starts at 20.
        assert!(repo.convert_lead("u-004").unwrap());
        assert_eq!(repo.contact("u-004").unwrap().score, 70);
    }

    #[test]
    fn add_activity_prepends_without_reordering() {
        let mut repo = seeded_repo();

        // u-001 seeds with two history entries.
        let seeded: Vec<String> = repo
            .contact("u-001")
            .unwrap()
            .history
            .iter()
            .map(|e| e.id.clone())
            .collect();
        assert_eq!(seeded.len(), 2);

        repo.add_activity(
            "u-001",
            NewActivity::new(ActivityKind::NoteAdded, "Called about renewal"),
        )
        .unwrap();

        let contact = repo.contact("u-001").unwrap();
        assert_eq!(contact.history.len(), 3);
        assert_eq!(contact.history[0].kind, ActivityKind::NoteAdded);
        assert_eq!(contact.history[1].id, seeded[0]);
        assert_eq!(contact.history[2].id, seeded[1]);
        assert_eq!(contact.last_activity, "Just now");
    }

    #[test]
    fn add_activity_for_unknown_contact_is_a_noop() {
        let mut repo = seeded_repo();
        assert!(!repo
            .add_activity("u-999", NewActivity::new(ActivityKind::NoteAdded, "x"))
            .unwrap());
    }

    #[test]
    fn bulk_send_with_missing_template_writes_nothing() {
        let mut repo = seeded_repo();
        let before_u2 = repo.contact("u-002").unwrap().history.len();
        let before_u4 = repo.contact("u-004").unwrap().history.len();
        let notes_before = repo.notifications().len();

        let sent = repo
            .bulk_send_email(
                &["u-002".to_string(), "u-004".to_string()],
                "t-missing",
                "Hello",
            )
            .unwrap();

        assert_eq!(sent, 0);
        assert_eq!(repo.contact("u-002").unwrap().history.len(), before_u2);
        assert_eq!(repo.contact("u-004").unwrap().history.len(), before_u4);
        assert_eq!(repo.notifications().len(), notes_before);
    }

    #[test]
    fn bulk_send_logs_activity_and_raises_one_notification() {
        let mut repo = seeded_repo();
        let notes_before = repo.notifications().len();

        let sent = repo
            .bulk_send_email(
                &["u-002".to_string(), "u-004".to_string()],
                "t-002",
                "Reduce your logistics costs",
            )
            .unwrap();
        assert_eq!(sent, 2);

        for id in ["u-002", "u-004"] {
            let top = repo.contact(id).unwrap().history.remove(0);
            assert_eq!(top.kind, ActivityKind::EmailSent);
            assert_eq!(top.metadata["template_id"], json!("t-002"));
        }

        let notes = repo.notifications();
        assert_eq!(notes.len(), notes_before + 1);
        assert!(notes[0].message.contains("2 contacts"));
        assert_eq!(notes[0].kind, NotificationKind::Success);
    }

    #[test]
    fn delete_contact_removes_the_row() {
        let mut repo = seeded_repo();
        assert!(repo.delete_contact("u-004").unwrap());
        assert!(repo.contact("u-004").is_none());
        assert!(!repo.delete_contact("u-004").unwrap());
    }
}
