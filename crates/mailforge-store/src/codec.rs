//! Row codec: conversion between flat SQLite rows and domain entities.
//!
//! Structured fields (tags, history, funnel trees) travel as JSON text
//! columns; booleans as 0/1 integers; status enums as their token text.
//! Encoding is exact, so decoding an encoded row reproduces the entity.
//!
//! Decoding fails closed per column: malformed JSON or an unrecognized
//! enum token is logged and replaced with a neutral value, so one corrupt
//! row can never halt a full-table read.  Every `row_to_*` mapper assumes
//! the full column order of its table as declared in [`crate::schema`].

use chrono::{DateTime, Utc};
use mailforge_shared::{
    ActivityEvent, AppNotification, Campaign, CampaignStatus, Contact, Domain, DomainStatus,
    EmailTemplate, FunnelConfig, LeadStatus, NotificationKind, TemplateCategory,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Serialize a structured field into its JSON column text.
pub(crate) fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Serialize an optional funnel tree; `None` becomes a NULL column.
pub(crate) fn encode_funnel(funnel: Option<&FunnelConfig>) -> Result<Option<String>> {
    funnel.map(|f| encode_json(f)).transpose()
}

// ---------------------------------------------------------------------------
// Fail-closed decoding helpers
// ---------------------------------------------------------------------------

fn decode_json_or_default<T: DeserializeOwned + Default>(raw: &str, column: &str, id: &str) -> T {
    match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = %e, column, id, "corrupt JSON column, substituting default");
            T::default()
        }
    }
}

fn decode_funnel(raw: Option<String>, id: &str) -> Option<FunnelConfig> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    match serde_json::from_str(&raw) {
        Ok(funnel) => Some(funnel),
        Err(e) => {
            tracing::warn!(error = %e, id, "corrupt funnel_config column, dropping tree");
            None
        }
    }
}

fn decode_token<T: Default>(parsed: Option<T>, raw: &str, column: &str, id: &str) -> T {
    parsed.unwrap_or_else(|| {
        tracing::warn!(raw, column, id, "unrecognized token, substituting default");
        T::default()
    })
}

fn decode_timestamp(raw: &str, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
        })
}

// ---------------------------------------------------------------------------
// Row mappers
// ---------------------------------------------------------------------------

pub(crate) fn row_to_campaign(row: &rusqlite::Row<'_>) -> rusqlite::Result<Campaign> {
    let id: String = row.get(0)?;
    let status_raw: String = row.get(4)?;
    let funnel_raw: Option<String> = row.get(12)?;

    Ok(Campaign {
        status: decode_token(CampaignStatus::parse(&status_raw), &status_raw, "status", &id),
        funnel_config: decode_funnel(funnel_raw, &id),
        name: row.get(1)?,
        subject: row.get(2)?,
        segment: row.get(3)?,
        sent: row.get(5)?,
        opened: row.get(6)?,
        clicked: row.get(7)?,
        converted: row.get(8)?,
        audience_size: row.get(9)?,
        last_updated: row.get(10)?,
        template_id: row.get(11)?,
        id,
    })
}

pub(crate) fn row_to_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    let id: String = row.get(0)?;
    let tags_raw: String = row.get(7)?;
    let status_raw: String = row.get(8)?;
    let history_raw: String = row.get(10)?;

    Ok(Contact {
        tags: decode_json_or_default::<Vec<String>>(&tags_raw, "tags", &id),
        status: decode_token(LeadStatus::parse(&status_raw), &status_raw, "status", &id),
        history: decode_json_or_default::<Vec<ActivityEvent>>(&history_raw, "history", &id),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        company: row.get(4)?,
        role: row.get(5)?,
        industry: row.get(6)?,
        score: row.get(9)?,
        last_activity: row.get(11)?,
        id,
    })
}

pub(crate) fn row_to_template(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmailTemplate> {
    let id: String = row.get(0)?;
    let category_raw: String = row.get(3)?;
    let tags_raw: String = row.get(5)?;
    let is_system: i64 = row.get(6)?;

    Ok(EmailTemplate {
        category: decode_token(
            TemplateCategory::parse(&category_raw),
            &category_raw,
            "category",
            &id,
        ),
        tags: decode_json_or_default::<Vec<String>>(&tags_raw, "tags", &id),
        is_system: is_system != 0,
        name: row.get(1)?,
        subject: row.get(2)?,
        content: row.get(4)?,
        last_modified: row.get(7)?,
        id,
    })
}

pub(crate) fn row_to_domain(row: &rusqlite::Row<'_>) -> rusqlite::Result<Domain> {
    let id: String = row.get(0)?;
    let status_raw: String = row.get(2)?;
    let spf: i64 = row.get(3)?;
    let dkim: i64 = row.get(4)?;
    let dmarc: i64 = row.get(5)?;

    Ok(Domain {
        status: decode_token(DomainStatus::parse(&status_raw), &status_raw, "status", &id),
        spf_verified: spf != 0,
        dkim_verified: dkim != 0,
        dmarc_verified: dmarc != 0,
        domain: row.get(1)?,
        id,
    })
}

pub(crate) fn row_to_notification(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppNotification> {
    let id: String = row.get(0)?;
    let kind_raw: String = row.get(3)?;
    let is_read: i64 = row.get(4)?;
    let ts_raw: String = row.get(5)?;

    Ok(AppNotification {
        kind: decode_token(NotificationKind::parse(&kind_raw), &kind_raw, "kind", &id),
        is_read: is_read != 0,
        timestamp: decode_timestamp(&ts_raw, 5)?,
        title: row.get(1)?,
        message: row.get(2)?,
        link: row.get(6)?,
        id,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use mailforge_shared::{
        ActivityKind, Branches, FunnelKind, FunnelNode, SearchResults,
    };

    use super::*;
    use crate::store::Store;

    fn sample_campaign() -> Campaign {
        Campaign {
            id: "c-rt".to_string(),
            name: "Round Trip".to_string(),
            subject: "Testing".to_string(),
            segment: "All Contacts".to_string(),
            status: CampaignStatus::Running,
            sent: 12,
            opened: 7,
            clicked: 3,
            converted: 1,
            audience_size: 40,
            last_updated: "2 hours ago".to_string(),
            template_id: Some("t-404".to_string()),
            funnel_config: Some(FunnelConfig::new(vec![
                FunnelNode::new("start", "Start", FunnelKind::Trigger { children: vec![] }),
                FunnelNode::new(
                    "cond-1",
                    "Opened?",
                    FunnelKind::Condition {
                        branches: Branches {
                            when_true: vec![FunnelNode::new(
                                "email-2",
                                "Follow-up",
                                FunnelKind::Email { children: vec![] },
                            )
                            .with_config("subject", "Specs")],
                            when_false: vec![],
                        },
                    },
                ),
            ])),
        }
    }

    fn sample_contact() -> Contact {
        let mut metadata = BTreeMap::new();
        metadata.insert("campaign_id".to_string(), serde_json::json!("c-001"));
        Contact {
            id: "u-rt".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: "Analytical Engines".to_string(),
            role: "Engineer".to_string(),
            industry: "Computing".to_string(),
            tags: vec!["VIP".to_string(), "EU Region".to_string()],
            status: LeadStatus::Hot,
            score: 92,
            history: vec![ActivityEvent {
                id: "evt-1".to_string(),
                kind: ActivityKind::EmailOpened,
                description: "Opened \"Testing\"".to_string(),
                timestamp: Utc::now(),
                metadata,
            }],
            last_activity: "Just now".to_string(),
        }
    }

    #[test]
    fn campaign_round_trip() {
        let store = Store::in_memory().unwrap();
        let campaign = sample_campaign();
        store.upsert_campaign(&campaign).unwrap();
        assert_eq!(store.load_campaigns(), vec![campaign]);
    }

    #[test]
    fn campaign_without_funnel_round_trips() {
        let store = Store::in_memory().unwrap();
        let campaign = Campaign {
            template_id: None,
            funnel_config: None,
            ..sample_campaign()
        };
        store.upsert_campaign(&campaign).unwrap();
        assert_eq!(store.load_campaigns(), vec![campaign]);
    }

    #[test]
    fn contact_round_trip() {
        let store = Store::in_memory().unwrap();
        let contact = sample_contact();
        store.upsert_contact(&contact).unwrap();
        assert_eq!(store.load_contacts(), vec![contact]);
    }

    #[test]
    fn template_round_trip() {
        let store = Store::in_memory().unwrap();
        let template = EmailTemplate {
            id: "t-rt".to_string(),
            name: "Welcome".to_string(),
            subject: "Hello {{firstName}}".to_string(),
            category: TemplateCategory::Nurture,
            content: "Hi {{firstName}},\n\nWelcome aboard.".to_string(),
            tags: vec!["Onboarding".to_string()],
            is_system: true,
            last_modified: "Jan 10".to_string(),
        };
        store.upsert_template(&template).unwrap();
        assert_eq!(store.load_templates(), vec![template]);
    }

    #[test]
    fn domain_round_trip() {
        let store = Store::in_memory().unwrap();
        let domain = Domain {
            id: "d-rt".to_string(),
            domain: "mail.example.com".to_string(),
            status: DomainStatus::WarmingUp,
            spf_verified: true,
            dkim_verified: false,
            dmarc_verified: true,
        };
        store.upsert_domain(&domain).unwrap();
        assert_eq!(store.load_domains(), vec![domain]);
    }

    #[test]
    fn notification_round_trip() {
        let store = Store::in_memory().unwrap();
        let note = AppNotification {
            id: "n-rt".to_string(),
            title: "Campaign Completed".to_string(),
            message: "Done sending.".to_string(),
            kind: NotificationKind::Success,
            is_read: false,
            timestamp: Utc::now(),
            link: Some("/campaigns/c-001".to_string()),
        };
        store.insert_notification(&note).unwrap();
        assert_eq!(store.load_notifications(), vec![note]);
    }

    #[test]
    fn corrupt_json_column_falls_back_instead_of_erroring() {
        let store = Store::in_memory().unwrap();
        let contact = sample_contact();
        store.upsert_contact(&contact).unwrap();

        store
            .conn()
            .execute(
                "UPDATE contacts SET history = 'not json', tags = '{broken' WHERE id = ?1",
                rusqlite::params![contact.id],
            )
            .unwrap();

        let loaded = store.load_contacts();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].history.is_empty());
        assert!(loaded[0].tags.is_empty());
        // The rest of the row is untouched.
        assert_eq!(loaded[0].email, contact.email);
    }

    #[test]
    fn unknown_status_token_falls_back_to_default() {
        let store = Store::in_memory().unwrap();
        store.upsert_campaign(&sample_campaign()).unwrap();
        store
            .conn()
            .execute("UPDATE campaigns SET status = 'archived'", [])
            .unwrap();

        let loaded = store.load_campaigns();
        assert_eq!(loaded[0].status, CampaignStatus::Draft);
    }

    #[test]
    fn search_results_default_is_empty() {
        assert!(SearchResults::default().is_empty());
    }
}
