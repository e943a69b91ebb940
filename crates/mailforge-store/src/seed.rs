//! One-time demo dataset.
//!
//! [`seed_if_empty`] keys off an emptiness check on the campaigns table,
//! so it is safe to call on every startup.  The inserts are not wrapped
//! in a transaction: an interrupted seed leaves a non-empty table and a
//! later run skips it.  Accepted for demo data.

use std::collections::BTreeMap;

use chrono::{Duration, Utc};
use mailforge_shared::{
    ActivityEvent, ActivityKind, AppNotification, AppSettings, Branches, Campaign, CampaignStatus,
    Contact, Domain, DomainStatus, EmailTemplate, FunnelConfig, FunnelKind, FunnelNode, LeadStatus,
    NotificationKind, TemplateCategory,
};
use serde_json::json;

use crate::error::Result;
use crate::store::Store;

/// Seed the demo dataset if the store has never been populated.
/// Returns whether seeding happened.
pub fn seed_if_empty(store: &Store) -> Result<bool> {
    if store.count_campaigns()? > 0 {
        return Ok(false);
    }

    tracing::info!("empty store, seeding demo dataset");

    for campaign in seed_campaigns() {
        store.upsert_campaign(&campaign)?;
    }
    for contact in seed_contacts() {
        store.upsert_contact(&contact)?;
    }
    for template in seed_templates() {
        store.upsert_template(&template)?;
    }
    for domain in seed_domains() {
        store.upsert_domain(&domain)?;
    }
    for note in seed_notifications() {
        store.insert_notification(&note)?;
    }
    store.save_settings(&AppSettings::default())?;

    Ok(true)
}

fn trigger_only_funnel(subtitle: &str) -> FunnelConfig {
    FunnelConfig::new(vec![FunnelNode::new(
        "start",
        "Start",
        FunnelKind::Trigger { children: vec![] },
    )
    .with_subtitle(subtitle)])
}

fn seed_campaigns() -> Vec<Campaign> {
    let launch_funnel = FunnelConfig::new(vec![
        FunnelNode::new("start", "Start Campaign", FunnelKind::Trigger { children: vec![] })
            .with_subtitle("Segment: Pharma"),
        FunnelNode::new("email-1", "Announcement Email", FunnelKind::Email { children: vec![] })
            .with_subtitle("Template: Product Launch")
            .with_config("subject", "Announcing new series"),
        FunnelNode::new("delay-1", "Wait 2 Days", FunnelKind::Delay { children: vec![] })
            .with_subtitle("Wait for engagement")
            .with_config("duration", "2")
            .with_config("unit", "days"),
        FunnelNode::new(
            "cond-1",
            "Opened Email?",
            FunnelKind::Condition {
                branches: Branches {
                    when_true: vec![
                        FunnelNode::new("score-1", "Score +10", FunnelKind::Action { children: vec![] })
                            .with_subtitle("Increase Lead Score"),
                        FunnelNode::new("email-2", "Follow-up: Specs", FunnelKind::Email { children: vec![] })
                            .with_subtitle("Send technical details")
                            .with_config("subject", "Here are the specs"),
                    ],
                    when_false: vec![FunnelNode::new(
                        "email-3",
                        "Re-send: Different Subject",
                        FunnelKind::Email { children: vec![] },
                    )
                    .with_subtitle("Try new angle")
                    .with_config("subject", "Did you see this?")],
                },
            },
        )
        .with_subtitle("Check behavior")
        .with_config("conditionType", "Has Opened Email"),
    ]);

    vec![
        Campaign {
            id: "c-001".to_string(),
            name: "Q1 Product Launch".to_string(),
            subject: "Announcing the new polymer series".to_string(),
            segment: "Pharma Industry Leads".to_string(),
            status: CampaignStatus::Running,
            sent: 1240,
            opened: 856,
            clicked: 342,
            converted: 45,
            audience_size: 1500,
            last_updated: "2 hours ago".to_string(),
            template_id: Some("t-001".to_string()),
            funnel_config: Some(launch_funnel),
        },
        Campaign {
            id: "c-002".to_string(),
            name: "Cold Outreach - EU".to_string(),
            subject: "Partnership opportunity in Berlin".to_string(),
            segment: "Cold Leads".to_string(),
            status: CampaignStatus::Paused,
            sent: 450,
            opened: 120,
            clicked: 15,
            converted: 2,
            audience_size: 2000,
            last_updated: "1 day ago".to_string(),
            template_id: Some("t-002".to_string()),
            funnel_config: Some(trigger_only_funnel("Segment: Cold Leads")),
        },
        Campaign {
            id: "c-003".to_string(),
            name: "Webinar Invite".to_string(),
            subject: "Join us: Future of Chemical Logistics".to_string(),
            segment: "All Contacts".to_string(),
            status: CampaignStatus::Draft,
            sent: 0,
            opened: 0,
            clicked: 0,
            converted: 0,
            audience_size: 3200,
            last_updated: "Just now".to_string(),
            template_id: Some("t-003".to_string()),
            funnel_config: Some(trigger_only_funnel("Segment: All Contacts")),
        },
    ]
}

fn seed_contacts() -> Vec<Contact> {
    let now = Utc::now();
    let campaign_meta: BTreeMap<String, serde_json::Value> =
        [("campaign_id".to_string(), json!("c-001"))].into_iter().collect();

    vec![
        Contact {
            id: "u-001".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Chen".to_string(),
            email: "alice.c@pfizer.com".to_string(),
            company: "Pfizer".to_string(),
            role: "Procurement Manager".to_string(),
            industry: "Pharmaceuticals".to_string(),
            tags: vec!["Enterprise".to_string(), "Decision Maker".to_string()],
            status: LeadStatus::Hot,
            score: 92,
            history: vec![
                ActivityEvent {
                    id: "evt-001".to_string(),
                    kind: ActivityKind::ScoreChange,
                    description: "Score increased by 15 (Email Open)".to_string(),
                    timestamp: now - Duration::hours(2),
                    metadata: BTreeMap::new(),
                },
                ActivityEvent {
                    id: "evt-002".to_string(),
                    kind: ActivityKind::EmailSent,
                    description: "Sent \"Q1 Product Launch\"".to_string(),
                    timestamp: now - Duration::days(1),
                    metadata: campaign_meta,
                },
            ],
            last_activity: "2 hours ago".to_string(),
        },
        Contact {
            id: "u-002".to_string(),
            first_name: "Mark".to_string(),
            last_name: "Johnson".to_string(),
            email: "mark.j@dow.com".to_string(),
            company: "Dow Chemical".to_string(),
            role: "VP of Operations".to_string(),
            industry: "Chemicals".to_string(),
            tags: vec!["VIP".to_string()],
            status: LeadStatus::Engaged,
            score: 65,
            history: vec![],
            last_activity: "1 day ago".to_string(),
        },
        Contact {
            id: "u-003".to_string(),
            first_name: "Sarah".to_string(),
            last_name: "Miller".to_string(),
            email: "s.miller@bayer.de".to_string(),
            company: "Bayer".to_string(),
            role: "Supply Chain Lead".to_string(),
            industry: "Pharmaceuticals".to_string(),
            tags: vec!["EU Region".to_string()],
            status: LeadStatus::Converted,
            score: 100,
            history: vec![ActivityEvent {
                id: "evt-003".to_string(),
                kind: ActivityKind::DemoBooked,
                description: "Demo booked via Calendly".to_string(),
                timestamp: now - Duration::days(3),
                metadata: BTreeMap::new(),
            }],
            last_activity: "3 days ago".to_string(),
        },
        Contact {
            id: "u-004".to_string(),
            first_name: "David".to_string(),
            last_name: "Wu".to_string(),
            email: "david@startuplab.io".to_string(),
            company: "Startup Lab".to_string(),
            role: "Founder".to_string(),
            industry: "Biotech".to_string(),
            tags: vec!["Startup".to_string()],
            status: LeadStatus::New,
            score: 20,
            history: vec![],
            last_activity: "1 week ago".to_string(),
        },
    ]
}

fn seed_templates() -> Vec<EmailTemplate> {
    vec![
        EmailTemplate {
            id: "t-001".to_string(),
            name: "Product Announcement v2".to_string(),
            subject: "Introducing our new line".to_string(),
            category: TemplateCategory::Outreach,
            content: "Hi {{firstName}},\n\nWe are excited to announce...".to_string(),
            tags: vec!["Product".to_string(), "Q1".to_string()],
            is_system: true,
            last_modified: "Jan 10".to_string(),
        },
        EmailTemplate {
            id: "t-002".to_string(),
            name: "Cold Approach - Value Prop".to_string(),
            subject: "Reduce your logistics costs".to_string(),
            category: TemplateCategory::Outreach,
            content: "Hello {{firstName}},\n\nI noticed you handle supply chain at {{company}}..."
                .to_string(),
            tags: vec!["Sales".to_string()],
            is_system: false,
            last_modified: "Feb 12".to_string(),
        },
        EmailTemplate {
            id: "t-003".to_string(),
            name: "Webinar Invitation".to_string(),
            subject: "You are invited: Chemical Trends 2025".to_string(),
            category: TemplateCategory::Event,
            content: "# Webinar Invitation\n\nJoin us for an exclusive look...".to_string(),
            tags: vec!["Event".to_string()],
            is_system: false,
            last_modified: "Mar 01".to_string(),
        },
    ]
}

fn seed_domains() -> Vec<Domain> {
    vec![
        Domain {
            id: "d-001".to_string(),
            domain: "mailforge.io".to_string(),
            status: DomainStatus::Active,
            spf_verified: true,
            dkim_verified: true,
            dmarc_verified: true,
        },
        Domain {
            id: "d-002".to_string(),
            domain: "mail.mailforge.io".to_string(),
            status: DomainStatus::Active,
            spf_verified: true,
            dkim_verified: true,
            dmarc_verified: false,
        },
    ]
}

fn seed_notifications() -> Vec<AppNotification> {
    let now = Utc::now();
    vec![
        AppNotification {
            id: "n-001".to_string(),
            title: "Campaign Completed".to_string(),
            message: "Q1 Product Launch has finished sending.".to_string(),
            kind: NotificationKind::Success,
            is_read: false,
            timestamp: now - Duration::hours(1),
            link: None,
        },
        AppNotification {
            id: "n-002".to_string(),
            title: "High Lead Activity".to_string(),
            message: "5 leads from Bayer engaged in the last hour.".to_string(),
            kind: NotificationKind::Info,
            is_read: false,
            timestamp: now - Duration::hours(2),
            link: None,
        },
        AppNotification {
            id: "n-003".to_string(),
            title: "DMARC Warning".to_string(),
            message: "SPF check failed for mail.mailforge.io.".to_string(),
            kind: NotificationKind::Error,
            is_read: true,
            timestamp: now - Duration::days(1),
            link: None,
        },
    ]
}

/// Number of campaigns inserted by the seed step.
#[cfg(test)]
pub(crate) const SEED_CAMPAIGN_COUNT: i64 = 3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_runs_once_then_noops() {
        let store = Store::in_memory().unwrap();

        assert!(seed_if_empty(&store).unwrap());
        assert_eq!(store.count_campaigns().unwrap(), SEED_CAMPAIGN_COUNT);

        assert!(!seed_if_empty(&store).unwrap());
        assert_eq!(store.count_campaigns().unwrap(), SEED_CAMPAIGN_COUNT);
    }

    #[test]
    fn seed_skips_a_non_empty_store() {
        let store = Store::in_memory().unwrap();
        store
            .upsert_campaign(&seed_campaigns().remove(0))
            .unwrap();

        assert!(!seed_if_empty(&store).unwrap());
        assert_eq!(store.count_campaigns().unwrap(), 1);
    }

    #[test]
    fn seeded_funnel_walks_in_document_order() {
        let campaigns = seed_campaigns();
        let funnel = campaigns[0].funnel_config.as_ref().unwrap();
        assert_eq!(funnel.validate(), Ok(()));

        let order: Vec<&str> = funnel.walk().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            order,
            ["start", "email-1", "delay-1", "cond-1", "score-1", "email-2", "email-3"]
        );
    }
}
