//! Domain model structs persisted in the local campaign database.
//!
//! Identifiers are opaque strings with a short type prefix (`c-` campaign,
//! `u-` contact, `t-` template, `d-` domain, `n-` notification, `evt-`
//! activity event).  Ids are unique and immutable once assigned.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::funnel::FunnelConfig;

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Lifecycle of a [`Campaign`].
///
/// Legal transitions: draft -> running, running -> paused,
/// paused -> running, running -> completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Running,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(Self::Draft),
            "running" => Some(Self::Running),
            "paused" => Some(Self::Paused),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    pub fn can_transition_to(&self, next: CampaignStatus) -> bool {
        use CampaignStatus::*;
        matches!(
            (self, next),
            (Draft, Running) | (Running, Paused) | (Paused, Running) | (Running, Completed)
        )
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of a [`Contact`] (lead pipeline).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Engaged,
    Hot,
    Nurture,
    Converted,
    Cold,
    Unsubscribed,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Engaged => "engaged",
            Self::Hot => "hot",
            Self::Nurture => "nurture",
            Self::Converted => "converted",
            Self::Cold => "cold",
            Self::Unsubscribed => "unsubscribed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "engaged" => Some(Self::Engaged),
            "hot" => Some(Self::Hot),
            "nurture" => Some(Self::Nurture),
            "converted" => Some(Self::Converted),
            "cold" => Some(Self::Cold),
            "unsubscribed" => Some(Self::Unsubscribed),
            _ => None,
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verification state of a sending [`Domain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainStatus {
    Active,
    #[default]
    Pending,
    WarmingUp,
    Failed,
}

impl DomainStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::WarmingUp => "warming_up",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "pending" => Some(Self::Pending),
            "warming_up" => Some(Self::WarmingUp),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Severity of an [`AppNotification`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "info" => Some(Self::Info),
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

/// Category of an [`EmailTemplate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateCategory {
    #[default]
    Outreach,
    Newsletter,
    Nurture,
    Transactional,
    Event,
}

impl TemplateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Outreach => "Outreach",
            Self::Newsletter => "Newsletter",
            Self::Nurture => "Nurture",
            Self::Transactional => "Transactional",
            Self::Event => "Event",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Outreach" => Some(Self::Outreach),
            "Newsletter" => Some(Self::Newsletter),
            "Nurture" => Some(Self::Nurture),
            "Transactional" => Some(Self::Transactional),
            "Event" => Some(Self::Event),
            _ => None,
        }
    }
}

/// Kind of an [`ActivityEvent`] on a contact's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    EmailSent,
    EmailOpened,
    LinkClicked,
    ScoreChange,
    DemoBooked,
    StatusChange,
    NoteAdded,
    FormSubmit,
    ReplyReceived,
}

// ---------------------------------------------------------------------------
// Campaign
// ---------------------------------------------------------------------------

/// An email campaign with cumulative engagement counters.
///
/// `template_id` is a weak reference: the template it names may have been
/// deleted, and callers must resolve it lazily.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub subject: String,
    /// Audience segment label, free text.
    pub segment: String,
    pub status: CampaignStatus,
    pub sent: i64,
    pub opened: i64,
    pub clicked: i64,
    pub converted: i64,
    pub audience_size: i64,
    /// Human-readable freshness label ("2 hours ago", "Just now").
    pub last_updated: String,
    pub template_id: Option<String>,
    /// Branching automation tree, stored as a JSON column.
    pub funnel_config: Option<FunnelConfig>,
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// A CRM contact / lead.  The activity history is embedded (most recent
/// first) rather than living in its own table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub company: String,
    pub role: String,
    pub industry: String,
    /// Free-text tags, order preserved.
    pub tags: Vec<String>,
    pub status: LeadStatus,
    /// Lead score, 0..=100.  Only enforced on conversion.
    pub score: i64,
    pub history: Vec<ActivityEvent>,
    pub last_activity: String,
}

/// One entry on a contact's activity timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form context, e.g. the originating campaign id (weak reference).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
}

// ---------------------------------------------------------------------------
// Email template
// ---------------------------------------------------------------------------

/// A reusable email body with `{{variable}}` placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub category: TemplateCategory,
    pub content: String,
    pub tags: Vec<String>,
    /// System templates cannot be deleted.
    pub is_system: bool,
    pub last_modified: String,
}

// ---------------------------------------------------------------------------
// Sending domain
// ---------------------------------------------------------------------------

/// A sending domain and its DNS verification flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub domain: String,
    pub status: DomainStatus,
    pub spf_verified: bool,
    pub dkim_verified: bool,
    pub dmarc_verified: bool,
}

/// Static deliverability summary shown on the settings dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeliverabilitySnapshot {
    pub reputation: f64,
    pub inbox_placement: f64,
}

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// An in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub timestamp: DateTime<Utc>,
    pub link: Option<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Singleton application settings, stored under a fixed key rather than as
/// a table of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub organization_name: String,
    pub timezone: String,
    pub daily_send_limit: i64,
    pub auto_responders: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            organization_name: "Mailforge".to_string(),
            timezone: "UTC-5 (EST)".to_string(),
            daily_send_limit: 500,
            auto_responders: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Result bundle of a global search.  Matching is independent per entity
/// type; there is no ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    pub contacts: Vec<Contact>,
    pub campaigns: Vec<Campaign>,
    pub templates: Vec<EmailTemplate>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty() && self.campaigns.is_empty() && self.templates.is_empty()
    }
}
