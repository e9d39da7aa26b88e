use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{IdentityId, Timed};

/// Kind of usage event.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// First authenticated render of a session.
    SessionStart,

    /// Navigation to a path.
    PageView,

    /// A user action, categorised by the caller.
    Action,

    /// Successful login.
    Login,

    /// Explicit logout.
    Logout,
}

impl EventType {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SessionStart => "Session Start",
            Self::PageView => "Page View",
            Self::Action => "Action",
            Self::Login => "Login",
            Self::Logout => "Logout",
        }
    }
}

/// Usage event as submitted by the client.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct NewUsageEvent {
    /// Event kind.
    pub event_type: EventType,

    /// Page path for page views.
    pub page: Option<String>,

    /// Action category for actions.
    pub action_category: Option<String>,

    /// Action detail for actions.
    pub action_detail: Option<String>,
}

impl NewUsageEvent {
    /// An event that carries no extra fields.
    #[must_use]
    pub const fn bare(event_type: EventType) -> Self {
        Self {
            event_type,
            page: None,
            action_category: None,
            action_detail: None,
        }
    }
}

/// Recorded usage event, stamped by the backend.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct UsageEvent {
    /// When the backend recorded it.
    #[serde(with = "chrono::serde::ts_nanoseconds")]
    pub timestamp: DateTime<Utc>,

    /// Who caused it.
    pub principal: IdentityId,

    /// Event kind.
    pub event_type: EventType,

    /// Page path, if any.
    pub page: Option<String>,

    /// Action category, if any.
    pub action_category: Option<String>,

    /// Action detail, if any.
    pub action_detail: Option<String>,
}

impl UsageEvent {
    /// "category: detail", the category alone, or `None`.
    #[must_use]
    pub fn action_summary(&self) -> Option<String> {
        match (&self.action_category, &self.action_detail) {
            (Some(category), Some(detail)) => Some(format!("{category}: {detail}")),
            (Some(category), None) => Some(category.clone()),
            _ => None,
        }
    }
}

impl Timed for UsageEvent {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Server-aggregated usage counts.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    /// Distinct principals ever seen.
    pub total_unique_users: u64,

    /// Number of session starts.
    pub total_sessions: u64,

    /// Distinct principals active in the last day.
    pub daily_active_users: u64,

    /// Distinct principals active in the last hour.
    pub last_active_users: u64,
}
