//! Per-card activity log entries

use super::ids::ActivityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What happened to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Created,
    Moved,
    Edited,
    Commented,
    Tagged,
    Assigned,
}

/// One entry in a card's activity log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub kind: ActivityKind,
    pub timestamp: DateTime<Utc>,

    /// Who performed the change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Activity {
    pub fn new(kind: ActivityKind, description: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: ActivityId::new(),
            kind,
            timestamp,
            actor: None,
            description: description.into(),
            data: None,
        }
    }

    pub fn with_actor(mut self, actor: Option<String>) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}
