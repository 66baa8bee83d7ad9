//! Card types: Card, Priority, EffortPoints and the create/update inputs

use super::activity::Activity;
use super::ids::{CardId, StageId, TagId};
use super::tag::Tag;
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Urgency of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl FromStr for Priority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(BoardError::invalid_value(
                "priority",
                format!("expected low, medium, high or critical, got '{other}'"),
            )),
        }
    }
}

/// Fibonacci-scale effort estimate: 1, 2, 3, 5, 8 or 13.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum EffortPoints {
    One,
    Two,
    Three,
    Five,
    Eight,
    Thirteen,
}

impl EffortPoints {
    pub const ALL: [EffortPoints; 6] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Five,
        Self::Eight,
        Self::Thirteen,
    ];

    pub fn points(&self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Five => 5,
            Self::Eight => 8,
            Self::Thirteen => 13,
        }
    }
}

impl TryFrom<u8> for EffortPoints {
    type Error = BoardError;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.points() == value)
            .ok_or_else(|| {
                BoardError::invalid_value(
                    "effortPoints",
                    format!("{value} is not one of 1, 2, 3, 5, 8, 13"),
                )
            })
    }
}

impl From<EffortPoints> for u8 {
    fn from(value: EffortPoints) -> Self {
        value.points()
    }
}

impl FromStr for EffortPoints {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let value: u8 = s.trim().parse().map_err(|_| {
            BoardError::invalid_value("effortPoints", format!("'{s}' is not a number"))
        })?;
        Self::try_from(value)
    }
}

/// A work item on the board.
///
/// `stage` always names the stage whose `cards` list contains this card's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub stage: StageId,
    /// Value copies of the attached tags, unique by id
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort_points: Option<EffortPoints>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// When the card last entered its current stage
    pub stage_entered_at: DateTime<Utc>,
    /// Milliseconds since the last stage entry, as of the last timer refresh
    #[serde(default)]
    pub time_in_stage: u64,
    /// Milliseconds since creation, as of the last timer refresh
    #[serde(default)]
    pub total_time: u64,
    #[serde(default)]
    pub activity: Vec<Activity>,
    #[serde(default)]
    pub is_archived: bool,
}

impl Card {
    pub fn has_tag(&self, tag: &TagId) -> bool {
        self.tags.iter().any(|t| &t.id == tag)
    }

    /// Recompute the time counters relative to `now`
    pub(crate) fn refresh_timers(&mut self, now: DateTime<Utc>) {
        self.time_in_stage = millis_between(self.stage_entered_at, now);
        self.total_time = millis_between(self.created_at, now);
    }
}

fn millis_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_milliseconds().max(0) as u64
}

/// Drop tags whose id already appeared earlier in the list
fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut out: Vec<Tag> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.iter().any(|t| t.id == tag.id) {
            out.push(tag);
        }
    }
    out
}

/// Input for creating a card
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDraft {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    pub priority: Option<Priority>,
    pub effort_points: Option<EffortPoints>,
    #[serde(default)]
    pub is_archived: bool,
}

impl CardDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_effort(mut self, effort: EffortPoints) -> Self {
        self.effort_points = Some(effort);
        self
    }

    /// Build a fresh card in `stage`. Returns `None` when the title is blank.
    pub(crate) fn into_card(self, stage: StageId, now: DateTime<Utc>) -> Option<Card> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return None;
        }
        Some(Card {
            id: CardId::new(),
            title,
            description: self.description.filter(|d| !d.trim().is_empty()),
            stage,
            tags: dedup_tags(self.tags),
            priority: self.priority,
            effort_points: self.effort_points,
            created_at: now,
            updated_at: now,
            stage_entered_at: now,
            time_in_stage: 0,
            total_time: 0,
            activity: Vec::new(),
            is_archived: self.is_archived,
        })
    }
}

impl From<&Card> for CardDraft {
    fn from(card: &Card) -> Self {
        Self {
            title: card.title.clone(),
            description: card.description.clone(),
            tags: card.tags.clone(),
            priority: card.priority,
            effort_points: card.effort_points,
            is_archived: card.is_archived,
        }
    }
}

/// Partial update of a card's editable fields.
///
/// There is deliberately no `stage` field: stage transitions go through `move_card`.
/// For clearable fields `None` leaves the value alone and `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub tags: Option<Vec<Tag>>,
    pub priority: Option<Option<Priority>>,
    pub effort_points: Option<Option<EffortPoints>>,
    pub is_archived: Option<bool>,
}

impl CardPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_effort(mut self, effort: Option<EffortPoints>) -> Self {
        self.effort_points = Some(effort);
        self
    }

    pub fn archived(is_archived: bool) -> Self {
        Self {
            is_archived: Some(is_archived),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the fields this patch touches, for the activity log
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.title.is_some() {
            names.push("title");
        }
        if self.description.is_some() {
            names.push("description");
        }
        if self.tags.is_some() {
            names.push("tags");
        }
        if self.priority.is_some() {
            names.push("priority");
        }
        if self.effort_points.is_some() {
            names.push("effortPoints");
        }
        if self.is_archived.is_some() {
            names.push("isArchived");
        }
        names
    }

    /// Apply the patch to `card`. Returns `false` without touching the card when the
    /// patch carries a blank title.
    pub(crate) fn apply(&self, card: &mut Card) -> bool {
        let title = match &self.title {
            Some(t) if t.trim().is_empty() => return false,
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };

        if let Some(title) = title {
            card.title = title;
        }
        if let Some(description) = &self.description {
            card.description = description.clone().filter(|d| !d.trim().is_empty());
        }
        if let Some(tags) = &self.tags {
            card.tags = dedup_tags(tags.clone());
        }
        if let Some(priority) = self.priority {
            card.priority = priority;
        }
        if let Some(effort) = self.effort_points {
            card.effort_points = effort;
        }
        if let Some(archived) = self.is_archived {
            card.is_archived = archived;
        }
        true
    }
}
