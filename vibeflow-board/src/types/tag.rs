//! Tag types.
//!
//! Canonical tags live in the board's tag table. Cards embed value copies of the
//! tags attached to them; a copy never follows later changes to the canonical entry.

use super::ids::TagId;
use crate::error::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Grouping of tags in the composer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    Stack,
    Energy,
    Time,
    #[default]
    Custom,
}

impl FromStr for TagCategory {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stack" => Ok(Self::Stack),
            "energy" => Ok(Self::Energy),
            "time" => Ok(Self::Time),
            "custom" => Ok(Self::Custom),
            other => Err(BoardError::invalid_value(
                "category",
                format!("unknown tag category '{other}'"),
            )),
        }
    }
}

/// A named, coloured label attachable to cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub category: TagCategory,
    /// CSS colour string, e.g. `#d73a4a`
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub count: u32,
    pub last_used: DateTime<Utc>,
}

impl Tag {
    /// Case-insensitive name comparison used for tag uniqueness
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Input for creating a canonical tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDraft {
    pub name: String,
    #[serde(default)]
    pub category: TagCategory,
    /// Colour; derived from the name when omitted
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl TagDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: TagCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Build the canonical tag. Returns `None` when the name is blank.
    pub(crate) fn into_tag(self, now: DateTime<Utc>) -> Option<Tag> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return None;
        }
        let color = self
            .color
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| crate::auto_color::auto_color(&name).to_string());
        Some(Tag {
            id: TagId::new(),
            name,
            category: self.category,
            color,
            icon: self.icon,
            count: 0,
            last_used: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_into_tag() {
        let now = Utc::now();
        let tag = TagDraft::new("  Bug ")
            .with_color("#FF5370")
            .into_tag(now)
            .unwrap();
        assert_eq!(tag.name, "Bug");
        assert_eq!(tag.color, "#FF5370");
        assert_eq!(tag.category, TagCategory::Custom);
        assert_eq!(tag.count, 0);
        assert_eq!(tag.last_used, now);
        assert_eq!(tag.id.as_str().len(), 26);
    }

    #[test]
    fn test_draft_auto_color() {
        let a = TagDraft::new("bug").into_tag(Utc::now()).unwrap();
        let b = TagDraft::new("bug").into_tag(Utc::now()).unwrap();
        assert_eq!(a.color, b.color);
        assert!(a.color.starts_with('#'));
        assert_eq!(a.color.len(), 7);
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(TagDraft::new("   ").into_tag(Utc::now()).is_none());
    }

    #[test]
    fn test_has_name_is_case_insensitive() {
        let tag = TagDraft::new("Bug").into_tag(Utc::now()).unwrap();
        assert!(tag.has_name("bug"));
        assert!(tag.has_name(" BUG "));
        assert!(!tag.has_name("bugs"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("Energy".parse::<TagCategory>().unwrap(), TagCategory::Energy);
        assert!("mood".parse::<TagCategory>().is_err());
    }
}
