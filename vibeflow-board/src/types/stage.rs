//! Stage types: the five fixed workflow columns.

use super::ids::{CardId, StageId};
use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::str::FromStr;

/// The fixed set of stage names, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageName {
    Vibes,
    Mapping,
    Flow,
    Proving,
    Shipped,
}

impl StageName {
    /// All stage names in creation order
    pub const ALL: [StageName; 5] = [
        StageName::Vibes,
        StageName::Mapping,
        StageName::Flow,
        StageName::Proving,
        StageName::Shipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vibes => "vibes",
            Self::Mapping => "mapping",
            Self::Flow => "flow",
            Self::Proving => "proving",
            Self::Shipped => "shipped",
        }
    }

    /// The stage id owned by this name
    pub fn id(&self) -> StageId {
        StageId::from_string(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| BoardError::StageNotFound { id: s.to_string() })
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow column holding an ordered list of card ids.
///
/// The order of `cards` is the on-screen order within the column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: StageId,
    pub name: StageName,
    pub title: String,
    pub description: String,
    pub icon: String,
    /// Advisory limit; exceeding it is flagged, never blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<NonZeroU32>,
    #[serde(default)]
    pub cards: Vec<CardId>,
}

impl Stage {
    fn new(
        name: StageName,
        title: &str,
        description: &str,
        icon: &str,
        wip_limit: Option<u32>,
    ) -> Self {
        Self {
            id: name.id(),
            name,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            wip_limit: wip_limit.and_then(NonZeroU32::new),
            cards: Vec::new(),
        }
    }

    /// The five stages of a fresh board, in creation order.
    ///
    /// `flow` is limited to 5 cards and `proving` to 3; the others are unlimited.
    pub fn defaults() -> Vec<Stage> {
        vec![
            Stage::new(
                StageName::Vibes,
                "Vibes",
                "Brainstorming and ideation",
                "✨",
                None,
            ),
            Stage::new(
                StageName::Mapping,
                "Mapping",
                "Planning and architecture",
                "🗺️",
                None,
            ),
            Stage::new(StageName::Flow, "Flow", "Active development", "💫", Some(5)),
            Stage::new(
                StageName::Proving,
                "Proving",
                "Testing and validation",
                "🧪",
                Some(3),
            ),
            Stage::new(
                StageName::Shipped,
                "Shipped",
                "Deployed and done",
                "🚀",
                None,
            ),
        ]
    }

    /// Position of a card within this stage
    pub fn position_of(&self, card: &CardId) -> Option<usize> {
        self.cards.iter().position(|id| id == card)
    }

    pub fn contains(&self, card: &CardId) -> bool {
        self.cards.contains(card)
    }

    /// Compare the card count against the advisory WIP limit
    pub fn wip_status(&self) -> WipStatus {
        match self.wip_limit {
            None => WipStatus::Unlimited,
            Some(limit) => {
                let limit = limit.get() as usize;
                match self.cards.len() {
                    n if n < limit => WipStatus::Under,
                    n if n == limit => WipStatus::AtLimit,
                    _ => WipStatus::OverLimit,
                }
            }
        }
    }
}

/// How full a stage is relative to its WIP limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipStatus {
    Unlimited,
    Under,
    AtLimit,
    OverLimit,
}

impl WipStatus {
    /// Whether the column should show a warning
    pub fn is_flagged(&self) -> bool {
        matches!(self, Self::AtLimit | Self::OverLimit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stages() {
        let stages = Stage::defaults();
        assert_eq!(stages.len(), 5);

        let ids: Vec<_> = stages.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["vibes", "mapping", "flow", "proving", "shipped"]);

        assert_eq!(stages[2].wip_limit.map(NonZeroU32::get), Some(5));
        assert_eq!(stages[3].wip_limit.map(NonZeroU32::get), Some(3));
        assert!(stages[0].wip_limit.is_none());
        assert!(stages.iter().all(|s| s.cards.is_empty()));
    }

    #[test]
    fn test_stage_name_parse() {
        assert_eq!("flow".parse::<StageName>().unwrap(), StageName::Flow);
        assert_eq!(" Proving ".parse::<StageName>().unwrap(), StageName::Proving);
        assert!(matches!(
            "done".parse::<StageName>(),
            Err(BoardError::StageNotFound { .. })
        ));
    }

    #[test]
    fn test_wip_status() {
        let mut stage = Stage::defaults().remove(3);
        assert_eq!(stage.wip_status(), WipStatus::Under);

        stage.cards = (0..3).map(|_| CardId::new()).collect();
        assert_eq!(stage.wip_status(), WipStatus::AtLimit);
        assert!(stage.wip_status().is_flagged());

        stage.cards.push(CardId::new());
        assert_eq!(stage.wip_status(), WipStatus::OverLimit);

        stage.wip_limit = None;
        assert_eq!(stage.wip_status(), WipStatus::Unlimited);
        assert!(!stage.wip_status().is_flagged());
    }

    #[test]
    fn test_zero_wip_limit_is_rejected_on_read() {
        let json = r#"{"id":"flow","name":"flow","title":"Flow","description":"","icon":"","wipLimit":0,"cards":[]}"#;
        assert!(serde_json::from_str::<Stage>(json).is_err());
    }
}
