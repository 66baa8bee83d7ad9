//! Core types for the board

mod activity;
mod card;
mod ids;
mod stage;
mod tag;

// Re-export all types
pub use activity::{Activity, ActivityKind};
pub use card::{Card, CardDraft, CardPatch, EffortPoints, Priority};
pub use ids::{ActivityId, CardId, StageId, TagId};
pub use stage::{Stage, StageName, WipStatus};
pub use tag::{Tag, TagCategory, TagDraft};
