//! Snapshot encoding for board persistence.
//!
//! The stored form is a versioned JSON envelope:
//!
//! ```json
//! {"state":{"stages":[["vibes",{..}],..],"cards":[["01H..",{..}],..],
//!           "tags":[..],"selectedCards":[..]},
//!  "version":1}
//! ```
//!
//! Keyed tables become arrays of `[key, record]` pairs and the selection set
//! becomes an array. Decoding never fails: anything that cannot be read as a
//! board falls back to the default board, and recoverable inconsistencies are
//! repaired with a warning.

use crate::error::{BoardError, Result};
use crate::store::BoardState;
use crate::types::{Card, CardId, Stage, StageId, StageName, Tag};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Envelope version written by this build
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serialized board tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedBoard {
    pub stages: Vec<(StageId, Stage)>,
    pub cards: Vec<(CardId, Card)>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub selected_cards: Vec<CardId>,
}

/// Versioned wrapper around the persisted tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEnvelope {
    pub state: PersistedBoard,
    pub version: u32,
}

/// Convert the live state into its serializable form
pub fn serialize(state: &BoardState) -> PersistedBoard {
    PersistedBoard {
        stages: state
            .stages
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        cards: state
            .cards
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
        tags: state.tags.clone(),
        selected_cards: state.selected.iter().cloned().collect(),
    }
}

/// Rebuild a state from persisted tables, repairing what can be repaired.
///
/// Fails when the stage table is not exactly the five fixed stages.
pub fn deserialize(persisted: PersistedBoard) -> Result<BoardState> {
    let mut stages = IndexMap::new();
    for (key, stage) in persisted.stages {
        let Some(expected) = StageName::ALL.into_iter().find(|n| n.id() == key) else {
            return Err(BoardError::invalid_value(
                "stages",
                format!("'{key}' is not a stage id"),
            ));
        };
        if stage.id != key || stage.name != expected {
            return Err(BoardError::invalid_value(
                "stages",
                format!("stage stored under '{key}' is '{}'", stage.id),
            ));
        }
        if stages.insert(key.clone(), stage).is_some() {
            return Err(BoardError::invalid_value(
                "stages",
                format!("stage '{key}' appears twice"),
            ));
        }
    }
    if let Some(missing) = StageName::ALL
        .into_iter()
        .find(|name| !stages.contains_key(&name.id()))
    {
        return Err(BoardError::invalid_value(
            "stages",
            format!("stage '{missing}' is missing"),
        ));
    }

    let mut cards = IndexMap::new();
    for (key, card) in persisted.cards {
        if cards.insert(key.clone(), card).is_some() {
            warn!(card = %key, "snapshot lists a card twice, keeping the last copy");
        }
    }

    let mut tags: Vec<Tag> = Vec::with_capacity(persisted.tags.len());
    for tag in persisted.tags {
        if tags.iter().any(|t| t.id == tag.id) {
            warn!(tag = %tag.id, "snapshot lists a tag twice, keeping the first copy");
        } else if tags.iter().any(|t| t.has_name(&tag.name)) {
            warn!(tag = %tag.id, name = %tag.name, "snapshot repeats a tag name, keeping the first tag");
        } else {
            tags.push(tag);
        }
    }

    let mut state = BoardState {
        stages,
        cards,
        tags,
        selected: persisted.selected_cards.into_iter().collect::<IndexSet<_>>(),
    };

    for repair in state.repair() {
        warn!(repair = %repair, "repaired board snapshot");
    }
    Ok(state)
}

/// Encode the state as a versioned JSON envelope
pub fn encode(state: &BoardState) -> Result<String> {
    let envelope = SnapshotEnvelope {
        state: serialize(state),
        version: SNAPSHOT_VERSION,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a stored envelope, reporting why it could not be used
pub fn try_decode(text: &str) -> Result<BoardState> {
    let envelope: SnapshotEnvelope = serde_json::from_str(text)?;
    if envelope.version > SNAPSHOT_VERSION {
        return Err(BoardError::UnsupportedSnapshot {
            found: envelope.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    deserialize(envelope.state)
}

/// Decode a stored envelope. Missing or unusable snapshots yield the default board.
pub fn decode(text: Option<&str>) -> BoardState {
    let Some(text) = text else {
        debug!("no stored board snapshot, using default board");
        return BoardState::default();
    };
    match try_decode(text) {
        Ok(state) => state,
        Err(e) => {
            warn!(error = %e, "discarding unusable board snapshot, using default board");
            BoardState::default()
        }
    }
}
