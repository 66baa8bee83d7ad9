//! Drag-and-drop reordering.
//!
//! [`resolve_drop`] maps a `(dragged, over)` pair onto a target stage and index
//! without touching the store. [`DragSession`] tracks the in-flight gesture and
//! applies the resolved move when the drag ends.

use crate::store::{BoardState, BoardStore};
use crate::types::{CardId, StageId};
use serde::Serialize;
use tracing::{debug, trace};

/// Outcome of resolving a drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum DropResolution {
    /// Move the card to `index` within `stage`
    Move {
        card: CardId,
        stage: StageId,
        index: usize,
    },
    /// The card would end up where it already is
    Unchanged,
    /// The dragged card or drop target is unknown; ignore the gesture
    Invalid,
}

impl DropResolution {
    pub fn is_move(&self) -> bool {
        matches!(self, Self::Move { .. })
    }
}

/// Work out where a dropped card should go.
///
/// `over` is looked up as a card id first, then as a stage id. Over a card, the
/// target index is that card's position in its stage; over a bare stage, the card
/// goes to the end of the list.
pub fn resolve_drop(state: &BoardState, dragged: &CardId, over: Option<&str>) -> DropResolution {
    let Some((from_stage, from_index)) = state.position_of(dragged) else {
        trace!(card = %dragged, "drop ignored: dragged card is unknown");
        return DropResolution::Invalid;
    };
    let Some(over) = over else {
        return DropResolution::Invalid;
    };

    let over_card = CardId::from(over);
    let (stage, index) = if let Some(target) = state.get_card(&over_card) {
        if &over_card == dragged {
            return DropResolution::Unchanged;
        }
        let Some(index) = state
            .stage(&target.stage)
            .and_then(|s| s.position_of(&over_card))
        else {
            trace!(over, "drop ignored: hovered card is not in its stage");
            return DropResolution::Invalid;
        };
        (target.stage.clone(), index)
    } else {
        let stage_id = StageId::from(over);
        let Some(stage) = state.stage(&stage_id) else {
            trace!(over, "drop ignored: target is neither a card nor a stage");
            return DropResolution::Invalid;
        };
        (stage_id, stage.cards.len())
    };

    if stage == from_stage {
        // The dragged card leaves the list before it is reinserted
        let last = state
            .stage(&stage)
            .map_or(0, |s| s.cards.len().saturating_sub(1));
        if index.min(last) == from_index {
            return DropResolution::Unchanged;
        }
    }

    DropResolution::Move {
        card: dragged.clone(),
        stage,
        index,
    }
}

/// Resolve a drop and apply the resulting move to the store
pub fn apply_drop(store: &mut BoardStore, dragged: &CardId, over: Option<&str>) -> DropResolution {
    let resolution = resolve_drop(store.state(), dragged, over);
    if let DropResolution::Move { card, stage, index } = &resolution {
        store.move_card(card, stage, *index);
    }
    resolution
}

/// Drag events in the shape the UI drag layer reports them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEvent {
    Start { dragged: CardId },
    Over { dragged: CardId, over: Option<String> },
    End { dragged: CardId, over: Option<String> },
    Cancel,
}

/// The card currently being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveDrag {
    pub card: CardId,
    /// Stage and index the drag started from
    pub origin: (StageId, usize),
    /// Last reported drop target
    pub over: Option<String>,
}

/// Transient state of one drag gesture.
///
/// Events may arrive in any order: an `Over` or `End` without a `Start` is
/// handled, and `End` and `Cancel` always leave the session idle.
#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActiveDrag>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        self.active.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// Handle one event. Returns the resolution for `End`, `None` otherwise.
    pub fn handle(&mut self, store: &mut BoardStore, event: DragEvent) -> Option<DropResolution> {
        match event {
            DragEvent::Start { dragged } => {
                self.start(store.state(), &dragged);
                None
            }
            DragEvent::Over { dragged, over } => {
                self.over(store.state(), &dragged, over);
                None
            }
            DragEvent::End { dragged, over } => Some(self.end(store, &dragged, over.as_deref())),
            DragEvent::Cancel => {
                self.cancel();
                None
            }
        }
    }

    pub fn start(&mut self, state: &BoardState, dragged: &CardId) {
        self.active = state.position_of(dragged).map(|origin| ActiveDrag {
            card: dragged.clone(),
            origin,
            over: None,
        });
        if self.active.is_none() {
            trace!(card = %dragged, "drag start ignored: unknown card");
        }
    }

    pub fn over(&mut self, state: &BoardState, dragged: &CardId, over: Option<String>) {
        let tracking = self
            .active
            .as_ref()
            .is_some_and(|active| &active.card == dragged);
        if !tracking {
            self.start(state, dragged);
        }
        if let Some(active) = &mut self.active {
            active.over = over;
        }
    }

    /// Finish the gesture, moving the card if the drop resolves to a move
    pub fn end(&mut self, store: &mut BoardStore, dragged: &CardId, over: Option<&str>) -> DropResolution {
        self.active = None;
        let resolution = apply_drop(store, dragged, over);
        debug!(card = %dragged, ?resolution, "drag ended");
        resolution
    }

    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            trace!(card = %active.card, "drag cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CardDraft;

    fn flow() -> StageId {
        StageId::from("flow")
    }

    fn board() -> (BoardStore, CardId, CardId, CardId) {
        let mut store = BoardStore::new();
        let a = store.create_card(&flow(), CardDraft::new("A")).unwrap();
        let b = store.create_card(&flow(), CardDraft::new("B")).unwrap();
        let c = store.create_card(&flow(), CardDraft::new("C")).unwrap();
        (store, a, b, c)
    }

    fn order(store: &BoardStore, stage: &StageId) -> Vec<String> {
        store
            .get_cards_by_stage(stage)
            .iter()
            .map(|c| c.title.clone())
            .collect()
    }

    #[test]
    fn test_drop_over_card_in_same_stage() {
        let (store, a, b, _) = board();
        assert_eq!(
            resolve_drop(store.state(), &b, Some(a.as_str())),
            DropResolution::Move {
                card: b,
                stage: flow(),
                index: 0
            }
        );
    }

    #[test]
    fn test_drop_over_card_in_other_stage() {
        let (mut store, a, _, _) = board();
        let p = store
            .create_card(&StageId::from("proving"), CardDraft::new("P"))
            .unwrap();

        let resolution = apply_drop(&mut store, &a, Some(p.as_str()));
        assert!(resolution.is_move());
        assert_eq!(order(&store, &StageId::from("proving")), ["A", "P"]);
        assert_eq!(order(&store, &flow()), ["B", "C"]);
    }

    #[test]
    fn test_drop_on_bare_stage_appends() {
        let (mut store, a, _, _) = board();
        let shipped = StageId::from("shipped");
        assert_eq!(
            resolve_drop(store.state(), &a, Some("shipped")),
            DropResolution::Move {
                card: a.clone(),
                stage: shipped.clone(),
                index: 0
            }
        );

        // Onto its own column: moves to the end
        apply_drop(&mut store, &a, Some("flow"));
        assert_eq!(order(&store, &flow()), ["B", "C", "A"]);
        assert_eq!(
            resolve_drop(store.state(), &a, Some("flow")),
            DropResolution::Unchanged
        );
    }

    #[test]
    fn test_unchanged_drops() {
        let (store, a, _, c) = board();
        assert_eq!(
            resolve_drop(store.state(), &a, Some(a.as_str())),
            DropResolution::Unchanged
        );
        assert_eq!(
            resolve_drop(store.state(), &c, Some("flow")),
            DropResolution::Unchanged
        );
    }

    #[test]
    fn test_invalid_drops() {
        let (store, a, _, _) = board();
        assert_eq!(resolve_drop(store.state(), &a, None), DropResolution::Invalid);
        assert_eq!(
            resolve_drop(store.state(), &a, Some("nowhere")),
            DropResolution::Invalid
        );
        assert_eq!(
            resolve_drop(store.state(), &CardId::from("ghost"), Some("flow")),
            DropResolution::Invalid
        );
    }

    #[test]
    fn test_session_applies_move_on_end() {
        let (mut store, a, _, c) = board();
        let mut session = DragSession::new();

        session.handle(&mut store, DragEvent::Start { dragged: c.clone() });
        assert_eq!(session.active().unwrap().origin, (flow(), 2));
        session.handle(
            &mut store,
            DragEvent::Over {
                dragged: c.clone(),
                over: Some(a.to_string()),
            },
        );
        assert_eq!(session.active().unwrap().over.as_deref(), Some(a.as_str()));

        let resolution = session.handle(
            &mut store,
            DragEvent::End {
                dragged: c,
                over: Some(a.to_string()),
            },
        );
        assert!(resolution.unwrap().is_move());
        assert!(!session.is_dragging());
        assert_eq!(order(&store, &flow()), ["C", "A", "B"]);
    }

    #[test]
    fn test_session_cancel_clears_without_mutation() {
        let (mut store, a, b, _) = board();
        let mut session = DragSession::new();
        let version = store.version();

        session.handle(&mut store, DragEvent::Start { dragged: a.clone() });
        session.handle(
            &mut store,
            DragEvent::Over {
                dragged: a,
                over: Some(b.to_string()),
            },
        );
        assert_eq!(session.handle(&mut store, DragEvent::Cancel), None);
        assert!(!session.is_dragging());
        assert_eq!(store.version(), version);

        // Cancel without a drag in flight is harmless
        session.handle(&mut store, DragEvent::Cancel);
    }

    #[test]
    fn test_session_end_without_start() {
        let (mut store, _, b, _) = board();
        let mut session = DragSession::new();
        let resolution = session.handle(
            &mut store,
            DragEvent::End {
                dragged: b,
                over: Some("mapping".into()),
            },
        );
        assert!(resolution.unwrap().is_move());
        assert_eq!(order(&store, &StageId::from("mapping")), ["B"]);

        // A stale end after the card is gone is ignored and still clears state
        let ghost = session.handle(
            &mut store,
            DragEvent::End {
                dragged: CardId::from("ghost"),
                over: None,
            },
        );
        assert_eq!(ghost, Some(DropResolution::Invalid));
        assert!(!session.is_dragging());
    }
}
