//! The board store: single source of truth for stages, cards, tags and selection.
//!
//! Every mutation either fully applies or is a silent no-op (unknown ids, blank
//! titles, positions that would not change). Applied mutations copy-on-write the
//! shared [`BoardState`], bump the store version and, when the store was opened
//! with [`Persistence`], write a snapshot.

mod card;
mod selection;
mod stage;
mod state;
mod tag;

pub use state::BoardState;

use crate::storage::Persistence;
use crate::types::{Card, CardId, Stage, StageId, Tag, TagId, WipStatus};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Owns the board state and applies mutations to it
#[derive(Debug, Default)]
pub struct BoardStore {
    state: Arc<BoardState>,
    version: u64,
    persistence: Option<Persistence>,
    actor: Option<String>,
}

impl BoardStore {
    /// An in-memory store holding the default board
    pub fn new() -> Self {
        Self::default()
    }

    /// An in-memory store over an existing state
    pub fn from_state(state: BoardState) -> Self {
        Self {
            state: Arc::new(state),
            ..Self::default()
        }
    }

    /// Load the persisted board and save after every applied mutation
    pub fn open(persistence: Persistence) -> Self {
        let state = persistence.load();
        debug!(
            key = persistence.key(),
            cards = state.card_count(),
            "opened board store"
        );
        Self {
            state: Arc::new(state),
            version: 0,
            persistence: Some(persistence),
            actor: None,
        }
    }

    /// Record `actor` on activity entries written by this store
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// The current state. The returned snapshot never changes; a later mutation
    /// produces a new one.
    pub fn snapshot(&self) -> Arc<BoardState> {
        Arc::clone(&self.state)
    }

    /// Borrow the current state
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Number of mutations applied since the store was created or opened
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Save the current state now. Returns `false` when there is no persistence or
    /// the write failed.
    pub fn flush(&self) -> bool {
        self.persistence
            .as_ref()
            .is_some_and(|p| p.save(&self.state))
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn get_card(&self, id: &CardId) -> Option<&Card> {
        self.state.get_card(id)
    }

    pub fn get_cards_by_stage(&self, stage: &StageId) -> Vec<&Card> {
        self.state.get_cards_by_stage(stage)
    }

    pub fn get_cards_by_tag(&self, tag: &TagId) -> Vec<&Card> {
        self.state.get_cards_by_tag(tag)
    }

    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.state.stages()
    }

    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.state.stage(id)
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.state.cards()
    }

    pub fn tags(&self) -> &[Tag] {
        self.state.tags()
    }

    pub fn selection(&self) -> impl Iterator<Item = &CardId> {
        self.state.selection()
    }

    pub fn is_selected(&self, id: &CardId) -> bool {
        self.state.is_selected(id)
    }

    pub fn wip_status(&self, stage: &StageId) -> Option<WipStatus> {
        self.state.wip_status(stage)
    }

    // =========================================================================
    // Commit plumbing
    // =========================================================================

    /// Mutable access to the state, cloning it first if a snapshot is shared
    fn state_mut(&mut self) -> &mut BoardState {
        Arc::make_mut(&mut self.state)
    }

    /// Finish an applied mutation
    fn commit(&mut self, operation: &'static str) {
        self.version += 1;
        debug!(operation, version = self.version, "applied board mutation");
        if let Some(persistence) = &self.persistence {
            persistence.save(&self.state);
        }
    }
}

/// Current time, never earlier than `floor`. Keeps `updated_at` monotonic even if the
/// wall clock steps backwards.
fn now_after(floor: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(floor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, DEFAULT_STORAGE_KEY};
    use crate::types::CardDraft;

    #[test]
    fn test_snapshots_are_copy_on_write() {
        let mut store = BoardStore::new();
        let before = store.snapshot();

        store
            .create_card(&StageId::from("flow"), CardDraft::new("A"))
            .unwrap();
        let after = store.snapshot();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(before.card_count(), 0);
        assert_eq!(after.card_count(), 1);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_noop_keeps_snapshot_and_version() {
        let mut store = BoardStore::new();
        let before = store.snapshot();

        store.delete_card(&CardId::from("missing"));
        assert!(store
            .create_card(&StageId::from("backlog"), CardDraft::new("A"))
            .is_none());

        assert!(Arc::ptr_eq(&before, &store.snapshot()));
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn test_open_persists_every_mutation() {
        let storage = MemoryStorage::new();
        let mut store = BoardStore::open(Persistence::with_default_key(storage.clone()));
        assert!(storage.get(DEFAULT_STORAGE_KEY).is_none());

        let id = store
            .create_card(&StageId::from("vibes"), CardDraft::new("Idea"))
            .unwrap();
        assert!(storage.get(DEFAULT_STORAGE_KEY).unwrap().contains(id.as_str()));

        let reopened = BoardStore::open(Persistence::with_default_key(storage));
        assert_eq!(reopened.state(), store.state());
        assert_eq!(reopened.version(), 0);
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let storage = MemoryStorage::new();
        storage.set_fail_writes(true);
        let mut store = BoardStore::open(Persistence::with_default_key(storage.clone()));

        let id = store
            .create_card(&StageId::from("vibes"), CardDraft::new("Idea"))
            .unwrap();
        assert!(store.get_card(&id).is_some());
        assert!(storage.get(DEFAULT_STORAGE_KEY).is_none());
        assert!(!store.flush());

        storage.set_fail_writes(false);
        assert!(store.flush());
        assert!(storage.get(DEFAULT_STORAGE_KEY).is_some());
    }
}
