//! Card selection. Only ids of existing cards are ever selected.

use super::BoardStore;
use crate::types::CardId;
use indexmap::IndexSet;

impl BoardStore {
    pub fn select_card(&mut self, id: &CardId) -> bool {
        if self.state.get_card(id).is_none() || self.state.is_selected(id) {
            return false;
        }
        self.state_mut().selected.insert(id.clone());
        self.commit("select card");
        true
    }

    pub fn deselect_card(&mut self, id: &CardId) -> bool {
        if !self.state.is_selected(id) {
            return false;
        }
        self.state_mut().selected.shift_remove(id);
        self.commit("deselect card");
        true
    }

    /// Replace the selection with `ids`, skipping unknown cards
    pub fn select_multiple(&mut self, ids: &[CardId]) -> bool {
        let selection: IndexSet<CardId> = ids
            .iter()
            .filter(|id| self.state.get_card(id).is_some())
            .cloned()
            .collect();
        if selection.iter().eq(self.state.selected.iter()) {
            return false;
        }
        self.state_mut().selected = selection;
        self.commit("select cards");
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.state.selected.is_empty() {
            return false;
        }
        self.state_mut().selected.clear();
        self.commit("clear selection");
        true
    }
}
