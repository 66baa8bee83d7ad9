//! Canonical tag table

use super::BoardStore;
use crate::types::{TagDraft, TagId};
use chrono::Utc;
use tracing::trace;

impl BoardStore {
    /// Create a canonical tag, or return the id of the existing tag with the same
    /// name (compared case-insensitively). Returns `None` for a blank name.
    pub fn create_tag(&mut self, draft: TagDraft) -> Option<TagId> {
        if let Some(existing) = self.state.find_tag_by_name(&draft.name) {
            trace!(tag = %existing.id, name = %existing.name, "create_tag: name already taken");
            return Some(existing.id.clone());
        }
        let tag = draft.into_tag(Utc::now())?;
        let id = tag.id.clone();

        self.state_mut().tags.push(tag);
        self.commit("create tag");
        Some(id)
    }
}
