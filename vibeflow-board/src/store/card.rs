//! Card mutations: create, update, delete, move, archive, duplicate, tags, timers
//! and the bulk variants.

use super::{now_after, BoardStore};
use crate::types::{Activity, ActivityKind, Card, CardDraft, CardId, CardPatch, StageId, Tag, TagId};
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::trace;

impl BoardStore {
    fn activity(&self, kind: ActivityKind, description: String, at: DateTime<Utc>) -> Activity {
        Activity::new(kind, description, at).with_actor(self.actor.clone())
    }

    /// Create a card at the end of `stage`.
    ///
    /// Returns `None` without changing anything when the stage does not exist or
    /// the title is blank.
    pub fn create_card(&mut self, stage: &StageId, draft: CardDraft) -> Option<CardId> {
        if self.state.stage(stage).is_none() {
            trace!(stage = %stage, "create_card: unknown stage");
            return None;
        }
        let card = draft.into_card(stage.clone(), Utc::now())?;
        let id = card.id.clone();

        let state = self.state_mut();
        state.stages[stage].cards.push(id.clone());
        state.cards.insert(id.clone(), card);
        self.commit("create card");
        Some(id)
    }

    /// Merge `patch` into a card and refresh `updated_at`.
    ///
    /// No-op when the card is unknown, the patch carries a blank title or the
    /// patch would not change any field.
    pub fn update_card(&mut self, id: &CardId, patch: CardPatch) -> bool {
        let Some(current) = self.state.get_card(id) else {
            trace!(card = %id, "update_card: unknown card");
            return false;
        };
        let mut updated = current.clone();
        if !patch.apply(&mut updated) || &updated == current {
            return false;
        }

        let now = now_after(updated.updated_at);
        updated.updated_at = now;
        let fields = patch.field_names();
        let entry = self
            .activity(ActivityKind::Edited, format!("Edited {}", fields.join(", ")), now)
            .with_data(json!({ "fields": fields }));
        updated.activity.push(entry);

        self.state_mut().cards[id] = updated;
        self.commit("update card");
        true
    }

    /// Remove a card from the card table, its stage and the selection
    pub fn delete_card(&mut self, id: &CardId) -> bool {
        let Some(stage) = self.state.get_card(id).map(|c| c.stage.clone()) else {
            trace!(card = %id, "delete_card: unknown card");
            return false;
        };

        let state = self.state_mut();
        state.cards.shift_remove(id);
        if let Some(stage) = state.stages.get_mut(&stage) {
            stage.cards.retain(|c| c != id);
        }
        state.selected.shift_remove(id);
        self.commit("delete card");
        true
    }

    /// Move a card to `index` of `to_stage`, clamping the index to the list bounds.
    ///
    /// A reorder that leaves the card where it is changes nothing, not even
    /// `updated_at`. A cross-stage move resets the stage timer and logs a `moved`
    /// activity entry.
    pub fn move_card(&mut self, id: &CardId, to_stage: &StageId, index: usize) -> bool {
        let Some(card) = self.state.get_card(id) else {
            trace!(card = %id, "move_card: unknown card");
            return false;
        };
        let Some(target) = self.state.stage(to_stage) else {
            trace!(stage = %to_stage, "move_card: unknown stage");
            return false;
        };
        let from_stage = card.stage.clone();
        let floor = card.updated_at;

        if &from_stage == to_stage {
            let current = target.position_of(id);
            // Length once the card is taken out of the list
            let remaining = target.cards.len() - usize::from(current.is_some());
            let dest = index.min(remaining);
            if current == Some(dest) {
                trace!(card = %id, index = dest, "move_card: position unchanged");
                return false;
            }

            let now = now_after(floor);
            let state = self.state_mut();
            let list = &mut state.stages[to_stage].cards;
            list.retain(|c| c != id);
            list.insert(dest, id.clone());
            state.cards[id].updated_at = now;
            self.commit("reorder card");
            return true;
        }

        let now = now_after(floor);
        let entry = self
            .activity(
                ActivityKind::Moved,
                format!("Moved from {from_stage} to {to_stage}"),
                now,
            )
            .with_data(json!({ "from": from_stage, "to": to_stage }));

        let state = self.state_mut();
        if let Some(source) = state.stages.get_mut(&from_stage) {
            source.cards.retain(|c| c != id);
        }
        let list = &mut state.stages[to_stage].cards;
        let dest = index.min(list.len());
        list.insert(dest, id.clone());

        let card = &mut state.cards[id];
        card.stage = to_stage.clone();
        card.stage_entered_at = now;
        card.time_in_stage = 0;
        card.updated_at = now;
        card.activity.push(entry);
        self.commit("move card");
        true
    }

    pub fn archive_card(&mut self, id: &CardId) -> bool {
        self.update_card(id, CardPatch::archived(true))
    }

    pub fn restore_card(&mut self, id: &CardId) -> bool {
        self.update_card(id, CardPatch::archived(false))
    }

    /// Create a copy of a card at the end of its stage, titled `"<title> (Copy)"`.
    ///
    /// Returns the new id, or `id` itself when the source card does not exist.
    pub fn duplicate_card(&mut self, id: &CardId) -> CardId {
        let Some(source) = self.state.get_card(id) else {
            trace!(card = %id, "duplicate_card: unknown card");
            return id.clone();
        };
        let stage = source.stage.clone();
        let mut draft = CardDraft::from(source);
        draft.title = format!("{} (Copy)", source.title);

        self.create_card(&stage, draft).unwrap_or_else(|| id.clone())
    }

    // =========================================================================
    // Tags on cards
    // =========================================================================

    /// Embed a copy of `tag` in a card. No-op if the card already carries that tag id.
    pub fn add_tag(&mut self, id: &CardId, tag: Tag) -> bool {
        let Some(card) = self.state.get_card(id) else {
            trace!(card = %id, "add_tag: unknown card");
            return false;
        };
        if card.has_tag(&tag.id) {
            return false;
        }

        let now = now_after(card.updated_at);
        let entry = self
            .activity(ActivityKind::Tagged, format!("Added tag {}", tag.name), now)
            .with_data(json!({ "added": tag.id }));

        let card = &mut self.state_mut().cards[id];
        card.tags.push(tag);
        card.updated_at = now;
        card.activity.push(entry);
        self.commit("add tag");
        true
    }

    /// Copy the canonical tag `tag` into a card. No-op if either is unknown.
    pub fn attach_tag(&mut self, id: &CardId, tag: &TagId) -> bool {
        match self.state.tag(tag) {
            Some(tag) => {
                let tag = tag.clone();
                self.add_tag(id, tag)
            }
            None => {
                trace!(tag = %tag, "attach_tag: unknown tag");
                false
            }
        }
    }

    /// Drop the tag with id `tag` from a card
    pub fn remove_tag(&mut self, id: &CardId, tag: &TagId) -> bool {
        let Some(card) = self.state.get_card(id) else {
            trace!(card = %id, "remove_tag: unknown card");
            return false;
        };
        let Some(name) = card.tags.iter().find(|t| &t.id == tag).map(|t| t.name.clone()) else {
            return false;
        };

        let now = now_after(card.updated_at);
        let entry = self
            .activity(ActivityKind::Tagged, format!("Removed tag {name}"), now)
            .with_data(json!({ "removed": tag }));

        let card = &mut self.state_mut().cards[id];
        card.tags.retain(|t| &t.id != tag);
        card.updated_at = now;
        card.activity.push(entry);
        self.commit("remove tag");
        true
    }

    // =========================================================================
    // Timers
    // =========================================================================

    /// Recompute `time_in_stage` and `total_time` of every card as of `now`.
    /// `updated_at` is left alone.
    pub fn refresh_timers(&mut self, now: DateTime<Utc>) -> bool {
        let changed = self.state.cards().any(|card| {
            let mut refreshed = card.clone();
            refreshed.refresh_timers(now);
            refreshed.time_in_stage != card.time_in_stage || refreshed.total_time != card.total_time
        });
        if !changed {
            return false;
        }

        self.state_mut()
            .cards
            .values_mut()
            .for_each(|card: &mut Card| card.refresh_timers(now));
        self.commit("refresh timers");
        true
    }

    // =========================================================================
    // Bulk operations
    // =========================================================================

    /// Move cards into `to_stage`, the n-th id to index n. Returns how many moves applied.
    pub fn bulk_move_cards(&mut self, ids: &[CardId], to_stage: &StageId) -> usize {
        ids.iter()
            .enumerate()
            .filter(|(index, id)| self.move_card(id, to_stage, *index))
            .count()
    }

    pub fn bulk_archive_cards(&mut self, ids: &[CardId]) -> usize {
        ids.iter().filter(|id| self.archive_card(id)).count()
    }

    pub fn bulk_delete_cards(&mut self, ids: &[CardId]) -> usize {
        ids.iter().filter(|id| self.delete_card(id)).count()
    }
}
