//! The board's keyed tables and the pure queries over them

use crate::types::{Card, CardId, Stage, StageId, StageName, Tag, TagId, WipStatus};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

/// Authoritative board data: stage table, card table, tag table and selection.
///
/// Stage and card tables iterate in insertion order; stage order is the
/// on-screen column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardState {
    pub(crate) stages: IndexMap<StageId, Stage>,
    pub(crate) cards: IndexMap<CardId, Card>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) selected: IndexSet<CardId>,
}

impl Default for BoardState {
    /// Five empty stages with their default WIP limits and no cards, tags or selection
    fn default() -> Self {
        Self {
            stages: Stage::defaults()
                .into_iter()
                .map(|stage| (stage.id.clone(), stage))
                .collect(),
            cards: IndexMap::new(),
            tags: Vec::new(),
            selected: IndexSet::new(),
        }
    }
}

impl BoardState {
    // =========================================================================
    // Table access
    // =========================================================================

    /// Stages in creation order
    pub fn stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages.values()
    }

    pub fn stage(&self, id: &StageId) -> Option<&Stage> {
        self.stages.get(id)
    }

    /// All cards, archived included, in table order
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn tag(&self, id: &TagId) -> Option<&Tag> {
        self.tags.iter().find(|t| &t.id == id)
    }

    /// Case-insensitive lookup in the canonical tag table
    pub fn find_tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.has_name(name))
    }

    /// Selected card ids in selection order
    pub fn selection(&self) -> impl Iterator<Item = &CardId> {
        self.selected.iter()
    }

    pub fn is_selected(&self, id: &CardId) -> bool {
        self.selected.contains(id)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_card(&self, id: &CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    /// Cards of a stage in column order. Ids that do not resolve to a card are skipped.
    pub fn get_cards_by_stage(&self, stage: &StageId) -> Vec<&Card> {
        self.stages
            .get(stage)
            .map(|s| s.cards.iter().filter_map(|id| self.cards.get(id)).collect())
            .unwrap_or_default()
    }

    /// Cards carrying a copy of the tag, in card table order
    pub fn get_cards_by_tag(&self, tag: &TagId) -> Vec<&Card> {
        self.cards.values().filter(|c| c.has_tag(tag)).collect()
    }

    /// WIP status of a stage, `None` for an unknown stage
    pub fn wip_status(&self, stage: &StageId) -> Option<WipStatus> {
        self.stages.get(stage).map(Stage::wip_status)
    }

    /// Position of a card inside its owning stage
    pub fn position_of(&self, card: &CardId) -> Option<(StageId, usize)> {
        let stage_id = &self.cards.get(card)?.stage;
        let index = self.stages.get(stage_id)?.position_of(card)?;
        Some((stage_id.clone(), index))
    }

    // =========================================================================
    // Integrity
    // =========================================================================

    /// Describe every referential-integrity violation. Empty for a consistent board.
    pub fn integrity_violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        for name in StageName::ALL {
            if !self.stages.contains_key(&name.id()) {
                problems.push(format!("stage {name} is missing"));
            }
        }
        for key in self.stages.keys() {
            if !StageName::ALL.into_iter().any(|name| &name.id() == key) {
                problems.push(format!("stage table holds unknown stage {key}"));
            }
        }

        for stage in self.stages.values() {
            let mut seen = IndexSet::new();
            for id in &stage.cards {
                if !seen.insert(id) {
                    problems.push(format!("stage {} lists card {id} twice", stage.id));
                }
                match self.cards.get(id) {
                    None => problems.push(format!("stage {} lists unknown card {id}", stage.id)),
                    Some(card) if card.stage != stage.id => problems.push(format!(
                        "stage {} lists card {id} owned by {}",
                        stage.id, card.stage
                    )),
                    Some(_) => {}
                }
            }
        }

        for (key, card) in &self.cards {
            if key != &card.id {
                problems.push(format!("card table key {key} holds card {}", card.id));
            }
            let owners = self
                .stages
                .values()
                .filter(|s| s.contains(&card.id))
                .count();
            if owners != 1 {
                problems.push(format!("card {} is listed by {owners} stages", card.id));
            }
            let mut tag_ids = IndexSet::new();
            if !card.tags.iter().all(|t| tag_ids.insert(&t.id)) {
                problems.push(format!("card {} carries a tag twice", card.id));
            }
        }

        for (i, tag) in self.tags.iter().enumerate() {
            if self.tags[..i].iter().any(|t| t.has_name(&tag.name)) {
                problems.push(format!("tag name {} is not unique", tag.name));
            }
        }

        for id in &self.selected {
            if !self.cards.contains_key(id) {
                problems.push(format!("selection holds unknown card {id}"));
            }
        }

        problems
    }

    pub fn is_consistent(&self) -> bool {
        self.integrity_violations().is_empty()
    }

    /// Bring a loaded board back to a consistent shape, returning a description of
    /// each repair made.
    ///
    /// Cards keyed under a different id or owned by an unknown stage are dropped.
    /// Stage lists lose duplicate, dangling and foreign ids; cards missing from their
    /// owner's list are appended to it. Selection entries without a card are pruned.
    pub(crate) fn repair(&mut self) -> Vec<String> {
        let mut repairs = Vec::new();

        let stages = &self.stages;
        self.cards.retain(|key, card| {
            if key != &card.id {
                repairs.push(format!("dropped card {} stored under key {key}", card.id));
                false
            } else if !stages.contains_key(&card.stage) {
                repairs.push(format!(
                    "dropped card {key} owned by unknown stage {}",
                    card.stage
                ));
                false
            } else {
                true
            }
        });

        for card in self.cards.values_mut() {
            let before = card.tags.len();
            let mut seen = IndexSet::new();
            card.tags.retain(|t| seen.insert(t.id.clone()));
            if card.tags.len() != before {
                repairs.push(format!("removed duplicate tags from card {}", card.id));
            }
        }

        for stage in self.stages.values_mut() {
            let mut seen = IndexSet::new();
            let cards = &self.cards;
            let before = stage.cards.len();
            stage.cards.retain(|id| {
                cards.get(id).is_some_and(|c| c.stage == stage.id) && seen.insert(id.clone())
            });
            if stage.cards.len() != before {
                repairs.push(format!(
                    "removed {} stray ids from stage {}",
                    before - stage.cards.len(),
                    stage.id
                ));
            }
        }

        for card in self.cards.values() {
            if let Some(stage) = self.stages.get_mut(&card.stage) {
                if !stage.contains(&card.id) {
                    stage.cards.push(card.id.clone());
                    repairs.push(format!("appended card {} to stage {}", card.id, stage.id));
                }
            }
        }

        let before = self.selected.len();
        let cards = &self.cards;
        self.selected.retain(|id| cards.contains_key(id));
        if self.selected.len() != before {
            repairs.push(format!(
                "pruned {} unknown ids from the selection",
                before - self.selected.len()
            ));
        }

        repairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CardDraft, TagDraft};
    use chrono::Utc;

    fn insert(state: &mut BoardState, stage: &str, title: &str) -> CardId {
        let card = CardDraft::new(title)
            .into_card(StageId::from(stage), Utc::now())
            .unwrap();
        let id = card.id.clone();
        state.stages[&StageId::from(stage)].cards.push(id.clone());
        state.cards.insert(id.clone(), card);
        id
    }

    #[test]
    fn test_default_state() {
        let state = BoardState::default();
        assert_eq!(state.stages().count(), 5);
        assert_eq!(state.card_count(), 0);
        assert!(state.tags().is_empty());
        assert_eq!(state.selection().count(), 0);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_integrity_flags_repeated_tag_names_and_stage_set() {
        let mut state = BoardState::default();
        for name in ["Bug", "BUG"] {
            let tag = TagDraft::new(name).into_tag(Utc::now()).unwrap();
            state.tags.push(tag);
        }
        let stage = state.stages.shift_remove(&StageId::from("proving")).unwrap();
        state.stages.insert(StageId::from("Proving"), stage);

        let problems = state.integrity_violations();
        assert!(problems.iter().any(|p| p == "tag name BUG is not unique"));
        assert!(problems.iter().any(|p| p == "stage proving is missing"));
        assert!(problems
            .iter()
            .any(|p| p == "stage table holds unknown stage Proving"));
    }

    #[test]
    fn test_cards_by_stage_skips_dangling_ids() {
        let mut state = BoardState::default();
        let a = insert(&mut state, "flow", "A");
        state.stages[&StageId::from("flow")]
            .cards
            .push(CardId::from("ghost"));

        let cards = state.get_cards_by_stage(&StageId::from("flow"));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].id, a);
        assert!(state
            .get_cards_by_stage(&StageId::from("nowhere"))
            .is_empty());
        assert!(!state.is_consistent());
    }

    #[test]
    fn test_repair() {
        let mut state = BoardState::default();
        let a = insert(&mut state, "flow", "A");
        let b = insert(&mut state, "vibes", "B");

        // Dangling id, duplicate id and a card missing from its owner's list
        let flow = StageId::from("flow");
        state.stages[&flow].cards.push(CardId::from("ghost"));
        state.stages[&flow].cards.push(a.clone());
        state.stages[&StageId::from("vibes")].cards.clear();
        state.selected.insert(CardId::from("ghost"));
        state.selected.insert(b.clone());

        let repairs = state.repair();
        assert!(!repairs.is_empty());
        assert!(state.is_consistent(), "{:?}", state.integrity_violations());
        assert_eq!(state.stages[&flow].cards, vec![a]);
        assert_eq!(state.stages[&StageId::from("vibes")].cards, vec![b.clone()]);
        assert_eq!(state.selection().collect::<Vec<_>>(), vec![&b]);
    }

    #[test]
    fn test_repair_drops_cards_of_unknown_stage() {
        let mut state = BoardState::default();
        let a = insert(&mut state, "flow", "A");
        state.cards[&a].stage = StageId::from("backlog");

        state.repair();
        assert!(state.get_card(&a).is_none());
        assert!(state.is_consistent());
    }

    #[test]
    fn test_repair_is_noop_on_consistent_state() {
        let mut state = BoardState::default();
        insert(&mut state, "flow", "A");
        insert(&mut state, "proving", "B");
        let before = state.clone();
        assert!(state.repair().is_empty());
        assert_eq!(state, before);
    }
}
