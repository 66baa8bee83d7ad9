//! Stage settings and board reset

use super::{BoardState, BoardStore};
use crate::types::StageId;
use std::num::NonZeroU32;
use tracing::{info, trace};

impl BoardStore {
    /// Set or clear a stage's advisory WIP limit
    pub fn update_stage_wip_limit(&mut self, stage: &StageId, limit: Option<NonZeroU32>) -> bool {
        match self.state.stage(stage) {
            None => {
                trace!(stage = %stage, "update_stage_wip_limit: unknown stage");
                false
            }
            Some(current) if current.wip_limit == limit => false,
            Some(_) => {
                self.state_mut().stages[stage].wip_limit = limit;
                self.commit("update wip limit");
                true
            }
        }
    }

    /// Restore the five empty default stages and clear cards, tags and selection
    pub fn reset(&mut self) {
        info!(cards = self.state.card_count(), "resetting board");
        *self.state_mut() = BoardState::default();
        self.commit("reset board");
    }
}

#[cfg(test)]
mod tests {
    use crate::store::{BoardState, BoardStore};
    use crate::types::{CardDraft, StageId, TagDraft, WipStatus};
    use std::num::NonZeroU32;

    #[test]
    fn test_update_wip_limit() {
        let mut store = BoardStore::new();
        let vibes = StageId::from("vibes");
        assert_eq!(store.wip_status(&vibes), Some(WipStatus::Unlimited));

        assert!(store.update_stage_wip_limit(&vibes, NonZeroU32::new(1)));
        assert!(!store.update_stage_wip_limit(&vibes, NonZeroU32::new(1)));
        store.create_card(&vibes, CardDraft::new("A")).unwrap();
        store.create_card(&vibes, CardDraft::new("B")).unwrap();
        // Advisory only: the second card is accepted and flagged
        assert_eq!(store.wip_status(&vibes), Some(WipStatus::OverLimit));

        assert!(store.update_stage_wip_limit(&vibes, None));
        assert_eq!(store.wip_status(&vibes), Some(WipStatus::Unlimited));
        assert!(!store.update_stage_wip_limit(&StageId::from("backlog"), None));
    }

    #[test]
    fn test_reset() {
        let mut store = BoardStore::new();
        let id = store
            .create_card(&StageId::from("flow"), CardDraft::new("A"))
            .unwrap();
        store.create_tag(TagDraft::new("Bug"));
        store.select_card(&id);
        store.update_stage_wip_limit(&StageId::from("flow"), None);

        store.reset();
        assert_eq!(store.state(), &BoardState::default());
        let ids: Vec<_> = store.stages().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["vibes", "mapping", "flow", "proving", "shipped"]);
        assert_eq!(
            store.stage(&StageId::from("flow")).unwrap().wip_limit,
            NonZeroU32::new(5)
        );
    }
}
