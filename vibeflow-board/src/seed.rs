//! Sample board content for first runs and demos

use crate::store::{BoardState, BoardStore};
use crate::types::{CardDraft, EffortPoints, Priority, StageName, Tag, TagCategory, TagDraft, TagId};
use tracing::info;

const FEATURE: usize = 0;
const BUG: usize = 1;
const DOCS: usize = 2;
const REFACTOR: usize = 3;

const SAMPLE_TAGS: [(&str, &str); 4] = [
    ("Feature", "#C084FC"),
    ("Bug", "#FF5370"),
    ("Docs", "#4FD1FF"),
    ("Refactor", "#FFCB6B"),
];

struct SampleCard {
    stage: StageName,
    title: &'static str,
    description: &'static str,
    priority: Priority,
    effort: EffortPoints,
    tags: &'static [usize],
}

const SAMPLE_CARDS: &[SampleCard] = &[
    SampleCard {
        stage: StageName::Vibes,
        title: "Add Dark Mode Toggle",
        description: "Theme switcher in the header that toggles dark and light mode.\n\n\
                      - Persist the preference\n- Animate the transition",
        priority: Priority::Medium,
        effort: EffortPoints::Three,
        tags: &[FEATURE],
    },
    SampleCard {
        stage: StageName::Vibes,
        title: "Improve Search Performance",
        description: "Make search hold up on large boards.",
        priority: Priority::High,
        effort: EffortPoints::Five,
        tags: &[REFACTOR],
    },
    SampleCard {
        stage: StageName::Mapping,
        title: "Design Analytics Dashboard",
        description: "Mockups for velocity trends, cycle time, throughput and a productivity heat map.",
        priority: Priority::Medium,
        effort: EffortPoints::Three,
        tags: &[FEATURE, DOCS],
    },
    SampleCard {
        stage: StageName::Mapping,
        title: "API Rate Limiting Strategy",
        description: "Decide how public API endpoints are rate limited.",
        priority: Priority::Critical,
        effort: EffortPoints::Five,
        tags: &[FEATURE],
    },
    SampleCard {
        stage: StageName::Flow,
        title: "Implement Drag and Drop",
        description: "- [x] Draggable cards\n- [x] Drop zones\n- [ ] Keyboard support\n- [ ] Mobile testing",
        priority: Priority::High,
        effort: EffortPoints::Eight,
        tags: &[FEATURE],
    },
    SampleCard {
        stage: StageName::Flow,
        title: "Fix Card Alignment Issue",
        description: "Cards are misaligned in the mobile layout.",
        priority: Priority::Medium,
        effort: EffortPoints::Two,
        tags: &[BUG],
    },
    SampleCard {
        stage: StageName::Flow,
        title: "Add Keyboard Shortcuts",
        description: "`Ctrl+K` command palette, `N` new card, `/` search, `?` help.",
        priority: Priority::Low,
        effort: EffortPoints::Three,
        tags: &[FEATURE],
    },
    SampleCard {
        stage: StageName::Proving,
        title: "Test Card Persistence",
        description: "Check that cards survive a restart.",
        priority: Priority::High,
        effort: EffortPoints::Two,
        tags: &[BUG],
    },
    SampleCard {
        stage: StageName::Proving,
        title: "Write E2E Tests",
        description: "1. Create a card\n2. Drag between columns\n3. Edit details\n4. Archive and delete",
        priority: Priority::Medium,
        effort: EffortPoints::Five,
        tags: &[DOCS],
    },
    SampleCard {
        stage: StageName::Shipped,
        title: "Launch Beta Version",
        description: "Beta is live with the core features.",
        priority: Priority::Critical,
        effort: EffortPoints::Thirteen,
        tags: &[FEATURE],
    },
    SampleCard {
        stage: StageName::Shipped,
        title: "Setup CI/CD Pipeline",
        description: "Automated tests, build verification and deployment on every push.",
        priority: Priority::High,
        effort: EffortPoints::Eight,
        tags: &[REFACTOR, DOCS],
    },
];

/// Whether a board is empty enough to receive sample content
pub fn should_seed(state: &BoardState) -> bool {
    state.card_count() == 0
}

/// Add the sample tags and cards to the board. Returns the number of cards created.
///
/// Tags that already exist (by name) are reused.
pub fn seed_sample_board(store: &mut BoardStore) -> usize {
    let tag_ids: Vec<Option<TagId>> = SAMPLE_TAGS
        .iter()
        .map(|(name, color)| {
            store.create_tag(
                TagDraft::new(*name)
                    .with_category(TagCategory::Custom)
                    .with_color(*color),
            )
        })
        .collect();
    let tags: Vec<Option<Tag>> = tag_ids
        .iter()
        .map(|id| id.as_ref().and_then(|id| store.state().tag(id)).cloned())
        .collect();

    let created = SAMPLE_CARDS
        .iter()
        .filter_map(|sample| {
            let card_tags = sample
                .tags
                .iter()
                .filter_map(|&i| tags.get(i).cloned().flatten())
                .collect();
            store.create_card(
                &sample.stage.id(),
                CardDraft::new(sample.title)
                    .with_description(sample.description)
                    .with_priority(sample.priority)
                    .with_effort(sample.effort)
                    .with_tags(card_tags),
            )
        })
        .count();

    info!(cards = created, tags = SAMPLE_TAGS.len(), "seeded sample board");
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StageId;

    #[test]
    fn test_seed_sample_board() {
        let mut store = BoardStore::new();
        assert!(should_seed(store.state()));

        assert_eq!(seed_sample_board(&mut store), 11);
        assert!(!should_seed(store.state()));
        assert_eq!(store.tags().len(), 4);
        assert!(store.state().is_consistent());

        let counts: Vec<usize> = StageName::ALL
            .iter()
            .map(|name| store.get_cards_by_stage(&name.id()).len())
            .collect();
        assert_eq!(counts, [2, 2, 3, 2, 2]);

        let flow = store.get_cards_by_stage(&StageId::from("flow"));
        assert_eq!(flow[0].title, "Implement Drag and Drop");
        assert_eq!(flow[0].effort_points, Some(EffortPoints::Eight));

        let bug = store.state().find_tag_by_name("bug").unwrap();
        assert_eq!(bug.color, "#FF5370");
        assert_eq!(store.get_cards_by_tag(&bug.id).len(), 2);
    }

    #[test]
    fn test_seeding_twice_reuses_tags() {
        let mut store = BoardStore::new();
        seed_sample_board(&mut store);
        seed_sample_board(&mut store);
        assert_eq!(store.tags().len(), 4);
        assert_eq!(store.state().card_count(), 22);
    }
}
