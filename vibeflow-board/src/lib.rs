//! Kanban board state for the vibeflow workflow
//!
//! This crate holds the client-side state of a five-stage kanban board, resolves
//! drag-and-drop gestures into card moves, and persists the board as a versioned
//! JSON snapshot.
//!
//! ## Overview
//!
//! - **Fixed stages** - `vibes`, `mapping`, `flow`, `proving`, `shipped`, with advisory
//!   WIP limits (`flow` = 5, `proving` = 3)
//! - **Never fails mid-mutation** - operations on unknown ids are silent no-ops
//! - **Copy-on-write snapshots** - readers hold an `Arc<BoardState>` that never changes
//! - **Best-effort persistence** - a snapshot is written after every applied mutation;
//!   write failures are logged and the in-memory board stays authoritative
//!
//! ## Basic Usage
//!
//! ```rust
//! use vibeflow_board::{apply_drop, BoardStore, CardDraft, Priority, StageId, TagDraft};
//!
//! let mut store = BoardStore::new();
//! let flow = StageId::from("flow");
//!
//! let a = store.create_card(&flow, CardDraft::new("A")).unwrap();
//! let b = store
//!     .create_card(&flow, CardDraft::new("B").with_priority(Priority::High))
//!     .unwrap();
//!
//! let bug = store.create_tag(TagDraft::new("Bug")).unwrap();
//! store.attach_tag(&b, &bug);
//!
//! // Drop B onto A: B takes A's slot
//! apply_drop(&mut store, &b, Some(a.as_str()));
//! let titles: Vec<_> = store
//!     .get_cards_by_stage(&flow)
//!     .iter()
//!     .map(|c| c.title.as_str())
//!     .collect();
//! assert_eq!(titles, ["B", "A"]);
//! ```
//!
//! ## Storage
//!
//! ```text
//! .vibeflow/
//! ├── config.toml                  # Optional configuration
//! ├── vibeflow-board-storage.json  # Board snapshot
//! └── .lock                        # Held during CLI load-mutate-save cycles
//! ```

pub mod auto_color;
pub mod codec;
pub mod config;
pub mod drag;
mod error;
pub mod seed;
pub mod storage;
pub mod store;
pub mod types;

pub use config::BoardConfig;
pub use drag::{apply_drop, resolve_drop, DragEvent, DragSession, DropResolution};
pub use error::{BoardError, Result};
pub use seed::{seed_sample_board, should_seed};
pub use storage::{FileStorage, MemoryStorage, Persistence, SnapshotStorage, StorageLock};
pub use store::{BoardState, BoardStore};

// Re-export commonly used types
pub use types::{
    Activity, ActivityId, ActivityKind, Card, CardDraft, CardId, CardPatch, EffortPoints,
    Priority, Stage, StageId, StageName, Tag, TagCategory, TagDraft, TagId, WipStatus,
};
