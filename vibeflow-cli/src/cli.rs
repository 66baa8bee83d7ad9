use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vibeflow")]
#[command(version)]
#[command(about = "Manage a five-stage kanban board from the command line")]
#[command(long_about = "
vibeflow keeps a kanban board with the stages vibes, mapping, flow, proving and
shipped in a JSON snapshot under ./.vibeflow/. Every command prints JSON on stdout.

Cards and tags may be referred to by full id or by a unique id prefix; tags also
by name.

Example usage:
  vibeflow seed                                  # Fill an empty board with samples
  vibeflow add flow \"Fix login\" --priority high  # Create a card
  vibeflow move 01HX flow --index 0              # Move a card to the top of flow
  vibeflow drop 01HX 01HY                        # Drop a card onto another card
  vibeflow list --stage proving                  # Cards of one stage
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding the board snapshot (overrides configuration)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Name recorded on activity entries (overrides configuration)
    #[arg(long, global = true)]
    pub actor: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reset the board to five empty stages
    Init,
    /// Add sample tags and cards
    Seed {
        /// Seed even when the board already has cards
        #[arg(long)]
        force: bool,
    },
    /// List stages and their cards
    List {
        /// Only this stage
        #[arg(long)]
        stage: Option<String>,
        /// Include archived cards
        #[arg(long)]
        all: bool,
    },
    /// Show one card
    Show { card: String },
    /// Create a card at the end of a stage
    Add {
        stage: String,
        title: String,
        #[command(flatten)]
        fields: CardFields,
        /// Tag id or name to attach (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Edit a card's fields
    Update {
        card: String,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: CardFields,
    },
    /// Move a card to a stage position
    Move {
        card: String,
        stage: String,
        /// Target position; defaults to the end of the stage
        #[arg(long)]
        index: Option<usize>,
    },
    /// Move several cards into a stage, in the given order from the top
    BulkMove {
        stage: String,
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Drop a card onto another card or a stage, as a drag gesture would
    Drop {
        card: String,
        /// Card id or stage id under the pointer; omit for a cancelled drop
        over: Option<String>,
    },
    /// Archive cards
    Archive {
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Restore an archived card
    Restore { card: String },
    /// Copy a card
    Duplicate { card: String },
    /// Delete cards
    Delete {
        #[arg(required = true)]
        cards: Vec<String>,
    },
    /// Tag management
    #[command(subcommand)]
    Tag(TagCommands),
    /// Show or change a stage's WIP limit
    Wip {
        stage: String,
        /// New limit; 0 removes the limit
        limit: Option<u32>,
    },
    /// Recompute time-in-stage counters
    Refresh,
    /// Add cards to the selection
    Select {
        #[arg(required = true)]
        cards: Vec<String>,
        /// Replace the selection instead of adding to it
        #[arg(long)]
        only: bool,
    },
    /// Remove a card from the selection
    Deselect { card: String },
    /// Clear the selection
    ClearSelection,
}

/// Optional card fields shared by `add` and `update`
#[derive(Args, Debug, Default)]
pub struct CardFields {
    #[arg(long)]
    pub description: Option<String>,
    /// low, medium, high or critical
    #[arg(long)]
    pub priority: Option<String>,
    /// 1, 2, 3, 5, 8 or 13
    #[arg(long)]
    pub effort: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Create a tag (returns the existing tag when the name is taken)
    Create {
        name: String,
        /// stack, energy, time or custom
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Attach a tag to a card
    Add { card: String, tag: String },
    /// Detach a tag from a card
    Remove { card: String, tag: String },
    /// List all tags
    List,
    /// Cards carrying a tag
    Cards { tag: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "vibeflow", "add", "flow", "Fix login", "--priority", "high", "--tag", "Bug", "--tag",
            "Docs",
        ])
        .unwrap();
        match cli.command {
            Commands::Add {
                stage,
                title,
                fields,
                tags,
            } => {
                assert_eq!(stage, "flow");
                assert_eq!(title, "Fix login");
                assert_eq!(fields.priority.as_deref(), Some("high"));
                assert_eq!(tags, ["Bug", "Docs"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["vibeflow", "list", "--data-dir", "/tmp/x", "-q"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.quiet);
    }
}
