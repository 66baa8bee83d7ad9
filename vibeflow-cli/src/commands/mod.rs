//! Command handlers. Each returns the JSON document printed on stdout.

mod board;
mod card;
mod tag;

use crate::cli::{CardFields, Commands};
use crate::error::{CliError, CliResult};
use serde_json::Value;
use vibeflow_board::{
    BoardError, BoardState, BoardStore, CardId, CardPatch, EffortPoints, Priority, StageId,
    StageName, TagId,
};

pub fn run(store: &mut BoardStore, command: Commands) -> CliResult<Value> {
    match command {
        Commands::Init => board::init(store),
        Commands::Seed { force } => board::seed(store, force),
        Commands::List { stage, all } => board::list(store, stage.as_deref(), all),
        Commands::Wip { stage, limit } => board::wip(store, &stage, limit),
        Commands::Refresh => board::refresh(store),
        Commands::Select { cards, only } => board::select(store, &cards, only),
        Commands::Deselect { card } => board::deselect(store, &card),
        Commands::ClearSelection => board::clear_selection(store),

        Commands::Show { card } => card::show(store, &card),
        Commands::Add {
            stage,
            title,
            fields,
            tags,
        } => card::add(store, &stage, title, fields, &tags),
        Commands::Update {
            card,
            title,
            fields,
        } => card::update(store, &card, title, fields),
        Commands::Move { card, stage, index } => card::move_to(store, &card, &stage, index),
        Commands::BulkMove { stage, cards } => card::bulk_move(store, &stage, &cards),
        Commands::Drop { card, over } => card::drop_on(store, &card, over.as_deref()),
        Commands::Archive { cards } => card::archive(store, &cards),
        Commands::Restore { card } => card::restore(store, &card),
        Commands::Duplicate { card } => card::duplicate(store, &card),
        Commands::Delete { cards } => card::delete(store, &cards),

        Commands::Tag(command) => tag::run(store, command),
    }
}

// =============================================================================
// Argument resolution
// =============================================================================

pub(crate) fn resolve_stage(arg: &str) -> CliResult<StageId> {
    Ok(arg.parse::<StageName>()?.id())
}

/// Find a card by exact id or unique id prefix
pub(crate) fn resolve_card(state: &BoardState, arg: &str) -> CliResult<CardId> {
    let exact = CardId::from(arg);
    if state.get_card(&exact).is_some() {
        return Ok(exact);
    }
    let not_found = || CliError::from(BoardError::CardNotFound { id: arg.to_string() });
    if arg.is_empty() {
        return Err(not_found());
    }

    let prefix = arg.to_ascii_uppercase();
    let matches: Vec<&CardId> = state
        .cards()
        .map(|c| &c.id)
        .filter(|id| id.as_str().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        [] => Err(not_found()),
        _ => Err(CliError::usage(format!(
            "card id prefix '{arg}' matches {} cards",
            matches.len()
        ))),
    }
}

pub(crate) fn resolve_cards(state: &BoardState, args: &[String]) -> CliResult<Vec<CardId>> {
    args.iter().map(|arg| resolve_card(state, arg)).collect()
}

/// Find a tag by exact id, name (ignoring case) or unique id prefix
pub(crate) fn resolve_tag(state: &BoardState, arg: &str) -> CliResult<TagId> {
    let exact = TagId::from(arg);
    if state.tag(&exact).is_some() {
        return Ok(exact);
    }
    if let Some(tag) = state.find_tag_by_name(arg) {
        return Ok(tag.id.clone());
    }

    let prefix = arg.to_ascii_uppercase();
    let matches: Vec<&TagId> = state
        .tags()
        .iter()
        .map(|t| &t.id)
        .filter(|id| !prefix.is_empty() && id.as_str().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [one] => Ok((*one).clone()),
        _ => Err(BoardError::TagNotFound { id: arg.to_string() }.into()),
    }
}

/// Build a patch from the optional field flags. `none` clears priority or effort.
pub(crate) fn fields_patch(fields: CardFields) -> CliResult<CardPatch> {
    let mut patch = CardPatch::new();
    if let Some(description) = fields.description {
        patch = patch.with_description(Some(description));
    }
    if let Some(priority) = fields.priority {
        patch = patch.with_priority(parse_clearable::<Priority>(&priority)?);
    }
    if let Some(effort) = fields.effort {
        patch = patch.with_effort(parse_clearable::<EffortPoints>(&effort)?);
    }
    Ok(patch)
}

fn parse_clearable<T>(value: &str) -> CliResult<Option<T>>
where
    T: std::str::FromStr<Err = BoardError>,
{
    if value.eq_ignore_ascii_case("none") {
        Ok(None)
    } else {
        Ok(Some(value.parse()?))
    }
}
