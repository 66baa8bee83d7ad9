//! Card commands

use super::{fields_patch, resolve_card, resolve_cards, resolve_stage, resolve_tag};
use crate::cli::CardFields;
use crate::error::{CliError, CliResult};
use serde_json::{json, Value};
use vibeflow_board::{apply_drop, BoardError, BoardStore, CardDraft, CardId, StageName};

fn card_json(store: &BoardStore, id: &CardId) -> CliResult<Value> {
    let card = store
        .get_card(id)
        .ok_or_else(|| BoardError::CardNotFound { id: id.to_string() })?;
    Ok(serde_json::to_value(card)?)
}

pub fn show(store: &BoardStore, card: &str) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    card_json(store, &id)
}

pub fn add(
    store: &mut BoardStore,
    stage: &str,
    title: String,
    fields: CardFields,
    tags: &[String],
) -> CliResult<Value> {
    let stage = resolve_stage(stage)?;
    let tags = tags
        .iter()
        .map(|arg| {
            let id = resolve_tag(store.state(), arg)?;
            store
                .state()
                .tag(&id)
                .cloned()
                .ok_or_else(|| CliError::from(BoardError::TagNotFound { id: arg.clone() }))
        })
        .collect::<CliResult<Vec<_>>>()?;

    let patch = fields_patch(fields)?;
    let draft = CardDraft {
        title,
        description: patch.description.flatten(),
        tags,
        priority: patch.priority.flatten(),
        effort_points: patch.effort_points.flatten(),
        is_archived: false,
    };

    let id = store
        .create_card(&stage, draft)
        .ok_or_else(|| CliError::usage("card title must not be blank"))?;
    card_json(store, &id)
}

pub fn update(
    store: &mut BoardStore,
    card: &str,
    title: Option<String>,
    fields: CardFields,
) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    let mut patch = fields_patch(fields)?;
    if let Some(title) = title {
        if title.trim().is_empty() {
            return Err(CliError::usage("card title must not be blank"));
        }
        patch = patch.with_title(title);
    }
    if patch.is_empty() {
        return Err(CliError::usage(
            "nothing to update: pass --title, --description, --priority or --effort",
        ));
    }
    store.update_card(&id, patch);
    card_json(store, &id)
}

pub fn move_to(
    store: &mut BoardStore,
    card: &str,
    stage: &str,
    index: Option<usize>,
) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    let stage = resolve_stage(stage)?;
    let moved = store.move_card(&id, &stage, index.unwrap_or(usize::MAX));
    let (stage, index) = store
        .state()
        .position_of(&id)
        .ok_or_else(|| BoardError::CardNotFound { id: id.to_string() })?;
    Ok(json!({ "card": id, "moved": moved, "stage": stage, "index": index }))
}

pub fn bulk_move(store: &mut BoardStore, stage: &str, cards: &[String]) -> CliResult<Value> {
    let stage = resolve_stage(stage)?;
    let ids = resolve_cards(store.state(), cards)?;
    let moved = store.bulk_move_cards(&ids, &stage);
    let order: Vec<&str> = store
        .stage(&stage)
        .map(|s| s.cards.iter().map(|id| id.as_str()).collect())
        .unwrap_or_default();
    Ok(json!({ "moved": moved, "stage": stage, "cards": order }))
}

/// Drop target: a card (full id or prefix) or a stage name; anything else is passed
/// through and resolves as an invalid drop
fn drop_target(store: &BoardStore, over: &str) -> String {
    if let Ok(id) = resolve_card(store.state(), over) {
        return id.to_string();
    }
    match over.parse::<StageName>() {
        Ok(name) => name.as_str().to_string(),
        Err(_) => over.to_string(),
    }
}

pub fn drop_on(store: &mut BoardStore, card: &str, over: Option<&str>) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    let over = over.map(|o| drop_target(store, o));
    let resolution = apply_drop(store, &id, over.as_deref());
    Ok(serde_json::to_value(resolution)?)
}

pub fn archive(store: &mut BoardStore, cards: &[String]) -> CliResult<Value> {
    let ids = resolve_cards(store.state(), cards)?;
    let archived = store.bulk_archive_cards(&ids);
    Ok(json!({ "archived": archived }))
}

pub fn restore(store: &mut BoardStore, card: &str) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    store.restore_card(&id);
    card_json(store, &id)
}

pub fn duplicate(store: &mut BoardStore, card: &str) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    let copy = store.duplicate_card(&id);
    card_json(store, &copy)
}

pub fn delete(store: &mut BoardStore, cards: &[String]) -> CliResult<Value> {
    let ids = resolve_cards(store.state(), cards)?;
    let deleted = store.bulk_delete_cards(&ids);
    Ok(json!({ "deleted": deleted }))
}
