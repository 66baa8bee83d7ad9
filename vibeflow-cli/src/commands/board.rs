//! Board-wide commands: init, seed, list, wip, refresh and selection

use super::{resolve_card, resolve_cards, resolve_stage};
use crate::error::CliResult;
use chrono::Utc;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use vibeflow_board::{seed_sample_board, should_seed, BoardError, BoardStore, Stage};

pub fn init(store: &mut BoardStore) -> CliResult<Value> {
    store.reset();
    let stages: Vec<&str> = store.stages().map(|s| s.id.as_str()).collect();
    Ok(json!({ "reset": true, "stages": stages }))
}

pub fn seed(store: &mut BoardStore, force: bool) -> CliResult<Value> {
    if !force && !should_seed(store.state()) {
        return Ok(json!({ "created": 0, "skipped": "board already has cards" }));
    }
    let created = seed_sample_board(store);
    Ok(json!({ "created": created }))
}

fn stage_json(store: &BoardStore, stage: &Stage, include_archived: bool) -> CliResult<Value> {
    let cards: Vec<_> = store
        .get_cards_by_stage(&stage.id)
        .into_iter()
        .filter(|c| include_archived || !c.is_archived)
        .collect();
    Ok(json!({
        "id": stage.id,
        "title": stage.title,
        "icon": stage.icon,
        "wipLimit": stage.wip_limit,
        "wipStatus": stage.wip_status(),
        "cards": serde_json::to_value(cards)?,
    }))
}

pub fn list(store: &BoardStore, stage: Option<&str>, include_archived: bool) -> CliResult<Value> {
    let filter = stage.map(resolve_stage).transpose()?;
    let stages = store
        .stages()
        .filter(|s| filter.as_ref().is_none_or(|id| &s.id == id))
        .map(|s| stage_json(store, s, include_archived))
        .collect::<CliResult<Vec<_>>>()?;
    Ok(Value::Array(stages))
}

pub fn wip(store: &mut BoardStore, stage: &str, limit: Option<u32>) -> CliResult<Value> {
    let stage_id = resolve_stage(stage)?;
    if let Some(limit) = limit {
        store.update_stage_wip_limit(&stage_id, NonZeroU32::new(limit));
    }
    let Some(record) = store.stage(&stage_id) else {
        return Err(BoardError::StageNotFound { id: stage.to_string() }.into());
    };
    Ok(json!({
        "stage": record.id,
        "wipLimit": record.wip_limit,
        "cards": record.cards.len(),
        "wipStatus": record.wip_status(),
    }))
}

pub fn refresh(store: &mut BoardStore) -> CliResult<Value> {
    let changed = store.refresh_timers(Utc::now());
    Ok(json!({ "refreshed": changed }))
}

fn selection_json(store: &BoardStore) -> Value {
    let ids: Vec<&str> = store.selection().map(|id| id.as_str()).collect();
    json!({ "selected": ids })
}

pub fn select(store: &mut BoardStore, cards: &[String], only: bool) -> CliResult<Value> {
    let ids = resolve_cards(store.state(), cards)?;
    if only {
        store.select_multiple(&ids);
    } else {
        for id in &ids {
            store.select_card(id);
        }
    }
    Ok(selection_json(store))
}

pub fn deselect(store: &mut BoardStore, card: &str) -> CliResult<Value> {
    let id = resolve_card(store.state(), card)?;
    store.deselect_card(&id);
    Ok(selection_json(store))
}

pub fn clear_selection(store: &mut BoardStore) -> CliResult<Value> {
    store.clear_selection();
    Ok(selection_json(store))
}
