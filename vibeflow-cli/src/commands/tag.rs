//! Tag commands

use super::{resolve_card, resolve_tag};
use crate::cli::TagCommands;
use crate::error::{CliError, CliResult};
use serde_json::{json, Value};
use vibeflow_board::{BoardStore, TagCategory, TagDraft};

pub fn run(store: &mut BoardStore, command: TagCommands) -> CliResult<Value> {
    match command {
        TagCommands::Create {
            name,
            category,
            color,
            icon,
        } => {
            let mut draft = TagDraft::new(name);
            if let Some(category) = category {
                draft = draft.with_category(category.parse::<TagCategory>()?);
            }
            if let Some(color) = color {
                draft = draft.with_color(color);
            }
            if let Some(icon) = icon {
                draft = draft.with_icon(icon);
            }
            let id = store
                .create_tag(draft)
                .ok_or_else(|| CliError::usage("tag name must not be blank"))?;
            Ok(serde_json::to_value(store.state().tag(&id))?)
        }
        TagCommands::Add { card, tag } => {
            let card = resolve_card(store.state(), &card)?;
            let tag = resolve_tag(store.state(), &tag)?;
            let added = store.attach_tag(&card, &tag);
            Ok(json!({ "card": card, "tag": tag, "added": added }))
        }
        TagCommands::Remove { card, tag } => {
            let card = resolve_card(store.state(), &card)?;
            let tag = resolve_tag(store.state(), &tag)?;
            let removed = store.remove_tag(&card, &tag);
            Ok(json!({ "card": card, "tag": tag, "removed": removed }))
        }
        TagCommands::List => Ok(serde_json::to_value(store.tags())?),
        TagCommands::Cards { tag } => {
            let tag = resolve_tag(store.state(), &tag)?;
            Ok(serde_json::to_value(store.get_cards_by_tag(&tag))?)
        }
    }
}
