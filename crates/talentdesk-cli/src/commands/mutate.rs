//! Row actions: `update`, `rm`, `rm-many`, and `create`.

use anyhow::Context;
use serde_json::{Map, Value, json};
use talentdesk_core::{Entity, RecordId};

use crate::cli::{CreateArgs, DeleteArgs, DeleteManyArgs, OutputFormat, UpdateArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::list::{apply_criteria, load};
use crate::output::{TableRow, render_record, to_json};

pub(crate) async fn handle_update<T: Entity + TableRow>(
    ctx: &AppContext,
    args: UpdateArgs,
) -> CliResult<String> {
    let patch = build_patch(&args.fields);
    let dispatcher = load::<T>(ctx).await?;
    let saved = dispatcher
        .mutate_one(RecordId::parse(&args.id), patch)
        .await?;
    render_record(&saved, ctx.output)
}

pub(crate) async fn handle_delete<T: Entity + TableRow>(
    ctx: &AppContext,
    args: DeleteArgs,
) -> CliResult<String> {
    let id = RecordId::parse(&args.id);
    let dispatcher = load::<T>(ctx).await?;
    dispatcher.delete_one(id.clone()).await?;
    deleted_output(ctx.output, &[id])
}

pub(crate) async fn handle_delete_many<T: Entity + TableRow>(
    ctx: &AppContext,
    args: DeleteManyArgs,
) -> CliResult<String> {
    if !args.query.is_empty() && !args.all_matching {
        return Err(CliError::validation(
            "filters only select records together with --all-matching",
        ));
    }
    let criteria = args.query.criteria()?;
    let ids = args
        .ids
        .iter()
        .map(|raw| RecordId::parse(raw))
        .collect::<Vec<_>>();
    let dispatcher = load::<T>(ctx).await?;

    let selected = dispatcher.update_list(|list| {
        let missing = ids
            .iter()
            .filter(|id| list.record(id).is_none())
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(CliError::validation(format!(
                "unknown {}: {}",
                T::PLURAL,
                missing.join(", ")
            )));
        }
        for id in &ids {
            if !list.selection().contains(id) {
                list.toggle_select_one(id);
            }
        }
        if args.all_matching {
            apply_criteria(list, criteria);
            list.select_all_matching();
        }
        Ok(list.selected_ids())
    })?;

    dispatcher.delete_selected().await?;
    deleted_output(ctx.output, &selected)
}

pub(crate) async fn handle_create<T: Entity + TableRow>(
    ctx: &AppContext,
    args: CreateArgs,
) -> CliResult<String> {
    let raw = match (args.json, args.file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))
            .map_err(CliError::failure)?,
        (None, None) => return Err(CliError::validation("pass --json or --file")),
    };
    let payload: Value = serde_json::from_str(&raw)
        .map_err(|err| CliError::validation(format!("payload is not valid JSON: {err}")))?;

    let dispatcher = ctx.dispatcher::<T>();
    let created = dispatcher.create_one(payload).await?;
    match created {
        Some(record) => render_record(&record, ctx.output),
        None => Ok(String::new()),
    }
}

/// Merge patch from `key=value` pairs; values that parse as JSON keep their type.
fn build_patch(fields: &[(String, String)]) -> Value {
    let members = fields
        .iter()
        .map(|(key, raw)| {
            let value = serde_json::from_str::<Value>(raw)
                .unwrap_or_else(|_| Value::String(raw.clone()));
            (key.clone(), value)
        })
        .collect::<Map<String, Value>>();
    Value::Object(members)
}

fn deleted_output(format: OutputFormat, ids: &[RecordId]) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&json!({ "deleted": ids })),
        OutputFormat::Table => Ok(String::new()),
    }
}
