#![forbid(unsafe_code)]

use crate::args::{Command, PropCommand};
use crate::config::Config;
use anyhow::{Context, Result, bail};
use plume_core::text::count_text;
use plume_core::{SheetId, SheetPatch, SheetRecord};
use plume_storage::SheetStore;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Runs one subcommand and returns what should be printed on stdout.
///
/// `input` stands in for stdin when `content` is given no `--file`.
pub fn run(
    store: &SheetStore,
    command: Command,
    config: &Config,
    input: &mut dyn Read,
) -> Result<String> {
    match command {
        Command::New => Ok(store.create_sheet()?.id().to_string()),
        Command::Show { id } => show(store, id),
        Command::Tree { all } => tree(store, all),
        Command::Title { id, title } => {
            store.sheet(id).set_title(&title)?;
            Ok(String::new())
        }
        Command::Indent { id, indent } => {
            store.sheet(id).set_indent(indent)?;
            Ok(String::new())
        }
        Command::Order { id, sort_order } => {
            store.sheet(id).set_sort_order(sort_order)?;
            Ok(String::new())
        }
        Command::Content { id, file } => {
            let content = match file {
                Some(path) => std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    input
                        .read_to_string(&mut buf)
                        .context("failed to read content from stdin")?;
                    buf
                }
            };
            let counts = count_text(&content);
            store.sheet(id).set_content(&content, counts)?;
            Ok(serde_json::to_string(&counts)?)
        }
        Command::Update { id, json } => {
            let value: serde_json::Value =
                serde_json::from_str(&json).context("update payload is not valid JSON")?;
            let patch = SheetPatch::from_json(&value)?;
            store.sheet(id).update(&patch)?;
            Ok(String::new())
        }
        Command::Children { id } => Ok(id_lines(&store.sheet(id).child_ids()?)),
        Command::Counts { id, children } => {
            let sheet = store.sheet(id);
            let counts = if children {
                sheet.child_counts()?
            } else {
                sheet.counts()?
            };
            Ok(serde_json::to_string(&counts)?)
        }
        Command::Copy { id, prefix } => {
            let prefix = prefix.as_deref().unwrap_or(&config.copy_prefix);
            Ok(store.sheet(id).copy(prefix)?.to_string())
        }
        Command::Version { id, code } => Ok(store.sheet(id).new_version(code)?.to_string()),
        Command::Versions { id } => Ok(id_lines(&store.sheet(id).versions()?)),
        Command::Delete { id } => {
            store.sheet(id).delete()?;
            Ok(String::new())
        }
        Command::Undelete { id } => {
            store.sheet(id).undelete()?;
            Ok(String::new())
        }
        Command::Prop(command) => prop(store, command),
    }
}

fn prop(store: &SheetStore, command: PropCommand) -> Result<String> {
    match command {
        PropCommand::List { id } => {
            let properties = store.sheet(id).properties()?;
            Ok(serde_json::to_string_pretty(&properties)?)
        }
        PropCommand::Get { id, name } => match store.sheet(id).property(&name)? {
            Some(value) => Ok(value),
            None => bail!("sheet {id} has no property {name:?}"),
        },
        PropCommand::Set { id, name, value } => {
            store.sheet(id).set_property(&name, &value)?;
            Ok(String::new())
        }
        PropCommand::Rm { id, name } => {
            let removed = store.sheet(id).remove_property(&name)?;
            Ok(if removed { "removed" } else { "absent" }.to_string())
        }
        PropCommand::Mv { id, from, to } => {
            store.sheet(id).rename_property(&from, &to)?;
            Ok(String::new())
        }
    }
}

#[derive(Debug, Serialize)]
struct SheetView<'a> {
    #[serde(flatten)]
    record: &'a SheetRecord,
    versioned: bool,
    created_at: String,
    updated_at: String,
    content_at: String,
    properties: BTreeMap<&'a str, &'a str>,
}

fn show(store: &SheetStore, id: SheetId) -> Result<String> {
    let sheet = store.sheet(id);
    let record = sheet.record()?;
    let properties = sheet.properties()?;
    let view = SheetView {
        record: &record,
        versioned: record.has_lineage(),
        created_at: ms_to_rfc3339(record.created_at_ms),
        updated_at: ms_to_rfc3339(record.updated_at_ms),
        content_at: ms_to_rfc3339(record.content_at_ms),
        properties: properties
            .iter()
            .map(|p| (p.name.as_str(), p.value.as_str()))
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

fn tree(store: &SheetStore, include_deleted: bool) -> Result<String> {
    let mut out = String::new();
    for record in store.list_outline(include_deleted)? {
        let depth = usize::try_from(record.indent).unwrap_or(0);
        out.push_str(&format!(
            "{:>6} {:>6}  {}{}",
            record.id.get(),
            record.sort_order,
            "  ".repeat(depth),
            record.title
        ));
        if record.deleted {
            out.push_str("  [deleted]");
        }
        out.push('\n');
    }
    Ok(out.trim_end().to_string())
}

fn id_lines(ids: &[SheetId]) -> String {
    ids.iter()
        .map(SheetId::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

fn ms_to_rfc3339(ts_ms: i64) -> String {
    let nanos = i128::from(ts_ms) * 1_000_000;
    let dt = OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH);
    dt.format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}
