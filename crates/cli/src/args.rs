#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};
use plume_core::SheetId;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "plume", version)]
#[command(about = "Inspect and edit the sheets of a plume writing project")]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/plume/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding plume.db
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    /// Log filter, e.g. `warn` or `plume_storage=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a blank sheet and print its id
    New,
    /// Print one sheet as JSON
    Show { id: SheetId },
    /// Print the outline in document order
    Tree {
        /// Include deleted sheets
        #[arg(long)]
        all: bool,
    },
    Title { id: SheetId, title: String },
    Indent { id: SheetId, indent: i64 },
    Order { id: SheetId, sort_order: i64 },
    /// Replace the body, read from --file or stdin; counts are recomputed
    Content {
        id: SheetId,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Bulk update from a JSON object keyed by column name
    Update { id: SheetId, json: String },
    /// Print the ids nested under a sheet
    Children { id: SheetId },
    /// Print stored counts, or the sum over nested sheets with --children
    Counts {
        id: SheetId,
        #[arg(long)]
        children: bool,
    },
    /// Duplicate a sheet; an empty --prefix keeps title and position
    Copy {
        id: SheetId,
        #[arg(long)]
        prefix: Option<String>,
    },
    /// Create a new version with the given version code
    Version { id: SheetId, code: i64 },
    /// List every version sharing the sheet's lineage
    Versions { id: SheetId },
    Delete { id: SheetId },
    Undelete { id: SheetId },
    /// Sheet properties
    #[command(subcommand)]
    Prop(PropCommand),
}

#[derive(Debug, Subcommand)]
pub enum PropCommand {
    List { id: SheetId },
    Get { id: SheetId, name: String },
    Set { id: SheetId, name: String, value: String },
    Rm { id: SheetId, name: String },
    Mv { id: SheetId, from: String, to: String },
}
