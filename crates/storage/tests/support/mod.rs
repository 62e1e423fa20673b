#![forbid(unsafe_code)]
#![allow(dead_code)]

use plume_core::{SheetColumn, SheetId, SheetPatch};
use plume_storage::SheetStore;
use tempfile::TempDir;

pub(crate) fn open_temp_store() -> (TempDir, SheetStore) {
    let dir = TempDir::new().expect("temp storage dir must be creatable");
    let store = SheetStore::open(dir.path()).expect("fresh storage should open");
    (dir, store)
}

/// Inserts one sheet per `(title, sort_order, indent)` entry.
pub(crate) fn seed_outline(store: &SheetStore, rows: &[(&str, i64, i64)]) -> Vec<SheetId> {
    rows.iter()
        .map(|(title, sort_order, indent)| {
            let sheet = store.create_sheet().expect("sheet should be created");
            let patch = SheetPatch::new()
                .with(SheetColumn::Title, *title)
                .and_then(|patch| patch.with(SheetColumn::SortOrder, *sort_order))
                .and_then(|patch| patch.with(SheetColumn::Indent, *indent))
                .expect("seed patch must be valid");
            sheet.update(&patch).expect("seed update should succeed");
            sheet.id()
        })
        .collect()
}

pub(crate) fn missing_id() -> SheetId {
    SheetId::try_new(9_999).expect("positive id")
}
