#![forbid(unsafe_code)]

use plume_core::{SheetId, SheetRecord, SheetValue};
use rusqlite::Row;
use rusqlite::types::{Type, Value};

pub(in crate::store) const SHEET_SELECT_COLUMNS: &str = "id, status_code, sort_order, indent, \
     version_code, dna_code, title, badge, synopsis, content, char_count, word_count, \
     created_at_ms, updated_at_ms, content_at_ms, deleted";

pub(in crate::store) fn sheet_id_at(row: &Row<'_>, index: usize) -> rusqlite::Result<SheetId> {
    let raw = row.get::<_, i64>(index)?;
    SheetId::try_new(raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(err))
    })
}

/// Maps a row selected with [`SHEET_SELECT_COLUMNS`].
pub(in crate::store) fn read_record(row: &Row<'_>) -> rusqlite::Result<SheetRecord> {
    Ok(SheetRecord {
        id: sheet_id_at(row, 0)?,
        status_code: row.get(1)?,
        sort_order: row.get(2)?,
        indent: row.get(3)?,
        version_code: row.get(4)?,
        dna_code: row.get(5)?,
        title: row.get(6)?,
        badge: row.get(7)?,
        synopsis: row.get(8)?,
        content: row.get(9)?,
        char_count: row.get(10)?,
        word_count: row.get(11)?,
        created_at_ms: row.get(12)?,
        updated_at_ms: row.get(13)?,
        content_at_ms: row.get(14)?,
        deleted: row.get(15)?,
    })
}

pub(in crate::store) fn sql_value(value: &SheetValue) -> Value {
    match value {
        SheetValue::Integer(v) => Value::Integer(*v),
        SheetValue::Text(v) => Value::Text(v.clone()),
        SheetValue::Bool(v) => Value::Integer(i64::from(*v)),
        SheetValue::Null => Value::Null,
    }
}
