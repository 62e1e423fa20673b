#![forbid(unsafe_code)]

mod outline;
mod properties;
mod versions;

use super::StoreError;
use super::support::{SHEET_SELECT_COLUMNS, now_ms, read_record, require_affected, sql_value};
use plume_core::{Counts, SheetId, SheetPatch, SheetRecord};
use rusqlite::types::{ToSql, Value};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

/// Accessor bound to one sheet id.
///
/// Holds no copy of the row: every call goes to the database. Whether a
/// write is durable on return depends on where the accessor came from (the
/// store itself or a [`super::SheetBatch`]).
#[derive(Clone, Copy, Debug)]
pub struct SheetRef<'c> {
    conn: &'c Connection,
    id: SheetId,
}

impl<'c> SheetRef<'c> {
    pub(in crate::store) fn new(conn: &'c Connection, id: SheetId) -> Self {
        Self { conn, id }
    }

    pub fn id(&self) -> SheetId {
        self.id
    }

    pub fn exists(&self) -> Result<bool, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM sheets WHERE id=?1",
                params![self.id.get()],
                |row| row.get::<_, i64>(0),
            )
            .optional()?
            .is_some())
    }

    pub fn record(&self) -> Result<SheetRecord, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {SHEET_SELECT_COLUMNS} FROM sheets WHERE id=?1"),
                params![self.id.get()],
                read_record,
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    pub fn sort_order(&self) -> Result<i64, StoreError> {
        self.scalar("sort_order")
    }

    pub fn set_sort_order(&self, sort_order: i64) -> Result<(), StoreError> {
        self.set_column("sort_order", &sort_order)
    }

    pub fn title(&self) -> Result<String, StoreError> {
        self.scalar("title")
    }

    pub fn set_title(&self, title: &str) -> Result<(), StoreError> {
        self.set_column("title", &title)
    }

    pub fn indent(&self) -> Result<i64, StoreError> {
        self.scalar("indent")
    }

    pub fn set_indent(&self, indent: i64) -> Result<(), StoreError> {
        self.set_column("indent", &indent)
    }

    pub fn version_code(&self) -> Result<i64, StoreError> {
        self.scalar("version_code")
    }

    pub fn set_version_code(&self, version_code: i64) -> Result<(), StoreError> {
        self.set_column("version_code", &version_code)
    }

    pub fn dna_code(&self) -> Result<i64, StoreError> {
        self.scalar("dna_code")
    }

    pub fn content(&self) -> Result<Option<String>, StoreError> {
        self.scalar("content")
    }

    /// Writes the body together with its counts and refreshes both the
    /// content and the update timestamps.
    pub fn set_content(&self, content: &str, counts: Counts) -> Result<(), StoreError> {
        let now_ms = now_ms();
        let affected = self.conn.execute(
            "UPDATE sheets \
             SET content=?2, char_count=?3, word_count=?4, content_at_ms=?5, updated_at_ms=?5 \
             WHERE id=?1",
            params![self.id.get(), content, counts.chars, counts.words, now_ms],
        )?;
        require_affected(affected)?;
        tracing::debug!(
            sheet = %self.id,
            chars = counts.chars,
            words = counts.words,
            "content written"
        );
        Ok(())
    }

    pub fn counts(&self) -> Result<Counts, StoreError> {
        self.conn
            .query_row(
                "SELECT char_count, word_count FROM sheets WHERE id=?1",
                params![self.id.get()],
                |row| Ok(Counts::new(row.get(0)?, row.get(1)?)),
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    /// Updates every column of `patch` plus the update timestamp in a single
    /// statement.
    pub fn update(&self, patch: &SheetPatch) -> Result<(), StoreError> {
        if patch.is_empty() {
            return Err(StoreError::InvalidParameter("sheet patch has no fields"));
        }

        let mut assignments = vec!["updated_at_ms=?2".to_string()];
        let mut values = vec![Value::Integer(self.id.get()), Value::Integer(now_ms())];
        for (column, value) in patch.iter() {
            values.push(sql_value(value));
            assignments.push(format!("{}=?{}", column.as_str(), values.len()));
        }

        let sql = format!("UPDATE sheets SET {} WHERE id=?1", assignments.join(", "));
        let affected = self.conn.execute(&sql, params_from_iter(values.iter()))?;
        require_affected(affected)?;
        tracing::debug!(sheet = %self.id, fields = patch.len(), "sheet updated");
        Ok(())
    }

    pub fn delete(&self) -> Result<(), StoreError> {
        self.set_deleted(true)
    }

    pub fn undelete(&self) -> Result<(), StoreError> {
        self.set_deleted(false)
    }

    pub fn is_deleted(&self) -> Result<bool, StoreError> {
        self.scalar("deleted")
    }

    fn set_deleted(&self, deleted: bool) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            "UPDATE sheets SET deleted=?2 WHERE id=?1",
            params![self.id.get(), deleted],
        )?;
        require_affected(affected)?;
        tracing::debug!(sheet = %self.id, deleted, "deletion flag changed");
        Ok(())
    }

    fn scalar<T: rusqlite::types::FromSql>(&self, column: &'static str) -> Result<T, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {column} FROM sheets WHERE id=?1"),
                params![self.id.get()],
                |row| row.get::<_, T>(0),
            )
            .optional()?
            .ok_or(StoreError::NotFound)
    }

    fn set_column(&self, column: &'static str, value: &dyn ToSql) -> Result<(), StoreError> {
        let affected = self.conn.execute(
            &format!("UPDATE sheets SET {column}=?2, updated_at_ms=?3 WHERE id=?1"),
            params![self.id.get(), value, now_ms()],
        )?;
        require_affected(affected)?;
        tracing::debug!(sheet = %self.id, column, "sheet field set");
        Ok(())
    }

    /// Fails with [`StoreError::NotFound`] when the bound id has no row.
    fn ensure_exists(&self) -> Result<(), StoreError> {
        if self.exists()? {
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
