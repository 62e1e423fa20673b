#![forbid(unsafe_code)]

use super::SheetRef;
use crate::store::StoreError;
use crate::store::support::{is_duplicate_key, now_ms, require_affected};
use plume_core::SheetProperty;
use rusqlite::{OptionalExtension, params};

impl SheetRef<'_> {
    pub fn properties(&self) -> Result<Vec<SheetProperty>, StoreError> {
        self.ensure_exists()?;
        let mut stmt = self.conn.prepare(
            "SELECT name, value FROM sheet_properties WHERE sheet_id=?1 ORDER BY name ASC",
        )?;
        let mut rows = stmt.query(params![self.id.get()])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(SheetProperty {
                name: row.get(0)?,
                value: row.get(1)?,
            });
        }
        Ok(out)
    }

    pub fn property(&self, name: &str) -> Result<Option<String>, StoreError> {
        let name = property_name(name)?;
        self.ensure_exists()?;
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM sheet_properties WHERE sheet_id=?1 AND name=?2",
                params![self.id.get(), name],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    /// Inserts the property, or overwrites its value when it already exists.
    pub fn set_property(&self, name: &str, value: &str) -> Result<(), StoreError> {
        let name = property_name(name)?;
        self.ensure_exists()?;
        self.conn.execute(
            r#"
            INSERT INTO sheet_properties(sheet_id, name, value, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(sheet_id, name) DO UPDATE SET value=excluded.value, updated_at_ms=excluded.updated_at_ms
            "#,
            params![self.id.get(), name, value, now_ms()],
        )?;
        tracing::debug!(sheet = %self.id, property = name, "property set");
        Ok(())
    }

    /// Returns whether a property was removed. Removing an absent property is
    /// not an error.
    pub fn remove_property(&self, name: &str) -> Result<bool, StoreError> {
        let name = property_name(name)?;
        self.ensure_exists()?;
        let removed = self.conn.execute(
            "DELETE FROM sheet_properties WHERE sheet_id=?1 AND name=?2",
            params![self.id.get(), name],
        )?;
        tracing::debug!(sheet = %self.id, property = name, removed, "property removed");
        Ok(removed > 0)
    }

    pub fn rename_property(&self, old_name: &str, new_name: &str) -> Result<(), StoreError> {
        let old_name = property_name(old_name)?;
        let new_name = property_name(new_name)?;
        self.ensure_exists()?;
        let renamed = self.conn.execute(
            "UPDATE sheet_properties SET name=?3, updated_at_ms=?4 WHERE sheet_id=?1 AND name=?2",
            params![self.id.get(), old_name, new_name, now_ms()],
        );
        let affected = match renamed {
            Ok(affected) => affected,
            Err(err) if is_duplicate_key(&err) => {
                return Err(StoreError::InvalidParameter("property name already in use"));
            }
            Err(err) => return Err(err.into()),
        };
        require_affected(affected)?;
        tracing::debug!(sheet = %self.id, from = old_name, to = new_name, "property renamed");
        Ok(())
    }
}

/// Names are compared after trimming, on every call.
fn property_name(name: &str) -> Result<&str, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::InvalidParameter("property name must not be empty"));
    }
    Ok(name)
}
