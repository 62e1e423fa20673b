#![forbid(unsafe_code)]

use super::SheetRef;
use crate::store::StoreError;
use crate::store::support::{atomic, now_ms, require_affected, sheet_id_at};
use plume_core::{DNA_UNASSIGNED, SheetId};
use rusqlite::{Connection, params};

impl SheetRef<'_> {
    /// Duplicates the sheet into a new row and returns the new id.
    ///
    /// Every column but the id and the creation time is copied. A non-empty
    /// `title_prefix` marks a user-visible copy: the prefix goes in front of
    /// the title and the clone gets the next sort order, right after the
    /// original. An empty prefix keeps title and sort order as they are.
    ///
    /// This accessor stays bound to the original sheet.
    pub fn copy(&self, title_prefix: &str) -> Result<SheetId, StoreError> {
        let copy_id = copy_row(self.conn, self.id, title_prefix)?;
        tracing::debug!(sheet = %self.id, copy = %copy_id, "sheet copied");
        Ok(copy_id)
    }

    /// Creates a new version of the sheet and returns its id.
    ///
    /// The first time a sheet is versioned its DNA code becomes its own id;
    /// the copy inherits that code and gets `version_code`. The steps run as
    /// one transaction whether or not the accessor belongs to a batch.
    pub fn new_version(&self, version_code: i64) -> Result<SheetId, StoreError> {
        let version_id = atomic(self.conn, |conn| {
            conn.execute(
                "UPDATE sheets SET dna_code=id WHERE id=?1 AND dna_code=?2",
                params![self.id.get(), DNA_UNASSIGNED],
            )?;
            let version_id = copy_row(conn, self.id, "")?;
            let affected = conn.execute(
                "UPDATE sheets SET version_code=?2 WHERE id=?1",
                params![version_id.get(), version_code],
            )?;
            require_affected(affected)?;
            Ok(version_id)
        })?;
        tracing::debug!(
            sheet = %self.id,
            version = %version_id,
            version_code,
            "sheet versioned"
        );
        Ok(version_id)
    }

    /// Every sheet sharing this sheet's lineage, ordered by version code.
    /// Empty while the sheet has never been versioned.
    pub fn versions(&self) -> Result<Vec<SheetId>, StoreError> {
        let dna_code = self.dna_code()?;
        if dna_code == DNA_UNASSIGNED {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT id FROM sheets WHERE dna_code=?1 ORDER BY version_code ASC, id ASC",
        )?;
        let mut rows = stmt.query(params![dna_code])?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            out.push(sheet_id_at(row, 0)?);
        }
        Ok(out)
    }
}

fn copy_row(conn: &Connection, id: SheetId, title_prefix: &str) -> Result<SheetId, StoreError> {
    let sort_increment: i64 = if title_prefix.is_empty() { 0 } else { 1 };
    let inserted = conn.execute(
        r#"
        INSERT INTO sheets(
          status_code, sort_order, indent, version_code, dna_code, title, badge, synopsis,
          content, char_count, word_count, created_at_ms, updated_at_ms, content_at_ms, deleted
        )
        SELECT
          status_code, sort_order + ?2, indent, version_code, dna_code, ?3 || title, badge, synopsis,
          content, char_count, word_count, ?4, updated_at_ms, content_at_ms, deleted
        FROM sheets
        WHERE id=?1
        "#,
        params![id.get(), sort_increment, title_prefix, now_ms()],
    )?;
    require_affected(inserted)?;
    SheetId::try_new(conn.last_insert_rowid())
        .map_err(|_| StoreError::InvalidParameter("sqlite returned an invalid rowid"))
}
