#![forbid(unsafe_code)]

use super::SheetRef;
use crate::store::StoreError;
use crate::store::support::sheet_id_at;
use plume_core::outline::{ChildRun, OutlineRow, child_run};
use plume_core::{Counts, SheetId};
use rusqlite::{OptionalExtension, params};

impl SheetRef<'_> {
    /// Ids of the sheets nested under this one, in document order.
    pub fn child_ids(&self) -> Result<Vec<SheetId>, StoreError> {
        Ok(self.load_child_run()?.ids())
    }

    /// Summed counts of the nested sheets. The sheet's own counts are not
    /// included.
    pub fn child_counts(&self) -> Result<Counts, StoreError> {
        Ok(self.load_child_run()?.counts())
    }

    fn load_child_run(&self) -> Result<ChildRun, StoreError> {
        let (sort_order, indent) = self
            .conn
            .query_row(
                "SELECT sort_order, indent FROM sheets WHERE id=?1",
                params![self.id.get()],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?
            .ok_or(StoreError::NotFound)?;

        let mut stmt = self.conn.prepare(
            "SELECT id, indent, char_count, word_count FROM sheets \
             WHERE sort_order > ?1 \
             ORDER BY sort_order ASC, id ASC",
        )?;
        let mut failure = None;
        let following = stmt
            .query_map(params![sort_order], |row| {
                Ok(OutlineRow {
                    id: sheet_id_at(row, 0)?,
                    indent: row.get(1)?,
                    counts: Counts::new(row.get(2)?, row.get(3)?),
                })
            })?
            .map_while(|row| row.map_err(|err| failure = Some(err)).ok());
        // Rows are stepped lazily; the query stops where the run closes.
        let run = child_run(indent, following);
        if let Some(err) = failure {
            return Err(err.into());
        }
        Ok(run)
    }
}
