#![forbid(unsafe_code)]

use super::{SheetRef, StoreError, create_sheet_tx, list_outline_tx};
use plume_core::{SheetId, SheetRecord};
use rusqlite::Transaction;

/// Explicit transaction scope over the sheet store.
///
/// Accessors obtained from the batch see its uncommitted writes; other
/// connections do not until [`SheetBatch::commit`] closes the scope.
#[derive(Debug)]
pub struct SheetBatch<'s> {
    tx: Transaction<'s>,
}

impl<'s> SheetBatch<'s> {
    pub(super) fn new(tx: Transaction<'s>) -> Self {
        Self { tx }
    }

    pub fn sheet(&self, id: SheetId) -> SheetRef<'_> {
        SheetRef::new(&self.tx, id)
    }

    pub fn create_sheet(&self) -> Result<SheetRef<'_>, StoreError> {
        let id = create_sheet_tx(&self.tx)?;
        Ok(SheetRef::new(&self.tx, id))
    }

    pub fn list_outline(&self, include_deleted: bool) -> Result<Vec<SheetRecord>, StoreError> {
        list_outline_tx(&self.tx, include_deleted)
    }

    pub fn commit(self) -> Result<(), StoreError> {
        self.tx.commit()?;
        tracing::debug!("sheet batch committed");
        Ok(())
    }

    pub fn rollback(self) -> Result<(), StoreError> {
        self.tx.rollback()?;
        tracing::debug!("sheet batch rolled back");
        Ok(())
    }
}
