#![forbid(unsafe_code)]

mod batch;
mod error;
mod sheet;
mod support;

pub use batch::SheetBatch;
pub use error::{RESET_REQUIRED, StoreError};
pub use sheet::SheetRef;

use plume_core::{NEW_SHEET_TITLE, SheetId, SheetRecord};
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};
use std::time::Duration;
use support::{
    SHEET_SELECT_COLUMNS, StorageState, install_schema, now_ms, preflight_gate, read_record,
};

pub const DB_FILE_NAME: &str = "plume.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed store of the sheets of one writing project.
///
/// Accessors handed out by [`SheetStore::sheet`] run on the bare connection,
/// so every mutation is durable when it returns. Use [`SheetStore::batch`]
/// to group several operations into one commit.
#[derive(Debug)]
pub struct SheetStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SheetStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let db_path = storage_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        let store = Self::init(conn, Some(storage_dir))?;
        tracing::info!(path = %db_path.display(), "sheet store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, storage_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        match preflight_gate(&conn) {
            Ok(StorageState::Current) => {}
            Ok(StorageState::Blank) => install_schema(&conn)?,
            Err(err) => {
                tracing::warn!(error = %err, "sheet store rejected by preflight gate");
                return Err(err);
            }
        }

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    /// Auto-commit accessor for one sheet. The id is not checked here.
    pub fn sheet(&self, id: SheetId) -> SheetRef<'_> {
        SheetRef::new(&self.conn, id)
    }

    /// Inserts a blank sheet and returns an accessor bound to it.
    pub fn create_sheet(&self) -> Result<SheetRef<'_>, StoreError> {
        let id = create_sheet_tx(&self.conn)?;
        Ok(SheetRef::new(&self.conn, id))
    }

    /// Opens an explicit transaction scope. Nothing written through the batch
    /// is durable until [`SheetBatch::commit`]; dropping it rolls back.
    pub fn batch(&mut self) -> Result<SheetBatch<'_>, StoreError> {
        Ok(SheetBatch::new(self.conn.transaction()?))
    }

    /// Every sheet in document order.
    pub fn list_outline(&self, include_deleted: bool) -> Result<Vec<SheetRecord>, StoreError> {
        list_outline_tx(&self.conn, include_deleted)
    }
}

pub(crate) fn create_sheet_tx(conn: &Connection) -> Result<SheetId, StoreError> {
    let now_ms = now_ms();
    conn.execute(
        "INSERT INTO sheets(title, version_code, dna_code, deleted, created_at_ms, updated_at_ms, content_at_ms) \
         VALUES (?1, 0, 0, 0, ?2, ?2, ?2)",
        params![NEW_SHEET_TITLE, now_ms],
    )?;
    let id = SheetId::try_new(conn.last_insert_rowid())
        .map_err(|_| StoreError::InvalidParameter("sqlite returned an invalid rowid"))?;
    tracing::debug!(sheet = %id, "sheet created");
    Ok(id)
}

pub(crate) fn list_outline_tx(
    conn: &Connection,
    include_deleted: bool,
) -> Result<Vec<SheetRecord>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SHEET_SELECT_COLUMNS} FROM sheets \
         WHERE ?1 OR deleted = 0 \
         ORDER BY sort_order ASC, id ASC"
    ))?;
    let mut rows = stmt.query(params![include_deleted])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(read_record(row)?);
    }
    Ok(out)
}
