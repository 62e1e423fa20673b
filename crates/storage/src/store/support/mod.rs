#![forbid(unsafe_code)]

mod rows;
mod schema;
mod time;

pub(in crate::store) use rows::*;
pub(in crate::store) use schema::{StorageState, install_schema, preflight_gate};
pub(in crate::store) use time::now_ms;

use super::StoreError;
use rusqlite::{Connection, ErrorCode, ffi};

/// Runs `f` atomically. On a connection in auto-commit mode a transaction is
/// opened and committed around it; inside an open batch `f` joins the batch.
pub(in crate::store) fn atomic<T>(
    conn: &Connection,
    f: impl FnOnce(&Connection) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    if !conn.is_autocommit() {
        return f(conn);
    }
    let tx = conn.unchecked_transaction()?;
    let out = f(&tx)?;
    tx.commit()?;
    Ok(out)
}

/// True when SQLite refused a row because its key is already taken.
pub(in crate::store) fn is_duplicate_key(err: &rusqlite::Error) -> bool {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return false;
    };
    failure.code == ErrorCode::ConstraintViolation
        && matches!(
            failure.extended_code,
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE
        )
}

pub(in crate::store) fn require_affected(affected: usize) -> Result<(), StoreError> {
    if affected == 0 {
        Err(StoreError::NotFound)
    } else {
        Ok(())
    }
}
