#![forbid(unsafe_code)]

use super::super::StoreError;
use super::{atomic, now_ms};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

pub(in crate::store) const SCHEMA_VERSION: i64 = 1;

const SHEET_STORE_TABLES: [&str; 3] = ["store_state", "sheets", "sheet_properties"];

/// What [`preflight_gate`] found in the database file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::store) enum StorageState {
    /// No user tables yet; the schema must be installed.
    Blank,
    /// Sheet store tables at [`SCHEMA_VERSION`]; nothing to do.
    Current,
}

/// Refuses any database that is not a sheet store of the current schema
/// version. Rejections carry the `RESET_REQUIRED` prefix.
pub(in crate::store) fn preflight_gate(conn: &Connection) -> Result<StorageState, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut found = BTreeSet::new();
    while let Some(row) = rows.next()? {
        found.insert(row.get::<_, String>(0)?);
    }
    if found.is_empty() {
        return Ok(StorageState::Blank);
    }

    let foreign: Vec<&str> = found
        .iter()
        .map(String::as_str)
        .filter(|name| !SHEET_STORE_TABLES.contains(name))
        .collect();
    if !foreign.is_empty() {
        tracing::warn!(tables = ?foreign, "database holds tables the sheet store does not own");
        return Err(StoreError::InvalidParameter(
            "RESET_REQUIRED: not a sheet store database",
        ));
    }

    let missing: Vec<&str> = SHEET_STORE_TABLES
        .into_iter()
        .filter(|name| !found.contains(*name))
        .collect();
    if !missing.is_empty() {
        tracing::warn!(tables = ?missing, "sheet store tables are missing");
        return Err(StoreError::InvalidParameter(
            "RESET_REQUIRED: sheet store is incomplete",
        ));
    }

    let stored_version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton=1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    match stored_version {
        Some(SCHEMA_VERSION) => Ok(StorageState::Current),
        Some(other) => {
            tracing::warn!(
                found = other,
                expected = SCHEMA_VERSION,
                "sheet store schema version differs"
            );
            Err(StoreError::InvalidParameter(
                "RESET_REQUIRED: sheet store was written by another schema version",
            ))
        }
        None => Err(StoreError::InvalidParameter(
            "RESET_REQUIRED: sheet store has no schema version",
        )),
    }
}

/// Creates the sheet store tables on a blank database, in one transaction.
/// A concurrent opener that got there first leaves nothing to overwrite.
pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    atomic(conn, |conn| {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS store_state (
              singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
              schema_version INTEGER NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sheets (
              id INTEGER PRIMARY KEY AUTOINCREMENT,
              status_code TEXT,
              sort_order INTEGER NOT NULL DEFAULT 0,
              indent INTEGER NOT NULL DEFAULT 0,
              version_code INTEGER NOT NULL DEFAULT 0,
              dna_code INTEGER NOT NULL DEFAULT 0,
              title TEXT NOT NULL,
              badge TEXT,
              synopsis TEXT,
              content TEXT,
              char_count INTEGER NOT NULL DEFAULT 0,
              word_count INTEGER NOT NULL DEFAULT 0,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              content_at_ms INTEGER NOT NULL,
              deleted INTEGER NOT NULL DEFAULT 0 CHECK(deleted IN (0, 1))
            );

            CREATE INDEX IF NOT EXISTS idx_sheets_sort_order
              ON sheets(sort_order, id);

            CREATE INDEX IF NOT EXISTS idx_sheets_dna_version
              ON sheets(dna_code, version_code, id);

            CREATE TABLE IF NOT EXISTS sheet_properties (
              sheet_id INTEGER NOT NULL,
              name TEXT NOT NULL,
              value TEXT NOT NULL,
              created_at_ms INTEGER NOT NULL,
              updated_at_ms INTEGER NOT NULL,
              PRIMARY KEY(sheet_id, name),
              FOREIGN KEY(sheet_id) REFERENCES sheets(id) ON DELETE CASCADE
            );
            "#,
        )?;

        conn.execute(
            "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
             VALUES (1, ?1, ?2, ?2) \
             ON CONFLICT(singleton) DO NOTHING",
            params![SCHEMA_VERSION, now_ms()],
        )?;
        Ok(())
    })?;
    tracing::info!(schema_version = SCHEMA_VERSION, "sheet store schema installed");
    Ok(())
}
