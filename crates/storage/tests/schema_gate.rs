#![forbid(unsafe_code)]

use plume_storage::{DB_FILE_NAME, RESET_REQUIRED, SheetStore, StoreError};
use rusqlite::Connection;
use tempfile::TempDir;

#[test]
fn storage_open_is_fail_closed_on_foreign_schema() {
    let dir = TempDir::new().expect("temp dir");
    let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("legacy db must open");
    conn.execute(
        "CREATE TABLE tbl_sheet(l_sheet_id INTEGER PRIMARY KEY)",
        [],
    )
    .expect("legacy table should be created");
    drop(conn);

    let err = SheetStore::open(dir.path()).expect_err("foreign storage must be rejected");
    assert_eq!(err.code(), RESET_REQUIRED);
    assert!(matches!(
        err,
        StoreError::InvalidParameter(message) if message.starts_with(RESET_REQUIRED)
    ));
}

#[test]
fn storage_open_rejects_other_schema_version() {
    let dir = TempDir::new().expect("temp dir");
    drop(SheetStore::open(dir.path()).expect("fresh storage should open"));

    let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("db must open");
    conn.execute("UPDATE store_state SET schema_version = 99", [])
        .expect("schema version should be rewritten");
    drop(conn);

    let err = SheetStore::open(dir.path()).expect_err("version mismatch must be rejected");
    assert_eq!(err.code(), RESET_REQUIRED);
}

#[test]
fn reopening_own_schema_is_accepted() {
    let dir = TempDir::new().expect("temp dir");
    drop(SheetStore::open(dir.path()).expect("fresh storage should open"));
    SheetStore::open(dir.path()).expect("own schema should reopen");
}

#[test]
fn deleting_a_row_cascades_to_its_properties() {
    let dir = TempDir::new().expect("temp dir");
    let store = SheetStore::open(dir.path()).expect("fresh storage should open");
    let sheet = store.create_sheet().expect("sheet should be created");
    sheet.set_property("pov", "Ada").expect("insert");
    let id = sheet.id();
    drop(store);

    let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("db must open");
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .expect("foreign keys");
    conn.execute("DELETE FROM sheets WHERE id = ?1", [id.get()])
        .expect("physical delete");
    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM sheet_properties", [], |row| row.get(0))
        .expect("count");
    assert_eq!(remaining, 0);
}

#[test]
fn reopening_leaves_the_state_row_untouched() {
    let dir = TempDir::new().expect("temp dir");
    drop(SheetStore::open(dir.path()).expect("fresh storage should open"));

    let state = |dir: &TempDir| -> (i64, i64) {
        let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("db must open");
        conn.query_row(
            "SELECT schema_version, updated_at_ms FROM store_state WHERE singleton=1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .expect("state row")
    };
    let before = state(&dir);
    std::thread::sleep(std::time::Duration::from_millis(5));
    drop(SheetStore::open(dir.path()).expect("own schema should reopen"));
    assert_eq!(state(&dir), before);
}

#[test]
fn partial_sheet_store_is_rejected() {
    let dir = TempDir::new().expect("temp dir");
    drop(SheetStore::open(dir.path()).expect("fresh storage should open"));

    let conn = Connection::open(dir.path().join(DB_FILE_NAME)).expect("db must open");
    conn.execute("DROP TABLE sheet_properties", [])
        .expect("table should be dropped");
    drop(conn);

    let err = SheetStore::open(dir.path()).expect_err("incomplete storage must be rejected");
    assert_eq!(err.code(), RESET_REQUIRED);
}
