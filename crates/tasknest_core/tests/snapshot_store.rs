use rusqlite::Connection;
use tasknest_core::db::migrations::latest_version;
use tasknest_core::db::{open_db, open_db_in_memory, DbError};
use tasknest_core::engine::create_todo;
use tasknest_core::{
    encode_snapshot, load_state, AppState, InMemorySnapshotStore, SnapshotStore,
    SqliteSnapshotStore, STORAGE_KEY,
};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn sqlite_store_upserts_blob_by_key() {
    let store = SqliteSnapshotStore::new(open_db_in_memory().unwrap());

    assert_eq!(store.load_blob(STORAGE_KEY).unwrap(), None);
    store.save_blob(STORAGE_KEY, "{\"a\":1}").unwrap();
    store.save_blob(STORAGE_KEY, "{\"a\":2}").unwrap();
    store.save_blob("other", "x").unwrap();

    assert_eq!(
        store.load_blob(STORAGE_KEY).unwrap().as_deref(),
        Some("{\"a\":2}")
    );
    assert_eq!(store.load_blob("other").unwrap().as_deref(), Some("x"));
}

#[test]
fn snapshot_survives_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasknest.sqlite3");
    let (state, id) = create_todo(AppState::default(), "water plants");

    {
        let store = SqliteSnapshotStore::new(open_db(&path).unwrap());
        store
            .save_blob(STORAGE_KEY, &encode_snapshot(&state).unwrap())
            .unwrap();
    }

    let store = SqliteSnapshotStore::new(open_db(&path).unwrap());
    let loaded = load_state(&store).unwrap();
    assert_eq!(loaded, state);
    assert_eq!(loaded.todos[&id.unwrap()].text, "water plants");
}

#[test]
fn open_db_waits_on_busy_locks() {
    let conn = open_db_in_memory().unwrap();
    let timeout_ms: i64 = conn
        .query_row("PRAGMA busy_timeout;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(timeout_ms, 5000);
}

#[test]
fn in_memory_store_counts_every_write_with_its_blob() {
    let store = InMemorySnapshotStore::new();
    assert_eq!(store.write_count(), 0);

    store.save_blob(STORAGE_KEY, "first").unwrap();
    store.save_blob(STORAGE_KEY, "second").unwrap();

    assert_eq!(store.write_count(), 2);
    assert_eq!(store.load_blob(STORAGE_KEY).unwrap().as_deref(), Some("second"));
    assert_eq!(store.load_blob("other").unwrap(), None);
}

#[test]
fn load_state_defaults_when_nothing_is_stored() {
    let store = InMemorySnapshotStore::new();
    assert_eq!(load_state(&store).unwrap(), AppState::default());
}

#[test]
fn load_state_resets_on_corrupt_blob() {
    let store = InMemorySnapshotStore::new();
    store.save_blob(STORAGE_KEY, "{\"schemaVersion\": 1, \"todos\": [").unwrap();
    assert_eq!(load_state(&store).unwrap(), AppState::default());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
