use rusqlite::Connection;
use tasktimer::db::migrate::{LATEST_SCHEMA_VERSION, pending_steps, schema_version};
use tasktimer::models::task::TaskDraft;
use tasktimer::{AppError, StoreSettings, TaskTimerStore};

#[test]
fn fresh_database_is_brought_to_latest_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.sqlite");

    let store = TaskTimerStore::open(&path, StoreSettings::default()).unwrap();
    assert_eq!(store.schema_version(), LATEST_SCHEMA_VERSION);
    assert_eq!(store.stats().unwrap().schema_version, LATEST_SCHEMA_VERSION);

    let conn = Connection::open(&path).unwrap();
    for name in ["Tasks", "Timings", "vwCurrentTiming", "vwTaskDurations", "log"] {
        let found: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = ?1",
                [name],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(found, 1, "{name} missing");
    }
}

#[test]
fn reopening_is_idempotent_and_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("again.sqlite");

    {
        let store = TaskTimerStore::open(&path, StoreSettings::default()).unwrap();
        store.create_task(&TaskDraft::new("kept")).unwrap();
    }

    let store = TaskTimerStore::open(&path, StoreSettings::default()).unwrap();
    assert_eq!(store.schema_version(), LATEST_SCHEMA_VERSION);
    assert_eq!(store.list_tasks().unwrap().len(), 1);

    let migrations = store
        .read_log(100)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "migration_applied")
        .count();
    assert_eq!(migrations, LATEST_SCHEMA_VERSION as usize);
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA user_version = 99").unwrap();
    }

    let err = TaskTimerStore::open(&path, StoreSettings::default())
        .err()
        .expect("open must fail");
    assert!(matches!(err, AppError::Schema(_)));

    // The file was left alone.
    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 99);
}

#[test]
fn partially_migrated_database_resumes_from_its_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.sqlite");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE Tasks (_id INTEGER PRIMARY KEY NOT NULL, Name TEXT NOT NULL,
                                 Description TEXT, SortOrder INTEGER);
             INSERT INTO Tasks (Name) VALUES ('legacy');
             PRAGMA user_version = 1;",
        )
        .unwrap();
        assert_eq!(pending_steps(schema_version(&conn).unwrap()).unwrap().len(), 4);
    }

    let store = TaskTimerStore::open(&path, StoreSettings::default()).unwrap();
    assert_eq!(store.schema_version(), LATEST_SCHEMA_VERSION);

    let tasks = store.list_tasks().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "legacy");
    assert_eq!(tasks[0].description, "");
    assert_eq!(tasks[0].sort_order, 0);
    assert!(pending_steps(LATEST_SCHEMA_VERSION).unwrap().is_empty());
}

#[test]
fn deleting_a_task_through_sql_cascades_to_timings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trigger.sqlite");
    let store = TaskTimerStore::open(&path, StoreSettings::default()).unwrap();
    let id = store.create_task(&TaskDraft::new("t")).unwrap();
    store.toggle_timing(id).unwrap();
    drop(store);

    let conn = Connection::open(&path).unwrap();
    conn.execute("DELETE FROM Tasks WHERE _id = ?1", [id.0])
        .unwrap();
    let left: i64 = conn
        .query_row("SELECT COUNT(*) FROM Timings", [], |r| r.get(0))
        .unwrap();
    assert_eq!(left, 0);
}
