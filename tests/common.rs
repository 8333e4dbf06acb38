#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tasktimer::core::clock::ManualClock;
use tasktimer::models::task::{TaskDraft, TaskId};
use tasktimer::utils::date::Zone;
use tasktimer::{StoreSettings, TaskTimerStore};
use tempfile::TempDir;

/// The CLI, isolated from the user's real configuration directory.
pub fn tt() -> Command {
    let mut cmd = cargo_bin_cmd!("tasktimer");
    cmd.env("TASKTIMER_HOME", test_home()).env_remove("TASKTIMER_LOG");
    cmd
}

fn test_home() -> PathBuf {
    let mut path: PathBuf = env::temp_dir();
    path.push("tasktimer_test_home");
    path
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_tasktimer.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    fs::remove_file(format!("{db_path}-wal")).ok();
    fs::remove_file(format!("{db_path}-shm")).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a DB through the CLI and add two tasks (ids 1 and 2).
pub fn init_db_with_tasks(db_path: &str) {
    tt().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    tt().args(["--db", db_path, "add", "Write", "--desc", "Draft chapters"])
        .assert()
        .success();

    tt().args(["--db", db_path, "add", "Review", "--sort", "1"])
        .assert()
        .success();
}

/// A file-backed store in a fresh temp dir, driven by a manual clock.
pub struct TestStore {
    pub store: TaskTimerStore,
    pub clock: Arc<ManualClock>,
    pub dir: TempDir,
}

pub fn file_store(zone: Zone) -> TestStore {
    let dir = tempfile::tempdir().expect("tempdir");
    let clock = Arc::new(ManualClock::new(1_000));
    let store = TaskTimerStore::open(
        dir.path().join("tasktimer.sqlite"),
        StoreSettings::default().with_zone(zone),
    )
    .expect("open store")
    .with_clock(clock.clone());
    TestStore { store, clock, dir }
}

pub fn memory_store() -> (TaskTimerStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_000));
    let store = TaskTimerStore::open_in_memory(StoreSettings::default())
        .expect("open store")
        .with_clock(clock.clone());
    (store, clock)
}

pub fn add_task(store: &TaskTimerStore, name: &str) -> TaskId {
    store.create_task(&TaskDraft::new(name)).expect("create task")
}

/// Record a closed timing of `secs` seconds for `task` starting at `start`.
pub fn record(store: &TaskTimerStore, clock: &ManualClock, task: TaskId, start: i64, secs: i64) {
    clock.set(start);
    store.toggle_timing(task).expect("start");
    clock.set(start + secs);
    store.toggle_timing(task).expect("stop");
}
