use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_tasks, setup_test_db, temp_out, tt};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    tt().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"))
        .stdout(contains("schema v5"));

    tt().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("v5"))
        .stdout(contains("Tasks        : 0"));
}

#[test]
fn test_add_and_list_tasks() {
    let db_path = setup_test_db("cli_add_list");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("Write"))
        .stdout(contains("Draft chapters"))
        .stdout(contains("Review"));
}

#[test]
fn test_add_rejects_blank_name() {
    let db_path = setup_test_db("cli_blank");
    tt().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    tt().args(["--db", &db_path, "add", "   "])
        .assert()
        .failure()
        .stderr(contains("must not be empty"));
}

#[test]
fn test_toggle_status_and_switch() {
    let db_path = setup_test_db("cli_toggle");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("idle"));

    tt().args(["--db", &db_path, "toggle", "1"])
        .assert()
        .success()
        .stdout(contains("Started timing #1 'Write'"));

    tt().args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("Write").and(contains("running for")));

    tt().args(["--db", &db_path, "toggle", "2"])
        .assert()
        .success()
        .stdout(contains("Stopped 'Write'"))
        .stdout(contains("'Review'"));

    tt().args(["--db", &db_path, "status", "--json"])
        .assert()
        .success()
        .stdout(contains("\"state\": \"timing\""))
        .stdout(contains("\"task_id\": 2"));

    tt().args(["--db", &db_path, "toggle", "2"])
        .assert()
        .success()
        .stdout(contains("Stopped 'Review'"));

    tt().args(["--db", &db_path, "timings", "1"])
        .assert()
        .success()
        .stdout(contains("Timings of 'Write'"))
        .stdout(contains("running").not());
}

#[test]
fn test_toggle_unknown_task_fails() {
    let db_path = setup_test_db("cli_toggle_unknown");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "toggle", "99"])
        .assert()
        .failure()
        .stderr(contains("task 99 does not exist"));
}

#[test]
fn test_edit_task() {
    let db_path = setup_test_db("cli_edit");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "edit", "2", "--name", "Proofread"])
        .assert()
        .success()
        .stdout(contains("Task #2 updated"));

    tt().args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("Proofread"))
        .stdout(contains("Review").not());
}

#[test]
fn test_delete_task_with_yes() {
    let db_path = setup_test_db("cli_del");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "toggle", "1"])
        .assert()
        .success();

    tt().args(["--db", &db_path, "del", "1", "--yes"])
        .assert()
        .success()
        .stdout(contains("Task #1 has been deleted"));

    tt().args(["--db", &db_path, "status"])
        .assert()
        .success()
        .stdout(contains("idle"));

    tt().args(["--db", &db_path, "list"])
        .assert()
        .success()
        .stdout(contains("Write").not());
}

#[test]
fn test_report_json_and_csv_outputs() {
    let db_path = setup_test_db("cli_report");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "toggle", "1"])
        .assert()
        .success();
    tt().args(["--db", &db_path, "toggle", "1"])
        .assert()
        .success();

    tt().args(["--db", &db_path, "report", "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"name\": \"Write\""))
        .stdout(contains("\"seconds\""));

    tt().args(["--db", &db_path, "report", "--format", "csv", "--date", "today"])
        .assert()
        .success()
        .stdout(contains("task_id,name,description,date,seconds,duration"))
        .stdout(contains("Write"));

    let out = temp_out("cli_report", "csv");
    tt().args([
        "--db", &db_path, "report", "--format", "csv", "--out", &out, "--force",
    ])
    .assert()
    .success()
    .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read csv");
    assert!(content.starts_with("task_id,name,description,date,seconds,duration"));
    assert!(content.contains("Write"));
}

#[test]
fn test_report_rejects_two_periods() {
    let db_path = setup_test_db("cli_report_periods");
    init_db_with_tasks(&db_path);

    tt().args([
        "--db",
        &db_path,
        "report",
        "--date",
        "2024-05-01",
        "--month",
        "2024-05-01",
    ])
    .assert()
    .failure()
    .stderr(contains("use only one of"));
}

#[test]
fn test_log_and_db_maintenance() {
    let db_path = setup_test_db("cli_log");
    init_db_with_tasks(&db_path);

    tt().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("add_task"));

    tt().args(["--db", &db_path, "db", "--check", "--vacuum", "--migrate"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"))
        .stdout(contains("Vacuum completed"))
        .stdout(contains("Schema is at version 5"));
}
