//! Versioned schema migrations.
//!
//! The schema version lives in `PRAGMA user_version`. Each step runs in its
//! own transaction together with the version bump, so an interrupted upgrade
//! resumes from the last completed step.

use crate::db::log::ttlog;
use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use tracing::{debug, info};

/// One schema step. Steps are applied in strictly increasing `version` order.
#[derive(Debug)]
pub struct MigrationStep {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

const CREATE_TASKS: &str = r#"
    CREATE TABLE IF NOT EXISTS Tasks (
        _id         INTEGER PRIMARY KEY NOT NULL,
        Name        TEXT NOT NULL,
        Description TEXT,
        SortOrder   INTEGER
    );
"#;

const CREATE_TIMINGS: &str = r#"
    CREATE TABLE IF NOT EXISTS Timings (
        _id       INTEGER PRIMARY KEY NOT NULL,
        TaskId    INTEGER NOT NULL,
        StartTime INTEGER,
        Duration  INTEGER
    );

    CREATE INDEX IF NOT EXISTS idx_timings_task ON Timings(TaskId);
    CREATE INDEX IF NOT EXISTS idx_timings_open ON Timings(StartTime) WHERE Duration = 0;

    CREATE TRIGGER IF NOT EXISTS remove_task_timings
    AFTER DELETE ON Tasks
    FOR EACH ROW
    BEGIN
        DELETE FROM Timings WHERE TaskId = OLD._id;
    END;
"#;

const CREATE_CURRENT_TIMING_VIEW: &str = r#"
    CREATE VIEW IF NOT EXISTS vwCurrentTiming AS
    SELECT Timings._id       AS TimingId,
           Timings.TaskId    AS TaskId,
           Timings.StartTime AS StartTime,
           Tasks.Name        AS Name
    FROM Timings
    JOIN Tasks ON Timings.TaskId = Tasks._id
    WHERE Timings.Duration = 0
    ORDER BY Timings.StartTime DESC;
"#;

// `tt_local_date` is registered on every connection by the pool.
const CREATE_DURATIONS_VIEW: &str = r#"
    CREATE VIEW IF NOT EXISTS vwTaskDurations AS
    SELECT Tasks._id                         AS TaskId,
           Tasks.Name                        AS Name,
           Tasks.Description                 AS Description,
           Timings.StartTime                 AS StartTime,
           tt_local_date(Timings.StartTime)  AS StartDate,
           SUM(Timings.Duration)             AS Duration
    FROM Tasks
    INNER JOIN Timings ON Tasks._id = Timings.TaskId
    GROUP BY Tasks._id, StartDate;
"#;

const CREATE_LOG: &str = r#"
    CREATE TABLE IF NOT EXISTS log (
        id        INTEGER PRIMARY KEY AUTOINCREMENT,
        date      TEXT NOT NULL,
        operation TEXT NOT NULL,
        target    TEXT DEFAULT '',
        message   TEXT NOT NULL
    );
"#;

pub const STEPS: &[MigrationStep] = &[
    MigrationStep {
        version: 1,
        name: "create_tasks",
        sql: CREATE_TASKS,
    },
    MigrationStep {
        version: 2,
        name: "create_timings",
        sql: CREATE_TIMINGS,
    },
    MigrationStep {
        version: 3,
        name: "create_current_timing_view",
        sql: CREATE_CURRENT_TIMING_VIEW,
    },
    MigrationStep {
        version: 4,
        name: "create_durations_view",
        sql: CREATE_DURATIONS_VIEW,
    },
    MigrationStep {
        version: 5,
        name: "create_log",
        sql: CREATE_LOG,
    },
];

pub const LATEST_SCHEMA_VERSION: u32 = 5;

/// Version at which the internal `log` table becomes available.
const LOG_TABLE_VERSION: u32 = 5;

/// Read the schema version stored in the database header.
pub fn schema_version(conn: &Connection) -> AppResult<u32> {
    let raw: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    u32::try_from(raw).map_err(|_| AppError::Schema(format!("invalid schema version {raw}")))
}

/// Steps needed to go from `current` to the latest version.
///
/// Fails when `current` is newer than anything this build knows about.
pub fn pending_steps(current: u32) -> AppResult<Vec<&'static MigrationStep>> {
    if current > LATEST_SCHEMA_VERSION {
        return Err(AppError::Schema(format!(
            "database schema version {current} is newer than the latest supported version {LATEST_SCHEMA_VERSION}"
        )));
    }
    Ok(STEPS.iter().filter(|s| s.version > current).collect())
}

/// Bring the schema up to date and return the resulting version.
pub fn ensure_schema(conn: &Connection) -> AppResult<u32> {
    let current = schema_version(conn)?;
    let steps = pending_steps(current)?;

    if steps.is_empty() {
        debug!(version = current, "schema up to date");
        return Ok(current);
    }

    for step in &steps {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(step.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {}", step.version))?;
        tx.commit()?;
        info!(version = step.version, step = step.name, "schema step applied");
    }

    let target = schema_version(conn)?;

    // Steps older than the log table are recorded once it exists.
    if target >= LOG_TABLE_VERSION {
        let tx = conn.unchecked_transaction()?;
        for step in &steps {
            ttlog(
                &tx,
                "migration_applied",
                step.name,
                &format!("schema upgraded to version {}", step.version),
            )?;
        }
        tx.commit()?;
    }

    Ok(target)
}
