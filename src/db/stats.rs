use crate::db::migrate::schema_version;
use crate::db::tasks::TaskRepository;
use crate::db::timings::TimingRepository;
use crate::errors::AppResult;
use rusqlite::Connection;
use serde::Serialize;

/// Summary figures shown by `tasktimer db --info`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DbStats {
    pub schema_version: u32,
    pub tasks: i64,
    pub timings: i64,
    pub open_timings: i64,
    pub first_start: Option<i64>,
    pub last_start: Option<i64>,
    pub total_seconds: i64,
}

pub fn collect(conn: &Connection) -> AppResult<DbStats> {
    let (first_start, last_start, total_seconds): (Option<i64>, Option<i64>, Option<i64>) = conn
        .query_row(
            "SELECT MIN(StartTime), MAX(StartTime), SUM(Duration) FROM Timings",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

    Ok(DbStats {
        schema_version: schema_version(conn)?,
        tasks: TaskRepository::count(conn)?,
        timings: TimingRepository::count(conn)?,
        open_timings: TimingRepository::count_open(conn)?,
        first_start,
        last_start,
        total_seconds: total_seconds.unwrap_or(0),
    })
}

/// Result of `PRAGMA integrity_check`; `"ok"` when the file is sound.
pub fn integrity_check(conn: &Connection) -> AppResult<String> {
    Ok(conn.query_row("PRAGMA integrity_check;", [], |row| row.get(0))?)
}
