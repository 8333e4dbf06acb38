use crate::errors::{AppError, AppResult};
use crate::models::duration::{DailyDuration, DurationFilter};
use crate::models::task::TaskId;
use crate::models::timing::{CurrentTiming, Timing, TimingId};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};

const SELECT_TIMING: &str = "SELECT _id, TaskId, StartTime, Duration FROM Timings";

fn map_timing(row: &Row) -> rusqlite::Result<Timing> {
    Ok(Timing {
        id: row.get("_id")?,
        task_id: row.get("TaskId")?,
        start_time: row.get::<_, Option<i64>>("StartTime")?.unwrap_or(0),
        duration: row.get::<_, Option<i64>>("Duration")?.unwrap_or(0),
    })
}

fn map_current(row: &Row) -> rusqlite::Result<CurrentTiming> {
    Ok(CurrentTiming {
        timing_id: row.get("TimingId")?,
        task_id: row.get("TaskId")?,
        start_time: row.get("StartTime")?,
        task_name: row.get("Name")?,
    })
}

fn map_daily(row: &Row) -> rusqlite::Result<DailyDuration> {
    let date_str: Option<String> = row.get("StartDate")?;
    let start_date = date_str
        .as_deref()
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidDate(date_str.clone().unwrap_or_default())),
            )
        })?;

    Ok(DailyDuration {
        task_id: row.get("TaskId")?,
        name: row.get("Name")?,
        description: row
            .get::<_, Option<String>>("Description")?
            .unwrap_or_default(),
        start_date,
        total: row.get::<_, Option<i64>>("Duration")?.unwrap_or(0),
    })
}

/// CRUD over the `Timings` table plus the two derived views.
///
/// Nothing here enforces the single-open-timing rule; the store facade does.
pub struct TimingRepository;

impl TimingRepository {
    /// Insert an open timing (duration 0) for `task_id` starting at `now`.
    pub fn start(conn: &Connection, task_id: TaskId, now: i64) -> AppResult<TimingId> {
        let mut stmt = conn.prepare_cached(
            "INSERT INTO Timings (TaskId, StartTime, Duration) VALUES (?1, ?2, 0)",
        )?;
        stmt.execute(params![task_id, now])?;
        Ok(TimingId(conn.last_insert_rowid()))
    }

    /// Close an open timing. Unknown or already closed timings are left
    /// alone and 0 is returned.
    pub fn stop(conn: &Connection, id: TimingId, duration: i64) -> AppResult<usize> {
        if duration <= 0 {
            return Err(AppError::Validation(format!(
                "duration of timing {id} must be positive, got {duration}"
            )));
        }
        let mut stmt = conn.prepare_cached(
            "UPDATE Timings SET Duration = ?1 WHERE _id = ?2 AND Duration = 0",
        )?;
        Ok(stmt.execute(params![duration, id])?)
    }

    /// The open timing with its task name. Should there ever be more than
    /// one, the most recently started wins.
    pub fn open_timing(conn: &Connection) -> AppResult<Option<CurrentTiming>> {
        let mut stmt = conn.prepare_cached(
            "SELECT TimingId, TaskId, StartTime, Name FROM vwCurrentTiming
             ORDER BY StartTime DESC, TimingId DESC LIMIT 1",
        )?;
        Ok(stmt.query_row([], map_current).optional()?)
    }

    pub fn count_open(conn: &Connection) -> AppResult<i64> {
        Ok(conn.query_row(
            "SELECT COUNT(*) FROM Timings WHERE Duration = 0",
            [],
            |row| row.get(0),
        )?)
    }

    pub fn get(conn: &Connection, id: TimingId) -> AppResult<Option<Timing>> {
        let sql = format!("{SELECT_TIMING} WHERE _id = ?1");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([id], map_timing).optional()?)
    }

    pub fn list_for_task(conn: &Connection, task_id: TaskId) -> AppResult<Vec<Timing>> {
        let sql = format!("{SELECT_TIMING} WHERE TaskId = ?1 ORDER BY StartTime ASC, _id ASC");
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([task_id], map_timing)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Per task and local day totals.
    ///
    /// Without a time range or a minimum duration the `vwTaskDurations` view
    /// answers directly. Otherwise the same aggregation runs over the base
    /// tables so the filters apply to single timings before summing.
    pub fn daily_durations(
        conn: &Connection,
        filter: &DurationFilter,
    ) -> AppResult<Vec<DailyDuration>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<i64> = Vec::new();

        let mut sql = if filter.range.is_none() && filter.ignore_less_than <= 0 {
            if let Some(task_id) = filter.task_id {
                conditions.push("TaskId = ?");
                values.push(task_id.0);
            }
            String::from(
                "SELECT TaskId, Name, Description, StartDate, Duration FROM vwTaskDurations",
            )
        } else {
            if let Some(task_id) = filter.task_id {
                conditions.push("Tasks._id = ?");
                values.push(task_id.0);
            }
            if let Some(range) = filter.range {
                conditions.push("Timings.StartTime BETWEEN ? AND ?");
                values.push(range.start);
                values.push(range.end);
            }
            if filter.ignore_less_than > 0 {
                // Open timings are kept: their zero duration adds nothing.
                conditions.push("(Timings.Duration = 0 OR Timings.Duration >= ?)");
                values.push(filter.ignore_less_than);
            }
            String::from(
                "SELECT Tasks._id AS TaskId,
                        Tasks.Name AS Name,
                        Tasks.Description AS Description,
                        tt_local_date(Timings.StartTime) AS StartDate,
                        SUM(Timings.Duration) AS Duration
                 FROM Tasks
                 INNER JOIN Timings ON Tasks._id = Timings.TaskId",
            )
        };

        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }
        if filter.range.is_some() || filter.ignore_less_than > 0 {
            sql.push_str(" GROUP BY Tasks._id, StartDate");
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(filter.sort.order_by());

        let mut stmt = conn.prepare_cached(&sql)?;
        let params_refs: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        let rows = stmt.query_map(params_refs.as_slice(), map_daily)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn count(conn: &Connection) -> AppResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM Timings", [], |row| row.get(0))?)
    }
}
