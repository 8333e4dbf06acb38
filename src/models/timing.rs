use super::task::TaskId;
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimingId(pub i64);

impl fmt::Display for TimingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for TimingId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for TimingId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(TimingId)
    }
}

/// One recorded interval spent on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timing {
    pub id: TimingId,     // ⇔ Timings._id
    pub task_id: TaskId,  // ⇔ Timings.TaskId
    pub start_time: i64,  // ⇔ Timings.StartTime (epoch seconds, immutable)
    pub duration: i64,    // ⇔ Timings.Duration (seconds, 0 while open)
}

impl Timing {
    pub fn is_open(&self) -> bool {
        self.duration == 0
    }

    /// End of the interval, if the timing has been stopped.
    pub fn end_time(&self) -> Option<i64> {
        (!self.is_open()).then_some(self.start_time + self.duration)
    }
}

/// Row of the `vwCurrentTiming` view: the open timing and its task name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentTiming {
    pub timing_id: TimingId,
    pub task_id: TaskId,
    pub start_time: i64,
    pub task_name: String,
}

impl CurrentTiming {
    /// Seconds elapsed since the timing started, never negative.
    pub fn elapsed(&self, now: i64) -> i64 {
        (now - self.start_time).max(0)
    }
}
