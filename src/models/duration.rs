use super::task::TaskId;
use crate::errors::{AppError, AppResult};
use crate::utils::date::{Zone, days_since_week_start};
use chrono::{Datelike, Months, NaiveDate, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Row of the `vwTaskDurations` view: total seconds spent on a task during
/// one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyDuration {
    pub task_id: TaskId,
    pub name: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub total: i64,
}

/// Columns a durations report can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Name,
    Description,
    StartDate,
    Duration,
}

impl SortColumn {
    pub(crate) fn order_by(&self) -> &'static str {
        match self {
            SortColumn::Name => "Name ASC, StartDate ASC, TaskId ASC",
            SortColumn::Description => "Description ASC, Name ASC, StartDate ASC, TaskId ASC",
            SortColumn::StartDate => "StartDate ASC, Name ASC, TaskId ASC",
            SortColumn::Duration => "Duration DESC, Name ASC, StartDate ASC, TaskId ASC",
        }
    }
}

/// Inclusive range of epoch seconds matched against `Timings.StartTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: i64,
    pub end: i64,
}

impl DateRange {
    pub fn new(start: i64, end: i64) -> AppResult<Self> {
        if end < start {
            return Err(AppError::Validation(format!(
                "date range ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self { start, end })
    }

    /// From the first instant of `from` to the last second of `to`.
    pub fn between_dates(from: NaiveDate, to: NaiveDate, zone: Zone) -> AppResult<Self> {
        let next = to
            .succ_opt()
            .ok_or_else(|| AppError::InvalidDate(to.to_string()))?;
        Self::new(zone.start_of_day(from), zone.start_of_day(next) - 1)
    }

    pub fn day(date: NaiveDate, zone: Zone) -> AppResult<Self> {
        Self::between_dates(date, date, zone)
    }

    /// The seven local days containing `date`, starting on `first_day`.
    pub fn week(date: NaiveDate, first_day: Weekday, zone: Zone) -> AppResult<Self> {
        let back = days_since_week_start(date, first_day);
        let first = date
            .checked_sub_days(chrono::Days::new(u64::from(back)))
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let last = first
            .checked_add_days(chrono::Days::new(6))
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        Self::between_dates(first, last, zone)
    }

    pub fn month(date: NaiveDate, zone: Zone) -> AppResult<Self> {
        let first = date
            .with_day(1)
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
        Self::between_dates(first, last, zone)
    }

    pub fn contains(&self, epoch: i64) -> bool {
        (self.start..=self.end).contains(&epoch)
    }
}

/// Narrowing and ordering options for a durations report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationFilter {
    pub task_id: Option<TaskId>,
    pub range: Option<DateRange>,
    /// Timings shorter than this many seconds are left out of the sums.
    pub ignore_less_than: i64,
    pub sort: SortColumn,
}

impl DurationFilter {
    pub fn for_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    pub fn within(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn ignoring_less_than(mut self, seconds: i64) -> Self {
        self.ignore_less_than = seconds.max(0);
        self
    }

    pub fn sorted_by(mut self, sort: SortColumn) -> Self {
        self.sort = sort;
        self
    }
}
