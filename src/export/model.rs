use crate::models::duration::DailyDuration;
use crate::utils::formatting::secs2readable;
use serde::Serialize;

/// Flat row used by the CSV and JSON reports.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DurationExport {
    pub task_id: i64,
    pub name: String,
    pub description: String,
    pub date: String,
    pub seconds: i64,
    pub duration: String,
}

impl From<&DailyDuration> for DurationExport {
    fn from(d: &DailyDuration) -> Self {
        Self {
            task_id: d.task_id.0,
            name: d.name.clone(),
            description: d.description.clone(),
            date: d.start_date.format("%Y-%m-%d").to_string(),
            seconds: d.total,
            duration: secs2readable(d.total),
        }
    }
}
