//! Report output: durations written as JSON or CSV files, or printed as a table.

mod fs_utils;
mod json_csv;
mod model;

pub use model::DurationExport;

use crate::errors::AppResult;
use crate::models::duration::DailyDuration;
use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Table,
    Csv,
    Json,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Table => "table",
            ReportFormat::Csv => "csv",
            ReportFormat::Json => "json",
        }
    }
}

/// Write `rows` to `path` in a file format. `Table` has no file form and
/// falls back to CSV.
pub fn export_durations(
    rows: &[DailyDuration],
    format: ReportFormat,
    path: &Path,
    force: bool,
) -> AppResult<()> {
    fs_utils::ensure_writable(path, force)?;

    let data: Vec<DurationExport> = rows.iter().map(DurationExport::from).collect();
    match format {
        ReportFormat::Json => json_csv::export_json(&data, path),
        ReportFormat::Csv | ReportFormat::Table => json_csv::export_csv(&data, path),
    }
}

/// JSON text for `rows`, for printing to stdout.
pub fn durations_to_json(rows: &[DailyDuration]) -> AppResult<String> {
    let data: Vec<DurationExport> = rows.iter().map(DurationExport::from).collect();
    json_csv::to_json_string(&data)
}

/// CSV text for `rows`, header included.
pub fn durations_to_csv(rows: &[DailyDuration]) -> AppResult<String> {
    let data: Vec<DurationExport> = rows.iter().map(DurationExport::from).collect();
    json_csv::to_csv_string(&data)
}
