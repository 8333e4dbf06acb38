//! Formatting utilities used for CLI and export outputs.

use chrono::{DateTime, Local};

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// `3725` → `01h 02m 05s`. Negative inputs are shown as zero.
pub fn secs2readable(secs: i64) -> String {
    let s = secs.max(0);
    let hours = s / 3600;
    let minutes = (s % 3600) / 60;
    let seconds = s % 60;
    format!("{:02}h {:02}m {:02}s", hours, minutes, seconds)
}

/// `HH:MM:SS` clock form used by the live status line.
pub fn secs2clock(secs: i64) -> String {
    let s = secs.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// Local wall-clock rendering of an epoch timestamp.
pub fn epoch2local(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| epoch.to_string())
}
