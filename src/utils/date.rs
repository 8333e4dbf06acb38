//! Calendar helpers: time zone resolution, local days and epoch conversions.

use crate::errors::{AppError, AppResult};
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Weekday};
use chrono_tz::Tz;
use std::fmt;

/// Time zone used to turn epoch seconds into calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// Whatever the process considers local time.
    #[default]
    Local,
    /// An IANA zone such as `Europe/Rome`.
    Named(Tz),
}

impl Zone {
    /// `None`, empty or `"local"` select the system zone; anything else must
    /// be a valid IANA name.
    pub fn parse(name: Option<&str>) -> AppResult<Self> {
        match name.map(str::trim) {
            None | Some("") => Ok(Zone::Local),
            Some(n) if n.eq_ignore_ascii_case("local") => Ok(Zone::Local),
            Some(n) => n
                .parse::<Tz>()
                .map(Zone::Named)
                .map_err(|_| AppError::InvalidTimeZone(n.to_string())),
        }
    }

    /// Calendar day on which the instant `epoch` falls in this zone.
    pub fn local_date(&self, epoch: i64) -> Option<NaiveDate> {
        match self {
            Zone::Local => Local
                .timestamp_opt(epoch, 0)
                .single()
                .map(|dt| dt.date_naive()),
            Zone::Named(tz) => tz
                .timestamp_opt(epoch, 0)
                .single()
                .map(|dt| dt.date_naive()),
        }
    }

    /// First instant (epoch seconds) of `date` in this zone.
    pub fn start_of_day(&self, date: NaiveDate) -> i64 {
        let midnight = date.and_time(NaiveTime::MIN);
        match self {
            Zone::Local => first_instant(&Local, midnight),
            Zone::Named(tz) => first_instant(tz, midnight),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.local_date(chrono::Utc::now().timestamp())
            .unwrap_or_else(today)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Named(tz) => write!(f, "{}", tz.name()),
        }
    }
}

// A wall-clock time can fall into a DST gap; walk forward an hour at a time
// until it exists.
fn first_instant<T: TimeZone>(tz: &T, naive: NaiveDateTime) -> i64 {
    let mut probe = naive;
    for _ in 0..4 {
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt.timestamp();
        }
        probe += Duration::hours(1);
    }
    naive.and_utc().timestamp()
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Accepts full or abbreviated English weekday names, case-insensitive.
pub fn parse_weekday(s: &str) -> AppResult<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| AppError::Config(format!("invalid first day of week: {s}")))
}

/// Days to step back from `date` to reach the start of its week.
pub fn days_since_week_start(date: NaiveDate, first_day: Weekday) -> u32 {
    use chrono::Datelike;
    (date.weekday().num_days_from_monday() + 7 - first_day.num_days_from_monday()) % 7
}
