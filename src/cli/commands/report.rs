use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::{AppError, AppResult};
use crate::export::{self, ReportFormat};
use crate::models::duration::{DateRange, DurationFilter};
use crate::models::task::TaskId;
use crate::ui::messages::{header, info};
use crate::utils::date::{Zone, parse_date};
use crate::utils::formatting::secs2readable;
use crate::utils::path::expand_tilde;
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Report {
        task,
        date,
        week,
        month,
        from,
        to,
        sort,
        ignore_less_than,
        format,
        out,
        force,
    } = cmd
    {
        let store = TaskTimerStore::from_config(cfg)?;
        let zone = store.zone();

        let period = Period::from_args(date, week, month, from, to, zone)?;

        let mut filter = DurationFilter::default()
            .sorted_by(*sort)
            .ignoring_less_than(ignore_less_than.unwrap_or(cfg.ignore_less_than));
        if let Some(id) = task {
            filter = filter.for_task(TaskId(*id));
        }
        if let Some(p) = &period {
            filter = filter.within(p.range(zone, cfg)?);
        }

        let rows = store.daily_durations(&filter)?;

        if let Some(path) = out {
            return export::export_durations(&rows, *format, &expand_tilde(path), *force);
        }

        match format {
            ReportFormat::Json => println!("{}", export::durations_to_json(&rows)?),
            ReportFormat::Csv => print!("{}", export::durations_to_csv(&rows)?),
            ReportFormat::Table => {
                if rows.is_empty() {
                    info("No timings in the selected period.");
                    return Ok(());
                }

                header("Daily durations");
                let mut table = Table::new(vec![
                    Column::new("Date", 10),
                    Column::new("ID", 4),
                    Column::new("Task", 16),
                    Column::new("Description", 16),
                    Column::new("Duration", 11),
                ]);
                let mut total = 0;
                for r in &rows {
                    total += r.total;
                    table.add_row(vec![
                        r.start_date.to_string(),
                        r.task_id.to_string(),
                        r.name.clone(),
                        r.description.clone(),
                        secs2readable(r.total),
                    ]);
                }
                print!("{}", table.render());
                println!("\nTotal: {}", secs2readable(total));
            }
        }
    }

    Ok(())
}

/// Period selected on the command line; at most one may be given.
enum Period {
    Day(NaiveDate),
    Week(NaiveDate),
    Month(NaiveDate),
    Between(NaiveDate, NaiveDate),
}

impl Period {
    fn from_args(
        date: &Option<String>,
        week: &Option<String>,
        month: &Option<String>,
        from: &Option<String>,
        to: &Option<String>,
        zone: Zone,
    ) -> AppResult<Option<Self>> {
        let given = [date.is_some(), week.is_some(), month.is_some(), from.is_some()]
            .iter()
            .filter(|g| **g)
            .count();
        if given > 1 {
            return Err(AppError::Validation(
                "use only one of --date, --week, --month or --from/--to".to_string(),
            ));
        }

        let period = match (date, week, month, from, to) {
            (Some(d), ..) => Some(Period::Day(day_arg(d, zone)?)),
            (_, Some(w), ..) => Some(Period::Week(day_arg(w, zone)?)),
            (_, _, Some(m), ..) => Some(Period::Month(day_arg(m, zone)?)),
            (_, _, _, Some(f), Some(t)) => Some(Period::Between(day_arg(f, zone)?, day_arg(t, zone)?)),
            _ => None,
        };
        Ok(period)
    }

    fn range(&self, zone: Zone, cfg: &Config) -> AppResult<DateRange> {
        match *self {
            Period::Day(d) => DateRange::day(d, zone),
            Period::Week(d) => DateRange::week(d, cfg.first_day()?, zone),
            Period::Month(d) => DateRange::month(d, zone),
            Period::Between(f, t) => DateRange::between_dates(f, t, zone),
        }
    }
}

/// `YYYY-MM-DD`, or `today`/`current` for the current local day.
fn day_arg(s: &str, zone: Zone) -> AppResult<NaiveDate> {
    match s.trim() {
        "today" | "current" => Ok(zone.today()),
        other => parse_date(other).ok_or_else(|| AppError::InvalidDate(other.to_string())),
    }
}
