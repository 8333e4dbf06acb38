use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::{AppError, AppResult};
use crate::models::task::TaskId;
use crate::ui::messages::{header, info};
use crate::utils::formatting::{epoch2local, secs2readable};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Timings { id } = cmd {
        let store = TaskTimerStore::from_config(cfg)?;
        let id = TaskId(*id);
        let task = store
            .get_task(id)?
            .ok_or_else(|| AppError::Validation(format!("task {id} does not exist")))?;

        let timings = store.timings_for_task(id)?;
        if timings.is_empty() {
            info(format!("No timings recorded for '{}'.", task.name));
            return Ok(());
        }

        header(format!("Timings of '{}'", task.name));
        let mut table = Table::new(vec![
            Column::new("ID", 4),
            Column::new("Start", 19),
            Column::new("End", 19),
            Column::new("Duration", 11),
        ]);
        for t in timings {
            table.add_row(vec![
                t.id.to_string(),
                epoch2local(t.start_time),
                t.end_time().map(epoch2local).unwrap_or_else(|| "running".into()),
                if t.is_open() {
                    "-".into()
                } else {
                    secs2readable(t.duration)
                },
            ]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
