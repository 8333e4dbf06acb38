use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::colors::{colorize_optional, colorize_running};
use crate::utils::table::{Column, Table};

pub fn handle(cfg: &Config) -> AppResult<()> {
    let store = TaskTimerStore::from_config(cfg)?;
    let tasks = store.list_tasks()?;

    if tasks.is_empty() {
        info("No tasks yet. Create one with `tasktimer add <NAME>`.");
        return Ok(());
    }

    let running = store.timer_state()?.task_id();

    header("Tasks");
    let mut table = Table::new(vec![
        Column::new("ID", 4),
        Column::new("Name", 16),
        Column::new("Description", 20),
        Column::new("Sort", 4),
        Column::new("", 1),
    ]);
    for t in tasks {
        let is_running = running == Some(t.id);
        table.add_row(vec![
            t.id.to_string(),
            colorize_running(&t.name, is_running),
            colorize_optional(&t.description),
            t.sort_order.to_string(),
            if is_running { "⏱".into() } else { String::new() },
        ]);
    }
    print!("{}", table.render());

    Ok(())
}
