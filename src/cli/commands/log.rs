use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::AppResult;
use crate::ui::messages::{header, info};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print: true, limit } = cmd {
        let store = TaskTimerStore::from_config(cfg)?;
        let rows = store.read_log(*limit)?;

        if rows.is_empty() {
            info("Internal log is empty.");
            return Ok(());
        }

        header("Internal log");
        let mut table = Table::new(vec![
            Column::new("ID", 4),
            Column::new("Date", 25),
            Column::new("Operation", 12),
            Column::new("Target", 8),
            Column::new("Message", 20),
        ]);
        for r in rows {
            table.add_row(vec![r.id.to_string(), r.date, r.operation, r.target, r.message]);
        }
        print!("{}", table.render());
    }

    Ok(())
}
