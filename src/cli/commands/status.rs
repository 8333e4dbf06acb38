use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::utils::formatting::{bold, epoch2local, secs2clock};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { json } = cmd {
        let store = TaskTimerStore::from_config(cfg)?;

        if *json {
            let state = store.timer_state()?;
            let text = serde_json::to_string_pretty(&state)
                .map_err(|e| AppError::Export(e.to_string()))?;
            println!("{}", text);
            return Ok(());
        }

        match store.current_timing()? {
            None => info("Timer is idle."),
            Some(current) => {
                println!(
                    "⏱️  {} (task #{}) running for {}, since {}",
                    bold(&current.task_name),
                    current.task_id,
                    secs2clock(current.elapsed(store.now())),
                    epoch2local(current.start_time)
                );
            }
        }
    }

    Ok(())
}
