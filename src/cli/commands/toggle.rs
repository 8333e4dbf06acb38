use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::core::timer::TimerState;
use crate::errors::AppResult;
use crate::models::task::TaskId;
use crate::ui::messages::{info, success};
use crate::utils::formatting::secs2readable;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Toggle { id } = cmd {
        let store = TaskTimerStore::from_config(cfg)?;
        let before = store.current_timing()?;

        match store.toggle_timing(TaskId(*id))? {
            TimerState::Idle => {
                if let Some(prev) = before {
                    success(format!(
                        "Stopped '{}' after {}.",
                        prev.task_name,
                        secs2readable(prev.elapsed(store.now()).max(1))
                    ));
                }
            }
            TimerState::Timing { task_id, .. } => {
                if let Some(prev) = before {
                    info(format!("Stopped '{}'.", prev.task_name));
                }
                let name = store
                    .get_task(task_id)?
                    .map(|t| t.name)
                    .unwrap_or_default();
                success(format!("Started timing #{} '{}'.", task_id, name));
            }
        }
    }

    Ok(())
}
