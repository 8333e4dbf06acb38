use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::AppResult;
use crate::models::task::TaskDraft;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add { name, desc, sort } = cmd {
        let draft = TaskDraft::new(name.as_str())
            .with_description(desc.clone().unwrap_or_default())
            .with_sort_order(sort.unwrap_or(0));

        let store = TaskTimerStore::from_config(cfg)?;
        let id = store.create_task(&draft)?;

        success(format!("Task #{} '{}' created.", id, draft.trimmed_name()));
    }

    Ok(())
}
