use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::{AppError, AppResult};
use crate::models::task::{TaskDraft, TaskId};
use crate::ui::messages::{info, success};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Edit {
        id,
        name,
        desc,
        sort,
    } = cmd
    {
        if name.is_none() && desc.is_none() && sort.is_none() {
            info("Nothing to change: pass --name, --desc or --sort.");
            return Ok(());
        }

        let store = TaskTimerStore::from_config(cfg)?;
        let id = TaskId(*id);
        let task = store
            .get_task(id)?
            .ok_or_else(|| AppError::Validation(format!("task {id} does not exist")))?;

        let mut draft = TaskDraft::from(&task);
        if let Some(n) = name {
            draft.name = n.clone();
        }
        if let Some(d) = desc {
            draft.description = d.clone();
        }
        if let Some(s) = sort {
            draft.sort_order = *s;
        }

        store.update_task(id, &draft)?;
        success(format!("Task #{} updated.", id));
    }

    Ok(())
}
