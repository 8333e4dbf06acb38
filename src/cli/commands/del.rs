use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::AppResult;
use crate::models::task::TaskId;
use crate::ui::messages::{info, success, warning};

use std::io::{self, Write};

/// Ask a yes/no confirmation from the user
fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Del { id, yes } = cmd {
        let store = TaskTimerStore::from_config(cfg)?;
        let id = TaskId(*id);

        let Some(task) = store.get_task(id)? else {
            warning(format!("Task #{} not found.", id));
            return Ok(());
        };

        let prompt = format!(
            "Delete task #{} '{}' and all of its timings? This action is irreversible.",
            id, task.name
        );
        if !*yes && !ask_confirmation(&prompt) {
            info("Operation cancelled.");
            return Ok(());
        }

        if store.delete_task(id)? > 0 {
            success(format!("Task #{} has been deleted.", id));
        } else {
            warning(format!("Task #{} not found.", id));
        }
    }

    Ok(())
}
