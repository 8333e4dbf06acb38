use crate::cli::parser::Cli;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// Creates the config directory and file (skipped in test mode), then opens
/// the database, which brings the schema to the latest version.
pub fn handle(cli: &Cli) -> AppResult<()> {
    let cfg = Config::init_all(cli.db.clone(), cli.test)?;

    info("Initializing tasktimer…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let store = TaskTimerStore::from_config(&cfg)?;

    if let Err(e) = store.record(
        "init",
        "database",
        &format!("Database initialized at {}", &cfg.database),
    ) {
        warning(format!("Failed to write internal log: {}", e));
    }

    success(format!(
        "Database initialized at {} (schema v{})",
        &cfg.database,
        store.schema_version()
    ));
    Ok(())
}
