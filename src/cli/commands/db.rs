use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::store::TaskTimerStore;
use crate::db::migrate::LATEST_SCHEMA_VERSION;
use crate::errors::AppResult;
use crate::ui::messages::error;
use crate::utils::colors::{CYAN, GREEN, RESET};
use crate::utils::formatting::{epoch2local, secs2readable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        // Opening the store applies any pending migration.
        let store = TaskTimerStore::from_config(cfg)?;

        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            store.record(
                "migrate",
                "database",
                &format!("schema at version {}", store.schema_version()),
            )?;
            println!(
                "{}✔ Schema is at version {} (latest {}).{}\n",
                GREEN,
                store.schema_version(),
                LATEST_SCHEMA_VERSION,
                RESET
            );
        }

        if *info {
            let s = store.stats()?;
            println!("🗄️  Database     : {}", &cfg.database);
            println!("🌍 Time zone    : {}", store.zone());
            println!("📐 Schema       : v{}", s.schema_version);
            println!("📋 Tasks        : {}", s.tasks);
            println!("⏱️  Timings      : {} ({} open)", s.timings, s.open_timings);
            println!("∑  Total time   : {}", secs2readable(s.total_seconds));
            if let (Some(first), Some(last)) = (s.first_start, s.last_start) {
                println!("📅 First / last : {} / {}", epoch2local(first), epoch2local(last));
            }
            println!();
        }

        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);
            let integrity = store.integrity_check()?;
            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                error(format!("Integrity check failed: {}", integrity));
            }
        }

        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            store.vacuum()?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
