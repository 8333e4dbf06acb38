//! tasktimer main entrypoint.

use tasktimer::run;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TASKTIMER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run() {
        tasktimer::ui::messages::error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
