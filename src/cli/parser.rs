use crate::export::ReportFormat;
use crate::models::duration::SortColumn;
use clap::{Parser, Subcommand};

/// Command-line interface definition for tasktimer
#[derive(Parser)]
#[command(
    name = "tasktimer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Track the time spent on tasks: one running timer, daily totals, SQLite storage",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "limit", default_value_t = 50, help = "Number of rows to show")]
        limit: i64,
    },

    /// Create a new task
    Add {
        /// Task name
        name: String,

        #[arg(long = "desc", help = "Free-text description")]
        desc: Option<String>,

        #[arg(long = "sort", help = "Position of the task in listings")]
        sort: Option<i64>,
    },

    /// Change name, description or sort order of a task
    Edit {
        /// Task id
        id: i64,

        #[arg(long = "name", help = "New name")]
        name: Option<String>,

        #[arg(long = "desc", help = "New description")]
        desc: Option<String>,

        #[arg(long = "sort", help = "New sort order")]
        sort: Option<i64>,
    },

    /// Delete a task together with all of its timings
    Del {
        /// Task id
        id: i64,

        #[arg(long = "yes", short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// List tasks
    List,

    /// Start, stop or switch the timer for a task
    Toggle {
        /// Task id
        id: i64,
    },

    /// Show what is being timed right now
    Status {
        #[arg(long = "json", help = "Print the timer state as JSON")]
        json: bool,
    },

    /// List the timings recorded for a task
    Timings {
        /// Task id
        id: i64,
    },

    /// Daily totals per task
    Report {
        #[arg(long = "task", help = "Only this task id")]
        task: Option<i64>,

        #[arg(long = "date", help = "Single day (YYYY-MM-DD)")]
        date: Option<String>,

        #[arg(long = "week", help = "Week containing this day (YYYY-MM-DD or 'current')")]
        week: Option<String>,

        #[arg(long = "month", help = "Month containing this day (YYYY-MM-DD or 'current')")]
        month: Option<String>,

        #[arg(long = "from", requires = "to", help = "First day of a custom range")]
        from: Option<String>,

        #[arg(long = "to", requires = "from", help = "Last day of a custom range")]
        to: Option<String>,

        #[arg(long = "sort", value_enum, default_value_t = SortColumn::Name)]
        sort: SortColumn,

        #[arg(
            long = "ignore-less-than",
            help = "Skip timings shorter than this many seconds (default from config)"
        )]
        ignore_less_than: Option<i64>,

        #[arg(long = "format", value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,

        #[arg(long = "out", help = "Write the report to this file instead of stdout")]
        out: Option<String>,

        #[arg(long = "force", help = "Overwrite the output file without asking")]
        force: bool,
    },
}
