pub mod log;
pub mod migrate;
pub mod pool;
pub mod stats;
pub mod tasks;
pub mod timings;

pub use migrate::{LATEST_SCHEMA_VERSION, ensure_schema};
pub use pool::DbPool;
pub use tasks::TaskRepository;
pub use timings::TimingRepository;
