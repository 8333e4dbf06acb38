pub mod duration;
pub mod task;
pub mod timing;

pub use duration::{DailyDuration, DateRange, DurationFilter, SortColumn};
pub use task::{Task, TaskDraft, TaskId};
pub use timing::{CurrentTiming, Timing, TimingId};
