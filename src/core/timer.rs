use crate::models::task::TaskId;
use crate::models::timing::{CurrentTiming, TimingId};
use serde::Serialize;

/// What the single timer slot is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    Idle,
    Timing {
        task_id: TaskId,
        timing_id: TimingId,
        start_time: i64,
    },
}

impl TimerState {
    pub fn is_idle(&self) -> bool {
        matches!(self, TimerState::Idle)
    }

    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            TimerState::Idle => None,
            TimerState::Timing { task_id, .. } => Some(*task_id),
        }
    }
}

impl From<Option<&CurrentTiming>> for TimerState {
    fn from(current: Option<&CurrentTiming>) -> Self {
        match current {
            None => TimerState::Idle,
            Some(c) => TimerState::Timing {
                task_id: c.task_id,
                timing_id: c.timing_id,
                start_time: c.start_time,
            },
        }
    }
}

/// The writes a toggle has to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Idle → Timing(task).
    Start { task_id: TaskId },
    /// Timing(A) toggled on A → Idle.
    Stop {
        timing_id: TimingId,
        duration: i64,
    },
    /// Timing(A) toggled on B → Timing(B).
    Switch {
        timing_id: TimingId,
        duration: i64,
        task_id: TaskId,
    },
}

impl Transition {
    /// Decide what toggling `task_id` at `now` does from `current`.
    ///
    /// Recorded durations are at least one second, since a zero duration
    /// would read back as an open timing.
    pub fn plan(current: &TimerState, task_id: TaskId, now: i64) -> Self {
        match *current {
            TimerState::Idle => Transition::Start { task_id },
            TimerState::Timing {
                task_id: running,
                timing_id,
                start_time,
            } => {
                let duration = (now - start_time).max(1);
                if running == task_id {
                    Transition::Stop {
                        timing_id,
                        duration,
                    }
                } else {
                    Transition::Switch {
                        timing_id,
                        duration,
                        task_id,
                    }
                }
            }
        }
    }
}
