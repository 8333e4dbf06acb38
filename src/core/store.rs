//! The task timer store: the single entry point UI layers talk to.

use crate::config::Config;
use crate::core::clock::{Clock, SystemClock};
use crate::core::notifier::{ChangeEvent, ChangeListener, ChangeNotifier, Scope, Subscription};
use crate::core::timer::{TimerState, Transition};
use crate::db::log::{LogEntry, read_log, ttlog};
use crate::db::migrate::ensure_schema;
use crate::db::pool::DbPool;
use crate::db::stats::{self, DbStats};
use crate::db::tasks::TaskRepository;
use crate::db::timings::TimingRepository;
use crate::errors::{AppError, AppResult};
use crate::models::duration::{DailyDuration, DurationFilter};
use crate::models::task::{Task, TaskDraft, TaskId};
use crate::models::timing::{CurrentTiming, Timing, TimingId};
use crate::utils::date::Zone;
use crate::utils::path::expand_tilde;
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Startup options of a store.
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreSettings {
    pub zone: Zone,
    /// Events a subscriber may fall behind before it gets a resync.
    pub notify_capacity: Option<usize>,
}

impl StoreSettings {
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Ok(Self {
            zone: cfg.zone()?,
            notify_capacity: None,
        })
    }

    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }
}

/// Embedded store for tasks and timings.
///
/// All mutations are serialized through the writer connection and each one
/// is a single transaction. Reads run on snapshot connections and may
/// overlap with writes. The store is `Send + Sync`; share it with `Arc`.
pub struct TaskTimerStore {
    pool: DbPool,
    notifier: ChangeNotifier,
    clock: Arc<dyn Clock>,
    schema_version: u32,
}

impl TaskTimerStore {
    /// Open (or create) the database file and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>, settings: StoreSettings) -> AppResult<Self> {
        let pool = DbPool::open(path.as_ref(), settings.zone)?;
        Self::from_pool(pool, settings)
    }

    pub fn open_in_memory(settings: StoreSettings) -> AppResult<Self> {
        let pool = DbPool::open_in_memory(settings.zone)?;
        Self::from_pool(pool, settings)
    }

    /// Open the database named by the configuration.
    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        let settings = StoreSettings::from_config(cfg)?;
        Self::open(expand_tilde(&cfg.database), settings)
    }

    fn from_pool(pool: DbPool, settings: StoreSettings) -> AppResult<Self> {
        let schema_version = pool.with_write(|conn| ensure_schema(conn))?;

        let notifier = match settings.notify_capacity {
            Some(cap) => ChangeNotifier::with_capacity(cap),
            None => ChangeNotifier::new(),
        };

        let store = Self {
            pool,
            notifier,
            clock: Arc::new(SystemClock),
            schema_version,
        };

        match store.timer_state()? {
            TimerState::Idle => info!(schema_version, "store opened, timer idle"),
            TimerState::Timing {
                task_id,
                timing_id,
                start_time,
            } => info!(
                schema_version,
                %task_id, %timing_id, start_time, "store opened, resuming open timing"
            ),
        }

        Ok(store)
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn zone(&self) -> Zone {
        self.pool.zone()
    }

    pub fn path(&self) -> Option<&Path> {
        self.pool.path()
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    // ---------------------------
    // Tasks
    // ---------------------------

    pub fn list_tasks(&self) -> AppResult<Vec<Task>> {
        self.pool.with_read(TaskRepository::list)
    }

    pub fn get_task(&self, id: TaskId) -> AppResult<Option<Task>> {
        self.pool.with_read(|conn| TaskRepository::get(conn, id))
    }

    pub fn create_task(&self, draft: &TaskDraft) -> AppResult<TaskId> {
        let id = self.write(|conn| {
            let id = TaskRepository::create(conn, draft)?;
            ttlog(
                conn,
                "add_task",
                &id.to_string(),
                &format!("created task '{}'", draft.trimmed_name()),
            )?;
            Ok(id)
        })?;

        debug!(%id, "task created");
        self.notifier
            .publish(ChangeEvent::new(Scope::Tasks, Some(id.0)));
        Ok(id)
    }

    /// Returns the rows affected; 0 means the task does not exist.
    pub fn update_task(&self, id: TaskId, draft: &TaskDraft) -> AppResult<usize> {
        let rows = self.write(|conn| {
            let rows = TaskRepository::update(conn, id, draft)?;
            if rows > 0 {
                ttlog(
                    conn,
                    "edit_task",
                    &id.to_string(),
                    &format!("updated task '{}'", draft.trimmed_name()),
                )?;
            }
            Ok(rows)
        })?;

        if rows > 0 {
            self.notifier
                .publish(ChangeEvent::new(Scope::Tasks, Some(id.0)));
        }
        Ok(rows)
    }

    /// Delete a task and, through the storage trigger, all of its timings.
    pub fn delete_task(&self, id: TaskId) -> AppResult<usize> {
        let (rows, removed_timings) = self.write(|conn| {
            let timings = TimingRepository::list_for_task(conn, id)?.len();
            let rows = TaskRepository::delete(conn, id)?;
            if rows > 0 {
                ttlog(
                    conn,
                    "del_task",
                    &id.to_string(),
                    &format!("deleted task and {timings} timing(s)"),
                )?;
            }
            Ok((rows, timings))
        })?;

        if rows > 0 {
            debug!(%id, removed_timings, "task deleted");
            self.notifier
                .publish(ChangeEvent::new(Scope::Tasks, Some(id.0)));
            if removed_timings > 0 {
                self.notifier.publish(ChangeEvent::new(Scope::Timings, None));
            }
        }
        Ok(rows)
    }

    // ---------------------------
    // Timings
    // ---------------------------

    /// Start, stop or switch the timer for `task_id` as one atomic step.
    ///
    /// Toggling the running task stops it; toggling another task stops the
    /// running one and starts the new one; toggling while idle starts timing.
    pub fn toggle_timing(&self, task_id: TaskId) -> AppResult<TimerState> {
        let (next, transition) = self.pool.with_write(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            if !TaskRepository::exists(&tx, task_id)? {
                return Err(AppError::Validation(format!(
                    "task {task_id} does not exist"
                )));
            }

            let now = self.clock.now();
            let current = TimingRepository::open_timing(&tx)?;
            let transition = Transition::plan(&TimerState::from(current.as_ref()), task_id, now);
            let next = apply_transition(&tx, transition, now)?;

            tx.commit()?;
            Ok((next, transition))
        })?;

        debug!(?transition, "timer toggled");
        self.notifier.publish(ChangeEvent::new(
            Scope::Timings,
            next.task_id().map(|id| id.0),
        ));
        Ok(next)
    }

    /// Timer state as persisted; the database is the source of truth.
    pub fn timer_state(&self) -> AppResult<TimerState> {
        let current = self.current_timing()?;
        Ok(TimerState::from(current.as_ref()))
    }

    pub fn current_timing(&self) -> AppResult<Option<CurrentTiming>> {
        self.pool.with_read(TimingRepository::open_timing)
    }

    pub fn get_timing(&self, id: TimingId) -> AppResult<Option<Timing>> {
        self.pool.with_read(|conn| TimingRepository::get(conn, id))
    }

    pub fn timings_for_task(&self, task_id: TaskId) -> AppResult<Vec<Timing>> {
        self.pool
            .with_read(|conn| TimingRepository::list_for_task(conn, task_id))
    }

    pub fn daily_durations(&self, filter: &DurationFilter) -> AppResult<Vec<DailyDuration>> {
        self.pool
            .with_read(|conn| TimingRepository::daily_durations(conn, filter))
    }

    // ---------------------------
    // Notifications
    // ---------------------------

    pub fn subscribe(&self, scope: Scope) -> Subscription {
        self.notifier.subscribe(scope)
    }

    pub fn on_change<F>(&self, scope: Scope, callback: F) -> AppResult<ChangeListener>
    where
        F: FnMut(ChangeEvent) + Send + 'static,
    {
        self.notifier.on_change(scope, callback)
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    // ---------------------------
    // Maintenance
    // ---------------------------

    pub fn read_log(&self, limit: i64) -> AppResult<Vec<LogEntry>> {
        self.pool.with_read(|conn| read_log(conn, limit))
    }

    /// Append a line to the internal log table.
    pub fn record(&self, operation: &str, target: &str, message: &str) -> AppResult<()> {
        self.write(|conn| ttlog(conn, operation, target, message))
    }

    pub fn stats(&self) -> AppResult<DbStats> {
        self.pool.with_read(stats::collect)
    }

    pub fn integrity_check(&self) -> AppResult<String> {
        self.pool.with_write(|conn| stats::integrity_check(conn))
    }

    pub fn vacuum(&self) -> AppResult<()> {
        self.pool.with_write(|conn| {
            conn.execute_batch("VACUUM;")?;
            Ok(())
        })
    }

    /// Run `func` in a transaction on the writer connection.
    fn write<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        self.pool.with_write(|conn| {
            let tx = conn.transaction()?;
            let out = func(&tx)?;
            tx.commit()?;
            Ok(out)
        })
    }
}

fn apply_transition(conn: &Connection, transition: Transition, now: i64) -> AppResult<TimerState> {
    match transition {
        Transition::Start { task_id } => start(conn, task_id, now),
        Transition::Stop {
            timing_id,
            duration,
        } => {
            stop(conn, timing_id, duration)?;
            Ok(TimerState::Idle)
        }
        Transition::Switch {
            timing_id,
            duration,
            task_id,
        } => {
            stop(conn, timing_id, duration)?;
            start(conn, task_id, now)
        }
    }
}

fn start(conn: &Connection, task_id: TaskId, now: i64) -> AppResult<TimerState> {
    let timing_id = TimingRepository::start(conn, task_id, now)?;
    ttlog(
        conn,
        "start_timing",
        &task_id.to_string(),
        &format!("timing {timing_id} started at {now}"),
    )?;
    Ok(TimerState::Timing {
        task_id,
        timing_id,
        start_time: now,
    })
}

fn stop(conn: &Connection, timing_id: TimingId, duration: i64) -> AppResult<()> {
    let rows = TimingRepository::stop(conn, timing_id, duration)?;
    if rows != 1 {
        return Err(AppError::Db(rusqlite::Error::StatementChangedRows(rows)));
    }
    ttlog(
        conn,
        "stop_timing",
        &timing_id.to_string(),
        &format!("timing {timing_id} stopped after {duration}s"),
    )?;
    Ok(())
}
