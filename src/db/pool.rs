//! SQLite connection pool: one serialized writer plus a few snapshot readers.
//!
//! File-backed databases run in WAL mode, so readers never wait for the
//! writer and each read sees a single consistent snapshot. In-memory
//! databases cannot be shared between connections; there every access goes
//! through the writer.

use crate::errors::AppResult;
use crate::utils::date::Zone;
use parking_lot::Mutex;
use rusqlite::functions::FunctionFlags;
use rusqlite::{Connection, TransactionBehavior};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

const MAX_IDLE_READERS: usize = 4;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct DbPool {
    writer: Mutex<Connection>,
    readers: Mutex<Vec<Connection>>,
    path: Option<PathBuf>,
    zone: Zone,
}

impl DbPool {
    pub fn open(path: &Path, zone: Zone) -> AppResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        configure(&conn, zone)?;
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!(path = %path.display(), journal_mode = %mode, "writer connection opened");

        Ok(Self {
            writer: Mutex::new(conn),
            readers: Mutex::new(Vec::new()),
            path: Some(path.to_path_buf()),
            zone,
        })
    }

    pub fn open_in_memory(zone: Zone) -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        configure(&conn, zone)?;

        Ok(Self {
            writer: Mutex::new(conn),
            readers: Mutex::new(Vec::new()),
            path: None,
            zone,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Run `func` with exclusive access to the writer connection.
    ///
    /// Every mutation of the store goes through here, which serializes them.
    pub fn with_write<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&mut Connection) -> AppResult<T>,
    {
        let mut conn = self.writer.lock();
        func(&mut conn)
    }

    /// Run `func` inside a read transaction on a reader connection.
    pub fn with_read<F, T>(&self, func: F) -> AppResult<T>
    where
        F: FnOnce(&Connection) -> AppResult<T>,
    {
        let Some(path) = self.path.as_deref() else {
            let conn = self.writer.lock();
            return func(&conn);
        };

        let mut conn = self.checkout(path)?;
        let result = read_snapshot(&mut conn, func);
        self.checkin(conn);
        result
    }

    fn checkout(&self, path: &Path) -> AppResult<Connection> {
        if let Some(conn) = self.readers.lock().pop() {
            return Ok(conn);
        }
        let conn = Connection::open(path)?;
        configure(&conn, self.zone)?;
        debug!(path = %path.display(), "reader connection opened");
        Ok(conn)
    }

    fn checkin(&self, conn: Connection) {
        let mut idle = self.readers.lock();
        if idle.len() < MAX_IDLE_READERS {
            idle.push(conn);
        }
    }
}

fn read_snapshot<F, T>(conn: &mut Connection, func: F) -> AppResult<T>
where
    F: FnOnce(&Connection) -> AppResult<T>,
{
    let tx = conn.transaction_with_behavior(TransactionBehavior::Deferred)?;
    let out = func(&tx)?;
    tx.commit()?;
    Ok(out)
}

/// Per-connection setup: busy timeout and the SQL functions the views use.
fn configure(conn: &Connection, zone: Zone) -> AppResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_local_date(conn, zone)?;
    Ok(())
}

/// `tt_local_date(epoch_seconds)` → `'YYYY-MM-DD'` in the store's time zone.
fn register_local_date(conn: &Connection, zone: Zone) -> AppResult<()> {
    conn.create_scalar_function(
        "tt_local_date",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        move |ctx| {
            let epoch: Option<i64> = ctx.get(0)?;
            Ok(epoch
                .and_then(|e| zone.local_date(e))
                .map(|d| d.format("%Y-%m-%d").to_string()))
        },
    )?;
    Ok(())
}
