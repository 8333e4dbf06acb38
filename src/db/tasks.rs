use crate::errors::AppResult;
use crate::models::task::{Task, TaskDraft, TaskId};
use rusqlite::{Connection, OptionalExtension, Row, params};

const SELECT_TASK: &str = "SELECT _id, Name, Description, SortOrder FROM Tasks";

pub(crate) fn map_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("_id")?,
        name: row.get("Name")?,
        description: row
            .get::<_, Option<String>>("Description")?
            .unwrap_or_default(),
        sort_order: row.get::<_, Option<i64>>("SortOrder")?.unwrap_or(0),
    })
}

/// CRUD over the `Tasks` table.
///
/// Functions take a plain connection so the caller decides the transaction
/// boundaries. Deleting a task relies on the `remove_task_timings` trigger
/// to drop its timings.
pub struct TaskRepository;

impl TaskRepository {
    pub fn create(conn: &Connection, draft: &TaskDraft) -> AppResult<TaskId> {
        draft.validate()?;

        let mut stmt = conn.prepare_cached(
            "INSERT INTO Tasks (Name, Description, SortOrder) VALUES (?1, ?2, ?3)",
        )?;
        stmt.execute(params![
            draft.trimmed_name(),
            draft.description,
            draft.sort_order
        ])?;

        Ok(TaskId(conn.last_insert_rowid()))
    }

    /// Replace the mutable fields of a task. Returns the rows affected
    /// (0 when `id` does not exist).
    pub fn update(conn: &Connection, id: TaskId, draft: &TaskDraft) -> AppResult<usize> {
        draft.validate()?;

        let mut stmt = conn.prepare_cached(
            "UPDATE Tasks SET Name = ?1, Description = ?2, SortOrder = ?3 WHERE _id = ?4",
        )?;
        let rows = stmt.execute(params![
            draft.trimmed_name(),
            draft.description,
            draft.sort_order,
            id
        ])?;
        Ok(rows)
    }

    pub fn delete(conn: &Connection, id: TaskId) -> AppResult<usize> {
        let rows = conn.execute("DELETE FROM Tasks WHERE _id = ?1", [id])?;
        Ok(rows)
    }

    /// All tasks ordered by sort order, then name. `_id` keeps ties stable.
    pub fn list(conn: &Connection) -> AppResult<Vec<Task>> {
        let sql = format!("{SELECT_TASK} ORDER BY SortOrder ASC, Name ASC, _id ASC");
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt.query_map([], map_task)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get(conn: &Connection, id: TaskId) -> AppResult<Option<Task>> {
        let sql = format!("{SELECT_TASK} WHERE _id = ?1");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([id], map_task).optional()?)
    }

    pub fn exists(conn: &Connection, id: TaskId) -> AppResult<bool> {
        let mut stmt = conn.prepare_cached("SELECT 1 FROM Tasks WHERE _id = ?1")?;
        Ok(stmt.exists([id])?)
    }

    pub fn count(conn: &Connection) -> AppResult<i64> {
        Ok(conn.query_row("SELECT COUNT(*) FROM Tasks", [], |row| row.get(0))?)
    }
}
