//! Subtask repository contract and SQLite implementation.
//!
//! # Invariants
//! - `is_done` is stored as `0|1`; any other value is rejected on read.
//! - Toggle flips the stored flag in a single UPDATE statement.

use super::existence::require_exists;
use super::schema::{ensure_connection_ready, SUBTASKS, TASKS};
use super::task_repo::load_required_task;
use super::{bool_to_int, int_to_bool, RepoError, RepoResult, NOW_MS_SQL};
use crate::model::detail::SubtaskDetail;
use crate::model::subtask::{NewSubtask, Subtask, SubtaskPatch};
use crate::model::{EntityId, EntityKind};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const SUBTASK_SELECT_SQL: &str = "SELECT
    id,
    task_id,
    title,
    description,
    is_done,
    created_at,
    updated_at
FROM subtasks";

/// Repository interface for subtask CRUD operations.
pub trait SubtaskRepository {
    fn create_subtask(&self, input: &NewSubtask) -> RepoResult<Subtask>;
    fn update_subtask(&self, id: EntityId, patch: &SubtaskPatch) -> RepoResult<Subtask>;
    /// Flips `is_done` and returns the updated subtask.
    fn toggle_subtask(&self, id: EntityId) -> RepoResult<Subtask>;
    fn get_subtask(&self, id: EntityId) -> RepoResult<Option<Subtask>>;
    /// Loads a subtask with its owning task.
    fn get_subtask_detail(&self, id: EntityId) -> RepoResult<Option<SubtaskDetail>>;
    /// Lists all subtasks, or only those under `task_id`.
    fn list_subtasks(&self, task_id: Option<EntityId>) -> RepoResult<Vec<Subtask>>;
    /// Same filter as `list_subtasks`, each subtask with its task.
    fn list_subtask_details(&self, task_id: Option<EntityId>) -> RepoResult<Vec<SubtaskDetail>>;
    fn delete_subtask(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed subtask repository.
pub struct SqliteSubtaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubtaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&TASKS, &SUBTASKS])?;
        Ok(Self { conn })
    }
}

impl SubtaskRepository for SqliteSubtaskRepository<'_> {
    fn create_subtask(&self, input: &NewSubtask) -> RepoResult<Subtask> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        require_exists(&tx, EntityKind::Task, input.task_id)?;
        input.validate()?;

        tx.execute(
            "INSERT INTO subtasks (task_id, title, description, is_done)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                input.task_id,
                input.title.as_str(),
                input.description.as_deref(),
                bool_to_int(input.is_done),
            ],
        )
        .map_err(RepoError::write_rejected(EntityKind::Subtask))?;

        let subtask = load_required_subtask(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(subtask)
    }

    fn update_subtask(&self, id: EntityId, patch: &SubtaskPatch) -> RepoResult<Subtask> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_required_subtask(&tx, id)?;
        let task_id = patch.task_id.unwrap_or(current.task_id);
        if task_id != current.task_id {
            require_exists(&tx, EntityKind::Task, task_id)?;
        }
        patch.validate()?;

        let title = patch.title.as_deref().unwrap_or(current.title.as_str());
        let description = match patch.description.as_ref() {
            Some(value) => value.as_deref(),
            None => current.description.as_deref(),
        };
        let is_done = patch.is_done.unwrap_or(current.is_done);
        tx.execute(
            &format!(
                "UPDATE subtasks
                 SET
                    task_id = ?2,
                    title = ?3,
                    description = ?4,
                    is_done = ?5,
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, task_id, title, description, bool_to_int(is_done)],
        )
        .map_err(RepoError::write_rejected(EntityKind::Subtask))?;

        let subtask = load_required_subtask(&tx, id)?;
        tx.commit()?;
        Ok(subtask)
    }

    fn toggle_subtask(&self, id: EntityId) -> RepoResult<Subtask> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx
            .execute(
                &format!(
                    "UPDATE subtasks
                     SET
                        is_done = 1 - is_done,
                        updated_at = {NOW_MS_SQL}
                     WHERE id = ?1;"
                ),
                [id],
            )
            .map_err(RepoError::write_rejected(EntityKind::Subtask))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Subtask,
                id,
            });
        }

        let subtask = load_required_subtask(&tx, id)?;
        tx.commit()?;
        Ok(subtask)
    }

    fn get_subtask(&self, id: EntityId) -> RepoResult<Option<Subtask>> {
        load_subtask(self.conn, id)
    }

    fn get_subtask_detail(&self, id: EntityId) -> RepoResult<Option<SubtaskDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(subtask) = load_subtask(&tx, id)? else {
            return Ok(None);
        };
        let detail = subtask_detail(&tx, subtask)?;
        tx.commit()?;
        Ok(Some(detail))
    }

    fn list_subtasks(&self, task_id: Option<EntityId>) -> RepoResult<Vec<Subtask>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if let Some(task_id) = task_id {
            require_exists(&tx, EntityKind::Task, task_id)?;
        }
        let subtasks = query_subtasks(&tx, task_id)?;
        tx.commit()?;
        Ok(subtasks)
    }

    fn list_subtask_details(&self, task_id: Option<EntityId>) -> RepoResult<Vec<SubtaskDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if let Some(task_id) = task_id {
            require_exists(&tx, EntityKind::Task, task_id)?;
        }
        let details = query_subtasks(&tx, task_id)?
            .into_iter()
            .map(|subtask| subtask_detail(&tx, subtask))
            .collect::<RepoResult<Vec<_>>>()?;
        tx.commit()?;
        Ok(details)
    }

    fn delete_subtask(&self, id: EntityId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM subtasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Subtask,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

fn load_subtask(conn: &Connection, id: EntityId) -> RepoResult<Option<Subtask>> {
    let subtask = conn
        .query_row(
            &format!("{SUBTASK_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok(parse_subtask_row(row)),
        )
        .optional()?;
    subtask.transpose()
}

fn load_required_subtask(conn: &Connection, id: EntityId) -> RepoResult<Subtask> {
    load_subtask(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::Subtask,
        id,
    })
}

fn subtask_detail(conn: &Connection, subtask: Subtask) -> RepoResult<SubtaskDetail> {
    let task = load_required_task(conn, subtask.task_id)?;
    Ok(SubtaskDetail { subtask, task })
}

pub(crate) fn query_subtasks(
    conn: &Connection,
    task_id: Option<EntityId>,
) -> RepoResult<Vec<Subtask>> {
    let mut stmt = conn.prepare(&format!(
        "{SUBTASK_SELECT_SQL}
         WHERE (?1 IS NULL OR task_id = ?1)
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([task_id])?;
    let mut subtasks = Vec::new();
    while let Some(row) = rows.next()? {
        subtasks.push(parse_subtask_row(row)?);
    }
    Ok(subtasks)
}

fn parse_subtask_row(row: &Row<'_>) -> RepoResult<Subtask> {
    Ok(Subtask {
        id: row.get("id")?,
        task_id: row.get("task_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        is_done: int_to_bool(row.get("is_done")?, "subtasks.is_done")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
