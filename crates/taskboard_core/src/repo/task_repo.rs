//! Task repository contract and SQLite implementation.

use super::category_repo::load_required_category;
use super::existence::require_exists;
use super::schema::{ensure_connection_ready, CATEGORIES, SUBTASKS, TASKS};
use super::subtask_repo::query_subtasks;
use super::{RepoError, RepoResult, NOW_MS_SQL};
use crate::model::detail::TaskDetail;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::{EntityId, EntityKind};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    category_id,
    title,
    description,
    created_at,
    updated_at
FROM tasks";

/// Repository interface for task CRUD operations.
pub trait TaskRepository {
    fn create_task(&self, input: &NewTask) -> RepoResult<Task>;
    fn update_task(&self, id: EntityId, patch: &TaskPatch) -> RepoResult<Task>;
    fn get_task(&self, id: EntityId) -> RepoResult<Option<Task>>;
    /// Loads a task with its category and its subtasks.
    fn get_task_detail(&self, id: EntityId) -> RepoResult<Option<TaskDetail>>;
    /// Lists all tasks, or only those in `category_id`.
    fn list_tasks(&self, category_id: Option<EntityId>) -> RepoResult<Vec<Task>>;
    /// Same filter as `list_tasks`, each task with its category and subtasks.
    fn list_task_details(&self, category_id: Option<EntityId>) -> RepoResult<Vec<TaskDetail>>;
    fn delete_task(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&CATEGORIES, &TASKS, &SUBTASKS])?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, input: &NewTask) -> RepoResult<Task> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        require_exists(&tx, EntityKind::Category, input.category_id)?;
        input.validate()?;

        tx.execute(
            "INSERT INTO tasks (category_id, title, description) VALUES (?1, ?2, ?3);",
            params![
                input.category_id,
                input.title.as_str(),
                input.description.as_deref()
            ],
        )
        .map_err(RepoError::write_rejected(EntityKind::Task))?;

        let task = load_required_task(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(task)
    }

    fn update_task(&self, id: EntityId, patch: &TaskPatch) -> RepoResult<Task> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_required_task(&tx, id)?;
        let category_id = patch.category_id.unwrap_or(current.category_id);
        if category_id != current.category_id {
            require_exists(&tx, EntityKind::Category, category_id)?;
        }
        patch.validate()?;

        let title = patch.title.as_deref().unwrap_or(current.title.as_str());
        let description = match patch.description.as_ref() {
            Some(value) => value.as_deref(),
            None => current.description.as_deref(),
        };
        tx.execute(
            &format!(
                "UPDATE tasks
                 SET
                    category_id = ?2,
                    title = ?3,
                    description = ?4,
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, category_id, title, description],
        )
        .map_err(RepoError::write_rejected(EntityKind::Task))?;

        let task = load_required_task(&tx, id)?;
        tx.commit()?;
        Ok(task)
    }

    fn get_task(&self, id: EntityId) -> RepoResult<Option<Task>> {
        load_task(self.conn, id)
    }

    fn get_task_detail(&self, id: EntityId) -> RepoResult<Option<TaskDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(task) = load_task(&tx, id)? else {
            return Ok(None);
        };
        let detail = task_detail(&tx, task)?;
        tx.commit()?;
        Ok(Some(detail))
    }

    fn list_tasks(&self, category_id: Option<EntityId>) -> RepoResult<Vec<Task>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if let Some(category_id) = category_id {
            require_exists(&tx, EntityKind::Category, category_id)?;
        }
        let tasks = query_tasks(&tx, category_id)?;
        tx.commit()?;
        Ok(tasks)
    }

    fn list_task_details(&self, category_id: Option<EntityId>) -> RepoResult<Vec<TaskDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if let Some(category_id) = category_id {
            require_exists(&tx, EntityKind::Category, category_id)?;
        }
        let details = query_tasks(&tx, category_id)?
            .into_iter()
            .map(|task| task_detail(&tx, task))
            .collect::<RepoResult<Vec<_>>>()?;
        tx.commit()?;
        Ok(details)
    }

    fn delete_task(&self, id: EntityId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Task,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn load_task(conn: &Connection, id: EntityId) -> RepoResult<Option<Task>> {
    let task = conn
        .query_row(
            &format!("{TASK_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok(parse_task_row(row)),
        )
        .optional()?;
    task.transpose()
}

pub(crate) fn load_required_task(conn: &Connection, id: EntityId) -> RepoResult<Task> {
    load_task(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::Task,
        id,
    })
}

fn task_detail(conn: &Connection, task: Task) -> RepoResult<TaskDetail> {
    let category = load_required_category(conn, task.category_id)?;
    let subtasks = query_subtasks(conn, Some(task.id))?;
    Ok(TaskDetail {
        task,
        category,
        subtasks,
    })
}

pub(crate) fn query_tasks(
    conn: &Connection,
    category_id: Option<EntityId>,
) -> RepoResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!(
        "{TASK_SELECT_SQL}
         WHERE (?1 IS NULL OR category_id = ?1)
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([category_id])?;
    let mut tasks = Vec::new();
    while let Some(row) = rows.next()? {
        tasks.push(parse_task_row(row)?);
    }
    Ok(tasks)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    Ok(Task {
        id: row.get("id")?,
        category_id: row.get("category_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
