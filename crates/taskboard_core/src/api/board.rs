//! Boundary facade: one method per externally offered operation.
//!
//! # Invariants
//! - Every operation returns an `ApiResponse`; only construction can fail
//!   with `Err`.
//! - Lists return the same associations as the matching detail read.
//! - Successful mutations carry a human-readable action message.

use super::{ApiResponse, ErrorExposure};
use crate::error::CoreResult;
use crate::model::category::{Category, CategoryPatch, NewCategory};
use crate::model::detail::{CategoryDetail, SubtaskDetail, TaskDetail, UserDetail};
use crate::model::subtask::{NewSubtask, Subtask, SubtaskPatch};
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::user::{NewUser, User, UserPatch};
use crate::model::EntityId;
use crate::repo::category_repo::SqliteCategoryRepository;
use crate::repo::subtask_repo::SqliteSubtaskRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::user_repo::SqliteUserRepository;
use crate::service::category_service::CategoryService;
use crate::service::subtask_service::SubtaskService;
use crate::service::task_service::TaskService;
use crate::service::user_service::UserService;
use rusqlite::Connection;

/// Envelope-returning API over one migrated connection.
///
/// Connection readiness is checked once, in `try_new`.
pub struct TaskBoardApi<'conn> {
    users: UserService<SqliteUserRepository<'conn>>,
    categories: CategoryService<SqliteCategoryRepository<'conn>>,
    tasks: TaskService<SqliteTaskRepository<'conn>>,
    subtasks: SubtaskService<SqliteSubtaskRepository<'conn>>,
    exposure: ErrorExposure,
}

impl<'conn> TaskBoardApi<'conn> {
    /// Builds the facade; fails with `Internal` when `conn` is not a
    /// migrated connection with foreign keys enabled.
    pub fn try_new(conn: &'conn Connection, exposure: ErrorExposure) -> CoreResult<Self> {
        Ok(Self {
            users: UserService::new(SqliteUserRepository::try_new(conn)?),
            categories: CategoryService::new(SqliteCategoryRepository::try_new(conn)?),
            tasks: TaskService::new(SqliteTaskRepository::try_new(conn)?),
            subtasks: SubtaskService::new(SqliteSubtaskRepository::try_new(conn)?),
            exposure,
        })
    }

    pub fn exposure(&self) -> ErrorExposure {
        self.exposure
    }

    // Users

    /// Lists users, each with its categories.
    pub fn list_users(&self) -> ApiResponse<Vec<UserDetail>> {
        self.finish(self.users.list_user_details(), ApiResponse::list)
    }

    pub fn get_user(&self, id: EntityId) -> ApiResponse<UserDetail> {
        self.finish(self.users.get_user_detail(id), ApiResponse::ok)
    }

    pub fn create_user(&self, input: &NewUser) -> ApiResponse<User> {
        self.finish(self.users.create_user(input), |user| {
            ApiResponse::created(user, "User created successfully")
        })
    }

    pub fn update_user(&self, id: EntityId, patch: &UserPatch) -> ApiResponse<User> {
        self.finish(self.users.update_user(id, patch), |user| {
            ApiResponse::ok(user).with_message("User updated successfully")
        })
    }

    pub fn delete_user(&self, id: EntityId) -> ApiResponse<()> {
        self.finish(self.users.delete_user(id), |()| {
            ApiResponse::message_only("User deleted successfully")
        })
    }

    // Categories

    /// Lists categories, each with its user and tasks.
    pub fn list_categories(&self) -> ApiResponse<Vec<CategoryDetail>> {
        self.finish(self.categories.list_category_details(), ApiResponse::list)
    }

    pub fn list_categories_for_user(&self, user_id: EntityId) -> ApiResponse<Vec<CategoryDetail>> {
        self.finish(
            self.categories.list_category_details_for_user(user_id),
            ApiResponse::list,
        )
    }

    pub fn get_category(&self, id: EntityId) -> ApiResponse<CategoryDetail> {
        self.finish(self.categories.get_category_detail(id), ApiResponse::ok)
    }

    pub fn create_category(&self, input: &NewCategory) -> ApiResponse<Category> {
        self.finish(self.categories.create_category(input), |category| {
            ApiResponse::created(category, "Category created successfully")
        })
    }

    pub fn update_category(&self, id: EntityId, patch: &CategoryPatch) -> ApiResponse<Category> {
        self.finish(self.categories.update_category(id, patch), |category| {
            ApiResponse::ok(category).with_message("Category updated successfully")
        })
    }

    pub fn delete_category(&self, id: EntityId) -> ApiResponse<()> {
        self.finish(self.categories.delete_category(id), |()| {
            ApiResponse::message_only("Category deleted successfully")
        })
    }

    // Tasks

    /// Lists tasks, each with its category and subtasks.
    pub fn list_tasks(&self) -> ApiResponse<Vec<TaskDetail>> {
        self.finish(self.tasks.list_task_details(), ApiResponse::list)
    }

    pub fn list_tasks_for_category(&self, category_id: EntityId) -> ApiResponse<Vec<TaskDetail>> {
        self.finish(
            self.tasks.list_task_details_for_category(category_id),
            ApiResponse::list,
        )
    }

    pub fn get_task(&self, id: EntityId) -> ApiResponse<TaskDetail> {
        self.finish(self.tasks.get_task_detail(id), ApiResponse::ok)
    }

    pub fn create_task(&self, input: &NewTask) -> ApiResponse<Task> {
        self.finish(self.tasks.create_task(input), |task| {
            ApiResponse::created(task, "Task created successfully")
        })
    }

    pub fn update_task(&self, id: EntityId, patch: &TaskPatch) -> ApiResponse<Task> {
        self.finish(self.tasks.update_task(id, patch), |task| {
            ApiResponse::ok(task).with_message("Task updated successfully")
        })
    }

    pub fn delete_task(&self, id: EntityId) -> ApiResponse<()> {
        self.finish(self.tasks.delete_task(id), |()| {
            ApiResponse::message_only("Task deleted successfully")
        })
    }

    // Subtasks

    /// Lists subtasks, each with its task.
    pub fn list_subtasks(&self) -> ApiResponse<Vec<SubtaskDetail>> {
        self.finish(self.subtasks.list_subtask_details(), ApiResponse::list)
    }

    pub fn list_subtasks_for_task(&self, task_id: EntityId) -> ApiResponse<Vec<SubtaskDetail>> {
        self.finish(
            self.subtasks.list_subtask_details_for_task(task_id),
            ApiResponse::list,
        )
    }

    pub fn get_subtask(&self, id: EntityId) -> ApiResponse<SubtaskDetail> {
        self.finish(self.subtasks.get_subtask_detail(id), ApiResponse::ok)
    }

    pub fn create_subtask(&self, input: &NewSubtask) -> ApiResponse<Subtask> {
        self.finish(self.subtasks.create_subtask(input), |subtask| {
            ApiResponse::created(subtask, "Subtask created successfully")
        })
    }

    pub fn update_subtask(&self, id: EntityId, patch: &SubtaskPatch) -> ApiResponse<Subtask> {
        self.finish(self.subtasks.update_subtask(id, patch), |subtask| {
            ApiResponse::ok(subtask).with_message("Subtask updated successfully")
        })
    }

    pub fn toggle_subtask(&self, id: EntityId) -> ApiResponse<Subtask> {
        self.finish(self.subtasks.toggle_subtask(id), |subtask| {
            let state = if subtask.is_done {
                "completed"
            } else {
                "incomplete"
            };
            ApiResponse::ok(subtask).with_message(format!("Subtask marked as {state}"))
        })
    }

    pub fn delete_subtask(&self, id: EntityId) -> ApiResponse<()> {
        self.finish(self.subtasks.delete_subtask(id), |()| {
            ApiResponse::message_only("Subtask deleted successfully")
        })
    }

    fn finish<T>(
        &self,
        outcome: CoreResult<T>,
        on_success: impl FnOnce(T) -> ApiResponse<T>,
    ) -> ApiResponse<T> {
        match outcome {
            Ok(value) => on_success(value),
            Err(err) => ApiResponse::failure(&err, self.exposure),
        }
    }
}
