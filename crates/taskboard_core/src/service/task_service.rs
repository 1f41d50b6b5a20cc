//! Task use-case service.

use super::{required, run};
use crate::error::CoreResult;
use crate::model::detail::TaskDetail;
use crate::model::task::{NewTask, Task, TaskPatch};
use crate::model::{EntityId, EntityKind};
use crate::repo::task_repo::TaskRepository;

const KIND: EntityKind = EntityKind::Task;

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&self, input: &NewTask) -> CoreResult<Task> {
        run("task_create", KIND, None, || self.repo.create_task(input))
    }

    pub fn get_task(&self, id: EntityId) -> CoreResult<Task> {
        run("task_get", KIND, Some(id), || self.repo.get_task(id))
            .and_then(|task| required(task, KIND))
    }

    /// Gets a task with its category and subtasks.
    pub fn get_task_detail(&self, id: EntityId) -> CoreResult<TaskDetail> {
        run("task_get_detail", KIND, Some(id), || {
            self.repo.get_task_detail(id)
        })
        .and_then(|detail| required(detail, KIND))
    }

    pub fn list_tasks(&self) -> CoreResult<Vec<Task>> {
        run("task_list", KIND, None, || self.repo.list_tasks(None))
    }

    pub fn list_tasks_for_category(&self, category_id: EntityId) -> CoreResult<Vec<Task>> {
        run("task_list_for_category", KIND, Some(category_id), || {
            self.repo.list_tasks(Some(category_id))
        })
    }

    /// Lists every task with its category and subtasks.
    pub fn list_task_details(&self) -> CoreResult<Vec<TaskDetail>> {
        run("task_list_detail", KIND, None, || self.repo.list_task_details(None))
    }

    pub fn list_task_details_for_category(
        &self,
        category_id: EntityId,
    ) -> CoreResult<Vec<TaskDetail>> {
        run("task_list_detail_for_category", KIND, Some(category_id), || {
            self.repo.list_task_details(Some(category_id))
        })
    }

    /// Applies a partial update. Changing `category_id` re-parents the task.
    pub fn update_task(&self, id: EntityId, patch: &TaskPatch) -> CoreResult<Task> {
        run("task_update", KIND, Some(id), || self.repo.update_task(id, patch))
    }

    pub fn delete_task(&self, id: EntityId) -> CoreResult<()> {
        run("task_delete", KIND, Some(id), || self.repo.delete_task(id))
    }
}
