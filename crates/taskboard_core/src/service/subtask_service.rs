//! Subtask use-case service.

use super::{required, run};
use crate::error::CoreResult;
use crate::model::detail::SubtaskDetail;
use crate::model::subtask::{NewSubtask, Subtask, SubtaskPatch};
use crate::model::{EntityId, EntityKind};
use crate::repo::subtask_repo::SubtaskRepository;

const KIND: EntityKind = EntityKind::Subtask;

/// Subtask service facade over repository implementations.
pub struct SubtaskService<R: SubtaskRepository> {
    repo: R,
}

impl<R: SubtaskRepository> SubtaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_subtask(&self, input: &NewSubtask) -> CoreResult<Subtask> {
        run("subtask_create", KIND, None, || {
            self.repo.create_subtask(input)
        })
    }

    pub fn get_subtask(&self, id: EntityId) -> CoreResult<Subtask> {
        run("subtask_get", KIND, Some(id), || self.repo.get_subtask(id))
            .and_then(|subtask| required(subtask, KIND))
    }

    /// Gets a subtask with its task.
    pub fn get_subtask_detail(&self, id: EntityId) -> CoreResult<SubtaskDetail> {
        run("subtask_get_detail", KIND, Some(id), || {
            self.repo.get_subtask_detail(id)
        })
        .and_then(|detail| required(detail, KIND))
    }

    pub fn list_subtasks(&self) -> CoreResult<Vec<Subtask>> {
        run("subtask_list", KIND, None, || self.repo.list_subtasks(None))
    }

    pub fn list_subtasks_for_task(&self, task_id: EntityId) -> CoreResult<Vec<Subtask>> {
        run("subtask_list_for_task", KIND, Some(task_id), || {
            self.repo.list_subtasks(Some(task_id))
        })
    }

    /// Lists every subtask with its task.
    pub fn list_subtask_details(&self) -> CoreResult<Vec<SubtaskDetail>> {
        run("subtask_list_detail", KIND, None, || {
            self.repo.list_subtask_details(None)
        })
    }

    pub fn list_subtask_details_for_task(
        &self,
        task_id: EntityId,
    ) -> CoreResult<Vec<SubtaskDetail>> {
        run("subtask_list_detail_for_task", KIND, Some(task_id), || {
            self.repo.list_subtask_details(Some(task_id))
        })
    }

    pub fn update_subtask(&self, id: EntityId, patch: &SubtaskPatch) -> CoreResult<Subtask> {
        run("subtask_update", KIND, Some(id), || {
            self.repo.update_subtask(id, patch)
        })
    }

    /// Flips `is_done`. Each call inverts the previous state.
    pub fn toggle_subtask(&self, id: EntityId) -> CoreResult<Subtask> {
        run("subtask_toggle", KIND, Some(id), || self.repo.toggle_subtask(id))
    }

    pub fn delete_subtask(&self, id: EntityId) -> CoreResult<()> {
        run("subtask_delete", KIND, Some(id), || {
            self.repo.delete_subtask(id)
        })
    }
}
