//! Subtask model, owned by a task.

use super::validation::{check_bounded_text, ValidationErrors};
use super::{present, EntityId};
use serde::{Deserialize, Serialize};

pub const SUBTASK_TITLE_MAX_CHARS: usize = 200;

/// Subtask read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: EntityId,
    pub task_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a subtask. `is_done` defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewSubtask {
    pub task_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
}

impl NewSubtask {
    pub fn new(task_id: EntityId, title: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            description: None,
            is_done: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(&mut errors, &self.title);
        errors.into_result()
    }
}

/// Partial update for a subtask.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubtaskPatch {
    pub task_id: Option<EntityId>,
    pub title: Option<String>,
    #[serde(deserialize_with = "present")]
    pub description: Option<Option<String>>,
    pub is_done: Option<bool>,
}

impl SubtaskPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = self.title.as_deref() {
            check_title(&mut errors, title);
        }
        errors.into_result()
    }
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    check_bounded_text(
        errors,
        "title",
        "Subtask title",
        title,
        SUBTASK_TITLE_MAX_CHARS,
    );
}

#[cfg(test)]
mod tests {
    use super::{NewSubtask, SubtaskPatch};

    #[test]
    fn is_done_defaults_to_false_when_absent() {
        let input: NewSubtask = serde_json::from_str(r#"{"task_id": 1, "title": "a"}"#).unwrap();
        assert!(!input.is_done);
    }

    #[test]
    fn explicit_false_is_kept_as_present() {
        let patch: SubtaskPatch = serde_json::from_str(r#"{"is_done": false}"#).unwrap();
        assert_eq!(patch.is_done, Some(false));
    }
}
