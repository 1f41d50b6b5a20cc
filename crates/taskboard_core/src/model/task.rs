//! Task model, owned by a category.

use super::validation::{check_bounded_text, ValidationErrors};
use super::{present, EntityId};
use serde::{Deserialize, Serialize};

pub const TASK_TITLE_MAX_CHARS: usize = 200;

/// Task read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: EntityId,
    pub category_id: EntityId,
    pub title: String,
    pub description: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewTask {
    pub category_id: EntityId,
    pub title: String,
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(category_id: EntityId, title: impl Into<String>) -> Self {
        Self {
            category_id,
            title: title.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_title(&mut errors, &self.title);
        errors.into_result()
    }
}

/// Partial update for a task.
///
/// `description: Some(None)` clears the stored description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub category_id: Option<EntityId>,
    pub title: Option<String>,
    #[serde(deserialize_with = "present")]
    pub description: Option<Option<String>>,
}

impl TaskPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(title) = self.title.as_deref() {
            check_title(&mut errors, title);
        }
        errors.into_result()
    }
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    check_bounded_text(errors, "title", "Task title", title, TASK_TITLE_MAX_CHARS);
}

#[cfg(test)]
mod tests {
    use super::TaskPatch;

    #[test]
    fn patch_distinguishes_absent_null_and_value() {
        let absent: TaskPatch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.description, None);

        let cleared: TaskPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
        assert_eq!(cleared.description, Some(None));

        let set: TaskPatch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
        assert_eq!(set.description, Some(Some("x".to_string())));
    }

    #[test]
    fn explicit_empty_title_is_rejected_not_ignored() {
        let patch: TaskPatch = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some(""));
        assert!(patch.validate().unwrap_err().has_field("title"));
    }
}
