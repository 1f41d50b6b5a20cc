//! Category model, owned by a user.

use super::validation::{check_bounded_text, ValidationErrors};
use super::EntityId;
use serde::{Deserialize, Serialize};

pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

/// Category read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub user_id: EntityId,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for creating a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewCategory {
    pub user_id: EntityId,
    pub name: String,
}

impl NewCategory {
    pub fn new(user_id: EntityId, name: impl Into<String>) -> Self {
        Self {
            user_id,
            name: name.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_name(&mut errors, &self.name);
        errors.into_result()
    }
}

/// Partial update for a category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryPatch {
    pub user_id: Option<EntityId>,
    pub name: Option<String>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = self.name.as_deref() {
            check_name(&mut errors, name);
        }
        errors.into_result()
    }
}

fn check_name(errors: &mut ValidationErrors, name: &str) {
    check_bounded_text(errors, "name", "Category name", name, CATEGORY_NAME_MAX_CHARS);
}

#[cfg(test)]
mod tests {
    use super::{CategoryPatch, NewCategory};

    #[test]
    fn name_over_limit_is_rejected() {
        let input = NewCategory::new(1, "x".repeat(101));
        let errors = input.validate().unwrap_err();
        assert_eq!(
            errors.errors()[0].message,
            "Category name must be between 1 and 100 characters"
        );
    }

    #[test]
    fn missing_name_deserializes_as_empty_and_fails() {
        let input: NewCategory = serde_json::from_str(r#"{"user_id": 3}"#).unwrap();
        assert_eq!(input.user_id, 3);
        assert!(input.validate().unwrap_err().has_field("name"));
    }

    #[test]
    fn patch_with_only_parent_is_valid() {
        let patch = CategoryPatch {
            user_id: Some(0),
            ..CategoryPatch::default()
        };
        assert!(patch.validate().is_ok());
    }
}
