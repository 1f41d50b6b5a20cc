//! User model: the root of the ownership hierarchy.
//!
//! # Invariants
//! - `email` is unique across all users (enforced by the store).
//! - `User` has no password field; the password is write-only.

use super::validation::{check_email, check_not_blank, ValidationErrors};
use super::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// User read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub updated_at: i64,
}

/// Input for creating a user. Missing fields deserialize as empty and are
/// rejected by validation.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_not_blank(&mut errors, "name", "Name", &self.name);
        check_email(&mut errors, "email", &self.email);
        check_not_blank(&mut errors, "password", "Password", &self.password);
        errors.into_result()
    }
}

impl Debug for NewUser {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Partial update for a user. Present fields replace stored values.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = self.name.as_deref() {
            check_not_blank(&mut errors, "name", "Name", name);
        }
        if let Some(email) = self.email.as_deref() {
            check_email(&mut errors, "email", email);
        }
        if let Some(password) = self.password.as_deref() {
            check_not_blank(&mut errors, "password", "Password", password);
        }
        errors.into_result()
    }
}

impl Debug for UserPatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{NewUser, UserPatch};

    #[test]
    fn new_user_collects_all_violations() {
        let errors = NewUser::new("", "nope", "").validate().unwrap_err();
        assert!(errors.has_field("name"));
        assert!(errors.has_field("email"));
        assert!(errors.has_field("password"));
    }

    #[test]
    fn debug_output_redacts_password() {
        let input = NewUser::new("Ada", "ada@example.com", "hunter2");
        assert!(!format!("{input:?}").contains("hunter2"));

        let patch = UserPatch {
            password: Some("hunter2".to_string()),
            ..UserPatch::default()
        };
        assert!(!format!("{patch:?}").contains("hunter2"));
    }

    #[test]
    fn empty_patch_is_valid() {
        assert!(UserPatch::default().validate().is_ok());
    }

    #[test]
    fn explicit_empty_name_in_patch_is_rejected() {
        let patch = UserPatch {
            name: Some(String::new()),
            ..UserPatch::default()
        };
        assert!(patch.validate().unwrap_err().has_field("name"));
    }
}
