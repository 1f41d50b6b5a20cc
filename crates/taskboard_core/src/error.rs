//! Core outcome taxonomy and the mapping from store failures into it.
//!
//! # Responsibility
//! - Define the closed set of failure kinds every core operation reports.
//! - Translate repository/store failures into those kinds. This is the only
//!   place that inspects SQLite constraint codes.
//!
//! # Invariants
//! - `Conflict` is produced only for a unique violation on users (email).
//! - A `CHECK`/`NOT NULL` rejection on a bounded column is a
//!   `ValidationFailed` naming that column, not an internal error.
//! - A foreign-key violation on a child write is reported as `NotFound` of
//!   the parent kind, even when it slipped past the existence check.

use crate::db::DbError;
use crate::model::category::CATEGORY_NAME_MAX_CHARS;
use crate::model::subtask::SUBTASK_TITLE_MAX_CHARS;
use crate::model::task::TASK_TITLE_MAX_CHARS;
use crate::model::validation::{length_message, FieldError, ValidationErrors};
use crate::model::EntityKind;
use crate::repo::RepoError;
use rusqlite::ffi;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Stable machine-readable failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationFailed,
    NotFound,
    Conflict,
    InternalError,
}

impl ErrorCode {
    /// HTTP status the boundary layer answers with for this code.
    pub fn http_status(self) -> u16 {
        match self {
            Self::ValidationFailed => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InternalError => "internal_error",
        }
    }
}

/// Failure outcome of a core operation.
#[derive(Debug)]
pub enum CoreError {
    /// Input must be fixed by the caller; lists every offending field.
    ValidationFailed(ValidationErrors),
    /// Target entity, or a referenced parent, does not exist.
    NotFound(EntityKind),
    /// Unique constraint violated (duplicate email).
    Conflict(String),
    /// Store or connection failure.
    Internal(String),
}

impl CoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Field violations, present only for `ValidationFailed`.
    pub fn field_errors(&self) -> Option<&[FieldError]> {
        match self {
            Self::ValidationFailed(errors) => Some(errors.errors()),
            _ => None,
        }
    }
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ValidationFailed(errors) => write!(f, "{errors}"),
            Self::NotFound(kind) => write!(f, "{} not found", kind.label()),
            Self::Conflict(reason) => f.write_str(reason),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ValidationFailed(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(value: ValidationErrors) -> Self {
        Self::ValidationFailed(value)
    }
}

impl From<DbError> for CoreError {
    fn from(value: DbError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<RepoError> for CoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(errors) => Self::ValidationFailed(errors),
            RepoError::NotFound { kind, .. } => Self::NotFound(kind),
            RepoError::WriteRejected { kind, source } => map_rejected_write(kind, &source),
            other => Self::Internal(other.to_string()),
        }
    }
}

/// Store-level constraint family, decoded from SQLite extended codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConstraintViolation {
    Unique,
    ForeignKey,
    /// `CHECK` or `NOT NULL`: a column value the schema rejects.
    Column,
    Other,
}

fn classify_constraint(err: &rusqlite::Error) -> Option<ConstraintViolation> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != rusqlite::ErrorCode::ConstraintViolation {
        return None;
    }

    Some(match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_UNIQUE => ConstraintViolation::Unique,
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => ConstraintViolation::ForeignKey,
        ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
            ConstraintViolation::Column
        }
        _ => ConstraintViolation::Other,
    })
}

fn map_rejected_write(kind: EntityKind, source: &rusqlite::Error) -> CoreError {
    match (classify_constraint(source), kind) {
        (Some(ConstraintViolation::Unique), EntityKind::User) => {
            CoreError::Conflict("Email already exists".to_string())
        }
        (Some(ConstraintViolation::ForeignKey), _) => {
            CoreError::NotFound(kind.parent().unwrap_or(kind))
        }
        (Some(ConstraintViolation::Column), _) => match bounded_column_errors(kind) {
            Some(errors) => CoreError::ValidationFailed(errors),
            None => internal_write_failure(kind, source),
        },
        _ => internal_write_failure(kind, source),
    }
}

// Users carry no column constraints besides NOT NULL on bound strings.
fn bounded_column_errors(kind: EntityKind) -> Option<ValidationErrors> {
    let (field, label, max_chars) = match kind {
        EntityKind::User => return None,
        EntityKind::Category => ("name", "Category name", CATEGORY_NAME_MAX_CHARS),
        EntityKind::Task => ("title", "Task title", TASK_TITLE_MAX_CHARS),
        EntityKind::Subtask => ("title", "Subtask title", SUBTASK_TITLE_MAX_CHARS),
    };
    let mut errors = ValidationErrors::new();
    errors.push(field, length_message(label, max_chars));
    Some(errors)
}

fn internal_write_failure(kind: EntityKind, source: &rusqlite::Error) -> CoreError {
    CoreError::Internal(format!("{} write failed: {source}", kind.label()))
}
