//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-entity data access contracts.
//! - Isolate SQLite query details from service orchestration.
//! - Run every multi-step write as one `IMMEDIATE` transaction.
//!
//! # Invariants
//! - Parent existence is checked before validation, and validation before
//!   any SQL mutation, all inside the write transaction.
//! - Repository APIs return semantic errors (`NotFound`, `Validation`) in
//!   addition to DB transport errors; raw write failures are kept intact in
//!   `WriteRejected` for the error mapper to classify.

use crate::db::DbError;
use crate::model::validation::ValidationErrors;
use crate::model::{EntityId, EntityKind};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category_repo;
pub mod existence;
mod schema;
pub mod subtask_repo;
pub mod task_repo;
pub mod user_repo;

/// SQL expression producing the current time in epoch milliseconds.
pub(crate) const NOW_MS_SQL: &str = "CAST(unixepoch('subsec') * 1000 AS INTEGER)";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by all entity repositories.
#[derive(Debug)]
pub enum RepoError {
    /// Input failed field validation; nothing was written.
    Validation(ValidationErrors),
    /// Transport/bootstrap failure.
    Db(DbError),
    /// Target or referenced parent row does not exist.
    NotFound { kind: EntityKind, id: EntityId },
    /// The store rejected an INSERT/UPDATE on `kind`'s table.
    WriteRejected {
        kind: EntityKind,
        source: rusqlite::Error,
    },
    /// Persisted data cannot be converted into a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// `PRAGMA foreign_keys` is off, so cascades would not run.
    ForeignKeysDisabled,
}

impl RepoError {
    /// Wraps a failed write on `kind`'s table.
    pub(crate) fn write_rejected(kind: EntityKind) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| Self::WriteRejected { kind, source }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.label()),
            Self::WriteRejected { kind, source } => {
                write!(f, "{} write rejected: {source}", kind.label())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
            Self::ForeignKeysDisabled => write!(f, "repository requires foreign_keys=ON"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::WriteRejected { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn int_to_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
