//! Core domain logic for TaskBoard.
//! This crate is the single source of truth for the user → category → task →
//! subtask invariants.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use api::{ApiResponse, ErrorExposure, TaskBoardApi};
pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, store_counts, DbError, StoreCounts};
pub use error::{CoreError, CoreResult, ErrorCode};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::category::{Category, CategoryPatch, NewCategory};
pub use model::detail::{CategoryDetail, SubtaskDetail, TaskDetail, UserDetail};
pub use model::subtask::{NewSubtask, Subtask, SubtaskPatch};
pub use model::task::{NewTask, Task, TaskPatch};
pub use model::user::{NewUser, User, UserPatch};
pub use model::validation::{FieldError, ValidationErrors};
pub use model::{EntityId, EntityKind};
pub use repo::{RepoError, RepoResult};

/// Minimal health-check API for smoke checks.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
