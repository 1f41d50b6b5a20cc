//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Convert repository failures into the `CoreError` taxonomy.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Services never bypass repository validation/existence contracts.
//! - Log events carry ids, kinds and error codes, never field values.

use crate::error::{CoreError, CoreResult, ErrorCode};
use crate::model::{EntityId, EntityKind};
use crate::repo::RepoResult;
use log::{error, info, warn};
use std::time::Instant;

pub mod category_service;
pub mod subtask_service;
pub mod task_service;
pub mod user_service;

/// Runs one repository call, maps its error and logs the outcome.
pub(crate) fn run<T>(
    event: &'static str,
    kind: EntityKind,
    id: Option<EntityId>,
    call: impl FnOnce() -> RepoResult<T>,
) -> CoreResult<T> {
    let started_at = Instant::now();
    let result = call().map_err(CoreError::from);
    let duration_ms = started_at.elapsed().as_millis();
    let id = id.map_or_else(|| "-".to_string(), |value| value.to_string());

    match &result {
        Ok(_) => info!(
            "event={event} module=service status=ok kind={} id={id} duration_ms={duration_ms}",
            kind.table()
        ),
        Err(err) if err.code() == ErrorCode::InternalError => error!(
            "event={event} module=service status=error kind={} id={id} duration_ms={duration_ms} error_code={} error={err}",
            kind.table(),
            err.code().as_str()
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected kind={} id={id} duration_ms={duration_ms} error_code={}",
            kind.table(),
            err.code().as_str()
        ),
    }

    result
}

/// Turns a missing row into `NotFound(kind)`.
pub(crate) fn required<T>(value: Option<T>, kind: EntityKind) -> CoreResult<T> {
    value.ok_or(CoreError::NotFound(kind))
}
