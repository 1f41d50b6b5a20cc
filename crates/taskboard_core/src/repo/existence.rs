//! Existence resolver for parent references.
//!
//! # Invariants
//! - Callers run the check on the same connection/transaction as the write
//!   that depends on it.
//! - A miss is reported as `RepoError::NotFound` naming the missing kind.

use super::{RepoError, RepoResult};
use crate::model::{EntityId, EntityKind};
use log::debug;
use rusqlite::Connection;

/// Fails with `NotFound { kind, id }` unless a `kind` row with `id` exists.
pub fn require_exists(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?1);",
            kind.table()
        ),
        [id],
        |row| row.get(0),
    )?;

    if exists == 1 {
        return Ok(());
    }

    debug!(
        "event=require_exists module=repo status=miss kind={} id={id}",
        kind.table()
    );
    Err(RepoError::NotFound { kind, id })
}
