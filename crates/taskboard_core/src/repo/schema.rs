//! Connection readiness checks run when a repository is constructed.

use super::{RepoError, RepoResult};
use crate::db::migrations::latest_version;
use rusqlite::Connection;

/// Table name plus the columns a repository reads or writes.
pub(crate) struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [&'static str],
}

pub(crate) const USERS: TableSpec = TableSpec {
    name: "users",
    columns: &["id", "name", "email", "password", "created_at", "updated_at"],
};

pub(crate) const CATEGORIES: TableSpec = TableSpec {
    name: "categories",
    columns: &["id", "user_id", "name", "created_at", "updated_at"],
};

pub(crate) const TASKS: TableSpec = TableSpec {
    name: "tasks",
    columns: &[
        "id",
        "category_id",
        "title",
        "description",
        "created_at",
        "updated_at",
    ],
};

pub(crate) const SUBTASKS: TableSpec = TableSpec {
    name: "subtasks",
    columns: &[
        "id",
        "task_id",
        "title",
        "description",
        "is_done",
        "created_at",
        "updated_at",
    ],
};

/// Rejects connections that were not opened through `db::open_*`.
pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[&TableSpec]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    for table in tables {
        if !table_exists(conn, table.name)? {
            return Err(RepoError::MissingRequiredTable(table.name));
        }
        for &column in table.columns {
            if !table_has_column(conn, table.name, column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: table.name,
                    column,
                });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
