//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - The `password` column is written but never selected.
//! - Deleting a user removes its categories, tasks and subtasks through
//!   `ON DELETE CASCADE` in the same statement.

use super::category_repo::query_categories;
use super::schema::{ensure_connection_ready, CATEGORIES, USERS};
use super::{RepoError, RepoResult, NOW_MS_SQL};
use crate::model::detail::UserDetail;
use crate::model::user::{NewUser, User, UserPatch};
use crate::model::{EntityId, EntityKind};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    created_at,
    updated_at
FROM users";

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    fn create_user(&self, input: &NewUser) -> RepoResult<User>;
    fn update_user(&self, id: EntityId, patch: &UserPatch) -> RepoResult<User>;
    fn get_user(&self, id: EntityId) -> RepoResult<Option<User>>;
    /// Loads a user together with its categories.
    fn get_user_detail(&self, id: EntityId) -> RepoResult<Option<UserDetail>>;
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Lists every user with its categories.
    fn list_user_details(&self) -> RepoResult<Vec<UserDetail>>;
    fn delete_user(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&USERS, &CATEGORIES])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, input: &NewUser) -> RepoResult<User> {
        input.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO users (name, email, password) VALUES (?1, ?2, ?3);",
            params![
                input.name.as_str(),
                input.email.as_str(),
                input.password.as_str()
            ],
        )
        .map_err(RepoError::write_rejected(EntityKind::User))?;

        let user = load_required_user(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(user)
    }

    fn update_user(&self, id: EntityId, patch: &UserPatch) -> RepoResult<User> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_required_user(&tx, id)?;
        patch.validate()?;

        let name = patch.name.as_deref().unwrap_or(current.name.as_str());
        let email = patch.email.as_deref().unwrap_or(current.email.as_str());
        tx.execute(
            &format!(
                "UPDATE users
                 SET
                    name = ?2,
                    email = ?3,
                    password = COALESCE(?4, password),
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, name, email, patch.password.as_deref()],
        )
        .map_err(RepoError::write_rejected(EntityKind::User))?;

        let user = load_required_user(&tx, id)?;
        tx.commit()?;
        Ok(user)
    }

    fn get_user(&self, id: EntityId) -> RepoResult<Option<User>> {
        load_user(self.conn, id)
    }

    fn get_user_detail(&self, id: EntityId) -> RepoResult<Option<UserDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(user) = load_user(&tx, id)? else {
            return Ok(None);
        };
        let detail = user_detail(&tx, user)?;
        tx.commit()?;
        Ok(Some(detail))
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        query_users(self.conn)
    }

    fn list_user_details(&self) -> RepoResult<Vec<UserDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let details = query_users(&tx)?
            .into_iter()
            .map(|user| user_detail(&tx, user))
            .collect::<RepoResult<Vec<_>>>()?;
        tx.commit()?;
        Ok(details)
    }

    fn delete_user(&self, id: EntityId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM users WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::User,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn load_user(conn: &Connection, id: EntityId) -> RepoResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("{USER_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok(parse_user_row(row)),
        )
        .optional()?;
    user.transpose()
}

pub(crate) fn load_required_user(conn: &Connection, id: EntityId) -> RepoResult<User> {
    load_user(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::User,
        id,
    })
}

fn user_detail(conn: &Connection, user: User) -> RepoResult<UserDetail> {
    let categories = query_categories(conn, Some(user.id))?;
    Ok(UserDetail { user, categories })
}

fn query_users(conn: &Connection) -> RepoResult<Vec<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} ORDER BY id ASC;"))?;
    let mut rows = stmt.query([])?;
    let mut users = Vec::new();
    while let Some(row) = rows.next()? {
        users.push(parse_user_row(row)?);
    }
    Ok(users)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: row.get("id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
