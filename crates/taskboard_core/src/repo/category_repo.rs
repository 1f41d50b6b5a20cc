//! Category repository contract and SQLite implementation.
//!
//! # Invariants
//! - `user_id` must reference an existing user at write time.
//! - Lists are ordered by `id ASC`.

use super::existence::require_exists;
use super::schema::{ensure_connection_ready, CATEGORIES, TASKS, USERS};
use super::task_repo::query_tasks;
use super::user_repo::load_required_user;
use super::{RepoError, RepoResult, NOW_MS_SQL};
use crate::model::category::{Category, CategoryPatch, NewCategory};
use crate::model::detail::CategoryDetail;
use crate::model::{EntityId, EntityKind};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const CATEGORY_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    name,
    created_at,
    updated_at
FROM categories";

/// Repository interface for category CRUD operations.
pub trait CategoryRepository {
    fn create_category(&self, input: &NewCategory) -> RepoResult<Category>;
    fn update_category(&self, id: EntityId, patch: &CategoryPatch) -> RepoResult<Category>;
    fn get_category(&self, id: EntityId) -> RepoResult<Option<Category>>;
    /// Loads a category with its owning user and its tasks.
    fn get_category_detail(&self, id: EntityId) -> RepoResult<Option<CategoryDetail>>;
    /// Lists all categories, or only those owned by `user_id`.
    ///
    /// A filter naming a missing user fails with `NotFound`.
    fn list_categories(&self, user_id: Option<EntityId>) -> RepoResult<Vec<Category>>;
    /// Same filter as `list_categories`, each category with its user and
    /// tasks.
    fn list_category_details(&self, user_id: Option<EntityId>) -> RepoResult<Vec<CategoryDetail>>;
    fn delete_category(&self, id: EntityId) -> RepoResult<()>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[&USERS, &CATEGORIES, &TASKS])?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn create_category(&self, input: &NewCategory) -> RepoResult<Category> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        require_exists(&tx, EntityKind::User, input.user_id)?;
        input.validate()?;

        tx.execute(
            "INSERT INTO categories (user_id, name) VALUES (?1, ?2);",
            params![input.user_id, input.name.as_str()],
        )
        .map_err(RepoError::write_rejected(EntityKind::Category))?;

        let category = load_required_category(&tx, tx.last_insert_rowid())?;
        tx.commit()?;
        Ok(category)
    }

    fn update_category(&self, id: EntityId, patch: &CategoryPatch) -> RepoResult<Category> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let current = load_required_category(&tx, id)?;
        let user_id = patch.user_id.unwrap_or(current.user_id);
        if user_id != current.user_id {
            require_exists(&tx, EntityKind::User, user_id)?;
        }
        patch.validate()?;

        let name = patch.name.as_deref().unwrap_or(current.name.as_str());
        tx.execute(
            &format!(
                "UPDATE categories
                 SET
                    user_id = ?2,
                    name = ?3,
                    updated_at = {NOW_MS_SQL}
                 WHERE id = ?1;"
            ),
            params![id, user_id, name],
        )
        .map_err(RepoError::write_rejected(EntityKind::Category))?;

        let category = load_required_category(&tx, id)?;
        tx.commit()?;
        Ok(category)
    }

    fn get_category(&self, id: EntityId) -> RepoResult<Option<Category>> {
        load_category(self.conn, id)
    }

    fn get_category_detail(&self, id: EntityId) -> RepoResult<Option<CategoryDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        let Some(category) = load_category(&tx, id)? else {
            return Ok(None);
        };
        let detail = category_detail(&tx, category)?;
        tx.commit()?;
        Ok(Some(detail))
    }

    fn list_categories(&self, user_id: Option<EntityId>) -> RepoResult<Vec<Category>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if let Some(user_id) = user_id {
            require_exists(&tx, EntityKind::User, user_id)?;
        }
        let categories = query_categories(&tx, user_id)?;
        tx.commit()?;
        Ok(categories)
    }

    fn list_category_details(
        &self,
        user_id: Option<EntityId>,
    ) -> RepoResult<Vec<CategoryDetail>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Deferred)?;
        if let Some(user_id) = user_id {
            require_exists(&tx, EntityKind::User, user_id)?;
        }
        let details = query_categories(&tx, user_id)?
            .into_iter()
            .map(|category| category_detail(&tx, category))
            .collect::<RepoResult<Vec<_>>>()?;
        tx.commit()?;
        Ok(details)
    }

    fn delete_category(&self, id: EntityId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute("DELETE FROM categories WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Category,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn load_category(conn: &Connection, id: EntityId) -> RepoResult<Option<Category>> {
    let category = conn
        .query_row(
            &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"),
            [id],
            |row| Ok(parse_category_row(row)),
        )
        .optional()?;
    category.transpose()
}

pub(crate) fn load_required_category(conn: &Connection, id: EntityId) -> RepoResult<Category> {
    load_category(conn, id)?.ok_or(RepoError::NotFound {
        kind: EntityKind::Category,
        id,
    })
}

fn category_detail(conn: &Connection, category: Category) -> RepoResult<CategoryDetail> {
    let user = load_required_user(conn, category.user_id)?;
    let tasks = query_tasks(conn, Some(category.id))?;
    Ok(CategoryDetail {
        category,
        user,
        tasks,
    })
}

pub(crate) fn query_categories(
    conn: &Connection,
    user_id: Option<EntityId>,
) -> RepoResult<Vec<Category>> {
    let mut stmt = conn.prepare(&format!(
        "{CATEGORY_SELECT_SQL}
         WHERE (?1 IS NULL OR user_id = ?1)
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([user_id])?;
    let mut categories = Vec::new();
    while let Some(row) = rows.next()? {
        categories.push(parse_category_row(row)?);
    }
    Ok(categories)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    Ok(Category {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
