//! Category use-case service.

use super::{required, run};
use crate::error::CoreResult;
use crate::model::category::{Category, CategoryPatch, NewCategory};
use crate::model::detail::CategoryDetail;
use crate::model::{EntityId, EntityKind};
use crate::repo::category_repo::CategoryRepository;

const KIND: EntityKind = EntityKind::Category;

/// Category service facade over repository implementations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a category; fails with `NotFound(User)` for an unknown owner.
    pub fn create_category(&self, input: &NewCategory) -> CoreResult<Category> {
        run("category_create", KIND, None, || {
            self.repo.create_category(input)
        })
    }

    pub fn get_category(&self, id: EntityId) -> CoreResult<Category> {
        run("category_get", KIND, Some(id), || self.repo.get_category(id))
            .and_then(|category| required(category, KIND))
    }

    /// Gets a category with its user and tasks.
    pub fn get_category_detail(&self, id: EntityId) -> CoreResult<CategoryDetail> {
        run("category_get_detail", KIND, Some(id), || {
            self.repo.get_category_detail(id)
        })
        .and_then(|detail| required(detail, KIND))
    }

    pub fn list_categories(&self) -> CoreResult<Vec<Category>> {
        run("category_list", KIND, None, || self.repo.list_categories(None))
    }

    /// Lists categories owned by `user_id`; fails when the user is missing.
    pub fn list_categories_for_user(&self, user_id: EntityId) -> CoreResult<Vec<Category>> {
        run("category_list_for_user", KIND, Some(user_id), || {
            self.repo.list_categories(Some(user_id))
        })
    }

    /// Lists every category with its user and tasks.
    pub fn list_category_details(&self) -> CoreResult<Vec<CategoryDetail>> {
        run("category_list_detail", KIND, None, || {
            self.repo.list_category_details(None)
        })
    }

    pub fn list_category_details_for_user(
        &self,
        user_id: EntityId,
    ) -> CoreResult<Vec<CategoryDetail>> {
        run("category_list_detail_for_user", KIND, Some(user_id), || {
            self.repo.list_category_details(Some(user_id))
        })
    }

    pub fn update_category(&self, id: EntityId, patch: &CategoryPatch) -> CoreResult<Category> {
        run("category_update", KIND, Some(id), || {
            self.repo.update_category(id, patch)
        })
    }

    pub fn delete_category(&self, id: EntityId) -> CoreResult<()> {
        run("category_delete", KIND, Some(id), || {
            self.repo.delete_category(id)
        })
    }
}
