//! User use-case service.

use super::{required, run};
use crate::error::CoreResult;
use crate::model::detail::UserDetail;
use crate::model::user::{NewUser, User, UserPatch};
use crate::model::{EntityId, EntityKind};
use crate::repo::user_repo::UserRepository;

const KIND: EntityKind = EntityKind::User;

/// User service facade over repository implementations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a user. A duplicate email fails with `Conflict`.
    pub fn create_user(&self, input: &NewUser) -> CoreResult<User> {
        run("user_create", KIND, None, || self.repo.create_user(input))
    }

    pub fn get_user(&self, id: EntityId) -> CoreResult<User> {
        run("user_get", KIND, Some(id), || self.repo.get_user(id))
            .and_then(|user| required(user, KIND))
    }

    /// Gets a user with its categories.
    pub fn get_user_detail(&self, id: EntityId) -> CoreResult<UserDetail> {
        run("user_get_detail", KIND, Some(id), || {
            self.repo.get_user_detail(id)
        })
        .and_then(|detail| required(detail, KIND))
    }

    pub fn list_users(&self) -> CoreResult<Vec<User>> {
        run("user_list", KIND, None, || self.repo.list_users())
    }

    /// Lists every user with its categories.
    pub fn list_user_details(&self) -> CoreResult<Vec<UserDetail>> {
        run("user_list_detail", KIND, None, || self.repo.list_user_details())
    }

    /// Applies a partial update; absent fields keep their stored value.
    pub fn update_user(&self, id: EntityId, patch: &UserPatch) -> CoreResult<User> {
        run("user_update", KIND, Some(id), || {
            self.repo.update_user(id, patch)
        })
    }

    /// Deletes a user and, transitively, everything it owns.
    pub fn delete_user(&self, id: EntityId) -> CoreResult<()> {
        run("user_delete", KIND, Some(id), || self.repo.delete_user(id))
    }
}
