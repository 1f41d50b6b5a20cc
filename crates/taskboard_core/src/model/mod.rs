//! Domain model for the user → category → task → subtask hierarchy.
//!
//! # Responsibility
//! - Define read models returned to callers and input/patch models accepted
//!   from callers.
//! - Own per-field validation rules for every input model.
//!
//! # Invariants
//! - Every entity is identified by a store-assigned integer `EntityId`.
//! - Read models never carry a user password.
//! - Patch fields distinguish "absent" from "present with a falsy value".

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};

pub mod category;
pub mod detail;
pub mod subtask;
pub mod task;
pub mod user;
pub mod validation;

/// Store-assigned surrogate primary key shared by all entities.
pub type EntityId = i64;

/// Entity type discriminator used for existence checks and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Category,
    Task,
    Subtask,
}

impl EntityKind {
    /// Human-facing singular name, e.g. `"Category"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Category => "Category",
            Self::Task => "Task",
            Self::Subtask => "Subtask",
        }
    }

    /// Backing table name.
    pub fn table(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Category => "categories",
            Self::Task => "tasks",
            Self::Subtask => "subtasks",
        }
    }

    /// Owning entity kind; `None` for the root (`User`).
    pub fn parent(self) -> Option<EntityKind> {
        match self {
            Self::User => None,
            Self::Category => Some(Self::User),
            Self::Task => Some(Self::Category),
            Self::Subtask => Some(Self::Task),
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Deserializes a present field (including `null`) as `Some(..)`.
///
/// Paired with `#[serde(default)]` so an absent field stays `None`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
