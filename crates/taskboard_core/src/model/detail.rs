//! Read models that embed an entity's parent and direct children.
//!
//! The entity's own fields are flattened so a detail serializes as the
//! entity object plus association keys.

use super::category::Category;
use super::subtask::Subtask;
use super::task::Task;
use super::user::User;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub user: User,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    pub category: Category,
    pub subtasks: Vec<Subtask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubtaskDetail {
    #[serde(flatten)]
    pub subtask: Subtask,
    pub task: Task,
}
