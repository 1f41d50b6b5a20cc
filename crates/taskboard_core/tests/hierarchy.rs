use rusqlite::Connection;
use taskboard_core::db::{open_db_in_memory, store_counts, StoreCounts};
use taskboard_core::repo::category_repo::SqliteCategoryRepository;
use taskboard_core::repo::subtask_repo::SqliteSubtaskRepository;
use taskboard_core::repo::task_repo::SqliteTaskRepository;
use taskboard_core::repo::user_repo::SqliteUserRepository;
use taskboard_core::service::category_service::CategoryService;
use taskboard_core::service::subtask_service::SubtaskService;
use taskboard_core::service::task_service::TaskService;
use taskboard_core::service::user_service::UserService;
use taskboard_core::{
    CategoryPatch, CoreError, EntityId, EntityKind, NewCategory, NewSubtask, NewTask, NewUser,
    SubtaskPatch, TaskPatch,
};

struct Board<'conn> {
    users: UserService<SqliteUserRepository<'conn>>,
    categories: CategoryService<SqliteCategoryRepository<'conn>>,
    tasks: TaskService<SqliteTaskRepository<'conn>>,
    subtasks: SubtaskService<SqliteSubtaskRepository<'conn>>,
}

impl<'conn> Board<'conn> {
    fn new(conn: &'conn Connection) -> Self {
        Self {
            users: UserService::new(SqliteUserRepository::try_new(conn).unwrap()),
            categories: CategoryService::new(SqliteCategoryRepository::try_new(conn).unwrap()),
            tasks: TaskService::new(SqliteTaskRepository::try_new(conn).unwrap()),
            subtasks: SubtaskService::new(SqliteSubtaskRepository::try_new(conn).unwrap()),
        }
    }

    fn user(&self, email: &str) -> EntityId {
        self.users
            .create_user(&NewUser::new("Owner", email, "pw"))
            .unwrap()
            .id
    }

    fn category(&self, user_id: EntityId, name: &str) -> EntityId {
        self.categories
            .create_category(&NewCategory::new(user_id, name))
            .unwrap()
            .id
    }

    fn task(&self, category_id: EntityId, title: &str) -> EntityId {
        self.tasks
            .create_task(&NewTask::new(category_id, title))
            .unwrap()
            .id
    }

    fn subtask(&self, task_id: EntityId, title: &str) -> EntityId {
        self.subtasks
            .create_subtask(&NewSubtask::new(task_id, title))
            .unwrap()
            .id
    }
}

#[test]
fn category_with_missing_user_is_not_found_and_not_persisted() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let err = board
        .categories
        .create_category(&NewCategory::new(999, "Work"))
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityKind::User)));
    assert_eq!(store_counts(&conn).unwrap().categories, 0);
}

#[test]
fn missing_parent_wins_over_invalid_fields() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let err = board
        .tasks
        .create_task(&NewTask::new(999, ""))
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityKind::Category)));
}

#[test]
fn empty_category_name_is_validation_failure_on_name() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);
    let user_id = board.user("a@example.com");

    let err = board
        .categories
        .create_category(&NewCategory::new(user_id, ""))
        .unwrap_err();
    match err {
        CoreError::ValidationFailed(errors) => {
            assert!(errors.has_field("name"));
            assert!(errors
                .errors()
                .iter()
                .any(|error| error.message == "Category name cannot be empty"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store_counts(&conn).unwrap().categories, 0);
}

#[test]
fn embedded_nul_is_rejected_by_validation_before_the_store() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);
    let user_id = board.user("a@example.com");

    let err = board
        .categories
        .create_category(&NewCategory::new(user_id, "\0Work"))
        .unwrap_err();
    match err {
        CoreError::ValidationFailed(errors) => {
            assert!(errors.has_field("name"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store_counts(&conn).unwrap().categories, 0);

    let category_id = board.category(user_id, "Work");
    let task_id = board.task(category_id, "Ship");
    let patch = TaskPatch {
        title: Some("Ship\0it".to_string()),
        ..TaskPatch::default()
    };
    let err = board.tasks.update_task(task_id, &patch).unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed(ref errors) if errors.has_field("title")));
    assert_eq!(board.tasks.get_task(task_id).unwrap().title, "Ship");
}

#[test]
fn detail_lists_carry_associations_and_respect_parent_filter() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let ada = board.user("a@example.com");
    let bob = board.user("b@example.com");
    let work = board.category(ada, "Work");
    let home = board.category(bob, "Home");
    let ship = board.task(work, "Ship");
    board.task(home, "Dishes");
    let changelog = board.subtask(ship, "Changelog");

    let users = board.users.list_user_details().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].categories.len(), 1);
    assert_eq!(users[0].categories[0].id, work);

    let categories = board.categories.list_category_details_for_user(ada).unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].user.id, ada);
    assert_eq!(categories[0].tasks[0].id, ship);
    assert_eq!(board.categories.list_category_details().unwrap().len(), 2);

    let tasks = board.tasks.list_task_details_for_category(work).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].category.id, work);
    assert_eq!(tasks[0].subtasks[0].id, changelog);

    let subtasks = board.subtasks.list_subtask_details().unwrap();
    assert_eq!(subtasks.len(), 1);
    assert_eq!(subtasks[0].task.id, ship);

    assert!(matches!(
        board.tasks.list_task_details_for_category(999).unwrap_err(),
        CoreError::NotFound(EntityKind::Category)
    ));
    assert!(matches!(
        board.subtasks.list_subtask_details_for_task(999).unwrap_err(),
        CoreError::NotFound(EntityKind::Task)
    ));
    assert!(matches!(
        board.categories.list_category_details_for_user(999).unwrap_err(),
        CoreError::NotFound(EntityKind::User)
    ));
}

#[test]
fn title_length_is_counted_in_characters() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);
    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");

    let exactly_max = "é".repeat(200);
    board
        .tasks
        .create_task(&NewTask::new(category_id, exactly_max))
        .unwrap();

    let err = board
        .tasks
        .create_task(&NewTask::new(category_id, "é".repeat(201)))
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed(ref errors) if errors.has_field("title")));
}

#[test]
fn deleting_user_cascades_through_every_level() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");
    let task_id = board.task(category_id, "Ship");
    let subtask_id = board.subtask(task_id, "Write changelog");

    let other_user = board.user("b@example.com");
    let other_category = board.category(other_user, "Home");
    board.task(other_category, "Dishes");

    board.users.delete_user(user_id).unwrap();

    assert!(matches!(
        board.categories.get_category(category_id).unwrap_err(),
        CoreError::NotFound(EntityKind::Category)
    ));
    assert!(matches!(
        board.tasks.get_task(task_id).unwrap_err(),
        CoreError::NotFound(EntityKind::Task)
    ));
    assert!(matches!(
        board.subtasks.get_subtask(subtask_id).unwrap_err(),
        CoreError::NotFound(EntityKind::Subtask)
    ));
    assert_eq!(
        store_counts(&conn).unwrap(),
        StoreCounts {
            users: 1,
            categories: 1,
            tasks: 1,
            subtasks: 0,
        }
    );
}

#[test]
fn deleting_task_removes_only_its_subtasks() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");
    let doomed = board.task(category_id, "Doomed");
    let kept = board.task(category_id, "Kept");
    board.subtask(doomed, "a");
    board.subtask(doomed, "b");
    let kept_subtask = board.subtask(kept, "c");

    board.tasks.delete_task(doomed).unwrap();

    let remaining = board.subtasks.list_subtasks().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept_subtask);
}

#[test]
fn toggling_twice_yields_true_then_false() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");
    let task_id = board.task(category_id, "Ship");
    let subtask_id = board.subtask(task_id, "Tag release");

    assert!(!board.subtasks.get_subtask(subtask_id).unwrap().is_done);
    assert!(board.subtasks.toggle_subtask(subtask_id).unwrap().is_done);
    assert!(!board.subtasks.toggle_subtask(subtask_id).unwrap().is_done);

    assert!(matches!(
        board.subtasks.toggle_subtask(subtask_id + 100).unwrap_err(),
        CoreError::NotFound(EntityKind::Subtask)
    ));
}

#[test]
fn task_partial_update_keeps_absent_fields() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");
    let task_id = board.task(category_id, "Ship");

    let patch: TaskPatch = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
    let updated = board.tasks.update_task(task_id, &patch).unwrap();
    assert_eq!(updated.title, "Ship");
    assert_eq!(updated.category_id, category_id);
    assert_eq!(updated.description.as_deref(), Some("x"));

    let clear: TaskPatch = serde_json::from_str(r#"{"description": null}"#).unwrap();
    let cleared = board.tasks.update_task(task_id, &clear).unwrap();
    assert_eq!(cleared.description, None);
    assert_eq!(cleared.title, "Ship");
}

#[test]
fn task_can_be_reparented_to_existing_category_only() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let work = board.category(user_id, "Work");
    let home = board.category(user_id, "Home");
    let task_id = board.task(work, "Ship");

    let moved = board
        .tasks
        .update_task(
            task_id,
            &TaskPatch {
                category_id: Some(home),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(moved.category_id, home);
    assert_eq!(moved.title, "Ship");

    let err = board
        .tasks
        .update_task(
            task_id,
            &TaskPatch {
                category_id: Some(999),
                ..TaskPatch::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound(EntityKind::Category)));
    assert_eq!(board.tasks.get_task(task_id).unwrap().category_id, home);
}

#[test]
fn category_rename_and_reparent() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let ada = board.user("a@example.com");
    let bob = board.user("b@example.com");
    let category_id = board.category(ada, "Work");

    let updated = board
        .categories
        .update_category(
            category_id,
            &CategoryPatch {
                user_id: Some(bob),
                name: Some("Projects".to_string()),
            },
        )
        .unwrap();
    assert_eq!(updated.user_id, bob);
    assert_eq!(updated.name, "Projects");

    let err = board
        .categories
        .update_category(
            category_id,
            &CategoryPatch {
                user_id: None,
                name: Some(" ".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed(_)));
}

#[test]
fn subtask_falsy_patch_values_replace_stored_values() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");
    let task_id = board.task(category_id, "Ship");
    let subtask_id = board.subtask(task_id, "Tag release");
    board.subtasks.toggle_subtask(subtask_id).unwrap();

    let patch: SubtaskPatch = serde_json::from_str(r#"{"is_done": false}"#).unwrap();
    let updated = board.subtasks.update_subtask(subtask_id, &patch).unwrap();
    assert!(!updated.is_done);
    assert_eq!(updated.title, "Tag release");

    let empty_title: SubtaskPatch = serde_json::from_str(r#"{"title": ""}"#).unwrap();
    let err = board
        .subtasks
        .update_subtask(subtask_id, &empty_title)
        .unwrap_err();
    assert!(matches!(err, CoreError::ValidationFailed(ref errors) if errors.has_field("title")));
}

#[test]
fn parent_scoped_lists_filter_and_require_parent() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let ada = board.user("a@example.com");
    let bob = board.user("b@example.com");
    let work = board.category(ada, "Work");
    board.category(bob, "Home");
    let task_id = board.task(work, "Ship");

    let adas = board.categories.list_categories_for_user(ada).unwrap();
    assert_eq!(adas.len(), 1);
    assert_eq!(adas[0].id, work);
    assert_eq!(board.categories.list_categories().unwrap().len(), 2);

    let empty_user = board.user("c@example.com");
    assert!(board
        .categories
        .list_categories_for_user(empty_user)
        .unwrap()
        .is_empty());

    assert!(matches!(
        board.categories.list_categories_for_user(999).unwrap_err(),
        CoreError::NotFound(EntityKind::User)
    ));
    assert!(matches!(
        board.tasks.list_tasks_for_category(999).unwrap_err(),
        CoreError::NotFound(EntityKind::Category)
    ));
    assert!(matches!(
        board.subtasks.list_subtasks_for_task(999).unwrap_err(),
        CoreError::NotFound(EntityKind::Task)
    ));
    assert!(board
        .subtasks
        .list_subtasks_for_task(task_id)
        .unwrap()
        .is_empty());
}

#[test]
fn detail_reads_include_parent_and_children() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    let user_id = board.user("a@example.com");
    let category_id = board.category(user_id, "Work");
    let task_id = board.task(category_id, "Ship");
    let first = board.subtask(task_id, "one");
    let second = board.subtask(task_id, "two");

    let user = board.users.get_user_detail(user_id).unwrap();
    assert_eq!(user.categories.len(), 1);

    let category = board.categories.get_category_detail(category_id).unwrap();
    assert_eq!(category.user.id, user_id);
    assert_eq!(category.tasks.len(), 1);

    let task = board.tasks.get_task_detail(task_id).unwrap();
    assert_eq!(task.category.id, category_id);
    let subtask_ids: Vec<EntityId> = task.subtasks.iter().map(|subtask| subtask.id).collect();
    assert_eq!(subtask_ids, vec![first, second]);

    let subtask = board.subtasks.get_subtask_detail(second).unwrap();
    assert_eq!(subtask.task.id, task_id);

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["title"], "Ship");
    assert_eq!(json["category"]["name"], "Work");
}

#[test]
fn deleting_missing_child_entities_reports_their_kind() {
    let conn = open_db_in_memory().unwrap();
    let board = Board::new(&conn);

    assert!(matches!(
        board.categories.delete_category(1).unwrap_err(),
        CoreError::NotFound(EntityKind::Category)
    ));
    assert!(matches!(
        board.tasks.delete_task(1).unwrap_err(),
        CoreError::NotFound(EntityKind::Task)
    ));
    assert!(matches!(
        board.subtasks.delete_subtask(1).unwrap_err(),
        CoreError::NotFound(EntityKind::Subtask)
    ));
}
