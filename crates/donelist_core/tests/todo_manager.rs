use donelist_core::db::open_db_in_memory;
use donelist_core::{
    DefaultTodoManager, RandomTodoIdGenerator, SqliteTodoRepository, TodoCleanup, TodoFind,
    TodoId, TodoModification, TodoRegistry, TodoServiceError, TransactionalTodoManager,
};
use std::sync::Arc;
use uuid::Uuid;

fn manager() -> DefaultTodoManager<RandomTodoIdGenerator, SqliteTodoRepository> {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(conn).unwrap();
    DefaultTodoManager::new(RandomTodoIdGenerator, repo)
}

fn register_all(registry: &impl TodoRegistry, texts: &[&str]) -> Vec<TodoId> {
    texts
        .iter()
        .map(|text| registry.register(text).unwrap())
        .collect()
}

#[test]
fn lists_all_registered_todos_in_registration_order() {
    let manager = manager();
    register_all(&manager, &["one", "two", "three"]);

    let all = manager.all().unwrap();
    assert_eq!(all.len(), 3);
    let texts: Vec<_> = all.iter().map(|todo| todo.text.as_str()).collect();
    assert_eq!(texts, ["one", "two", "three"]);
}

#[test]
fn finds_one_todo_by_id() {
    let manager = manager();
    let id = register_all(&manager, &["one"])[0];

    let todo = manager.by_id(id).unwrap();
    assert_eq!(todo.id, id);
    assert_eq!(todo.text, "one");
    assert!(!todo.completed);
    assert!(todo.created_at > 0);
}

#[test]
fn by_id_fails_for_unknown_id() {
    let manager = manager();

    let unknown = Uuid::new_v4();
    let err = manager.by_id(unknown).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == unknown));
}

#[test]
fn registers_then_modifies_a_todo() {
    let manager = manager();

    let id = manager.register("a").unwrap();
    let registered = manager.by_id(id).unwrap();
    assert_eq!(registered.text, "a");
    assert!(!registered.completed);

    manager.modify(id, "b", true).unwrap();

    let modified = manager.by_id(id).unwrap();
    assert_eq!(modified.text, "b");
    assert!(modified.completed);
    assert_eq!(modified.id, registered.id);
    assert_eq!(modified.created_at, registered.created_at);
}

#[test]
fn register_rejects_blank_text() {
    let manager = manager();

    let err = manager.register("   ").unwrap_err();
    assert!(matches!(err, TodoServiceError::Validation(_)));
    assert!(manager.all().unwrap().is_empty());
}

#[test]
fn modify_unknown_id_fails_not_found() {
    let manager = manager();

    let unknown = Uuid::new_v4();
    let err = manager.modify(unknown, "anything", false).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(id) if id == unknown));
}

#[test]
fn cleared_todo_is_gone() {
    let manager = manager();

    let id = manager.register("short lived").unwrap();
    manager.clear(id).unwrap();

    let err = manager.by_id(id).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(found) if found == id));
}

#[test]
fn clear_unknown_id_fails_not_found() {
    let manager = manager();

    let err = manager.clear(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(_)));
}

#[test]
fn clear_all_completed_removes_only_completed_todos() {
    let manager = manager();

    manager.register("one").unwrap();
    for id in register_all(&manager, &["two", "three"]) {
        let todo = manager.by_id(id).unwrap();
        manager.modify(todo.id, &todo.text, true).unwrap();
    }

    let cleared = manager.clear_all_completed().unwrap();
    assert_eq!(cleared, 2);

    let remaining = manager.all().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].text, "one");
    assert!(!remaining[0].completed);
}

#[test]
fn clear_all_completed_is_a_noop_without_completed_todos() {
    let manager = manager();
    register_all(&manager, &["one", "two"]);

    let cleared = manager.clear_all_completed().unwrap();
    assert_eq!(cleared, 0);
    assert_eq!(manager.all().unwrap().len(), 2);
}

#[test]
fn transactional_wrapper_forwards_all_capabilities() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(conn).unwrap();
    let inner = Arc::new(DefaultTodoManager::new(RandomTodoIdGenerator, repo));
    let manager = TransactionalTodoManager::from_manager(inner);

    let id = manager.register("through the wrapper").unwrap();
    manager.modify(id, "still through", true).unwrap();

    let todo = manager.by_id(id).unwrap();
    assert_eq!(todo.text, "still through");
    assert!(todo.completed);

    assert_eq!(manager.clear_all_completed().unwrap(), 1);
    assert!(manager.all().unwrap().is_empty());

    let err = manager.clear(id).unwrap_err();
    assert!(matches!(err, TodoServiceError::NotFound(found) if found == id));
}
