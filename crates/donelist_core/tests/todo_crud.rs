use donelist_core::db::migrations::latest_version;
use donelist_core::db::open_db_in_memory;
use donelist_core::{RepoError, SqliteTodoRepository, Todo, TodoRepository};
use rusqlite::Connection;
use uuid::Uuid;

fn ready_repo() -> SqliteTodoRepository {
    let conn = open_db_in_memory().unwrap();
    SqliteTodoRepository::try_new(conn).unwrap()
}

fn todo_with_fixed_id(id: &str, text: &str, created_at: i64) -> Todo {
    Todo::new(Uuid::parse_str(id).unwrap(), text, created_at).unwrap()
}

#[test]
fn save_and_find_roundtrip() {
    let repo = ready_repo();

    let todo = Todo::new(Uuid::new_v4(), "first todo", 1_700_000_000_000).unwrap();
    repo.save(&todo).unwrap();

    let loaded = repo.find_by_id(todo.id).unwrap().unwrap();
    assert_eq!(loaded, todo);
}

#[test]
fn find_by_id_returns_none_for_unknown_id() {
    let repo = ready_repo();

    assert!(repo.find_by_id(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn save_upserts_existing_record_in_place() {
    let repo = ready_repo();

    let mut todo = Todo::new(Uuid::new_v4(), "draft", 1_700_000_000_000).unwrap();
    repo.save(&todo).unwrap();

    todo.update("final wording", true);
    repo.save(&todo).unwrap();

    let all = repo.find_all_ordered_by_created_at().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].text, "final wording");
    assert!(all[0].completed);
}

#[test]
fn save_conflict_keeps_original_creation_time() {
    let repo = ready_repo();

    let mut todo = Todo::new(Uuid::new_v4(), "stable", 1_000).unwrap();
    repo.save(&todo).unwrap();

    todo.created_at = 9_999;
    todo.update("still stable", false);
    repo.save(&todo).unwrap();

    let loaded = repo.find_by_id(todo.id).unwrap().unwrap();
    assert_eq!(loaded.created_at, 1_000);
    assert_eq!(loaded.text, "still stable");
}

#[test]
fn save_rejects_blank_text() {
    let repo = ready_repo();

    let mut todo = Todo::new(Uuid::new_v4(), "valid", 0).unwrap();
    todo.text = "  ".to_string();

    let err = repo.save(&todo).unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_removes_record() {
    let repo = ready_repo();

    let todo = Todo::new(Uuid::new_v4(), "short lived", 0).unwrap();
    repo.save(&todo).unwrap();
    repo.delete(&todo).unwrap();

    assert!(repo.find_by_id(todo.id).unwrap().is_none());
    assert!(repo.find_all_ordered_by_created_at().unwrap().is_empty());
}

#[test]
fn delete_missing_returns_not_found() {
    let repo = ready_repo();

    let todo = Todo::new(Uuid::new_v4(), "never saved", 0).unwrap();
    let err = repo.delete(&todo).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == todo.id));
}

#[test]
fn find_all_orders_by_created_at_ascending() {
    let repo = ready_repo();

    let newest = todo_with_fixed_id("00000000-0000-4000-8000-000000000003", "newest", 3_000);
    let oldest = todo_with_fixed_id("00000000-0000-4000-8000-000000000001", "oldest", 1_000);
    let middle = todo_with_fixed_id("00000000-0000-4000-8000-000000000002", "middle", 2_000);
    repo.save(&newest).unwrap();
    repo.save(&oldest).unwrap();
    repo.save(&middle).unwrap();

    let all = repo.find_all_ordered_by_created_at().unwrap();
    let texts: Vec<_> = all.iter().map(|todo| todo.text.as_str()).collect();
    assert_eq!(texts, ["oldest", "middle", "newest"]);
}

#[test]
fn find_all_breaks_created_at_ties_by_insertion_order() {
    let repo = ready_repo();

    let first = todo_with_fixed_id("00000000-0000-4000-8000-00000000000f", "first", 1_000);
    let second = todo_with_fixed_id("00000000-0000-4000-8000-000000000001", "second", 1_000);
    repo.save(&first).unwrap();
    repo.save(&second).unwrap();

    let all = repo.find_all_ordered_by_created_at().unwrap();
    let texts: Vec<_> = all.iter().map(|todo| todo.text.as_str()).collect();
    assert_eq!(texts, ["first", "second"]);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteTodoRepository::try_new(conn);
    match result {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_required_todos_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredTable("todos"))
    ));
}

#[test]
fn repository_rejects_connection_missing_required_todos_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            uuid TEXT PRIMARY KEY NOT NULL,
            text TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteTodoRepository::try_new(conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "todos",
            column: "completed"
        })
    ));
}

#[test]
fn repository_rejects_corrupt_completed_value_on_read() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO todos (uuid, text, completed, created_at)
         VALUES ('00000000-0000-4000-8000-0000000000aa', 'corrupt', 7, 0);",
        [],
    )
    .unwrap();
    let repo = SqliteTodoRepository::try_new(conn).unwrap();

    let err = repo.find_all_ordered_by_created_at().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
