//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable persistence APIs over the `todos` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Todo::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - List order is `created_at ASC`, ties broken by insertion order.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

const TODO_SELECT_SQL: &str = "SELECT
    uuid,
    text,
    completed,
    created_at
FROM todos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TodoValidationError),
    Db(DbError),
    NotFound(TodoId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TodoValidationError> for RepoError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for todo storage.
pub trait TodoRepository: Send + Sync {
    /// Lists every stored todo, ordered by creation time ascending.
    fn find_all_ordered_by_created_at(&self) -> RepoResult<Vec<Todo>>;
    /// Gets one todo by id, `None` when absent.
    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<Todo>>;
    /// Upserts one todo: replaces the record with the same id, else appends.
    fn save(&self, todo: &Todo) -> RepoResult<()>;
    /// Removes the matching record; `NotFound` when no row matches.
    fn delete(&self, todo: &Todo) -> RepoResult<()>;
}

/// SQLite-backed todo repository.
///
/// Owns the connection behind a mutex so one repository instance can be
/// built at startup and shared across request handlers.
#[derive(Clone)]
pub struct SqliteTodoRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTodoRepository {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// Fails when the connection has not been migrated or the `todos`
    /// table shape does not match this binary.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock only means a panic elsewhere; the connection
        // itself is still usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TodoRepository for SqliteTodoRepository {
    fn find_all_ordered_by_created_at(&self) -> RepoResult<Vec<Todo>> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare(&format!("{TODO_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn find_by_id(&self, id: TodoId) -> RepoResult<Option<Todo>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!("{TODO_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }

        Ok(None)
    }

    fn save(&self, todo: &Todo) -> RepoResult<()> {
        todo.validate()?;

        // created_at is immutable: the conflict arm intentionally leaves it
        // (and the rowid, which anchors tie-break ordering) untouched.
        self.lock().execute(
            "INSERT INTO todos (uuid, text, completed, created_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (uuid) DO UPDATE SET
                text = excluded.text,
                completed = excluded.completed;",
            params![
                todo.id.to_string(),
                todo.text.as_str(),
                bool_to_int(todo.completed),
                todo.created_at,
            ],
        )?;

        Ok(())
    }

    fn delete(&self, todo: &Todo) -> RepoResult<()> {
        let changed = self.lock().execute(
            "DELETE FROM todos WHERE uuid = ?1;",
            [todo.id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(todo.id));
        }

        Ok(())
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in todos.uuid"))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid completed value `{other}` in todos.completed"
            )));
        }
    };

    let todo = Todo {
        id,
        text: row.get("text")?,
        completed,
        created_at: row.get("created_at")?,
    };
    todo.validate()?;
    Ok(todo)
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "todos")? {
        return Err(RepoError::MissingRequiredTable("todos"));
    }

    for column in ["uuid", "text", "completed", "created_at"] {
        if !table_has_column(conn, "todos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todos",
                column,
            });
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
