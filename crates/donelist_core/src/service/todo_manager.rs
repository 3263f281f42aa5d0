//! Todo management use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls behind four capability groups:
//!   find, register, modify, clean up.
//! - Raise `NotFound` when an id-addressed operation matches no record.
//!
//! # Invariants
//! - Services hold no todo state of their own between calls.
//! - Service APIs never bypass repository validation/persistence contracts.

use crate::model::todo::{now_epoch_ms, Todo, TodoId, TodoIdGenerator, TodoValidationError};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// Service error for todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    /// Target todo does not exist.
    NotFound(TodoId),
    /// Input violates a model invariant.
    Validation(TodoValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TodoServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<TodoValidationError> for TodoServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Read capability: list and fetch todos.
pub trait TodoFind: Send + Sync {
    /// Returns every stored todo, ordered by creation time ascending.
    fn all(&self) -> ServiceResult<Vec<Todo>>;
    /// Returns one todo by id; fails with `NotFound` when unmatched.
    fn by_id(&self, id: TodoId) -> ServiceResult<Todo>;
}

/// Write capability: register new todos.
pub trait TodoRegistry: Send + Sync {
    /// Persists a new incomplete todo and returns its generated id.
    fn register(&self, text: &str) -> ServiceResult<TodoId>;
}

/// Write capability: replace the mutable fields of an existing todo.
pub trait TodoModification: Send + Sync {
    /// Fails with `NotFound` when no record matches `id`.
    fn modify(&self, id: TodoId, text: &str, completed: bool) -> ServiceResult<()>;
}

/// Cleanup capability: remove todos one at a time or in bulk.
pub trait TodoCleanup: Send + Sync {
    /// Deletes one todo by id; fails with `NotFound` when unmatched.
    fn clear(&self, id: TodoId) -> ServiceResult<()>;
    /// Deletes every completed todo and returns how many were removed.
    fn clear_all_completed(&self) -> ServiceResult<usize>;
}

/// Default manager implementing all four capability groups over a
/// repository and an identifier generator.
pub struct DefaultTodoManager<G: TodoIdGenerator, R: TodoRepository> {
    id_generator: G,
    repo: R,
}

impl<G: TodoIdGenerator, R: TodoRepository> DefaultTodoManager<G, R> {
    /// Creates a manager from the provided collaborators.
    pub fn new(id_generator: G, repo: R) -> Self {
        Self { id_generator, repo }
    }

    fn load_todo_by_id(&self, id: TodoId) -> ServiceResult<Todo> {
        self.repo
            .find_by_id(id)?
            .ok_or(TodoServiceError::NotFound(id))
    }
}

impl<G: TodoIdGenerator, R: TodoRepository> TodoFind for DefaultTodoManager<G, R> {
    fn all(&self) -> ServiceResult<Vec<Todo>> {
        let todos = self.repo.find_all_ordered_by_created_at()?;
        debug!("event=todo_list module=service status=ok count={}", todos.len());
        Ok(todos)
    }

    fn by_id(&self, id: TodoId) -> ServiceResult<Todo> {
        debug!("event=todo_get module=service id={id}");
        self.load_todo_by_id(id)
    }
}

impl<G: TodoIdGenerator, R: TodoRepository> TodoRegistry for DefaultTodoManager<G, R> {
    fn register(&self, text: &str) -> ServiceResult<TodoId> {
        let todo = Todo::new(self.id_generator.next_id(), text, now_epoch_ms())?;
        self.repo.save(&todo)?;
        debug!("event=todo_register module=service status=ok id={}", todo.id);
        Ok(todo.id)
    }
}

impl<G: TodoIdGenerator, R: TodoRepository> TodoModification for DefaultTodoManager<G, R> {
    fn modify(&self, id: TodoId, text: &str, completed: bool) -> ServiceResult<()> {
        let mut todo = self.load_todo_by_id(id)?;
        todo.update(text, completed);
        self.repo.save(&todo)?;
        debug!("event=todo_modify module=service status=ok id={id} completed={completed}");
        Ok(())
    }
}

impl<G: TodoIdGenerator, R: TodoRepository> TodoCleanup for DefaultTodoManager<G, R> {
    fn clear(&self, id: TodoId) -> ServiceResult<()> {
        let todo = self.load_todo_by_id(id)?;
        self.repo.delete(&todo)?;
        debug!("event=todo_clear module=service status=ok id={id}");
        Ok(())
    }

    fn clear_all_completed(&self) -> ServiceResult<usize> {
        let mut cleared = 0;
        for todo in self.repo.find_all_ordered_by_created_at()? {
            if todo.completed {
                self.repo.delete(&todo)?;
                cleared += 1;
            }
        }
        debug!("event=todo_clear_completed module=service status=ok cleared={cleared}");
        Ok(cleared)
    }
}
