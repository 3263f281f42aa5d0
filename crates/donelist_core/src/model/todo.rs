//! Todo domain model and identifier generation.
//!
//! # Responsibility
//! - Define the canonical todo record shared by repository and services.
//! - Provide identifier generation behind a small trait seam.
//!
//! # Invariants
//! - `id` is stable and never reused for another todo.
//! - `text` is never empty or whitespace-only.
//! - `created_at` is assigned once at registration and never changes.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for a todo record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = Uuid;

/// Validation error for todo records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    /// `text` is empty or whitespace-only.
    EmptyText,
    /// `id` is the nil UUID.
    NilId,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text must not be empty"),
            Self::NilId => write!(f, "todo id must not be the nil uuid"),
        }
    }
}

impl Error for TodoValidationError {}

/// Canonical todo record.
///
/// The wire shape is `{id, text, completed, createdDate}`; only the
/// creation timestamp needs a serde rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable global ID assigned at registration.
    pub id: TodoId,
    /// Task description. Never empty.
    pub text: String,
    /// Completion flag. Starts as `false`, reversible.
    pub completed: bool,
    /// Creation time in Unix epoch milliseconds. Immutable.
    #[serde(rename = "createdDate")]
    pub created_at: i64,
}

impl Todo {
    /// Creates a new incomplete todo with the given identity and timestamp.
    ///
    /// # Errors
    /// - `TodoValidationError::EmptyText` when `text` is blank.
    /// - `TodoValidationError::NilId` when `id` is nil.
    pub fn new(
        id: TodoId,
        text: impl Into<String>,
        created_at: i64,
    ) -> Result<Self, TodoValidationError> {
        let todo = Self {
            id,
            text: text.into(),
            completed: false,
            created_at,
        };
        todo.validate()?;
        Ok(todo)
    }

    /// Replaces the mutable fields, keeping identity and creation time.
    pub fn update(&mut self, text: impl Into<String>, completed: bool) {
        self.text = text.into();
        self.completed = completed;
    }

    /// Checks model invariants. Write paths must call this before SQL.
    pub fn validate(&self) -> Result<(), TodoValidationError> {
        if self.id.is_nil() {
            return Err(TodoValidationError::NilId);
        }
        if self.text.trim().is_empty() {
            return Err(TodoValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Identifier source for newly registered todos.
pub trait TodoIdGenerator: Send + Sync {
    /// Returns a fresh identifier with negligible collision probability.
    fn next_id(&self) -> TodoId;
}

/// Default generator backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTodoIdGenerator;

impl TodoIdGenerator for RandomTodoIdGenerator {
    fn next_id(&self) -> TodoId {
        Uuid::new_v4()
    }
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clamps to 0 for clocks set before the epoch instead of panicking.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
