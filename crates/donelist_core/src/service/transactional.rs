//! Transaction-boundary wrapper over the four todo capabilities.
//!
//! # Responsibility
//! - Forward find/register/modify/cleanup calls to an underlying
//!   implementation.
//! - Pin the place where a compound operation would commit or roll back
//!   atomically.
//!
//! # Invariants
//! - The wrapper adds no behavior of its own in this version; every
//!   operation performs at most one write, so the boundary is a pass-through.

use crate::model::todo::{Todo, TodoId};
use crate::service::todo_manager::{
    ServiceResult, TodoCleanup, TodoFind, TodoModification, TodoRegistry,
};
use std::sync::Arc;

/// Pass-through decorator holding the four capability groups.
pub struct TransactionalTodoManager {
    find: Arc<dyn TodoFind>,
    registry: Arc<dyn TodoRegistry>,
    modification: Arc<dyn TodoModification>,
    cleanup: Arc<dyn TodoCleanup>,
}

impl TransactionalTodoManager {
    /// Wraps independently supplied capability implementations.
    pub fn new(
        find: Arc<dyn TodoFind>,
        registry: Arc<dyn TodoRegistry>,
        modification: Arc<dyn TodoModification>,
        cleanup: Arc<dyn TodoCleanup>,
    ) -> Self {
        Self {
            find,
            registry,
            modification,
            cleanup,
        }
    }

    /// Wraps one implementation that provides all four capabilities.
    pub fn from_manager<M>(manager: Arc<M>) -> Self
    where
        M: TodoFind + TodoRegistry + TodoModification + TodoCleanup + 'static,
    {
        Self::new(
            manager.clone(),
            manager.clone(),
            manager.clone(),
            manager,
        )
    }
}

impl TodoFind for TransactionalTodoManager {
    fn all(&self) -> ServiceResult<Vec<Todo>> {
        self.find.all()
    }

    fn by_id(&self, id: TodoId) -> ServiceResult<Todo> {
        self.find.by_id(id)
    }
}

impl TodoRegistry for TransactionalTodoManager {
    fn register(&self, text: &str) -> ServiceResult<TodoId> {
        self.registry.register(text)
    }
}

impl TodoModification for TransactionalTodoManager {
    fn modify(&self, id: TodoId, text: &str, completed: bool) -> ServiceResult<()> {
        self.modification.modify(id, text, completed)
    }
}

impl TodoCleanup for TransactionalTodoManager {
    fn clear(&self, id: TodoId) -> ServiceResult<()> {
        self.cleanup.clear(id)
    }

    fn clear_all_completed(&self) -> ServiceResult<usize> {
        self.cleanup.clear_all_completed()
    }
}
