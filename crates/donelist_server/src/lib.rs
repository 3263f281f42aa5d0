//! HTTP surface for the donelist todo service.
//!
//! # Responsibility
//! - Map HTTP routes onto the core manager capabilities.
//! - Translate service errors into client/server error responses.
//!
//! # Invariants
//! - Handlers never touch the repository directly; every call goes through
//!   the transactional manager handed to `AppState`.

use axum::routing::get;
use axum::Router;
use donelist_core::TransactionalTodoManager;
use std::sync::Arc;

pub mod error;
pub mod handlers;
pub mod page;

pub use error::{ApiError, ApiResult};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Todo manager behind the transactional boundary.
    pub manager: Arc<TransactionalTodoManager>,
}

impl AppState {
    /// Wraps an already wired manager.
    pub fn new(manager: TransactionalTodoManager) -> Self {
        Self {
            manager: Arc::new(manager),
        }
    }
}

/// Builds the application router over the provided state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index_handler))
        .route("/healthz", get(handlers::healthz_handler))
        .route(
            "/todos",
            get(handlers::list_todos_handler)
                .post(handlers::create_todo_handler)
                .delete(handlers::clear_completed_handler),
        )
        .route(
            "/todos/:id",
            get(handlers::get_todo_handler)
                .put(handlers::update_todo_handler)
                .delete(handlers::delete_todo_handler),
        )
        .with_state(state)
}
