//! Server entry point: configuration, wiring, and serving.
//!
//! # Responsibility
//! - Read process configuration from environment variables.
//! - Build the identifier generator, repository, and manager once at
//!   startup and hand them to the routing layer.

use donelist_core::db::{open_db, open_db_in_memory};
use donelist_core::{
    default_log_level, init_logging, DefaultTodoManager, RandomTodoIdGenerator,
    SqliteTodoRepository, TransactionalTodoManager,
};
use donelist_server::{build_router, AppState};
use log::info;
use std::env;
use std::sync::Arc;

fn env_str(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn default_log_dir() -> String {
    env::temp_dir()
        .join("donelist")
        .join("logs")
        .to_string_lossy()
        .into_owned()
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("donelist_server: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let level = env_str("DONELIST_LOG_LEVEL", default_log_level());
    let log_dir = env_str("DONELIST_LOG_DIR", &default_log_dir());
    init_logging(&level, &log_dir)?;

    let db_path = env_str("DONELIST_DB_PATH", "donelist.sqlite3");
    let conn = if db_path == ":memory:" {
        open_db_in_memory()
    } else {
        open_db(&db_path)
    }
    .map_err(|err| format!("failed to open database `{db_path}`: {err}"))?;

    let repo = SqliteTodoRepository::try_new(conn)
        .map_err(|err| format!("repository bootstrap failed: {err}"))?;
    let manager = Arc::new(DefaultTodoManager::new(RandomTodoIdGenerator, repo));
    let state = AppState::new(TransactionalTodoManager::from_manager(manager));
    let app = build_router(state);

    let bind_addr = env_str("DONELIST_BIND_ADDR", "127.0.0.1:8080");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| format!("failed to bind `{bind_addr}`: {err}"))?;

    info!(
        "event=server_start module=server status=ok addr={bind_addr} db={db_path} version={}",
        env!("CARGO_PKG_VERSION")
    );

    axum::serve(listener, app)
        .await
        .map_err(|err| format!("server terminated: {err}"))
}
