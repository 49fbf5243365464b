//! Level-control endpoint.
//!
//! # Routes
//! - `GET /loglevel` → `{"level":"info"}`
//! - `PUT|POST /loglevel` with `{"level":"warn"}`, `level=warn` (form) or
//!   `?level=warn` → `{"level":"warn"}`; unknown names → 400, gate untouched
//!
//! # Design Decisions
//! - Binding is separate from serving so a bind failure reaches the caller
//!   as a value; the composition root decides whether it is fatal
//! - The endpoint holds the same `Arc<LevelGate>` the logger reads

pub mod handlers;
pub mod server;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use self::handlers::{get_level, set_level};

pub use handlers::AdminState;
pub use server::{AdminError, AdminHandle, AdminServer};

/// Path of the level-control resource.
pub const LEVEL_PATH: &str = "/loglevel";

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route(LEVEL_PATH, get(get_level).put(set_level).post(set_level))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
