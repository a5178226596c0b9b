//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    create_transfer_handler, health_handler, set_member_group_handler, upsert_member_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub server_deps: Arc<ServerDeps>,
}

/// Build the Axum application router
pub fn build_app(server_deps: ServerDeps) -> Router {
    let app_state = AppState {
        server_deps: Arc::new(server_deps),
    };

    let management = Router::new()
        .route("/members", post(upsert_member_handler))
        .route("/members/group", post(set_member_group_handler))
        .route("/transfers/new", post(create_transfer_handler));

    Router::new()
        .nest("/api/v2/management", management)
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(TraceLayer::new_for_http())
}
