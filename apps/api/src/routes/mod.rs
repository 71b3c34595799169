pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::form::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/health", get(health::health_handler))
        // Form API
        .route("/api/v1/form/config", get(handlers::handle_form_config))
        .route("/api/v1/form/progress", post(handlers::handle_progress))
        .route("/api/v1/form/submit", post(handlers::handle_submit))
        // Package downloads
        .route("/api/v1/packages/:id", get(handlers::handle_download))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
