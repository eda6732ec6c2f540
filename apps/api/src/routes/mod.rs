pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::layout::handlers as layout;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/process-cv",
            post(analysis::handle_process_cv).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/cv/layout", post(layout::handle_layout))
        .with_state(state)
}
