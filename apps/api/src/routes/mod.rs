pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route(
            "/api/generate",
            post(generation::handle_generate).fallback(generation::handle_generate_other_method),
        )
        .route("/api/options", get(generation::handle_options))
        // Preview
        .route("/api/preview", post(render::handle_preview))
        // Export
        .route("/api/export/html", post(export::handle_export_html))
        .route("/api/export/snippet", post(export::handle_export_snippet))
        .route(
            "/api/export/sections/:section",
            post(export::handle_export_section),
        )
        .with_state(state)
}
