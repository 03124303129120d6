pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::library::handlers as library;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation
        .route(
            "/api/v1/pitches/generate",
            post(generation::handle_generate),
        )
        .route("/api/v1/pitches/extract", post(generation::handle_extract))
        // Library
        .route("/api/v1/pitches", get(library::handle_list_pitches))
        .route(
            "/api/v1/pitches/:id",
            get(library::handle_get_pitch).delete(library::handle_delete_pitch),
        )
        .route(
            "/api/v1/pitches/:id/preview",
            get(library::handle_preview_pitch),
        )
        .with_state(state)
}
