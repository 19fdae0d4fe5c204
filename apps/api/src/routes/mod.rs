pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::fitting::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Themes API
        .route("/api/v1/themes", get(handlers::handle_list_themes))
        .route("/api/v1/themes/:id", get(handlers::handle_get_theme))
        // Fitting API
        .route("/api/v1/fit", post(handlers::handle_fit))
        .route("/api/v1/fit/report", post(handlers::handle_fit_report))
        .route("/api/v1/fit/compare", post(handlers::handle_fit_compare))
        .with_state(state)
}
