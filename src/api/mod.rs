//! HTTP API layer
//!
//! Thin axum adapter over the analyze use case and the result repository.

mod dto;
mod error;
mod handlers;
mod state;

pub use dto::{AnalysisResponse, HealthResponse};
pub use error::ApiError;
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the router with all routes and layers attached
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = Router::new()
        .route(
            "/analyze",
            get(handlers::analyze_query).post(handlers::analyze_body),
        )
        .route("/analyze/batch", post(handlers::analyze_batch))
        .route("/analyses/:id", get(handlers::get_analysis));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/v1", v1)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
