use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

pub mod handlers;
pub mod state;

pub use state::AppState;

pub async fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/api/models", get(handlers::list_models))
        .route("/api/analyze", post(handlers::analyze_image))
        .route("/api/prescriptions", post(handlers::create_prescription))
        .layer(cors)
        .with_state(Arc::new(state))
}
