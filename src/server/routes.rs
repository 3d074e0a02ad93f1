//! Route definitions

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{download_model, features, health, predict_single, AppState};

/// Create the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health check
        .route("/health", get(health))
        .nest("/api/predict", predict_routes())
}

fn predict_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/single", post(predict_single))
        .route("/features", get(features))
        .route("/download-model", get(download_model))
}
