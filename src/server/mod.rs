//! HTTP server for predictions
//!
//! Thin transport over [`PredictionService`]: handlers move the blocking
//! pipeline onto the blocking pool and map [`PredictError`] to statuses.
//!
//! [`PredictError`]: crate::error::PredictError

mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::engine::PredictionService;
use crate::repository::FsRepository;

pub use handlers::{AppState, ErrorDetail, ErrorResponse, PredictRequest, SessionQuery};
pub use routes::api_routes;

/// Build the application with middleware applied
pub fn app(service: Arc<PredictionService<FsRepository>>, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::new(service));

    let mut app = api_routes()
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()));

    if config.cors.enabled {
        app = app.layer(cors_layer(&config.cors.allowed_origins));
    }
    if config.request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the HTTP prediction server
pub async fn start(service: Arc<PredictionService<FsRepository>>, config: ServerConfig) -> Result<()> {
    config.validate()?;
    let app = app(service.clone(), &config);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!(
        "Serving sessions from {}",
        service.repository().root().display()
    );
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /health - Health check");
    tracing::info!("  POST /api/predict/single?session_id=<id> - Predict one record");
    tracing::info!("  GET  /api/predict/features?session_id=<id> - Feature schema");
    tracing::info!("  GET  /api/predict/download-model?session_id=<id> - Raw model artifact");

    axum::serve(listener, app).await?;

    Ok(())
}
