//! HTTP server command

use std::sync::Arc;

use anyhow::Result;

use super::build_service;
use crate::config::ServiceConfig;
use crate::server;

/// Start the prediction server
pub async fn serve(mut config: ServiceConfig, port: Option<u16>, host: Option<String>) -> Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }
    if let Some(host) = host {
        config.server.host = host;
    }

    let service = Arc::new(build_service(&config));

    if !config.storage.sessions_dir.is_dir() {
        tracing::warn!(
            "Sessions directory {} does not exist yet; every request will be not found",
            config.storage.sessions_dir.display()
        );
    }

    tracing::info!(
        transform_failures = ?service.config().transform_failures,
        unknown_features = ?service.config().unknown_features,
        "Starting server at http://{}",
        config.server.addr()
    );

    server::start(service, config.server).await?;

    Ok(())
}
