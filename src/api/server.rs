//! HTTP server bootstrap

use super::http::{create_router, AppState};
use crate::catalog::{Catalog, OpenWeatherClient, UuidIds};
use crate::common::tracing_middleware::request_tracing_middleware;
use crate::common::{AppConfig, Keys, Result};
use crate::store::shared_store;
use axum::Router;
use std::sync::Arc;
use tower_http::limit::RequestBodyLimitLayer;

pub struct Server {
    config: AppConfig,
}

impl Server {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Router with middleware, over an already-built catalog.
    pub fn router(catalog: Catalog, body_limit_bytes: usize) -> Router {
        create_router(AppState { catalog })
            .layer(axum::middleware::from_fn(request_tracing_middleware))
            .layer(RequestBodyLimitLayer::new(body_limit_bytes))
    }

    pub async fn serve(self) -> Result<()> {
        tracing::info!("Starting restaurant-kv {}", crate::VERSION);
        tracing::info!("  HTTP API: {}", self.config.server.bind_addr);
        tracing::info!("  Store: {:?}", self.config.store.backend);
        tracing::info!("  Key prefix: {}", self.config.store.key_prefix);
        tracing::info!("  Weather TTL: {}s", self.config.weather.cache_ttl_secs);

        let store = shared_store(&self.config.store).await?;
        let catalog = Catalog::new(
            store,
            Keys::new(self.config.store.key_prefix.clone()),
            Arc::new(UuidIds),
            Arc::new(OpenWeatherClient::new(&self.config.weather)),
            self.config.weather.cache_ttl(),
        );

        let router = Self::router(catalog, self.config.server.body_limit_bytes);
        let listener = tokio::net::TcpListener::bind(self.config.server.bind_addr).await?;

        tracing::info!("Server is running on {}", self.config.server.bind_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
