//! HTTP server wiring
//!
//! Builds the dataset store selected by `EQVIZ_STORE`, the upload storage
//! and the router, then serves until Ctrl+C or SIGTERM.

pub mod response;

use crate::config::{Config, StoreKind};
use crate::db;
use crate::error::{ApiResult, AppError};
use crate::features::{self, FeatureState};
use crate::middleware;
use crate::storage::Storage;
use crate::store::{MemoryStore, PgStore, SharedStore};
use axum::{
    extract::State,
    http::Uri,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

pub use response::{ApiResponse, ErrorDetail, ErrorResponse};

/// Connect the configured store and serve the API
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let store = connect_store(&config).await?;

    let storage = Storage::new(config.storage.clone()).await?;

    let state = FeatureState::new(store, storage, config.datasets.clone());
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

async fn connect_store(config: &Config) -> anyhow::Result<SharedStore> {
    match config.store {
        StoreKind::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;
            Ok(Arc::new(PgStore::new(pool)))
        },
        StoreKind::Memory => {
            tracing::warn!("Using in-memory dataset store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        },
    }
}

/// Create the application router with all routes and middleware
pub fn create_router(state: FeatureState, config: &Config) -> Router {
    let feature_routes = features::router(state.clone());

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .with_state(state)
        .nest("/api/v1", feature_routes)
        .fallback(not_found)
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

async fn root() -> impl IntoResponse {
    Json(json!({
        "name": "eqviz server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// Health check handler
async fn health_check(State(state): State<FeatureState>) -> ApiResult<impl IntoResponse> {
    state.store.health_check().await?;

    Ok(Json(json!({
        "status": "healthy",
        "store": "connected"
    })))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
