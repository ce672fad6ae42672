mod config;
mod error;
mod handlers;
mod models;
mod services;
mod storage;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::storage::StorageProvider;

// Headroom on top of the upload ceiling for multipart framing; precise
// enforcement happens while the photo field is drained.
const BODY_LIMIT_OVERHEAD: u64 = 1024 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub storage: Arc<dyn StorageProvider>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "photodrop=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting photodrop...");

    // Load configuration
    let config = Config::load()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    // Initialize storage provider
    let storage = storage::build_provider(&config.storage)
        .map_err(|e| anyhow::anyhow!("Failed to initialize storage: {}", e))?;
    tracing::info!(
        "Photo uploads stored via {} backend under prefix {}/",
        storage.storage_type(),
        config.upload.key_prefix
    );

    // Credential probe; a cold bucket is worth a warning but requests may
    // still succeed once it comes up, so the server starts regardless.
    if let Err(e) = storage.healthcheck().await {
        tracing::warn!("Storage healthcheck failed: {}", e);
    }

    // Create app state
    let state = AppState {
        config: config.clone(),
        storage,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let body_limit = (state.config.upload.max_size_bytes + BODY_LIMIT_OVERHEAD) as usize;

    Router::new()
        .route("/api/health", get(handlers::health::health))
        .route("/api/upload", post(handlers::photo::upload_photo))
        .route("/api/photos", get(handlers::photo::list_photos))
        .route("/api/photos/:filename", delete(handlers::photo::delete_photo))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
