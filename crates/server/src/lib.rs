//! Arcanum Vitae Content Server Library
//!
//! Serves the single content document, gates mutation behind an admin
//! passkey and bearer tokens, and validates everything it persists.

pub mod auth;
pub mod config;
pub mod ctx;
pub mod error;
pub mod handlers;
pub mod store;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use auth::middleware::{mw_require_admin, ADMIN_TOKEN_HEADER};
use config::{AppState, ServerConfig, MAX_BODY_BYTES};
use handlers::{authenticate, get_data, logout, save_data, verify};

pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    info!("=== Arcanum Vitae Content Server ===");

    let config = ServerConfig::from_env();
    info!("Data storage: {:?}", config.data_path);
    vitae_common::ensure_parent(&config.data_path)?;

    let state = AppState::new(config.clone());
    match state.store.load().await {
        Some(_) => info!("Persisted content found"),
        None => info!("No persisted content, clients will use defaults"),
    }
    if !state.auth.is_enabled() {
        warn!("Admin endpoints will reject every login until ADMIN_KEY is set");
    }

    let app = router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Arcanum Vitae active on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Build the full API router over the given state.
pub fn router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/save", post(save_data))
        .route("/api/auth/verify", get(verify))
        .route("/api/auth/logout", post(logout))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_admin,
        ));

    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/data", get(get_data))
        .route("/api/auth", post(authenticate))
        .merge(admin)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static(ADMIN_TOKEN_HEADER),
        ])
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        // Already set, ignore
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "active",
        "timestamp": Utc::now().to_rfc3339(),
        "identity": "ARCANUM_VITAE_SYSTEM"
    }))
}
