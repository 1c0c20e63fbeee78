//! Content handlers

use crate::config::AppState;
use crate::ctx::AdminCtx;
use crate::error::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;
use vitae_common::ValidBundle;

/// GET /api/data
///
/// Returns the stored bundle, or `null` when nothing valid is persisted and
/// the client should fall back to its own sources.
pub async fn get_data(State(state): State<AppState>) -> Json<Option<ValidBundle>> {
    Json(state.store.load().await)
}

/// POST /api/save
pub async fn save_data(
    State(state): State<AppState>,
    _ctx: AdminCtx,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>> {
    info!("POST /api/save");

    let Json(body) = body?;
    state.store.save(&body).await?;

    Ok(Json(json!({ "success": true })))
}
