//! Auth handlers

use crate::auth::IssuedToken;
use crate::config::AppState;
use crate::ctx::AdminCtx;
use crate::error::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::{json, Value};
use tracing::info;

/// POST /api/auth
///
/// The body is read loosely: an absent or unparsable body and a missing or
/// non-string `passkey` all count as a missing passkey.
pub async fn authenticate(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<IssuedToken>> {
    info!("POST /api/auth");

    let body = body.map(|Json(body)| body).unwrap_or(Value::Null);
    let passkey = body.get("passkey").and_then(Value::as_str).unwrap_or("");
    let issued = state.auth.authenticate(passkey)?;

    Ok(Json(issued))
}

/// GET /api/auth/verify
pub async fn verify(_ctx: AdminCtx) -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// POST /api/auth/logout
pub async fn logout(State(state): State<AppState>, ctx: AdminCtx) -> Json<Value> {
    info!("POST /api/auth/logout");
    state.auth.revoke(ctx.token());
    Json(json!({ "ok": true }))
}
