use crate::config::AppState;
use crate::ctx::AdminCtx;
use crate::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Header accepted when no `Authorization` header is present.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Pull the admin token out of the request headers.
///
/// `Authorization: Bearer <token>` wins; `X-Admin-Token` is the fallback.
pub fn extract_token(headers: &HeaderMap) -> Result<String> {
    if let Some(value) = headers.get(header::AUTHORIZATION) {
        let value = value.to_str().map_err(|_| Error::AuthFailTokenWrongFormat)?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or(Error::AuthFailTokenWrongFormat)?
            .trim();
        if token.is_empty() {
            return Err(Error::AuthFailNoToken);
        }
        return Ok(token.to_string());
    }

    match headers.get(ADMIN_TOKEN_HEADER) {
        Some(value) => {
            let token = value.to_str().map_err(|_| Error::AuthFailTokenWrongFormat)?;
            if token.is_empty() {
                Err(Error::AuthFailNoToken)
            } else {
                Ok(token.to_string())
            }
        }
        None => Err(Error::AuthFailNoToken),
    }
}

pub async fn mw_require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_admin");

    let token = extract_token(req.headers())?;
    state.auth.verify(&token)?;

    req.extensions_mut().insert(AdminCtx::new(token));

    Ok(next.run(req).await)
}
