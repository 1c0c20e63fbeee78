use crate::error::{Error, Result};
use axum::{extract::FromRequestParts, http::request::Parts};

/// Proof that the current request carried a verified admin token.
#[derive(Clone, Debug)]
pub struct AdminCtx {
    token: String,
}

impl AdminCtx {
    pub fn new(token: String) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl<S> FromRequestParts<S> for AdminCtx
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AdminCtx>()
            .cloned()
            .ok_or(Error::AuthFailCtxNotInRequestExt)
    }
}
