use crate::auth::AuthError;
use crate::store::StoreError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

#[derive(Debug)]
pub enum Error {
    // Auth Errors
    AuthFailNoToken,
    AuthFailTokenWrongFormat,
    AuthFailInvalidToken,
    AuthFailCtxNotInRequestExt,
    AdminDisabled,
    MissingPasskey,
    InvalidPasskey,

    // Content Errors
    InvalidPayload(Vec<String>),
    PersistenceFailed(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Error::AuthFailNoToken
            | Error::AuthFailTokenWrongFormat
            | Error::AuthFailInvalidToken => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" }))
            }
            Error::AuthFailCtxNotInRequestExt => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Auth context missing" }),
            ),
            Error::AdminDisabled => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "Admin key not configured" }),
            ),
            Error::MissingPasskey => {
                (StatusCode::BAD_REQUEST, json!({ "error": "Missing passkey" }))
            }
            Error::InvalidPasskey => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Invalid passkey" }))
            }
            Error::InvalidPayload(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid data", "details": details }),
            ),
            Error::PersistenceFailed(reason) => {
                error!("[Store] Save failed: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to save data" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Disabled => Error::AdminDisabled,
            AuthError::MissingPasskey => Error::MissingPasskey,
            AuthError::InvalidPasskey => Error::InvalidPasskey,
            AuthError::Unauthorized => Error::AuthFailInvalidToken,
        }
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(violations) => Error::InvalidPayload(violations.messages()),
            other => Error::PersistenceFailed(other.to_string()),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidPayload(vec![rejection.body_text()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitae_common::{BundleViolations, ValidationError};

    #[test]
    fn test_status_codes() {
        let cases = [
            (Error::AuthFailNoToken, StatusCode::UNAUTHORIZED),
            (Error::AuthFailInvalidToken, StatusCode::UNAUTHORIZED),
            (Error::AdminDisabled, StatusCode::SERVICE_UNAVAILABLE),
            (Error::MissingPasskey, StatusCode::BAD_REQUEST),
            (Error::InvalidPasskey, StatusCode::UNAUTHORIZED),
            (Error::InvalidPayload(vec![]), StatusCode::BAD_REQUEST),
            (
                Error::PersistenceFailed("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_error_conversion() {
        let invalid = StoreError::Invalid(BundleViolations(vec![ValidationError::InvalidField(
            "albums",
        )]));
        match Error::from(invalid) {
            Error::InvalidPayload(details) => {
                assert_eq!(details, vec!["Invalid albums payload".to_string()])
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
