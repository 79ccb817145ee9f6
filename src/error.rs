use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::auth::jwt::AuthError;

/// Error taxonomy for the whole API. Every handler failure funnels through
/// here so the status mapping and response body live in one place.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Email already exists")]
    DuplicateEmail,

    /// Deliberately generic: must not reveal whether the email exists or the
    /// password was wrong.
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error(transparent)]
    Token(#[from] AuthError),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Server error")]
    Database(#[from] sqlx::Error),

    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateEmail => StatusCode::CONFLICT,
            Self::AuthenticationFailed | Self::Token(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 500s carry internal detail that must not reach the client; log it
        // and return an opaque message instead.
        let message = match &self {
            Self::Database(e) => {
                tracing::error!(error = %e, "database error");
                "Server error".to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = %e, "internal error");
                "Server error".to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(json!({ "message": message }))).into_response()
    }
}

/// Postgres unique-violation (SQLSTATE 23505). A concurrent signup can slip
/// past the pre-check; the store constraint is the real arbiter.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants() -> Vec<(ApiError, StatusCode)> {
        vec![
            (
                ApiError::Validation("missing name".into()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::DuplicateEmail, StatusCode::CONFLICT),
            (ApiError::AuthenticationFailed, StatusCode::UNAUTHORIZED),
            (ApiError::Token(AuthError::Expired), StatusCode::UNAUTHORIZED),
            (
                ApiError::Token(AuthError::InvalidSignature),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Token(AuthError::Malformed),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::NotFound("Product"), StatusCode::NOT_FOUND),
            (
                ApiError::Database(sqlx::Error::RowNotFound),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                ApiError::Internal(anyhow::anyhow!("disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ]
    }

    #[test]
    fn every_variant_maps_to_its_status() {
        for (err, status) in variants() {
            assert_eq!(err.status_code(), status, "variant {err:?}");
        }
    }

    #[tokio::test]
    async fn response_body_is_a_message_object() {
        for (err, status) in variants() {
            let label = format!("{err:?}");
            let res = err.into_response();
            assert_eq!(res.status(), status, "{label}");

            let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
                .await
                .expect("read body");
            let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
            let message = body["message"].as_str().expect("message field");
            assert!(!message.is_empty(), "{label}");
        }
    }

    #[tokio::test]
    async fn server_errors_do_not_leak_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("secret connection string leaked"));
        let res = err.into_response();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Server error");
    }

    #[test]
    fn duplicate_and_auth_messages_match_the_api_contract() {
        assert_eq!(ApiError::DuplicateEmail.to_string(), "Email already exists");
        assert_eq!(
            ApiError::AuthenticationFailed.to_string(),
            "Authentication failed"
        );
    }

    #[test]
    fn unique_violation_detection_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }
}
