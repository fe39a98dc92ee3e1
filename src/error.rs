use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures surfaced by a repository implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate key: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Terminal outcome of a handler that did not succeed.
///
/// Each variant carries the message sent to the client as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    UnknownUser(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::UnknownUser(_) | ApiError::Conflict(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(res: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let cases = [
            (ApiError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::UnknownUser("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::Auth("x".into()), StatusCode::UNAUTHORIZED),
            (ApiError::Forbidden("x".into()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status, "{err:?}");
        }
    }

    #[tokio::test]
    async fn response_body_carries_message() {
        let res = ApiError::Auth("Invalid Password".into()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(res).await;
        assert_eq!(body, json!({ "message": "Invalid Password" }));
    }

    #[test]
    fn store_error_wraps_backend_failures() {
        let err: StoreError = anyhow::anyhow!("connection reset").into();
        assert!(matches!(err, StoreError::Backend(_)));
        assert_eq!(err.to_string(), "connection reset");
    }
}
