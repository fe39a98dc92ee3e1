use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// JSON body whose rejections answer with `{"message": ...}` and 400 instead
/// of axum's plain-text 415/422.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection.body_text(), "rejected request body");
    ApiError::Validation(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::header::CONTENT_TYPE, http::StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    async fn extract(req: Request) -> Result<ApiJson<Named>, ApiError> {
        ApiJson::<Named>::from_request(req, &()).await
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"ada"}"#))
            .unwrap();
        let ApiJson(named) = extract(req).await.expect("extracts");
        assert_eq!(named.name, "ada");
    }

    #[tokio::test]
    async fn missing_content_type_is_a_validation_error() {
        let req = Request::builder().body(Body::empty()).unwrap();
        let err = extract(req).await.err().expect("rejected");
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn wrong_field_type_is_a_validation_error() {
        let req = Request::builder()
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":5}"#))
            .unwrap();
        let err = extract(req).await.err().expect("rejected");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!err.to_string().is_empty());
    }
}
