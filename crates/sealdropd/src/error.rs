use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

use sealdrop_core::RelayError;
use sealdrop_format::FormatError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "file not found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "access denied")
    }

    /// Log the cause and hide it from the client.
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        error!(error = %cause, "request failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        match e {
            RelayError::NotFound(_) => Self::not_found(),
            other => Self::internal(other),
        }
    }
}

impl From<FormatError> for ApiError {
    fn from(e: FormatError) -> Self {
        if e.is_decryption() {
            Self::forbidden()
        } else {
            Self::internal(e)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use sealdrop_crypto::CryptoError;

    #[test]
    fn test_relay_error_mapping() {
        assert_eq!(
            ApiError::from(RelayError::NotFound("1".into())).status,
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RelayError::Storage("disk".into())).status,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_error_mapping() {
        let denied = ApiError::from(FormatError::Crypto(CryptoError::Decryption));
        assert_eq!(denied.status, StatusCode::FORBIDDEN);

        let defect = ApiError::from(FormatError::InvalidState("file not encrypted"));
        assert_eq!(defect.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(defect.message, "internal error");
    }

    #[tokio::test]
    async fn test_into_response_returns_json_body() {
        let response = ApiError::bad_request("missing file part").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"missing file part"}"#);
    }
}
