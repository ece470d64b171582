//! HTTP error handling
//!
//! Every failed request answers with a JSON body `{"message", "code"}`; the
//! code decides the status.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mindmap_core::ServiceError;
use serde::{Deserialize, Serialize};

pub const INVALID_ARGUMENT: &str = "INVALID_ARGUMENT";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const DATABASE_ERROR: &str = "DATABASE_ERROR";

/// HTTP error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<String>,
}

impl HttpError {
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(message, INVALID_ARGUMENT)
    }

    pub fn status(&self) -> StatusCode {
        match self.code.as_str() {
            INVALID_ARGUMENT => StatusCode::BAD_REQUEST,
            NOT_FOUND => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidArgument(message) => HttpError::new(message, INVALID_ARGUMENT),
            ServiceError::NotFound(message) => HttpError::new(message, NOT_FOUND),
            other => {
                tracing::error!("Request failed: {:?}", other);
                HttpError::with_details(
                    "Internal database error",
                    DATABASE_ERROR,
                    other.to_string(),
                )
            }
        }
    }
}

// Extractor rejections (malformed JSON, non-numeric query values) are caller
// mistakes and share the INVALID_ARGUMENT shape.

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::invalid_argument(rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        HttpError::invalid_argument(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_core::DatabaseError;

    #[test]
    fn test_service_errors_map_to_status() {
        let err = HttpError::from(ServiceError::invalid_argument("bad"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code, INVALID_ARGUMENT);
        assert_eq!(err.message, "bad");

        let err = HttpError::from(ServiceError::node_not_found());
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Node not found");

        let err = HttpError::from(ServiceError::DatabaseError(DatabaseError::sql_execution(
            "boom",
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, DATABASE_ERROR);
        assert!(err.details.is_some());
    }

    #[test]
    fn test_body_omits_missing_details() {
        let body = serde_json::to_value(HttpError::new("Edge not found", NOT_FOUND)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"message": "Edge not found", "code": "NOT_FOUND"})
        );
    }
}
