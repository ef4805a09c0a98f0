// src/api/error.rs
// Maps the four domain error kinds onto HTTP responses with a
// uniform {"error", "code"} JSON body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::TriageError;

#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: &'static str,
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        let (status_code, error_code) = match &err {
            TriageError::ConfigurationMissing { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "TAXONOMY_MISSING")
            }
            TriageError::SchemaInvalid { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_INVALID")
            }
            TriageError::SourceUnreadable(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "SOURCE_UNREADABLE")
            }
            TriageError::ClassificationFailed(_) => {
                (StatusCode::BAD_GATEWAY, "CLASSIFICATION_FAILED")
            }
        };
        Self {
            message: err.to_string(),
            status_code,
            error_code,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(code = self.error_code, "{}", self.message);
        let body = Json(json!({
            "error": self.message,
            "code": self.error_code,
        }));
        (self.status_code, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_invalid_maps_to_422() {
        let err = ApiError::from(TriageError::SchemaInvalid {
            missing: vec!["subcategory".into()],
        });
        assert_eq!(err.status_code, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code, "SCHEMA_INVALID");
        assert!(err.message.contains("subcategory"));
    }

    #[test]
    fn classification_failure_maps_to_502() {
        let err = ApiError::from(TriageError::ClassificationFailed(anyhow::anyhow!(
            "connection refused"
        )));
        assert_eq!(err.status_code, StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code, "CLASSIFICATION_FAILED");
    }

    #[test]
    fn missing_taxonomy_maps_to_503() {
        let err = ApiError::from(TriageError::ConfigurationMissing {
            path: "categories.csv".into(),
        });
        assert_eq!(err.status_code, StatusCode::SERVICE_UNAVAILABLE);
    }
}
