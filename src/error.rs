use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::service::ListError;
use crate::store::StoreError;

/// Error envelope returned by every API route
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Each variant maps to one HTTP status and is rendered as an [`ErrorResponse`].
#[derive(Debug)]
pub enum ApiError {
    /// Required body field missing or empty
    InvalidArgument(String),
    /// Request body is not valid JSON of the expected shape
    InvalidJson(serde_json::Error),
    /// Access code does not match
    Forbidden,
    /// Nothing to delete
    EmptyList,
    /// No entry matched the delete target
    NotFound(String),
    /// Method not served on the API path
    MethodNotSupported,
    /// Backing store failed or timed out
    StoreUnavailable(StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::InvalidArgument(msg) => (
                StatusCode::BAD_REQUEST,
                "Missing required parameter".to_string(),
                Some(msg),
            ),
            ApiError::InvalidJson(err) => (
                StatusCode::BAD_REQUEST,
                "Invalid JSON body".to_string(),
                Some(err.to_string()),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Invalid access code".to_string(), None),
            ApiError::EmptyList => (StatusCode::NOT_FOUND, "The list is empty".to_string(), None),
            ApiError::NotFound(url) => (
                StatusCode::NOT_FOUND,
                "Entry not found".to_string(),
                Some(format!("No entry with url '{}'", url)),
            ),
            ApiError::MethodNotSupported => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Unsupported request method".to_string(),
                None,
            ),
            ApiError::StoreUnavailable(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Store unavailable".to_string(),
                Some(err.to_string()),
            ),
        };

        (status, Json(ErrorResponse { error, message })).into_response()
    }
}

impl From<ListError> for ApiError {
    fn from(err: ListError) -> Self {
        match err {
            ListError::InvalidArgument(_) => ApiError::InvalidArgument(err.to_string()),
            ListError::EmptyList => ApiError::EmptyList,
            ListError::NotFound(url) => ApiError::NotFound(url),
            ListError::StoreUnavailable(e) => ApiError::StoreUnavailable(e),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::StoreUnavailable(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidJson(err)
    }
}
