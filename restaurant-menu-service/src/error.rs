use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Main service error type
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Error fetching restaurant menu: {0}")]
    MenuFetch(#[source] UpstreamError),

    #[error("Error fetching category items: {0}")]
    ItemFetch(#[source] UpstreamError),

    #[error(
        "No items found for category: \"{category_name}\". Available categories: {}",
        .available.join(", ")
    )]
    CategoryNotFound {
        category_name: String,
        available: Vec<String>,
    },

    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("MCP session not found: {session_id}")]
    SessionNotFound { session_id: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Upstream menu API errors
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    Configuration { missing: Vec<&'static str> },

    #[error("Error making API request: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid response structure: {message}")]
    InvalidResponse { message: String },
}

impl UpstreamError {
    fn error_code(&self) -> &'static str {
        match self {
            UpstreamError::Configuration { .. } => "configuration_error",
            UpstreamError::Request { .. } => "upstream_request_error",
            UpstreamError::InvalidResponse { .. } => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(source: reqwest::Error) -> Self {
        UpstreamError::Request { source }
    }
}

/// API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::SessionNotFound { .. } | ServiceError::CategoryNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ServiceError::InvalidRequest { .. } | ServiceError::UnknownTool { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::MenuFetch(UpstreamError::Request { .. })
            | ServiceError::ItemFetch(UpstreamError::Request { .. })
            | ServiceError::MenuFetch(UpstreamError::InvalidResponse { .. })
            | ServiceError::ItemFetch(UpstreamError::InvalidResponse { .. }) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::MenuFetch(e) | ServiceError::ItemFetch(e) => e.error_code(),
            ServiceError::CategoryNotFound { .. } => "category_not_found",
            ServiceError::UnknownTool { .. } => "unknown_tool",
            ServiceError::SessionNotFound { .. } => "session_not_found",
            ServiceError::InvalidRequest { .. } => "invalid_request",
            ServiceError::Config { .. } => "config_error",
            ServiceError::Internal { .. } => "internal_error",
        }
    }

    /// The upstream failure behind a menu or item fetch error, if any
    pub fn upstream(&self) -> Option<&UpstreamError> {
        match self {
            ServiceError::MenuFetch(e) | ServiceError::ItemFetch(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code().to_string();

        let response = ErrorResponse {
            message: self.to_string(),
            code: Some(code),
        };

        (status, Json(response)).into_response()
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
