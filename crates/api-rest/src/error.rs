use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Request-terminal failures.
///
/// Every failure is mapped exactly once to an HTTP reply; nothing is
/// retried or recovered locally. The display strings are the response
/// bodies the gateway's consumers see.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required settings were absent at startup; no upstream call was made
    #[error("Server misconfigured: missing GITHUB_TOKEN, GITHUB_OWNER, or GITHUB_REPO.")]
    Misconfigured,

    /// The request failed boundary validation before any upstream call
    #[error("{0}")]
    BadRequest(String),

    /// Upstream reported the named file absent
    #[error("File not found: {0}")]
    NotFound(String),

    /// The resource path only answers GET, POST, DELETE and OPTIONS
    #[error("Method not allowed.")]
    MethodNotAllowed,

    /// Upstream answered non-success; its body is surfaced verbatim
    #[error("GitHub error: {0}")]
    Upstream(String),

    /// Anything else: transport failures, undecodable upstream payloads
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
