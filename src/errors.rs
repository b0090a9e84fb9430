use axum::{http::StatusCode, Json};
use serde::Serialize;
use thiserror::Error;

/// Dispatch-layer failures. Filesystem outcomes never show up here; they
/// travel inside the tool's envelope.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("request too large")]
    RequestTooLarge,
    #[error("rate limited")]
    RateLimited,
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::RequestTooLarge => "RequestTooLarge",
            AppError::RateLimited => "RateLimited",
            AppError::UnknownTool(_) => "UnknownTool",
            AppError::InvalidParams(_) => "InvalidParams",
            AppError::Internal(_) => "Internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::RequestTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::UnknownTool(_) => StatusCode::NOT_FOUND,
            AppError::InvalidParams(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON-RPC error code used by the stdio transport.
    pub fn rpc_code(&self) -> i64 {
        match self {
            AppError::UnknownTool(_) | AppError::InvalidParams(_) => -32602,
            AppError::RequestTooLarge | AppError::RateLimited | AppError::Internal(_) => -32603,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody { code: self.code(), message: self.to_string() }
    }
}

pub type AppResult<T> = Result<T, AppError>;

pub fn into_response(err: AppError) -> (StatusCode, Json<ErrorBody>) {
    (err.status(), Json(err.body()))
}
