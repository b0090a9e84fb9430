pub mod list_files;
pub mod mkdir;
pub mod read_file;
pub mod write_file;

use crate::{
    errors::{AppError, AppResult},
    model::{Envelope, ErrorCode, ToolError},
    root::PathRejection,
};
use serde::{de::DeserializeOwned, Serialize};

/// Converts a resolver failure into the envelope error for `input`.
pub(crate) fn rejection(err: PathRejection, input: &str) -> ToolError {
    match err {
        PathRejection::Io(e) => ToolError::from_io(&e, "Filesystem error.", input),
        other => ToolError::new(ErrorCode::PathInvalid, other.to_string(), input),
    }
}

pub(crate) fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> AppResult<T> {
    // a bare call with no params is the same as `{}`
    let params = if params.is_null() { serde_json::json!({}) } else { params };
    serde_json::from_value(params).map_err(|e| AppError::InvalidParams(e.to_string()))
}

pub(crate) fn to_value<T: Serialize>(envelope: &Envelope<T>) -> AppResult<serde_json::Value> {
    if let Some(err) = envelope.error() {
        tracing::debug!(code = ?err.code, path = ?err.path, message = %err.message, "tool failed");
    }
    serde_json::to_value(envelope).map_err(|e| AppError::Internal(e.to_string()))
}
