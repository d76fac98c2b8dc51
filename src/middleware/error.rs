//! JSON bodies for failed checkout requests

use crate::error::{AppError, ErrorCode};
use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorCode,
    /// Safe to show the buyer; never carries gateway or store detail.
    pub message: String,
    /// Request parameter at fault, for validation errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub request_id: Option<String>,
    /// RFC 3339
    pub timestamp: String,
    pub retryable: bool,
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        Self {
            error: error.error_code(),
            message: error.user_message(),
            field: error.field().map(str::to_string),
            request_id: error.request_id.clone(),
            timestamp: Utc::now().to_rfc3339(),
            retryable: error.is_retryable(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                request_id = ?self.request_id,
                status = status.as_u16(),
                "checkout request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                code = ?code,
                request_id = ?self.request_id,
                status = status.as_u16(),
                "checkout request rejected"
            );
        }

        (status, Json(ErrorResponse::from(&self))).into_response()
    }
}

pub fn get_request_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
