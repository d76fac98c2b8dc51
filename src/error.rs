//! HTTP-facing error type
//!
//! Pairs a checkout failure with the request id it happened under and maps
//! it to a status, a stable error code and a user-facing message.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::payments::error::PaymentError;

/// Error codes for programmatic handling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCode {
    #[serde(rename = "INVALID_ORDER_STATE")]
    InvalidOrderState,
    #[serde(rename = "PAYMENT_MISMATCH")]
    PaymentMismatch,
    #[serde(rename = "ORDER_NOT_FOUND")]
    OrderNotFound,
    #[serde(rename = "INVALID_CALLBACK")]
    InvalidCallback,
    #[serde(rename = "VALIDATION_ERROR")]
    ValidationError,

    #[serde(rename = "ORDER_STORE_ERROR")]
    OrderStoreError,

    #[serde(rename = "PAYMENT_PROVIDER_ERROR")]
    PaymentProviderError,
    #[serde(rename = "PAYMENT_PROVIDER_UNAVAILABLE")]
    PaymentProviderUnavailable,
}

#[derive(Debug, Clone)]
pub struct AppError {
    pub error: PaymentError,
    pub request_id: Option<String>,
}

impl AppError {
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    pub fn status_code(&self) -> u16 {
        self.error.http_status_code()
    }

    pub fn error_code(&self) -> ErrorCode {
        match &self.error {
            PaymentError::InvalidState { .. } => ErrorCode::InvalidOrderState,
            PaymentError::ValidationError { .. } => ErrorCode::ValidationError,
            PaymentError::PaymentMismatch { .. } => ErrorCode::PaymentMismatch,
            PaymentError::NotFound { .. } => ErrorCode::OrderNotFound,
            PaymentError::CallbackAuthError { .. } => ErrorCode::InvalidCallback,
            PaymentError::NetworkError { .. } => ErrorCode::PaymentProviderUnavailable,
            PaymentError::ProviderError { .. } => ErrorCode::PaymentProviderError,
            PaymentError::StoreError { .. } => ErrorCode::OrderStoreError,
        }
    }

    pub fn user_message(&self) -> String {
        self.error.user_message()
    }

    /// Request field a validation error refers to.
    pub fn field(&self) -> Option<&str> {
        match &self.error {
            PaymentError::ValidationError { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.error.is_retryable()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for AppError {}

impl From<PaymentError> for AppError {
    fn from(error: PaymentError) -> Self {
        AppError {
            error,
            request_id: None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
