use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Clone, Error)]
pub enum PaymentError {
    /// Order or user is not in a state that allows the operation.
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    #[error("Validation error: {message}")]
    ValidationError {
        message: String,
        field: Option<String>,
    },

    /// Callback transaction id does not match the id stored on the order.
    #[error("Payment mismatch: {message}")]
    PaymentMismatch { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Callback authentication failed: {message}")]
    CallbackAuthError { message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Provider error: provider={provider}, message={message}")]
    ProviderError {
        provider: String,
        message: String,
        provider_code: Option<String>,
        retryable: bool,
    },

    #[error("Order store error: {message}")]
    StoreError { message: String },
}

impl PaymentError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        PaymentError::InvalidState {
            message: message.into(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::InvalidState { .. } => false,
            PaymentError::ValidationError { .. } => false,
            PaymentError::PaymentMismatch { .. } => false,
            PaymentError::NotFound { .. } => false,
            PaymentError::CallbackAuthError { .. } => false,
            PaymentError::NetworkError { .. } => true,
            PaymentError::ProviderError { retryable, .. } => *retryable,
            PaymentError::StoreError { .. } => true,
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidState { .. } => 409,
            PaymentError::ValidationError { .. } => 400,
            PaymentError::PaymentMismatch { .. } => 409,
            PaymentError::NotFound { .. } => 404,
            PaymentError::CallbackAuthError { .. } => 401,
            PaymentError::NetworkError { .. } => 503,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::StoreError { .. } => 500,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            PaymentError::InvalidState { message } => message.clone(),
            PaymentError::ValidationError { message, .. } => message.clone(),
            PaymentError::PaymentMismatch { .. } => {
                "Couldn't get payment information".to_string()
            }
            PaymentError::NotFound { message } => message.clone(),
            PaymentError::CallbackAuthError { .. } => "Invalid checkout link".to_string(),
            PaymentError::NetworkError { .. } => {
                "Payment provider is temporarily unavailable".to_string()
            }
            PaymentError::ProviderError { .. } => "Payment provider returned an error".to_string(),
            PaymentError::StoreError { .. } => {
                "Order could not be updated. Please try again later".to_string()
            }
        }
    }
}
