use axum::{
    extract::{rejection::FormRejection, Path, Query, State},
    http::HeaderMap,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::middleware::error::get_request_id_from_headers;
use crate::payments::types::CheckoutRedirect;
use crate::services::checkout::NextpayCheckout;

#[derive(Clone)]
pub struct CheckoutState {
    pub checkout: Arc<NextpayCheckout>,
}

/// Parameters the gateway appends when it sends the buyer back. Nextpay
/// names the id `trans_id`; the platform's own links use `paymentId`.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub trans_id: Option<String>,
    #[serde(rename = "paymentId")]
    pub payment_id: Option<String>,
}

impl CallbackParams {
    pub fn transaction_id(&self) -> Option<&str> {
        [&self.trans_id, &self.payment_id]
            .into_iter()
            .filter_map(|v| v.as_deref())
            .find(|v| !v.trim().is_empty())
    }

    fn or(self, other: CallbackParams) -> CallbackParams {
        CallbackParams {
            trans_id: self.trans_id.or(other.trans_id),
            payment_id: self.payment_id.or(other.payment_id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CallbackResponse {
    pub order_id: u64,
    pub paid: bool,
}

/// POST /api/checkout/{order_id}
pub async fn place_order(
    State(state): State<CheckoutState>,
    Path(order_id): Path<u64>,
    headers: HeaderMap,
) -> AppResult<Json<CheckoutRedirect>> {
    let request_id = get_request_id_from_headers(&headers);
    info!(order_id, "Checkout requested");

    let redirect = state
        .checkout
        .checkout_order(order_id)
        .await
        .map_err(|e| with_request_id(e.into(), request_id))?;

    Ok(Json(redirect))
}

/// GET /checkout/{token}
pub async fn callback_get(
    State(state): State<CheckoutState>,
    Path(token): Path<String>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> AppResult<Json<CallbackResponse>> {
    handle_callback(&state, &token, params, &headers).await
}

/// POST /checkout/{token}
pub async fn callback_post(
    State(state): State<CheckoutState>,
    Path(token): Path<String>,
    Query(query): Query<CallbackParams>,
    headers: HeaderMap,
    form: Result<Form<CallbackParams>, FormRejection>,
) -> AppResult<Json<CallbackResponse>> {
    let params = match form {
        Ok(Form(form)) => form.or(query),
        Err(_) => query,
    };
    handle_callback(&state, &token, params, &headers).await
}

/// GET /checkout/error
pub async fn checkout_error() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "error",
        "message": "Payment could not be started. Please try again or choose another method.",
    }))
}

async fn handle_callback(
    state: &CheckoutState,
    token: &str,
    params: CallbackParams,
    headers: &HeaderMap,
) -> AppResult<Json<CallbackResponse>> {
    let request_id = get_request_id_from_headers(headers);

    let order_id = state
        .checkout
        .signer()
        .parse_callback_token(token)
        .map_err(|e| with_request_id(e.into(), request_id.clone()))?;
    info!(order_id, "Payment callback received");

    let paid = state
        .checkout
        .confirm_payment(order_id, params.transaction_id())
        .await
        .map_err(|e| with_request_id(e.into(), request_id))?;

    Ok(Json(CallbackResponse { order_id, paid }))
}

fn with_request_id(error: AppError, request_id: Option<String>) -> AppError {
    match request_id {
        Some(id) => error.with_request_id(id),
        None => error,
    }
}
