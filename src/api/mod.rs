pub mod checkout;

use axum::{
    routing::{get, post},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::middleware::logging::{request_logging_middleware, UuidRequestId};
use checkout::CheckoutState;

/// Full HTTP surface: checkout routes, the error page and a liveness probe.
pub fn router(state: CheckoutState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/checkout/{order_id}", post(checkout::place_order))
        .route("/checkout/error", get(checkout::checkout_error))
        .route(
            "/checkout/{token}",
            get(checkout::callback_get).post(checkout::callback_post),
        )
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(request_logging_middleware))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
