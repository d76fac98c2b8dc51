#![allow(dead_code)]

use async_trait::async_trait;
use nextpay_checkout::config::CheckoutConfig;
use nextpay_checkout::orders::{InMemoryOrderStore, Order, User};
use nextpay_checkout::payments::error::{PaymentError, PaymentResult};
use nextpay_checkout::payments::provider::GatewayClient;
use nextpay_checkout::payments::types::{
    TokenRequest, TokenResponse, VerifyRequest, VerifyResponse,
};
use nextpay_checkout::services::NextpayCheckout;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const APP_URL: &str = "https://shop.example.com";
pub const SECRET: &str = "np-salt";
pub const API_KEY: &str = "np_live_0123456789";

#[derive(Debug, Clone)]
pub enum Reply {
    Code(i64),
    Issued(&'static str),
    TransportError,
}

/// Gateway double that answers with canned replies and records every call.
pub struct FakeGateway {
    token_reply: Reply,
    verify_reply: Reply,
    pub token_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub last_token_request: Mutex<Option<TokenRequest>>,
    pub last_verify_request: Mutex<Option<VerifyRequest>>,
}

impl FakeGateway {
    pub fn new(token_reply: Reply, verify_reply: Reply) -> Self {
        Self {
            token_reply,
            verify_reply,
            token_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            last_token_request: Mutex::new(None),
            last_verify_request: Mutex::new(None),
        }
    }

    pub fn issuing(trans_id: &'static str) -> Self {
        Self::new(Reply::Issued(trans_id), Reply::Code(0))
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn last_token_request(&self) -> TokenRequest {
        self.last_token_request
            .lock()
            .unwrap()
            .clone()
            .expect("token was requested")
    }

    pub fn last_verify_request(&self) -> VerifyRequest {
        self.last_verify_request
            .lock()
            .unwrap()
            .clone()
            .expect("payment was verified")
    }
}

fn transport_error() -> PaymentError {
    PaymentError::NetworkError {
        message: "connection reset by peer".to_string(),
    }
}

#[async_trait]
impl GatewayClient for FakeGateway {
    async fn request_token(&self, request: TokenRequest) -> PaymentResult<TokenResponse> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_token_request.lock().unwrap() = Some(request);
        match &self.token_reply {
            Reply::Issued(trans_id) => Ok(TokenResponse {
                code: -1,
                trans_id: Some(trans_id.to_string()),
            }),
            Reply::Code(code) => Ok(TokenResponse {
                code: *code,
                trans_id: None,
            }),
            Reply::TransportError => Err(transport_error()),
        }
    }

    async fn verify_payment(&self, request: VerifyRequest) -> PaymentResult<VerifyResponse> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_verify_request.lock().unwrap() = Some(request);
        match &self.verify_reply {
            Reply::Code(code) => Ok(VerifyResponse { code: *code }),
            Reply::Issued(_) => Ok(VerifyResponse { code: 0 }),
            Reply::TransportError => Err(transport_error()),
        }
    }

    fn payment_page_url(&self, trans_id: &str) -> String {
        format!("https://api.nextpay.org/gateway/payment/{}", trans_id)
    }
}

pub fn checkout_config(currency: &str) -> CheckoutConfig {
    CheckoutConfig {
        app_url: APP_URL.to_string(),
        callback_secret: SECRET.to_string(),
        currency: currency.to_string(),
    }
}

pub fn active_user(id: u64) -> User {
    User {
        id,
        is_available: true,
        is_active: true,
    }
}

pub struct Harness {
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<InMemoryOrderStore>,
    pub checkout: Arc<NextpayCheckout>,
}

pub fn harness(gateway: FakeGateway, currency: &str) -> Harness {
    let gateway = Arc::new(gateway);
    let store = Arc::new(InMemoryOrderStore::new());
    let checkout = Arc::new(NextpayCheckout::new(
        gateway.clone(),
        store.clone(),
        checkout_config(currency),
        API_KEY,
    ));
    Harness {
        gateway,
        store,
        checkout,
    }
}

/// Stores a payment_processing order for an active user and returns it.
pub async fn seed_order(store: &InMemoryOrderStore, id: u64, total: Decimal) -> Order {
    let order = Order::new(id, 100 + id, total);
    store.insert_user(active_user(order.user_id)).await;
    store.insert_order(order.clone()).await;
    order
}
