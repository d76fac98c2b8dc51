//! Nextpay checkout service
//!
//! Places orders with the gateway and settles them when the buyer comes back
//! through the signed callback URL.

use crate::config::CheckoutConfig;
use crate::orders::{Order, OrderStatus, OrderStore, User};
use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::provider::GatewayClient;
use crate::payments::types::{CheckoutRedirect, TokenRequest, VerifyRequest};
use crate::payments::utils::{gateway_amount, CallbackSigner};
use std::sync::Arc;
use tracing::{info, warn};

pub struct NextpayCheckout {
    gateway: Arc<dyn GatewayClient>,
    store: Arc<dyn OrderStore>,
    config: CheckoutConfig,
    api_key: String,
    signer: CallbackSigner,
}

impl NextpayCheckout {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        store: Arc<dyn OrderStore>,
        config: CheckoutConfig,
        api_key: impl Into<String>,
    ) -> Self {
        let signer = CallbackSigner::new(config.callback_secret.clone());
        Self {
            gateway,
            store,
            config,
            api_key: api_key.into(),
            signer,
        }
    }

    pub fn signer(&self) -> &CallbackSigner {
        &self.signer
    }

    pub fn callback_url(&self, order_id: u64) -> String {
        format!(
            "{}/checkout/{}",
            self.config.app_url,
            self.signer.callback_token(order_id)
        )
    }

    /// Requests a payment token for `order` and returns where to send the
    /// buyer. Gateway or persist failures delete the order and point at the
    /// error page.
    pub async fn place_order(
        &self,
        order: &mut Order,
        user: &User,
    ) -> PaymentResult<CheckoutRedirect> {
        if !order.status.is_awaiting_payment() {
            return Err(PaymentError::invalid_state(format!(
                "Invalid order status: {}",
                order.status
            )));
        }

        if !user.can_check_out() {
            return Err(PaymentError::invalid_state(
                "User is not available or active",
            ));
        }

        // Subscription checkout is not offered through Nextpay.
        if order.status != OrderStatus::PaymentProcessing {
            return Err(PaymentError::invalid_state(
                "Order status must be payment_processing to place it",
            ));
        }

        if order.payment_id.is_some() {
            return Err(PaymentError::invalid_state(
                "Payment was already started for this order",
            ));
        }

        let amount = gateway_amount(order.total, &self.config.currency);
        let request = TokenRequest {
            api_key: self.api_key.clone(),
            order_id: order.id.to_string(),
            amount,
            callback_uri: self.callback_url(order.id),
        };

        match self.gateway.request_token(request).await {
            Ok(token) => match token.issued_trans_id() {
                Some(trans_id) => {
                    let mut placed = order.clone();
                    placed.payment_id = Some(trans_id.to_string());

                    match self.store.update_order(&placed).await {
                        Ok(()) => {
                            *order = placed;
                            info!(
                                order_id = order.id,
                                trans_id = %trans_id,
                                amount = %amount,
                                "nextpay token issued"
                            );
                            return Ok(CheckoutRedirect::HostedPage(
                                self.gateway.payment_page_url(trans_id),
                            ));
                        }
                        Err(e) => {
                            warn!(
                                order_id = order.id,
                                error = %e,
                                "failed to store nextpay transaction id"
                            );
                        }
                    }
                }
                None => {
                    warn!(
                        order_id = order.id,
                        code = token.code,
                        "nextpay refused to issue a payment token"
                    );
                }
            },
            Err(e) => {
                warn!(order_id = order.id, error = %e, "nextpay token request failed");
            }
        }

        self.store.delete_order(order.id).await?;
        Ok(CheckoutRedirect::ErrorPage(self.config.error_page_url()))
    }

    /// Confirms the payment behind `payment_id`. Returns `Ok(false)` when the
    /// gateway does not confirm it; transport errors from verification are
    /// returned as errors.
    pub async fn handle_callback(
        &self,
        order: &mut Order,
        payment_id: Option<&str>,
    ) -> PaymentResult<bool> {
        let payment_id = payment_id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| PaymentError::ValidationError {
                message: "System detected logical error: invalid_payment_id".to_string(),
                field: Some("paymentId".to_string()),
            })?;

        if order.payment_id.as_deref() != Some(payment_id) {
            return Err(PaymentError::PaymentMismatch {
                message: format!("callback payment id does not match order {}", order.id),
            });
        }

        if order.status.is_settled() {
            info!(order_id = order.id, status = %order.status, "order already settled");
            return Ok(true);
        }

        let amount = gateway_amount(order.total, &self.config.currency);
        let verification = self
            .gateway
            .verify_payment(VerifyRequest {
                api_key: self.api_key.clone(),
                order_id: order.id.to_string(),
                amount,
                trans_id: payment_id.to_string(),
            })
            .await?;

        if !verification.is_verified() {
            warn!(
                order_id = order.id,
                trans_id = %payment_id,
                code = verification.code,
                "nextpay did not verify payment"
            );
            return Ok(false);
        }

        self.store.finish_processing(order).await?;
        order.status = OrderStatus::Paid;
        order.paid = Some(amount);
        self.store.update_order(order).await?;

        info!(
            order_id = order.id,
            trans_id = %payment_id,
            amount = %amount,
            "order paid"
        );
        Ok(true)
    }

    /// Loads the order and its buyer, then runs [`Self::place_order`].
    pub async fn checkout_order(&self, order_id: u64) -> PaymentResult<CheckoutRedirect> {
        let mut order = self.load_order(order_id).await?;
        let user = self
            .store
            .find_user(order.user_id)
            .await?
            .ok_or_else(|| PaymentError::invalid_state("User is not available or active"))?;

        self.place_order(&mut order, &user).await
    }

    /// Loads the order, then runs [`Self::handle_callback`].
    pub async fn confirm_payment(
        &self,
        order_id: u64,
        payment_id: Option<&str>,
    ) -> PaymentResult<bool> {
        let mut order = self.load_order(order_id).await?;
        self.handle_callback(&mut order, payment_id).await
    }

    async fn load_order(&self, order_id: u64) -> PaymentResult<Order> {
        self.store
            .find_order(order_id)
            .await?
            .ok_or_else(|| PaymentError::NotFound {
                message: format!("Order {} not found", order_id),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::InMemoryOrderStore;
    use crate::payments::types::{TokenResponse, VerifyResponse};
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedGateway;

    #[async_trait]
    impl GatewayClient for FixedGateway {
        async fn request_token(&self, _request: TokenRequest) -> PaymentResult<TokenResponse> {
            Ok(TokenResponse {
                code: -1,
                trans_id: Some("T1".to_string()),
            })
        }

        async fn verify_payment(&self, _request: VerifyRequest) -> PaymentResult<VerifyResponse> {
            Ok(VerifyResponse { code: 0 })
        }

        fn payment_page_url(&self, trans_id: &str) -> String {
            format!("https://api.nextpay.org/gateway/payment/{}", trans_id)
        }
    }

    /// Store whose writes fail; deletes go through and are counted.
    struct ReadOnlyStore {
        inner: InMemoryOrderStore,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl OrderStore for ReadOnlyStore {
        async fn find_order(&self, order_id: u64) -> PaymentResult<Option<Order>> {
            self.inner.find_order(order_id).await
        }

        async fn find_user(&self, user_id: u64) -> PaymentResult<Option<User>> {
            self.inner.find_user(user_id).await
        }

        async fn update_order(&self, _order: &Order) -> PaymentResult<()> {
            Err(PaymentError::StoreError {
                message: "db down".to_string(),
            })
        }

        async fn delete_order(&self, order_id: u64) -> PaymentResult<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            self.inner.delete_order(order_id).await
        }

        async fn finish_processing(&self, order: &mut Order) -> PaymentResult<()> {
            self.inner.finish_processing(order).await
        }
    }

    fn checkout(store: Arc<dyn OrderStore>) -> NextpayCheckout {
        NextpayCheckout::new(
            Arc::new(FixedGateway),
            store,
            CheckoutConfig {
                app_url: "https://shop.test".to_string(),
                callback_secret: "salt".to_string(),
                currency: "USD".to_string(),
            },
            "np_key",
        )
    }

    #[test]
    fn callback_url_embeds_signed_order_id() {
        let service = checkout(Arc::new(InMemoryOrderStore::new()));
        let url = service.callback_url(42);
        let token = url
            .strip_prefix("https://shop.test/checkout/")
            .expect("callback lives under /checkout/");
        assert_eq!(service.signer().parse_callback_token(token).unwrap(), 42);
    }

    #[tokio::test]
    async fn checkout_order_requires_known_user() {
        let store = Arc::new(InMemoryOrderStore::new());
        store.insert_order(Order::new(1, 99, dec!(10))).await;
        let service = checkout(store);

        let result = service.checkout_order(1).await;
        assert!(matches!(result, Err(PaymentError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn unknown_orders_are_not_found() {
        let service = checkout(Arc::new(InMemoryOrderStore::new()));
        assert!(matches!(
            service.checkout_order(5).await,
            Err(PaymentError::NotFound { .. })
        ));
        assert!(matches!(
            service.confirm_payment(5, Some("T1")).await,
            Err(PaymentError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn checkout_then_confirm_by_id() {
        let store = Arc::new(InMemoryOrderStore::new());
        store.insert_order(Order::new(1, 7, dec!(10))).await;
        store
            .insert_user(User {
                id: 7,
                is_available: true,
                is_active: true,
            })
            .await;
        let service = checkout(store.clone());

        let redirect = service.checkout_order(1).await.expect("placement succeeds");
        assert!(redirect.is_hosted_page());
        assert!(service
            .confirm_payment(1, Some("T1"))
            .await
            .expect("callback succeeds"));

        let order = store.find_order(1).await.unwrap().expect("order kept");
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.paid, Some(dec!(10)));
        assert!(order.processed_at.is_some());
    }

    #[tokio::test]
    async fn failed_persist_deletes_order_and_points_to_error_page() {
        let inner = InMemoryOrderStore::new();
        inner.insert_order(Order::new(1, 7, dec!(10))).await;
        let store = Arc::new(ReadOnlyStore {
            inner,
            deletes: AtomicUsize::new(0),
        });
        let service = checkout(store.clone());
        let mut order = Order::new(1, 7, dec!(10));
        let user = User {
            id: 7,
            is_available: true,
            is_active: true,
        };

        let redirect = service
            .place_order(&mut order, &user)
            .await
            .expect("persist failure degrades to the error page");

        assert_eq!(
            redirect,
            CheckoutRedirect::ErrorPage("https://shop.test/checkout/error".to_string())
        );
        assert_eq!(order.payment_id, None);
        assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
        assert!(store.find_order(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn started_payment_is_not_placed_again() {
        let store = Arc::new(InMemoryOrderStore::new());
        let mut order = Order::new(1, 7, dec!(10));
        order.payment_id = Some("T0".to_string());
        store.insert_order(order.clone()).await;
        let service = checkout(store.clone());
        let user = User {
            id: 7,
            is_available: true,
            is_active: true,
        };

        let result = service.place_order(&mut order, &user).await;

        assert!(matches!(result, Err(PaymentError::InvalidState { .. })));
        let stored = store.find_order(1).await.unwrap().expect("order kept");
        assert_eq!(stored.payment_id.as_deref(), Some("T0"));
    }
}
