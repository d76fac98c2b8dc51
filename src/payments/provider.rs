use crate::payments::error::PaymentResult;
use crate::payments::types::{TokenRequest, TokenResponse, VerifyRequest, VerifyResponse};
use async_trait::async_trait;

/// The two remote procedures Nextpay exposes to a merchant.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn request_token(&self, request: TokenRequest) -> PaymentResult<TokenResponse>;

    async fn verify_payment(&self, request: VerifyRequest) -> PaymentResult<VerifyResponse>;

    /// Hosted payment page for an issued transaction id.
    fn payment_page_url(&self, trans_id: &str) -> String;
}
