use crate::config::NextpayConfig;
use crate::payments::error::PaymentResult;
use crate::payments::provider::GatewayClient;
use crate::payments::types::{TokenRequest, TokenResponse, VerifyRequest, VerifyResponse};
use crate::payments::utils::PaymentHttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

pub struct NextpayClient {
    config: NextpayConfig,
    http: PaymentHttpClient,
}

impl NextpayClient {
    pub fn new(config: NextpayConfig) -> PaymentResult<Self> {
        let http = PaymentHttpClient::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self { config, http })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl GatewayClient for NextpayClient {
    async fn request_token(&self, request: TokenRequest) -> PaymentResult<TokenResponse> {
        let response: TokenResponse = self
            .http
            .post_form(&self.endpoint("/token.http"), &request)
            .await?;
        info!(
            order_id = %request.order_id,
            code = response.code,
            trans_id = ?response.trans_id,
            "nextpay token requested"
        );
        Ok(response)
    }

    async fn verify_payment(&self, request: VerifyRequest) -> PaymentResult<VerifyResponse> {
        let response: VerifyResponse = self
            .http
            .post_form(&self.endpoint("/verify.http"), &request)
            .await?;
        info!(
            order_id = %request.order_id,
            trans_id = %request.trans_id,
            code = response.code,
            "nextpay payment verification returned"
        );
        Ok(response)
    }

    fn payment_page_url(&self, trans_id: &str) -> String {
        self.endpoint(&format!("/payment/{}", trans_id))
    }
}
