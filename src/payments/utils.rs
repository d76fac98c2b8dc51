use crate::payments::error::{PaymentError, PaymentResult};
use crate::payments::types::PROVIDER_NAME;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use tracing::debug;

#[derive(Clone)]
pub struct PaymentHttpClient {
    client: Client,
    timeout: Duration,
}

impl PaymentHttpClient {
    pub fn new(timeout: Duration) -> PaymentResult<Self> {
        let client =
            Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| PaymentError::NetworkError {
                    message: format!("failed to initialize HTTP client: {}", e),
                })?;

        Ok(Self { client, timeout })
    }

    /// POSTs `form` url-encoded and decodes a JSON reply. Sent once; callers
    /// decide what a failure means.
    pub async fn post_form<F, T>(&self, url: &str, form: &F) -> PaymentResult<T>
    where
        F: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .timeout(self.timeout)
            .form(form)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError {
                message: format!("provider request failed: {}", e),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError {
                message: format!("failed to read provider response: {}", e),
            })?;
        debug!(status = %status, url = %url, "provider responded");

        if !status.is_success() {
            return Err(PaymentError::ProviderError {
                provider: PROVIDER_NAME.to_string(),
                message: format!("HTTP {}: {}", status, text),
                provider_code: Some(status.as_u16().to_string()),
                retryable: status.is_server_error(),
            });
        }

        serde_json::from_str::<T>(&text).map_err(|e| PaymentError::ProviderError {
            provider: PROVIDER_NAME.to_string(),
            message: format!("invalid provider JSON response: {}", e),
            provider_code: None,
            retryable: false,
        })
    }
}

/// Amount in the unit Nextpay charges in. The platform keeps IRR totals in
/// rials while the gateway expects toman. `currency` is the normalized code
/// from [`CheckoutConfig`](crate::config::CheckoutConfig).
pub fn gateway_amount(total: Decimal, currency: &str) -> Decimal {
    if currency == "IRR" {
        (total / Decimal::TEN).normalize()
    } else {
        total
    }
}

/// Signs and checks the `<order id>.<digest>` segment of callback URLs so the
/// callback endpoint can trust the order id without a session.
#[derive(Clone)]
pub struct CallbackSigner {
    secret: String,
}

impl CallbackSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn digest(&self, order_id: u64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(order_id.to_string().as_bytes());
        hasher.update(self.secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn callback_token(&self, order_id: u64) -> String {
        format!("{}.{}", order_id, self.digest(order_id))
    }

    pub fn parse_callback_token(&self, token: &str) -> PaymentResult<u64> {
        let (raw_id, digest) = token
            .split_once('.')
            .ok_or_else(|| PaymentError::CallbackAuthError {
                message: "callback token has no digest".to_string(),
            })?;
        let order_id = raw_id
            .parse::<u64>()
            .map_err(|_| PaymentError::CallbackAuthError {
                message: format!("invalid order id in callback token: {}", raw_id),
            })?;

        let expected = self.digest(order_id);
        if !secure_eq(expected.as_bytes(), digest.to_ascii_lowercase().as_bytes()) {
            return Err(PaymentError::CallbackAuthError {
                message: format!("digest mismatch for order {}", order_id),
            });
        }
        Ok(order_id)
    }
}

pub fn secure_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter()
        .zip(b.iter())
        .fold(0_u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
