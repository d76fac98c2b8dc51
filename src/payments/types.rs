use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub const PROVIDER_NAME: &str = "nextpay";

/// Token issued. Nextpay signals success for token generation with -1.
pub const TOKEN_ISSUED_CODE: i64 = -1;

pub const PAYMENT_VERIFIED_CODE: i64 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRequest {
    pub api_key: String,
    pub order_id: String,
    pub amount: Decimal,
    pub callback_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    #[serde(deserialize_with = "result_code")]
    pub code: i64,
    #[serde(default)]
    pub trans_id: Option<String>,
}

impl TokenResponse {
    /// Transaction id of an issued token, if the gateway issued one.
    pub fn issued_trans_id(&self) -> Option<&str> {
        if self.code != TOKEN_ISSUED_CODE {
            return None;
        }
        self.trans_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyRequest {
    pub api_key: String,
    pub order_id: String,
    pub amount: Decimal,
    pub trans_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerifyResponse {
    #[serde(deserialize_with = "result_code")]
    pub code: i64,
}

impl VerifyResponse {
    pub fn is_verified(&self) -> bool {
        self.code == PAYMENT_VERIFIED_CODE
    }
}

/// Where the buyer goes after placement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", content = "redirect_url", rename_all = "snake_case")]
pub enum CheckoutRedirect {
    HostedPage(String),
    ErrorPage(String),
}

impl CheckoutRedirect {
    pub fn url(&self) -> &str {
        match self {
            CheckoutRedirect::HostedPage(url) | CheckoutRedirect::ErrorPage(url) => url,
        }
    }

    pub fn is_hosted_page(&self) -> bool {
        matches!(self, CheckoutRedirect::HostedPage(_))
    }
}

// Nextpay answers with either `"code": -1` or `"code": "-1"`.
fn result_code<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Int(i64),
        Text(String),
    }

    match RawCode::deserialize(deserializer)? {
        RawCode::Int(code) => Ok(code),
        RawCode::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid result code: {}", text))),
    }
}
