//! Application configuration module
//! Loads typed settings from environment variables and validates them at startup

use std::env;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub checkout: CheckoutConfig,
    pub nextpay: NextpayConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Site-level settings the checkout flow reads
#[derive(Debug, Clone)]
pub struct CheckoutConfig {
    /// Public base URL of the application, without trailing slash
    pub app_url: String,
    /// Shared secret for callback URL digests
    pub callback_secret: String,
    /// Display currency of the site (e.g. IRR, USD)
    pub currency: String,
}

/// Nextpay integration settings
#[derive(Debug, Clone)]
pub struct NextpayConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log format options
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Plain,
}

pub const DEFAULT_NEXTPAY_BASE_URL: &str = "https://api.nextpay.org/gateway";

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenv::dotenv().ok();

        Ok(AppConfig {
            server: ServerConfig::from_env()?,
            checkout: CheckoutConfig::from_env()?,
            nextpay: NextpayConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.checkout.validate()?;
        self.nextpay.validate()?;
        self.logging.validate()?;

        Ok(())
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(ServerConfig {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidValue(
                "SERVER_PORT cannot be 0".to_string(),
            ));
        }

        if self.host.is_empty() {
            return Err(ConfigError::InvalidValue(
                "SERVER_HOST cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl CheckoutConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_url =
            env::var("APP_URL").map_err(|_| ConfigError::MissingVariable("APP_URL".to_string()))?;

        Ok(CheckoutConfig {
            app_url: app_url.trim_end_matches('/').to_string(),
            callback_secret: env::var("CHECKOUT_CALLBACK_SECRET").map_err(|_| {
                ConfigError::MissingVariable("CHECKOUT_CALLBACK_SECRET".to_string())
            })?,
            currency: normalize_currency(
                &env::var("SITE_CURRENCY").unwrap_or_else(|_| "USD".to_string()),
            ),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_http_url(&self.app_url) {
            return Err(ConfigError::InvalidValue(
                "APP_URL must be a valid URL".to_string(),
            ));
        }

        if self.callback_secret.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "CHECKOUT_CALLBACK_SECRET cannot be empty".to_string(),
            ));
        }

        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue("SITE_CURRENCY".to_string()));
        }

        Ok(())
    }

    pub fn error_page_url(&self) -> String {
        format!("{}/checkout/error", self.app_url)
    }
}

impl NextpayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(NextpayConfig {
            api_key: env::var("NEXTPAY_API_KEY")
                .map_err(|_| ConfigError::MissingVariable("NEXTPAY_API_KEY".to_string()))?,
            base_url: env::var("NEXTPAY_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NEXTPAY_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: env::var("NEXTPAY_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("NEXTPAY_TIMEOUT_SECS".to_string()))?,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "NEXTPAY_API_KEY cannot be empty".to_string(),
            ));
        }

        if !is_http_url(&self.base_url) {
            return Err(ConfigError::InvalidValue(
                "NEXTPAY_BASE_URL must be a valid URL".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "NEXTPAY_TIMEOUT_SECS".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for NextpayConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_NEXTPAY_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "INFO".to_string()),
            format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "plain".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Plain,
            },
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];
        if !valid_levels.contains(&self.level.to_uppercase().as_str()) {
            return Err(ConfigError::InvalidValue("LOG_LEVEL".to_string()));
        }

        Ok(())
    }
}

fn normalize_currency(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),

    #[error("Invalid value for configuration: {0}")]
    InvalidValue(String),
}
