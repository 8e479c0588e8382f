//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_SHIPPING_RATE` - Flat shipping charge added at checkout (default: 10.00)
//! - `STOREFRONT_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `PRODUCT_API_BASE_URL` - Remote product API root (default: `https://server-28aj.onrender.com/api`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

pub const DEFAULT_PRODUCT_API_BASE_URL: &str = "https://server-28aj.onrender.com/api";
const DEFAULT_SHIPPING_RATE: &str = "10.00";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("expected `pretty` or `json`, got `{other}`")),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Flat shipping charge shown in the checkout summary
    pub shipping_rate: Decimal,
    /// Log output format
    pub log_format: LogFormat,
    /// Remote product API configuration
    pub product_api: ProductApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Remote product API configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductApiConfig {
    /// API root, e.g. `https://shop.example.com/api`
    pub base_url: Url,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let shipping_rate: Decimal = parse_env("STOREFRONT_SHIPPING_RATE", DEFAULT_SHIPPING_RATE)?;
        if shipping_rate.is_sign_negative() {
            return Err(ConfigError::InvalidEnvVar(
                "STOREFRONT_SHIPPING_RATE".to_string(),
                "must not be negative".to_string(),
            ));
        }
        let log_format = parse_env("STOREFRONT_LOG_FORMAT", "pretty")?;
        let product_api = ProductApiConfig::from_env()?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", "1.0")?;
        let sentry_traces_sample_rate = parse_rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?;

        Ok(Self {
            host,
            port,
            shipping_rate,
            log_format,
            product_api,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ProductApiConfig {
    /// Load the product API settings on their own (used by the CLI).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the base URL is not an absolute
    /// http(s) URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        let raw = get_env_or_default("PRODUCT_API_BASE_URL", DEFAULT_PRODUCT_API_BASE_URL);
        Self::parse(&raw)
    }

    /// Validate a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparseable or non-http(s) URLs.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| {
            ConfigError::InvalidEnvVar("PRODUCT_API_BASE_URL".to_string(), reason)
        };

        let base_url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme `{}`", base_url.scheme())));
        }
        Ok(Self { base_url })
    }

    /// Build an endpoint URL under the API root.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ProductApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_PRODUCT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default product API URL is valid")),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies in `0.0..=1.0`.
fn parse_rate(key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(key, default)?;
    validate_rate(key, rate)
}

fn validate_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}
