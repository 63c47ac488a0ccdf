//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! Every variable is optional; the defaults describe the live shop.
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static`
//!   (default: this crate's `static/` directory)
//!
//! ## Store
//! - `STORE_NAME` - Name used in the page header and checkout message
//! - `WHATSAPP_NUMBER` - Seller's WhatsApp number, `+` followed by digits
//! - `UPI_ID` - UPI address shown on the checkout page
//! - `UPI_PAYEE_NAME` - Name registered to the UPI address
//! - `UPI_QR_URL` - Image URL of the UPI QR code
//! - `OFFER_ENDS_AT` - RFC 3339 instant the countdown runs to
//! - `TELEGRAM_URL`, `WHATSAPP_GROUP_URL`, `INSTAGRAM_URL` - Social links
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN (Sentry is off when unset)
//! - `SENTRY_ENVIRONMENT` - Environment tag for Sentry events
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0 to 1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Trace sample rate, 0.0 to 1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");
const DEFAULT_STORE_NAME: &str = "NFXSELLERAASHU";
const DEFAULT_WHATSAPP_NUMBER: &str = "+918863889778";
const DEFAULT_UPI_ID: &str = "aashusinghadi8252@okaxis";
const DEFAULT_UPI_PAYEE_NAME: &str = "ADITYA KUMAR";
const DEFAULT_UPI_QR_URL: &str = "https://i.ibb.co/3k5fN4W/qr-code-placeholder.png";
const DEFAULT_OFFER_ENDS_AT: &str = "2025-09-30T00:00:00Z";
const DEFAULT_TELEGRAM_URL: &str = "https://t.me/NETFLIXCHEAPSERVICE";
const DEFAULT_WHATSAPP_GROUP_URL: &str = "https://chat.whatsapp.com/DJYW1k5F5Dm2JcSvNph3ut";
const DEFAULT_INSTAGRAM_URL: &str = "https://www.instagram.com/nfxseller/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: Url,
    /// Directory with CSS, JS and images
    pub static_dir: PathBuf,
    /// Shop identity, payment details and links
    pub store: StoreConfig,
    /// Sentry error tracking
    pub sentry: SentryConfig,
}

/// What the shop tells its visitors: name, payment details, social links.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub name: String,
    /// `+` followed by digits
    pub whatsapp_number: String,
    pub upi_id: String,
    pub upi_payee_name: String,
    pub upi_qr_url: Url,
    pub offer_ends_at: DateTime<Utc>,
    pub social: SocialLinks,
}

#[derive(Debug, Clone)]
pub struct SocialLinks {
    pub telegram: Url,
    pub whatsapp_group: Url,
    pub instagram: Url,
}

/// Sentry configuration.
///
/// Implements `Debug` manually to redact the DSN.
#[derive(Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<SecretString>,
    pub environment: Option<String>,
    pub sample_rate: f32,
    pub traces_sample_rate: f32,
}

impl std::fmt::Debug for SentryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentryConfig")
            .field("dsn", &self.dsn.as_ref().map(|_| "[REDACTED]"))
            .field("environment", &self.environment)
            .field("sample_rate", &self.sample_rate)
            .field("traces_sample_rate", &self.traces_sample_rate)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration through a variable lookup function.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any variable is set to an invalid value.
    pub fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = parse_env(env, "STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env(env, "STOREFRONT_PORT", "3000")?;
        let base_url = get_url(env, "STOREFRONT_BASE_URL", "http://localhost:3000")?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir: PathBuf::from(get_env_or_default(
                env,
                "STOREFRONT_STATIC_DIR",
                DEFAULT_STATIC_DIR,
            )),
            store: StoreConfig::from_lookup(env)?,
            sentry: SentryConfig::from_lookup(env)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl StoreConfig {
    fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let whatsapp_number = get_env_or_default(env, "WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER);
        validate_phone_number(&whatsapp_number, "WHATSAPP_NUMBER")?;

        let offer_ends_at = DateTime::parse_from_rfc3339(&get_env_or_default(
            env,
            "OFFER_ENDS_AT",
            DEFAULT_OFFER_ENDS_AT,
        ))
        .map_err(|e| ConfigError::InvalidEnvVar("OFFER_ENDS_AT".to_string(), e.to_string()))?
        .with_timezone(&Utc);

        Ok(Self {
            name: get_env_or_default(env, "STORE_NAME", DEFAULT_STORE_NAME),
            whatsapp_number,
            upi_id: get_env_or_default(env, "UPI_ID", DEFAULT_UPI_ID),
            upi_payee_name: get_env_or_default(env, "UPI_PAYEE_NAME", DEFAULT_UPI_PAYEE_NAME),
            upi_qr_url: get_url(env, "UPI_QR_URL", DEFAULT_UPI_QR_URL)?,
            offer_ends_at,
            social: SocialLinks {
                telegram: get_url(env, "TELEGRAM_URL", DEFAULT_TELEGRAM_URL)?,
                whatsapp_group: get_url(env, "WHATSAPP_GROUP_URL", DEFAULT_WHATSAPP_GROUP_URL)?,
                instagram: get_url(env, "INSTAGRAM_URL", DEFAULT_INSTAGRAM_URL)?,
            },
        })
    }
}

impl SentryConfig {
    fn from_lookup(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            dsn: get_optional_env(env, "SENTRY_DSN").map(SecretString::from),
            environment: get_optional_env(env, "SENTRY_ENVIRONMENT"),
            sample_rate: get_sample_rate(env, "SENTRY_SAMPLE_RATE", "1.0")?,
            traces_sample_rate: get_sample_rate(env, "SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable. Blank values count as unset.
fn get_optional_env(env: &dyn Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    env(key).filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    get_optional_env(env, key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable (or its default) with `FromStr`.
fn parse_env<T>(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(env, key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get an absolute http(s) URL.
fn get_url(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<Url, ConfigError> {
    let url: Url = parse_env(env, key, default)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Get a sampling rate in `0.0..=1.0`.
fn get_sample_rate(env: &dyn Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<f32, ConfigError> {
    let rate: f32 = parse_env(env, key, default)?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Validate a phone number in `+<digits>` form.
fn validate_phone_number(value: &str, var_name: &str) -> Result<(), ConfigError> {
    let digits = value.strip_prefix('+').unwrap_or_default();
    if digits.len() < 8 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be '+' followed by the full international number".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(&|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert!(config.static_dir.ends_with("static"));
        assert_eq!(config.store.name, "NFXSELLERAASHU");
        assert_eq!(config.store.whatsapp_number, "+918863889778");
        assert_eq!(config.store.upi_id, "aashusinghadi8252@okaxis");
        assert_eq!(config.store.offer_ends_at.to_rfc3339(), "2025-09-30T00:00:00+00:00");
        assert!(config.sentry.dsn.is_none());
        assert!((config.sentry.sample_rate - 1.0).abs() < f32::EPSILON);
        assert!(config.sentry.traces_sample_rate.abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_PORT", "8080"),
            ("STORE_NAME", "Test Shop"),
            ("WHATSAPP_NUMBER", "+15555550100"),
            ("SENTRY_DSN", "https://key@sentry.example.com/1"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store.name, "Test Shop");
        assert_eq!(
            config.sentry.dsn.as_ref().unwrap().expose_secret(),
            "https://key@sentry.example.com/1"
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_default() {
        let config = load(&[("STORE_NAME", "  "), ("SENTRY_DSN", "")]).unwrap();
        assert_eq!(config.store.name, "NFXSELLERAASHU");
        assert!(config.sentry.dsn.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "seventy")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_whatsapp_number() {
        for bad in ["918863889778", "+91 88638 89778", "+12"] {
            let err = load(&[("WHATSAPP_NUMBER", bad)]).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "WHATSAPP_NUMBER"));
        }
    }

    #[test]
    fn test_invalid_urls() {
        assert!(load(&[("TELEGRAM_URL", "not a url")]).is_err());
        assert!(load(&[("UPI_QR_URL", "ftp://example.com/qr.png")]).is_err());
    }

    #[test]
    fn test_invalid_offer_end() {
        assert!(load(&[("OFFER_ENDS_AT", "next tuesday")]).is_err());
    }

    #[test]
    fn test_sample_rate_range() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).is_ok());
    }

    #[test]
    fn test_sentry_config_debug_redacts_dsn() {
        let config = SentryConfig {
            dsn: Some(SecretString::from("https://super_secret_key@sentry.io/1")),
            environment: Some("production".to_string()),
            sample_rate: 1.0,
            traces_sample_rate: 0.0,
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("production"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_key"));
    }
}
