//! # Configuration Module
//!
//! This module handles loading and validating configuration from
//! environment variables. All settings are centralized here.
//!
//! ## Usage
//!
//! ```rust,ignore
//! dotenvy::dotenv().ok();
//! let config = AppConfig::from_env()?;
//! println!("Custody API: {}", config.custody_api_base_url);
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CUSTODY_API_BASE_URL` | Custody API root | `https://api.fireblocks.io` |
//! | `CUSTODY_API_KEY` | API key sent with every request | required |
//! | `CUSTODY_API_TOKEN` | Pre-issued bearer token | unset |
//! | `CUSTODY_REQUEST_TIMEOUT_SECS` | Per-request timeout | `30` |
//! | `RATE_LIMIT_MAX_RETRIES` | Retries after HTTP 429 | `30` |
//! | `RATE_LIMIT_DEFAULT_WAIT_MS` | Wait when the server sends no hint | `1000` |
//! | `VAULT_CACHE_TTL_SECS` | TTL shared by the directory caches | `60` |
//! | `VAULT_CACHE_REFRESH_POLICY` | `within-ttl` or `after-ttl` | `within-ttl` |
//! | `LOG_FORMAT` | `pretty` or `json` | `pretty` |
//!
//! `LOG_LEVEL` is read by the CLI itself (`--log-level`).

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::logging::LogFormat;
use crate::services::RefreshPolicy;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),

    /// Failed to parse a value
    #[error("Failed to parse {0}: {1}")]
    ParseError(String, String),
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // ==========================================
    // CUSTODY API SETTINGS
    // ==========================================

    /// Root URL of the custodial wallet API, without a trailing slash.
    pub custody_api_base_url: String,

    /// API key sent as `X-API-Key`.
    pub custody_api_key: String,

    /// Bearer token sent as `Authorization`, when the deployment issues one
    /// out of band.
    pub custody_api_token: Option<String>,

    /// Timeout applied to each individual HTTP request.
    pub request_timeout: Duration,

    // ==========================================
    // RATE LIMIT SETTINGS
    // ==========================================

    /// How many times a throttled call is retried before the 429 is
    /// surfaced to the caller.
    pub rate_limit_max_retries: u32,

    /// Wait used when a 429 carries no usable `retry-after` header.
    pub rate_limit_default_wait: Duration,

    // ==========================================
    // CACHE SETTINGS
    // ==========================================

    /// TTL shared by the vault listing and address index caches.
    pub vault_cache_ttl: Duration,

    /// How the caches treat the TTL.
    pub vault_cache_refresh_policy: RefreshPolicy,

    // ==========================================
    // LOGGING
    // ==========================================

    /// Log output format.
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Use `dotenvy::dotenv()` before calling this to load from `.env` file.
    ///
    /// ## Returns
    ///
    /// - `Ok(AppConfig)` - Configuration loaded successfully
    /// - `Err(ConfigError)` - A required variable is missing or invalid
    pub fn from_env() -> Result<Self, ConfigError> {
        let custody_api_base_url = get_env_or_default(
            "CUSTODY_API_BASE_URL",
            "https://api.fireblocks.io",
        )
        .trim_end_matches('/')
        .to_string();

        if !custody_api_base_url.starts_with("http://")
            && !custody_api_base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue(
                "CUSTODY_API_BASE_URL".to_string(),
                custody_api_base_url,
            ));
        }

        Ok(Self {
            custody_api_base_url,
            custody_api_key: get_env("CUSTODY_API_KEY")?,
            custody_api_token: env::var("CUSTODY_API_TOKEN")
                .ok()
                .filter(|token| !token.is_empty()),
            request_timeout: Duration::from_secs(parse_env_or_default(
                "CUSTODY_REQUEST_TIMEOUT_SECS",
                "30",
            )?),

            rate_limit_max_retries: parse_env_or_default("RATE_LIMIT_MAX_RETRIES", "30")?,
            rate_limit_default_wait: Duration::from_millis(parse_env_or_default(
                "RATE_LIMIT_DEFAULT_WAIT_MS",
                "1000",
            )?),

            vault_cache_ttl: Duration::from_secs(parse_env_or_default(
                "VAULT_CACHE_TTL_SECS",
                "60",
            )?),
            vault_cache_refresh_policy: parse_env_or_default(
                "VAULT_CACHE_REFRESH_POLICY",
                "within-ttl",
            )?,

            log_format: LogFormat::from_str_lossy(&get_env_or_default("LOG_FORMAT", "pretty")),
        })
    }
}

/// Get a required environment variable.
///
/// Returns an error if the variable is not set.
fn get_env(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
///
/// Returns the default if the variable is not set.
fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable with a default and parse it.
fn parse_env_or_default<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError(key.to_string(), e.to_string()))
}
