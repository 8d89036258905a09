//! # Custody HTTP Client
//!
//! `reqwest` implementation of [`CustodyApi`].
//!
//! ## Request Flow
//!
//! ```text
//! 1. Build GET request (X-API-Key, optional bearer token)
//!              ↓
//! 2. Send with per-request timeout
//!              ↓
//! 3. classify_response(status, retry-after, body)
//!              ↓
//! 4. Typed body, RateLimited, Status, or Decode error
//! ```
//!
//! Request signing is not done here. When the deployment requires a signed
//! token it is produced elsewhere and passed in through `CUSTODY_API_TOKEN`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, RETRY_AFTER};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{ApiError, CustodyApi};
use crate::config::AppConfig;
use crate::models::{AssetBalance, AssetDetails, DepositAddress, VaultPage};
use crate::utils::truncate_string;

/// HTTP client for the custody API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// ## Usage
///
/// ```rust,ignore
/// let config = AppConfig::from_env()?;
/// let client = CustodyHttpClient::new(&config)?;
/// let first_page = client.list_vaults(None).await?;
/// ```
#[derive(Clone)]
pub struct CustodyHttpClient {
    /// API root. Endpoint paths are appended as encoded segments.
    base_url: Url,

    /// Pooled reqwest client with auth headers preset.
    http: Client,
}

impl CustodyHttpClient {
    /// Create a new client from configuration.
    ///
    /// ## Returns
    ///
    /// * `Ok(CustodyHttpClient)` - Client created successfully
    /// * `Err(ApiError::Transport)` - Invalid base URL, header values or TLS setup failure
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.custody_api_base_url)
            .map_err(|e| ApiError::Transport(format!("Invalid custody API URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            "X-API-Key",
            HeaderValue::from_str(&config.custody_api_key)
                .map_err(|e| ApiError::Transport(format!("Invalid API key header: {}", e)))?,
        );
        if let Some(token) = &config.custody_api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::Transport(format!("Invalid bearer token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        info!("Custody client initialized:");
        info!("  API: {}", config.custody_api_base_url);
        info!("  Timeout: {:?}", config.request_timeout);

        Ok(Self { base_url, http })
    }

    /// Issue a GET and classify the response.
    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Option<T>, ApiError> {
        let url = endpoint_url(&self.base_url, segments)?;
        let path = url.path().to_string();
        debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("GET {} failed: {}", path, e)))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read body of {}: {}", path, e)))?;

        classify_response(status, retry_after, &body)
    }

    /// GET an endpoint that always returns a body.
    async fn get_required<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ApiError> {
        self.get(segments, &[]).await?.ok_or_else(|| {
            ApiError::Decode(format!("Empty response from /{}", segments.join("/")))
        })
    }
}

/// Append `segments` to `base`, percent-encoding each one so ids cannot
/// add path components or a query string.
pub fn endpoint_url(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::Transport(format!("Custody API URL {} cannot have a path", base)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Turn a raw HTTP response into a typed result.
///
/// * 429 → [`ApiError::RateLimited`] carrying the raw `retry-after` header
/// * other non-2xx → [`ApiError::Status`]
/// * 2xx with an empty or `null` body → `Ok(None)`
/// * 2xx with a body → decoded `Ok(Some(T))`, or [`ApiError::Decode`]
pub fn classify_response<T: DeserializeOwned>(
    status: StatusCode,
    retry_after: Option<String>,
    body: &str,
) -> Result<Option<T>, ApiError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ApiError::RateLimited { retry_after });
    }

    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
            body: truncate_string(body, 512),
        });
    }

    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl CustodyApi for CustodyHttpClient {
    async fn list_vaults(&self, after: Option<String>) -> Result<Option<VaultPage>, ApiError> {
        let segments = ["v1", "vault", "accounts_paged"];
        match after.as_deref() {
            Some(cursor) => self.get(&segments, &[("after", cursor)]).await,
            None => self.get(&segments, &[]).await,
        }
    }

    async fn deposit_addresses(
        &self,
        vault_id: &str,
        asset_id: &str,
    ) -> Result<Vec<DepositAddress>, ApiError> {
        let segments = ["v1", "vault", "accounts", vault_id, asset_id, "addresses"];
        Ok(self.get(&segments, &[]).await?.unwrap_or_default())
    }

    async fn asset_details(&self, asset_id: &str) -> Result<AssetDetails, ApiError> {
        Ok(self
            .get(&["v1", "assets", asset_id], &[])
            .await?
            .unwrap_or_default())
    }

    async fn asset_balance(
        &self,
        vault_id: &str,
        asset_id: &str,
    ) -> Result<AssetBalance, ApiError> {
        self.get_required(&["v1", "vault", "accounts", vault_id, asset_id])
            .await
    }
}
