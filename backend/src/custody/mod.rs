//! # Custody API Module
//!
//! The seam between the directory services and the remote custodial wallet
//! API. Services only see the [`CustodyApi`] trait; [`CustodyHttpClient`]
//! is the production implementation.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Paged |
//! |--------|----------|-------|
//! | `list_vaults` | `GET /v1/vault/accounts_paged?after=` | yes |
//! | `deposit_addresses` | `GET /v1/vault/accounts/{vault}/{asset}/addresses` | no |
//! | `asset_details` | `GET /v1/assets/{asset}` | no |
//! | `asset_balance` | `GET /v1/vault/accounts/{vault}/{asset}` | no |
//!
//! Any endpoint may answer HTTP 429 with an optional `retry-after` header
//! in milliseconds. That case surfaces as [`ApiError::RateLimited`] and is
//! handled by the `RateLimitedExecutor`, never here.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AssetBalance, AssetDetails, DepositAddress, VaultPage};

pub mod http;
#[cfg(test)]
pub mod mock;

pub use http::CustodyHttpClient;

/// Errors returned by the custody API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// HTTP 429. `retry_after` is the raw header value, if any.
    #[error("Rate limited by custody API (retry-after: {retry_after:?})")]
    RateLimited { retry_after: Option<String> },

    /// Any other non-success status.
    #[error("Custody API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether this is a throttling response.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// The raw `retry-after` hint of a throttling response.
    pub fn retry_after_hint(&self) -> Option<&str> {
        match self {
            ApiError::RateLimited { retry_after } => retry_after.as_deref(),
            _ => None,
        }
    }
}

/// Read-only view of the custodial wallet API.
///
/// Every method is a single remote call. Retrying and pagination are layered
/// on top by the services.
#[async_trait]
pub trait CustodyApi: Send + Sync {
    /// Fetch one page of vault accounts starting after `after`.
    ///
    /// `Ok(None)` means the API answered with an empty or `null` body.
    async fn list_vaults(&self, after: Option<String>) -> Result<Option<VaultPage>, ApiError>;

    /// Deposit addresses of one asset in one vault.
    async fn deposit_addresses(
        &self,
        vault_id: &str,
        asset_id: &str,
    ) -> Result<Vec<DepositAddress>, ApiError>;

    /// On-chain metadata of an asset.
    async fn asset_details(&self, asset_id: &str) -> Result<AssetDetails, ApiError>;

    /// Live balance of one asset in one vault.
    async fn asset_balance(&self, vault_id: &str, asset_id: &str)
        -> Result<AssetBalance, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_hint() {
        let err = ApiError::RateLimited {
            retry_after: Some("200".to_string()),
        };
        assert!(err.is_rate_limited());
        assert_eq!(err.retry_after_hint(), Some("200"));

        let err = ApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert!(!err.is_rate_limited());
        assert_eq!(err.retry_after_hint(), None);
    }
}
