//! # CLI Response Models
//!
//! JSON documents printed to stdout by the `vault-directory` binary.
//! A lookup miss is reported as `null`, not as an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FlattenedVaultDetail;

/// Result of `vault-directory resolve`.
///
/// ```json
/// { "address": "0xaaa", "vaultId": "1" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    /// Address as it was queried.
    pub address: String,

    /// Owning vault, or `null` when the address is unknown.
    pub vault_id: Option<String>,
}

/// Result of `vault-directory balance`.
///
/// ```json
/// { "depositAddress": "0xaaa", "tokenAddress": "0xtoken", "available": "12.5" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    pub deposit_address: String,

    pub token_address: String,

    /// Spendable amount as reported by the custody API, or `null` when no
    /// vault holds the token.
    pub available: Option<String>,
}

/// Result of `vault-directory index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexResponse {
    /// Number of entries.
    pub count: usize,

    /// When this snapshot was printed.
    pub generated_at: DateTime<Utc>,

    pub entries: Vec<FlattenedVaultDetail>,
}

impl IndexResponse {
    pub fn new(entries: Vec<FlattenedVaultDetail>) -> Self {
        Self {
            count: entries.len(),
            generated_at: Utc::now(),
            entries,
        }
    }
}
