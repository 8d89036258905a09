//! # Custody API Models
//!
//! Response bodies of the custodial wallet API. These are read-only to this
//! crate: the remote API is the source of truth and nothing here is written
//! back.

use serde::{Deserialize, Serialize};

/// One page of the vault listing.
///
/// ## Example JSON
///
/// ```json
/// {
///     "accounts": [{ "id": "0", "assets": [{ "id": "USDC_ETH" }] }],
///     "paging": { "after": "MjA=" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultPage {
    /// Vault accounts on this page, in the order the API returned them.
    #[serde(default)]
    pub accounts: Vec<VaultAccount>,

    /// Paging metadata. Missing on the last page.
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl VaultPage {
    /// Cursor of the next page, if there is one.
    pub fn next_cursor(&self) -> Option<&str> {
        self.paging.as_ref().and_then(|p| p.after.as_deref())
    }
}

/// Paging metadata of a listing response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paging {
    /// Opaque continuation token. Absent when the listing is exhausted.
    #[serde(default)]
    pub after: Option<String>,
}

/// A custodial account that can hold several assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAccount {
    /// Opaque vault identifier.
    pub id: String,

    /// Human-readable vault name.
    #[serde(default)]
    pub name: Option<String>,

    /// Asset holdings, in API order. Vaults without assets omit the field.
    #[serde(default)]
    pub assets: Vec<AssetHolding>,
}

/// A single asset held by a vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    /// Chain/token identifier, e.g. `USDC_ETH`.
    #[serde(rename = "id")]
    pub asset_id: String,
}

/// A deposit address bound to a (vault, asset) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositAddress {
    /// Blockchain address.
    pub address: String,
}

/// On-chain metadata of an asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetails {
    /// On-chain section. Missing for off-chain assets.
    #[serde(default)]
    pub onchain: Option<OnchainDetails>,
}

impl AssetDetails {
    /// Contract address of the asset. `None` for native assets.
    pub fn contract_address(&self) -> Option<&str> {
        self.onchain.as_ref().and_then(|o| o.address.as_deref())
    }
}

/// The `onchain` section of [`AssetDetails`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnchainDetails {
    /// Token contract address.
    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub decimals: Option<u32>,
}

/// Balance of one asset inside one vault.
///
/// Amounts are decimal strings exactly as the API reports them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetBalance {
    /// Spendable amount.
    pub available: String,

    #[serde(default)]
    pub total: Option<String>,
}
