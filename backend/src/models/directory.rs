//! # Directory Models
//!
//! The address index is a flat list with one entry per
//! (vault, asset, deposit address) triple.

use serde::{Deserialize, Serialize};

use crate::utils::{addresses_match, normalize_address};

/// One row of the address index.
///
/// ## Example JSON
///
/// ```json
/// {
///     "vaultId": "3",
///     "assetId": "USDC_ETH",
///     "depositAddress": "0x5b38da6a701c568545dcfcb03fcb875f56beddc4",
///     "assetAddress": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedVaultDetail {
    /// Owning vault.
    pub vault_id: String,

    /// Asset the deposit address was issued for.
    pub asset_id: String,

    /// Deposit address, lower-cased.
    pub deposit_address: String,

    /// Token contract of the asset. `None` for native assets.
    pub asset_address: Option<String>,
}

impl FlattenedVaultDetail {
    pub fn new(
        vault_id: impl Into<String>,
        asset_id: impl Into<String>,
        deposit_address: &str,
        asset_address: Option<String>,
    ) -> Self {
        Self {
            vault_id: vault_id.into(),
            asset_id: asset_id.into(),
            deposit_address: normalize_address(deposit_address),
            asset_address,
        }
    }

    /// Case-insensitive match on the deposit address.
    pub fn has_deposit_address(&self, address: &str) -> bool {
        addresses_match(&self.deposit_address, address)
    }

    /// Case-insensitive match on the token contract. Native assets never match.
    pub fn has_asset_address(&self, token_address: &str) -> bool {
        self.asset_address
            .as_deref()
            .map_or(false, |own| addresses_match(own, token_address))
    }
}
