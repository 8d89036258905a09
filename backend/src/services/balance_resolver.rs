//! # Balance Resolver Service
//!
//! Answers "how much of token X is spendable" by finding the vault that
//! holds the token in the address index and asking the custody API for the
//! live balance of that (vault, asset) pair.
//!
//! ## Lookup Flow
//!
//! ```text
//! 1. address_index()                      (cached)
//!               ↓
//! 2. first entry whose asset_address == token (case-insensitive)
//!               ↓ none → Ok(None), no balance call
//! 3. asset_balance(vault_id, asset_id)    (rate limited)
//!               ↓
//! 4. `available`, exactly as the API reported it
//! ```
//!
//! The deposit address argument is accepted but does not take part in the
//! match: the first vault holding the token answers. Amounts are passed
//! through as decimal strings with no unit conversion.

use std::sync::Arc;

use tracing::debug;

use super::{RateLimitedExecutor, VaultDirectory};
use crate::custody::{ApiError, CustodyApi};

/// The Balance Resolver service.
///
/// ## Usage
///
/// ```rust,ignore
/// let resolver = BalanceResolver::new(directory, api, executor);
///
/// match resolver.balance("0x5B38...", "0xA0b8...").await? {
///     Some(available) => println!("available: {}", available),
///     None => println!("no vault holds this token"),
/// }
/// ```
#[derive(Clone)]
pub struct BalanceResolver {
    /// Address index.
    directory: Arc<VaultDirectory>,

    /// Custody API for live balances.
    api: Arc<dyn CustodyApi>,

    executor: RateLimitedExecutor,
}

impl BalanceResolver {
    pub fn new(
        directory: Arc<VaultDirectory>,
        api: Arc<dyn CustodyApi>,
        executor: RateLimitedExecutor,
    ) -> Self {
        Self {
            directory,
            api,
            executor,
        }
    }

    /// Spendable balance of `token_address`.
    ///
    /// ## Arguments
    ///
    /// * `deposit_address` - Address the caller is asking about (not used for matching)
    /// * `token_address` - Token contract to look up
    ///
    /// ## Returns
    ///
    /// * `Ok(Some(amount))` - Balance string reported by the custody API
    /// * `Ok(None)` - No index entry holds the token
    /// * `Err(...)` - Building the index or fetching the balance failed
    pub async fn balance(
        &self,
        deposit_address: &str,
        token_address: &str,
    ) -> Result<Option<String>, ApiError> {
        let index = self.directory.address_index().await?;

        let Some(entry) = index
            .iter()
            .find(|entry| entry.has_asset_address(token_address))
        else {
            debug!(
                "No vault holds token {} (queried for {})",
                token_address, deposit_address
            );
            return Ok(None);
        };

        debug!(
            "Token {} held by vault {} as {} (queried for {})",
            token_address, entry.vault_id, entry.asset_id, deposit_address
        );

        let balance = self
            .executor
            .execute(|| self.api.asset_balance(&entry.vault_id, &entry.asset_id))
            .await?;

        Ok(Some(balance.available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::custody::mock::{Call, MockCustodyApi};
    use crate::services::{DirectoryOptions, ManualClock, RefreshPolicy};

    fn resolver_with(
        api: Arc<MockCustodyApi>,
        refresh_policy: RefreshPolicy,
    ) -> BalanceResolver {
        let executor = RateLimitedExecutor::new(5, std::time::Duration::from_millis(1));
        let directory = Arc::new(VaultDirectory::new(
            api.clone(),
            executor,
            DirectoryOptions {
                refresh_policy,
                ..DirectoryOptions::default()
            },
            Arc::new(ManualClock::new()),
        ));
        BalanceResolver::new(directory, api, executor)
    }

    fn resolver(api: Arc<MockCustodyApi>) -> BalanceResolver {
        resolver_with(api, RefreshPolicy::WithinTtl)
    }

    fn two_vaults() -> Arc<MockCustodyApi> {
        Arc::new(
            MockCustodyApi::new()
                .with_vault("V1", "A1", &["0xAAA"], Some("0xTOKEN1"))
                .with_vault("V2", "A2", &["0xBBB"], Some("0xTOKEN2"))
                .with_balance("V1", "A1", "10.5")
                .with_balance("V2", "A2", "0.000001"),
        )
    }

    #[tokio::test]
    async fn test_balance_by_token() {
        let api = two_vaults();
        let resolver = resolver(api.clone());

        let balance = resolver.balance("0xAAA", "0xtoken1").await.unwrap();

        assert_eq!(balance.as_deref(), Some("10.5"));
        assert_eq!(
            api.calls().last(),
            Some(&Call::AssetBalance("V1".to_string(), "A1".to_string()))
        );
    }

    #[tokio::test]
    async fn test_deposit_address_does_not_narrow_match() {
        let api = two_vaults();
        let resolver = resolver(api.clone());

        // 0xAAA belongs to V1, but the token is only held by V2.
        let balance = resolver.balance("0xAAA", "0xTOKEN2").await.unwrap();

        assert_eq!(balance.as_deref(), Some("0.000001"));
        assert_eq!(
            api.calls().last(),
            Some(&Call::AssetBalance("V2".to_string(), "A2".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_token_makes_no_balance_call() {
        let api = two_vaults();
        let resolver = resolver(api.clone());

        let balance = resolver.balance("0xAAA", "0xTOKEN3").await.unwrap();

        assert_eq!(balance, None);
        assert!(!api
            .calls()
            .iter()
            .any(|call| matches!(call, Call::AssetBalance(..))));
    }

    #[tokio::test]
    async fn test_native_assets_are_not_matched() {
        let api = Arc::new(
            MockCustodyApi::new()
                .with_vault("V1", "ETH", &["0xAAA"], None)
                .with_balance("V1", "ETH", "3"),
        );
        let resolver = resolver(api);

        assert_eq!(resolver.balance("0xAAA", "").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_throttled_balance_call_is_retried() {
        let api = two_vaults();
        let resolver = resolver_with(api.clone(), RefreshPolicy::AfterTtl);
        resolver.directory.address_index().await.unwrap();
        let calls_before = api.call_count();

        api.throttle(2, Some("1"));
        let balance = resolver.balance("0xBBB", "0xTOKEN2").await.unwrap();

        assert_eq!(balance.as_deref(), Some("0.000001"));
        assert_eq!(api.call_count(), calls_before + 3);
    }

    #[tokio::test]
    async fn test_balance_failure_propagates() {
        let api = Arc::new(
            MockCustodyApi::new().with_vault("V1", "A1", &["0xAAA"], Some("0xTOKEN1")),
        );
        let resolver = resolver(api);

        let err = resolver.balance("0xAAA", "0xTOKEN1").await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
    }
}
