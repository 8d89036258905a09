//! # Vault Directory Service
//!
//! The VaultDirectory maps every deposit address known to the custody
//! provider to the vault that owns it and the token contract it receives.
//!
//! ## Responsibilities
//!
//! - Drain the paged vault listing
//! - Expand each (vault, asset) holding into its deposit addresses
//! - Attach the asset's on-chain contract to each address
//! - Keep both the listing and the address index in TTL caches
//! - Resolve an address to its vault, case-insensitively
//!
//! ## Index Build Flow
//!
//! ```text
//! list_vaults()                      (cached, paginated)
//!        ↓
//! for each vault, for each asset:    (sequential, one call at a time)
//!   deposit_addresses(vault, asset)
//!   asset_details(asset)
//!        ↓
//! [FlattenedVaultDetail]             (cached)
//! ```
//!
//! The directory never writes to the custody API.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info};

use super::{Clock, Paginator, RateLimitedExecutor, RefreshPolicy, TtlCache};
use crate::config::AppConfig;
use crate::custody::{ApiError, CustodyApi};
use crate::models::{FlattenedVaultDetail, VaultAccount, VaultPage};

/// Cache settings shared by the directory's caches.
#[derive(Debug, Clone, Copy)]
pub struct DirectoryOptions {
    pub ttl: Duration,
    pub refresh_policy: RefreshPolicy,
}

impl Default for DirectoryOptions {
    fn default() -> Self {
        Self {
            ttl: Duration::seconds(60),
            refresh_policy: RefreshPolicy::default(),
        }
    }
}

impl DirectoryOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            ttl: Duration::from_std(config.vault_cache_ttl)
                .unwrap_or_else(|_| Duration::weeks(52 * 100)),
            refresh_policy: config.vault_cache_refresh_policy,
        }
    }
}

/// The Vault Directory service.
///
/// ## Usage
///
/// ```rust,ignore
/// let directory = VaultDirectory::new(api, executor, DirectoryOptions::default(), Arc::new(SystemClock));
///
/// if let Some(vault_id) = directory.resolve_vault_for_address("0x5B38...").await? {
///     println!("owned by vault {}", vault_id);
/// }
/// ```
pub struct VaultDirectory {
    /// Cached, fully drained vault listing.
    vaults: Arc<TtlCache<Vec<VaultAccount>, ApiError>>,

    /// Cached address index built from the listing.
    index: TtlCache<Vec<FlattenedVaultDetail>, ApiError>,
}

impl VaultDirectory {
    /// Create a new VaultDirectory. Nothing is fetched until the first query.
    pub fn new(
        api: Arc<dyn CustodyApi>,
        executor: RateLimitedExecutor,
        options: DirectoryOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let vaults = {
            let api = api.clone();
            Arc::new(TtlCache::new(
                move || {
                    let api = api.clone();
                    async move { fetch_all_vaults(api.as_ref(), executor).await }
                },
                options.ttl,
                options.refresh_policy,
                clock.clone(),
            ))
        };

        let index = {
            let vaults = vaults.clone();
            TtlCache::new(
                move || {
                    let api = api.clone();
                    let vaults = vaults.clone();
                    async move {
                        let accounts = vaults.get().await?;
                        build_address_index(api.as_ref(), executor, &accounts).await
                    }
                },
                options.ttl,
                options.refresh_policy,
                clock,
            )
        };

        Self { vaults, index }
    }

    /// All vault accounts, subject to the cache policy.
    pub async fn list_vaults(&self) -> Result<Arc<Vec<VaultAccount>>, ApiError> {
        self.vaults.get().await
    }

    /// The flattened address index, subject to the cache policy.
    pub async fn address_index(&self) -> Result<Arc<Vec<FlattenedVaultDetail>>, ApiError> {
        self.index.get().await
    }

    /// Find the vault owning `address`.
    ///
    /// ## Returns
    ///
    /// * `Ok(Some(vault_id))` - First index entry whose deposit address matches
    /// * `Ok(None)` - The address is not in the current index
    /// * `Err(...)` - Building the index failed
    pub async fn resolve_vault_for_address(
        &self,
        address: &str,
    ) -> Result<Option<String>, ApiError> {
        let index = self.address_index().await?;
        let vault_id = index
            .iter()
            .find(|entry| entry.has_deposit_address(address))
            .map(|entry| entry.vault_id.clone());

        match &vault_id {
            Some(id) => debug!("Address {} belongs to vault {}", address, id),
            None => debug!("Address {} not found in {} index entries", address, index.len()),
        }

        Ok(vault_id)
    }

    /// Drop both cached snapshots. The next query rebuilds from the API.
    pub async fn invalidate(&self) {
        self.vaults.invalidate().await;
        self.index.invalidate().await;
    }
}

/// Drain the vault listing.
async fn fetch_all_vaults(
    api: &dyn CustodyApi,
    executor: RateLimitedExecutor,
) -> Result<Vec<VaultAccount>, ApiError> {
    let vaults = Paginator::new(executor)
        .collect(
            |cursor| api.list_vaults(cursor),
            |page: &VaultPage| page.accounts.clone(),
        )
        .await?;

    info!("Fetched {} vault accounts", vaults.len());
    Ok(vaults)
}

/// Expand every (vault, asset) holding into index entries.
async fn build_address_index(
    api: &dyn CustodyApi,
    executor: RateLimitedExecutor,
    vaults: &[VaultAccount],
) -> Result<Vec<FlattenedVaultDetail>, ApiError> {
    let mut index = Vec::new();

    for vault in vaults {
        for holding in &vault.assets {
            let addresses = executor
                .execute(|| api.deposit_addresses(&vault.id, &holding.asset_id))
                .await?;
            let details = executor
                .execute(|| api.asset_details(&holding.asset_id))
                .await?;

            let asset_address = details.contract_address().map(str::to_string);
            debug!(
                "Vault {} asset {}: {} addresses, contract {:?}",
                vault.id,
                holding.asset_id,
                addresses.len(),
                asset_address
            );

            index.extend(addresses.iter().map(|deposit| {
                FlattenedVaultDetail::new(
                    vault.id.as_str(),
                    holding.asset_id.as_str(),
                    &deposit.address,
                    asset_address.clone(),
                )
            }));
        }
    }

    info!(
        "Built address index: {} entries across {} vaults",
        index.len(),
        vaults.len()
    );
    Ok(index)
}
