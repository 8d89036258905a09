//! Scripted in-memory [`CustodyApi`] for tests.
//!
//! Every call is appended to a log so tests can assert exactly which remote
//! requests were made, and queued failures are replayed before the scripted
//! data is served.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ApiError, CustodyApi};
use crate::models::{
    AssetBalance, AssetDetails, AssetHolding, DepositAddress, OnchainDetails, Paging,
    VaultAccount, VaultPage,
};

/// A recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListVaults(Option<String>),
    DepositAddresses(String, String),
    AssetDetails(String),
    AssetBalance(String, String),
}

#[derive(Default)]
struct State {
    /// Vault pages keyed by the cursor that requests them.
    pages: HashMap<Option<String>, Option<VaultPage>>,
    addresses: HashMap<(String, String), Vec<DepositAddress>>,
    details: HashMap<String, AssetDetails>,
    balances: HashMap<(String, String), AssetBalance>,
    /// Errors returned, in order, before any scripted response.
    failures: VecDeque<ApiError>,
    calls: Vec<Call>,
}

#[derive(Default)]
pub struct MockCustodyApi {
    state: Mutex<State>,
}

impl MockCustodyApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` for the listing request made with `cursor`.
    pub fn with_page(self, cursor: Option<&str>, page: Option<VaultPage>) -> Self {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(cursor.map(str::to_string), page);
        self
    }

    /// Register a vault holding one asset with the given deposit addresses
    /// and contract, served as a single unpaged listing.
    pub fn with_vault(
        self,
        vault_id: &str,
        asset_id: &str,
        addresses: &[&str],
        contract: Option<&str>,
    ) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            let page = state
                .pages
                .entry(None)
                .or_insert_with(|| Some(VaultPage::default()))
                .get_or_insert_with(VaultPage::default);
            page.accounts.push(VaultAccount {
                id: vault_id.to_string(),
                name: None,
                assets: vec![AssetHolding {
                    asset_id: asset_id.to_string(),
                }],
            });
            state.addresses.insert(
                (vault_id.to_string(), asset_id.to_string()),
                addresses
                    .iter()
                    .map(|a| DepositAddress {
                        address: a.to_string(),
                    })
                    .collect(),
            );
            state.details.insert(
                asset_id.to_string(),
                AssetDetails {
                    onchain: Some(OnchainDetails {
                        address: contract.map(str::to_string),
                        decimals: None,
                    }),
                },
            );
        }
        self
    }

    pub fn with_balance(self, vault_id: &str, asset_id: &str, available: &str) -> Self {
        self.state.lock().unwrap().balances.insert(
            (vault_id.to_string(), asset_id.to_string()),
            AssetBalance {
                available: available.to_string(),
                total: None,
            },
        );
        self
    }

    /// Queue an error to be returned by the next call, whichever it is.
    pub fn fail_next(&self, error: ApiError) {
        self.state.lock().unwrap().failures.push_back(error);
    }

    /// Queue `times` throttling responses.
    pub fn throttle(&self, times: usize, retry_after: Option<&str>) {
        for _ in 0..times {
            self.fail_next(ApiError::RateLimited {
                retry_after: retry_after.map(str::to_string),
            });
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Build a listing page.
pub fn page(accounts: Vec<VaultAccount>, after: Option<&str>) -> VaultPage {
    VaultPage {
        accounts,
        paging: after.map(|cursor| Paging {
            after: Some(cursor.to_string()),
        }),
    }
}

/// Build a vault account with the given asset ids.
pub fn vault(id: &str, assets: &[&str]) -> VaultAccount {
    VaultAccount {
        id: id.to_string(),
        name: None,
        assets: assets
            .iter()
            .map(|asset_id| AssetHolding {
                asset_id: asset_id.to_string(),
            })
            .collect(),
    }
}

#[async_trait]
impl CustodyApi for MockCustodyApi {
    async fn list_vaults(&self, after: Option<String>) -> Result<Option<VaultPage>, ApiError> {
        self.record(Call::ListVaults(after.clone()))?;
        let state = self.state.lock().unwrap();
        Ok(state.pages.get(&after).cloned().flatten())
    }

    async fn deposit_addresses(
        &self,
        vault_id: &str,
        asset_id: &str,
    ) -> Result<Vec<DepositAddress>, ApiError> {
        self.record(Call::DepositAddresses(
            vault_id.to_string(),
            asset_id.to_string(),
        ))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .addresses
            .get(&(vault_id.to_string(), asset_id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn asset_details(&self, asset_id: &str) -> Result<AssetDetails, ApiError> {
        self.record(Call::AssetDetails(asset_id.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state.details.get(asset_id).cloned().unwrap_or_default())
    }

    async fn asset_balance(
        &self,
        vault_id: &str,
        asset_id: &str,
    ) -> Result<AssetBalance, ApiError> {
        self.record(Call::AssetBalance(vault_id.to_string(), asset_id.to_string()))?;
        let state = self.state.lock().unwrap();
        state
            .balances
            .get(&(vault_id.to_string(), asset_id.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                body: format!("no balance for {}/{}", vault_id, asset_id),
            })
    }
}
