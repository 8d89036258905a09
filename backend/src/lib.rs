//! # Custody Vault Directory
//!
//! Resolves on-chain deposit addresses to custodial vault accounts and
//! reads live vault balances from a custodial wallet API.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     CUSTODY VAULT DIRECTORY                      │
//! │                                                                  │
//! │   settlement layer                                               │
//! │         │ resolve_vault_for_address()       balance()            │
//! │         ▼                                       ▼                │
//! │  ┌──────────────────┐                ┌──────────────────┐        │
//! │  │  VaultDirectory  │◄───────────────│ BalanceResolver  │        │
//! │  └────────┬─────────┘                └────────┬─────────┘        │
//! │           │   TtlCache · Paginator             │                  │
//! │           ▼                                    ▼                  │
//! │  ┌─────────────────────────────────────────────────────────┐     │
//! │  │          RateLimitedExecutor (HTTP 429 retry)           │     │
//! │  └─────────────────────────────┬───────────────────────────┘     │
//! │                                ▼                                 │
//! │                   CustodyApi (reqwest client)                    │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything is read-only against the custody API. Lookup misses are
//! `Ok(None)`; remote failures are `Err(ApiError)`.

pub mod config;
pub mod custody;
pub mod logging;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use config::AppConfig;
use custody::CustodyApi;
use services::{
    BalanceResolver, Clock, DirectoryOptions, RateLimitedExecutor, SystemClock, VaultDirectory,
};

/// The composed services, sharing one custody client.
///
/// ## Usage
///
/// ```rust,ignore
/// let api = Arc::new(CustodyHttpClient::new(&config)?);
/// let state = AppState::new(api, &config);
/// let vault = state.directory.resolve_vault_for_address("0x5B38...").await?;
/// ```
#[derive(Clone)]
pub struct AppState {
    /// Address → vault index
    pub directory: Arc<VaultDirectory>,

    /// Token → balance lookups
    pub balances: BalanceResolver,
}

impl AppState {
    pub fn new(api: Arc<dyn CustodyApi>, config: &AppConfig) -> Self {
        Self::with_clock(api, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        api: Arc<dyn CustodyApi>,
        config: &AppConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let executor = RateLimitedExecutor::from_config(config);
        let directory = Arc::new(VaultDirectory::new(
            api.clone(),
            executor,
            DirectoryOptions::from_config(config),
            clock,
        ));
        let balances = BalanceResolver::new(directory.clone(), api, executor);

        Self {
            directory,
            balances,
        }
    }
}
