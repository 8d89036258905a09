//! # Services Module
//!
//! The address resolution and balance query services, and the building
//! blocks they are composed from.
//!
//! ## Services Overview
//!
//! | Service | Responsibility |
//! |---------|---------------|
//! | `RateLimitedExecutor` | Retry a custody call while it is throttled (HTTP 429) |
//! | `Paginator` | Drain a cursor-based listing |
//! | `TtlCache` | Memoize an async producer for a bounded time |
//! | `VaultDirectory` | Deposit address → vault / token contract index |
//! | `BalanceResolver` | Token contract → live spendable balance |
//!
//! ## Service Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        SERVICES LAYER                            │
//! │                                                                  │
//! │  ┌──────────────────┐         ┌──────────────────────────────┐  │
//! │  │ BalanceResolver  │────────→│ VaultDirectory               │  │
//! │  │  • balance()     │         │  • resolve_vault_for_address │  │
//! │  └────────┬─────────┘         │  • address_index  [TtlCache] │  │
//! │           │                   │  • list_vaults    [TtlCache] │  │
//! │           │                   └──────────────┬───────────────┘  │
//! │           │                                  ▼                  │
//! │           │                          ┌────────────┐             │
//! │           │                          │ Paginator  │             │
//! │           │                          └─────┬──────┘             │
//! │           ▼                                ▼                    │
//! │  ┌──────────────────────────────────────────────────────────┐   │
//! │  │                 RateLimitedExecutor                       │   │
//! │  └──────────────────────────────────────────────────────────┘   │
//! │                              │                                   │
//! │                        CustodyApi                                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod balance_resolver;
pub mod clock;
pub mod paginator;
pub mod rate_limit;
pub mod ttl_cache;
pub mod vault_directory;

pub use balance_resolver::BalanceResolver;
#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use paginator::{CursorPage, Paginator};
pub use rate_limit::RateLimitedExecutor;
pub use ttl_cache::{CacheEntry, RefreshPolicy, TtlCache};
pub use vault_directory::{DirectoryOptions, VaultDirectory};
