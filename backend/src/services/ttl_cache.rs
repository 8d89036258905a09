//! # TTL Cache
//!
//! Memoizes a zero-argument async producer.
//!
//! ## States
//!
//! ```text
//! EMPTY ──get()──→ POPULATED(produced_at)
//!                      │
//!                      └─ get(): refresh or serve, decided by RefreshPolicy
//! ```
//!
//! | Policy | age <= ttl | age > ttl |
//! |--------|------------|-----------|
//! | `WithinTtl` (default) | run producer | serve stored value |
//! | `AfterTtl` | serve stored value | run producer |
//!
//! `WithinTtl` is the behaviour the settlement adapter has always shipped
//! with. It is the reverse of a conventional TTL cache; `AfterTtl` is the
//! conventional reading and is only used when configured explicitly.
//!
//! Concurrent `get()` calls are not coalesced. Two callers that both decide
//! to refresh both run the producer and the last write wins. The lock is
//! never held while the producer runs.

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::RwLock;
use tracing::debug;

use super::Clock;

/// How a [`TtlCache`] interprets its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    /// Recompute while the entry is younger than the TTL; serve the stored
    /// value once it is older.
    #[default]
    WithinTtl,
    /// Serve the stored value while it is younger than the TTL; recompute
    /// once it is older.
    AfterTtl,
}

impl RefreshPolicy {
    /// Whether an entry of age `elapsed` must be recomputed.
    fn should_refresh(self, elapsed: Duration, ttl: Duration) -> bool {
        match self {
            RefreshPolicy::WithinTtl => elapsed <= ttl,
            RefreshPolicy::AfterTtl => elapsed > ttl,
        }
    }
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "within-ttl" => Ok(RefreshPolicy::WithinTtl),
            "after-ttl" => Ok(RefreshPolicy::AfterTtl),
            other => Err(format!(
                "unknown refresh policy '{}', expected 'within-ttl' or 'after-ttl'",
                other
            )),
        }
    }
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshPolicy::WithinTtl => write!(f, "within-ttl"),
            RefreshPolicy::AfterTtl => write!(f, "after-ttl"),
        }
    }
}

/// A produced value and when it was produced.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub value: Arc<T>,
    pub produced_at: DateTime<Utc>,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            produced_at: self.produced_at,
        }
    }
}

/// Async producer of a cache value.
pub type Producer<T, E> = Box<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

/// Memoizes the result of `producer`.
///
/// ## Usage
///
/// ```rust,ignore
/// let cache = TtlCache::new(
///     move || fetch_everything(),
///     Duration::seconds(60),
///     RefreshPolicy::default(),
///     Arc::new(SystemClock),
/// );
/// let value = cache.get().await?;
/// ```
pub struct TtlCache<T, E> {
    producer: Producer<T, E>,
    ttl: Duration,
    policy: RefreshPolicy,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry<T>>>,
}

impl<T, E> TtlCache<T, E>
where
    T: Send + Sync + 'static,
    E: 'static,
{
    pub fn new<F, Fut>(
        producer: F,
        ttl: Duration,
        policy: RefreshPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            producer: Box::new(move || producer().boxed()),
            ttl,
            policy,
            clock,
            entry: RwLock::new(None),
        }
    }

    /// Return the cached value or produce a new one, depending on the entry's
    /// age and the refresh policy.
    ///
    /// Producer errors are returned as-is and leave the stored entry intact.
    pub async fn get(&self) -> Result<Arc<T>, E> {
        let current = self.entry.read().await.clone();

        if let Some(entry) = current {
            let elapsed = self.clock.now() - entry.produced_at;
            if !self.policy.should_refresh(elapsed, self.ttl) {
                debug!(
                    "Serving cached value ({}ms old, ttl {}ms, policy {})",
                    elapsed.num_milliseconds(),
                    self.ttl.num_milliseconds(),
                    self.policy
                );
                return Ok(entry.value);
            }
        }

        let value = Arc::new((self.producer)().await?);
        *self.entry.write().await = Some(CacheEntry {
            value: value.clone(),
            produced_at: self.clock.now(),
        });
        Ok(value)
    }

    /// The stored entry, without triggering the producer.
    pub async fn peek(&self) -> Option<CacheEntry<T>> {
        self.entry.read().await.clone()
    }

    /// Drop the stored entry. The next `get()` runs the producer.
    pub async fn invalidate(&self) {
        *self.entry.write().await = None;
    }
}
