//! Cache layer that orchestrates caching logic with data resolution.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::storage::{CacheStorage, MemoryStorage};
use super::traits::{CacheResult, CacheSource, Cacheable, QueryKey};

type KeyLocks = Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>;

/// Cache layer that manages freshness and fetch deduplication.
///
/// This layer sits between the resource hooks and whatever produces the
/// data (network client or bundled seed).
pub struct CacheLayer<S: CacheStorage = MemoryStorage> {
  storage: Arc<S>,
  /// How long before cached data is considered stale
  stale_time: Duration,
  /// One async lock per key; concurrent resolutions of a key queue up
  /// behind the first one and then hit its fresh entry.
  locks: Arc<KeyLocks>,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self {
      storage: Arc::new(storage),
      stale_time: Duration::from_secs(5 * 60),
      locks: Arc::new(Mutex::new(HashMap::new())),
    }
  }

  /// Set the stale time for cached data.
  pub fn with_stale_time(mut self, stale_time: Duration) -> Self {
    self.stale_time = stale_time;
    self
  }

  pub fn stale_time(&self) -> Duration {
    self.stale_time
  }

  /// Check if cached data is stale based on cached_at timestamp.
  fn is_stale(&self, cached_at: DateTime<Utc>) -> bool {
    match (Utc::now() - cached_at).to_std() {
      Ok(age) => age >= self.stale_time,
      // cached_at in the future (clock moved back): treat as fresh
      Err(_) => false,
    }
  }

  fn key_lock(&self, hash: &str) -> Result<Arc<tokio::sync::Mutex<()>>> {
    let mut locks = self
      .locks
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(Arc::clone(locks.entry(hash.to_string()).or_default()))
  }

  /// Fetch a list with cache-first strategy.
  ///
  /// 1. Check cache - if fresh, return immediately
  /// 2. If stale/missing, call the fetcher
  /// 3. Store and return the result tagged with `source`
  ///
  /// Fetcher errors are returned as-is and never cached.
  pub async fn fetch_list<K, T, F, Fut>(
    &self,
    key: &K,
    source: CacheSource,
    fetcher: F,
  ) -> Result<CacheResult<Vec<T>>>
  where
    K: QueryKey,
    T: Cacheable,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
  {
    let hash = key.cache_hash();
    let lock = self.key_lock(&hash)?;
    let _guard = lock.lock().await;

    if let Some(cached) = self.storage.get_query_result::<T>(&hash)? {
      if !self.is_stale(cached.cached_at) {
        return Ok(CacheResult::from_cache(cached.entities, cached.cached_at));
      }
      tracing::debug!(query = %key.description(), "cached entry is stale");
    }

    let data = fetcher().await?;
    self.storage.store_query_result(&hash, &data)?;
    tracing::debug!(query = %key.description(), count = data.len(), "cached resolved list");

    Ok(CacheResult::resolved(data, source))
  }

  /// Drop the cached entry for a key so the next fetch resolves again.
  pub fn invalidate<K: QueryKey>(&self, key: &K) -> Result<()> {
    self.storage.invalidate(&key.cache_hash())
  }
}

impl<S: CacheStorage> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      stale_time: self.stale_time,
      locks: Arc::clone(&self.locks),
    }
  }
}
