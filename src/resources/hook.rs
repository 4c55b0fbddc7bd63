//! Resilient list fetching for one resource.
//!
//! A [`ResourceHook`] decides where a list comes from: the live API while the
//! backend is reachable, the bundled seed while it is not. Results go through
//! the shared [`CacheLayer`] under a key that includes the reachability flag,
//! so a flip always resolves fresh.

use color_eyre::{eyre::eyre, Result};
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;

use crate::cache::{CacheLayer, CacheResult, CacheSource, Cacheable, QueryKey};
use crate::query::Query;
use crate::reachability::Reachability;

/// Cache key of one resolved list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKey {
  pub resource: &'static str,
  pub connected: bool,
}

impl QueryKey for ResourceKey {
  fn cache_hash(&self) -> String {
    let mode = if self.connected { "live" } else { "static" };
    format!("{}:{}", self.resource, mode)
  }

  fn description(&self) -> String {
    let mode = if self.connected { "live" } else { "bundled" };
    format!("{} ({})", self.resource, mode)
  }
}

type LiveFetch<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<Vec<T>>> + Send + Sync>;

pub struct ResourceHook<T: Cacheable> {
  name: &'static str,
  reachability: Reachability,
  cache: CacheLayer,
  seed: Arc<Vec<T>>,
  live: LiveFetch<T>,
}

impl<T: Cacheable> ResourceHook<T> {
  pub fn new<F, Fut>(
    name: &'static str,
    reachability: Reachability,
    cache: CacheLayer,
    seed: Vec<T>,
    live: F,
  ) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
  {
    Self {
      name,
      reachability,
      cache,
      seed: Arc::new(seed),
      live: Arc::new(move || Box::pin(live())),
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  fn key(&self, connected: bool) -> ResourceKey {
    ResourceKey {
      resource: self.name,
      connected,
    }
  }

  /// Wait for the backend check to finish, then resolve.
  pub async fn resolve(&self) -> Result<CacheResult<Vec<T>>> {
    let mut reachability = self.reachability.clone();
    let connected = reachability
      .settled()
      .await
      .ok_or_else(|| eyre!("Backend check stopped before {} could load", self.name))?;
    self.resolve_for(connected).await
  }

  /// Resolve the list for a known reachability flag.
  ///
  /// Offline resolves to the seed without touching the network. Connected
  /// calls the live endpoint; its failures are returned, never replaced by
  /// the seed.
  pub async fn resolve_for(&self, connected: bool) -> Result<CacheResult<Vec<T>>> {
    let key = self.key(connected);

    if connected {
      let live = Arc::clone(&self.live);
      let result = self
        .cache
        .fetch_list(&key, CacheSource::Network, move || live())
        .await;
      if let Err(error) = &result {
        tracing::warn!(resource = self.name, %error, "live fetch failed");
      }
      result
    } else {
      let seed = Arc::clone(&self.seed);
      self
        .cache
        .fetch_list(&key, CacheSource::StaticSeed, move || async move {
          Ok(seed.as_ref().clone())
        })
        .await
    }
  }

  /// Forget the cached list for one reachability flag.
  pub fn invalidate(&self, connected: bool) -> Result<()> {
    self.cache.invalidate(&self.key(connected))
  }

  /// A polled per-consumer handle, already keyed to the current state.
  pub fn use_resource(&self) -> UseResource<T> {
    UseResource::new(self.clone())
  }
}

impl<T: Cacheable> Clone for ResourceHook<T> {
  fn clone(&self) -> Self {
    Self {
      name: self.name,
      reachability: self.reachability.clone(),
      cache: self.cache.clone(),
      seed: Arc::clone(&self.seed),
      live: Arc::clone(&self.live),
    }
  }
}

/// What a view needs to render one resource.
#[derive(Debug)]
pub struct HookOutput<'a, T> {
  /// Empty until a list resolves, and on errors
  pub data: &'a [T],
  pub is_loading: bool,
  pub is_error: bool,
  pub error: Option<&'a str>,
  pub source: Option<CacheSource>,
}

/// Per-consumer hook instance, driven from the UI tick.
///
/// The query key is the settled reachability flag; while the backend check
/// is running there is no key and nothing is fetched.
pub struct UseResource<T: Cacheable> {
  hook: ResourceHook<T>,
  query: Query<bool, CacheResult<Vec<T>>>,
}

impl<T: Cacheable> UseResource<T> {
  pub fn new(hook: ResourceHook<T>) -> Self {
    let resolver = hook.clone();
    let query = Query::new(move |connected: bool| {
      let hook = resolver.clone();
      async move { hook.resolve_for(connected).await.map_err(|e| e.to_string()) }
    })
    .with_stale_time(hook.cache.stale_time());

    let mut this = Self { hook, query };
    this.tick();
    this
  }

  /// `None` while the backend check is running
  pub fn connected(&self) -> Option<bool> {
    self.query.key().copied()
  }

  /// Follow reachability changes and collect finished fetches.
  ///
  /// Returns `true` if anything visible changed.
  pub fn tick(&mut self) -> bool {
    let key = self.hook.reachability.current().settled();
    let rekeyed = self.query.set_key(key);
    if rekeyed {
      tracing::debug!(resource = self.hook.name, connected = ?key, "resource rekeyed");
    }
    let polled = self.query.poll();
    rekeyed || polled
  }

  pub fn output(&self) -> HookOutput<'_, T> {
    let result = self.query.data();
    HookOutput {
      data: result.map(|r| r.data.as_slice()).unwrap_or(&[]),
      is_loading: self.query.is_loading(),
      is_error: self.query.is_error(),
      error: self.query.error(),
      source: result.map(|r| r.source),
    }
  }

  /// Drop the cached entry and resolve again.
  pub fn refetch(&mut self) {
    let Some(connected) = self.connected() else {
      return;
    };
    if let Err(error) = self.hook.invalidate(connected) {
      tracing::warn!(resource = self.hook.name, %error, "could not invalidate cache entry");
    }
    self.query.refetch();
  }

  /// Resolve again only if the held list is past the stale window.
  pub fn revalidate(&mut self) {
    if self.query.is_stale() {
      self.query.refetch();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::MemoryStorage;
  use crate::reachability::{ProbePolicy, ReachabilityMonitor};
  use serde::{Deserialize, Serialize};
  use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
  use std::time::Duration;

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Item(String);

  impl Cacheable for Item {
    fn entity_type() -> &'static str {
      "item"
    }
  }

  fn monitor(up: &Arc<AtomicBool>) -> ReachabilityMonitor {
    let up = Arc::clone(up);
    ReachabilityMonitor::new(
      move || {
        let up = up.load(Ordering::SeqCst);
        async move {
          if up {
            Ok(())
          } else {
            Err("refused".to_string())
          }
        }
      },
      ProbePolicy {
        retries: 0,
        timeout: Duration::from_millis(50),
        ..ProbePolicy::default()
      },
    )
  }

  fn hook(monitor: &ReachabilityMonitor, calls: &Arc<AtomicU32>) -> ResourceHook<Item> {
    let calls = Arc::clone(calls);
    ResourceHook::new(
      "items",
      monitor.subscribe(),
      CacheLayer::new(MemoryStorage::new()),
      vec![Item("seed".to_string())],
      move || {
        let n = calls.fetch_add(1, Ordering::SeqCst);
        async move { Ok(vec![Item(format!("live-{}", n))]) }
      },
    )
  }

  async fn settle(resource: &mut UseResource<Item>) {
    for _ in 0..50 {
      resource.tick();
      if !resource.output().is_loading {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
  }

  #[test]
  fn test_key_hash_includes_mode() {
    let live = ResourceKey {
      resource: "careers",
      connected: true,
    };
    let bundled = ResourceKey {
      connected: false,
      ..live
    };
    assert_eq!(live.cache_hash(), "careers:live");
    assert_eq!(bundled.cache_hash(), "careers:static");
  }

  #[tokio::test]
  async fn test_gated_while_checking() {
    let up = Arc::new(AtomicBool::new(true));
    let monitor = monitor(&up);
    let calls = Arc::new(AtomicU32::new(0));
    let mut resource = hook(&monitor, &calls).use_resource();

    tokio::time::sleep(Duration::from_millis(20)).await;
    resource.tick();

    let output = resource.output();
    assert!(output.data.is_empty());
    assert!(!output.is_loading);
    assert!(!output.is_error);
    assert_eq!(resource.connected(), None);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn test_resolve_waits_for_check() {
    let up = Arc::new(AtomicBool::new(true));
    let monitor = monitor(&up);
    let calls = Arc::new(AtomicU32::new(0));
    let hook = hook(&monitor, &calls);

    let pending = tokio::time::timeout(Duration::from_millis(30), hook.resolve()).await;
    assert!(pending.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    monitor.check_now().await;
    let result = hook.resolve().await.unwrap();
    assert_eq!(result.data, vec![Item("live-0".to_string())]);
  }

  #[tokio::test]
  async fn test_flip_resolves_under_new_key() {
    let up = Arc::new(AtomicBool::new(true));
    let monitor = monitor(&up);
    monitor.check_now().await;
    let calls = Arc::new(AtomicU32::new(0));
    let mut resource = hook(&monitor, &calls).use_resource();

    settle(&mut resource).await;
    assert_eq!(resource.output().data, &[Item("live-0".to_string())]);
    assert_eq!(resource.output().source, Some(CacheSource::Network));

    up.store(false, Ordering::SeqCst);
    monitor.check_now().await;
    settle(&mut resource).await;
    assert_eq!(resource.connected(), Some(false));
    assert_eq!(resource.output().data, &[Item("seed".to_string())]);
    assert_eq!(resource.output().source, Some(CacheSource::StaticSeed));

    up.store(true, Ordering::SeqCst);
    monitor.check_now().await;
    settle(&mut resource).await;
    // Live entry from the first round is still fresh
    assert_eq!(resource.output().data, &[Item("live-0".to_string())]);
    assert_eq!(resource.output().source, Some(CacheSource::CacheFresh));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_refetch_bypasses_fresh_entry() {
    let up = Arc::new(AtomicBool::new(true));
    let monitor = monitor(&up);
    monitor.check_now().await;
    let calls = Arc::new(AtomicU32::new(0));
    let mut resource = hook(&monitor, &calls).use_resource();

    settle(&mut resource).await;
    resource.refetch();
    settle(&mut resource).await;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(resource.output().data, &[Item("live-1".to_string())]);
  }

  #[tokio::test]
  async fn test_revalidate_keeps_fresh_data() {
    let up = Arc::new(AtomicBool::new(true));
    let monitor = monitor(&up);
    monitor.check_now().await;
    let calls = Arc::new(AtomicU32::new(0));
    let mut resource = hook(&monitor, &calls).use_resource();

    settle(&mut resource).await;
    resource.revalidate();
    settle(&mut resource).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
