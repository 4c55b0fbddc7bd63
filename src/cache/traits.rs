//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for entities that can be cached.
///
/// Entries are stored serialized, so one storage can hold lists of
/// different record types side by side.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
  /// Entity type name for storage organization (e.g., "job", "tender")
  fn entity_type() -> &'static str;
}

/// Identifies one cached query result.
pub trait QueryKey {
  /// Stable storage key
  fn cache_hash(&self) -> String;

  /// Human-readable description for logs
  fn description(&self) -> String;
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// When the data was cached (if from cache)
  pub cached_at: Option<DateTime<Utc>>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from freshly resolved data.
  pub fn resolved(data: T, source: CacheSource) -> Self {
    Self {
      data,
      source,
      cached_at: None,
    }
  }

  /// Create a new cache result from a fresh cached entry.
  pub fn from_cache(data: T, cached_at: DateTime<Utc>) -> Self {
    Self {
      data,
      source: CacheSource::CacheFresh,
      cached_at: Some(cached_at),
    }
  }
}

/// Indicates where data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from the live API
  Network,
  /// Bundled seed data, served while the backend is unreachable
  StaticSeed,
  /// Data from cache, still considered fresh
  CacheFresh,
}
