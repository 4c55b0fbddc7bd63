//! Cache storage trait and in-memory implementation.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::traits::Cacheable;

/// Result of a cached query lookup.
#[derive(Debug, Clone)]
pub struct CachedQueryResult<T> {
  /// The cached entities in order
  pub entities: Vec<T>,
  /// When the query result was cached
  pub cached_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
pub trait CacheStorage: Send + Sync {
  /// Store entities from a query result, replacing any previous entry.
  fn store_query_result<T: Cacheable>(&self, key: &str, entities: &[T]) -> Result<()>;

  /// Get cached entities for a query.
  fn get_query_result<T: Cacheable>(&self, key: &str) -> Result<Option<CachedQueryResult<T>>>;

  /// Drop the entry for a query, if any.
  fn invalidate(&self, key: &str) -> Result<()>;
}

struct StoredEntry {
  entity_type: &'static str,
  data: Value,
  cached_at: DateTime<Utc>,
}

/// Process-lifetime storage keeping serialized lists in a map.
#[derive(Default)]
pub struct MemoryStorage {
  entries: Mutex<HashMap<String, StoredEntry>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn store_query_result<T: Cacheable>(&self, key: &str, entities: &[T]) -> Result<()> {
    let data =
      serde_json::to_value(entities).map_err(|e| eyre!("Failed to serialize entities: {}", e))?;

    let mut entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    entries.insert(
      key.to_string(),
      StoredEntry {
        entity_type: T::entity_type(),
        data,
        cached_at: Utc::now(),
      },
    );

    Ok(())
  }

  fn get_query_result<T: Cacheable>(&self, key: &str) -> Result<Option<CachedQueryResult<T>>> {
    let entries = self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let entry = match entries.get(key) {
      Some(entry) if entry.entity_type == T::entity_type() => entry,
      _ => return Ok(None),
    };

    let entities: Vec<T> = serde_json::from_value(entry.data.clone())
      .map_err(|e| eyre!("Failed to deserialize cached {}: {}", T::entity_type(), e))?;

    Ok(Some(CachedQueryResult {
      entities,
      cached_at: entry.cached_at,
    }))
  }

  fn invalidate(&self, key: &str) -> Result<()> {
    self
      .entries
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?
      .remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde::{Deserialize, Serialize};

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Note {
    text: String,
  }

  impl Cacheable for Note {
    fn entity_type() -> &'static str {
      "note"
    }
  }

  #[derive(Debug, Clone, Serialize, Deserialize)]
  struct Other {
    text: String,
  }

  impl Cacheable for Other {
    fn entity_type() -> &'static str {
      "other"
    }
  }

  fn notes(texts: &[&str]) -> Vec<Note> {
    texts
      .iter()
      .map(|t| Note {
        text: t.to_string(),
      })
      .collect()
  }

  #[test]
  fn test_store_and_get_preserves_order() {
    let storage = MemoryStorage::new();
    storage.store_query_result("k", &notes(&["b", "a", "c"])).unwrap();

    let cached = storage.get_query_result::<Note>("k").unwrap().unwrap();
    assert_eq!(cached.entities, notes(&["b", "a", "c"]));
  }

  #[test]
  fn test_store_replaces_entry() {
    let storage = MemoryStorage::new();
    storage.store_query_result("k", &notes(&["old"])).unwrap();
    storage.store_query_result("k", &notes(&["new"])).unwrap();

    let cached = storage.get_query_result::<Note>("k").unwrap().unwrap();
    assert_eq!(cached.entities, notes(&["new"]));
  }

  #[test]
  fn test_entity_type_mismatch_is_a_miss() {
    let storage = MemoryStorage::new();
    storage.store_query_result("k", &notes(&["x"])).unwrap();
    assert!(storage.get_query_result::<Other>("k").unwrap().is_none());
  }

  #[test]
  fn test_invalidate() {
    let storage = MemoryStorage::new();
    storage.store_query_result("k", &notes(&["x"])).unwrap();
    storage.invalidate("k").unwrap();
    assert!(storage.get_query_result::<Note>("k").unwrap().is_none());
    storage.invalidate("missing").unwrap();
  }
}
