//! Generic caching layer for resolved resource lists.
//!
//! This module provides a resource-agnostic caching mechanism that:
//! - Stores ordered lists under a query key with a cached_at timestamp
//! - Reuses entries until they are older than the stale time (5 minutes by default)
//! - Serializes concurrent resolutions of the same key so only one runs
//! - Never caches failures

mod layer;
mod storage;
mod traits;

pub use layer::CacheLayer;
pub use storage::MemoryStorage;
pub use traits::{CacheResult, CacheSource, Cacheable, QueryKey};
