//! Async query abstraction for data fetching with keyed resolution.
//!
//! Inspired by TanStack Query, this module provides a `Query<K, T>` type that
//! encapsulates async data fetching, loading states, and error handling.
//! The fetcher receives the current key; a query without a key is disabled
//! and never fetches.
//!
//! # Example
//!
//! ```ignore
//! let hook = resources.careers.clone();
//! let mut query = Query::new(move |connected: bool| {
//!     let hook = hook.clone();
//!     async move { hook.resolve_for(connected).await.map_err(|e| e.to_string()) }
//! });
//!
//! // Enable (and start fetching) once the key is known
//! query.set_key(Some(true));
//!
//! // In event loop tick
//! if query.poll() {
//!     // State changed, trigger re-render
//! }
//!
//! // In render
//! if query.is_loading() {
//!     render_spinner();
//! } else if let Some(error) = query.error() {
//!     render_error(error);
//! } else if let Some(data) = query.data() {
//!     render_data(data);
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// The state of a query
#[derive(Debug, Clone)]
pub enum QueryState<T> {
  /// Query is disabled or has not been started
  Idle,
  /// Query is currently fetching data
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed with an error
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_loading(&self) -> bool {
    matches!(self, QueryState::Loading)
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      QueryState::Error(e) => Some(e),
      _ => None,
    }
  }
}

/// A boxed future that returns a Result<T, String>
type BoxFuture<T> = Pin<Box<dyn Future<Output = Result<T, String>> + Send>>;

/// A factory function that creates futures for fetching data under a key
type FetcherFn<K, T> = Box<dyn Fn(K) -> BoxFuture<T> + Send + Sync>;

/// Async query for data fetching with state management.
///
/// Query<K, T> encapsulates:
/// - The fetching logic (via a closure taking the key)
/// - Enablement: no key, no fetch
/// - Loading/success/error states
/// - Async result handling via channels
/// - Stale time tracking for revalidation
pub struct Query<K, T> {
  key: Option<K>,
  state: QueryState<T>,
  fetcher: FetcherFn<K, T>,
  receiver: Option<mpsc::UnboundedReceiver<Result<T, String>>>,
  fetched_at: Option<Instant>,
  stale_time: Duration,
}

impl<K, T> Query<K, T>
where
  K: Clone + PartialEq + Send + 'static,
  T: Send + 'static,
{
  /// Create a new, disabled query with the given fetcher function.
  ///
  /// The fetcher is a closure that returns a future. It will be called
  /// with the current key each time a fetch starts.
  pub fn new<F, Fut>(fetcher: F) -> Self
  where
    F: Fn(K) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, String>> + Send + 'static,
  {
    Self {
      key: None,
      state: QueryState::Idle,
      fetcher: Box::new(move |key| Box::pin(fetcher(key))),
      receiver: None,
      fetched_at: None,
      stale_time: Duration::from_secs(60), // Default 1 minute
    }
  }

  /// Set the stale time for this query.
  ///
  /// After this duration, the data is considered stale and `is_stale()` returns true.
  pub fn with_stale_time(mut self, duration: Duration) -> Self {
    self.stale_time = duration;
    self
  }

  pub fn key(&self) -> Option<&K> {
    self.key.as_ref()
  }

  /// Point the query at a new key.
  ///
  /// A changed key drops any pending result, resets the state and, if the
  /// new key is `Some`, starts fetching it. `None` disables the query.
  /// Returns `true` if the key changed.
  pub fn set_key(&mut self, key: Option<K>) -> bool {
    if self.key == key {
      return false;
    }

    self.key = key;
    self.receiver = None;
    self.fetched_at = None;
    self.state = QueryState::Idle;
    self.start_fetch();
    true
  }

  /// Get the data if the query succeeded.
  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  /// Check if the query is currently loading.
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  /// Check if the query failed.
  pub fn is_error(&self) -> bool {
    self.state.is_error()
  }

  /// Get the error message if the query failed.
  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  /// Check if the data is stale (older than stale_time).
  pub fn is_stale(&self) -> bool {
    match &self.state {
      QueryState::Success(_) => self
        .fetched_at
        .map(|t| t.elapsed() >= self.stale_time)
        .unwrap_or(true),
      _ => false,
    }
  }

  /// Force a refetch, even if already loading or data exists.
  ///
  /// No-op while disabled.
  pub fn refetch(&mut self) {
    // Cancel any pending fetch by dropping the receiver
    self.receiver = None;
    self.start_fetch();
  }

  /// Poll for results from a pending fetch.
  ///
  /// Returns `true` if the state changed (data arrived or error occurred).
  /// Call this in your event loop tick handler.
  pub fn poll(&mut self) -> bool {
    let receiver = match &mut self.receiver {
      Some(rx) => rx,
      None => return false,
    };

    // Try to receive without blocking
    match receiver.try_recv() {
      Ok(Ok(data)) => {
        self.state = QueryState::Success(data);
        self.fetched_at = Some(Instant::now());
        self.receiver = None;
        true
      }
      Ok(Err(error)) => {
        self.state = QueryState::Error(error);
        self.receiver = None;
        true
      }
      Err(mpsc::error::TryRecvError::Empty) => false,
      Err(mpsc::error::TryRecvError::Disconnected) => {
        // Sender dropped without sending - treat as error
        self.state = QueryState::Error("Query was cancelled".to_string());
        self.receiver = None;
        true
      }
    }
  }

  /// Internal: start the fetch operation for the current key
  fn start_fetch(&mut self) {
    let key = match &self.key {
      Some(key) => key.clone(),
      None => return,
    };

    let (tx, rx) = mpsc::unbounded_channel();
    self.receiver = Some(rx);
    self.state = QueryState::Loading;

    let future = (self.fetcher)(key);
    tokio::spawn(async move {
      let result = future.await;
      // Ignore send errors - receiver may have been dropped
      let _ = tx.send(result);
    });
  }
}

// Query is not Clone because the fetcher is boxed and receiver is owned.

impl<K: std::fmt::Debug, T: std::fmt::Debug> std::fmt::Debug for Query<K, T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Query")
      .field("key", &self.key)
      .field("state", &self.state)
      .field("fetched_at", &self.fetched_at)
      .field("stale_time", &self.stale_time)
      .finish_non_exhaustive()
  }
}
