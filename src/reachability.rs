//! Backend reachability monitor.
//!
//! One monitor per process decides whether the live API can be reached and
//! publishes the answer through a `watch` channel. It is the only writer;
//! resource hooks hold [`Reachability`] handles and only read.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use crate::config::ProbeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachabilityState {
  pub is_backend_connected: bool,
  /// True until the first probe round has finished
  pub is_checking: bool,
}

impl ReachabilityState {
  pub const CHECKING: Self = Self {
    is_backend_connected: false,
    is_checking: true,
  };

  pub fn determined(is_backend_connected: bool) -> Self {
    Self {
      is_backend_connected,
      is_checking: false,
    }
  }

  /// The connection flag, or `None` while the first check is running.
  pub fn settled(&self) -> Option<bool> {
    if self.is_checking {
      None
    } else {
      Some(self.is_backend_connected)
    }
  }

  pub fn label(&self) -> &'static str {
    match self.settled() {
      None => "checking",
      Some(true) => "online",
      Some(false) => "offline",
    }
  }
}

type ProbeFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;
type ProbeFn = Box<dyn Fn() -> ProbeFuture + Send + Sync>;

/// Timing for health probes.
#[derive(Debug, Clone)]
pub struct ProbePolicy {
  /// Bound on a single probe attempt
  pub timeout: Duration,
  /// Delay between periodic checks
  pub interval: Duration,
  /// Extra attempts per check after a failure
  pub retries: u32,
  /// First delay between attempts, doubled each time
  pub backoff: Duration,
  pub max_backoff: Duration,
}

impl Default for ProbePolicy {
  fn default() -> Self {
    Self::from(&ProbeConfig::default())
  }
}

impl From<&ProbeConfig> for ProbePolicy {
  fn from(config: &ProbeConfig) -> Self {
    Self {
      timeout: Duration::from_millis(config.timeout_ms),
      interval: Duration::from_secs(config.interval_secs),
      retries: config.retries,
      backoff: Duration::from_millis(config.backoff_ms),
      max_backoff: Duration::from_secs(5),
    }
  }
}

/// Owns the reachability state and the probe that updates it.
pub struct ReachabilityMonitor {
  state: watch::Sender<ReachabilityState>,
  probe: ProbeFn,
  policy: ProbePolicy,
  wake: Notify,
}

impl ReachabilityMonitor {
  /// Create a monitor in the checking state.
  ///
  /// The probe resolves `Ok(())` when the backend answered. It is called
  /// once per attempt and always wrapped in the policy timeout.
  pub fn new<F, Fut>(probe: F, policy: ProbePolicy) -> Self
  where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
  {
    let (state, _) = watch::channel(ReachabilityState::CHECKING);
    Self {
      state,
      probe: Box::new(move || Box::pin(probe())),
      policy,
      wake: Notify::new(),
    }
  }

  /// New read-only handle on the state.
  pub fn subscribe(&self) -> Reachability {
    Reachability {
      rx: self.state.subscribe(),
    }
  }

  pub fn state(&self) -> ReachabilityState {
    *self.state.borrow()
  }

  async fn probe_once(&self) -> Result<(), String> {
    match tokio::time::timeout(self.policy.timeout, (self.probe)()).await {
      Ok(result) => result,
      Err(_) => {
        tracing::warn!(timeout = ?self.policy.timeout, "backend probe timed out");
        Err(format!("no answer within {:?}", self.policy.timeout))
      }
    }
  }

  /// Run one check round (with retries) and publish the outcome.
  pub async fn check_now(&self) -> bool {
    let attempts = self.policy.retries + 1;
    let mut delay = self.policy.backoff;
    let mut connected = false;

    for attempt in 1..=attempts {
      match self.probe_once().await {
        Ok(()) => {
          connected = true;
          break;
        }
        Err(error) => {
          tracing::debug!(attempt, attempts, %error, "backend probe failed");
          if attempt < attempts {
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(self.policy.max_backoff);
          }
        }
      }
    }

    self.publish(connected);
    connected
  }

  fn publish(&self, connected: bool) {
    let next = ReachabilityState::determined(connected);
    let previous = self.state();

    let changed = self.state.send_if_modified(|state| {
      if *state == next {
        false
      } else {
        *state = next;
        true
      }
    });

    if !changed {
      return;
    }
    if previous.is_checking {
      tracing::info!(connected, "backend reachability determined");
    } else if connected {
      tracing::info!("backend reachable again");
    } else {
      tracing::warn!("backend became unreachable, serving bundled data");
    }
  }

  /// Ask the background task for an immediate re-check.
  pub fn request_check(&self) {
    self.wake.notify_one();
  }

  /// Start the periodic check loop.
  ///
  /// The first check runs immediately; later ones every `interval` or
  /// as soon as [`request_check`](Self::request_check) is called.
  pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
    let monitor = Arc::clone(self);
    tokio::spawn(async move {
      loop {
        monitor.check_now().await;
        tokio::select! {
          _ = tokio::time::sleep(monitor.policy.interval) => {}
          _ = monitor.wake.notified() => {
            tracing::debug!("on-demand reachability check");
          }
        }
      }
    })
  }
}

/// Read-only view of the reachability state.
#[derive(Debug, Clone)]
pub struct Reachability {
  rx: watch::Receiver<ReachabilityState>,
}

impl Reachability {
  pub fn current(&self) -> ReachabilityState {
    *self.rx.borrow()
  }

  /// Wait for the first determination.
  ///
  /// Returns `None` if the monitor went away before it finished checking.
  pub async fn settled(&mut self) -> Option<bool> {
    let waited = self
      .rx
      .wait_for(|state| !state.is_checking)
      .await
      .map(|state| state.settled());
    match waited {
      Ok(settled) => settled,
      Err(_) => self.current().settled(),
    }
  }

  /// Wait for the next change. `None` once the monitor is gone.
  pub async fn changed(&mut self) -> Option<ReachabilityState> {
    self.rx.changed().await.ok()?;
    Some(*self.rx.borrow_and_update())
  }
}
