use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::reachability::{Reachability, ReachabilityState};

/// Application events
#[derive(Debug)]
pub enum Event {
  /// Terminal key press
  Key(KeyEvent),
  /// Periodic tick for UI refresh and query polling
  Tick,
  /// Backend reachability changed
  Backend(ReachabilityState),
}

/// Event handler that merges terminal input, a tick timer and reachability changes
pub struct EventHandler {
  rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
  /// Create a new event handler with the given tick rate
  pub fn new(tick_rate: Duration, mut reachability: Reachability) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();

    // Terminal input and ticks
    let input_tx = tx.clone();
    tokio::spawn(async move {
      loop {
        let event = if event::poll(tick_rate).unwrap_or(false) {
          match event::read() {
            Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
            Ok(_) => continue,
            Err(error) => {
              tracing::warn!(%error, "terminal input error");
              continue;
            }
          }
        } else {
          Event::Tick
        };
        if input_tx.send(event).is_err() {
          break;
        }
      }
    });

    // Reachability changes
    tokio::spawn(async move {
      while let Some(state) = reachability.changed().await {
        if tx.send(Event::Backend(state)).is_err() {
          break;
        }
      }
    });

    Self { rx }
  }

  /// Receive the next event
  pub async fn next(&mut self) -> Option<Event> {
    self.rx.recv().await
  }
}
