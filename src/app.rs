use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::reachability::{Reachability, ReachabilityMonitor, ReachabilityState};
use crate::resources::{ResourceKind, Resources};
use crate::ui;
use crate::ui::components::{CommandEvent, CommandInput, KeyResult};
use crate::ui::view::{View, ViewAction};
use crate::ui::views::ResourceListView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;

/// Build the root list view for a resource
fn list_view(kind: ResourceKind, resources: &Resources) -> Box<dyn View> {
  match kind {
    ResourceKind::Careers => Box::new(ResourceListView::new(
      kind,
      resources.careers.use_resource(),
    )),
    ResourceKind::Opportunities => Box::new(ResourceListView::new(
      kind,
      resources.opportunities.use_resource(),
    )),
    ResourceKind::Partners => Box::new(ResourceListView::new(
      kind,
      resources.partners.use_resource(),
    )),
    ResourceKind::Updates => Box::new(ResourceListView::new(
      kind,
      resources.updates.use_resource(),
    )),
    ResourceKind::Resources => Box::new(ResourceListView::new(
      kind,
      resources.resources.use_resource(),
    )),
    ResourceKind::Tenders => Box::new(ResourceListView::new(
      kind,
      resources.tenders.use_resource(),
    )),
  }
}

/// Main application state
pub struct App {
  /// Navigation stack - root is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Command input component (handles : mode)
  command_input: CommandInput,

  config: Config,
  host: String,
  resources: Resources,
  monitor: Arc<ReachabilityMonitor>,
  reachability: Reachability,

  /// One-line message shown in the footer until the next key
  status_message: Option<String>,

  should_quit: bool,
}

impl App {
  pub fn new(
    config: Config,
    host: String,
    resources: Resources,
    monitor: Arc<ReachabilityMonitor>,
  ) -> Self {
    let reachability = monitor.subscribe();
    let root = list_view(ResourceKind::Careers, &resources);

    Self {
      view_stack: vec![root],
      command_input: CommandInput::new(),
      config,
      host,
      resources,
      monitor,
      reachability,
      status_message: None,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(250), self.reachability.clone());

    let result = self.main_loop(&mut terminal, &mut events).await;

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop<B: Backend>(
    &mut self,
    terminal: &mut Terminal<B>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        for view in self.view_stack.iter_mut() {
          view.tick();
        }
      }
      Event::Backend(state) => {
        tracing::debug!(state = state.label(), "backend state shown");
        // Views pick up the new key on their next tick
        for view in self.view_stack.iter_mut() {
          view.tick();
        }
      }
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.status_message = None;

    // Ctrl-C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // A view capturing text gets every key
    let capturing = self
      .current_view()
      .map(|v| v.is_capturing_input())
      .unwrap_or(false);

    if !capturing {
      match self.command_input.handle_key(key) {
        KeyResult::Event(CommandEvent::Run(name)) => {
          self.execute_command(name);
          return;
        }
        KeyResult::Event(CommandEvent::Unknown(text)) => {
          if !text.is_empty() {
            self.status_message = Some(format!("Unknown command: {}", text));
          }
          return;
        }
        KeyResult::Event(CommandEvent::Cancelled) | KeyResult::Handled => return,
        KeyResult::NotHandled => {}
      }

      if key.code == KeyCode::Char('R') {
        self.reconnect();
        return;
      }
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => ViewAction::None,
    };
    self.apply(action);
  }

  fn apply(&mut self, action: ViewAction) {
    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  fn execute_command(&mut self, name: &str) {
    if let Some(kind) = ResourceKind::from_name(name) {
      self.view_stack = vec![list_view(kind, &self.resources)];
      return;
    }

    match name {
      "reconnect" => self.reconnect(),
      "quit" => self.should_quit = true,
      _ => {
        self.status_message = Some(format!("Unknown command: {}", name));
      }
    }
  }

  fn reconnect(&mut self) {
    tracing::info!("reconnect requested");
    self.monitor.request_check();
    self.status_message = Some("Checking backend…".to_string());
  }

  // Accessors for UI rendering
  pub fn current_view(&self) -> Option<&dyn View> {
    self.view_stack.last().map(|v| &**v)
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn command_input(&self) -> &CommandInput {
    &self.command_input
  }

  pub fn title(&self) -> &str {
    &self.config.title
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn backend_state(&self) -> ReachabilityState {
    self.reachability.current()
  }

  pub fn status_message(&self) -> Option<&str> {
    self.status_message.as_deref()
  }

  pub fn view_breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|v| v.breadcrumb_label())
      .collect()
  }
}
