use super::input::{InputResult, TextInput};
use super::KeyResult;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// Events emitted by the filter input that the list view acts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterEvent {
  /// Filter text changed (live, on each keystroke and on cancel)
  Changed(String),
  /// Filter kept, overlay closed
  Applied,
}

/// `/` filter for list views.
///
/// Esc restores whatever filter was applied before the overlay opened.
#[derive(Debug, Clone, Default)]
pub struct FilterInput {
  input: TextInput,
  applied: String,
  active: bool,
}

impl FilterInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Text currently filtering the list
  pub fn query(&self) -> &str {
    if self.active {
      self.input.value()
    } else {
      &self.applied
    }
  }

  fn activate(&mut self) {
    self.active = true;
    self.input.clear();
  }

  /// Handle a key event; also handles activation with `/`
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<FilterEvent> {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.activate();
        return KeyResult::Event(FilterEvent::Changed(String::new()));
      }
      return KeyResult::NotHandled;
    }

    match self.input.handle_key(key) {
      InputResult::Submitted(value) => {
        self.active = false;
        self.applied = value.trim().to_string();
        KeyResult::Event(FilterEvent::Applied)
      }
      InputResult::Cancelled => {
        self.active = false;
        self.input.clear();
        KeyResult::Event(FilterEvent::Changed(self.applied.clone()))
      }
      InputResult::Consumed => KeyResult::Event(FilterEvent::Changed(self.input.value().to_string())),
      // Swallow everything else so list keys don't fire while typing
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Render the filter overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect, matches: usize) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, 3.min(area.height));

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(format!(" Filter ({}) ", matches));

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}
