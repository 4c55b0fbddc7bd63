use super::input::{InputResult, TextInput};
use super::KeyResult;
use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

const MAX_SUGGESTIONS: usize = 8;

/// Events emitted by command input that the app needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// A known command was chosen
  Run(&'static str),
  /// Enter on text that matches nothing
  Unknown(String),
  Cancelled,
}

/// `:` command prompt with autocomplete
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  fn close(&mut self) {
    self.active = false;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  pub fn suggestions(&self) -> Vec<&'static Command> {
    commands::get_suggestions(self.input.value())
  }

  /// Handle a key event
  /// Call this regardless of active state - it handles activation too
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    let count = self.suggestions().len().min(MAX_SUGGESTIONS);
    match key.code {
      KeyCode::Esc => {
        self.close();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        let event = self.resolve_command();
        self.close();
        return KeyResult::Event(event);
      }
      KeyCode::Tab | KeyCode::Down => {
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + count - 1) % count;
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    match self.input.handle_key(key) {
      InputResult::Consumed => {
        self.selected_suggestion = 0; // Reset on input change
        KeyResult::Handled
      }
      InputResult::Submitted(_) | InputResult::Cancelled => KeyResult::Handled,
      // Prompt is modal
      InputResult::NotHandled => KeyResult::Handled,
    }
  }

  /// Selected suggestion, or the raw text when nothing matches
  fn resolve_command(&self) -> CommandEvent {
    match self.suggestions().get(self.selected_suggestion) {
      Some(cmd) => CommandEvent::Run(cmd.name),
      None => CommandEvent::Unknown(self.input.value().trim().to_string()),
    }
  }

  /// Render the command overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();
    let shown = suggestions.len().min(MAX_SUGGESTIONS) as u16;

    let width = (area.width * 60 / 100).clamp(30, 60).min(area.width);
    let height = (3 + shown).min(area.height);
    let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height);

    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Command ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Input line
        Constraint::Min(0),    // Suggestions
      ])
      .split(inner);

    let input_line = Line::from(vec![
      Span::styled(":", Style::default().fg(Color::Yellow)),
      Span::raw(self.input.value()),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
    ]);
    frame.render_widget(Paragraph::new(input_line), chunks[0]);

    if suggestions.is_empty() {
      if !self.input.is_empty() {
        let hint = Paragraph::new("no such command").style(Style::default().fg(Color::Red));
        frame.render_widget(hint, chunks[1]);
      }
      return;
    }

    let items: Vec<ListItem> = suggestions
      .iter()
      .take(MAX_SUGGESTIONS)
      .map(|cmd| {
        ListItem::new(Line::from(vec![
          Span::styled(
            format!("{:<15}", cmd.name),
            Style::default().fg(Color::Cyan),
          ),
          Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list =
      List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(Some(self.selected_suggestion));
    frame.render_stateful_widget(list, chunks[1], &mut state);
  }
}
