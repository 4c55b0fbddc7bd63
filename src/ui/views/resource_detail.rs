use crate::resources::{Listing, ResourceKind};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// All fields of one record
pub struct ResourceDetailView<T: Listing> {
  kind: ResourceKind,
  item: T,
  scroll: u16,
}

impl<T: Listing> ResourceDetailView<T> {
  pub fn new(kind: ResourceKind, item: T) -> Self {
    Self {
      kind,
      item,
      scroll: 0,
    }
  }

  fn lines(&self) -> Vec<Line<'_>> {
    let label_width = self
      .item
      .details()
      .iter()
      .map(|(label, _)| label.len())
      .max()
      .unwrap_or(0);

    let mut lines: Vec<Line> = self
      .item
      .details()
      .into_iter()
      .map(|(label, value)| {
        Line::from(vec![
          Span::styled(
            format!("{:<width$}  ", label, width = label_width),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(value),
        ])
      })
      .collect();

    let body = self.item.body();
    if !body.is_empty() {
      lines.push(Line::default());
      lines.extend(body.lines().map(Line::raw));
    }
    lines
  }
}

impl<T: Listing> View for ResourceDetailView<T> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.scroll = self.scroll.saturating_add(1);
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.item.heading()))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let paragraph = Paragraph::new(self.lines())
      .block(block)
      .wrap(Wrap { trim: true })
      .scroll((self.scroll, 0));
    frame.render_widget(paragraph, area);
  }

  fn breadcrumb_label(&self) -> String {
    format!("{} [{}]", self.kind.title(), self.item.id())
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("j/k", "scroll").with_priority(20),
      ShortcutInfo::new("q", "back").with_priority(30),
    ]
  }
}
