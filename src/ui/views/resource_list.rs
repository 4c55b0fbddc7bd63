use crate::cache::CacheSource;
use crate::resources::{Listing, ResourceKind, UseResource};
use crate::ui::components::{FilterEvent, FilterInput, KeyResult};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{deadline_color, fit};
use crate::ui::view::{ShortcutInfo, View, ViewAction};
use crate::ui::views::ResourceDetailView;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

/// View for one listing resource
pub struct ResourceListView<T: Listing> {
  kind: ResourceKind,
  resource: UseResource<T>,
  list_state: ListState,
  filter: FilterInput,
}

impl<T: Listing> ResourceListView<T> {
  pub fn new(kind: ResourceKind, resource: UseResource<T>) -> Self {
    Self {
      kind,
      resource,
      list_state: ListState::default(),
      filter: FilterInput::new(),
    }
  }

  /// Records passing the current filter
  fn visible(&self) -> Vec<&T> {
    let query = self.filter.query();
    self
      .resource
      .output()
      .data
      .iter()
      .filter(|item| item.matches(query))
      .collect()
  }

  fn title(&self) -> String {
    let output = self.resource.output();
    let name = self.kind.title();

    if self.resource.connected().is_none() {
      return format!(" {} (checking backend...) ", name);
    }
    if output.is_loading {
      return format!(" {} (loading...) ", name);
    }
    if output.is_error {
      return format!(" {} (error) ", name);
    }

    let bundled = if self.resource.connected() == Some(false) {
      " · bundled"
    } else {
      ""
    };
    let count = self.visible().len();
    if self.filter.query().is_empty() {
      format!(" {} ({}){} ", name, count, bundled)
    } else {
      format!(
        " {} ({}/{}) /{}{} ",
        name,
        count,
        output.data.len(),
        self.filter.query(),
        bundled
      )
    }
  }

  fn empty_message(&self) -> String {
    let output = self.resource.output();
    let name = self.kind.name();

    if self.resource.connected().is_none() {
      "Checking backend…".to_string()
    } else if output.is_error {
      let mut message = format!("Failed to load {}. Press 'r' to retry.", name);
      if let Some(error) = output.error {
        message.push_str("\n\n");
        message.push_str(error);
      }
      message
    } else if !self.filter.query().is_empty() {
      format!("No {} match '{}'.", name, self.filter.query())
    } else {
      format!("No {} listed.", name)
    }
  }

  fn header_line() -> Line<'static> {
    let mut spans = vec![Span::raw("  ")];
    for (label, width) in T::COLUMNS {
      spans.push(Span::styled(
        format!("{} ", fit(label, *width)),
        Style::default().fg(Color::DarkGray).bold(),
      ));
    }
    Line::from(spans)
  }

  fn row(item: &T) -> ListItem<'static> {
    let today = Local::now().date_naive();
    let cells = item.cells();
    let last = cells.len().saturating_sub(1);

    let spans: Vec<Span> = cells
      .iter()
      .zip(T::COLUMNS)
      .enumerate()
      .map(|(i, (cell, (_, width)))| {
        let style = if i == 0 {
          Style::default().fg(Color::Cyan)
        } else if i == last && item.deadline().is_some() {
          Style::default().fg(deadline_color(item.deadline(), today))
        } else {
          Style::default()
        };
        Span::styled(format!("{} ", fit(cell, *width)), style)
      })
      .collect();

    ListItem::new(Line::from(spans))
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.visible().len();
    ensure_valid_selection(&mut self.list_state, len);

    let output = self.resource.output();
    let border = if output.is_error {
      Color::Red
    } else if output.source == Some(CacheSource::StaticSeed)
      || self.resource.connected() == Some(false)
    {
      Color::Yellow
    } else {
      Color::Blue
    };

    let block = Block::default()
      .title(self.title())
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(border));

    if len == 0 && !output.is_loading {
      let color = if output.is_error {
        Color::Red
      } else {
        Color::DarkGray
      };
      let paragraph = Paragraph::new(self.empty_message())
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color));
      frame.render_widget(paragraph, area);
      return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(1), // Column headers
        Constraint::Min(0),    // Rows
      ])
      .split(inner);

    frame.render_widget(Paragraph::new(Self::header_line()), chunks[0]);

    let items: Vec<ListItem> = self.visible().into_iter().map(Self::row).collect();
    let list = List::new(items)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
  }
}

impl<T: Listing> View for ResourceListView<T> {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let the filter component try to handle first
    match self.filter.handle_key(key) {
      KeyResult::Event(FilterEvent::Changed(_)) => {
        self.list_state.select(Some(0));
        return ViewAction::None;
      }
      KeyResult::Event(FilterEvent::Applied) | KeyResult::Handled => return ViewAction::None,
      KeyResult::NotHandled => {}
    }

    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('g') | KeyCode::Home => {
        self.list_state.select_first();
      }
      KeyCode::Char('G') | KeyCode::End => {
        self.list_state.select_last();
      }
      KeyCode::Char('r') => {
        self.resource.refetch();
      }
      KeyCode::Enter => {
        let selected = self
          .list_state
          .selected()
          .and_then(|idx| self.visible().get(idx).map(|item| (*item).clone()));
        if let Some(item) = selected {
          return ViewAction::Push(Box::new(ResourceDetailView::new(self.kind, item)));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
    let matches = self.visible().len();
    self.filter.render_overlay(frame, area, matches);
  }

  fn breadcrumb_label(&self) -> String {
    self.kind.title().to_string()
  }

  fn tick(&mut self) {
    if self.resource.tick() {
      let len = self.visible().len();
      ensure_valid_selection(&mut self.list_state, len);
    }
    self.resource.revalidate();
  }

  fn is_capturing_input(&self) -> bool {
    self.filter.is_active()
  }

  fn shortcuts(&self) -> Vec<ShortcutInfo> {
    vec![
      ShortcutInfo::new(":", "command").with_priority(10),
      ShortcutInfo::new("/", "filter").with_priority(20),
      ShortcutInfo::new("r", "refresh").with_priority(25),
      ShortcutInfo::new("R", "reconnect").with_priority(27),
      ShortcutInfo::new("q", "back").with_priority(30),
    ]
  }
}
