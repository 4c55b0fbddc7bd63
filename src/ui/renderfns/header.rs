use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::reachability::ReachabilityState;
use crate::ui::view::ShortcutInfo;

/// Badge text and color for the backend state
pub fn backend_badge(state: ReachabilityState) -> (&'static str, Color) {
  match state.settled() {
    None => ("checking…", Color::Yellow),
    Some(true) => ("online", Color::Green),
    Some(false) => ("offline · bundled data", Color::Red),
  }
}

/// Draw the header bar with title, backend host and state, and shortcuts
pub fn draw_header(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  host: &str,
  state: ReachabilityState,
  shortcuts: &[ShortcutInfo],
) {
  let (badge, badge_color) = backend_badge(state);

  let mut spans = vec![
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", host), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", badge), Style::default().fg(badge_color).bold()),
    Span::raw(" "),
  ];

  // Shortcuts - keys highlighted, descriptions dimmed
  let mut shortcuts: Vec<_> = shortcuts.iter().collect();
  shortcuts.sort_by_key(|s| s.priority);
  for shortcut in shortcuts {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("<{}>", shortcut.key),
      Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::styled(
      format!(" {}", shortcut.label),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_backend_badge() {
    assert_eq!(backend_badge(ReachabilityState::CHECKING).0, "checking…");
    assert_eq!(
      backend_badge(ReachabilityState::determined(true)),
      ("online", Color::Green)
    );
    assert_eq!(
      backend_badge(ReachabilityState::determined(false)).0,
      "offline · bundled data"
    );
  }
}
