use chrono::NaiveDate;
use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Truncate and left-align into a fixed-width column
pub fn fit(s: &str, width: usize) -> String {
  format!("{:<width$}", truncate(s, width), width = width)
}

/// Red once passed, yellow within a week
pub fn deadline_color(deadline: Option<NaiveDate>, today: NaiveDate) -> Color {
  match deadline {
    Some(date) if date < today => Color::Red,
    Some(date) if (date - today).num_days() <= 7 => Color::Yellow,
    _ => Color::White,
  }
}
