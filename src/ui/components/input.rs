use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in an input component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed, here's the submitted value
  Submitted(String),
  /// Escape pressed, input cancelled
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Reusable single-line text input.
///
/// The cursor counts characters, not bytes, so accented names and
/// emoji edit correctly.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
  buffer: String,
  cursor: usize,
}

impl TextInput {
  /// Get the current input value
  pub fn value(&self) -> &str {
    &self.buffer
  }

  pub fn is_empty(&self) -> bool {
    self.buffer.is_empty()
  }

  pub fn clear(&mut self) {
    self.buffer.clear();
    self.cursor = 0;
  }

  fn char_count(&self) -> usize {
    self.buffer.chars().count()
  }

  /// Byte offset of the character at `index`
  fn byte_offset(&self, index: usize) -> usize {
    self
      .buffer
      .char_indices()
      .nth(index)
      .map(|(offset, _)| offset)
      .unwrap_or(self.buffer.len())
  }

  /// Handle a key event, returning the result
  pub fn handle_key(&mut self, key: KeyEvent) -> InputResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
      KeyCode::Esc => InputResult::Cancelled,
      KeyCode::Enter => InputResult::Submitted(self.buffer.clone()),
      KeyCode::Backspace => {
        if self.cursor > 0 {
          self.cursor -= 1;
          let at = self.byte_offset(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Delete => {
        if self.cursor < self.char_count() {
          let at = self.byte_offset(self.cursor);
          self.buffer.remove(at);
        }
        InputResult::Consumed
      }
      KeyCode::Left => {
        self.cursor = self.cursor.saturating_sub(1);
        InputResult::Consumed
      }
      KeyCode::Right => {
        self.cursor = (self.cursor + 1).min(self.char_count());
        InputResult::Consumed
      }
      KeyCode::Home => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::End => {
        self.cursor = self.char_count();
        InputResult::Consumed
      }
      KeyCode::Char('a') if ctrl => {
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('e') if ctrl => {
        self.cursor = self.char_count();
        InputResult::Consumed
      }
      KeyCode::Char('u') if ctrl => {
        // Clear line before cursor
        let at = self.byte_offset(self.cursor);
        self.buffer.replace_range(..at, "");
        self.cursor = 0;
        InputResult::Consumed
      }
      KeyCode::Char('w') if ctrl => {
        // Delete word before cursor
        let at = self.byte_offset(self.cursor);
        let before = &self.buffer[..at];
        let start = before.trim_end().rfind(' ').map(|i| i + 1).unwrap_or(0);
        let removed = self.buffer[start..at].chars().count();
        self.buffer.replace_range(start..at, "");
        self.cursor -= removed;
        InputResult::Consumed
      }
      KeyCode::Char(_) if ctrl => InputResult::NotHandled,
      KeyCode::Char(c) => {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
        InputResult::Consumed
      }
      _ => InputResult::NotHandled,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::CONTROL)
  }

  fn typed(text: &str) -> TextInput {
    let mut input = TextInput::default();
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
    input
  }

  #[test]
  fn test_basic_input() {
    let mut input = TextInput::default();
    assert!(input.is_empty());

    input.handle_key(key(KeyCode::Char('h')));
    input.handle_key(key(KeyCode::Char('i')));
    assert_eq!(input.value(), "hi");
  }

  #[test]
  fn test_submit() {
    let mut input = typed("test");
    let result = input.handle_key(key(KeyCode::Enter));
    assert_eq!(result, InputResult::Submitted("test".to_string()));
  }

  #[test]
  fn test_cancel() {
    let mut input = typed("x");
    let result = input.handle_key(key(KeyCode::Esc));
    assert_eq!(result, InputResult::Cancelled);
  }

  #[test]
  fn test_backspace() {
    let mut input = typed("abc");
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "ab");
  }

  #[test]
  fn test_cursor_movement() {
    let mut input = typed("ac");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Char('b')));
    assert_eq!(input.value(), "abc");
  }

  #[test]
  fn test_multibyte_editing() {
    let mut input = typed("café");
    input.handle_key(key(KeyCode::Left));
    input.handle_key(key(KeyCode::Char('f')));
    assert_eq!(input.value(), "caffé");

    input.handle_key(key(KeyCode::Delete));
    assert_eq!(input.value(), "caff");
    input.handle_key(key(KeyCode::Backspace));
    assert_eq!(input.value(), "caf");
  }

  #[test]
  fn test_ctrl_u_clear_before_cursor() {
    let mut input = typed("hello world");
    for _ in 0..5 {
      input.handle_key(key(KeyCode::Left));
    }
    input.handle_key(ctrl_key(KeyCode::Char('u')));
    assert_eq!(input.value(), "world");
  }

  #[test]
  fn test_ctrl_w_deletes_word() {
    let mut input = typed("food bank ");
    input.handle_key(ctrl_key(KeyCode::Char('w')));
    assert_eq!(input.value(), "food ");
  }

  #[test]
  fn test_unbound_ctrl_is_not_typed() {
    let mut input = typed("a");
    assert_eq!(input.handle_key(ctrl_key(KeyCode::Char('x'))), InputResult::NotHandled);
    assert_eq!(input.value(), "a");
  }
}
