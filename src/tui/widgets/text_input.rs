use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Single-line text input with cursor, optional character filter and
/// optional masking for passwords
#[derive(Debug, Clone)]
pub struct TextInput {
    pub value: String,
    pub placeholder: String,
    pub title: Option<String>,
    pub max_length: Option<usize>,
    pub validator: Option<fn(char) -> bool>,
    /// Cursor position in characters
    pub cursor_pos: usize,
    pub is_focused: bool,
    pub masked: bool,
}

// Function pointers have no meaningful equality, so the validator is skipped
impl PartialEq for TextInput {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.placeholder == other.placeholder
            && self.title == other.title
            && self.max_length == other.max_length
            && self.cursor_pos == other.cursor_pos
            && self.is_focused == other.is_focused
            && self.masked == other.masked
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            value: String::new(),
            placeholder: String::new(),
            title: None,
            max_length: None,
            validator: None,
            cursor_pos: 0,
            is_focused: false,
            masked: false,
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_validator(mut self, validator: fn(char) -> bool) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Render every character as a bullet
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        let val = value.into();
        self.cursor_pos = val.chars().count();
        self.value = val;
        self
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn is_valid_char(&self, c: char) -> bool {
        self.validator.is_none_or(|validator| validator(c))
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Handle keyboard input
    ///
    /// Returns true if the input was modified
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c) if self.is_valid_char(c) => {
                if self.max_length.is_none_or(|max| self.char_len() < max) {
                    let at = self.byte_index(self.cursor_pos);
                    self.value.insert(at, c);
                    self.cursor_pos += 1;
                    true
                } else {
                    false
                }
            }
            KeyCode::Backspace if self.cursor_pos > 0 => {
                let at = self.byte_index(self.cursor_pos - 1);
                self.value.remove(at);
                self.cursor_pos -= 1;
                true
            }
            KeyCode::Delete if self.cursor_pos < self.char_len() => {
                let at = self.byte_index(self.cursor_pos);
                self.value.remove(at);
                true
            }
            KeyCode::Left if self.cursor_pos > 0 => {
                self.cursor_pos -= 1;
                true
            }
            KeyCode::Right if self.cursor_pos < self.char_len() => {
                self.cursor_pos += 1;
                true
            }
            KeyCode::Home if self.cursor_pos > 0 => {
                self.cursor_pos = 0;
                true
            }
            KeyCode::End if self.cursor_pos < self.char_len() => {
                self.cursor_pos = self.char_len();
                true
            }
            _ => false,
        }
    }

    /// Text as it should appear on screen, cursor included when focused
    pub fn display_text(&self) -> String {
        let mut chars: Vec<char> = if self.masked {
            std::iter::repeat('•').take(self.char_len()).collect()
        } else {
            self.value.chars().collect()
        };
        if self.is_focused {
            chars.insert(self.cursor_pos.min(chars.len()), '█');
        }
        chars.into_iter().collect()
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.is_focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::White)
        };

        let mut block = Block::default().borders(Borders::ALL).style(border_style);
        if let Some(title) = &self.title {
            block = block.title(title.clone());
        }

        let line = if self.value.is_empty() && !self.is_focused {
            Line::from(self.placeholder.clone()).style(Style::default().fg(Color::DarkGray))
        } else {
            Line::from(self.display_text())
        };

        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_pos = 0;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

// Predefined validators

/// Digits and a decimal point
pub fn price_validator(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Anything printable except whitespace
pub fn credential_validator(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value() {
        let input = TextInput::new().with_value("40.00");
        assert_eq!(input.value, "40.00");
        assert_eq!(input.cursor_pos, 5);
    }

    #[test]
    fn test_char_input_and_backspace() {
        let mut input = TextInput::new();
        assert!(input.handle_key(KeyEvent::from(KeyCode::Char('a'))));
        assert!(input.handle_key(KeyEvent::from(KeyCode::Char('b'))));
        assert!(input.handle_key(KeyEvent::from(KeyCode::Backspace)));
        assert_eq!(input.value, "a");
        assert_eq!(input.cursor_pos, 1);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInput::new().with_value("45");
        input.handle_key(KeyEvent::from(KeyCode::Left));
        input.handle_key(KeyEvent::from(KeyCode::Char('.')));
        assert_eq!(input.value, "4.5");
    }

    #[test]
    fn test_multibyte_characters() {
        let mut input = TextInput::new().with_value("ผัก");
        assert_eq!(input.cursor_pos, 3);
        assert!(input.handle_key(KeyEvent::from(KeyCode::Backspace)));
        assert_eq!(input.value.chars().count(), 2);
        assert!(input.handle_key(KeyEvent::from(KeyCode::Home)));
        assert!(input.handle_key(KeyEvent::from(KeyCode::Delete)));
        assert_eq!(input.value.chars().count(), 1);
    }

    #[test]
    fn test_max_length() {
        let mut input = TextInput::new().with_max_length(2);
        input.handle_key(KeyEvent::from(KeyCode::Char('1')));
        input.handle_key(KeyEvent::from(KeyCode::Char('2')));
        assert!(!input.handle_key(KeyEvent::from(KeyCode::Char('3'))));
        assert_eq!(input.value, "12");
    }

    #[test]
    fn test_price_validator() {
        let mut input = TextInput::new().with_validator(price_validator);
        assert!(input.handle_key(KeyEvent::from(KeyCode::Char('3'))));
        assert!(input.handle_key(KeyEvent::from(KeyCode::Char('.'))));
        assert!(!input.handle_key(KeyEvent::from(KeyCode::Char('x'))));
        assert!(!input.handle_key(KeyEvent::from(KeyCode::Char('-'))));
        assert_eq!(input.value, "3.");
    }

    #[test]
    fn test_masked_display() {
        let mut input = TextInput::new().masked().with_value("1234");
        assert_eq!(input.display_text(), "••••");
        input.set_focused(true);
        assert_eq!(input.display_text(), "••••█");
    }

    #[test]
    fn test_credential_validator() {
        assert!(credential_validator('a'));
        assert!(credential_validator('@'));
        assert!(!credential_validator(' '));
        assert!(!credential_validator('\t'));
    }
}
