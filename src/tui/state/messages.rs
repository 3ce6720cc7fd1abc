//! Blocking alerts for the TUI
//!
//! An alert sits on top of whatever screen is showing and swallows the next
//! key press, which dismisses it.

use ratatui::{layout::Rect, Frame};

use crate::tui::widgets::ModalDialog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub text: String,
}

/// Holds at most one pending alert
///
/// # Example
/// ```
/// use veggie_pos::tui::state::MessageDisplay;
///
/// let mut messages = MessageDisplay::default();
/// messages.set_error("Unstable Weight");
/// assert!(messages.has_message());
/// assert_eq!(messages.error(), Some("Unstable Weight"));
///
/// messages.clear();
/// assert!(!messages.has_message());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MessageDisplay {
    current: Option<Alert>,
}

impl MessageDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending alert with an error
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.current = Some(Alert {
            kind: AlertKind::Error,
            text: msg.into(),
        });
    }

    /// Replace any pending alert with a success notice
    pub fn set_success(&mut self, msg: impl Into<String>) {
        self.current = Some(Alert {
            kind: AlertKind::Success,
            text: msg.into(),
        });
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn has_message(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.text_of(AlertKind::Error)
    }

    pub fn success(&self) -> Option<&str> {
        self.text_of(AlertKind::Success)
    }

    fn text_of(&self, kind: AlertKind) -> Option<&str> {
        self.current
            .as_ref()
            .filter(|a| a.kind == kind)
            .map(|a| a.text.as_str())
    }

    /// Draw the pending alert centred over `area`, if any
    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(alert) = &self.current else {
            return;
        };
        let dialog = match alert.kind {
            // Errors carry backend bodies, give them more room
            AlertKind::Error => ModalDialog::error(alert.text.clone()).with_width_percent(70),
            AlertKind::Success => ModalDialog::success(alert.text.clone()),
        };
        dialog.render(frame, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let msg = MessageDisplay::new();
        assert!(!msg.has_message());
        assert_eq!(msg.current(), None);
    }

    #[test]
    fn test_error_then_success_replaces() {
        let mut msg = MessageDisplay::default();
        msg.set_error("Failed");
        assert_eq!(msg.error(), Some("Failed"));
        assert_eq!(msg.success(), None);

        msg.set_success("Saved!");
        assert_eq!(msg.error(), None);
        assert_eq!(msg.success(), Some("Saved!"));
    }

    #[test]
    fn test_clear() {
        let mut msg = MessageDisplay::default();
        msg.set_error("Error");
        msg.clear();
        assert!(!msg.has_message());
    }
}
