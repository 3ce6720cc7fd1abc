//! Common reusable UI components for the TUI
//!
//! Layout, title and help bars shared by every tab, plus the money and
//! weight formatting the screens agree on.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Standard 3-section screen layout (title, content, help)
///
/// # Example
/// ```no_run
/// # use ratatui::layout::Rect;
/// # use veggie_pos::tui::widgets::common::render_screen_layout;
/// # let area = Rect::default();
/// let chunks = render_screen_layout(area);
/// // chunks[0] = title area (height: 3)
/// // chunks[1] = content area (flexible)
/// // chunks[2] = help area (height: 3)
/// ```
pub fn render_screen_layout(area: Rect) -> [Rect; 3] {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Title
        Constraint::Min(0),    // Content
        Constraint::Length(3), // Help
    ])
    .split(area);

    [chunks[0], chunks[1], chunks[2]]
}

/// Render a centered title with cyan borders
pub fn render_title(frame: &mut Frame, area: Rect, title: &str) {
    let widget = Paragraph::new(title).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(widget, area);
}

/// Render a help bar from (key, description) pairs
///
/// # Example
/// ```no_run
/// # use ratatui::Frame;
/// # use ratatui::layout::Rect;
/// # use veggie_pos::tui::widgets::common::render_help;
/// # let mut frame: Frame = panic!();
/// # let help_area = Rect::default();
/// render_help(&mut frame, help_area, &[
///     ("a", "Add"),
///     ("c", "Checkout"),
///     ("q", "Quit"),
/// ]);
/// ```
pub fn render_help(frame: &mut Frame, area: Rect, items: &[(&str, &str)]) {
    let spans: Vec<Span> = items
        .iter()
        .map(|(key, desc)| Span::raw(format!("[{}] {}  ", key, desc)))
        .collect();

    let widget = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

pub fn render_empty_state(frame: &mut Frame, area: Rect, message: &str) {
    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

/// Calculate a centered rectangle for popups
///
/// # Arguments
/// * `percent_x` - Width as percentage of parent (0-100)
/// * `percent_y` - Height as percentage of parent (0-100)
/// * `r` - Parent rectangle to center within
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Selected rows get a ">" prefix and yellow bold styling
pub fn selection_style(is_selected: bool) -> (String, Style) {
    let prefix = if is_selected {
        "> ".to_string()
    } else {
        "  ".to_string()
    };
    let style = if is_selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    (prefix, style)
}

/// Money in baht with two decimals, e.g. `60.00 ฿`
pub fn format_amount(amount: f64) -> String {
    format!("{:.2} ฿", amount)
}

/// Scale reading in kilograms
pub fn format_weight(kg: f64) -> String {
    format!("{:.2} kg", kg)
}
