use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};

use crate::tui::state::Navigable;

/// A table with a selected row, column definitions, an empty-state
/// message and caller-supplied row formatting
#[derive(Debug, Clone)]
pub struct SelectableTable<T: Clone> {
    pub items: Vec<T>,
    pub selected: usize,
    pub columns: Vec<ColumnDef>,
    /// Shown instead of the table when there are no rows
    pub empty_message: String,
    pub block_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub title: &'static str,
    pub width: Constraint,
}

impl ColumnDef {
    pub fn new(title: &'static str, width: Constraint) -> Self {
        Self { title, width }
    }
}

impl<T: Clone> SelectableTable<T> {
    pub fn new(items: Vec<T>, columns: Vec<ColumnDef>) -> Self {
        Self {
            items,
            selected: 0,
            columns,
            empty_message: "No items".to_string(),
            block_title: None,
        }
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn with_block_title(mut self, title: impl Into<String>) -> Self {
        self.block_title = Some(title.into());
        self
    }

    /// Swap in fresh rows, keeping the selection in range
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.clamp_selection();
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Handle keyboard navigation
    ///
    /// Returns true if the key was handled
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => {
                self.previous();
                true
            }
            KeyCode::Down => {
                self.next();
                true
            }
            _ => false,
        }
    }

    /// Render the table with a custom row formatter
    ///
    /// The formatter takes (item, index, is_selected) and returns a Row
    pub fn render<F>(&self, frame: &mut Frame, area: Rect, row_formatter: F)
    where
        F: Fn(&T, usize, bool) -> Row<'static>,
    {
        let block = match &self.block_title {
            Some(title) => Block::default().borders(Borders::ALL).title(title.clone()),
            None => Block::default().borders(Borders::ALL),
        };

        if self.items.is_empty() {
            let empty = Paragraph::new(self.empty_message.clone())
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let header = Row::new(self.columns.iter().map(|c| c.title))
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let rows: Vec<Row> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| row_formatter(item, i, i == self.selected))
            .collect();

        let widths: Vec<Constraint> = self.columns.iter().map(|c| c.width).collect();

        let table = Table::new(rows, widths).header(header).block(block);
        frame.render_widget(table, area);
    }
}

impl<T: Clone> Navigable for SelectableTable<T> {
    fn len(&self) -> usize {
        self.items.len()
    }

    fn selected(&self) -> usize {
        self.selected
    }

    fn set_selected(&mut self, index: usize) {
        self.selected = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> SelectableTable<(&'static str, f64)> {
        let items = vec![("Carrot", 25.0), ("Pumpkin", 30.0), ("Tomato", 40.0)];
        let columns = vec![
            ColumnDef::new("Name", Constraint::Percentage(60)),
            ColumnDef::new("Price", Constraint::Percentage(40)),
        ];
        SelectableTable::new(items, columns)
    }

    #[test]
    fn test_new_table() {
        let table = create_test_table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.selected, 0);
        assert!(!table.is_empty());
        assert_eq!(table.selected_item(), Some(&("Carrot", 25.0)));
    }

    #[test]
    fn test_handle_key_wraps() {
        let mut table = create_test_table();

        assert!(table.handle_key(KeyEvent::from(KeyCode::Up)));
        assert_eq!(table.selected(), 2);

        assert!(table.handle_key(KeyEvent::from(KeyCode::Down)));
        assert_eq!(table.selected(), 0);

        assert!(!table.handle_key(KeyEvent::from(KeyCode::Enter)));
    }

    #[test]
    fn test_set_items_clamps_selection() {
        let mut table = create_test_table();
        table.set_selected(2);
        table.set_items(vec![("Corn", 15.0)]);
        assert_eq!(table.selected(), 0);

        table.set_items(vec![]);
        assert!(table.selected_item().is_none());
    }

    #[test]
    fn test_with_empty_message() {
        let table = create_test_table()
            .with_empty_message("No products")
            .with_block_title("Products");
        assert_eq!(table.empty_message, "No products");
        assert_eq!(table.block_title.as_deref(), Some("Products"));
    }
}
