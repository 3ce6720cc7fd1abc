use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Row},
    Frame,
};
use tracing::{info, warn};

use crate::models::Product;
use crate::services::PosApi;
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::widgets::{common, text_input, ColumnDef, SelectableTable, TextInput};

/// The one row being edited, tracked by product id
#[derive(Debug, Clone, PartialEq)]
pub struct PriceEdit {
    pub product_id: i64,
    pub input: TextInput,
}

pub struct SettingsState {
    pub products: SelectableTable<Product>,
    pub editing: Option<PriceEdit>,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a typed price; only finite numbers are accepted
pub fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|p| p.is_finite())
}

impl SettingsState {
    pub fn new() -> Self {
        let columns = vec![
            ColumnDef::new("", Constraint::Length(2)),
            ColumnDef::new("Product", Constraint::Percentage(55)),
            ColumnDef::new("Price / kg", Constraint::Percentage(40)),
        ];
        Self {
            products: SelectableTable::new(Vec::new(), columns)
                .with_empty_message("No products")
                .with_block_title("Products"),
            editing: None,
        }
    }

    /// Refetch the product list, sorted by name
    pub async fn load<A: PosApi>(&mut self, context: &mut AppContext<A>) {
        match context.api.list_products(context.bearer()).await {
            Ok(mut products) => {
                products.sort_by_key(|p| p.name.to_lowercase());
                self.products.set_items(products);
            }
            Err(e) => {
                warn!("Failed to load products: {:#}", e);
                context
                    .messages
                    .set_error(format!("Could not load products: {}", e));
            }
        }
    }

    pub fn begin_edit(&mut self) {
        if let Some(product) = self.products.selected_item() {
            let mut input = TextInput::new()
                .with_title(format!("New price for {}", product.name))
                .with_max_length(12)
                .with_validator(text_input::price_validator)
                .with_value(format!("{}", product.price));
            input.set_focused(true);
            self.editing = Some(PriceEdit {
                product_id: product.id,
                input,
            });
        }
    }

    /// Send the edited price, then refetch whatever the outcome.
    ///
    /// An unparsable price keeps the row in edit mode and sends nothing.
    pub async fn save_edit<A: PosApi>(&mut self, context: &mut AppContext<A>) {
        let Some(edit) = &self.editing else {
            return;
        };

        let raw = edit.input.value().to_string();
        let Some(price) = parse_price(&raw) else {
            context
                .messages
                .set_error(format!("Invalid price: '{}'", raw));
            return;
        };

        let name = self
            .products
            .items
            .iter()
            .find(|p| p.id == edit.product_id)
            .map(|p| p.name.clone());
        self.editing = None;

        let Some(name) = name else {
            context.messages.set_error("Product no longer listed");
            self.load(context).await;
            return;
        };

        match context.api.update_price(context.bearer(), &name, price).await {
            Ok(()) => info!(target: "veggie_pos", "Price of '{}' set to {:.2}", name, price),
            Err(e) => {
                warn!("Price update for '{}' failed: {:#}", name, e);
                context
                    .messages
                    .set_error(format!("Price update failed: {}", e));
            }
        }
        self.load(context).await;
    }

    fn is_editing(&self, product_id: i64) -> bool {
        self.editing
            .as_ref()
            .is_some_and(|e| e.product_id == product_id)
    }
}

#[async_trait]
impl<A: PosApi> Screen<A> for SettingsState {
    fn render(&self, frame: &mut Frame, area: Rect, _context: &AppContext<A>) {
        let [title_area, content_area, help_area] = common::render_screen_layout(area);
        common::render_title(frame, title_area, "Price Settings");

        let (table_area, edit_area) = if self.editing.is_some() {
            let chunks = Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).split(content_area);
            (chunks[0], Some(chunks[1]))
        } else {
            (content_area, None)
        };

        self.products.render(frame, table_area, |product, _i, is_selected| {
            let (prefix, mut style) = common::selection_style(is_selected);
            if self.is_editing(product.id) {
                style = Style::default().fg(Color::Green);
            }
            Row::new(vec![
                prefix,
                product.name.clone(),
                common::format_amount(product.price),
            ])
            .style(style)
        });

        if let (Some(edit), Some(area)) = (&self.editing, edit_area) {
            edit.input.render(frame, area);
        }

        let help: &[(&str, &str)] = if self.editing.is_some() {
            &[("Enter", "Save"), ("Esc", "Cancel")]
        } else {
            &[
                ("↑/↓", "Select"),
                ("Enter/e", "Edit"),
                ("r", "Reload"),
                ("Tab", "Next tab"),
                ("L", "Logout"),
                ("q", "Quit"),
            ]
        };
        common::render_help(frame, help_area, help);

        if self.products.is_empty() && self.editing.is_none() {
            let hint = Paragraph::new("Press r to reload").style(Style::default().fg(Color::DarkGray));
            let [_, bottom] = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(table_area);
            frame.render_widget(hint, bottom);
        }
    }

    async fn handle_key(&mut self, context: &mut AppContext<A>, key: KeyEvent) -> Result<ScreenTransition> {
        if let Some(edit) = self.editing.as_mut() {
            match key.code {
                KeyCode::Enter => self.save_edit(context).await,
                KeyCode::Esc => self.editing = None,
                _ => {
                    edit.input.handle_key(key);
                }
            }
            return Ok(ScreenTransition::Stay);
        }

        if self.products.handle_key(key) {
            return Ok(ScreenTransition::Stay);
        }

        match key.code {
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('r') => self.load(context).await,
            _ => return Ok(super::tab_keys(context, key).unwrap_or(ScreenTransition::Stay)),
        }
        Ok(ScreenTransition::Stay)
    }

    async fn on_enter(&mut self, context: &mut AppContext<A>) -> Result<()> {
        self.editing = None;
        self.load(context).await;
        Ok(())
    }

    fn id(&self) -> ScreenId {
        ScreenId::Settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, price: f64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price,
        }
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("45"), Some(45.0));
        assert_eq!(parse_price("12.5"), Some(12.5));
        assert_eq!(parse_price(" 7 "), Some(7.0));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("."), None);
        assert_eq!(parse_price("1.2.3"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("NaN"), None);
    }

    #[test]
    fn test_begin_edit_targets_selected_row() {
        let mut state = SettingsState::new();
        state
            .products
            .set_items(vec![product(2, "Carrot", 25.0), product(1, "Tomato", 40.0)]);
        state.products.selected = 1;

        state.begin_edit();
        let edit = state.editing.as_ref().unwrap();
        assert_eq!(edit.product_id, 1);
        assert_eq!(edit.input.value(), "40");
        assert!(state.is_editing(1));
        assert!(!state.is_editing(2));
    }

    #[test]
    fn test_begin_edit_on_empty_list() {
        let mut state = SettingsState::new();
        state.begin_edit();
        assert!(state.editing.is_none());
    }
}
