use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row},
    Frame,
};
use tracing::{debug, info, warn};

use crate::models::{Cart, CartLine, SensorStatus};
use crate::poller::{spawn_status_poller, PollEvent, PollEventKind, PollerHandle};
use crate::services::PosApi;
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::widgets::{common, ColumnDef, SelectableTable};

/// Banner text while the status endpoint is unreachable
pub const DISCONNECTED_BANNER: &str = "Sensor Disconnected";

/// How the last status poll went
#[derive(Debug, Clone, PartialEq)]
pub enum SensorLink {
    /// No poll has finished since the tab opened
    Waiting,
    Online,
    Disconnected(String),
}

pub struct SellState {
    pub status: SensorStatus,
    pub link: SensorLink,
    /// Latest label from the classifier
    pub detected: Option<String>,
    /// Label chosen by hand, wins over `detected` until the next add
    pub manual_pick: Option<String>,
    pub classifier_error: Option<String>,
    pub quantity: u32,
    pub cart: Cart,
    poller: Option<PollerHandle>,
    active_generation: Option<u64>,
}

impl Default for SellState {
    fn default() -> Self {
        Self::new()
    }
}

impl SellState {
    pub fn new() -> Self {
        Self {
            status: SensorStatus::default(),
            link: SensorLink::Waiting,
            detected: None,
            manual_pick: None,
            classifier_error: None,
            quantity: 1,
            cart: Cart::new(),
            poller: None,
            active_generation: None,
        }
    }

    /// Generation of the poller whose events are currently accepted
    pub fn active_generation(&self) -> Option<u64> {
        self.active_generation
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    pub fn current_label(&self) -> Option<&str> {
        self.manual_pick.as_deref().or(self.detected.as_deref())
    }

    pub fn is_disconnected(&self) -> bool {
        matches!(self.link, SensorLink::Disconnected(_))
    }

    /// Fold a poller event into the screen.
    ///
    /// Events from any poller other than the running one are dropped.
    /// Returns whether the event was applied.
    pub fn apply_poll_event(&mut self, event: PollEvent) -> bool {
        if self.active_generation != Some(event.generation) {
            debug!(
                "Discarding event from poller #{} (active: {:?})",
                event.generation, self.active_generation
            );
            return false;
        }

        match event.kind {
            PollEventKind::Status(status) => {
                self.status = status;
                self.link = SensorLink::Online;
            }
            PollEventKind::StatusFailed(reason) => {
                self.link = SensorLink::Disconnected(reason);
            }
            PollEventKind::Classified(label) => {
                self.detected = Some(label);
                self.classifier_error = None;
            }
            PollEventKind::ClassifyFailed(reason) => {
                self.classifier_error = Some(reason);
            }
        }
        true
    }

    pub fn increment_quantity(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub fn decrement_quantity(&mut self) {
        self.quantity = self.quantity.saturating_sub(1).max(1);
    }

    /// Step the manual label through the price table in name order
    pub fn cycle_label(&mut self, forward: bool) {
        let mut names: Vec<&String> = self.status.prices.keys().collect();
        if names.is_empty() {
            return;
        }
        names.sort();

        let position = self
            .current_label()
            .and_then(|label| names.iter().position(|n| n.as_str() == label));
        let index = match (position, forward) {
            (Some(i), true) => (i + 1) % names.len(),
            (Some(i), false) => (i + names.len() - 1) % names.len(),
            (None, true) => 0,
            (None, false) => names.len() - 1,
        };
        self.manual_pick = Some(names[index].clone());
    }

    /// Add the current reading to the cart, or raise an alert saying why not
    pub fn add_to_cart<A: PosApi>(&mut self, context: &mut AppContext<A>) {
        let label = self.current_label().map(str::to_owned);
        match self
            .cart
            .add_reading(&self.status, label.as_deref(), self.quantity)
        {
            Ok(line) => {
                debug!(
                    "Added {} x{} at {:.3} kg = {:.2}",
                    line.name, line.quantity, line.weight, line.line_total
                );
                self.quantity = 1;
                self.manual_pick = None;
            }
            Err(rejection) => context.messages.set_error(rejection.to_string()),
        }
    }

    /// Post the cart. It is cleared only once the backend has accepted it.
    pub async fn checkout<A: PosApi>(&mut self, context: &mut AppContext<A>) {
        if self.cart.is_empty() {
            context.messages.set_error("Cart is empty");
            return;
        }

        let request = self.cart.to_checkout_request(&context.session.username);
        match context.api.checkout(context.bearer(), &request).await {
            Ok(response) => {
                info!(
                    target: "veggie_pos",
                    "Checkout of {} item(s) totalling {:.2} accepted (txn {:?})",
                    request.items.len(),
                    request.total,
                    response.txn_id
                );
                self.cart.clear();
                let notice = match response.txn_id {
                    Some(id) => format!("Saved! Transaction #{}", id),
                    None => "Saved!".to_string(),
                };
                context.messages.set_success(notice);
            }
            Err(e) => {
                warn!("Checkout failed: {:#}", e);
                context.messages.set_error(format!("Checkout failed: {}", e));
            }
        }
    }

    /// Start a fresh poller, retiring any previous one first
    pub fn start_polling<A: PosApi>(&mut self, context: &mut AppContext<A>) {
        self.stop_polling();

        let generation = context.next_poll_generation();
        let handle = spawn_status_poller(
            context.api.clone(),
            context.frames.clone(),
            context.bearer().to_string(),
            context.config.poll_interval,
            generation,
            context.poll_tx.clone(),
        );
        self.active_generation = Some(handle.generation());
        self.poller = Some(handle);
        self.link = SensorLink::Waiting;
    }

    pub fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
        self.active_generation = None;
    }

    fn render_reading(&self, frame: &mut Frame, area: Rect) {
        let weight_style = if self.status.is_stable {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        };
        let stability = if self.status.is_stable {
            "stable"
        } else {
            "settling"
        };

        let label = self.current_label().unwrap_or("Scan...");
        let label_source = if self.manual_pick.is_some() {
            " (manual)"
        } else {
            ""
        };
        let unit_price = self
            .current_label()
            .map(|l| self.status.price_of(l))
            .unwrap_or(0.0);

        let lines = vec![
            Line::from(vec![
                Span::raw("Weight:   "),
                Span::styled(common::format_weight(self.status.weight), weight_style),
                Span::raw(format!("  ({})", stability)),
            ]),
            Line::from(vec![
                Span::raw("Product:  "),
                Span::styled(label.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(label_source),
            ]),
            Line::from(format!("Price:    {}/kg", common::format_amount(unit_price))),
            Line::from(format!("Quantity: {}", self.quantity)),
        ];

        let widget = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Scale"));
        frame.render_widget(widget, area);
    }

    fn render_banners(&self, frame: &mut Frame, area: Rect) {
        let mut lines = Vec::new();
        match &self.link {
            SensorLink::Disconnected(_) => lines.push(
                Line::from(DISCONNECTED_BANNER)
                    .style(Style::default().fg(Color::White).bg(Color::Red))
                    .alignment(Alignment::Center),
            ),
            SensorLink::Waiting => lines.push(
                Line::from("Connecting to scale...")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
            ),
            SensorLink::Online => lines.push(Line::from("")),
        }
        if let Some(reason) = &self.classifier_error {
            lines.push(
                Line::from(format!("Classifier unavailable: {}", reason))
                    .style(Style::default().fg(Color::Yellow))
                    .alignment(Alignment::Center),
            );
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_cart(&self, frame: &mut Frame, area: Rect) {
        let columns = vec![
            ColumnDef::new("Item", Constraint::Percentage(40)),
            ColumnDef::new("Weight", Constraint::Percentage(20)),
            ColumnDef::new("Qty", Constraint::Percentage(10)),
            ColumnDef::new("Total", Constraint::Percentage(30)),
        ];
        let table = SelectableTable::new(self.cart.lines().to_vec(), columns)
            .with_empty_message("Cart is empty")
            .with_block_title(format!("Cart ({})", self.cart.len()));

        table.render(frame, area, |line: &CartLine, _i, _selected| {
            Row::new(vec![
                line.name.clone(),
                common::format_weight(line.weight),
                line.quantity.to_string(),
                common::format_amount(line.line_total),
            ])
        });
    }
}

#[async_trait]
impl<A: PosApi> Screen<A> for SellState {
    fn render(&self, frame: &mut Frame, area: Rect, _context: &AppContext<A>) {
        let chunks = Layout::vertical([
            Constraint::Length(2), // Banners
            Constraint::Length(6), // Scale reading
            Constraint::Min(0),    // Cart
            Constraint::Length(3), // Total
            Constraint::Length(3), // Help
        ])
        .split(area);

        self.render_banners(frame, chunks[0]);
        self.render_reading(frame, chunks[1]);
        self.render_cart(frame, chunks[2]);

        let total = Paragraph::new(format!("TOTAL: {}", common::format_amount(self.cart.total())))
            .alignment(Alignment::Right)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(total, chunks[3]);

        common::render_help(
            frame,
            chunks[4],
            &[
                ("+/-", "Qty"),
                ("←/→", "Pick"),
                ("a", "Add"),
                ("c", "Checkout"),
                ("x", "Clear"),
                ("Tab", "Next tab"),
                ("L", "Logout"),
                ("q", "Quit"),
            ],
        );
    }

    async fn handle_key(&mut self, context: &mut AppContext<A>, key: KeyEvent) -> Result<ScreenTransition> {
        match key.code {
            KeyCode::Char('+') | KeyCode::Char('=') => self.increment_quantity(),
            KeyCode::Char('-') => self.decrement_quantity(),
            KeyCode::Left => self.cycle_label(false),
            KeyCode::Right => self.cycle_label(true),
            KeyCode::Char('a') | KeyCode::Enter => self.add_to_cart(context),
            KeyCode::Char('c') => self.checkout(context).await,
            KeyCode::Char('x') => {
                self.cart.clear();
                self.quantity = 1;
                self.manual_pick = None;
            }
            _ => {
                if let Some(transition) = super::tab_keys(context, key) {
                    return Ok(transition);
                }
            }
        }
        Ok(ScreenTransition::Stay)
    }

    async fn on_enter(&mut self, context: &mut AppContext<A>) -> Result<()> {
        self.start_polling(context);
        Ok(())
    }

    async fn on_exit(&mut self, _context: &mut AppContext<A>) -> Result<()> {
        self.stop_polling();
        Ok(())
    }

    fn id(&self) -> ScreenId {
        ScreenId::Sell
    }
}
