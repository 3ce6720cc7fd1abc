use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Wrap},
    Frame,
};
use tracing::warn;

use crate::models::{DailyStats, RecentTransaction};
use crate::services::PosApi;
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::widgets::{common, ColumnDef, SelectableTable};

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    Loading,
    Loaded(DailyStats),
    Failed(String),
}

pub struct DashboardState {
    pub view: DashboardView,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            view: DashboardView::Loading,
        }
    }

    pub async fn load<A: PosApi>(&mut self, context: &AppContext<A>) {
        self.view = DashboardView::Loading;
        self.view = match context.api.daily_stats(context.bearer()).await {
            Ok(stats) => DashboardView::Loaded(stats),
            Err(e) => {
                warn!("Failed to load daily stats: {:#}", e);
                DashboardView::Failed(e.to_string())
            }
        };
    }

    fn render_stats(&self, frame: &mut Frame, area: Rect, stats: &DailyStats) {
        let chunks = Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).split(area);
        let cards = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);

        let big = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
        let sales = Paragraph::new(Line::from(Span::styled(
            common::format_amount(stats.total_sales),
            big,
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Today's Sales"));
        frame.render_widget(sales, cards[0]);

        let count = Paragraph::new(Line::from(Span::styled(
            stats.transaction_count.to_string(),
            big.fg(Color::Cyan),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Transactions"));
        frame.render_widget(count, cards[1]);

        let columns = vec![
            ColumnDef::new("#", Constraint::Length(8)),
            ColumnDef::new("Time", Constraint::Length(14)),
            ColumnDef::new("Cashier", Constraint::Percentage(40)),
            ColumnDef::new("Amount", Constraint::Percentage(30)),
        ];
        let table = SelectableTable::new(stats.recent_txns.clone(), columns)
            .with_empty_message("No transactions yet today")
            .with_block_title("Recent Transactions");
        table.render(frame, chunks[1], |txn: &RecentTransaction, _i, _selected| {
            Row::new(vec![
                txn.id.to_string(),
                txn.time_label(),
                txn.cashier.clone().unwrap_or_else(|| "-".to_string()),
                common::format_amount(txn.amount),
            ])
        });
    }
}

#[async_trait]
impl<A: PosApi> Screen<A> for DashboardState {
    fn render(&self, frame: &mut Frame, area: Rect, _context: &AppContext<A>) {
        let [title_area, content_area, help_area] = common::render_screen_layout(area);
        common::render_title(frame, title_area, "Daily Dashboard");

        match &self.view {
            DashboardView::Loading => common::render_empty_state(frame, content_area, "Loading..."),
            DashboardView::Loaded(stats) => self.render_stats(frame, content_area, stats),
            DashboardView::Failed(reason) => {
                let widget = Paragraph::new(vec![
                    Line::from("Could not load today's figures").style(Style::default().fg(Color::Red)),
                    Line::from(""),
                    Line::from(reason.clone()),
                    Line::from(""),
                    Line::from("Press r to retry"),
                ])
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
                frame.render_widget(widget, content_area);
            }
        }

        common::render_help(
            frame,
            help_area,
            &[("r", "Reload"), ("Tab", "Next tab"), ("L", "Logout"), ("q", "Quit")],
        );
    }

    async fn handle_key(&mut self, context: &mut AppContext<A>, key: KeyEvent) -> Result<ScreenTransition> {
        if key.code == KeyCode::Char('r') {
            self.load(context).await;
            return Ok(ScreenTransition::Stay);
        }
        Ok(super::tab_keys(context, key).unwrap_or(ScreenTransition::Stay))
    }

    async fn on_enter(&mut self, context: &mut AppContext<A>) -> Result<()> {
        self.load(context).await;
        Ok(())
    }

    fn id(&self) -> ScreenId {
        ScreenId::Dashboard
    }
}
