use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame,
};

use super::app::App;
use super::screen_trait::{Screen, ScreenId};
use crate::services::PosApi;

/// Draw the whole frame: tab bar once signed in, the current screen, and
/// any pending alert on top
pub fn render<A: PosApi>(frame: &mut Frame, app: &App<A>) {
    let area = frame.area();
    let current = app.current_screen();

    let screen_area = if current.requires_session() {
        let [header, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);
        render_tabs(frame, header, app);
        body
    } else {
        area
    };

    let context = &app.context;
    let states = &app.states;
    match current {
        ScreenId::Login => states.login_state.render(frame, screen_area, context),
        ScreenId::Sell => states.sell_state.render(frame, screen_area, context),
        ScreenId::Dashboard => states.dashboard_state.render(frame, screen_area, context),
        ScreenId::Settings => states.settings_state.render(frame, screen_area, context),
    }

    context.messages.render(frame, area);
}

fn render_tabs<A: PosApi>(frame: &mut Frame, area: Rect, app: &App<A>) {
    let titles: Vec<Line> = ScreenId::TABS.iter().map(|t| Line::from(t.title())).collect();
    let selected = ScreenId::TABS
        .iter()
        .position(|t| *t == app.current_screen())
        .unwrap_or(0);

    let cashier = Line::from(vec![
        Span::raw("Cashier: "),
        Span::styled(
            app.context.session.username.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ])
    .right_aligned();

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Veggie POS ")
                .title(cashier)
                .style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(tabs, area);
}
