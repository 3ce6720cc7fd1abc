use anyhow::Result;
use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use tracing::{info, warn};

use crate::models::Session;
use crate::services::PosApi;
use crate::tui::app::AppContext;
use crate::tui::screen_trait::{Screen, ScreenId, ScreenTransition};
use crate::tui::widgets::{common, text_input, TextInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

pub struct LoginState {
    pub username: TextInput,
    pub password: TextInput,
    pub focus: LoginField,
}

impl Default for LoginState {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginState {
    pub fn new() -> Self {
        let mut username = TextInput::new()
            .with_title("Username")
            .with_placeholder("cashier name")
            .with_max_length(64)
            .with_validator(text_input::credential_validator);
        username.set_focused(true);

        let password = TextInput::new()
            .with_title("Password")
            .with_max_length(128)
            .masked();

        Self {
            username,
            password,
            focus: LoginField::Username,
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
        self.username.set_focused(self.focus == LoginField::Username);
        self.password.set_focused(self.focus == LoginField::Password);
    }

    fn focused_input(&mut self) -> &mut TextInput {
        match self.focus {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }

    /// Exchange the typed credentials for a token.
    ///
    /// Nothing about the session changes unless the backend accepts them.
    async fn submit<A: PosApi>(&mut self, context: &mut AppContext<A>) -> ScreenTransition {
        let username = self.username.value().to_string();
        info!(target: "veggie_pos", "Login attempt for '{}'", username);

        match context.api.login(&username, self.password.value()).await {
            Ok(token) => {
                info!(target: "veggie_pos", "Logged in as '{}'", username);
                context.session = Session::new(token.access_token, username);
                if let Err(e) = context.session_store.save(&context.session) {
                    warn!("Could not persist session: {:#}", e);
                }
                self.password.clear();
                ScreenTransition::GoTo(ScreenId::Sell)
            }
            Err(e) => {
                warn!("Login failed for '{}': {:#}", username, e);
                context.messages.set_error("Login failed");
                ScreenTransition::Stay
            }
        }
    }
}

#[async_trait]
impl<A: PosApi> Screen<A> for LoginState {
    fn render(&self, frame: &mut Frame, area: Rect, _context: &AppContext<A>) {
        let [title_area, content_area, help_area] = common::render_screen_layout(area);
        common::render_title(frame, title_area, "Veggie POS - Sign in");

        let form_area = common::centered_rect(50, 60, content_area);
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(form_area);

        self.username.render(frame, rows[0]);
        self.password.render(frame, rows[2]);

        let hint = Paragraph::new("Enter to sign in")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, rows[3]);

        common::render_help(
            frame,
            help_area,
            &[("Tab/↑/↓", "Switch field"), ("Enter", "Sign in"), ("Esc", "Quit")],
        );
    }

    async fn handle_key(&mut self, context: &mut AppContext<A>, key: KeyEvent) -> Result<ScreenTransition> {
        let transition = match key.code {
            KeyCode::Esc => ScreenTransition::Quit,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.toggle_focus();
                ScreenTransition::Stay
            }
            KeyCode::Enter => self.submit(context).await,
            _ => {
                self.focused_input().handle_key(key);
                ScreenTransition::Stay
            }
        };
        Ok(transition)
    }

    fn id(&self) -> ScreenId {
        ScreenId::Login
    }
}
