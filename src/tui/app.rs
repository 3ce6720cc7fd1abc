use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use crate::models::{AppConfig, Session};
use crate::poller::PollEvent;
use crate::services::{FrameSource, PosApi, SessionStore};
use super::screen_trait::{Screen, ScreenId, ScreenTransition};
use super::screens;
use super::state::MessageDisplay;
use super::state_machine::ScreenStateMachine;
use super::ui;

/// Context that screens need access to (everything except screen states)
pub struct AppContext<A: PosApi> {
    pub api: Arc<A>,
    pub frames: Arc<dyn FrameSource>,
    pub config: AppConfig,
    pub session: Session,
    pub session_store: SessionStore,
    pub should_quit: bool,
    pub messages: MessageDisplay,
    pub state_machine: ScreenStateMachine,
    /// Cloned into every poller the Sell tab starts
    pub poll_tx: UnboundedSender<PollEvent>,
    last_poll_generation: u64,
}

impl<A: PosApi> AppContext<A> {
    /// Token for authenticated calls; empty when logged out, which the
    /// backend rejects
    pub fn bearer(&self) -> &str {
        self.session.token().unwrap_or_default()
    }

    pub fn next_poll_generation(&mut self) -> u64 {
        self.last_poll_generation += 1;
        self.last_poll_generation
    }
}

/// Container for all screen states
pub struct ScreenStates {
    pub login_state: screens::LoginState,
    pub sell_state: screens::SellState,
    pub dashboard_state: screens::DashboardState,
    pub settings_state: screens::SettingsState,
}

impl ScreenStates {
    pub fn new() -> Self {
        Self {
            login_state: screens::LoginState::new(),
            sell_state: screens::SellState::new(),
            dashboard_state: screens::DashboardState::new(),
            settings_state: screens::SettingsState::new(),
        }
    }
}

impl Default for ScreenStates {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App<A: PosApi> {
    pub context: AppContext<A>,
    pub states: ScreenStates,
    poll_rx: UnboundedReceiver<PollEvent>,
}

impl<A: PosApi> App<A> {
    /// Build the app, restoring any saved session.
    ///
    /// With a stored token the client opens on the Sell tab.
    pub fn new(
        api: Arc<A>,
        frames: Arc<dyn FrameSource>,
        session_store: SessionStore,
        config: AppConfig,
    ) -> Self {
        let session = session_store.load();
        let start = if session.is_authenticated() {
            info!(target: "veggie_pos", "Restored session for '{}'", session.username);
            ScreenId::Sell
        } else {
            ScreenId::Login
        };
        let (poll_tx, poll_rx) = mpsc::unbounded_channel();

        Self {
            context: AppContext {
                api,
                frames,
                config,
                session,
                session_store,
                should_quit: false,
                messages: MessageDisplay::new(),
                state_machine: ScreenStateMachine::starting_at(start),
                poll_tx,
                last_poll_generation: 0,
            },
            states: ScreenStates::new(),
            poll_rx,
        }
    }

    pub fn current_screen(&self) -> ScreenId {
        self.context.state_machine.current()
    }

    /// Run `on_enter` for the screen the app opens on
    pub async fn start(&mut self) -> Result<()> {
        self.enter_current().await
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        self.start().await?;

        while !self.context.should_quit {
            self.drain_poll_events();

            terminal.draw(|frame| ui::render(frame, self))?;

            // Handle input with timeout
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key).await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Apply every queued poller event to the Sell screen
    pub fn drain_poll_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.poll_rx.try_recv() {
            if self.states.sell_state.apply_poll_event(event) {
                applied += 1;
            }
        }
        applied
    }

    /// Wait for the next poller event and apply it. Test helper.
    #[cfg(test)]
    pub async fn next_poll_event(&mut self) -> Option<bool> {
        let event = self.poll_rx.recv().await?;
        Some(self.states.sell_state.apply_poll_event(event))
    }

    async fn handle_key_for_current_screen(&mut self, key: KeyEvent) -> Result<ScreenTransition> {
        // Split borrows: context and states are separate, so we can borrow both
        let context = &mut self.context;
        let states = &mut self.states;

        let transition = match context.state_machine.current() {
            ScreenId::Login => states.login_state.handle_key(context, key).await?,
            ScreenId::Sell => states.sell_state.handle_key(context, key).await?,
            ScreenId::Dashboard => states.dashboard_state.handle_key(context, key).await?,
            ScreenId::Settings => states.settings_state.handle_key(context, key).await?,
        };

        Ok(transition)
    }

    async fn enter_current(&mut self) -> Result<()> {
        let context = &mut self.context;
        let states = &mut self.states;

        match context.state_machine.current() {
            ScreenId::Login => states.login_state.on_enter(context).await,
            ScreenId::Sell => states.sell_state.on_enter(context).await,
            ScreenId::Dashboard => states.dashboard_state.on_enter(context).await,
            ScreenId::Settings => states.settings_state.on_enter(context).await,
        }
    }

    async fn exit_current(&mut self) -> Result<()> {
        let context = &mut self.context;
        let states = &mut self.states;

        match context.state_machine.current() {
            ScreenId::Login => states.login_state.on_exit(context).await,
            ScreenId::Sell => states.sell_state.on_exit(context).await,
            ScreenId::Dashboard => states.dashboard_state.on_exit(context).await,
            ScreenId::Settings => states.settings_state.on_exit(context).await,
        }
    }

    async fn go_to(&mut self, screen_id: ScreenId) -> Result<()> {
        if screen_id == self.current_screen() {
            return Ok(());
        }
        self.exit_current().await?;
        self.context.state_machine.go_to(screen_id);
        self.enter_current().await
    }

    async fn logout(&mut self) -> Result<()> {
        self.exit_current().await?;

        info!(target: "veggie_pos", "Logged out '{}'", self.context.session.username);
        self.context.session.clear();
        if let Err(e) = self.context.session_store.clear() {
            warn!("Could not remove session file: {:#}", e);
        }

        // Nothing from the previous cashier survives a logout
        self.states = ScreenStates::new();
        self.context.state_machine.go_to(ScreenId::Login);
        self.enter_current().await
    }

    /// Feed one key press through the app.
    ///
    /// A pending alert swallows the key. Ctrl+C quits from anywhere.
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.context.messages.has_message() {
            self.context.messages.clear();
            return Ok(());
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit().await;
            return Ok(());
        }

        match self.handle_key_for_current_screen(key).await? {
            ScreenTransition::Stay => {}
            ScreenTransition::GoTo(screen_id) => {
                if screen_id.requires_session() && !self.context.session.is_authenticated() {
                    self.context.messages.set_error("Please sign in first");
                } else {
                    self.go_to(screen_id).await?;
                }
            }
            ScreenTransition::Logout => self.logout().await?,
            ScreenTransition::Quit => self.quit().await,
        }

        Ok(())
    }

    async fn quit(&mut self) {
        if let Err(e) = self.exit_current().await {
            warn!("Error while leaving {:?}: {:#}", self.current_screen(), e);
        }
        self.context.should_quit = true;
    }
}
