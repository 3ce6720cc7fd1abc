use async_trait::async_trait;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::services::PosApi;
use crate::tui::app::AppContext;

/// Screen trait defines the interface for all TUI screens
///
/// Methods take `&mut self` for screen state and `context` for app-level
/// resources (API client, session, alerts), so the two can be borrowed
/// independently.
#[async_trait]
pub trait Screen<A: PosApi>: Send {
    /// Render this screen into `area` (below the tab bar when logged in)
    fn render(&self, frame: &mut Frame, area: Rect, context: &AppContext<A>);

    /// Handle keyboard input and return the next screen transition
    async fn handle_key(&mut self, context: &mut AppContext<A>, key: KeyEvent) -> Result<ScreenTransition>;

    /// Called when this screen becomes visible
    async fn on_enter(&mut self, context: &mut AppContext<A>) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Called when this screen stops being visible
    ///
    /// Background work tied to the screen must end here.
    async fn on_exit(&mut self, context: &mut AppContext<A>) -> Result<()> {
        let _ = context;
        Ok(())
    }

    /// Get the screen identifier
    fn id(&self) -> ScreenId;
}

/// Screen transition represents the result of handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTransition {
    /// Stay on the current screen (no navigation)
    Stay,

    /// Navigate to a specific screen
    GoTo(ScreenId),

    /// Drop the session and return to the login screen
    Logout,

    /// Quit the application
    Quit,
}

/// Screen identifier for each screen in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Login,
    Sell,
    Dashboard,
    Settings,
}

impl ScreenId {
    /// Tabs shown once logged in, in display order
    pub const TABS: [ScreenId; 3] = [ScreenId::Sell, ScreenId::Dashboard, ScreenId::Settings];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Sell => "Sell",
            Self::Dashboard => "Dashboard",
            Self::Settings => "Price Settings",
        }
    }

    pub fn requires_session(&self) -> bool {
        !matches!(self, Self::Login)
    }
}
