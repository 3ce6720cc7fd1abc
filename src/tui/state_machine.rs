use crate::tui::screen_trait::ScreenId;

/// ScreenStateMachine tracks which screen is visible.
///
/// Screens stay owned by the App; this only records the current one and
/// knows the tab order of the logged-in screens.
pub struct ScreenStateMachine {
    current: ScreenId,
}

impl Default for ScreenStateMachine {
    fn default() -> Self {
        Self {
            current: ScreenId::Login,
        }
    }
}

impl ScreenStateMachine {
    /// Start at the login screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at the given screen (the Sell tab for a restored session)
    pub fn starting_at(screen_id: ScreenId) -> Self {
        Self { current: screen_id }
    }

    pub fn go_to(&mut self, screen_id: ScreenId) {
        self.current = screen_id;
    }

    pub fn current(&self) -> ScreenId {
        self.current
    }

    /// The tab after the current one, wrapping. Login has no neighbours.
    pub fn next_tab(&self) -> Option<ScreenId> {
        self.tab_offset(1)
    }

    /// The tab before the current one, wrapping
    pub fn previous_tab(&self) -> Option<ScreenId> {
        self.tab_offset(ScreenId::TABS.len() - 1)
    }

    fn tab_offset(&self, offset: usize) -> Option<ScreenId> {
        let tabs = ScreenId::TABS;
        let index = tabs.iter().position(|t| *t == self.current)?;
        Some(tabs[(index + offset) % tabs.len()])
    }
}
