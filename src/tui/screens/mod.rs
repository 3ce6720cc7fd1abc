pub mod dashboard;
pub mod login;
pub mod sell;
pub mod settings;

pub use dashboard::{DashboardState, DashboardView};
pub use login::{LoginField, LoginState};
pub use sell::{SellState, SensorLink};
pub use settings::{PriceEdit, SettingsState};

use crossterm::event::{KeyCode, KeyEvent};

use crate::services::PosApi;
use crate::tui::app::AppContext;
use crate::tui::screen_trait::ScreenTransition;

/// Keys every logged-in tab understands when it is not capturing text:
/// Tab/BackTab switch tabs, `L` logs out, `q` quits
pub fn tab_keys<A: PosApi>(context: &AppContext<A>, key: KeyEvent) -> Option<ScreenTransition> {
    let sm = &context.state_machine;
    match key.code {
        KeyCode::Tab => sm.next_tab().map(ScreenTransition::GoTo),
        KeyCode::BackTab => sm.previous_tab().map(ScreenTransition::GoTo),
        KeyCode::Char('L') => Some(ScreenTransition::Logout),
        KeyCode::Char('q') => Some(ScreenTransition::Quit),
        _ => None,
    }
}
