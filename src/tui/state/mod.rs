pub mod messages;
pub mod navigation;

pub use messages::{Alert, AlertKind, MessageDisplay};
pub use navigation::Navigable;
