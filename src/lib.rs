pub mod logging;
pub mod models;
pub mod poller;
pub mod services;
pub mod shutdown;
pub mod tui;
