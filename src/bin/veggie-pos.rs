use anyhow::Result;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use veggie_pos::logging::init_file_logging;
use veggie_pos::models::AppConfig;
use veggie_pos::services::{FrameSource, HttpPosApi, NoCamera, SessionStore, SnapshotFile};
use veggie_pos::shutdown::{race_with_shutdown, ShutdownRace};
use veggie_pos::tui::App;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    // Load configuration
    let cfg = AppConfig::from_env()?;

    // Logs go to a file; the terminal belongs to the UI
    let _log_guard = init_file_logging(&cfg.log_dir)?;
    info!(
        target: "veggie_pos",
        "Starting veggie-pos {} against {}",
        env!("CARGO_PKG_VERSION"),
        cfg.api_base_url
    );

    let api = Arc::new(HttpPosApi::from_config(&cfg)?);
    let frames: Arc<dyn FrameSource> = match &cfg.camera_snapshot {
        Some(path) => {
            info!(target: "veggie_pos", "Reading camera stills from {}", path.display());
            Arc::new(SnapshotFile::new(path.clone()))
        }
        None => Arc::new(NoCamera),
    };
    let store = SessionStore::new(cfg.session_file.clone());
    let mut app = App::new(api, frames, store, cfg);

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    let result = race_with_shutdown(app.run(&mut terminal)).await;

    // Restore terminal
    ratatui::restore();

    match result? {
        ShutdownRace::Shutdown => {
            info!(target: "veggie_pos", "Interrupted, exiting");
            Ok(())
        }
        ShutdownRace::Completed(outcome) => {
            info!(target: "veggie_pos", "Exited");
            outcome
        }
    }
}
