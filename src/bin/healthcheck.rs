use anyhow::{bail, Result};
use dotenvy::dotenv;
use std::process;
use veggie_pos::models::AppConfig;
use veggie_pos::services::HttpPosApi;

/// What the backend root answers when it is ready for traffic
const ONLINE_STATUS: &str = "System Online";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match check_backend().await {
        Ok(version) => {
            tracing::debug!("Backend online (version {})", version);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("Healthcheck failed: {:#}", e);
            process::exit(1);
        }
    }
}

async fn check_backend() -> Result<String> {
    // Same base URL and timeout the client uses
    let cfg = AppConfig::from_env()?;
    let api = HttpPosApi::from_config(&cfg)?;

    let root = api.root_status().await?;
    if root.status != ONLINE_STATUS {
        bail!("backend at {} reports '{}'", cfg.api_base_url, root.status);
    }
    Ok(root.version.unwrap_or_else(|| "unknown".to_string()))
}
