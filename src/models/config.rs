use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub session_file: PathBuf,
    pub camera_snapshot: Option<PathBuf>,
    pub log_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            session_file: PathBuf::from("veggie-pos-session.json"),
            camera_snapshot: None,
            log_dir: PathBuf::from("logs"),
        }
    }
}

const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
const MIN_POLL_INTERVAL_MS: u64 = 200;
const MAX_POLL_INTERVAL_MS: u64 = 60_000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("POS_API_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.api_base_url);
        let parsed = reqwest::Url::parse(&api_base_url)
            .with_context(|| format!("POS_API_BASE_URL is not a valid URL: {}", api_base_url))?;
        // `localhost:8000` parses with scheme `localhost`, so check it is a usable base
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            bail!(
                "POS_API_BASE_URL must be an http:// or https:// address, got: {}",
                api_base_url
            );
        }

        let requested_poll = lookup("POS_POLL_INTERVAL_MS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        let poll_interval_ms = requested_poll.clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        if poll_interval_ms != requested_poll {
            tracing::warn!(
                "POS_POLL_INTERVAL_MS={} is outside {}..={}, using {}",
                requested_poll,
                MIN_POLL_INTERVAL_MS,
                MAX_POLL_INTERVAL_MS,
                poll_interval_ms
            );
        }

        let request_timeout_secs = lookup("POS_REQUEST_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let session_file = lookup("POS_SESSION_FILE")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.session_file);

        let camera_snapshot = lookup("POS_CAMERA_SNAPSHOT")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let log_dir = lookup("POS_LOG_DIR")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        Ok(Self {
            api_base_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            request_timeout: Duration::from_secs(request_timeout_secs),
            session_file,
            camera_snapshot,
            log_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.api_base_url, "http://localhost:8000");
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
        assert_eq!(cfg.session_file, PathBuf::from("veggie-pos-session.json"));
        assert!(cfg.camera_snapshot.is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let cfg = config_from(&[("POS_API_BASE_URL", "http://pos.local:9000/")]).unwrap();
        assert_eq!(cfg.api_base_url, "http://pos.local:9000");
    }

    #[test]
    fn test_invalid_url_rejected() {
        assert!(config_from(&[("POS_API_BASE_URL", "not a url")]).is_err());
    }

    #[test]
    fn test_scheme_less_url_rejected() {
        let err = config_from(&[("POS_API_BASE_URL", "localhost:8000")]).unwrap_err();
        assert!(err.to_string().contains("POS_API_BASE_URL"));

        assert!(config_from(&[("POS_API_BASE_URL", "ftp://pos.local")]).is_err());
        assert!(config_from(&[("POS_API_BASE_URL", "https://pos.local")]).is_ok());
    }

    #[test]
    fn test_poll_interval_clamped() {
        let cfg = config_from(&[("POS_POLL_INTERVAL_MS", "5")]).unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_millis(200));

        let cfg = config_from(&[("POS_POLL_INTERVAL_MS", "999999")]).unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_millis(60_000));
    }

    #[test]
    fn test_unparseable_numbers_fall_back() {
        let cfg = config_from(&[
            ("POS_POLL_INTERVAL_MS", "fast"),
            ("POS_REQUEST_TIMEOUT_SECS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(1));
        assert_eq!(cfg.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_camera_snapshot_path() {
        let cfg = config_from(&[("POS_CAMERA_SNAPSHOT", "/tmp/frame.jpg")]).unwrap();
        assert_eq!(cfg.camera_snapshot, Some(PathBuf::from("/tmp/frame.jpg")));
    }
}
