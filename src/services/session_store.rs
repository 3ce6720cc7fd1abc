use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::models::Session;

/// Persists the session between runs as a small JSON file
/// (`{"token": "...", "user": "..."}`).
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the saved session.
    ///
    /// A missing file means "not logged in". A corrupt file is logged and
    /// treated the same way rather than blocking start-up.
    pub fn load(&self) -> Session {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str::<Session>(&contents) {
                Ok(session) => session,
                Err(e) => {
                    warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
                    Session::default()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => Session::default(),
            Err(e) => {
                warn!("Failed to read session file {}: {}", self.path.display(), e);
                Session::default()
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(session)?;
        write_private(&self.path, json.as_bytes())
            .with_context(|| format!("failed to write session file {}", self.path.display()))?;
        info!("Session saved for '{}'", session.username);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("failed to remove session file {}", self.path.display())),
        }
    }
}

/// Write the file readable by its owner only; it holds a bearer token
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies when the file is created
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SessionStore {
        let dir = std::env::temp_dir().join(format!(
            "veggie-pos-test-{}-{}",
            name,
            std::process::id()
        ));
        SessionStore::new(dir.join("session.json"))
    }

    #[test]
    fn test_missing_file_is_anonymous() {
        let store = temp_store("missing");
        let _ = store.clear();
        assert_eq!(store.load(), Session::default());
    }

    #[test]
    fn test_save_load_clear() {
        let store = temp_store("roundtrip");
        let session = Session::new("tok-123", "admin");

        store.save(&session).unwrap();
        assert_eq!(store.load(), session);

        let raw = std::fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"user\""));

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.load(), Session::default());

        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_file_is_anonymous() {
        let store = temp_store("corrupt");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.load(), Session::default());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let store = temp_store("perms");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        // A file left world-readable by an older run gets tightened too
        std::fs::write(store.path(), "{}").unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&Session::new("tok-123", "admin")).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        store.clear().unwrap();
    }
}
