use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Source of still frames for product classification.
///
/// `Ok(None)` means "no frame this tick"; the poller then skips the
/// classification call entirely.
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self) -> Result<Option<Vec<u8>>>;
}

/// No camera attached. Products are picked by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCamera;

#[async_trait]
impl FrameSource for NoCamera {
    async fn capture(&self) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}

/// Reads a JPEG still that an external capture tool keeps overwriting
/// (e.g. `fswebcam --loop 1 /run/pos/frame.jpg`).
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FrameSource for SnapshotFile {
    async fn capture(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .with_context(|| format!("failed to read camera snapshot {}", self.path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_camera_yields_nothing() {
        assert!(NoCamera.capture().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_snapshot_yields_nothing() {
        let source = SnapshotFile::new("/nonexistent/veggie-pos/frame.jpg");
        assert!(source.capture().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_snapshot_bytes() {
        let path = std::env::temp_dir().join(format!("veggie-pos-frame-{}.jpg", std::process::id()));
        std::fs::write(&path, [0xFF, 0xD8, 0xFF]).unwrap();
        let source = SnapshotFile::new(&path);
        assert_eq!(source.capture().await.unwrap(), Some(vec![0xFF, 0xD8, 0xFF]));
        std::fs::remove_file(&path).unwrap();
    }
}
