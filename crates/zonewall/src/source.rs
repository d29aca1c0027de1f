// ABOUTME: Resolves user-supplied playback sources into what the player is given.
// ABOUTME: Network streams pass through; local files are anchored to the media directory.

use std::path::{Path, PathBuf};
use zonewall_core::ZoneError;

const NETWORK_SCHEMES: &[&str] = &["rtsp://", "http://", "https://"];

#[derive(Debug, Clone)]
pub struct SourceResolver {
    media_dir: PathBuf,
}

impl SourceResolver {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
        }
    }

    pub fn is_network(source: &str) -> bool {
        NETWORK_SCHEMES.iter().any(|scheme| source.starts_with(scheme))
    }

    /// Relative paths are joined onto the media directory, and local files must exist.
    pub fn resolve(&self, source: &str) -> Result<String, ZoneError> {
        let source = source.trim();
        if source.is_empty() {
            return Err(ZoneError::InvalidRequest("source is required".to_string()));
        }
        if Self::is_network(source) {
            return Ok(source.to_string());
        }

        let path = Path::new(source);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.media_dir.join(path)
        };
        if !path.exists() {
            return Err(ZoneError::SourceNotFound(path.display().to_string()));
        }
        Ok(path.display().to_string())
    }
}
