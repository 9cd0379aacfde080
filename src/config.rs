// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{
    APP_ID, CAPTURE_CACHE_SUBDIR, DEFAULT_CAMERA_DEVICE, DEFAULT_CAPTURE_HEIGHT,
    DEFAULT_CAPTURE_WIDTH, DEFAULT_IMAGE_EXTENSIONS, DEFAULT_JPEG_QUALITY, DEFAULT_WARMUP_FRAMES,
};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.json";

/// What to do with an image once it has been produced
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum ImageAction {
    /// Only log the image handle
    #[default]
    Log,
    /// Open the image in the desktop's default viewer
    Open,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// V4L2 device node used for camera capture
    pub camera_device: String,
    /// Requested capture width
    pub capture_width: u32,
    /// Requested capture height
    pub capture_height: u32,
    /// Frames discarded before the captured one
    pub warmup_frames: u32,
    /// JPEG quality (1-100) for saved captures
    pub jpeg_quality: u8,
    /// Where captures are written (defaults to the user cache dir)
    pub cache_dir: Option<PathBuf>,
    /// File extensions offered by the picker
    pub image_extensions: Vec<String>,
    /// Action taken on each delivered image
    pub image_action: ImageAction,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera_device: DEFAULT_CAMERA_DEVICE.to_string(),
            capture_width: DEFAULT_CAPTURE_WIDTH,
            capture_height: DEFAULT_CAPTURE_HEIGHT,
            warmup_frames: DEFAULT_WARMUP_FRAMES,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            cache_dir: None,
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            image_action: ImageAction::default(),
        }
    }
}

impl Config {
    /// Default config file location (`$XDG_CONFIG_HOME/ocr-capture/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_ID).join(CONFIG_FILE_NAME))
    }

    /// Load from the default location, falling back to defaults
    pub fn load() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Config(format!("{}: {}", path.display(), e))),
        };

        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "Saved config");
        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(AppError::Config(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.capture_width == 0 || self.capture_height == 0 {
            return Err(AppError::Config(
                "capture resolution must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory that receives captured photos
    pub fn capture_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) => dir.clone(),
            None => dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_ID)
                .join(CAPTURE_CACHE_SUBDIR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "camera_device": "/dev/video2", "image_action": "Open" }"#)
            .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.camera_device, "/dev/video2");
        assert_eq!(config.image_action, ImageAction::Open);
        assert_eq!(config.jpeg_quality, DEFAULT_JPEG_QUALITY);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_out_of_range_quality_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "jpeg_quality": 0 }"#).unwrap();
        assert!(matches!(Config::load_from(&path), Err(AppError::Config(_))));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            cache_dir: Some(dir.path().join("captures")),
            warmup_frames: 0,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_explicit_cache_dir_wins() {
        let config = Config {
            cache_dir: Some(PathBuf::from("/tmp/ocr-captures")),
            ..Config::default()
        };
        assert_eq!(config.capture_dir(), PathBuf::from("/tmp/ocr-captures"));
    }
}
