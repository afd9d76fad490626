//! Configuration management for clip-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, RecordingConfig, UploadConfig},
};

use std::{
    fs,
    io::{self, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use clip_recorder_core::ClipUploader;
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Clip length settings.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Upload endpoint settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Capture source settings.
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl Config {
    /// Load configuration from disk, creating default if not found.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path).map_err(|e| AppError::ConfigError {
                reason: format!("Failed to read config: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

            let config = Self::from_toml(&contents)?;

            info!(config_path = ?config_path, "Configuration loaded");

            Ok(config)
        } else {
            info!("No config found, creating default");
            Self::create_default()
        }
    }

    /// Parse configuration text. Missing sections and fields take defaults.
    #[track_caller]
    pub fn from_toml(contents: &str) -> AppResult<Self> {
        toml::from_str(contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    /// Check values the recorder cannot work with.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        if self.recording.duration_seconds == 0 {
            return Err(AppError::ConfigError {
                reason: "recording.duration_seconds must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.upload.field_name.trim().is_empty() {
            return Err(AppError::ConfigError {
                reason: "upload.field_name must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        self.uploader()?;

        Ok(())
    }

    /// Build the uploader described by the `[upload]` section.
    #[track_caller]
    pub fn uploader(&self) -> AppResult<ClipUploader> {
        let uploader = ClipUploader::new(&self.upload.endpoint)?
            .with_field_name(self.upload.field_name.clone())
            .with_file_name(self.upload.file_name.clone());
        Ok(uploader)
    }

    /// Write the settings file.
    ///
    /// The TOML goes to a sibling `.tmp` file that is synced and then renamed
    /// over `config.toml`.
    #[track_caller]
    #[instrument]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;

        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Cannot encode settings as TOML: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        replace_file(&config_path, contents.as_bytes()).map_err(|e| AppError::ConfigError {
            reason: format!("Cannot write {}: {}", config_path.display(), e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, bytes = contents.len(), "Settings written");

        Ok(())
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs =
            ProjectDirs::from("com", "clip-recorder", "Clip-Recorder").ok_or_else(|| {
                AppError::ConfigError {
                    reason: "Failed to get config directory".to_string(),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn create_default() -> AppResult<Self> {
        let config = Config::default();

        config.save()?;

        info!(
            endpoint = %config.upload.endpoint,
            duration_seconds = config.recording.duration_seconds,
            "Default config created"
        );

        Ok(config)
    }
}

pub(crate) fn replace_file(path: &Path, contents: &[u8]) -> io::Result<()> {
    let staging = path.with_extension("toml.tmp");

    let mut file = fs::File::create(&staging)?;
    file.write_all(contents)?;
    file.sync_all()?;

    fs::rename(&staging, path)
}
