mod capture_config;
#[allow(clippy::module_inception)]
mod config;
mod recording_config;
mod upload_config;

pub(crate) use {
    capture_config::CaptureConfig, config::Config, recording_config::RecordingConfig,
    upload_config::UploadConfig,
};

#[cfg(test)]
pub(crate) use config::replace_file;

use clip_recorder_core::{
    DEFAULT_DURATION_SECONDS, DEFAULT_FIELD_NAME, DEFAULT_FILE_NAME, DEFAULT_UPLOAD_ENDPOINT,
};

pub(crate) const DEFAULT_VIDEO_SOURCE: &str = "autovideosrc";
pub(crate) const DEFAULT_AUDIO_SOURCE: &str = "autoaudiosrc";

pub(crate) fn default_duration_seconds() -> u32 {
    DEFAULT_DURATION_SECONDS
}

pub(crate) fn default_endpoint() -> String {
    DEFAULT_UPLOAD_ENDPOINT.to_string()
}

pub(crate) fn default_field_name() -> String {
    DEFAULT_FIELD_NAME.to_string()
}

pub(crate) fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

pub(crate) fn default_video_source() -> String {
    DEFAULT_VIDEO_SOURCE.to_string()
}

pub(crate) fn default_audio_source() -> String {
    DEFAULT_AUDIO_SOURCE.to_string()
}
