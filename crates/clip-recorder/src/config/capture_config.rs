use crate::config::{default_audio_source, default_video_source};

use serde::{Deserialize, Serialize};

/// Capture pipeline sources, used by the GStreamer backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Video source element, e.g. `v4l2src device=/dev/video0`.
    #[serde(default = "default_video_source")]
    pub video_source: String,

    /// Audio source element, e.g. `pulsesrc`.
    #[serde(default = "default_audio_source")]
    pub audio_source: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            video_source: default_video_source(),
            audio_source: default_audio_source(),
        }
    }
}
