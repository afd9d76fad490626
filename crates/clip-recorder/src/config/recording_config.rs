use crate::config::default_duration_seconds;

use serde::{Deserialize, Serialize};

/// Recording behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Clip length in seconds; must be positive.
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u32,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            duration_seconds: default_duration_seconds(),
        }
    }
}
