use crate::config::{default_endpoint, default_field_name, default_file_name};

use serde::{Deserialize, Serialize};

/// Upload target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// URL the clip is POSTed to.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Multipart field carrying the clip.
    #[serde(default = "default_field_name")]
    pub field_name: String,

    /// File name attached to the clip part.
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            field_name: default_field_name(),
            file_name: default_file_name(),
        }
    }
}
