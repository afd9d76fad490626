//! Multipart upload of finished clips.

use crate::{Clip, CoreResult, RecorderError};

use std::panic::Location;

use error_location::ErrorLocation;
use reqwest::{
    Body, Client, Url,
    multipart::{Form, Part},
};
use tracing::{info, instrument, warn};

/// Endpoint used when none is configured.
pub const DEFAULT_UPLOAD_ENDPOINT: &str = "http://localhost:3000/upload";
/// Multipart field carrying the clip.
pub const DEFAULT_FIELD_NAME: &str = "video";
/// File name attached to the clip part.
pub const DEFAULT_FILE_NAME: &str = "video.webm";

/// Posts clips to a fixed endpoint, one attempt per call.
#[derive(Debug, Clone)]
pub struct ClipUploader {
    client: Client,
    endpoint: Url,
    field_name: String,
    file_name: String,
}

impl ClipUploader {
    /// Uploader for `endpoint` with the default field and file names.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::InvalidEndpoint`] if `endpoint` is not an
    /// absolute http(s) URL.
    #[track_caller]
    pub fn new(endpoint: &str) -> CoreResult<Self> {
        let url = Url::parse(endpoint).map_err(|e| RecorderError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
            location: ErrorLocation::from(Location::caller()),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(RecorderError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(Self {
            client: Client::new(),
            endpoint: url,
            field_name: DEFAULT_FIELD_NAME.to_string(),
            file_name: DEFAULT_FILE_NAME.to_string(),
        })
    }

    /// Override the multipart field name.
    pub fn with_field_name(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = field_name.into();
        self
    }

    /// Override the file name reported for the clip part.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Target URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `clip` as a single multipart field.
    ///
    /// # Errors
    ///
    /// - [`RecorderError::UploadRejected`] for any non-2xx status.
    /// - [`RecorderError::UploadTransport`] when no response was received.
    #[instrument(skip(self, clip), fields(endpoint = %self.endpoint, clip_bytes = clip.len()))]
    pub async fn upload(&self, clip: &Clip) -> CoreResult<()> {
        let part = Part::stream_with_length(Body::from(clip.bytes().clone()), clip.len() as u64)
            .file_name(self.file_name.clone())
            .mime_str(clip.mime_type())
            .map_err(|e| RecorderError::UploadTransport {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let form = Form::new().part(self.field_name.clone(), part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecorderError::UploadTransport {
                source: e,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Upload rejected");
            return Err(RecorderError::UploadRejected {
                status: status.as_u16(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(status = status.as_u16(), "Clip uploaded");

        Ok(())
    }
}
