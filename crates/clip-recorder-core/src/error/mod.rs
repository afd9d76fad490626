use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

/// Recorder errors with source location tracking.
///
/// None of these are fatal. Each one ends the current attempt and the user
/// retries explicitly (start again, upload again).
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Camera/microphone could not be acquired (permission denied, no device, busy).
    #[error("Device access failed: {reason} {location}")]
    DeviceAccess {
        /// Description of the device failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The media encoder could not be created or started.
    #[error("Encoder error: {reason} {location}")]
    Encoder {
        /// Description of the encoder failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Upload endpoint is not a valid URL.
    #[error("Invalid upload endpoint {endpoint:?}: {reason} {location}")]
    InvalidEndpoint {
        /// The rejected endpoint string.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The request never produced a response (connection refused, reset, DNS).
    #[error("Upload transport error: {source} {location}")]
    UploadTransport {
        /// Underlying error from reqwest.
        #[source]
        source: reqwest::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The server answered with a non-success status.
    #[error("Upload rejected with status {status} {location}")]
    UploadRejected {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl RecorderError {
    #[track_caller]
    pub(crate) fn device_access(reason: impl Into<String>) -> Self {
        RecorderError::DeviceAccess {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub(crate) fn encoder(reason: impl Into<String>) -> Self {
        RecorderError::Encoder {
            reason: reason.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;
