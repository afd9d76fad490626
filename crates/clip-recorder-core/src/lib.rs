//! Clip Recorder Core Library
//!
//! Fixed-length camera clip recording with a countdown, preview state and
//! multipart upload.
//!
//! # Example
//!
//! ```no_run
//! use clip_recorder_core::{ClipUploader, CoreResult, RecordingController, UnavailableDevice};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CoreResult<()> {
//!     let uploader = ClipUploader::new("http://localhost:3000/upload")?;
//!     let mut controller = RecordingController::new(UnavailableDevice, uploader, 5);
//!
//!     controller.start().await?;
//!     while controller.clip().is_none() {
//!         if let Some(event) = controller.next_event().await {
//!             controller.handle_event(event);
//!         }
//!     }
//!     controller.upload();
//!     Ok(())
//! }
//! ```

mod capture;
mod clip;
mod controller;
mod countdown;
mod error;
mod events;
mod uploader;
mod view;

#[cfg(feature = "gstreamer")]
pub use capture::{GstCaptureConfig, GstCaptureDevice, GstCaptureStream, GstEncoder};
pub use {
    capture::{
        CaptureDevice, CaptureSession, CaptureStream, MediaEncoder, NoStream, TrackKind,
        UnavailableDevice,
    },
    clip::{Clip, ClipSession, DEFAULT_DURATION_SECONDS},
    controller::RecordingController,
    error::{RecorderError, Result as CoreResult},
    events::{EncoderSink, RecorderEvent},
    uploader::{ClipUploader, DEFAULT_FIELD_NAME, DEFAULT_FILE_NAME, DEFAULT_UPLOAD_ENDPOINT},
    view::{
        COMPLETED_LABEL, DEVICE_ERROR_MESSAGE, Phase, Popup, TimeLeft, UPLOAD_ERROR_MESSAGE,
        UPLOAD_REJECTED_MESSAGE, UPLOAD_SUCCESS_MESSAGE, ViewState,
    },
};

#[cfg(test)]
mod tests;
