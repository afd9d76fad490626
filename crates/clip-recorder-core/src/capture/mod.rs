//! Camera/microphone capture seams.
//!
//! A [`CaptureDevice`] hands out live [`CaptureStream`]s; a stream hands out a
//! [`MediaEncoder`] that turns it into container fragments. Backends implement
//! these; the controller only ever sees the traits.

#[cfg(feature = "gstreamer")]
mod gst;
mod session;
mod unavailable;

#[cfg(feature = "gstreamer")]
pub use gst::{GstCaptureConfig, GstCaptureDevice, GstCaptureStream, GstEncoder};
pub use {
    session::CaptureSession,
    unavailable::{NoStream, UnavailableDevice},
};

use crate::{CoreResult, EncoderSink};

use std::future::Future;

/// Kind of media carried by a stream track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackKind {
    /// Microphone input.
    Audio,
    /// Camera input.
    Video,
}

/// Source of combined audio+video streams.
pub trait CaptureDevice {
    /// Live stream type produced by this device.
    type Stream: CaptureStream;

    /// Request camera and microphone access.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError::DeviceAccess`](crate::RecorderError::DeviceAccess)
    /// when permission is denied, no device exists, or the device is busy.
    fn acquire(&mut self) -> impl Future<Output = CoreResult<Self::Stream>> + Send;
}

/// An acquired, live device stream.
pub trait CaptureStream: Send {
    /// Encoder type recording this stream.
    type Encoder: MediaEncoder;

    /// Tracks currently carried by the stream.
    fn tracks(&self) -> Vec<TrackKind>;

    /// Stop every track, giving the camera/microphone back to the system.
    fn stop_tracks(&mut self);

    /// Create an encoder bound to this stream.
    fn encoder(&mut self) -> CoreResult<Self::Encoder>;
}

/// Incremental media encoder.
pub trait MediaEncoder: Send {
    /// Container type of the produced fragments, e.g. `video/webm`.
    fn mime_type(&self) -> &str;

    /// Begin encoding. Fragments are delivered through `sink` as they are produced.
    fn start(&mut self, sink: EncoderSink) -> CoreResult<()>;

    /// Request a stop. The encoder flushes pending output and then calls
    /// [`EncoderSink::finalized`], possibly after this method returns.
    fn stop(&mut self);
}
