use crate::{
    CoreResult, EncoderSink, RecorderError,
    capture::{CaptureDevice, CaptureStream, MediaEncoder, TrackKind},
};

use tracing::warn;

/// Device used when no capture backend is compiled in.
///
/// Every acquisition fails with a device-access error, which the controller
/// surfaces like any other unavailable camera.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableDevice;

/// Uninhabited stream type: [`UnavailableDevice`] never produces one.
#[derive(Debug)]
pub enum NoStream {}

impl CaptureDevice for UnavailableDevice {
    type Stream = NoStream;

    async fn acquire(&mut self) -> CoreResult<NoStream> {
        warn!("No capture backend available");
        Err(RecorderError::device_access(
            "no capture backend compiled in (build with the `gstreamer` feature)",
        ))
    }
}

impl CaptureStream for NoStream {
    type Encoder = NoStream;

    fn tracks(&self) -> Vec<TrackKind> {
        match *self {}
    }

    fn stop_tracks(&mut self) {
        match *self {}
    }

    fn encoder(&mut self) -> CoreResult<NoStream> {
        match *self {}
    }
}

impl MediaEncoder for NoStream {
    fn mime_type(&self) -> &str {
        match *self {}
    }

    fn start(&mut self, _sink: EncoderSink) -> CoreResult<()> {
        match *self {}
    }

    fn stop(&mut self) {
        match *self {}
    }
}
