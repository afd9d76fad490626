use crate::capture::CaptureStream;

use tracing::{debug, info};
use uuid::Uuid;

/// Scoped ownership of an acquired device stream.
///
/// The stream is released exactly once: either explicitly through
/// [`release`](Self::release) or when the guard is dropped, whichever comes
/// first. Dropping the controller mid-recording therefore never leaves the
/// camera or microphone locked.
pub struct CaptureSession<S: CaptureStream> {
    stream: S,
    session_id: Uuid,
    released: bool,
}

impl<S: CaptureStream> CaptureSession<S> {
    /// Take ownership of a freshly acquired stream.
    pub fn new(stream: S, session_id: Uuid) -> Self {
        info!(
            session_id = %session_id,
            tracks = ?stream.tracks(),
            "Capture session acquired"
        );

        Self {
            stream,
            session_id,
            released: false,
        }
    }

    /// The underlying stream.
    pub fn stream_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    /// Stop all tracks. Safe to call more than once.
    pub fn release(&mut self) {
        if self.released {
            debug!(session_id = %self.session_id, "Capture session already released");
            return;
        }

        self.released = true;
        self.stream.stop_tracks();

        info!(session_id = %self.session_id, "Capture session released");
    }

    /// Whether the tracks have been stopped.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<S: CaptureStream> Drop for CaptureSession<S> {
    fn drop(&mut self) {
        self.release();
    }
}
