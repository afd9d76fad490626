use crate::CoreResult;

use bytes::Bytes;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Everything that can wake the recording controller besides a user command.
///
/// Device, timer and network callbacks all funnel into one queue so the
/// controller handles them strictly one at a time.
#[derive(Debug)]
pub enum RecorderEvent {
    /// One second of the countdown elapsed.
    Tick {
        /// Session the countdown belongs to.
        session_id: Uuid,
    },
    /// The encoder produced a fragment.
    Chunk {
        /// Session the encoder belongs to.
        session_id: Uuid,
        /// Encoded bytes, in production order.
        data: Bytes,
    },
    /// The encoder flushed its last fragment after being stopped.
    Finalized {
        /// Session the encoder belongs to.
        session_id: Uuid,
    },
    /// An upload attempt completed.
    UploadFinished {
        /// Session whose clip was uploaded.
        session_id: Uuid,
        /// Outcome of the single POST.
        result: CoreResult<()>,
    },
}

/// Handle given to a [`MediaEncoder`](crate::MediaEncoder) to report output.
///
/// Cloneable and `Send`, so backends may call it from their own threads.
/// Every event is stamped with the session id, which lets the controller drop
/// output from an encoder that belongs to a discarded session.
#[derive(Debug, Clone)]
pub struct EncoderSink {
    session_id: Uuid,
    tx: mpsc::UnboundedSender<RecorderEvent>,
}

impl EncoderSink {
    /// Create a sink that tags events with `session_id`.
    pub fn new(session_id: Uuid, tx: mpsc::UnboundedSender<RecorderEvent>) -> Self {
        Self { session_id, tx }
    }

    /// Session this sink reports for.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Deliver an encoded fragment. Returns `false` once the controller is gone.
    pub fn chunk(&self, data: impl Into<Bytes>) -> bool {
        self.tx
            .send(RecorderEvent::Chunk {
                session_id: self.session_id,
                data: data.into(),
            })
            .is_ok()
    }

    /// Signal that the encoder has flushed everything after a stop request.
    pub fn finalized(&self) -> bool {
        self.tx
            .send(RecorderEvent::Finalized {
                session_id: self.session_id,
            })
            .is_ok()
    }
}
