//! Recording state machine.
//!
//! `Idle → Recording → Finalizing → Reviewing`, back to `Idle` via re-record.
//! All device, timer and upload callbacks arrive through one event queue, so
//! the controller never handles two of them at once. The device stream and
//! the countdown are owned by the active recording and released together on
//! every path out of `Recording`.

use crate::{
    CaptureDevice, CaptureSession, CaptureStream, Clip, ClipSession, ClipUploader, CoreResult,
    EncoderSink, MediaEncoder, RecorderError, RecorderEvent,
    countdown::{Countdown, TICK_PERIOD},
    view::{
        DEVICE_ERROR_MESSAGE, Phase, TimeLeft, UPLOAD_ERROR_MESSAGE, UPLOAD_REJECTED_MESSAGE,
        UPLOAD_SUCCESS_MESSAGE, ViewState,
    },
};

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

type EncoderOf<D> = <<D as CaptureDevice>::Stream as CaptureStream>::Encoder;

/// Resources that exist only while recording.
struct ActiveRecording<S: CaptureStream> {
    capture: CaptureSession<S>,
    encoder: S::Encoder,
    countdown: Countdown,
}

/// Drives one clip at a time from capture to upload.
pub struct RecordingController<D: CaptureDevice> {
    device: D,
    uploader: ClipUploader,
    duration_seconds: u32,
    view: ViewState,
    session: Option<ClipSession>,
    active: Option<ActiveRecording<D::Stream>>,
    /// Encoder kept alive between stop and its finalize event.
    flushing: Option<EncoderOf<D>>,
    events_tx: mpsc::UnboundedSender<RecorderEvent>,
    events_rx: mpsc::UnboundedReceiver<RecorderEvent>,
}

impl<D: CaptureDevice> RecordingController<D> {
    /// Create an idle controller recording clips of `duration_seconds`.
    ///
    /// A zero duration is raised to one second.
    pub fn new(device: D, uploader: ClipUploader, duration_seconds: u32) -> Self {
        let duration_seconds = duration_seconds.max(1);
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Self {
            device,
            uploader,
            duration_seconds,
            view: ViewState::new(duration_seconds),
            session: None,
            active: None,
            flushing: None,
            events_tx,
            events_rx,
        }
    }

    /// Current presentation state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.view.phase
    }

    /// The current or most recent session, until it is discarded.
    pub fn session(&self) -> Option<&ClipSession> {
        self.session.as_ref()
    }

    /// The finalized clip, present only while reviewing.
    pub fn clip(&self) -> Option<&Clip> {
        self.session.as_ref().and_then(ClipSession::final_clip)
    }

    /// Acquire the device and begin a new recording.
    ///
    /// Returns `Ok(false)` without side effects unless the phase is `Idle`.
    ///
    /// # Errors
    ///
    /// Device or encoder failures leave the phase `Idle`, show the device
    /// popup, and are returned for logging.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> CoreResult<bool> {
        if self.view.phase != Phase::Idle {
            debug!(phase = ?self.view.phase, "Start ignored");
            return Ok(false);
        }

        let stream = match self.device.acquire().await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = ?e, "Device access failed");
                self.view.show_popup(DEVICE_ERROR_MESSAGE);
                return Err(e);
            }
        };

        // One session at a time: whatever was left over is gone now.
        self.discard_session();

        let session = ClipSession::new(self.duration_seconds);
        let session_id = session.id();
        let mut capture = CaptureSession::new(stream, session_id);

        let encoder = match Self::start_encoder(&mut capture, session_id, &self.events_tx) {
            Ok(encoder) => encoder,
            Err(e) => {
                warn!(session_id = %session_id, error = ?e, "Encoder failed to start");
                capture.release();
                self.view.show_popup(DEVICE_ERROR_MESSAGE);
                return Err(e);
            }
        };

        let countdown = Countdown::start(session_id, TICK_PERIOD, self.events_tx.clone());

        self.active = Some(ActiveRecording {
            capture,
            encoder,
            countdown,
        });
        self.session = Some(session);

        self.view.phase = Phase::Recording;
        self.view.show_thumbnail = false;
        self.view.time_left = TimeLeft::Seconds(self.duration_seconds);

        info!(
            session_id = %session_id,
            duration_seconds = self.duration_seconds,
            "Recording started"
        );

        Ok(true)
    }

    fn start_encoder(
        capture: &mut CaptureSession<D::Stream>,
        session_id: Uuid,
        events_tx: &mpsc::UnboundedSender<RecorderEvent>,
    ) -> CoreResult<EncoderOf<D>> {
        let mut encoder = capture.stream_mut().encoder()?;
        encoder.start(EncoderSink::new(session_id, events_tx.clone()))?;
        Ok(encoder)
    }

    /// Stop the running recording.
    ///
    /// Clears the countdown, asks the encoder to flush and releases the
    /// device. The phase becomes `Reviewing` once the encoder reports it has
    /// finalized. Returns `false` when not recording, so a timer expiry and a
    /// manual stop in the same tick finalize only once.
    #[instrument(skip(self))]
    pub fn stop(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            debug!(phase = ?self.view.phase, "Stop ignored");
            return false;
        };

        let ActiveRecording {
            mut capture,
            mut encoder,
            countdown,
        } = active;

        drop(countdown);
        encoder.stop();
        capture.release();

        self.flushing = Some(encoder);
        self.view.phase = Phase::Finalizing;

        info!(
            session_id = ?self.session.as_ref().map(ClipSession::id),
            "Recording stopped, waiting for encoder"
        );

        true
    }

    /// Throw away the reviewed clip and return to `Idle`.
    #[instrument(skip(self))]
    pub fn re_record(&mut self) -> bool {
        if self.view.phase != Phase::Reviewing {
            debug!(phase = ?self.view.phase, "Re-record ignored");
            return false;
        }

        self.discard_session();
        self.view.phase = Phase::Idle;
        self.view.show_thumbnail = true;

        info!("Clip discarded, ready to record");

        true
    }

    /// Upload the finalized clip in the background.
    ///
    /// A no-op returning `false` unless a clip exists. The result arrives as
    /// [`RecorderEvent::UploadFinished`] and only changes the popup.
    #[instrument(skip(self))]
    pub fn upload(&mut self) -> bool {
        let (session_id, clip) = match self.session.as_ref() {
            Some(session) if self.view.phase == Phase::Reviewing => match session.final_clip() {
                Some(clip) => (session.id(), clip.clone()),
                None => {
                    debug!("Upload ignored, clip not finalized");
                    return false;
                }
            },
            _ => {
                debug!(phase = ?self.view.phase, "Upload ignored");
                return false;
            }
        };

        let uploader = self.uploader.clone();
        let events_tx = self.events_tx.clone();

        info!(session_id = %session_id, clip_bytes = clip.len(), "Upload started");

        tokio::spawn(async move {
            let result = uploader.upload(&clip).await;
            let _ = events_tx.send(RecorderEvent::UploadFinished { session_id, result });
        });

        true
    }

    /// Hide the popup.
    pub fn dismiss_popup(&mut self) {
        self.view.dismiss_popup();
    }

    /// Wait for the next device, timer or upload event.
    pub async fn next_event(&mut self) -> Option<RecorderEvent> {
        self.events_rx.recv().await
    }

    /// Apply one event to the state machine.
    pub fn handle_event(&mut self, event: RecorderEvent) {
        match event {
            RecorderEvent::Tick { session_id } => self.on_tick(session_id),
            RecorderEvent::Chunk { session_id, data } => self.on_chunk(session_id, data),
            RecorderEvent::Finalized { session_id } => self.on_finalized(session_id),
            RecorderEvent::UploadFinished { session_id, result } => {
                self.on_upload_finished(session_id, result)
            }
        }
    }

    /// Release everything; used when the front end goes away.
    #[instrument(skip(self))]
    pub fn teardown(&mut self) {
        if let Some(ActiveRecording {
            mut capture,
            mut encoder,
            countdown,
        }) = self.active.take()
        {
            drop(countdown);
            encoder.stop();
            capture.release();
            info!("Recording abandoned on teardown");
        }

        self.discard_session();
        self.view.phase = Phase::Idle;
        self.view.show_thumbnail = true;
    }

    fn is_current(&self, session_id: Uuid) -> bool {
        self.session.as_ref().map(ClipSession::id) == Some(session_id)
    }

    fn discard_session(&mut self) {
        self.flushing = None;
        if let Some(session) = self.session.take() {
            debug!(session_id = %session.id(), "Session discarded");
        }
    }

    fn on_tick(&mut self, session_id: Uuid) {
        if self.active.is_none() || !self.is_current(session_id) {
            debug!(session_id = %session_id, "Stale tick ignored");
            return;
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let remaining = session.tick();
        self.view.time_left = if remaining > 0 {
            TimeLeft::Seconds(remaining)
        } else {
            TimeLeft::Completed
        };

        debug!(session_id = %session_id, remaining, "Tick");

        if remaining == 0 {
            self.stop();
        }
    }

    fn on_chunk(&mut self, session_id: Uuid, data: Bytes) {
        // The encoder may still flush after stop, until it finalizes.
        let accepting = matches!(self.view.phase, Phase::Recording | Phase::Finalizing);

        match self.session.as_mut() {
            Some(session) if accepting && session.id() == session_id => {
                let len = data.len();
                session.push_chunk(data);
                debug!(
                    session_id = %session_id,
                    chunk_bytes = len,
                    chunk_count = session.chunks().len(),
                    "Chunk received"
                );
            }
            _ => debug!(session_id = %session_id, "Stale chunk ignored"),
        }
    }

    fn on_finalized(&mut self, session_id: Uuid) {
        if self.view.phase != Phase::Finalizing || !self.is_current(session_id) {
            debug!(session_id = %session_id, "Stale finalize ignored");
            return;
        }

        let Some(encoder) = self.flushing.take() else {
            return;
        };

        let Some(session) = self.session.as_mut() else {
            return;
        };

        let chunk_count = session.chunks().len();
        if let Some(clip) = session.finalize(encoder.mime_type()) {
            info!(
                session_id = %session_id,
                clip_bytes = clip.len(),
                chunk_count,
                mime_type = clip.mime_type(),
                "Clip finalized"
            );
            self.view.phase = Phase::Reviewing;
        }
    }

    fn on_upload_finished(&mut self, session_id: Uuid, result: CoreResult<()>) {
        let message = match result {
            Ok(()) => UPLOAD_SUCCESS_MESSAGE,
            Err(RecorderError::UploadRejected { status, .. }) => {
                warn!(session_id = %session_id, status, "Upload rejected");
                UPLOAD_REJECTED_MESSAGE
            }
            Err(e) => {
                warn!(session_id = %session_id, error = ?e, "Upload failed");
                UPLOAD_ERROR_MESSAGE
            }
        };

        self.view.show_popup(message);
    }
}

impl<D: CaptureDevice> Drop for RecordingController<D> {
    fn drop(&mut self) {
        self.teardown();
    }
}
