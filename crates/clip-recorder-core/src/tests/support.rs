//! Scripted capture device for controller tests.

use crate::{
    CaptureDevice, CaptureStream, ClipUploader, CoreResult, DEFAULT_UPLOAD_ENDPOINT, EncoderSink,
    MediaEncoder, Phase, RecorderError, RecordingController, TrackKind,
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use bytes::Bytes;

#[derive(Debug, Default)]
pub(crate) struct ProbeState {
    pub deny: bool,
    pub fail_encoder: bool,
    pub finalize_on_stop: bool,
    pub acquired: usize,
    pub released: usize,
    pub encoder_stops: usize,
    pub sink: Option<EncoderSink>,
}

/// Shared view into what the fake device was asked to do.
#[derive(Debug, Clone, Default)]
pub(crate) struct DeviceProbe(Arc<Mutex<ProbeState>>);

impl DeviceProbe {
    pub(crate) fn new() -> Self {
        let probe = Self::default();
        probe.with(|s| s.finalize_on_stop = true);
        probe
    }

    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut ProbeState) -> R) -> R {
        let mut state = self.0.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    pub(crate) fn device(&self) -> FakeDevice {
        FakeDevice {
            probe: self.clone(),
        }
    }

    /// Push a fragment through the most recently started encoder.
    pub(crate) fn emit(&self, data: &'static [u8]) -> bool {
        self.with(|s| {
            s.sink
                .as_ref()
                .is_some_and(|sink| sink.chunk(Bytes::from_static(data)))
        })
    }

    pub(crate) fn sink(&self) -> Option<EncoderSink> {
        self.with(|s| s.sink.clone())
    }

    pub(crate) fn acquired(&self) -> usize {
        self.with(|s| s.acquired)
    }

    pub(crate) fn released(&self) -> usize {
        self.with(|s| s.released)
    }

    pub(crate) fn encoder_stops(&self) -> usize {
        self.with(|s| s.encoder_stops)
    }
}

pub(crate) struct FakeDevice {
    probe: DeviceProbe,
}

impl CaptureDevice for FakeDevice {
    type Stream = FakeStream;

    async fn acquire(&mut self) -> CoreResult<FakeStream> {
        if self.probe.with(|s| s.deny) {
            return Err(RecorderError::device_access("permission denied"));
        }
        self.probe.with(|s| s.acquired += 1);
        Ok(FakeStream::new(self.probe.clone()))
    }
}

pub(crate) struct FakeStream {
    probe: DeviceProbe,
}

impl FakeStream {
    pub(crate) fn new(probe: DeviceProbe) -> Self {
        Self { probe }
    }
}

impl CaptureStream for FakeStream {
    type Encoder = FakeEncoder;

    fn tracks(&self) -> Vec<TrackKind> {
        vec![TrackKind::Video, TrackKind::Audio]
    }

    fn stop_tracks(&mut self) {
        self.probe.with(|s| s.released += 1);
    }

    fn encoder(&mut self) -> CoreResult<FakeEncoder> {
        if self.probe.with(|s| s.fail_encoder) {
            return Err(RecorderError::encoder("unsupported container"));
        }
        Ok(FakeEncoder {
            probe: self.probe.clone(),
            sink: None,
        })
    }
}

pub(crate) struct FakeEncoder {
    probe: DeviceProbe,
    sink: Option<EncoderSink>,
}

impl MediaEncoder for FakeEncoder {
    fn mime_type(&self) -> &str {
        "video/webm"
    }

    fn start(&mut self, sink: EncoderSink) -> CoreResult<()> {
        self.probe.with(|s| s.sink = Some(sink.clone()));
        self.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        let finalize = self.probe.with(|s| {
            s.encoder_stops += 1;
            s.finalize_on_stop
        });
        if finalize {
            if let Some(sink) = self.sink.as_ref() {
                sink.finalized();
            }
        }
    }
}

#[allow(clippy::unwrap_used)]
pub(crate) fn controller(probe: &DeviceProbe, duration_seconds: u32) -> RecordingController<FakeDevice> {
    let uploader = ClipUploader::new(DEFAULT_UPLOAD_ENDPOINT).unwrap();
    RecordingController::new(probe.device(), uploader, duration_seconds)
}

/// Feed queued events to the controller until it reaches `phase`.
///
/// Gives up after a minute of (possibly virtual) time.
pub(crate) async fn pump_until<D: CaptureDevice>(
    controller: &mut RecordingController<D>,
    phase: Phase,
) -> bool {
    tokio::time::timeout(Duration::from_secs(60), async {
        while controller.phase() != phase {
            match controller.next_event().await {
                Some(event) => controller.handle_event(event),
                None => return false,
            }
        }
        true
    })
    .await
    .unwrap_or(false)
}
