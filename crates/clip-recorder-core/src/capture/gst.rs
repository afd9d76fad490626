//! GStreamer capture backend.
//!
//! One pipeline per acquisition: camera and microphone are encoded to VP8 and
//! Opus, muxed into streamable WebM, and pulled from an `appsink`. Each
//! buffer the muxer emits becomes one clip fragment.

use crate::{
    CoreResult, EncoderSink, RecorderError,
    capture::{CaptureDevice, CaptureStream, MediaEncoder, TrackKind},
};

use std::sync::{
    Arc, OnceLock,
    atomic::{AtomicBool, Ordering},
};

use bytes::Bytes;
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use tracing::{debug, error, info, instrument, warn};

const WEBM_MIME_TYPE: &str = "video/webm";
const SINK_NAME: &str = "clip_sink";
/// Upper bound on how long the flush thread waits for the muxer.
const EOS_TIMEOUT_SECS: u64 = 5;
const FLUSH_THREAD_NAME: &str = "clip-recorder-flush";

static GSTREAMER_INIT: OnceLock<Result<(), String>> = OnceLock::new();

/// Source elements used to build the capture pipeline.
#[derive(Debug, Clone)]
pub struct GstCaptureConfig {
    /// Video source element description, e.g. `autovideosrc` or `v4l2src device=/dev/video0`.
    pub video_source: String,
    /// Audio source element description, e.g. `autoaudiosrc`.
    pub audio_source: String,
}

impl Default for GstCaptureConfig {
    fn default() -> Self {
        Self {
            video_source: "autovideosrc".to_string(),
            audio_source: "autoaudiosrc".to_string(),
        }
    }
}

/// Camera+microphone device backed by GStreamer.
#[derive(Debug, Clone, Default)]
pub struct GstCaptureDevice {
    config: GstCaptureConfig,
}

impl GstCaptureDevice {
    /// Device that builds pipelines from `config`.
    pub fn new(config: GstCaptureConfig) -> Self {
        Self { config }
    }
}

impl CaptureDevice for GstCaptureDevice {
    type Stream = GstCaptureStream;

    async fn acquire(&mut self) -> CoreResult<GstCaptureStream> {
        let config = self.config.clone();

        // Opening a camera can block for a noticeable time.
        tokio::task::spawn_blocking(move || GstCaptureStream::open(&config))
            .await
            .map_err(|e| RecorderError::device_access(format!("Capture task failed: {}", e)))?
    }
}

/// A live capture pipeline, paused until its encoder starts.
pub struct GstCaptureStream {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    /// Set once the encoder hands the pipeline to its flush thread.
    flushing: Arc<AtomicBool>,
}

impl GstCaptureStream {
    #[track_caller]
    #[instrument]
    fn open(config: &GstCaptureConfig) -> CoreResult<Self> {
        init_gstreamer()?;

        let description = format!(
            "{video} ! videoconvert ! queue ! vp8enc deadline=1 ! queue ! mux. \
             {audio} ! audioconvert ! audioresample ! queue ! opusenc ! queue ! mux. \
             webmmux name=mux streamable=true ! appsink name={sink} sync=false",
            video = config.video_source,
            audio = config.audio_source,
            sink = SINK_NAME,
        );

        let pipeline = gst::parse::launch(&description)
            .map_err(|e| RecorderError::device_access(format!("Failed to build pipeline: {}", e)))?
            .downcast::<gst::Pipeline>()
            .map_err(|_| RecorderError::device_access("Parsed element is not a pipeline"))?;

        let appsink = pipeline
            .by_name(SINK_NAME)
            .ok_or_else(|| RecorderError::device_access("Pipeline has no clip sink"))?
            .downcast::<gst_app::AppSink>()
            .map_err(|_| RecorderError::device_access("Clip sink is not an appsink"))?;

        // Live sources open the hardware on the way to PAUSED; permission and
        // busy-device failures surface here.
        if let Err(e) = pipeline.set_state(gst::State::Paused) {
            let _ = pipeline.set_state(gst::State::Null);
            return Err(RecorderError::device_access(format!(
                "Failed to open camera/microphone: {:?}",
                e
            )));
        }

        info!(
            video_source = %config.video_source,
            audio_source = %config.audio_source,
            "GStreamer capture pipeline opened"
        );

        Ok(Self {
            pipeline,
            appsink,
            flushing: Arc::new(AtomicBool::new(false)),
        })
    }
}

impl CaptureStream for GstCaptureStream {
    type Encoder = GstEncoder;

    fn tracks(&self) -> Vec<TrackKind> {
        vec![TrackKind::Video, TrackKind::Audio]
    }

    fn stop_tracks(&mut self) {
        // The flush thread owns shutdown once EOS is on its way.
        if self.flushing.load(Ordering::SeqCst) {
            debug!("Capture pipeline closes after the muxer flushes");
            return;
        }

        shut_down(&self.pipeline);
    }

    fn encoder(&mut self) -> CoreResult<GstEncoder> {
        Ok(GstEncoder {
            pipeline: self.pipeline.clone(),
            appsink: self.appsink.clone(),
            flushing: self.flushing.clone(),
            sink: None,
        })
    }
}

/// WebM encoder driving a [`GstCaptureStream`] pipeline.
pub struct GstEncoder {
    pipeline: gst::Pipeline,
    appsink: gst_app::AppSink,
    flushing: Arc<AtomicBool>,
    sink: Option<EncoderSink>,
}

impl MediaEncoder for GstEncoder {
    fn mime_type(&self) -> &str {
        WEBM_MIME_TYPE
    }

    #[track_caller]
    fn start(&mut self, sink: EncoderSink) -> CoreResult<()> {
        let sample_sink = sink.clone();
        let eos_sink = sink.clone();

        self.appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let sample = appsink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gst::FlowError::Error)?;
                    let map = buffer.map_readable().map_err(|_| gst::FlowError::Error)?;

                    if !sample_sink.chunk(Bytes::copy_from_slice(map.as_slice())) {
                        return Err(gst::FlowError::Flushing);
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .eos(move |_| {
                    eos_sink.finalized();
                })
                .build(),
        );

        self.pipeline
            .set_state(gst::State::Playing)
            .map_err(|e| RecorderError::encoder(format!("Failed to start pipeline: {:?}", e)))?;

        info!(session_id = %sink.session_id(), "GStreamer encoder started");
        self.sink = Some(sink);

        Ok(())
    }

    /// Send EOS and return. Waiting for the muxer happens on a separate
    /// thread, which also shuts the pipeline down.
    fn stop(&mut self) {
        let Some(sink) = self.sink.take() else {
            debug!("Encoder stop ignored, not started");
            return;
        };

        self.flushing.store(true, Ordering::SeqCst);

        if !self.pipeline.send_event(gst::event::Eos::new()) {
            warn!("Pipeline did not accept EOS");
        }

        let pipeline = self.pipeline.clone();
        let flush_sink = sink.clone();
        let spawned = std::thread::Builder::new()
            .name(FLUSH_THREAD_NAME.into())
            .spawn(move || wait_for_flush(&pipeline, &flush_sink));

        if let Err(e) = spawned {
            error!(error = %e, "Failed to spawn flush thread, closing pipeline now");
            shut_down(&self.pipeline);
            sink.finalized();
        }

        debug!(session_id = %sink.session_id(), "EOS sent to GStreamer encoder");
    }
}

/// Block until the muxer drains or fails, then close the pipeline.
fn wait_for_flush(pipeline: &gst::Pipeline, sink: &EncoderSink) {
    let flushed = match pipeline.bus() {
        Some(bus) => match bus.timed_pop_filtered(
            gst::ClockTime::from_seconds(EOS_TIMEOUT_SECS),
            &[gst::MessageType::Eos, gst::MessageType::Error],
        ) {
            Some(msg) => match msg.view() {
                gst::MessageView::Eos(..) => true,
                gst::MessageView::Error(err) => {
                    error!(error = %err.error(), debug = ?err.debug(), "Pipeline error during flush");
                    false
                }
                _ => false,
            },
            None => {
                warn!(timeout_secs = EOS_TIMEOUT_SECS, "Timed out waiting for EOS");
                false
            }
        },
        None => false,
    };

    shut_down(pipeline);

    // The appsink reports EOS itself on a clean flush. A duplicate is ignored
    // upstream.
    if !flushed {
        sink.finalized();
    }

    debug!(session_id = %sink.session_id(), flushed, "GStreamer encoder flushed");
}

fn shut_down(pipeline: &gst::Pipeline) {
    if let Err(e) = pipeline.set_state(gst::State::Null) {
        warn!(error = ?e, "Failed to stop capture pipeline");
    }
}

#[track_caller]
fn init_gstreamer() -> CoreResult<()> {
    let result = GSTREAMER_INIT.get_or_init(|| match gst::init() {
        Ok(()) => {
            info!(version = %gst::version_string(), "GStreamer initialized");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Failed to initialize GStreamer");
            Err(e.to_string())
        }
    });

    result
        .clone()
        .map_err(|reason| RecorderError::device_access(format!("GStreamer unavailable: {}", reason)))
}
