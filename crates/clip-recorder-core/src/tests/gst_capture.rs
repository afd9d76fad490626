//! Runs the GStreamer backend against test sources. Needs the good and base
//! plugin sets installed.

use crate::{
    CaptureDevice, CaptureSession, CaptureStream, EncoderSink, GstCaptureConfig,
    GstCaptureDevice, MediaEncoder, RecorderEvent,
};

use std::time::{Duration, Instant};

use tokio::{sync::mpsc, time::timeout};
use uuid::Uuid;

const EVENT_TIMEOUT: Duration = Duration::from_secs(15);

fn test_device(video_source: &str) -> GstCaptureDevice {
    GstCaptureDevice::new(GstCaptureConfig {
        video_source: video_source.to_string(),
        audio_source: "audiotestsrc is-live=true".to_string(),
    })
}

/// Drain events until the encoder finalizes, counting the chunks before it.
#[allow(clippy::unwrap_used, clippy::panic)]
async fn chunks_until_finalized(rx: &mut mpsc::UnboundedReceiver<RecorderEvent>) -> usize {
    let mut chunks = 0;
    loop {
        match timeout(EVENT_TIMEOUT, rx.recv()).await.unwrap().unwrap() {
            RecorderEvent::Chunk { .. } => chunks += 1,
            RecorderEvent::Finalized { .. } => return chunks,
            other => panic!("unexpected event: {:?}", other),
        }
    }
}

/// WHAT: Test sources produce WebM fragments and a finalize after stop
/// WHY: The appsink callbacks are the only path from the pipeline to the clip
#[tokio::test]
#[allow(clippy::unwrap_used, clippy::panic)]
async fn given_test_sources_when_recording_then_chunks_then_finalized() {
    // Given: A pipeline on synthetic sources
    let mut device = test_device("videotestsrc is-live=true");
    let session_id = Uuid::new_v4();
    let mut capture = CaptureSession::new(device.acquire().await.unwrap(), session_id);
    let (tx, mut rx) = mpsc::unbounded_channel();

    // When: Encoding until the first fragment shows up
    let mut encoder = capture.stream_mut().encoder().unwrap();
    assert_eq!(encoder.mime_type(), "video/webm");
    encoder.start(EncoderSink::new(session_id, tx)).unwrap();

    match timeout(EVENT_TIMEOUT, rx.recv()).await.unwrap().unwrap() {
        RecorderEvent::Chunk { session_id: id, data } => {
            assert_eq!(id, session_id);
            assert!(!data.is_empty());
        }
        other => panic!("expected a chunk, got {:?}", other),
    }

    encoder.stop();
    capture.release();

    // Then: The muxer drains and reports completion
    chunks_until_finalized(&mut rx).await;
    assert!(capture.is_released());
}

/// WHAT: Stopping returns before a slow muxer finishes draining
/// WHY: The controller runs on a single-threaded event loop
#[tokio::test]
#[allow(clippy::unwrap_used, clippy::panic)]
async fn given_slow_video_branch_when_stopping_then_stop_returns_immediately() {
    // Given: A video branch that holds each frame for over a second
    let mut device = test_device("videotestsrc is-live=true ! identity sleep-time=1500000");
    let session_id = Uuid::new_v4();
    let mut capture = CaptureSession::new(device.acquire().await.unwrap(), session_id);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut encoder = capture.stream_mut().encoder().unwrap();
    encoder.start(EncoderSink::new(session_id, tx)).unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    // When: Stopping and releasing
    let started = Instant::now();
    encoder.stop();
    capture.release();
    let elapsed = started.elapsed();

    // Then: Neither call waited on the flush, which still completes
    assert!(elapsed < Duration::from_millis(500), "stop blocked for {:?}", elapsed);
    chunks_until_finalized(&mut rx).await;
}
