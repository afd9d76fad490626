//! Clip-Recorder: record a fixed-length camera clip, review it, upload it.

mod app;
mod app_command;
mod config;
mod console_input;
mod error;
mod view_renderer;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console_input::ConsoleInput,
    error::{AppError, Result as AppResult},
};

use crate::config::Config;

use clip_recorder_core::RecordingController;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "clip_recorder=debug,clip_recorder_core=debug";

/// Application entry point.
///
/// A current-thread runtime keeps every handler on one event queue.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Logs go to stderr so they don't interleave with the rendered view.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    let uploader = match config.uploader() {
        Ok(u) => u,
        Err(e) => {
            error!("Failed to create uploader: {:?}", e);
            std::process::exit(1);
        }
    };

    info!(
        endpoint = %uploader.endpoint(),
        duration_seconds = config.recording.duration_seconds,
        video_source = %config.capture.video_source,
        audio_source = %config.capture.audio_source,
        "Configuration ready"
    );

    let controller = RecordingController::new(
        capture_device(&config),
        uploader,
        config.recording.duration_seconds,
    );

    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let console = ConsoleInput::new(command_tx);
    let app = App::new(controller, command_rx, shutdown_tx);

    tokio::join!(
        async {
            if let Err(e) = console.run(shutdown_rx).await {
                error!(error = ?e, "Console input error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );

    // The stdin reader may still be parked in a blocking read.
    std::process::exit(0);
}

#[cfg(feature = "gstreamer")]
fn capture_device(config: &Config) -> clip_recorder_core::GstCaptureDevice {
    clip_recorder_core::GstCaptureDevice::new(clip_recorder_core::GstCaptureConfig {
        video_source: config.capture.video_source.clone(),
        audio_source: config.capture.audio_source.clone(),
    })
}

#[cfg(not(feature = "gstreamer"))]
fn capture_device(_config: &Config) -> clip_recorder_core::UnavailableDevice {
    clip_recorder_core::UnavailableDevice
}
