use crate::{AppCommand, AppResult, view_renderer};

use std::io::Write;

use clip_recorder_core::{CaptureDevice, RecordingController, ViewState};
use tokio::sync::{mpsc, watch};
use tracing::{error, info, instrument};

/// Main application state.
///
/// Owns the recording controller and is the only place that mutates it:
/// console commands and controller events are handled one at a time on the
/// same task.
pub struct App<D: CaptureDevice> {
    pub(crate) controller: RecordingController<D>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) last_rendered: Option<ViewState>,
}

impl<D: CaptureDevice> App<D> {
    /// Create an app driving `controller` from `command_rx`.
    pub fn new(
        controller: RecordingController<D>,
        command_rx: mpsc::Receiver<AppCommand>,
        shutdown_tx: watch::Sender<bool>,
    ) -> Self {
        Self {
            controller,
            command_rx,
            shutdown_tx,
            last_rendered: None,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("Clip-Recorder starting");
        self.render()?;

        loop {
            tokio::select! {
                Some(event) = self.controller.next_event() => {
                    self.controller.handle_event(event);
                }

                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd).await? {
                        break;
                    }
                }

                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }

            self.render()?;
        }

        self.controller.teardown();
        let _ = self.shutdown_tx.send(true);
        info!("Clip-Recorder shut down successfully");

        Ok(())
    }

    /// Apply one console command to the controller.
    ///
    /// Returns `false` when the loop should exit.
    #[instrument(skip(self))]
    pub(crate) async fn handle_command(&mut self, cmd: AppCommand) -> AppResult<bool> {
        match cmd {
            AppCommand::Start => {
                // Device failures are already shown as a popup.
                if let Err(e) = self.controller.start().await {
                    error!(error = ?e, "Failed to start recording");
                }
            }
            AppCommand::Stop => {
                self.controller.stop();
            }
            AppCommand::Upload => {
                self.controller.upload();
            }
            AppCommand::ReRecord => {
                self.controller.re_record();
            }
            AppCommand::DismissPopup => self.controller.dismiss_popup(),
            AppCommand::Help => {
                let mut stdout = std::io::stdout().lock();
                writeln!(stdout, "{}", AppCommand::USAGE)?;
            }
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                self.controller.teardown();
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Print the view if it changed since the last render.
    fn render(&mut self) -> AppResult<()> {
        let view = self.controller.view();
        if self.last_rendered.as_ref() == Some(view) {
            return Ok(());
        }

        let mut stdout = std::io::stdout().lock();
        write!(stdout, "\n{}", view_renderer::render(view))?;
        stdout.flush()?;

        self.last_rendered = Some(view.clone());

        Ok(())
    }
}
