//! Console command reader.
//!
//! Reads one command per line from stdin and forwards it to the main
//! application over an async channel.

use crate::{AppCommand, AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::{mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

/// Line-oriented command source.
pub struct ConsoleInput {
    command_tx: mpsc::Sender<AppCommand>,
}

impl ConsoleInput {
    /// Create a reader forwarding commands to `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Read commands from stdin until EOF or shutdown.
    pub async fn run(&self, shutdown_rx: watch::Receiver<bool>) -> AppResult<()> {
        self.run_with(BufReader::new(tokio::io::stdin()), shutdown_rx)
            .await
    }

    /// Read commands from `reader` until EOF or shutdown.
    ///
    /// EOF is treated as a quit request so piping a script in terminates.
    #[instrument(skip(self, reader, shutdown_rx))]
    pub async fn run_with<R>(&self, reader: R, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Console input shutting down");
                    break;
                }
                line = lines.next_line() => {
                    match line? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => match line.parse::<AppCommand>() {
                            Ok(command) => self.send(command).await?,
                            Err(e) => {
                                warn!(error = ?e, "Ignoring console input");
                                self.send(AppCommand::Help).await?;
                            }
                        },
                        None => {
                            debug!("Console input closed");
                            self.send(AppCommand::Shutdown).await?;
                            break;
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn send(&self, command: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", command, e),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}
