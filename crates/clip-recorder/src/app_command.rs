use crate::AppError;

use std::{panic::Location, str::FromStr};

use error_location::ErrorLocation;

/// Commands sent from the console to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Acquire the camera and start a recording.
    Start,
    /// Stop the running recording early.
    Stop,
    /// Upload the reviewed clip.
    Upload,
    /// Discard the reviewed clip.
    ReRecord,
    /// Acknowledge the popup.
    DismissPopup,
    /// Print the command list.
    Help,
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// One line per command, as shown by `help`.
    pub const USAGE: &'static str = "\
start     start a recording
stop      stop the recording early
upload    upload the recorded clip
rerecord  discard the clip and record again
ok        dismiss the message
help      show this list
quit      exit";
}

impl FromStr for AppCommand {
    type Err = AppError;

    #[track_caller]
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let command = match input.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => AppCommand::Start,
            "stop" => AppCommand::Stop,
            "upload" | "u" => AppCommand::Upload,
            "rerecord" | "re-record" | "r" => AppCommand::ReRecord,
            "ok" | "dismiss" => AppCommand::DismissPopup,
            "help" | "?" => AppCommand::Help,
            "quit" | "exit" | "q" => AppCommand::Shutdown,
            _ => {
                return Err(AppError::UnknownCommand {
                    input: input.trim().to_string(),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
        };

        Ok(command)
    }
}
