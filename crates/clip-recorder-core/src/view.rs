//! Presentation state derived from the recording controller.
//!
//! Every controller transition updates [`ViewState`]; front ends only read it.

use std::fmt;

/// Shown when the camera/microphone cannot be acquired.
pub const DEVICE_ERROR_MESSAGE: &str = "Error accessing camera and microphone.";
/// Shown after a 2xx upload response.
pub const UPLOAD_SUCCESS_MESSAGE: &str = "Video uploaded successfully!";
/// Shown after a non-2xx upload response.
pub const UPLOAD_REJECTED_MESSAGE: &str = "Upload failed. Please try again.";
/// Shown when the upload request never got a response.
pub const UPLOAD_ERROR_MESSAGE: &str = "An error occurred during upload.";
/// Status text once the countdown reaches zero.
pub const COMPLETED_LABEL: &str = "Recording Completed";

/// Controller phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Ready to start a recording.
    Idle,
    /// Device stream live and countdown running.
    Recording,
    /// Stopped; waiting for the encoder to flush the last fragment.
    Finalizing,
    /// A finalized clip is available for preview and upload.
    Reviewing,
}

/// Remaining-time display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeLeft {
    /// Seconds still to record.
    Seconds(u32),
    /// Countdown ran out.
    Completed,
}

impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeLeft::Seconds(n) => write!(f, "{}", n),
            TimeLeft::Completed => f.write_str(COMPLETED_LABEL),
        }
    }
}

/// A status message awaiting acknowledgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Whether the popup is currently shown.
    pub visible: bool,
    /// Message text.
    pub message: String,
}

/// What the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Current controller phase.
    pub phase: Phase,
    /// Placeholder image shown before the first recording and after re-record.
    pub show_thumbnail: bool,
    /// Countdown or completion label.
    pub time_left: TimeLeft,
    /// Configured clip length, for headings.
    pub duration_seconds: u32,
    /// Latest status message, if any was ever shown.
    pub popup: Option<Popup>,
}

impl ViewState {
    /// Initial idle view.
    pub fn new(duration_seconds: u32) -> Self {
        Self {
            phase: Phase::Idle,
            show_thumbnail: true,
            time_left: TimeLeft::Seconds(duration_seconds),
            duration_seconds,
            popup: None,
        }
    }

    /// Show `message`, replacing whatever was displayed before.
    pub fn show_popup(&mut self, message: impl Into<String>) {
        self.popup = Some(Popup {
            visible: true,
            message: message.into(),
        });
    }

    /// Hide the popup after the user acknowledges it.
    pub fn dismiss_popup(&mut self) {
        if let Some(popup) = self.popup.as_mut() {
            popup.visible = false;
        }
    }

    /// Text of the visible popup, if one is showing.
    pub fn visible_popup(&self) -> Option<&str> {
        self.popup
            .as_ref()
            .filter(|p| p.visible)
            .map(|p| p.message.as_str())
    }

    /// Start is offered only when idle.
    pub fn can_start(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Manual stop is offered while recording.
    pub fn can_stop(&self) -> bool {
        self.phase == Phase::Recording
    }

    /// Upload and re-record are offered while reviewing.
    pub fn can_review(&self) -> bool {
        self.phase == Phase::Reviewing
    }
}
