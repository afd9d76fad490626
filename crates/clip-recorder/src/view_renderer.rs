use clip_recorder_core::{Phase, ViewState};

use std::fmt::Write;

/// Render the recorder view as terminal text.
pub fn render(view: &ViewState) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Record a {}-Second Video", view.duration_seconds);
    let _ = writeln!(out, "  {}", view.time_left);

    let screen = match view.phase {
        Phase::Idle if view.show_thumbnail => "[thumbnail]",
        Phase::Idle => "[camera off]",
        Phase::Recording => "[● live camera]",
        Phase::Finalizing => "[finishing clip...]",
        Phase::Reviewing => "[recorded clip ready]",
    };
    let _ = writeln!(out, "  {}", screen);

    let mut actions = Vec::new();
    if view.can_start() {
        actions.push("start");
    }
    if view.can_stop() {
        actions.push("stop");
    }
    if view.can_review() {
        actions.push("upload");
        actions.push("rerecord");
    }
    if !actions.is_empty() {
        let _ = writeln!(out, "  actions: {}", actions.join(" | "));
    }

    if let Some(message) = view.visible_popup() {
        let _ = writeln!(out, "  >> {} [ok]", message);
    }

    out
}
