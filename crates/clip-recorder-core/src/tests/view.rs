use crate::{COMPLETED_LABEL, Phase, TimeLeft, ViewState};

/// WHAT: Initial view is idle with thumbnail and full countdown
/// WHY: Start is the only action before the first recording
#[test]
fn given_new_view_when_inspecting_then_idle_with_thumbnail() {
    let view = ViewState::new(5);

    assert_eq!(view.phase, Phase::Idle);
    assert!(view.show_thumbnail);
    assert_eq!(view.time_left, TimeLeft::Seconds(5));
    assert!(view.can_start());
    assert!(!view.can_stop());
    assert!(!view.can_review());
    assert_eq!(view.visible_popup(), None);
}

/// WHAT: A new popup message replaces the visible one
/// WHY: At most one message is shown, no queueing
#[test]
fn given_visible_popup_when_showing_another_then_replaced() {
    // Given: A popup already showing
    let mut view = ViewState::new(5);
    view.show_popup("first");

    // When: Showing a second message
    view.show_popup("second");

    // Then: Only the latest is visible
    assert_eq!(view.visible_popup(), Some("second"));
}

/// WHAT: Dismissing hides the popup
/// WHY: Popups go away only on explicit acknowledgment
#[test]
fn given_visible_popup_when_dismissed_then_hidden() {
    let mut view = ViewState::new(5);
    view.show_popup("hello");

    view.dismiss_popup();

    assert_eq!(view.visible_popup(), None);
    assert!(view.popup.as_ref().is_some_and(|p| !p.visible));
}

/// WHAT: Time-left renders as the number or the completion label
/// WHY: The status line shows "Recording Completed" at zero
#[test]
fn given_time_left_when_displayed_then_number_or_label() {
    assert_eq!(TimeLeft::Seconds(3).to_string(), "3");
    assert_eq!(TimeLeft::Completed.to_string(), COMPLETED_LABEL);
}
