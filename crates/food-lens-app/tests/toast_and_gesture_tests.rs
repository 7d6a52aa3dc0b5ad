//! Integration tests for toast lifetime and the gesture toggle.

mod common;

use common::{harness, text_upload};
use food_lens_capture::SyntheticCamera;
use food_lens_ui::{GestureStatus, TOAST_LIFETIME_MS, ToastKind};

#[tokio::test]
async fn toast_and_gesture_tests_toasts_expire_after_lifetime() {
    let mut h = harness(SyntheticCamera::new());
    h.controller.handle_file_upload(text_upload()).await;
    assert_eq!(h.controller.ui().toasts.visible().len(), 1);

    h.clock.advance(TOAST_LIFETIME_MS - 1);
    h.controller.expire_toasts();
    assert_eq!(h.controller.ui().toasts.visible().len(), 1);

    h.clock.advance(1);
    h.controller.expire_toasts();
    assert!(h.controller.ui().toasts.visible().is_empty());
}

#[test]
fn toast_and_gesture_tests_toggle_updates_status() {
    let mut h = harness(SyntheticCamera::new());
    assert_eq!(h.controller.ui().gesture, GestureStatus::Disabled);

    h.controller.toggle_gesture_recognition(true);
    assert_eq!(h.controller.ui().gesture, GestureStatus::Enabled);
    assert!(h.controller.ui().toasts.contains_kind(ToastKind::Success));

    h.controller.toggle_gesture_recognition(false);
    assert_eq!(h.controller.ui().gesture, GestureStatus::Disabled);
    let toast = h.controller.ui().toasts.latest().expect("toast expected");
    assert_eq!(toast.kind, ToastKind::Info);
}
