//! Integration tests for bounded, newest-first history.

mod common;

use common::{harness, image_upload};
use food_lens_capture::SyntheticCamera;
use food_lens_core::HISTORY_CAPACITY;

#[tokio::test]
async fn history_bound_tests_keeps_ten_newest_entries() {
    let mut h = harness(SyntheticCamera::new());

    for _ in 0..11 {
        h.clock.advance(1_000);
        h.controller.analyze_food(image_upload()).await;
    }

    assert_eq!(h.analyzer.calls(), 11);
    let history = h.controller.history();
    assert_eq!(history.len(), HISTORY_CAPACITY);

    let calories: Vec<f64> = history.iter().map(|entry| entry.calories).collect();
    let expected: Vec<f64> = (2..=11).rev().map(|call| call as f64 * 100.0).collect();
    assert_eq!(calories, expected);

    let rendered = &h.controller.ui().history;
    assert_eq!(rendered.len(), HISTORY_CAPACITY);
    assert_eq!(rendered[0].calories, "1100 kcal");
    assert_eq!(rendered[9].calories, "200 kcal");
}

#[tokio::test]
async fn history_bound_tests_stamps_entries_with_clock_time() {
    let mut h = harness(SyntheticCamera::new());

    h.controller.analyze_food(image_upload()).await;
    h.clock.advance(60_000);
    h.controller.analyze_food(image_upload()).await;

    let stamps: Vec<i64> = h
        .controller
        .history()
        .iter()
        .map(|entry| entry.recorded_at.unix_timestamp())
        .collect();
    assert_eq!(stamps, vec![1_700_000_060, 1_700_000_000]);
}
