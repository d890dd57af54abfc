use super::*;
use crate::offset::OFFSET_BIAS;
use std::cell::Cell;

fn armed_state(raw_peak: f32) -> RefreshState {
    let state = RefreshState::new();
    state.on_offset_sample(raw_peak);
    state.on_release();
    state
}

#[test]
fn progress_follows_the_clamped_formula_while_unarmed() {
    let state = RefreshState::new();
    for raw in [0.0, 59.0, 89.0, 134.0, 209.0, 350.0] {
        state.on_offset_sample(raw);
        let snapshot = state.snapshot();
        let expected = ((raw - OFFSET_BIAS) / ARM_THRESHOLD).clamp(0.0, 1.0);
        assert_eq!(snapshot.progress, expected, "raw={raw}");
        assert_eq!(snapshot.scroll_offset, raw - OFFSET_BIAS, "raw={raw}");
        assert_eq!(snapshot.content_offset, raw - OFFSET_BIAS, "raw={raw}");
    }
}

#[test]
fn samples_alone_never_arm() {
    let state = RefreshState::new();
    state.on_offset_sample(500.0);
    let snapshot = state.snapshot();
    assert!(!snapshot.armed);
    assert!(!snapshot.refreshing);
}

#[test]
fn release_past_threshold_arms_release_below_does_not() {
    let below = RefreshState::new();
    below.on_offset_sample(OFFSET_BIAS + 100.0);
    below.on_release();
    assert!(!below.snapshot().armed);

    let above = armed_state(OFFSET_BIAS + 200.0);
    assert!(above.snapshot().armed);
}

#[test]
fn arming_pins_the_pull_signal_but_not_content_offset() {
    let state = armed_state(OFFSET_BIAS + 200.0);
    let pinned = state.snapshot();
    assert_eq!(pinned.progress, 1.0);
    assert_eq!(pinned.scroll_offset, 200.0);

    state.on_offset_sample(OFFSET_BIAS + 20.0);
    let after = state.snapshot();
    assert_eq!(after.progress, pinned.progress);
    assert_eq!(after.scroll_offset, pinned.scroll_offset);
    assert_eq!(after.content_offset, 20.0);
}

#[test]
fn progress_relaxes_with_the_offset_after_an_uncommitted_pull() {
    let state = RefreshState::new();
    state.on_offset_sample(OFFSET_BIAS + 100.0);
    state.on_release();
    assert!(!state.snapshot().armed);

    let mut last = state.snapshot().progress;
    for raw in [OFFSET_BIAS + 60.0, OFFSET_BIAS + 20.0, OFFSET_BIAS] {
        state.on_offset_sample(raw);
        let progress = state.snapshot().progress;
        assert!(progress < last, "progress should relax, raw={raw}");
        last = progress;
    }
    assert_eq!(last, 0.0);
}

#[test]
fn the_sample_after_arming_commits_the_refresh_once() {
    let state = armed_state(OFFSET_BIAS + 200.0);
    let impacts = std::rc::Rc::new(Cell::new(0));
    let counter = std::rc::Rc::clone(&impacts);
    state.set_impact_hook(move || counter.set(counter.get() + 1));

    assert!(!state.snapshot().refreshing, "arming alone must not commit");
    state.on_offset_sample(OFFSET_BIAS + 200.0);
    assert!(state.snapshot().refreshing);
    assert_eq!(impacts.get(), 1);

    // Further samples keep the latch and the hook quiet.
    state.on_offset_sample(OFFSET_BIAS + 190.0);
    state.on_offset_sample(OFFSET_BIAS + 180.0);
    assert!(state.snapshot().refreshing);
    assert_eq!(impacts.get(), 1);
}

#[test]
fn release_while_refreshing_is_ignored() {
    let state = armed_state(OFFSET_BIAS + 200.0);
    state.on_offset_sample(OFFSET_BIAS + 200.0);

    let notifications = std::rc::Rc::new(Cell::new(0));
    let counter = std::rc::Rc::clone(&notifications);
    let _watch = state.subscribe(move || counter.set(counter.get() + 1));

    state.on_release();
    assert_eq!(notifications.get(), 0, "ignored release must not touch the record");
    assert!(state.snapshot().armed);
    assert!(state.snapshot().refreshing);
}

#[test]
fn watchers_fire_on_change_and_stay_quiet_on_identical_samples() {
    let state = RefreshState::new();
    let notifications = std::rc::Rc::new(Cell::new(0));
    let counter = std::rc::Rc::clone(&notifications);
    let watch = state.subscribe(move || counter.set(counter.get() + 1));

    state.on_offset_sample(OFFSET_BIAS + 80.0);
    assert_eq!(notifications.get(), 1);
    state.on_offset_sample(OFFSET_BIAS + 80.0);
    assert_eq!(notifications.get(), 1, "no-op sample must not notify");
    state.on_offset_sample(OFFSET_BIAS + 81.0);
    assert_eq!(notifications.get(), 2);

    drop(watch);
    state.on_offset_sample(OFFSET_BIAS + 120.0);
    assert_eq!(notifications.get(), 2);
}
