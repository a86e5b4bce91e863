//! End-to-end tap scenarios on the simulated event loop.
//!
//! Run:
//!   cargo test -p tap-harness --test tap_scenarios

use tap_core::{TapConfig, TapDevice, TapState, TouchFrame, TouchSlot};
use tap_harness::{RecordingSink, SimTimerFacility, TapHarness};

fn harness() -> TapHarness {
    TapHarness::new(TapConfig::default()).expect("default config is valid")
}

/// Leave the harness in `Tapped` after a single tap at 0..50.
fn tapped() -> TapHarness {
    let mut h = harness();
    h.begin(0).commit(0);
    h.end(0).commit(50);
    assert_eq!(h.state(), TapState::Tapped);
    h
}

// --- Core gestures ---

#[test]
fn single_tap_releases_on_timeout() {
    let mut h = harness();
    assert_eq!(h.begin(0).commit(0), TapState::Touch);
    assert_eq!(h.end(0).commit(50), TapState::Tapped);
    assert_eq!(h.device().deadline(), Some(230));

    assert_eq!(h.advance_to(229), TapState::Tapped);
    assert_eq!(h.advance_to(230), TapState::Idle);
    assert_eq!(h.transcript(), vec!["50 left down", "230 left up"]);
    assert_eq!(h.device().deadline(), None);
}

#[test]
fn two_finger_tap_in_one_frame() {
    let mut h = harness();
    assert_eq!(h.begin(0).begin(1).commit(0), TapState::Touch2);
    assert_eq!(h.end(1).commit(60), TapState::Hold);
    assert_eq!(h.transcript(), vec!["60 right down", "60 right up"]);
    assert_eq!(h.device().deadline(), None);
    assert_eq!(h.timer().armed(), None);

    assert_eq!(h.end(0).commit(90), TapState::Idle);
    assert_eq!(h.records().len(), 2);
}

#[test]
fn double_tap_is_click_sequence() {
    let mut h = tapped();
    assert_eq!(h.begin(0).commit(100), TapState::DraggingOrDoubleTap);
    assert_eq!(h.device().deadline(), None);
    assert_eq!(h.end(0).commit(120), TapState::Idle);
    assert_eq!(
        h.transcript(),
        vec!["50 left down", "120 left up", "120 left down", "120 left up"]
    );
}

#[test]
fn button_mid_gesture_kills_until_all_fingers_up() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.begin(1).press_button().commit(5), TapState::Dead);
    assert_eq!(h.device().deadline(), None);

    assert_eq!(h.end(0).commit(20), TapState::Dead);
    assert_eq!(h.end(1).commit(40), TapState::Idle);
    assert!(h.records().is_empty());
}

#[test]
fn motion_turns_touch_into_hold() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.move_by(0, 40.0, 0.0).commit(10), TapState::Hold);
    assert_eq!(h.device().deadline(), None);
    assert_eq!(h.end(0).commit(50), TapState::Idle);
    assert!(h.records().is_empty());
}

// --- Taps ---

#[test]
fn small_motion_still_taps() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.move_by(0, 10.0, 10.0).commit(10), TapState::Touch);
    assert_eq!(h.end(0).commit(40), TapState::Tapped);
}

#[test]
fn long_touch_is_hold() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.advance_to(180), TapState::Hold);
    assert_eq!(h.end(0).commit(300), TapState::Idle);
    assert!(h.records().is_empty());
}

#[test]
fn three_finger_tap_clicks_middle() {
    let mut h = harness();
    assert_eq!(h.begin(0).begin(1).begin(2).commit(0), TapState::Touch3);
    assert_eq!(h.end(2).commit(40), TapState::Touch2Hold);
    assert_eq!(h.transcript(), vec!["40 middle down", "40 middle up"]);

    // The three-finger deadline is still pending and expires harmlessly.
    assert_eq!(h.advance_to(200), TapState::Touch2Hold);
    assert_eq!(h.end(0).end(1).commit(250), TapState::Idle);
    assert_eq!(h.records().len(), 2);
}

#[test]
fn second_finger_rearms_timer() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.device().deadline(), Some(180));
    assert_eq!(h.begin(1).commit(100), TapState::Touch2);
    assert_eq!(h.device().deadline(), Some(280));

    assert_eq!(h.advance_to(250), TapState::Touch2);
    assert_eq!(h.advance_to(280), TapState::Touch2Hold);
    assert_eq!(h.lift_all(300), TapState::Idle);
    assert!(h.records().is_empty());
}

#[test]
fn two_finger_tap_while_resting_finger_held() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.advance_to(200), TapState::Hold);
    assert_eq!(h.begin(1).commit(300), TapState::Touch2);
    assert_eq!(h.end(1).commit(350), TapState::Hold);
    assert_eq!(h.transcript(), vec!["350 right down", "350 right up"]);
}

#[test]
fn fourth_finger_goes_dead() {
    let mut h = harness();
    assert_eq!(h.begin(0).begin(1).begin(2).begin(3).commit(0), TapState::Dead);
    assert_eq!(h.device().deadline(), None);
    assert_eq!(h.timer().armed(), None);
    assert_eq!(h.lift_all(50), TapState::Idle);
    assert!(h.records().is_empty());
}

// --- Drag lock ---

#[test]
fn tap_then_move_drags_until_wait_expires() {
    let mut h = tapped();
    h.begin(0).commit(100);
    assert_eq!(h.move_by(0, 50.0, 0.0).commit(120), TapState::Dragging);
    assert_eq!(h.end(0).commit(200), TapState::DraggingWait);
    assert_eq!(h.device().deadline(), Some(380));

    // Finger returns inside the window: still dragging.
    assert_eq!(h.begin(0).commit(300), TapState::Dragging);
    assert_eq!(h.device().deadline(), None);

    assert_eq!(h.end(0).commit(400), TapState::DraggingWait);
    assert_eq!(h.advance_to(600), TapState::Idle);
    assert_eq!(h.transcript(), vec!["50 left down", "580 left up"]);
}

#[test]
fn second_finger_during_drag() {
    let mut h = tapped();
    h.begin(0).commit(100);
    assert_eq!(h.begin(1).commit(110), TapState::Dragging2);
    assert_eq!(h.end(1).commit(130), TapState::Dragging);
    assert_eq!(h.transcript(), vec!["50 left down"]);
}

#[test]
fn third_finger_during_drag_releases_and_dies() {
    let mut h = tapped();
    h.begin(0).commit(100);
    h.begin(1).commit(110);
    assert_eq!(h.begin(2).commit(120), TapState::Dead);
    assert_eq!(h.transcript(), vec!["50 left down", "120 left up"]);
    assert_eq!(h.lift_all(200), TapState::Idle);
    assert!(h.sink().is_balanced());
}

#[test]
fn button_while_tapped_releases() {
    let mut h = tapped();
    assert_eq!(h.begin(0).press_button().commit(100), TapState::Dead);
    assert_eq!(h.transcript(), vec!["50 left down", "100 left up"]);
    assert_eq!(h.end(0).commit(150), TapState::Idle);
}

#[test]
fn button_while_dragging_releases() {
    let mut h = tapped();
    h.begin(0).commit(100);
    h.move_by(0, 0.0, 60.0).commit(120);
    assert_eq!(h.press_button().commit(150), TapState::Dead);
    assert_eq!(h.transcript(), vec!["50 left down", "150 left up"]);
    assert_eq!(h.end(0).commit(200), TapState::Idle);
}

// --- Timer plumbing ---

#[test]
fn spurious_wakeup_does_not_time_out() {
    let mut h = tapped();
    assert_eq!(h.spurious_wakeup(100), Some(230));
    assert_eq!(h.state(), TapState::Tapped);
    assert_eq!(h.records().len(), 1);
}

#[test]
fn late_wakeup_uses_its_own_timestamp() {
    let mut h = tapped();
    // Host missed the deadline and woke at 300; the release carries 300.
    assert_eq!(h.spurious_wakeup(300), None);
    assert_eq!(h.state(), TapState::Idle);
    assert_eq!(h.transcript(), vec!["50 left down", "300 left up"]);
    assert_eq!(h.timer().armed(), None);
    assert_eq!(h.device().deadline(), None);
}

#[test]
fn host_timer_tracks_deadline() {
    let mut h = harness();
    h.begin(0).commit(0);
    assert_eq!(h.timer().armed(), Some(180));
    h.move_by(0, 100.0, 0.0).commit(10);
    assert_eq!(h.timer().armed(), None);
    assert_eq!(h.timer().cancels(), 1);
}

#[test]
fn dropping_device_cancels_host_timer() {
    let mut facility = SimTimerFacility::new();
    let handle = facility.handle();
    let mut device =
        TapDevice::initialize(TapConfig::default(), &mut facility, RecordingSink::default())
            .unwrap();
    device.process_frame(&TouchFrame::new(&[TouchSlot::begin()], 1), 0);
    assert_eq!(handle.armed(), Some(180));

    drop(device);
    assert_eq!(handle.armed(), None);
    assert_eq!(handle.cancels(), 1);
}

#[test]
fn failing_timer_facility_fails_initialization() {
    let err = TapDevice::initialize(
        TapConfig::default(),
        &mut SimTimerFacility::failing(),
        RecordingSink::default(),
    )
    .unwrap_err();
    assert!(err.is_setup_failure());
}

// --- Enable toggle ---

#[test]
fn disabled_device_ignores_everything() {
    let mut h = TapHarness::new(TapConfig::disabled()).unwrap();
    h.begin(0).commit(0);
    h.end(0).commit(50);
    h.advance_to(500);
    assert_eq!(h.state(), TapState::Idle);
    assert!(h.records().is_empty());
    assert_eq!(h.timer().arms(), 0);
}

#[test]
fn timeout_missed_while_disabled_fires_after_reenable() {
    let mut h = tapped();
    h.set_enabled(false);
    assert_eq!(h.timer().armed(), None);
    assert_eq!(h.advance_to(300), TapState::Tapped);

    h.set_enabled(true);
    assert_eq!(h.timer().armed(), Some(230));
    assert_eq!(h.advance_to(5_000), TapState::Idle);
    assert_eq!(h.transcript(), vec!["50 left down", "300 left up"]);
    assert!(h.sink().is_balanced());

    // A later touch is a fresh tap, not a drag.
    assert_eq!(h.begin(0).commit(5_000), TapState::Touch);
}

#[test]
fn wakeup_while_disabled_keeps_deadline() {
    let mut h = tapped();
    h.set_enabled(false);
    assert_eq!(h.spurious_wakeup(400), None);
    assert_eq!(h.state(), TapState::Tapped);
    assert_eq!(h.device().deadline(), Some(230));

    h.set_enabled(true);
    assert_eq!(h.advance_to(400), TapState::Idle);
    assert_eq!(h.transcript(), vec!["50 left down", "400 left up"]);
}

#[test]
fn reenabling_before_deadline_keeps_original_timing() {
    let mut h = tapped();
    h.set_enabled(false);
    h.set_enabled(true);
    assert_eq!(h.advance_to(229), TapState::Tapped);
    assert_eq!(h.advance_to(230), TapState::Idle);
    assert_eq!(h.transcript(), vec!["50 left down", "230 left up"]);
}

#[test]
fn independent_devices_do_not_share_state() {
    let mut a = harness();
    let mut b = harness();
    a.begin(0).commit(0);
    a.end(0).commit(50);
    b.begin(0).begin(1).commit(0);
    assert_eq!(a.state(), TapState::Tapped);
    assert_eq!(b.state(), TapState::Touch2);
    assert_eq!(a.device().deadline(), Some(230));
    assert_eq!(b.device().deadline(), Some(180));
}
