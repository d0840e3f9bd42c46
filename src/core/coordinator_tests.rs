// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use crate::core::clock::ManualClock;
use crate::core::config::{ActivityConfig, ActivityOverrides};
use crate::core::coordinator::{ActivityCoordinator, ActivitySnapshot};
use crate::core::detector::ActivityDetection;
use crate::core::events::{ActivityKind, ActivityState};
use crate::core::input::InputBus;

fn coordinator() -> (Arc<ManualClock>, Arc<InputBus>, ActivityCoordinator) {
    let clock = Arc::new(ManualClock::new(1_000_000));
    let bus = Arc::new(InputBus::new());
    let cfg = ActivityConfig::from_overrides(&ActivityOverrides {
        warning_time_ms: Some(10_000),
        final_warning_time_ms: Some(5_000),
        reset_time_ms: Some(30_000),
        ..Default::default()
    })
    .unwrap();
    let det = ActivityDetection::new(cfg, clock.clone(), bus.clone());
    (clock, bus, ActivityCoordinator::new(det))
}

fn snap(state: ActivityState, remaining: u64, total: u64) -> ActivitySnapshot {
    ActivitySnapshot {
        activity_state: state,
        time_remaining_ms: remaining,
        total_timeout_ms: total,
    }
}

#[test]
fn starts_active_with_full_timeout() {
    let (_clock, _bus, c) = coordinator();
    assert_eq!(c.snapshot(), snap(ActivityState::Active, 30_000, 30_000));
    assert!(!c.is_paused());
    assert!(!c.detector().is_subscribed());
}

#[test]
fn poll_follows_detector() {
    let (clock, _bus, mut c) = coordinator();
    c.enable_tracking();
    assert!(c.detector().is_subscribed());

    clock.advance(12_000);
    // cache only moves on poll
    assert_eq!(c.activity_state(), ActivityState::Active);
    assert_eq!(c.poll(), snap(ActivityState::Warning, 18_000, 30_000));

    clock.advance(15_000);
    assert_eq!(c.poll().activity_state, ActivityState::FinalWarning);

    clock.advance(5_000);
    assert_eq!(c.poll(), snap(ActivityState::Inactive, 0, 30_000));
}

#[test]
fn input_through_bus_resets_countdown() {
    let (clock, bus, mut c) = coordinator();
    c.enable_tracking();

    clock.advance(12_000);
    assert_eq!(c.poll().activity_state, ActivityState::Warning);

    bus.emit(ActivityKind::TouchStart);
    assert_eq!(c.poll(), snap(ActivityState::Active, 30_000, 30_000));
}

#[test]
fn pause_freezes_reported_values() {
    let (clock, _bus, mut c) = coordinator();
    c.enable_tracking();

    clock.advance(5_000);
    c.poll();
    c.pause_tracking();
    c.pause_tracking();
    assert!(c.is_paused());

    clock.advance(31_000);
    assert_eq!(c.poll(), snap(ActivityState::Active, 25_000, 30_000));

    c.resume_tracking();
    assert!(!c.is_paused());
    assert_eq!(c.snapshot(), snap(ActivityState::Active, 30_000, 30_000));
    assert_eq!(c.poll(), snap(ActivityState::Active, 30_000, 30_000));
}

#[test]
fn reset_timer_updates_cache_immediately() {
    let (clock, _bus, mut c) = coordinator();
    c.enable_tracking();

    clock.advance(27_000);
    assert_eq!(c.poll().activity_state, ActivityState::FinalWarning);

    c.reset_timer();
    assert_eq!(c.activity_state(), ActivityState::Active);
    assert_eq!(c.time_remaining_ms(), 30_000);
}

#[test]
fn disable_forces_active_and_clears_pause() {
    let (clock, bus, mut c) = coordinator();
    c.enable_tracking();

    clock.advance(31_000);
    assert_eq!(c.poll().activity_state, ActivityState::Inactive);
    c.pause_tracking();

    c.disable_tracking();
    assert_eq!(c.activity_state(), ActivityState::Active);
    assert!(!c.is_paused());
    assert_eq!(bus.listener_count(), 0);

    clock.advance(100_000);
    assert_eq!(c.poll(), snap(ActivityState::Active, 30_000, 30_000));
}

#[test]
fn total_timeout_tracks_audio() {
    let (_clock, _bus, mut c) = coordinator();

    c.set_audio_playing(true);
    assert_eq!(c.total_timeout_ms(), 90_000);
    assert_eq!(c.snapshot().total_timeout_ms, 90_000);

    c.set_audio_playing(false);
    assert_eq!(c.total_timeout_ms(), 30_000);
}

#[test]
fn reconfigure_rejects_and_keeps_old_values() {
    let (_clock, _bus, mut c) = coordinator();

    let bad = ActivityOverrides {
        audio_playback_multiplier: Some(0.0),
        ..Default::default()
    };
    assert!(c.reconfigure(&bad).is_err());
    assert_eq!(c.total_timeout_ms(), 30_000);

    let longer = ActivityOverrides {
        reset_time_ms: Some(120_000),
        ..Default::default()
    };
    c.reconfigure(&longer).unwrap();
    assert_eq!(c.total_timeout_ms(), 120_000);
}

#[test]
fn shutdown_detaches_listeners() {
    let (_clock, bus, mut c) = coordinator();
    c.enable_tracking();
    assert_eq!(bus.listener_count(), 7);

    c.shutdown();
    assert_eq!(bus.listener_count(), 0);
}
