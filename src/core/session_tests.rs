// Author: Dustin Pilgrim
// License: MIT

use std::sync::Arc;

use crate::core::catalog::{AvailabilityReport, Catalog, DEFAULT_COVER_IMAGE, Track};
use crate::core::clock::ManualClock;
use crate::core::config::{ActivityConfig, ActivityOverrides};
use crate::core::coordinator::ActivityCoordinator;
use crate::core::detector::ActivityDetection;
use crate::core::error::SessionError;
use crate::core::events::{ActivityKind, ActivityState};
use crate::core::input::InputBus;
use crate::core::session::{KioskSession, Screen, TickOutcome};

struct Harness {
    clock: Arc<ManualClock>,
    bus: Arc<InputBus>,
    session: KioskSession,
}

fn track(id: u32, released: &str) -> Track {
    Track {
        id,
        title: format!("recording {id}"),
        work: String::new(),
        composer: String::new(),
        catalog_number: String::new(),
        performers: String::new(),
        released: released.to_string(),
        conductor: String::new(),
        file: format!("/audio/{id:02}.mp3"),
        cover_image: DEFAULT_COVER_IMAGE.to_string(),
        duration_secs: 200,
    }
}

fn harness() -> Harness {
    let clock = Arc::new(ManualClock::new(5_000_000));
    let bus = Arc::new(InputBus::new());
    let cfg = ActivityConfig::from_overrides(&ActivityOverrides {
        warning_time_ms: Some(10_000),
        final_warning_time_ms: Some(5_000),
        reset_time_ms: Some(30_000),
        ..Default::default()
    })
    .unwrap();
    let det = ActivityDetection::new(cfg, clock.clone(), bus.clone());
    let catalog = Catalog::from_tracks(vec![track(1, "1955"), track(2, "1958"), track(3, "1961")]);

    Harness {
        clock,
        bus,
        session: KioskSession::new(ActivityCoordinator::new(det), catalog),
    }
}

fn report() -> AvailabilityReport {
    AvailabilityReport {
        available: vec![1, 2],
        unavailable: vec![3],
        ..Default::default()
    }
}

/// Harness past loading, sitting on the start screen.
fn on_start() -> Harness {
    let mut h = harness();
    h.session.loading_complete(report());
    h.session.close_loading().unwrap();
    h
}

/// Harness already past loading and showing the player.
fn on_player() -> Harness {
    let mut h = on_start();
    assert!(h.session.enter_player());
    h
}

#[test]
fn starts_loading_with_tracking_off() {
    let h = harness();
    assert_eq!(h.session.screen(), Screen::Loading);
    assert!(!h.session.coordinator().detector().is_enabled());
    assert_eq!(h.bus.listener_count(), 0);
}

#[test]
fn loading_waits_for_scan_and_close() {
    let mut h = harness();
    assert_eq!(h.session.close_loading(), Err(SessionError::ScanPending));
    assert_eq!(h.session.screen(), Screen::Loading);

    assert!(h.session.loading_complete(report()));
    assert_eq!(h.session.screen(), Screen::Loading);
    assert!(!h.session.enter_player());

    h.session.close_loading().unwrap();
    assert_eq!(h.session.screen(), Screen::Start);
    assert_eq!(h.session.close_loading(), Err(SessionError::LoadingClosed));

    let rescan = AvailabilityReport {
        available: vec![1, 2, 3],
        ..Default::default()
    };
    assert!(!h.session.loading_complete(rescan));
    assert_eq!(h.session.screen(), Screen::Start);
    assert!(h.session.availability().is_available(3));
}

#[test]
fn player_arms_tracking() {
    let mut h = harness();
    assert!(!h.session.enter_player());

    h.session.loading_complete(report());
    h.session.close_loading().unwrap();
    assert!(h.session.enter_player());
    assert!(!h.session.enter_player());
    assert_eq!(h.session.screen(), Screen::Player);
    assert!(h.session.coordinator().detector().is_subscribed());
    assert_eq!(h.bus.listener_count(), 7);
}

#[test]
fn warning_opens_on_player() {
    let mut h = on_player();

    h.clock.advance(12_000);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    let w = h.session.warning();
    assert!(w.open);
    assert!(!w.is_final);

    h.clock.advance(14_000);
    h.session.tick();
    let w = h.session.warning();
    assert!(w.is_final);
    assert_eq!(w.remaining_seconds, 4);
}

#[test]
fn inactivity_returns_to_start() {
    let mut h = on_player();
    h.session.play(1).unwrap();
    h.session.pause_audio();

    h.clock.advance(31_000);
    assert_eq!(h.session.tick(), TickOutcome::AutoReset);
    assert_eq!(h.session.screen(), Screen::Start);
    assert_eq!(h.session.now_playing(), None);
    assert_eq!(h.bus.listener_count(), 0);
    assert_eq!(h.session.snapshot().activity_state, ActivityState::Active);
    assert_eq!(h.session.snapshot().time_remaining_ms, 30_000);
    assert!(!h.session.warning().open);

    // nothing further happens on the start screen
    h.clock.advance(31_000);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
}

#[test]
fn start_screen_never_resets() {
    let mut h = on_start();

    h.clock.advance(600_000);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    assert_eq!(h.session.screen(), Screen::Start);
}

#[test]
fn continue_closes_warning() {
    let mut h = on_player();

    h.clock.advance(27_000);
    h.session.tick();
    assert_eq!(h.session.snapshot().activity_state, ActivityState::FinalWarning);

    h.session.continue_pressed();
    assert_eq!(h.session.snapshot().activity_state, ActivityState::Active);
    assert_eq!(h.session.snapshot().time_remaining_ms, 30_000);
    assert!(!h.session.warning().open);
    assert!(h.session.coordinator().detector().is_subscribed());

    h.clock.advance(20_000);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
}

#[test]
fn input_keeps_player_alive() {
    let mut h = on_player();

    h.clock.advance(20_000);
    assert_eq!(h.bus.emit(ActivityKind::Click), 1);
    h.session.tick();
    assert_eq!(h.session.snapshot().time_remaining_ms, 30_000);

    h.clock.advance(20_000);
    h.bus.emit(ActivityKind::Scroll);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    assert_eq!(h.session.screen(), Screen::Player);
}

#[test]
fn play_is_checked() {
    let mut h = on_start();
    assert_eq!(h.session.play(1), Err(SessionError::NotOnPlayer));

    h.session.enter_player();
    assert_eq!(h.session.play(9), Err(SessionError::UnknownTrack(9)));
    assert_eq!(h.session.play(3), Err(SessionError::TrackUnavailable(3)));
    assert!(!h.session.is_audio_playing());

    h.session.play(2).unwrap();
    assert_eq!(h.session.now_playing(), Some(2));
    assert!(h.session.is_audio_playing());
}

#[test]
fn playing_audio_stretches_timeout() {
    let mut h = on_player();
    h.session.play(1).unwrap();
    assert_eq!(h.session.snapshot().total_timeout_ms, 90_000);

    h.clock.advance(31_000);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    assert_eq!(h.session.snapshot().activity_state, ActivityState::Warning);

    h.clock.advance(60_000);
    assert_eq!(h.session.tick(), TickOutcome::AutoReset);
    assert!(!h.session.is_audio_playing());
}

#[test]
fn leave_player_stops_audio_and_tracking() {
    let mut h = on_player();
    h.session.play(1).unwrap();

    assert!(h.session.leave_player());
    assert!(!h.session.leave_player());
    assert_eq!(h.session.screen(), Screen::Start);
    assert!(!h.session.is_audio_playing());
    assert_eq!(h.session.now_playing(), None);
    assert_eq!(h.session.snapshot().total_timeout_ms, 30_000);
    assert_eq!(h.bus.listener_count(), 0);
}

#[test]
fn pause_holds_player_open() {
    let mut h = on_player();
    h.session.pause_tracking();

    h.clock.advance(31_000);
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    assert_eq!(h.session.screen(), Screen::Player);

    h.session.resume_tracking();
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    assert_eq!(h.session.snapshot().time_remaining_ms, 30_000);
}

#[test]
fn replacing_catalog_drops_missing_track() {
    let mut h = on_player();
    h.session.play(2).unwrap();

    h.session.replace_catalog(Catalog::from_tracks(vec![track(2, "1958")]));
    assert_eq!(h.session.now_playing(), Some(2));

    h.session.replace_catalog(Catalog::from_tracks(vec![track(1, "1955")]));
    assert_eq!(h.session.now_playing(), None);
    assert!(!h.session.is_audio_playing());
    assert_eq!(h.session.catalog().len(), 1);
}

#[test]
fn replacing_catalog_forgets_availability() {
    let mut h = on_player();
    assert!(h.session.availability().is_available(1));

    h.session.replace_catalog(Catalog::from_tracks(vec![track(1, "1955"), track(4, "1970")]));
    assert_eq!(h.session.availability(), &AvailabilityReport::default());
    assert_eq!(h.session.play(4), Err(SessionError::TrackUnavailable(4)));
    assert_eq!(h.session.play(1), Err(SessionError::TrackUnavailable(1)));

    h.session.loading_complete(AvailabilityReport {
        available: vec![1, 4],
        ..Default::default()
    });
    h.session.play(4).unwrap();
    assert_eq!(h.session.screen(), Screen::Player);
}

#[test]
fn next_and_prev_wrap_around() {
    let mut h = on_player();

    h.session.play(2).unwrap();
    assert_eq!(h.session.prev_track(), Ok(1));
    assert_eq!(h.session.prev_track(), Ok(3));
    assert_eq!(h.session.next_track(), Ok(1));
    assert_eq!(h.session.next_track(), Ok(2));
    assert_eq!(h.session.now_playing(), Some(2));

    assert!(h.session.leave_player());
    assert_eq!(h.session.next_track(), Err(SessionError::NotOnPlayer));
}

#[test]
fn stepping_onto_unavailable_track_stops_audio() {
    let mut h = on_player();
    h.session.play(2).unwrap();
    assert_eq!(h.session.snapshot().total_timeout_ms, 90_000);

    assert_eq!(h.session.next_track(), Ok(3));
    assert_eq!(h.session.now_playing(), Some(3));
    assert!(!h.session.is_audio_playing());
    assert_eq!(h.session.snapshot().total_timeout_ms, 30_000);

    // wraps to the first track, which plays again
    assert_eq!(h.session.next_track(), Ok(1));
    assert!(h.session.is_audio_playing());
    assert_eq!(h.session.snapshot().total_timeout_ms, 90_000);
}

#[test]
fn track_end_keeps_stretched_timeout() {
    let mut h = on_player();
    h.session.play(1).unwrap();

    h.clock.advance(40_000);
    assert_eq!(h.session.audio_ended(), Some(2));
    assert!(h.session.is_audio_playing());
    assert_eq!(h.session.snapshot().total_timeout_ms, 90_000);

    // 40s idle is still inside the 3x warning band, not a reset
    assert_eq!(h.session.tick(), TickOutcome::Idle);
    assert_eq!(h.session.snapshot().activity_state, ActivityState::Warning);
    assert_eq!(h.session.screen(), Screen::Player);
}

#[test]
fn track_end_without_current_track_only_stops() {
    let mut h = on_player();
    assert_eq!(h.session.audio_ended(), None);
    assert_eq!(h.session.now_playing(), None);
    assert!(!h.session.is_audio_playing());
}

#[test]
fn empty_catalog_cannot_step() {
    let mut h = on_player();
    h.session.replace_catalog(Catalog::default());
    assert_eq!(h.session.next_track(), Err(SessionError::EmptyCatalog));
    assert_eq!(h.session.audio_ended(), None);
}
