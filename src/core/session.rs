// Author: Dustin Pilgrim
// License: MIT

use std::fmt;

use serde::Serialize;

use crate::core::{
    catalog::{AvailabilityReport, Catalog},
    config::ActivityOverrides,
    coordinator::{ActivityCoordinator, ActivitySnapshot},
    error::{ConfigError, SessionError},
    events::ActivityState,
    warning::WarningView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Loading,
    Start,
    Player,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Screen::Loading => "loading",
            Screen::Start => "start",
            Screen::Player => "player",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Idle,
    /// Inactivity sent the player back to the start screen.
    AutoReset,
}

/// Screen flow of one kiosk session.
///
/// Activity tracking is armed only while the player screen is shown.
pub struct KioskSession {
    coordinator: ActivityCoordinator,
    catalog: Catalog,
    availability: AvailabilityReport,
    screen: Screen,
    scan_done: bool,
    now_playing: Option<u32>,
    audio_playing: bool,
}

impl KioskSession {
    pub fn new(mut coordinator: ActivityCoordinator, catalog: Catalog) -> Self {
        coordinator.disable_tracking();

        Self {
            coordinator,
            catalog,
            availability: AvailabilityReport::default(),
            screen: Screen::Loading,
            scan_done: false,
            now_playing: None,
            audio_playing: false,
        }
    }

    // ---------------- reads ----------------

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn coordinator(&self) -> &ActivityCoordinator {
        &self.coordinator
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn availability(&self) -> &AvailabilityReport {
        &self.availability
    }

    pub fn now_playing(&self) -> Option<u32> {
        self.now_playing
    }

    pub fn is_audio_playing(&self) -> bool {
        self.audio_playing
    }

    pub fn snapshot(&self) -> ActivitySnapshot {
        self.coordinator.snapshot()
    }

    pub fn warning(&self) -> WarningView {
        WarningView::project(self.screen, &self.coordinator.snapshot())
    }

    // ---------------- screen flow ----------------

    /// Record a finished availability scan. Returns true for the first one.
    pub fn loading_complete(&mut self, report: AvailabilityReport) -> bool {
        tracing::info!(
            "catalog check: {} available, {} unavailable, {} missing metadata, {} missing covers",
            report.available.len(),
            report.unavailable.len(),
            report.missing_metadata.len(),
            report.missing_covers.len()
        );
        self.availability = report;

        let first = !self.scan_done;
        self.scan_done = true;
        first
    }

    /// Close button on the loading screen; enabled once a scan has finished.
    pub fn close_loading(&mut self) -> Result<(), SessionError> {
        if self.screen != Screen::Loading {
            return Err(SessionError::LoadingClosed);
        }
        if !self.scan_done {
            return Err(SessionError::ScanPending);
        }
        self.screen = Screen::Start;
        tracing::info!("screen: loading -> start");
        Ok(())
    }

    pub fn enter_player(&mut self) -> bool {
        if self.screen != Screen::Start {
            return false;
        }
        self.screen = Screen::Player;
        self.coordinator.enable_tracking();
        tracing::info!("screen: start -> player");
        true
    }

    pub fn leave_player(&mut self) -> bool {
        if self.screen != Screen::Player {
            return false;
        }
        self.go_to_start();
        true
    }

    fn go_to_start(&mut self) {
        self.stop_audio();
        self.screen = Screen::Start;
        self.coordinator.disable_tracking();
        tracing::info!("screen: player -> start");
    }

    /// Periodic poll; resets to the start screen once inactive on the player.
    pub fn tick(&mut self) -> TickOutcome {
        let snap = self.coordinator.poll();

        if snap.activity_state == ActivityState::Inactive && self.screen == Screen::Player {
            tracing::info!("inactivity timeout reached, returning to start screen");
            self.go_to_start();
            self.coordinator.reset_timer();
            return TickOutcome::AutoReset;
        }

        TickOutcome::Idle
    }

    /// "Continue" in the inactivity dialog.
    pub fn continue_pressed(&mut self) {
        let before = self.coordinator.activity_state();
        self.coordinator.reset_timer();

        if before != ActivityState::Active {
            self.coordinator.enable_tracking();
        }
    }

    pub fn pause_tracking(&mut self) {
        self.coordinator.pause_tracking();
    }

    pub fn resume_tracking(&mut self) {
        self.coordinator.resume_tracking();
    }

    // ---------------- playback ----------------

    pub fn play(&mut self, track_id: u32) -> Result<(), SessionError> {
        if self.screen != Screen::Player {
            return Err(SessionError::NotOnPlayer);
        }
        if self.catalog.get(track_id).is_none() {
            return Err(SessionError::UnknownTrack(track_id));
        }
        if !self.availability.is_available(track_id) {
            return Err(SessionError::TrackUnavailable(track_id));
        }

        self.now_playing = Some(track_id);
        self.set_audio(true);
        Ok(())
    }

    pub fn next_track(&mut self) -> Result<u32, SessionError> {
        self.step_track(true)
    }

    pub fn prev_track(&mut self) -> Result<u32, SessionError> {
        self.step_track(false)
    }

    /// Select the neighbour in catalog order, wrapping at both ends. Audio
    /// keeps playing only when the new track's file is available.
    fn step_track(&mut self, forward: bool) -> Result<u32, SessionError> {
        if self.screen != Screen::Player {
            return Err(SessionError::NotOnPlayer);
        }

        let tracks = self.catalog.tracks();
        if tracks.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }

        let len = tracks.len();
        let current = self
            .now_playing
            .and_then(|id| tracks.iter().position(|t| t.id == id));
        let idx = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        let id = tracks[idx].id;

        let playable = self.availability.is_available(id);
        if !playable {
            tracing::warn!("track {id} selected but unavailable, audio stopped");
        }

        self.now_playing = Some(id);
        self.set_audio(playable);
        Ok(id)
    }

    pub fn pause_audio(&mut self) {
        self.set_audio(false);
    }

    /// The current recording played to its end; moves on to the next one.
    pub fn audio_ended(&mut self) -> Option<u32> {
        if self.now_playing.is_none() {
            self.set_audio(false);
            return None;
        }

        match self.next_track() {
            Ok(id) => Some(id),
            Err(_) => {
                self.stop_audio();
                None
            }
        }
    }

    fn stop_audio(&mut self) {
        self.set_audio(false);
        self.now_playing = None;
    }

    fn set_audio(&mut self, playing: bool) {
        self.audio_playing = playing;
        self.coordinator.set_audio_playing(playing);
    }

    // ---------------- lifecycle ----------------

    /// Swap the catalog. Availability is unknown until the next scan reports.
    pub fn replace_catalog(&mut self, catalog: Catalog) {
        if let Some(id) = self.now_playing {
            if catalog.get(id).is_none() {
                self.stop_audio();
            }
        }
        self.catalog = catalog;
        self.availability = AvailabilityReport::default();
    }

    pub fn reconfigure(&mut self, overrides: &ActivityOverrides) -> Result<(), ConfigError> {
        self.coordinator.reconfigure(overrides)
    }

    pub fn shutdown(&mut self) {
        self.stop_audio();
        self.coordinator.shutdown();
    }
}
