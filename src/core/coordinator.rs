// Author: Dustin Pilgrim
// License: MIT

use serde::Serialize;

use crate::core::{
    config::ActivityOverrides,
    detector::{ActivityDetection, Thresholds},
    error::ConfigError,
    events::ActivityState,
};

/// What consumers read each poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivitySnapshot {
    pub activity_state: ActivityState,
    pub time_remaining_ms: u64,
    pub total_timeout_ms: u64,
}

/// Owns the single detector for a session and caches what it last observed.
///
/// The cache only moves on [`poll`](Self::poll) or on an explicit reset, so a
/// paused coordinator keeps reporting the values seen before the pause.
pub struct ActivityCoordinator {
    detector: ActivityDetection,
    activity_state: ActivityState,
    time_remaining_ms: u64,
    paused: bool,
}

impl ActivityCoordinator {
    pub fn new(detector: ActivityDetection) -> Self {
        let time_remaining_ms = detector.total_timeout();
        Self {
            detector,
            activity_state: ActivityState::Active,
            time_remaining_ms,
            paused: false,
        }
    }

    #[cfg(test)]
    pub fn detector(&self) -> &ActivityDetection {
        &self.detector
    }

    // ---------------- reads ----------------

    pub fn activity_state(&self) -> ActivityState {
        self.activity_state
    }

    pub fn time_remaining_ms(&self) -> u64 {
        self.time_remaining_ms
    }

    /// Re-queried every call; changes when audio starts or stops.
    pub fn total_timeout_ms(&self) -> u64 {
        self.detector.total_timeout()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn thresholds(&self) -> Thresholds {
        self.detector.thresholds()
    }

    pub fn snapshot(&self) -> ActivitySnapshot {
        ActivitySnapshot {
            activity_state: self.activity_state,
            time_remaining_ms: self.time_remaining_ms,
            total_timeout_ms: self.total_timeout_ms(),
        }
    }

    // ---------------- periodic check ----------------

    pub fn poll(&mut self) -> ActivitySnapshot {
        if !self.paused {
            let state = self.detector.activity_state();
            if state != self.activity_state {
                tracing::debug!("activity state: {} -> {}", self.activity_state, state);
            }
            self.activity_state = state;
            self.time_remaining_ms = self.detector.time_until_reset();
        }
        self.snapshot()
    }

    // ---------------- controls ----------------

    /// Resets the detector and updates the cache ahead of the next poll.
    pub fn reset_timer(&mut self) {
        self.detector.reset_timer();
        self.activity_state = ActivityState::Active;
        self.time_remaining_ms = self.detector.total_timeout();
    }

    pub fn enable_tracking(&mut self) {
        self.detector.enable();
        self.detector.start_tracking();
        self.paused = false;
    }

    pub fn disable_tracking(&mut self) {
        self.detector.disable();
        self.detector.stop_tracking();
        self.activity_state = ActivityState::Active;
        self.paused = false;
    }

    /// Freeze the cached values. The detector keeps counting.
    pub fn pause_tracking(&mut self) {
        if !self.paused {
            self.paused = true;
            tracing::debug!("activity polling paused");
        }
    }

    pub fn resume_tracking(&mut self) {
        self.paused = false;
        self.reset_timer();
        tracing::debug!("activity polling resumed");
    }

    pub fn set_audio_playing(&mut self, playing: bool) {
        self.detector.set_audio_playback(playing);
    }

    pub fn reconfigure(&mut self, overrides: &ActivityOverrides) -> Result<(), ConfigError> {
        self.detector.reconfigure(overrides)?;
        self.poll();
        Ok(())
    }

    pub fn shutdown(&mut self) {
        self.detector.stop_tracking();
    }
}
