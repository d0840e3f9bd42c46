// Author: Dustin Pilgrim
// License: MIT

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::core::{
    clock::Clock,
    config::{ActivityConfig, ActivityOverrides},
    error::ConfigError,
    events::{ActivityKind, ActivityState},
    input::{InputSource, ListenerId},
    utils::{lock, scale_ms},
};

/// Minimum spacing between "activity recorded" logs for mouse/touch moves.
const MOTION_LOG_INTERVAL_MS: u64 = 5_000;

/// Scaled thresholds in force for the current audio state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    pub warning_at_ms: u64,
    pub final_warning_at_ms: u64,
    pub reset_at_ms: u64,
}

impl Thresholds {
    pub fn for_config(cfg: &ActivityConfig, multiplier: f64) -> Self {
        Self {
            warning_at_ms: scale_ms(cfg.warning_time_ms, multiplier),
            final_warning_at_ms: scale_ms(cfg.final_warning_start_ms(), multiplier),
            reset_at_ms: scale_ms(cfg.reset_time_ms, multiplier),
        }
    }

    /// Most-elapsed check first so overlapping windows fall toward `Inactive`.
    pub fn classify(&self, elapsed_ms: u64) -> ActivityState {
        if elapsed_ms >= self.reset_at_ms {
            ActivityState::Inactive
        } else if elapsed_ms >= self.final_warning_at_ms {
            ActivityState::FinalWarning
        } else if elapsed_ms >= self.warning_at_ms {
            ActivityState::Warning
        } else {
            ActivityState::Active
        }
    }
}

/// Fields shared with input listeners.
#[derive(Debug)]
struct Tracker {
    last_activity_ms: u64,
    audio_playing: bool,
    tracking_enabled: bool,
    subscribed: bool,
    last_motion_log_ms: Option<u64>,
}

impl Tracker {
    fn record(&mut self, now_ms: u64, kind: Option<ActivityKind>) {
        if !(self.subscribed && self.tracking_enabled) {
            return;
        }
        self.last_activity_ms = now_ms;

        match kind {
            Some(k) if k.is_continuous() => {
                let due = self
                    .last_motion_log_ms
                    .is_none_or(|t| now_ms.saturating_sub(t) >= MOTION_LOG_INTERVAL_MS);
                if due {
                    self.last_motion_log_ms = Some(now_ms);
                    tracing::debug!("activity: {}", k);
                }
            }
            Some(k) => tracing::debug!("activity recorded: {}", k),
            None => {}
        }
    }
}

/// Idle-timeout engine.
///
/// Holds the last-activity timestamp and classifies elapsed time against the
/// configured thresholds on every query. Nothing is pushed; callers poll.
pub struct ActivityDetection {
    cfg: ActivityConfig,
    clock: Arc<dyn Clock>,
    input: Arc<dyn InputSource>,
    tracker: Arc<Mutex<Tracker>>,
    listeners: Vec<ListenerId>,
}

impl ActivityDetection {
    pub fn new(cfg: ActivityConfig, clock: Arc<dyn Clock>, input: Arc<dyn InputSource>) -> Self {
        let now_ms = clock.now_ms();

        tracing::debug!(
            "activity detection: warning={}ms final_warning={}ms reset={}ms audio_multiplier={} events={}",
            cfg.warning_time_ms,
            cfg.final_warning_time_ms,
            cfg.reset_time_ms,
            cfg.audio_playback_multiplier,
            cfg.tracked_events.len(),
        );

        Self {
            cfg,
            clock,
            input,
            tracker: Arc::new(Mutex::new(Tracker {
                last_activity_ms: now_ms,
                audio_playing: false,
                tracking_enabled: true,
                subscribed: false,
                last_motion_log_ms: None,
            })),
            listeners: Vec::new(),
        }
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.cfg
    }

    fn multiplier(&self, t: &Tracker) -> f64 {
        if t.audio_playing {
            self.cfg.audio_playback_multiplier
        } else {
            1.0
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        let t = lock(&self.tracker);
        Thresholds::for_config(&self.cfg, self.multiplier(&t))
    }

    // ---------------- queries ----------------

    pub fn activity_state(&self) -> ActivityState {
        let t = lock(&self.tracker);
        if !t.tracking_enabled {
            return ActivityState::Active;
        }

        let elapsed = self.clock.now_ms().saturating_sub(t.last_activity_ms);
        Thresholds::for_config(&self.cfg, self.multiplier(&t)).classify(elapsed)
    }

    /// Remaining ms until `Inactive`. Reports the full timeout while disabled.
    pub fn time_until_reset(&self) -> u64 {
        let t = lock(&self.tracker);
        let total = scale_ms(self.cfg.reset_time_ms, self.multiplier(&t));
        if !t.tracking_enabled {
            return total;
        }

        let elapsed = self.clock.now_ms().saturating_sub(t.last_activity_ms);
        total.saturating_sub(elapsed)
    }

    pub fn total_timeout(&self) -> u64 {
        let t = lock(&self.tracker);
        scale_ms(self.cfg.reset_time_ms, self.multiplier(&t))
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        lock(&self.tracker).tracking_enabled
    }

    pub fn is_subscribed(&self) -> bool {
        lock(&self.tracker).subscribed
    }

    pub fn is_audio_playing(&self) -> bool {
        lock(&self.tracker).audio_playing
    }

    // ---------------- mutations ----------------

    /// Takes effect only while subscribed and enabled.
    pub fn record_activity(&self) {
        let now_ms = self.clock.now_ms();
        lock(&self.tracker).record(now_ms, None);
    }

    pub fn reset_timer(&self) {
        let now_ms = self.clock.now_ms();
        lock(&self.tracker).last_activity_ms = now_ms;
        tracing::debug!("activity timer reset");
    }

    pub fn set_audio_playback(&self, playing: bool) {
        let mut t = lock(&self.tracker);
        if t.audio_playing != playing {
            t.audio_playing = playing;
            tracing::debug!(
                "audio playback {}",
                if playing { "started" } else { "stopped" }
            );
        }
    }

    /// Re-arms the clock when switching from disabled to enabled.
    pub fn enable(&self) {
        let mut t = lock(&self.tracker);
        if !t.tracking_enabled {
            t.tracking_enabled = true;
            t.last_activity_ms = self.clock.now_ms();
            tracing::debug!("activity tracking enabled");
        }
    }

    pub fn disable(&self) {
        let mut t = lock(&self.tracker);
        if t.tracking_enabled {
            t.tracking_enabled = false;
            tracing::debug!("activity tracking disabled");
        }
    }

    /// Subscribe to every tracked event kind. No-op while already subscribed.
    pub fn start_tracking(&mut self) {
        {
            let mut t = lock(&self.tracker);
            if t.subscribed {
                return;
            }
            t.subscribed = true;
            t.last_activity_ms = self.clock.now_ms();
        }

        self.attach_listeners();
        tracing::debug!("activity tracking started ({} listeners)", self.listeners.len());
    }

    pub fn stop_tracking(&mut self) {
        let was_subscribed = {
            let mut t = lock(&self.tracker);
            std::mem::replace(&mut t.subscribed, false)
        };

        self.detach_listeners();

        if was_subscribed {
            tracing::debug!("activity tracking stopped");
        }
    }

    /// Replace the configuration. Validation matches construction; on error
    /// the engine keeps its current configuration.
    pub fn reconfigure(&mut self, overrides: &ActivityOverrides) -> Result<(), ConfigError> {
        let cfg = ActivityConfig::from_overrides(overrides)?;
        let events_changed = cfg.tracked_events != self.cfg.tracked_events;
        self.cfg = cfg;

        if events_changed && self.is_subscribed() {
            self.detach_listeners();
            self.attach_listeners();
        }

        tracing::info!(
            "activity detection reconfigured: warning={}ms final_warning={}ms reset={}ms",
            self.cfg.warning_time_ms,
            self.cfg.final_warning_time_ms,
            self.cfg.reset_time_ms,
        );
        Ok(())
    }

    // ---------------- listeners ----------------

    fn attach_listeners(&mut self) {
        for &kind in &self.cfg.tracked_events {
            let tracker = Arc::clone(&self.tracker);
            let clock = Arc::clone(&self.clock);

            let id = self.input.add_listener(
                kind,
                Arc::new(move |k| {
                    let now_ms = clock.now_ms();
                    lock(&tracker).record(now_ms, Some(k));
                }),
            );
            self.listeners.push(id);
        }
    }

    fn detach_listeners(&mut self) {
        for id in self.listeners.drain(..) {
            self.input.remove_listener(id);
        }
    }
}

impl Drop for ActivityDetection {
    fn drop(&mut self) {
        self.detach_listeners();
    }
}
