// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use chrono::NaiveTime;

use crate::core::error::ConfigError;
use crate::core::events::ActivityKind;

pub const DEFAULT_WARNING_TIME_MS: u64 = 45 * 1000;
pub const DEFAULT_FINAL_WARNING_TIME_MS: u64 = 15 * 1000;
pub const DEFAULT_RESET_TIME_MS: u64 = 60 * 1000;
pub const DEFAULT_AUDIO_PLAYBACK_MULTIPLIER: f64 = 3.0;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Validated activity thresholds. Build with [`ActivityConfig::from_overrides`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityConfig {
    /// Inactivity before the first warning.
    pub warning_time_ms: u64,

    /// Length of the final-warning window, measured back from `reset_time_ms`.
    pub final_warning_time_ms: u64,

    /// Inactivity before the session returns to the start screen.
    pub reset_time_ms: u64,

    pub tracked_events: Vec<ActivityKind>,

    /// Applied to all three durations while audio is playing.
    pub audio_playback_multiplier: f64,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            warning_time_ms: DEFAULT_WARNING_TIME_MS,
            final_warning_time_ms: DEFAULT_FINAL_WARNING_TIME_MS,
            reset_time_ms: DEFAULT_RESET_TIME_MS,
            tracked_events: ActivityKind::ALL.to_vec(),
            audio_playback_multiplier: DEFAULT_AUDIO_PLAYBACK_MULTIPLIER,
        }
    }
}

impl ActivityConfig {
    /// Merge overrides over the defaults and validate.
    pub fn from_overrides(overrides: &ActivityOverrides) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        overrides.apply_to(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    /// Threshold ordering: `0 < final_warning < reset` and `warning < reset`.
    ///
    /// `warning` may reach into the final-warning window; the plain warning
    /// band is then skipped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.final_warning_time_ms == 0 {
            return Err(ConfigError::ZeroFinalWarning);
        }
        if self.final_warning_time_ms >= self.reset_time_ms {
            return Err(ConfigError::FinalWarningNotBeforeReset);
        }
        if self.warning_time_ms >= self.reset_time_ms {
            return Err(ConfigError::WarningNotBeforeReset);
        }
        if !self.audio_playback_multiplier.is_finite() || self.audio_playback_multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier);
        }
        if self.tracked_events.is_empty() {
            return Err(ConfigError::NoTrackedEvents);
        }
        Ok(())
    }

    pub fn final_warning_start_ms(&self) -> u64 {
        self.reset_time_ms - self.final_warning_time_ms
    }
}

/// Partial activity config as read from a file or passed by a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityOverrides {
    pub warning_time_ms: Option<u64>,
    pub final_warning_time_ms: Option<u64>,
    pub reset_time_ms: Option<u64>,
    pub tracked_events: Option<Vec<ActivityKind>>,
    pub audio_playback_multiplier: Option<f64>,
}

impl ActivityOverrides {
    pub fn apply_to(&self, base: &mut ActivityConfig) {
        if let Some(v) = self.warning_time_ms {
            base.warning_time_ms = v;
        }
        if let Some(v) = self.final_warning_time_ms {
            base.final_warning_time_ms = v;
        }
        if let Some(v) = self.reset_time_ms {
            base.reset_time_ms = v;
        }
        if let Some(v) = &self.tracked_events {
            let mut events = v.clone();
            events.sort();
            events.dedup();
            base.tracked_events = events;
        }
        if let Some(v) = self.audio_playback_multiplier {
            base.audio_playback_multiplier = v;
        }
    }
}

impl From<&ActivityConfig> for ActivityOverrides {
    fn from(cfg: &ActivityConfig) -> Self {
        Self {
            warning_time_ms: Some(cfg.warning_time_ms),
            final_warning_time_ms: Some(cfg.final_warning_time_ms),
            reset_time_ms: Some(cfg.reset_time_ms),
            tracked_events: Some(cfg.tracked_events.clone()),
            audio_playback_multiplier: Some(cfg.audio_playback_multiplier),
        }
    }
}

/// Wall-clock window in which the display is dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub enabled: bool,
    pub turn_off: NaiveTime,
    pub turn_on: NaiveTime,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            turn_off: NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN),
            turn_on: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// Parse `HH:MM` (or `HH:MM:SS`).
pub fn parse_clock_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    let s = raw.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| ConfigError::InvalidTime(s.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// JSON track list. Missing file means an empty catalog.
    pub path: PathBuf,

    /// Directory that track `file` entries are relative to.
    pub media_root: PathBuf,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("/usr/share"))
            .join("kiosk");
        Self {
            path: base.join("tracks.json"),
            media_root: base,
        }
    }
}

/// Everything the daemon reads from the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct KioskConfig {
    pub activity: ActivityConfig,
    pub schedule: ScheduleConfig,
    pub catalog: CatalogConfig,
    pub poll_interval_ms: u64,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            activity: ActivityConfig::default(),
            schedule: ScheduleConfig::default(),
            catalog: CatalogConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
