// Author: Dustin Pilgrim
// License: MIT

use std::path::PathBuf;

use rune_cfg::RuneConfig;

use crate::core::{
    config::{
        ActivityConfig, ActivityOverrides, CatalogConfig, DEFAULT_POLL_INTERVAL_MS, KioskConfig,
        ScheduleConfig, parse_clock_time,
    },
    error::ConfigError,
    events::ActivityKind,
};

/// Try the snake_case key, then its hyphenated spelling.
macro_rules! lookup {
    ($cfg:expr, $ty:ty, $key:expr) => {
        $cfg.get::<$ty>($key)
            .or_else(|_| $cfg.get::<$ty>(&$key.replace('_', "-")))
            .ok()
    };
}

/// Values as found in the file, before defaults and validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConfig {
    pub warning_time: Option<u64>,
    pub final_warning_time: Option<u64>,
    pub reset_time: Option<u64>,
    pub track_events: Option<Vec<String>>,
    pub audio_playback_multiplier: Option<f64>,

    pub schedule_enabled: Option<bool>,
    pub turn_off: Option<String>,
    pub turn_on: Option<String>,

    pub catalog_path: Option<String>,
    pub media_root: Option<String>,

    pub poll_interval_ms: Option<u64>,
}

pub fn read_raw(config: &RuneConfig) -> RawConfig {
    // whole numbers are accepted for the multiplier too
    let audio_playback_multiplier = lookup!(config, f64, "activity.audio_playback_multiplier")
        .or_else(|| lookup!(config, u64, "activity.audio_playback_multiplier").map(|v| v as f64));

    RawConfig {
        warning_time: lookup!(config, u64, "activity.warning_time"),
        final_warning_time: lookup!(config, u64, "activity.final_warning_time"),
        reset_time: lookup!(config, u64, "activity.reset_time"),
        track_events: lookup!(config, Vec<String>, "activity.track_events"),
        audio_playback_multiplier,

        schedule_enabled: lookup!(config, bool, "schedule.enabled"),
        turn_off: lookup!(config, String, "schedule.turn_off"),
        turn_on: lookup!(config, String, "schedule.turn_on"),

        catalog_path: lookup!(config, String, "catalog.path"),
        media_root: lookup!(config, String, "catalog.media_root"),

        poll_interval_ms: lookup!(config, u64, "daemon.poll_interval_ms"),
    }
}

impl RawConfig {
    pub fn activity_overrides(&self) -> Result<ActivityOverrides, ConfigError> {
        let tracked_events = match &self.track_events {
            Some(names) => Some(
                names
                    .iter()
                    .map(|n| n.parse::<ActivityKind>().map_err(ConfigError::UnknownEvent))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };

        Ok(ActivityOverrides {
            warning_time_ms: self.warning_time,
            final_warning_time_ms: self.final_warning_time,
            reset_time_ms: self.reset_time,
            tracked_events,
            audio_playback_multiplier: self.audio_playback_multiplier,
        })
    }

    pub fn into_config(self) -> Result<KioskConfig, ConfigError> {
        let activity = ActivityConfig::from_overrides(&self.activity_overrides()?)?;

        let mut schedule = ScheduleConfig::default();
        if let Some(v) = self.schedule_enabled {
            schedule.enabled = v;
        }
        if let Some(raw) = &self.turn_off {
            schedule.turn_off = parse_clock_time(raw)?;
        }
        if let Some(raw) = &self.turn_on {
            schedule.turn_on = parse_clock_time(raw)?;
        }

        let mut catalog = CatalogConfig::default();
        if let Some(p) = &self.catalog_path {
            catalog.path = expand_home(p);
            // media defaults to the directory holding the track list
            if let Some(parent) = catalog.path.parent() {
                catalog.media_root = parent.to_path_buf();
            }
        }
        if let Some(p) = &self.media_root {
            catalog.media_root = expand_home(p);
        }

        let poll_interval_ms = self.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        Ok(KioskConfig {
            activity,
            schedule,
            catalog,
            poll_interval_ms,
        })
    }
}

pub fn expand_home(raw: &str) -> PathBuf {
    let raw = raw.trim();
    match raw.strip_prefix("~/") {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(raw),
        },
        None => PathBuf::from(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn empty_file_means_defaults() {
        let cfg = RawConfig::default().into_config().unwrap();
        assert_eq!(cfg, KioskConfig::default());
    }

    #[test]
    fn event_names_are_parsed() {
        let raw = RawConfig {
            track_events: Some(vec!["click".into(), "touch-start".into(), "keydown".into()]),
            ..Default::default()
        };
        let cfg = raw.into_config().unwrap();
        assert_eq!(
            cfg.activity.tracked_events,
            vec![ActivityKind::Click, ActivityKind::TouchStart, ActivityKind::KeyDown]
        );
    }

    #[test]
    fn unknown_event_is_rejected() {
        let raw = RawConfig {
            track_events: Some(vec!["click".into(), "hover".into()]),
            ..Default::default()
        };
        assert_eq!(raw.into_config(), Err(ConfigError::UnknownEvent("hover".into())));
    }

    #[test]
    fn thresholds_are_validated() {
        let raw = RawConfig {
            warning_time: Some(70_000),
            ..Default::default()
        };
        assert_eq!(raw.into_config(), Err(ConfigError::WarningNotBeforeReset));
    }

    #[test]
    fn schedule_times() {
        let raw = RawConfig {
            schedule_enabled: Some(false),
            turn_off: Some("22:30".into()),
            turn_on: Some("08:15".into()),
            ..Default::default()
        };
        let cfg = raw.into_config().unwrap();
        assert!(!cfg.schedule.enabled);
        assert_eq!(cfg.schedule.turn_off, NaiveTime::from_hms_opt(22, 30, 0).unwrap());
        assert_eq!(cfg.schedule.turn_on, NaiveTime::from_hms_opt(8, 15, 0).unwrap());

        let bad = RawConfig {
            turn_on: Some("8am".into()),
            ..Default::default()
        };
        assert_eq!(bad.into_config(), Err(ConfigError::InvalidTime("8am".into())));
    }

    #[test]
    fn media_root_follows_catalog_unless_set() {
        let raw = RawConfig {
            catalog_path: Some("/srv/exhibit/tracks.json".into()),
            ..Default::default()
        };
        let cfg = raw.into_config().unwrap();
        assert_eq!(cfg.catalog.path, PathBuf::from("/srv/exhibit/tracks.json"));
        assert_eq!(cfg.catalog.media_root, PathBuf::from("/srv/exhibit"));

        let raw = RawConfig {
            catalog_path: Some("/srv/exhibit/tracks.json".into()),
            media_root: Some("/srv/media".into()),
            ..Default::default()
        };
        assert_eq!(raw.into_config().unwrap().catalog.media_root, PathBuf::from("/srv/media"));
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let raw = RawConfig {
            poll_interval_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(raw.into_config(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = crate::config::load_from_path(&dir.path().join("kiosk.rune")).unwrap();
        assert_eq!(cfg, KioskConfig::default());
    }
}
