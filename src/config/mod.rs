// Author: Dustin Pilgrim
// License: MIT

pub mod parser;

use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use rune_cfg::RuneConfig;

use crate::core::config::KioskConfig;

pub fn resolve_default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("kiosk")
        .join("kiosk.rune")
}

/// Load and validate a config file. A missing file yields the built-in defaults.
pub fn load_from_path(path: &Path) -> Result<KioskConfig> {
    if !path.exists() {
        tracing::warn!("config: {} not found, using defaults", path.display());
        return Ok(KioskConfig::default());
    }

    let rune = RuneConfig::from_file(path)
        .map_err(|e| eyre::eyre!("failed to load config from {}: {}", path.display(), e))?;

    let cfg = parser::read_raw(&rune)
        .into_config()
        .wrap_err_with(|| format!("invalid config in {}", path.display()))?;

    tracing::info!("config: loaded {}", path.display());
    tracing::debug!(
        "config: warning={}ms final_warning={}ms reset={}ms multiplier={} events={} schedule={} poll={}ms",
        cfg.activity.warning_time_ms,
        cfg.activity.final_warning_time_ms,
        cfg.activity.reset_time_ms,
        cfg.activity.audio_playback_multiplier,
        cfg.activity.tracked_events.len(),
        cfg.schedule.enabled,
        cfg.poll_interval_ms,
    );

    Ok(cfg)
}
